pub mod p910_derived_sales;
