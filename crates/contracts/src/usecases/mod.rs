pub mod u601_sales_import;
