pub mod dto;

pub use dto::{DerivedRow, DerivedRowsResponse, ExportOptions};
