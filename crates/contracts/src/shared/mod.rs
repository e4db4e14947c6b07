pub mod cell_value;
pub mod indicators;

pub use cell_value::CellValue;
