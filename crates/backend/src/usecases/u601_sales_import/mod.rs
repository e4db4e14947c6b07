pub mod ad_ledger;
pub mod cost_table;
pub mod executor;
pub mod loader;

pub use executor::ImportExecutor;
pub use loader::ImportError;
