pub mod mapping;
pub mod policy;
pub mod request;
pub mod response;

pub use mapping::{ColumnMapping, ColumnSource};
pub use policy::{
    AdSpendEntry, AdSpendMode, AllocationBasis, CostSource, DerivationPolicy, FeeDefaults,
    FeeInclusion, RowFilter,
};
pub use request::{CostTableEntry, CostTableRequest, SessionSettings};
pub use response::{AuxImportResponse, DetectedColumn, ImportResponse};
