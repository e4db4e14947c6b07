use serde::{Deserialize, Serialize};

use super::mapping::ColumnMapping;
use super::policy::DerivationPolicy;

/// Mapping + policy snapshot, read and replaced as a whole
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSettings {
    pub mapping: ColumnMapping,
    pub policy: DerivationPolicy,
}

/// One manually entered purchase price
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostTableEntry {
    pub product: String,
    pub unit_cost: f64,
}

/// Manual cost table entry: replaces the session cost table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostTableRequest {
    pub entries: Vec<CostTableEntry>,
}
