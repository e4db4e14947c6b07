use serde::{Deserialize, Serialize};

use super::mapping::ColumnMapping;
use super::policy::DerivationPolicy;
use crate::enums::SemanticRole;

/// Auto-detected column for one role, used to pre-fill controls
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectedColumn {
    pub role: SemanticRole,
    pub display_name: String,
    /// `None` when no header matched any alias
    pub column: Option<String>,
}

/// Result of a successful sales import
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportResponse {
    pub session_id: String,
    pub file_name: String,
    /// Sheet that was read (`None` for CSV)
    pub sheet_name: Option<String>,
    pub sheet_names: Vec<String>,
    pub headers: Vec<String>,
    pub row_count: usize,
    pub detected: Vec<DetectedColumn>,
    pub mapping: ColumnMapping,
    pub policy: DerivationPolicy,
}

/// Result of loading an auxiliary cost table or ad-spend ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuxImportResponse {
    pub loaded: usize,
    pub skipped: usize,
}
