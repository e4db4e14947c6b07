use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::enums::SemanticRole;

/// Where the value of one semantic role comes from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnSource {
    /// A field of the imported sheet
    Column { name: String },
    /// Constant used for every row
    Fixed { value: f64 },
    /// Nothing selected
    Absent,
}

impl ColumnSource {
    pub fn column(name: &str) -> Self {
        ColumnSource::Column {
            name: name.to_string(),
        }
    }

    pub fn column_name(&self) -> Option<&str> {
        match self {
            ColumnSource::Column { name } => Some(name.as_str()),
            _ => None,
        }
    }
}

static ABSENT: ColumnSource = ColumnSource::Absent;

/// Role → source resolution for one session.
///
/// Built once from auto-detection; every operator override bumps `version`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub version: u32,
    pub roles: BTreeMap<SemanticRole, ColumnSource>,
    /// Revenue role chosen to feed `gross_revenue`. Detection pre-selects it from
    /// the Net → Transfer → Gross priority; `None` falls back to that priority.
    #[serde(default)]
    pub revenue_role: Option<SemanticRole>,
}

impl ColumnMapping {
    pub fn empty() -> Self {
        Self {
            version: 0,
            roles: SemanticRole::all()
                .into_iter()
                .map(|role| (role, ColumnSource::Absent))
                .collect(),
            revenue_role: None,
        }
    }

    pub fn get(&self, role: SemanticRole) -> &ColumnSource {
        self.roles.get(&role).unwrap_or(&ABSENT)
    }

    pub fn column(&self, role: SemanticRole) -> Option<&str> {
        self.get(role).column_name()
    }

    /// Operator override of a single role.
    ///
    /// Picking a column for a revenue role also selects it as the revenue source.
    pub fn set(&mut self, role: SemanticRole, source: ColumnSource) {
        if role.is_revenue() && source.column_name().is_some() {
            self.revenue_role = Some(role);
        }
        self.roles.insert(role, source);
        self.version += 1;
    }

    /// Operator choice of the revenue source
    pub fn select_revenue(&mut self, role: SemanticRole) {
        self.revenue_role = Some(role);
        self.version += 1;
    }

    /// Column feeding `gross_revenue`: the selected revenue role when it has a
    /// column, otherwise the first mapped of Net → Transfer → Gross
    pub fn revenue_column(&self) -> Option<(SemanticRole, &str)> {
        let selected = self
            .revenue_role
            .and_then(|role| self.column(role).map(|name| (role, name)));
        selected.or_else(|| {
            SemanticRole::revenue_priority()
                .into_iter()
                .find_map(|role| self.column(role).map(|name| (role, name)))
        })
    }
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self::empty()
    }
}
