use chrono::{DateTime, Utc};
use contracts::usecases::u601_sales_import::{ColumnMapping, DerivationPolicy, SessionSettings};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::shared::dataset::RawDataset;
use crate::usecases::u601_sales_import::ad_ledger::AdSpendLedger;
use crate::usecases::u601_sales_import::cost_table::CostTable;

/// Imported dataset with everything the operator configured for it.
///
/// The raw rows never change after import; derived rows are recomputed from this
/// snapshot on every read.
#[derive(Debug, Clone)]
pub struct Session {
    pub dataset: Arc<RawDataset>,
    pub mapping: ColumnMapping,
    pub policy: DerivationPolicy,
    pub cost_table: Option<Arc<CostTable>>,
    pub ledger: Option<Arc<AdSpendLedger>>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn new(dataset: RawDataset, mapping: ColumnMapping, policy: DerivationPolicy) -> Self {
        Self {
            dataset: Arc::new(dataset),
            mapping,
            policy,
            cost_table: None,
            ledger: None,
            created_at: Utc::now(),
        }
    }

    pub fn settings(&self) -> SessionSettings {
        SessionSettings {
            mapping: self.mapping.clone(),
            policy: self.policy.clone(),
        }
    }
}

/// Хранилище сессий (in-memory, живёт до перезапуска)
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
}

pub static SESSIONS: Lazy<SessionStore> = Lazy::new(SessionStore::new);

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Сохранить сессию, вернуть её id
    pub fn create(&self, session: Session) -> String {
        let session_id = uuid::Uuid::new_v4().to_string();
        let mut sessions = self.sessions.write().unwrap_or_else(|e| e.into_inner());
        sessions.insert(session_id.clone(), session);
        session_id
    }

    /// Снимок сессии (строки данных разделяются через Arc)
    pub fn get(&self, session_id: &str) -> Option<Session> {
        let sessions = self.sessions.read().unwrap_or_else(|e| e.into_inner());
        sessions.get(session_id).cloned()
    }

    /// Изменить сессию под блокировкой. `None`, если сессии нет.
    pub fn update<T, F>(&self, session_id: &str, f: F) -> Option<T>
    where
        F: FnOnce(&mut Session) -> T,
    {
        let mut sessions = self.sessions.write().unwrap_or_else(|e| e.into_inner());
        sessions.get_mut(session_id).map(f)
    }

    pub fn contains(&self, session_id: &str) -> bool {
        let sessions = self.sessions.read().unwrap_or_else(|e| e.into_inner());
        sessions.contains_key(session_id)
    }

    pub fn len(&self) -> usize {
        self.sessions.read().unwrap_or_else(|e| e.into_inner()).len()
    }
}
