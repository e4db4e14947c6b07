use contracts::enums::SemanticRole;
use contracts::usecases::u601_sales_import::{
    AuxImportResponse, ColumnMapping, CostSource, CostTableRequest, DerivationPolicy,
    ImportResponse, SessionSettings,
};
use std::sync::Arc;

use super::ad_ledger::AdSpendLedger;
use super::cost_table::CostTable;
use super::loader::{load_table, ImportError};
use crate::shared::column_detect::{detect_all, detected_mapping, AliasTable};
use crate::shared::config::{Config, EngineConfig};
use crate::system::session::{Session, SessionStore};

/// Executor для UseCase импорта выгрузки продаж.
///
/// Все чтения файлов выполняются до изменения сессии: при ошибке состояние не меняется.
#[derive(Clone)]
pub struct ImportExecutor {
    sessions: SessionStore,
    aliases: Arc<AliasTable>,
    engine: EngineConfig,
}

impl ImportExecutor {
    pub fn new(sessions: SessionStore, aliases: AliasTable, engine: EngineConfig) -> Self {
        Self {
            sessions,
            aliases: Arc::new(aliases),
            engine,
        }
    }

    pub fn from_config(sessions: SessionStore, config: &Config) -> Self {
        Self::new(
            sessions,
            AliasTable::with_extra(&config.aliases),
            config.engine.clone(),
        )
    }

    /// Политика по умолчанию для нового импорта
    fn default_policy(&self, mapping: &ColumnMapping) -> DerivationPolicy {
        let cost_source = if mapping.column(SemanticRole::UnitCost).is_some() {
            CostSource::Column
        } else {
            CostSource::FixedValue { unit_cost: 0.0 }
        };
        DerivationPolicy {
            cost_source,
            ..self.engine.default_policy()
        }
    }

    /// Прочитать файл, определить колонки и создать сессию
    pub fn import(
        &self,
        file_name: &str,
        bytes: &[u8],
        sheet: Option<&str>,
    ) -> Result<ImportResponse, ImportError> {
        let dataset = load_table(file_name, bytes, sheet)?;

        let detected = detect_all(&dataset.headers, &self.aliases);
        let mapping = detected_mapping(&detected);
        let policy = self.default_policy(&mapping);

        let file_name = dataset.file_name.clone();
        let sheet_name = dataset.sheet_name.clone();
        let sheet_names = dataset.sheet_names.clone();
        let headers = dataset.headers.clone();
        let row_count = dataset.rows.len();

        let session_id = self
            .sessions
            .create(Session::new(dataset, mapping.clone(), policy.clone()));

        tracing::info!(
            "Session {} created from '{}': {} rows, {} roles detected",
            session_id,
            file_name,
            row_count,
            detected.iter().filter(|d| d.column.is_some()).count()
        );

        Ok(ImportResponse {
            session_id,
            file_name,
            sheet_name,
            sheet_names,
            headers,
            row_count,
            detected,
            mapping,
            policy,
        })
    }

    /// Загрузить таблицу себестоимости из файла. `None`, если сессии нет.
    pub fn load_cost_table(
        &self,
        session_id: &str,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<Option<AuxImportResponse>, ImportError> {
        if !self.sessions.contains(session_id) {
            return Ok(None);
        }

        let dataset = load_table(file_name, bytes, None)?;
        let (table, skipped) = CostTable::from_dataset(&dataset, &self.aliases)?;
        let loaded = table.len();

        Ok(self.replace_cost_table(session_id, table, skipped, loaded))
    }

    /// Ручной ввод таблицы себестоимости (заменяет текущую)
    pub fn set_cost_entries(
        &self,
        session_id: &str,
        request: &CostTableRequest,
    ) -> Option<AuxImportResponse> {
        let (table, skipped) = CostTable::from_entries(&request.entries);
        let loaded = table.len();
        self.replace_cost_table(session_id, table, skipped, loaded)
    }

    fn replace_cost_table(
        &self,
        session_id: &str,
        table: CostTable,
        skipped: usize,
        loaded: usize,
    ) -> Option<AuxImportResponse> {
        let result = self.sessions.update(session_id, |session| {
            session.cost_table = Some(Arc::new(table));
            AuxImportResponse { loaded, skipped }
        });
        if result.is_some() {
            tracing::info!(
                "Session {}: cost table with {} products ({} skipped)",
                session_id,
                loaded,
                skipped
            );
        }
        result
    }

    /// Загрузить рекламный леджер из файла. `None`, если сессии нет.
    pub fn load_ad_ledger(
        &self,
        session_id: &str,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<Option<AuxImportResponse>, ImportError> {
        if !self.sessions.contains(session_id) {
            return Ok(None);
        }

        let dataset = load_table(file_name, bytes, None)?;
        let (ledger, skipped) = AdSpendLedger::from_dataset(&dataset, &self.aliases)?;
        let loaded = ledger.entries.len();
        let total = ledger.total();

        let result = self.sessions.update(session_id, |session| {
            session.ledger = Some(Arc::new(ledger));
            AuxImportResponse { loaded, skipped }
        });
        if result.is_some() {
            tracing::info!(
                "Session {}: ad ledger with {} entries, total {:.2}",
                session_id,
                loaded,
                total
            );
        }
        Ok(result)
    }

    pub fn get_settings(&self, session_id: &str) -> Option<SessionSettings> {
        self.sessions.get(session_id).map(|s| s.settings())
    }

    /// Заменить mapping и policy целиком.
    ///
    /// The mapping version is owned by the session: it advances by one whenever the
    /// role resolution or the revenue selection changes and is otherwise kept.
    pub fn update_settings(
        &self,
        session_id: &str,
        settings: SessionSettings,
    ) -> Option<SessionSettings> {
        self.sessions.update(session_id, |session| {
            let SessionSettings {
                mut mapping,
                policy,
            } = settings;
            let changed = mapping.roles != session.mapping.roles
                || mapping.revenue_role != session.mapping.revenue_role;
            mapping.version = if changed {
                session.mapping.version + 1
            } else {
                session.mapping.version
            };
            session.mapping = mapping;
            session.policy = policy;

            tracing::info!(
                "Session {}: settings updated (mapping v{})",
                session_id,
                session.mapping.version
            );
            session.settings()
        })
    }
}
