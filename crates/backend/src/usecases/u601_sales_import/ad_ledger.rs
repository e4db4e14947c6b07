use chrono::NaiveDate;
use contracts::enums::SemanticRole;
use contracts::usecases::u601_sales_import::AdSpendEntry;
use std::collections::BTreeMap;

use super::loader::ImportError;
use crate::shared::coercion::{number_or_zero, to_date};
use crate::shared::column_detect::{detect, detect_by_aliases, AliasTable};
use crate::shared::dataset::RawDataset;

/// Fallback headers for the spend amount when no ad-spend alias matches
const AMOUNT_ALIASES: &[&str] = &["amount", "spend", "cost", "montant", "depense"];
const CHANNEL_ALIASES: &[&str] = &["channel", "platform", "source", "campaign", "canal"];

/// External advertising cost, independent of the sales rows
#[derive(Debug, Clone, Default)]
pub struct AdSpendLedger {
    pub entries: Vec<AdSpendEntry>,
}

impl AdSpendLedger {
    pub fn new(entries: Vec<AdSpendEntry>) -> Self {
        Self { entries }
    }

    /// Spend per calendar day, all channels together
    pub fn total_by_day(&self) -> BTreeMap<NaiveDate, f64> {
        let mut totals = BTreeMap::new();
        for entry in &self.entries {
            *totals.entry(entry.date).or_insert(0.0) += entry.amount;
        }
        totals
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|e| e.amount).sum()
    }

    /// Build from an auxiliary file (date, amount, optional channel).
    ///
    /// Rows whose date does not parse are skipped; amounts that do not parse count as zero.
    pub fn from_dataset(
        dataset: &RawDataset,
        aliases: &AliasTable,
    ) -> Result<(Self, usize), ImportError> {
        let mut amount_aliases: Vec<String> = aliases.aliases(SemanticRole::AdSpend).to_vec();
        amount_aliases.extend(AMOUNT_ALIASES.iter().map(|a| a.to_string()));

        let date_col = detect(&dataset.headers, SemanticRole::Date, aliases)
            .ok_or_else(|| ImportError::MissingColumn("date".to_string()))?;
        let amount_col = detect_by_aliases(&dataset.headers, &amount_aliases)
            .ok_or_else(|| ImportError::MissingColumn("amount".to_string()))?;
        let channel_col = detect_by_aliases(&dataset.headers, CHANNEL_ALIASES);

        tracing::info!(
            "Ad ledger columns: date='{}', amount='{}', channel={:?}",
            date_col,
            amount_col,
            channel_col
        );

        let mut entries = Vec::with_capacity(dataset.rows.len());
        let mut skipped = 0;
        for row in &dataset.rows {
            let Some(date) = row.get(&date_col).and_then(to_date) else {
                skipped += 1;
                continue;
            };
            entries.push(AdSpendEntry {
                date,
                amount: number_or_zero(row.get(&amount_col)),
                channel: channel_col
                    .as_ref()
                    .and_then(|c| row.get(c))
                    .and_then(|v| v.as_text()),
            });
        }

        if skipped > 0 {
            tracing::warn!("Ad ledger: {} rows skipped (unparseable date)", skipped);
        }

        Ok((Self::new(entries), skipped))
    }
}
