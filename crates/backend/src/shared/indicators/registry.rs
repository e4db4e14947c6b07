use contracts::shared::indicators::*;
use once_cell::sync::Lazy;
use std::collections::HashMap;

use super::compute::{profit, IndicatorContext};
use super::metadata::ids;

type ComputeFn = fn(&IndicatorContext) -> IndicatorValue;

pub static INDICATOR_REGISTRY: Lazy<IndicatorRegistry> = Lazy::new(IndicatorRegistry::new);

/// Central registry: maps `IndicatorId` to its compute function.
pub struct IndicatorRegistry {
    fns: HashMap<String, ComputeFn>,
}

impl IndicatorRegistry {
    pub fn new() -> Self {
        let mut fns: HashMap<String, ComputeFn> = HashMap::new();

        fns.insert(ids::gross_revenue().0, profit::compute_gross_revenue);
        fns.insert(ids::net_revenue().0, profit::compute_net_revenue);
        fns.insert(ids::profit_before_ads().0, profit::compute_profit_before_ads);
        fns.insert(ids::profit_after_ads().0, profit::compute_profit_after_ads);
        fns.insert(ids::ads_allocated().0, profit::compute_ads_allocated);
        fns.insert(ids::order_count().0, profit::compute_order_count);
        fns.insert(ids::roas().0, profit::compute_roas);
        fns.insert(ids::cpo().0, profit::compute_cpo);
        fns.insert(
            ids::mean_margin_before_ads().0,
            profit::compute_mean_margin_before_ads,
        );
        fns.insert(
            ids::mean_margin_after_ads().0,
            profit::compute_mean_margin_after_ads,
        );

        Self { fns }
    }

    /// Compute a batch of indicators; unknown ids are skipped.
    pub fn compute(&self, ids: &[IndicatorId], ctx: &IndicatorContext) -> Vec<IndicatorValue> {
        let mut results = Vec::with_capacity(ids.len());

        for id in ids {
            if let Some(compute_fn) = self.fns.get(&id.0) {
                results.push(compute_fn(ctx));
            } else {
                tracing::warn!("indicator {} not found in registry", id.0);
            }
        }

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::indicators::metadata::build_catalog;

    #[test]
    fn test_catalog_and_registry_agree() {
        let registry = IndicatorRegistry::new();
        let catalog = build_catalog();
        assert_eq!(catalog.len(), registry.fns.len());
        for meta in &catalog {
            assert!(registry.fns.contains_key(&meta.id.0), "{}", meta.id.0);
        }
        for id in ids::summary_set() {
            assert!(registry.fns.contains_key(&id.0), "{}", id.0);
        }
    }

    #[test]
    fn test_unknown_ids_are_skipped() {
        let ctx = IndicatorContext { rows: &[] };
        let values = INDICATOR_REGISTRY.compute(
            &[IndicatorId::new("nope"), ids::order_count()],
            &ctx,
        );
        assert_eq!(values.len(), 1);
        assert_eq!(values[0].id, ids::order_count());
    }
}
