use contracts::enums::SemanticRole;
use std::collections::HashMap;

/// Built-in header aliases per role, most specific first.
///
/// Order matters: the classifier tries aliases in this order and the first alias
/// that matches any column wins.
const DEFAULT_ALIASES: &[(SemanticRole, &[&str])] = &[
    (
        SemanticRole::NetRevenue,
        &["net transfer value", "net_transfervalue", "nettransfervalue", "net"],
    ),
    (
        SemanticRole::TransferRevenue,
        &["transfer value", "transfervalue", "transfer"],
    ),
    (
        SemanticRole::GrossRevenue,
        &["prix vente", "price", "amount", "total", "montant", "revenue", "sale"],
    ),
    (
        SemanticRole::Date,
        &[
            "date",
            "created time",
            "created date",
            "order date",
            "orderdate",
            "datetime",
            "timestamp",
            "data",
        ],
    ),
    (
        SemanticRole::Status,
        &[
            "status",
            "order status",
            "fulfillment status",
            "etat",
            "state",
            "statut",
            "reason",
        ],
    ),
    (
        SemanticRole::Quantity,
        &["quantity", "qty", "qte", "sku quantity", "sku qty", "quantité"],
    ),
    (
        SemanticRole::UnitCost,
        &[
            "prix achat",
            "cost",
            "prix article",
            "purchase price",
            "unit cost",
            "cost price",
        ],
    ),
    (
        SemanticRole::ShippingFee,
        &[
            "shipping fees",
            "delivery fees",
            "frais de livraison",
            "livraison",
            "shipping",
            "delivery",
            "fulfillment fees",
            "frais expédition",
            "frais transport",
        ],
    ),
    (
        SemanticRole::OtherFee,
        &[
            "cod fees",
            "cod",
            "commission",
            "service fees",
            "payment fees",
            "frais service",
            "frais paiement",
            "frais commission",
        ],
    ),
    (
        SemanticRole::AdSpend,
        &[
            "ads spend",
            "ad spend",
            "advertising",
            "marketing",
            "facebook ads",
            "google ads",
            "tiktok ads",
            "sponsored",
            "ad_cost",
            "campaign spend",
        ],
    ),
    (
        SemanticRole::Product,
        &[
            "product",
            "product name",
            "sku",
            "item",
            "title",
            "designation",
            "article",
        ],
    ),
    (
        SemanticRole::Geography,
        &["city", "ville", "locality", "region"],
    ),
];

/// Role → ordered alias list. Data, not code: new aliases come from configuration.
#[derive(Debug, Clone)]
pub struct AliasTable {
    aliases: HashMap<SemanticRole, Vec<String>>,
}

impl AliasTable {
    /// Table without any alias
    pub fn empty() -> Self {
        Self {
            aliases: HashMap::new(),
        }
    }

    /// Aliases of `role` in priority order (empty slice for unknown roles)
    pub fn aliases(&self, role: SemanticRole) -> &[String] {
        self.aliases.get(&role).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Replace the alias list of a role
    pub fn set(&mut self, role: SemanticRole, aliases: Vec<String>) {
        self.aliases.insert(role, aliases);
    }

    /// Append aliases after the existing ones (lowest priority)
    pub fn extend<I, S>(&mut self, role: SemanticRole, aliases: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let list = self.aliases.entry(role).or_default();
        for alias in aliases {
            let alias = alias.into();
            if !list.contains(&alias) {
                list.push(alias);
            }
        }
    }

    /// Built-in table plus the `[aliases]` section of the config (role code → aliases).
    /// Unknown role codes are logged and ignored.
    pub fn with_extra(extra: &HashMap<String, Vec<String>>) -> Self {
        let mut table = Self::default();
        for (code, aliases) in extra {
            match SemanticRole::from_code(code) {
                Some(role) => table.extend(role, aliases.iter().cloned()),
                None => tracing::warn!("Unknown role '{}' in [aliases] config, ignored", code),
            }
        }
        table
    }
}

impl Default for AliasTable {
    fn default() -> Self {
        let aliases = DEFAULT_ALIASES
            .iter()
            .map(|(role, list)| (*role, list.iter().map(|a| a.to_string()).collect()))
            .collect();
        Self { aliases }
    }
}
