use serde::{Deserialize, Serialize};

/// Meaning category a sales-export column can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SemanticRole {
    NetRevenue,
    TransferRevenue,
    GrossRevenue,
    Date,
    Status,
    Quantity,
    UnitCost,
    ShippingFee,
    OtherFee,
    AdSpend,
    Product,
    Geography,
}

impl SemanticRole {
    /// Stable code used in configuration files and API payloads
    pub fn code(&self) -> &'static str {
        match self {
            SemanticRole::NetRevenue => "net_revenue",
            SemanticRole::TransferRevenue => "transfer_revenue",
            SemanticRole::GrossRevenue => "gross_revenue",
            SemanticRole::Date => "date",
            SemanticRole::Status => "status",
            SemanticRole::Quantity => "quantity",
            SemanticRole::UnitCost => "unit_cost",
            SemanticRole::ShippingFee => "shipping_fee",
            SemanticRole::OtherFee => "other_fee",
            SemanticRole::AdSpend => "ad_spend",
            SemanticRole::Product => "product",
            SemanticRole::Geography => "geography",
        }
    }

    /// Human readable label for pre-filled controls
    pub fn display_name(&self) -> &'static str {
        match self {
            SemanticRole::NetRevenue => "Net transfer value",
            SemanticRole::TransferRevenue => "Transfer value",
            SemanticRole::GrossRevenue => "Sale amount",
            SemanticRole::Date => "Order date",
            SemanticRole::Status => "Status",
            SemanticRole::Quantity => "Quantity",
            SemanticRole::UnitCost => "Unit cost",
            SemanticRole::ShippingFee => "Shipping fees",
            SemanticRole::OtherFee => "Other fees (COD, commission)",
            SemanticRole::AdSpend => "Ad spend",
            SemanticRole::Product => "Product",
            SemanticRole::Geography => "City / region",
        }
    }

    /// All roles in detection order
    pub fn all() -> Vec<SemanticRole> {
        vec![
            SemanticRole::NetRevenue,
            SemanticRole::TransferRevenue,
            SemanticRole::GrossRevenue,
            SemanticRole::Date,
            SemanticRole::Status,
            SemanticRole::Quantity,
            SemanticRole::UnitCost,
            SemanticRole::ShippingFee,
            SemanticRole::OtherFee,
            SemanticRole::AdSpend,
            SemanticRole::Product,
            SemanticRole::Geography,
        ]
    }

    /// Revenue roles, most preferred first
    pub fn revenue_priority() -> [SemanticRole; 3] {
        [
            SemanticRole::NetRevenue,
            SemanticRole::TransferRevenue,
            SemanticRole::GrossRevenue,
        ]
    }

    pub fn is_revenue(self) -> bool {
        Self::revenue_priority().contains(&self)
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::all().into_iter().find(|role| role.code() == code)
    }
}

impl std::fmt::Display for SemanticRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}
