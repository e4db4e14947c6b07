pub mod dto;

pub use dto::{AggregateRequest, AggregateRow, GroupKey, Metric, ProfitSummaryResponse};
