pub mod compute;
pub mod metadata;
pub mod registry;

pub use compute::IndicatorContext;
pub use registry::{IndicatorRegistry, INDICATOR_REGISTRY};
