//! Header auto-detection: maps loosely named sales-export columns to semantic roles.

pub mod alias_table;
pub mod classifier;
pub mod normalizer;

pub use alias_table::AliasTable;
pub use classifier::{detect, detect_all, detect_by_aliases, detected_mapping};
pub use normalizer::normalize;
