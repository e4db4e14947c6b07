pub mod semantic_role;

pub use semantic_role::SemanticRole;
