pub mod core;
pub mod filter;
pub mod selector;

// Re-export the main types for convenience
pub use self::core::{Catalog, Category, WordEntry, CZECH_ALPHABET};
pub use self::selector::{select_game_words, select_remediation_words, REMEDIATION_TARGET};
