//! Bit-field growth automaton and the recipes that drive it.

/// Incremental frontier automaton.
pub mod automaton;
/// Search index storage widths.
pub mod index;
/// Growth policies over neighbor flags.
pub mod policy;
/// Ordered policy/step recipes.
pub mod recipe;
