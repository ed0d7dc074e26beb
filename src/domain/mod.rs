//! Pure content domain: typed items, the immutable registry, and listing rules.

pub mod content;
pub mod error;
pub mod listing;
pub mod registry;
