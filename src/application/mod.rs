//! Application services composing the registry with the view store.

pub mod assembler;
pub mod error;
pub mod views;
