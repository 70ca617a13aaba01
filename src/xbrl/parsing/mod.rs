pub mod document;
pub mod flatten;

#[cfg(test)]
pub(crate) mod tests;

pub use document::{Document, Node};
pub use flatten::{flatten, Record};
