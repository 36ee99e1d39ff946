//! Error types produced by environment discovery and assignment.

mod constructors;
mod types;

pub use types::EnvError;

#[cfg(test)]
mod tests;
