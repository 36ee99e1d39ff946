//! Test helpers shared across the ortho-env workspace.
//!
//! Loading from the real process environment means tests mutate global
//! state. The [`env`] module serialises those mutations and restores every
//! variable it touched.

pub mod env;
