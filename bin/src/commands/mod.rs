//! CLI command implementations.

pub(crate) mod state;
pub(crate) mod sync;
pub(crate) mod windows;
