//! CLI command implementations

pub(crate) mod common;
pub(crate) mod down;
pub(crate) mod new;
pub(crate) mod redo;
pub(crate) mod skip;
pub(crate) mod status;
pub(crate) mod up;
