//! Shared plumbing used by every crate in the workspace.

pub mod utils;
