//! Building suspendable computations from closures
//!
//! This module provides functions and types for creating new stages.

mod func;
mod init;

pub use func::{FromFn, from_fn};
pub use init::{init, init_from_fn};
