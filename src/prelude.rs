//! Commonly used imports
//!
//! Use `use spex::prelude::*;` for quick access to the most common types and functions.

// Core types
pub use crate::{InitSans, Mixed, Reason, Resume, Sans, Step};

// Continuation builders
pub use crate::build::{from_fn, init, init_from_fn};

// Drivers
pub use crate::page::{PageOptions, page};
pub use crate::sequence::{Pull, SequenceOptions, sequence};
pub use crate::stream::{PushSource, ReadOptions, read};

// Failures and context
pub use crate::{Failure, Spex};
