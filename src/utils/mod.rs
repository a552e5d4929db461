pub mod error;
pub mod types;

pub use error::{DiagError, Result};
pub use types::{Status, Subsystem};
