pub mod error;
pub mod types;

pub use error::ScriptError;
pub use types::*;
