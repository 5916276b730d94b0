pub mod args;
pub mod block;
pub mod script;

pub use args::split_arguments;
pub use block::{extract_block, split_statements, Block};
pub use script::preprocess;
