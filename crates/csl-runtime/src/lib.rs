mod code_exec;
pub mod commands;
pub mod context;
pub mod engine;
mod exec;
mod expr;
mod functions;
pub mod host;
mod runner;

pub use commands::dispatch;
pub use context::{is_truthy, ScriptingContext};
pub use engine::{
    NativeFunction, ResolvedFunction, Script, ScriptEngine, ScriptEngineOptions,
    DEFAULT_CODE_TIMEOUT, DEFAULT_WHILE_ITERATION_CAP,
};
pub use exec::execute_block;
pub use host::{NullHost, RecordingHost, ScriptHost};
