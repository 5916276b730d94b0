use std::collections::BTreeMap;
use std::time::Duration;

use csl_core::{ContextSnapshot, ScriptError, ScriptResult, ScriptSource};
use csl_runtime::{execute_block, ScriptEngine, ScriptEngineOptions, ScriptHost, ScriptingContext};

pub use csl_core::{FunctionDef, FunctionKind, FunctionValue};
pub use csl_runtime::{NativeFunction, NullHost, RecordingHost, Script};

#[derive(Clone, Default)]
pub struct CreateEngineOptions {
    pub scripts: BTreeMap<String, ScriptSource>,
    pub code_timeout: Option<Duration>,
    pub while_iteration_cap: Option<usize>,
}

pub fn create_engine(options: CreateEngineOptions) -> Result<ScriptEngine, ScriptError> {
    ScriptEngine::new(ScriptEngineOptions {
        scripts: options.scripts,
        code_timeout: options.code_timeout,
        while_iteration_cap: options.while_iteration_cap,
    })
}

/// An engine paired with one execution context. This is the surface an
/// embedding chat agent talks to: feed it statements, run scripts, and
/// snapshot the context between turns.
pub struct ScriptingSession {
    engine: ScriptEngine,
    context: ScriptingContext,
}

impl ScriptingSession {
    pub fn new(options: CreateEngineOptions) -> Result<Self, ScriptError> {
        Ok(Self {
            engine: create_engine(options)?,
            context: ScriptingContext::new(),
        })
    }

    pub fn engine_mut(&mut self) -> &mut ScriptEngine {
        &mut self.engine
    }

    pub fn context(&self) -> &ScriptingContext {
        &self.context
    }

    /// Execute one statement against the session context.
    pub fn execute(
        &mut self,
        statement: &str,
        host: &mut dyn ScriptHost,
    ) -> Result<(), ScriptError> {
        execute_block(&self.engine, statement, &mut self.context, host)
    }

    /// Run a registered script by name.
    pub fn run_script(
        &mut self,
        name: &str,
        input: &str,
        host: &mut dyn ScriptHost,
    ) -> Result<ScriptResult, ScriptError> {
        self.engine.run_script(name, input, &mut self.context, host)
    }

    pub fn reset(&mut self) {
        self.context.reset();
    }

    pub fn snapshot(&self) -> ContextSnapshot {
        self.context.snapshot()
    }

    pub fn restore(&mut self, snapshot: ContextSnapshot) {
        self.context.restore(snapshot);
    }
}
