use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use csl_core::{FunctionDef, ScriptError, ScriptSource};

use crate::context::ScriptingContext;

pub const DEFAULT_CODE_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_WHILE_ITERATION_CAP: usize = 1000;

/// A host-supplied callable exposed to scripts as a function. Takes
/// the bound argument values and returns a string or string sequence.
pub type NativeCallable =
    dyn Fn(&[String]) -> Result<csl_core::FunctionValue, ScriptError> + Send + Sync;

#[derive(Clone)]
pub struct NativeFunction {
    pub params: Vec<String>,
    pub callable: Arc<NativeCallable>,
}

impl NativeFunction {
    pub fn new(
        params: Vec<String>,
        callable: impl Fn(&[String]) -> Result<csl_core::FunctionValue, ScriptError>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        Self {
            params,
            callable: Arc::new(callable),
        }
    }
}

/// Entry in the process-wide function registry. Host code may register
/// plain definitions as well as native callables; context-local
/// definitions shadow both.
#[derive(Clone)]
pub enum GlobalFunction {
    Defined(FunctionDef),
    Native(NativeFunction),
}

/// A function resolved for one call, local store first.
#[derive(Clone)]
pub enum ResolvedFunction {
    Defined(FunctionDef),
    Native(NativeFunction),
}

impl ResolvedFunction {
    pub fn params(&self) -> &[String] {
        match self {
            Self::Defined(def) => &def.params,
            Self::Native(native) => &native.params,
        }
    }
}

/// A builder-form script: produces the statement list from the run's
/// input string.
pub type ScriptBuilder = dyn Fn(&str) -> Result<Vec<String>, ScriptError> + Send + Sync;

#[derive(Clone)]
pub enum Script {
    Lines(Vec<String>),
    Builder(Arc<ScriptBuilder>),
}

#[derive(Clone, Default)]
pub struct ScriptEngineOptions {
    pub scripts: BTreeMap<String, ScriptSource>,
    pub code_timeout: Option<Duration>,
    pub while_iteration_cap: Option<usize>,
}

/// Registry of scripts and global functions, plus the function
/// execution and script running machinery. One engine serves many
/// contexts; all per-conversation state lives in `ScriptingContext`.
pub struct ScriptEngine {
    scripts: BTreeMap<String, Script>,
    functions: BTreeMap<String, GlobalFunction>,
    code_timeout: Duration,
    while_iteration_cap: usize,
}

impl std::fmt::Debug for ScriptEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptEngine")
            .field("scripts", &self.scripts.keys().collect::<Vec<_>>())
            .field("functions", &self.functions.keys().collect::<Vec<_>>())
            .field("code_timeout", &self.code_timeout)
            .field("while_iteration_cap", &self.while_iteration_cap)
            .finish()
    }
}

impl ScriptEngine {
    /// Build an engine from configuration. Multi-line script sources
    /// go through the preprocessor here, so malformed scripts fail at
    /// load time rather than mid-run.
    pub fn new(options: ScriptEngineOptions) -> Result<Self, ScriptError> {
        let mut scripts = BTreeMap::new();
        for (name, source) in options.scripts {
            let script = match source {
                ScriptSource::Lines(lines) => Script::Lines(lines),
                ScriptSource::Source(text) => Script::Lines(csl_parser::preprocess(&text)?),
            };
            scripts.insert(name, script);
        }

        Ok(Self {
            scripts,
            functions: BTreeMap::new(),
            code_timeout: options.code_timeout.unwrap_or(DEFAULT_CODE_TIMEOUT),
            while_iteration_cap: options
                .while_iteration_cap
                .unwrap_or(DEFAULT_WHILE_ITERATION_CAP),
        })
    }

    pub fn register_script(&mut self, name: impl Into<String>, script: Script) {
        self.scripts.insert(name.into(), script);
    }

    pub fn get_script(&self, name: &str) -> Option<&Script> {
        self.scripts.get(name)
    }

    pub fn script_names(&self) -> Vec<&str> {
        self.scripts.keys().map(String::as_str).collect()
    }

    pub fn register_function(&mut self, name: impl Into<String>, def: FunctionDef) {
        self.functions.insert(name.into(), GlobalFunction::Defined(def));
    }

    pub fn register_native_function(&mut self, name: impl Into<String>, native: NativeFunction) {
        self.functions.insert(name.into(), GlobalFunction::Native(native));
    }

    pub fn global_function_names(&self) -> Vec<&str> {
        self.functions.keys().map(String::as_str).collect()
    }

    /// Resolve a function by name: context-local definitions first,
    /// then the global registry.
    pub fn resolve_function(
        &self,
        name: &str,
        context: &ScriptingContext,
    ) -> Option<ResolvedFunction> {
        if let Some(def) = context.get_function(name) {
            return Some(ResolvedFunction::Defined(def.clone()));
        }
        match self.functions.get(name) {
            Some(GlobalFunction::Defined(def)) => Some(ResolvedFunction::Defined(def.clone())),
            Some(GlobalFunction::Native(native)) => {
                Some(ResolvedFunction::Native(native.clone()))
            }
            None => None,
        }
    }

    pub(crate) fn code_timeout(&self) -> Duration {
        self.code_timeout
    }

    pub(crate) fn while_iteration_cap(&self) -> usize {
        self.while_iteration_cap
    }
}

#[cfg(test)]
mod engine_tests {
    use super::*;
    use csl_core::{FunctionKind, FunctionValue};

    #[test]
    fn new_preprocesses_source_scripts_at_load_time() {
        let mut scripts = BTreeMap::new();
        scripts.insert(
            "greet".to_string(),
            ScriptSource::Source("/var $who = \"world\";\n/echo Hello $who;\n".to_string()),
        );
        let engine = ScriptEngine::new(ScriptEngineOptions {
            scripts,
            ..Default::default()
        })
        .expect("engine should build");

        let Some(Script::Lines(lines)) = engine.get_script("greet") else {
            panic!("greet should be a statement list");
        };
        assert_eq!(lines, &["/var $who = \"world\"", "/echo Hello $who"]);
    }

    #[test]
    fn new_rejects_malformed_source_scripts() {
        let mut scripts = BTreeMap::new();
        scripts.insert(
            "bad".to_string(),
            ScriptSource::Source("not a command\n".to_string()),
        );
        let error = ScriptEngine::new(ScriptEngineOptions {
            scripts,
            ..Default::default()
        })
        .expect_err("malformed script should fail at load");
        assert_eq!(error.code, "PARSE_INVALID_SCRIPT_LINE");
    }

    #[test]
    fn local_definitions_shadow_the_global_registry() {
        let mut engine = ScriptEngine::new(ScriptEngineOptions::default()).expect("engine");
        engine.register_function(
            "greet",
            FunctionDef::new(FunctionKind::Static, vec![], "\"global\""),
        );

        let mut context = ScriptingContext::new();
        let resolved = engine
            .resolve_function("greet", &context)
            .expect("global should resolve");
        let ResolvedFunction::Defined(def) = resolved else {
            panic!("expected defined function");
        };
        assert_eq!(def.body, "\"global\"");

        context.define_function(
            "greet",
            FunctionDef::new(FunctionKind::Static, vec![], "\"local\""),
        );
        let resolved = engine
            .resolve_function("greet", &context)
            .expect("local should resolve");
        let ResolvedFunction::Defined(def) = resolved else {
            panic!("expected defined function");
        };
        assert_eq!(def.body, "\"local\"");
    }

    #[test]
    fn native_functions_resolve_from_the_registry() {
        let mut engine = ScriptEngine::new(ScriptEngineOptions::default()).expect("engine");
        engine.register_native_function(
            "upper",
            NativeFunction::new(vec!["text".to_string()], |args| {
                Ok(FunctionValue::Text(args[0].to_uppercase()))
            }),
        );

        let context = ScriptingContext::new();
        let resolved = engine
            .resolve_function("upper", &context)
            .expect("native should resolve");
        assert_eq!(resolved.params(), ["text".to_string()]);
    }
}
