use csl_core::{FunctionKind, FunctionValue, ScriptError};

use crate::code_exec::run_code_function;
use crate::context::ScriptingContext;
use crate::engine::{ResolvedFunction, ScriptEngine};
use crate::expr::unwrap_quotes;
use crate::host::ScriptHost;

impl ScriptEngine {
    /// Call a function by name with already-resolved argument values.
    ///
    /// Parameters are bound as a variable overlay for the duration of
    /// the call: the whole variable namespace is snapshotted first and
    /// restored unconditionally afterwards, so a parameter may shadow
    /// an existing variable without clobbering it.
    pub fn execute_function(
        &self,
        name: &str,
        args: &[String],
        context: &mut ScriptingContext,
        host: &mut dyn ScriptHost,
    ) -> Result<FunctionValue, ScriptError> {
        let Some(function) = self.resolve_function(name, context) else {
            return Err(ScriptError::new(
                "FUNCTION_NOT_FOUND",
                format!("Function {name} not defined"),
            ));
        };

        let params = function.params();
        if params.len() != args.len() {
            return Err(ScriptError::new(
                "FUNCTION_ARITY",
                format!(
                    "Function {name} expects {} arguments, got {}",
                    params.len(),
                    args.len()
                ),
            ));
        }

        let saved = context.variables_snapshot();
        for (param, arg) in params.iter().zip(args) {
            context.bind_variable(param, arg);
        }

        let result = self.dispatch_function(&function, args, context, host);
        context.restore_variables(saved);
        result
    }

    fn dispatch_function(
        &self,
        function: &ResolvedFunction,
        args: &[String],
        context: &mut ScriptingContext,
        host: &mut dyn ScriptHost,
    ) -> Result<FunctionValue, ScriptError> {
        match function {
            ResolvedFunction::Defined(def) => match def.kind {
                FunctionKind::Static => {
                    let text = context.interpolate(unwrap_quotes(def.body.trim()));
                    Ok(FunctionValue::Text(text))
                }
                FunctionKind::Llm => {
                    let prompt = context.interpolate(unwrap_quotes(def.body.trim()));
                    let reply = host.send_prompt(&prompt)?;
                    let reply = reply.trim().to_string();
                    if reply.is_empty() {
                        return Err(ScriptError::new(
                            "LLM_EMPTY_RESPONSE",
                            "LLM returned an empty response",
                        ));
                    }
                    Ok(FunctionValue::Text(reply))
                }
                FunctionKind::Code => {
                    run_code_function(&def.body, &def.params, args, self.code_timeout())
                        .map_err(execution_error)
                }
            },
            ResolvedFunction::Native(native) => {
                (native.callable)(args).map_err(execution_error)
            }
        }
    }
}

/// Wrap code and native failures in a uniform message while keeping
/// the original code intact.
fn execution_error(error: ScriptError) -> ScriptError {
    if error.code == "FUNCTION_RESULT_TYPE" {
        return error;
    }
    ScriptError::new(
        error.code,
        format!("Function execution error: {}", error.message),
    )
}

#[cfg(test)]
mod function_tests {
    use super::*;
    use crate::engine::{NativeFunction, ScriptEngineOptions};
    use crate::host::RecordingHost;
    use csl_core::FunctionDef;

    fn engine() -> ScriptEngine {
        ScriptEngine::new(ScriptEngineOptions::default()).expect("engine")
    }

    #[test]
    fn unknown_function_reports_not_defined() {
        let engine = engine();
        let mut context = ScriptingContext::new();
        let mut host = RecordingHost::new();

        let error = engine
            .execute_function("ghost", &[], &mut context, &mut host)
            .expect_err("unknown function should fail");
        assert_eq!(error.code, "FUNCTION_NOT_FOUND");
        assert_eq!(error.message, "Function ghost not defined");
    }

    #[test]
    fn arity_mismatch_is_rejected_before_binding() {
        let mut engine = engine();
        engine.register_function(
            "pair",
            FunctionDef::new(
                FunctionKind::Static,
                vec!["a".to_string(), "b".to_string()],
                "\"$a $b\"",
            ),
        );
        let mut context = ScriptingContext::new();
        let mut host = RecordingHost::new();

        let error = engine
            .execute_function("pair", &["x".to_string()], &mut context, &mut host)
            .expect_err("wrong arity should fail");
        assert_eq!(error.code, "FUNCTION_ARITY");
        assert_eq!(error.message, "Function pair expects 2 arguments, got 1");
    }

    #[test]
    fn static_function_interpolates_bound_parameters() {
        let mut engine = engine();
        engine.register_function(
            "greet",
            FunctionDef::new(
                FunctionKind::Static,
                vec!["who".to_string()],
                "\"Hello $who\"",
            ),
        );
        let mut context = ScriptingContext::new();
        let mut host = RecordingHost::new();

        let value = engine
            .execute_function("greet", &["World".to_string()], &mut context, &mut host)
            .expect("call");
        assert_eq!(value, FunctionValue::Text("Hello World".to_string()));
    }

    #[test]
    fn parameter_overlay_is_restored_after_the_call() {
        let mut engine = engine();
        engine.register_function(
            "shadow",
            FunctionDef::new(FunctionKind::Static, vec!["x".to_string()], "\"$x\""),
        );
        let mut context = ScriptingContext::new();
        context.set_variable("x", "outer").expect("set");
        let mut host = RecordingHost::new();

        let value = engine
            .execute_function("shadow", &["inner".to_string()], &mut context, &mut host)
            .expect("call");
        assert_eq!(value, FunctionValue::Text("inner".to_string()));
        assert_eq!(context.get_variable("x"), Some("outer"));
    }

    #[test]
    fn overlay_is_restored_even_when_the_call_fails() {
        let mut engine = engine();
        engine.register_function(
            "ask",
            FunctionDef::new(FunctionKind::Llm, vec!["q".to_string()], "\"$q\""),
        );
        let mut context = ScriptingContext::new();
        let mut host = crate::host::NullHost;

        let error = engine
            .execute_function("ask", &["hi".to_string()], &mut context, &mut host)
            .expect_err("null host should fail");
        assert_eq!(error.code, "LLM_UNAVAILABLE");
        assert_eq!(context.get_variable("q"), None);
    }

    #[test]
    fn llm_function_sends_the_interpolated_prompt() {
        let mut engine = engine();
        engine.register_function(
            "summarize",
            FunctionDef::new(
                FunctionKind::Llm,
                vec!["text".to_string()],
                "\"Summarize: $text\"",
            ),
        );
        let mut context = ScriptingContext::new();
        let mut host = RecordingHost::new();
        host.queue_prompt_reply("a summary");

        let value = engine
            .execute_function(
                "summarize",
                &["long text".to_string()],
                &mut context,
                &mut host,
            )
            .expect("call");
        assert_eq!(value, FunctionValue::Text("a summary".to_string()));
        assert_eq!(host.prompts, vec!["Summarize: long text"]);
    }

    #[test]
    fn code_function_runs_with_arguments_in_scope() {
        let mut engine = engine();
        engine.register_function(
            "shout",
            FunctionDef::new(
                FunctionKind::Code,
                vec!["text".to_string()],
                "text.to_upper()",
            ),
        );
        let mut context = ScriptingContext::new();
        let mut host = RecordingHost::new();

        let value = engine
            .execute_function("shout", &["hello".to_string()], &mut context, &mut host)
            .expect("call");
        assert_eq!(value, FunctionValue::Text("HELLO".to_string()));
    }

    #[test]
    fn code_failures_carry_the_execution_error_prefix() {
        let mut engine = engine();
        engine.register_function(
            "broken",
            FunctionDef::new(FunctionKind::Code, vec![], "nonsense("),
        );
        let mut context = ScriptingContext::new();
        let mut host = RecordingHost::new();

        let error = engine
            .execute_function("broken", &[], &mut context, &mut host)
            .expect_err("syntax error should fail");
        assert_eq!(error.code, "FUNCTION_EXECUTION");
        assert!(error.message.starts_with("Function execution error: "));
    }

    #[test]
    fn native_function_receives_resolved_arguments() {
        let mut engine = engine();
        engine.register_native_function(
            "join",
            NativeFunction::new(vec!["a".to_string(), "b".to_string()], |args| {
                Ok(FunctionValue::Text(format!("{}-{}", args[0], args[1])))
            }),
        );
        let mut context = ScriptingContext::new();
        let mut host = RecordingHost::new();

        let value = engine
            .execute_function(
                "join",
                &["x".to_string(), "y".to_string()],
                &mut context,
                &mut host,
            )
            .expect("call");
        assert_eq!(value, FunctionValue::Text("x-y".to_string()));
    }
}
