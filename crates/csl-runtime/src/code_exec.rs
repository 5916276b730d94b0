use std::time::{Duration, Instant};

use csl_core::{FunctionValue, ScriptError};
use rhai::{Dynamic, Engine, Scope};

/// Run a `code` function body in the embedded evaluator. Parameters are
/// injected into the scope as string constants; the script runs under a
/// wall-clock deadline enforced through the evaluator's progress hook.
pub(crate) fn run_code_function(
    body: &str,
    params: &[String],
    args: &[String],
    timeout: Duration,
) -> Result<FunctionValue, ScriptError> {
    let mut engine = Engine::new();
    engine.set_strict_variables(true);

    let deadline = Instant::now() + timeout;
    engine.on_progress(move |_| {
        if Instant::now() >= deadline {
            Some(Dynamic::from("timeout"))
        } else {
            None
        }
    });

    let mut scope = Scope::new();
    for (param, arg) in params.iter().zip(args) {
        scope.push(param.clone(), arg.clone());
    }

    let result = engine
        .eval_with_scope::<Dynamic>(&mut scope, body)
        .map_err(|err| ScriptError::new("FUNCTION_EXECUTION", err.to_string()))?;

    dynamic_to_function_value(result)
}

/// Accepts a string or an array of strings. Any other evaluation result
/// is a type error so silent coercions never reach the chat stream.
fn dynamic_to_function_value(value: Dynamic) -> Result<FunctionValue, ScriptError> {
    if value.is_string() {
        return value
            .into_immutable_string()
            .map(|text| FunctionValue::Text(text.to_string()))
            .map_err(|actual| type_error(actual));
    }

    if value.is_array() {
        let array = value.into_array().map_err(type_error)?;
        let mut items = Vec::with_capacity(array.len());
        for element in array {
            let type_name = element.type_name();
            match element.into_immutable_string() {
                Ok(text) => items.push(text.to_string()),
                Err(_) => return Err(type_error(type_name)),
            }
        }
        return Ok(FunctionValue::Items(items));
    }

    Err(type_error(value.type_name()))
}

fn type_error(actual: &str) -> ScriptError {
    ScriptError::new(
        "FUNCTION_RESULT_TYPE",
        format!("Code function must return a string or an array of strings, got {actual}"),
    )
}
