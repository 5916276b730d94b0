use std::sync::OnceLock;

use csl_core::ScriptError;
use csl_parser::split_arguments;
use regex::Regex;

use crate::context::ScriptingContext;
use crate::engine::ScriptEngine;
use crate::host::ScriptHost;

fn llm_expr_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r#"(?s)^llm\(["'](.+)["']\)$"#).expect("llm expression regex"))
}

fn call_expr_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"(?s)^(\w+)\((.*)\)$").expect("call expression regex"))
}

pub(crate) fn is_quoted(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.len() >= 2
        && (bytes[0] == b'"' || bytes[0] == b'\'')
        && bytes[bytes.len() - 1] == bytes[0]
}

/// Strip one pair of matching quotes if the text carries one; otherwise
/// return the text unchanged.
pub(crate) fn unwrap_quotes(text: &str) -> &str {
    if is_quoted(text) {
        &text[1..text.len() - 1]
    } else {
        text
    }
}

/// Resolve the textual arguments of a call: quoted arguments are taken
/// literally with the quotes stripped, unquoted arguments are
/// interpolated against the context.
pub(crate) fn resolve_arguments(raw: &[String], context: &ScriptingContext) -> Vec<String> {
    raw.iter()
        .map(|arg| {
            if is_quoted(arg) {
                unwrap_quotes(arg).to_string()
            } else {
                context.interpolate(arg)
            }
        })
        .collect()
}

/// Evaluate a right-hand-side expression to a string. Three forms, in
/// order: `llm("...")` sends the interpolated prompt to the host,
/// `name(args)` calls a function, anything else is treated as a value
/// (quotes stripped, then interpolated).
pub(crate) fn evaluate_expression(
    engine: &ScriptEngine,
    expression: &str,
    context: &mut ScriptingContext,
    host: &mut dyn ScriptHost,
) -> Result<String, ScriptError> {
    let expression = expression.trim();

    if let Some(caps) = llm_expr_regex().captures(expression) {
        let prompt = context.interpolate(&caps[1]);
        let reply = host.send_prompt(&prompt)?;
        let reply = reply.trim().to_string();
        if reply.is_empty() {
            return Err(ScriptError::new(
                "LLM_EMPTY_RESPONSE",
                "LLM returned an empty response",
            ));
        }
        return Ok(reply);
    }

    if let Some(caps) = call_expr_regex().captures(expression) {
        let name = caps[1].to_string();
        let raw_args = split_arguments(&caps[2]);
        let args = resolve_arguments(&raw_args, context);
        let value = engine.execute_function(&name, &args, context, host)?;
        return Ok(value.into_text());
    }

    Ok(context.interpolate(unwrap_quotes(expression)))
}
