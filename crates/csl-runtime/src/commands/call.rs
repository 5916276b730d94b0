use std::sync::OnceLock;

use csl_core::ScriptError;
use csl_parser::split_arguments;
use regex::Regex;

use crate::context::ScriptingContext;
use crate::engine::ScriptEngine;
use crate::expr::resolve_arguments;
use crate::host::ScriptHost;

fn call_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"(?s)^(\w+)\((.*)\)$").expect("call regex"))
}

pub(crate) fn run(
    engine: &ScriptEngine,
    args: &str,
    context: &mut ScriptingContext,
    host: &mut dyn ScriptHost,
) -> Result<(), ScriptError> {
    let Some(caps) = call_regex().captures(args) else {
        return Err(ScriptError::new(
            "COMMAND_SYNTAX",
            "Usage: /call name(args)",
        ));
    };

    let name = caps[1].to_string();
    let raw_args = split_arguments(&caps[2]);
    let call_args = resolve_arguments(&raw_args, context);
    let value = engine.execute_function(&name, &call_args, context, host)?;
    host.chat_output(&value.into_text());
    Ok(())
}
