use std::sync::OnceLock;

use csl_core::ScriptError;
use regex::Regex;

use crate::commands::preview;
use crate::context::ScriptingContext;
use crate::engine::ScriptEngine;
use crate::expr::evaluate_expression;
use crate::host::ScriptHost;

fn delete_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"^delete\s+\$(\w+)$").expect("var delete regex"))
}

fn assign_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"(?s)^\$(\w+)\s*=\s*(.+)$").expect("var assign regex"))
}

pub(crate) fn run(
    engine: &ScriptEngine,
    args: &str,
    context: &mut ScriptingContext,
    host: &mut dyn ScriptHost,
) -> Result<(), ScriptError> {
    if let Some(caps) = delete_regex().captures(args) {
        let name = &caps[1];
        if context.delete_variable(name) {
            host.info_line(&format!("Variable ${name} deleted"));
        } else {
            host.error_line(&format!("Variable ${name} not defined"));
        }
        return Ok(());
    }

    let Some(caps) = assign_regex().captures(args) else {
        return Err(ScriptError::new(
            "COMMAND_SYNTAX",
            "Usage: /var $name = <expression> or /var delete $name",
        ));
    };

    let name = caps[1].to_string();
    let value = evaluate_expression(engine, &caps[2], context, host)?;
    context.set_variable(&name, &value)?;
    host.info_line(&format!("Variable ${name} = {}", preview(&value, 100)));
    Ok(())
}
