use std::sync::OnceLock;

use csl_core::ScriptError;
use regex::Regex;

use crate::context::ScriptingContext;
use crate::expr::{is_quoted, unwrap_quotes};
use crate::host::ScriptHost;

fn confirm_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"(?s)^\$(\w+)\s+(.+)$").expect("confirm regex"))
}

pub(crate) fn run(
    args: &str,
    context: &mut ScriptingContext,
    host: &mut dyn ScriptHost,
) -> Result<(), ScriptError> {
    let Some(caps) = confirm_regex().captures(args) else {
        return Err(ScriptError::new(
            "COMMAND_SYNTAX",
            "Usage: /confirm $name <message>",
        ));
    };

    let name = caps[1].to_string();
    let raw_message = caps[2].trim();
    let message = if is_quoted(raw_message) {
        unwrap_quotes(raw_message).to_string()
    } else {
        context.interpolate(raw_message)
    };

    let confirmed = host.ask_confirmation(&message)?;
    let value = if confirmed { "yes" } else { "no" };
    context.set_variable(&name, value)?;
    host.info_line(&format!("Variable ${name} = {value}"));
    Ok(())
}
