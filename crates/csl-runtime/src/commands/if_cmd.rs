use std::sync::OnceLock;

use csl_core::ScriptError;
use csl_parser::{extract_block, split_statements};
use regex::Regex;

use crate::context::{is_truthy, ScriptingContext};
use crate::engine::ScriptEngine;
use crate::exec::execute_block;
use crate::host::ScriptHost;

fn condition_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"^\$(\w+)\s*").expect("if condition regex"))
}

pub(crate) fn run(
    engine: &ScriptEngine,
    args: &str,
    context: &mut ScriptingContext,
    host: &mut dyn ScriptHost,
) -> Result<(), ScriptError> {
    let Some(caps) = condition_regex().captures(args) else {
        return Err(ScriptError::new(
            "COMMAND_SYNTAX",
            "Usage: /if $condition { ... } [else { ... }]",
        ));
    };
    let condition = caps[1].to_string();
    let rest_start = caps[0].len();

    let Some(then_block) = extract_block(args, rest_start)? else {
        return Err(ScriptError::new(
            "COMMAND_SYNTAX",
            "Usage: /if $condition { ... } [else { ... }]",
        ));
    };

    let tail = args[then_block.end_pos..].trim_start();
    let else_block = if let Some(after_else) = tail.strip_prefix("else") {
        let Some(block) = extract_block(after_else, 0)? else {
            return Err(ScriptError::new(
                "COMMAND_SYNTAX",
                "Else branch requires a braced block",
            ));
        };
        Some(block)
    } else {
        None
    };

    let branch = if is_truthy(context.get_variable(&condition)) {
        Some(then_block.content)
    } else {
        else_block.map(|block| block.content)
    };

    if let Some(body) = branch {
        for statement in split_statements(&body) {
            execute_block(engine, &statement, context, host)?;
        }
    }
    Ok(())
}
