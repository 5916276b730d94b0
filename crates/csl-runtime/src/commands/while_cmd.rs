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
    REGEX.get_or_init(|| Regex::new(r"^\$(\w+)\s*").expect("while condition regex"))
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
            "Usage: /while $condition { ... }",
        ));
    };
    let condition = caps[1].to_string();

    let Some(block) = extract_block(args, caps[0].len())? else {
        return Err(ScriptError::new(
            "COMMAND_SYNTAX",
            "Usage: /while $condition { ... }",
        ));
    };

    let statements = split_statements(&block.content);
    let cap = engine.while_iteration_cap();

    let mut iterations = 0usize;
    while is_truthy(context.get_variable(&condition)) {
        if iterations >= cap {
            host.error_line(&format!("While loop exceeded maximum iterations ({cap})"));
            return Ok(());
        }
        iterations += 1;
        for statement in &statements {
            execute_block(engine, statement, context, host)?;
        }
    }
    Ok(())
}
