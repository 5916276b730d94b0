use std::sync::OnceLock;

use csl_core::ScriptError;
use csl_parser::{extract_block, split_statements};
use regex::Regex;

use crate::context::ScriptingContext;
use crate::engine::ScriptEngine;
use crate::exec::execute_block;
use crate::host::ScriptHost;

fn header_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"^\$(\w+)\s+in\s+@(\w+)\s*").expect("for header regex"))
}

pub(crate) fn run(
    engine: &ScriptEngine,
    args: &str,
    context: &mut ScriptingContext,
    host: &mut dyn ScriptHost,
) -> Result<(), ScriptError> {
    let Some(caps) = header_regex().captures(args) else {
        return Err(ScriptError::new(
            "COMMAND_SYNTAX",
            "Usage: /for $item in @list { ... }",
        ));
    };
    let loop_var = caps[1].to_string();
    let list_name = caps[2].to_string();

    let Some(block) = extract_block(args, caps[0].len())? else {
        return Err(ScriptError::new(
            "COMMAND_SYNTAX",
            "Usage: /for $item in @list { ... }",
        ));
    };

    // The iteration order is fixed by taking the items up front; body
    // statements mutating the list do not affect this run.
    let Some(items) = context.get_list(&list_name).cloned() else {
        return Err(ScriptError::new(
            "LIST_NOT_FOUND",
            format!("List @{list_name} not defined"),
        ));
    };

    let statements = split_statements(&block.content);
    let saved = context.get_variable(&loop_var).map(str::to_string);

    let mut outcome = Ok(());
    'iteration: for item in &items {
        context.bind_variable(&loop_var, item);
        for statement in &statements {
            if let Err(error) = execute_block(engine, statement, context, host) {
                outcome = Err(error);
                break 'iteration;
            }
        }
    }

    match saved {
        Some(value) => context.bind_variable(&loop_var, &value),
        None => context.unbind_variable(&loop_var),
    }
    outcome
}
