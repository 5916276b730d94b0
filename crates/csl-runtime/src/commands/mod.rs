mod call;
mod confirm;
mod echo;
mod for_cmd;
mod func;
mod if_cmd;
mod list;
mod listings;
mod prompt;
mod script_cmd;
mod sleep;
mod var;
mod while_cmd;

use csl_core::ScriptError;

use crate::context::ScriptingContext;
use crate::engine::ScriptEngine;
use crate::host::ScriptHost;

/// Names that can never be used as function names; they would shadow
/// the command words and expression forms.
pub const RESERVED_NAMES: &[&str] = &[
    "var", "list", "func", "call", "echo", "sleep", "if", "else", "for", "while", "in", "script",
    "vars", "lists", "funcs", "prompt", "confirm", "llm", "delete", "static", "code",
];

/// Dispatch one `/command` statement to its handler.
pub fn dispatch(
    engine: &ScriptEngine,
    statement: &str,
    context: &mut ScriptingContext,
    host: &mut dyn ScriptHost,
) -> Result<(), ScriptError> {
    let body = statement.trim_start_matches('/');
    let (word, args) = match body.split_once(char::is_whitespace) {
        Some((word, args)) => (word, args.trim()),
        None => (body, ""),
    };

    match word {
        "var" => var::run(engine, args, context, host),
        "list" => list::run(engine, args, context, host),
        "func" => func::run(args, context, host),
        "call" => call::run(engine, args, context, host),
        "echo" => echo::run(args, context, host),
        "sleep" => sleep::run(args, context, host),
        "if" => if_cmd::run(engine, args, context, host),
        "for" => for_cmd::run(engine, args, context, host),
        "while" => while_cmd::run(engine, args, context, host),
        "vars" => listings::run_vars(context, host),
        "lists" => listings::run_lists(context, host),
        "funcs" => listings::run_funcs(engine, context, host),
        "prompt" => prompt::run(args, context, host),
        "confirm" => confirm::run(args, context, host),
        "script" => script_cmd::run(engine, args, context, host),
        _ => Err(ScriptError::new(
            "COMMAND_UNKNOWN",
            format!("Unknown command: /{word}"),
        )),
    }
}

/// Shorten a value for status lines so huge strings never flood the
/// info stream.
pub(crate) fn preview(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        return value.to_string();
    }
    let head: String = value.chars().take(max_chars).collect();
    format!("{head}...")
}
