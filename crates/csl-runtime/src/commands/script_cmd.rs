use csl_core::ScriptError;

use crate::context::ScriptingContext;
use crate::engine::{Script, ScriptEngine};
use crate::host::ScriptHost;

pub(crate) fn run(
    engine: &ScriptEngine,
    args: &str,
    context: &mut ScriptingContext,
    host: &mut dyn ScriptHost,
) -> Result<(), ScriptError> {
    let (subcommand, rest) = match args.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (args, ""),
    };

    match subcommand {
        "list" => {
            let names = engine.script_names();
            if names.is_empty() {
                host.info_line("No scripts registered");
            } else {
                host.info_line("Registered scripts:");
                for name in names {
                    host.info_line(&format!("  {name}"));
                }
            }
            Ok(())
        }
        "info" => {
            let name = rest;
            match engine.get_script(name) {
                Some(Script::Lines(lines)) => {
                    host.info_line(&format!("Script {name}: {} commands", lines.len()));
                    Ok(())
                }
                Some(Script::Builder(_)) => {
                    host.info_line(&format!("Script {name}: built per run"));
                    Ok(())
                }
                None => Err(ScriptError::new(
                    "SCRIPT_NOT_FOUND",
                    format!("Script not found: {name}"),
                )),
            }
        }
        "run" => {
            let (name, input) = match rest.split_once(char::is_whitespace) {
                Some((name, input)) => (name, input.trim()),
                None => (rest, ""),
            };
            let result = engine.run_script(name, input, context, host)?;
            if let Some(output) = result.output {
                host.chat_output(&output);
            }
            if let Some(error) = result.error {
                host.error_line(&error);
            }
            Ok(())
        }
        _ => Err(ScriptError::new(
            "COMMAND_SYNTAX",
            "Usage: /script list, /script info <name>, or /script run <name> [input]",
        )),
    }
}
