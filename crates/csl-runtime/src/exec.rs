use csl_core::ScriptError;

use crate::commands;
use crate::context::ScriptingContext;
use crate::engine::ScriptEngine;
use crate::host::ScriptHost;

/// Execute one statement. Statements starting with `/` are commands;
/// anything else is interpolated and emitted to the chat stream.
pub fn execute_block(
    engine: &ScriptEngine,
    statement: &str,
    context: &mut ScriptingContext,
    host: &mut dyn ScriptHost,
) -> Result<(), ScriptError> {
    let statement = statement.trim();
    if statement.is_empty() {
        return Ok(());
    }

    if statement.starts_with('/') {
        return commands::dispatch(engine, statement, context, host);
    }

    let text = context.interpolate(statement);
    host.chat_output(&text);
    Ok(())
}

#[cfg(test)]
mod exec_tests {
    use super::*;
    use crate::engine::ScriptEngineOptions;
    use crate::host::RecordingHost;

    #[test]
    fn plain_text_is_interpolated_and_emitted() {
        let engine = ScriptEngine::new(ScriptEngineOptions::default()).expect("engine");
        let mut context = ScriptingContext::new();
        context.set_variable("name", "Alice").expect("set");
        let mut host = RecordingHost::new();

        execute_block(&engine, "Hello $name", &mut context, &mut host).expect("execute");
        assert_eq!(host.chat, vec!["Hello Alice"]);
    }

    #[test]
    fn empty_statements_are_ignored() {
        let engine = ScriptEngine::new(ScriptEngineOptions::default()).expect("engine");
        let mut context = ScriptingContext::new();
        let mut host = RecordingHost::new();

        execute_block(&engine, "   ", &mut context, &mut host).expect("execute");
        assert!(host.chat.is_empty());
    }

    #[test]
    fn slash_statements_dispatch_as_commands() {
        let engine = ScriptEngine::new(ScriptEngineOptions::default()).expect("engine");
        let mut context = ScriptingContext::new();
        let mut host = RecordingHost::new();

        execute_block(&engine, "/echo hi there", &mut context, &mut host).expect("execute");
        assert_eq!(host.chat, vec!["hi there"]);
    }
}
