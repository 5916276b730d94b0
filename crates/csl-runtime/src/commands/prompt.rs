use std::sync::OnceLock;

use csl_core::ScriptError;
use regex::Regex;

use crate::commands::preview;
use crate::context::ScriptingContext;
use crate::expr::{is_quoted, unwrap_quotes};
use crate::host::ScriptHost;

fn prompt_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"(?s)^\$(\w+)\s+(.+)$").expect("prompt regex"))
}

pub(crate) fn run(
    args: &str,
    context: &mut ScriptingContext,
    host: &mut dyn ScriptHost,
) -> Result<(), ScriptError> {
    let Some(caps) = prompt_regex().captures(args) else {
        return Err(ScriptError::new(
            "COMMAND_SYNTAX",
            "Usage: /prompt $name <message>",
        ));
    };

    let name = caps[1].to_string();
    let raw_message = caps[2].trim();
    let message = if is_quoted(raw_message) {
        unwrap_quotes(raw_message).to_string()
    } else {
        context.interpolate(raw_message)
    };

    let reply = host.ask_user(&message)?;
    context.set_variable(&name, &reply)?;
    host.info_line(&format!("Variable ${name} = {}", preview(&reply, 100)));
    Ok(())
}

#[cfg(test)]
mod prompt_tests {
    use super::*;
    use crate::commands::dispatch;
    use crate::engine::{ScriptEngine, ScriptEngineOptions};
    use crate::host::{NullHost, RecordingHost};

    fn engine() -> ScriptEngine {
        ScriptEngine::new(ScriptEngineOptions::default()).expect("engine")
    }

    #[test]
    fn stores_the_operator_reply() {
        let engine = engine();
        let mut context = ScriptingContext::new();
        let mut host = RecordingHost::new();
        host.queue_user_reply("Alice");

        dispatch(
            &engine,
            "/prompt $name What is your name?",
            &mut context,
            &mut host,
        )
        .expect("dispatch");
        assert_eq!(context.get_variable("name"), Some("Alice"));
        assert_eq!(host.info, vec!["Variable $name = Alice"]);
    }

    #[test]
    fn unquoted_messages_are_interpolated() {
        let engine = engine();
        let mut context = ScriptingContext::new();
        context.set_variable("topic", "lunch").expect("set");
        let mut host = RecordingHost::new();

        dispatch(
            &engine,
            "/prompt $answer Thoughts on $topic?",
            &mut context,
            &mut host,
        )
        .expect("dispatch");
        // Empty reply queue echoes the message, proving what was asked.
        assert_eq!(context.get_variable("answer"), Some("Thoughts on lunch?"));
    }

    #[test]
    fn fails_when_no_human_capability_exists() {
        let engine = engine();
        let mut context = ScriptingContext::new();
        let mut host = NullHost;

        let error = dispatch(&engine, "/prompt $x hello", &mut context, &mut host)
            .expect_err("null host should fail");
        assert_eq!(error.code, "HUMAN_UNAVAILABLE");
    }

    #[test]
    fn missing_message_is_a_syntax_error() {
        let engine = engine();
        let mut context = ScriptingContext::new();
        let mut host = RecordingHost::new();

        let error = dispatch(&engine, "/prompt $x", &mut context, &mut host)
            .expect_err("missing message should fail");
        assert_eq!(error.code, "COMMAND_SYNTAX");
    }
}
