use std::sync::OnceLock;

use csl_core::ScriptError;
use csl_parser::split_arguments;
use regex::Regex;

use crate::context::ScriptingContext;
use crate::engine::ScriptEngine;
use crate::expr::resolve_arguments;
use crate::host::ScriptHost;

fn delete_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"^delete\s+@(\w+)$").expect("list delete regex"))
}

fn call_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"(?s)^@(\w+)\s*=\s*(\w+)\((.*)\)$").expect("list call regex"))
}

fn literal_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"(?s)^@(\w+)\s*=\s*\[(.*)\]$").expect("list literal regex"))
}

pub(crate) fn run(
    engine: &ScriptEngine,
    args: &str,
    context: &mut ScriptingContext,
    host: &mut dyn ScriptHost,
) -> Result<(), ScriptError> {
    if let Some(caps) = delete_regex().captures(args) {
        let name = &caps[1];
        if context.delete_list(name) {
            host.info_line(&format!("List @{name} deleted"));
        } else {
            host.error_line(&format!("List @{name} not defined"));
        }
        return Ok(());
    }

    // Function-call form is matched first so `f([x])` never reads as a
    // literal.
    if let Some(caps) = call_regex().captures(args) {
        let name = caps[1].to_string();
        let function = caps[2].to_string();
        let raw_args = split_arguments(&caps[3]);
        let call_args = resolve_arguments(&raw_args, context);
        let value = engine.execute_function(&function, &call_args, context, host)?;
        let items = value.into_items();
        context.set_list(&name, items)?;
        let count = context.get_list(&name).map_or(0, Vec::len);
        host.info_line(&format!("List @{name} = [{count} items]"));
        return Ok(());
    }

    if let Some(caps) = literal_regex().captures(args) {
        let name = caps[1].to_string();
        let items: Vec<String> = resolve_arguments(&split_arguments(&caps[2]), context)
            .into_iter()
            .filter(|item| !item.is_empty())
            .collect();
        let count = items.len();
        context.set_list(&name, items)?;
        host.info_line(&format!("List @{name} = [{count} items]"));
        return Ok(());
    }

    Err(ScriptError::new(
        "COMMAND_SYNTAX",
        "Usage: /list @name = [items] or /list @name = function(args) or /list delete @name",
    ))
}

#[cfg(test)]
mod list_tests {
    use super::*;
    use crate::commands::dispatch;
    use crate::engine::{NativeFunction, ScriptEngineOptions};
    use crate::host::RecordingHost;
    use csl_core::FunctionValue;

    fn engine() -> ScriptEngine {
        ScriptEngine::new(ScriptEngineOptions::default()).expect("engine")
    }

    #[test]
    fn literal_items_split_on_top_level_commas() {
        let engine = engine();
        let mut context = ScriptingContext::new();
        let mut host = RecordingHost::new();

        dispatch(
            &engine,
            r#"/list @xs = ["a", "b, with comma", c]"#,
            &mut context,
            &mut host,
        )
        .expect("dispatch");
        assert_eq!(
            context.get_list("xs"),
            Some(&vec![
                "a".to_string(),
                "b, with comma".to_string(),
                "c".to_string()
            ])
        );
        assert_eq!(host.info, vec!["List @xs = [3 items]"]);
    }

    #[test]
    fn unquoted_items_are_interpolated_and_empties_dropped() {
        let engine = engine();
        let mut context = ScriptingContext::new();
        context.set_variable("name", "Alice").expect("set");
        let mut host = RecordingHost::new();

        dispatch(
            &engine,
            "/list @xs = [$name, $missing, last]",
            &mut context,
            &mut host,
        )
        .expect("dispatch");
        assert_eq!(
            context.get_list("xs"),
            Some(&vec!["Alice".to_string(), "last".to_string()])
        );
    }

    #[test]
    fn function_call_form_collects_items() {
        let mut engine = engine();
        engine.register_native_function(
            "split_csv",
            NativeFunction::new(vec!["text".to_string()], |args| {
                Ok(FunctionValue::Items(
                    args[0].split(',').map(|part| part.trim().to_string()).collect(),
                ))
            }),
        );
        let mut context = ScriptingContext::new();
        let mut host = RecordingHost::new();

        dispatch(
            &engine,
            r#"/list @parts = split_csv("a, b, c")"#,
            &mut context,
            &mut host,
        )
        .expect("dispatch");
        assert_eq!(
            context.get_list("parts"),
            Some(&vec!["a".to_string(), "b".to_string(), "c".to_string()])
        );
    }

    #[test]
    fn text_results_become_single_item_lists() {
        let mut engine = engine();
        engine.register_native_function(
            "one",
            NativeFunction::new(vec![], |_| Ok(FunctionValue::Text("only".to_string()))),
        );
        let mut context = ScriptingContext::new();
        let mut host = RecordingHost::new();

        dispatch(&engine, "/list @xs = one()", &mut context, &mut host).expect("dispatch");
        assert_eq!(context.get_list("xs"), Some(&vec!["only".to_string()]));
    }

    #[test]
    fn delete_removes_the_list() {
        let engine = engine();
        let mut context = ScriptingContext::new();
        context.set_list("xs", vec!["a".to_string()]).expect("set");
        let mut host = RecordingHost::new();

        dispatch(&engine, "/list delete @xs", &mut context, &mut host).expect("dispatch");
        assert_eq!(context.get_list("xs"), None);

        dispatch(&engine, "/list delete @xs", &mut context, &mut host).expect("dispatch");
        assert_eq!(host.errors, vec!["List @xs not defined"]);
    }

    #[test]
    fn assignment_over_a_variable_name_is_rejected() {
        let engine = engine();
        let mut context = ScriptingContext::new();
        context.set_variable("name", "x").expect("set");
        let mut host = RecordingHost::new();

        let error = dispatch(&engine, "/list @name = [a]", &mut context, &mut host)
            .expect_err("conflict should fail");
        assert_eq!(error.code, "NAME_CONFLICT");
    }

    #[test]
    fn malformed_assignment_is_a_syntax_error() {
        let engine = engine();
        let mut context = ScriptingContext::new();
        let mut host = RecordingHost::new();

        let error = dispatch(&engine, "/list @xs = a, b", &mut context, &mut host)
            .expect_err("missing brackets should fail");
        assert_eq!(error.code, "COMMAND_SYNTAX");
    }
}
