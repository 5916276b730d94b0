use std::sync::OnceLock;

use csl_core::{FunctionDef, FunctionKind, ScriptError};
use csl_parser::extract_block;
use regex::Regex;

use crate::commands::RESERVED_NAMES;
use crate::context::ScriptingContext;
use crate::host::ScriptHost;

fn delete_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"^delete\s+(\w+)$").expect("func delete regex"))
}

fn code_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"(?s)^code\s+(\w+)\s*\(([^)]*)\)\s*(\{.*)$").expect("code func regex")
    })
}

fn arrow_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"(?s)^(?:(static|llm)\s+)?(\w+)\s*\(([^)]*)\)\s*=>\s*(.+)$")
            .expect("arrow func regex")
    })
}

fn parse_params(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|part| part.trim().trim_start_matches('$').to_string())
        .filter(|part| !part.is_empty())
        .collect()
}

fn check_name(name: &str) -> Result<(), ScriptError> {
    if RESERVED_NAMES.contains(&name) {
        return Err(ScriptError::new(
            "COMMAND_SYNTAX",
            format!("Function name '{name}' is reserved"),
        ));
    }
    Ok(())
}

fn signature(name: &str, params: &[String]) -> String {
    let rendered: Vec<String> = params.iter().map(|param| format!("${param}")).collect();
    format!("{name}({})", rendered.join(", "))
}

pub(crate) fn run(
    args: &str,
    context: &mut ScriptingContext,
    host: &mut dyn ScriptHost,
) -> Result<(), ScriptError> {
    if let Some(caps) = delete_regex().captures(args) {
        let name = &caps[1];
        if context.delete_function(name) {
            host.info_line(&format!("Function {name} deleted"));
        } else {
            host.error_line(&format!("Function {name} not defined"));
        }
        return Ok(());
    }

    if let Some(caps) = code_regex().captures(args) {
        let name = caps[1].to_string();
        check_name(&name)?;
        let params = parse_params(&caps[2]);
        let Some(block) = extract_block(&caps[3], 0)? else {
            return Err(ScriptError::new(
                "COMMAND_SYNTAX",
                format!("Code function {name} requires a braced body"),
            ));
        };
        let def = FunctionDef::new(FunctionKind::Code, params, block.content.trim());
        host.info_line(&format!(
            "Code function {} defined",
            signature(&name, &def.params)
        ));
        context.define_function(name, def);
        return Ok(());
    }

    if let Some(caps) = arrow_regex().captures(args) {
        let kind = match caps.get(1).map(|m| m.as_str()) {
            Some("llm") => FunctionKind::Llm,
            _ => FunctionKind::Static,
        };
        let name = caps[2].to_string();
        check_name(&name)?;
        let params = parse_params(&caps[3]);
        let def = FunctionDef::new(kind, params, caps[4].trim());
        let label = match kind {
            FunctionKind::Llm => "LLM",
            _ => "Static",
        };
        host.info_line(&format!(
            "{label} function {} defined",
            signature(&name, &def.params)
        ));
        context.define_function(name, def);
        return Ok(());
    }

    Err(ScriptError::new(
        "COMMAND_SYNTAX",
        "Usage: /func [static|llm] name($a) => body, /func code name($a) { body }, or /func delete name",
    ))
}
