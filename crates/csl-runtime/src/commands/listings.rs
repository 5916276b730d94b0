use csl_core::{FunctionKind, ScriptError};

use crate::commands::preview;
use crate::context::ScriptingContext;
use crate::engine::ScriptEngine;
use crate::host::ScriptHost;

pub(crate) fn run_vars(
    context: &mut ScriptingContext,
    host: &mut dyn ScriptHost,
) -> Result<(), ScriptError> {
    if context.variables().is_empty() {
        host.info_line("No variables defined");
        return Ok(());
    }
    host.info_line("Defined variables:");
    for (name, value) in context.variables() {
        host.info_line(&format!("  ${name} = {}", preview(value, 60)));
    }
    Ok(())
}

pub(crate) fn run_lists(
    context: &mut ScriptingContext,
    host: &mut dyn ScriptHost,
) -> Result<(), ScriptError> {
    if context.lists().is_empty() {
        host.info_line("No lists defined");
        return Ok(());
    }
    host.info_line("Defined lists:");
    for (name, items) in context.lists() {
        host.info_line(&format!("  @{name} = [{} items]", items.len()));
    }
    Ok(())
}

pub(crate) fn run_funcs(
    engine: &ScriptEngine,
    context: &mut ScriptingContext,
    host: &mut dyn ScriptHost,
) -> Result<(), ScriptError> {
    let globals = engine.global_function_names();
    if context.functions().is_empty() && globals.is_empty() {
        host.info_line("No functions defined");
        return Ok(());
    }

    if !context.functions().is_empty() {
        host.info_line("Defined functions:");
        for (name, def) in context.functions() {
            let kind = match def.kind {
                FunctionKind::Static => "static",
                FunctionKind::Llm => "llm",
                FunctionKind::Code => "code",
            };
            let params: Vec<String> =
                def.params.iter().map(|param| format!("${param}")).collect();
            host.info_line(&format!("  {name}({}) [{kind}]", params.join(", ")));
        }
    }

    if !globals.is_empty() {
        host.info_line("Registered functions:");
        for name in globals {
            host.info_line(&format!("  {name}"));
        }
    }
    Ok(())
}
