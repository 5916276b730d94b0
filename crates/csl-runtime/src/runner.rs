use csl_core::{ScriptError, ScriptResult};

use crate::context::ScriptingContext;
use crate::engine::{Script, ScriptEngine};
use crate::exec::execute_block;
use crate::host::ScriptHost;

impl ScriptEngine {
    /// Run a registered script against a context. Statements execute in
    /// order and the first command failure aborts the run; lookup
    /// failures are hard errors, execution failures come back as a
    /// failed `ScriptResult` so the caller can surface them in-band.
    pub fn run_script(
        &self,
        script_name: &str,
        input: &str,
        context: &mut ScriptingContext,
        host: &mut dyn ScriptHost,
    ) -> Result<ScriptResult, ScriptError> {
        let script_name = script_name.trim();
        if script_name.is_empty() {
            return Err(ScriptError::new(
                "SCRIPT_NAME_REQUIRED",
                "Script name is required",
            ));
        }

        let Some(script) = self.get_script(script_name) else {
            return Err(ScriptError::new(
                "SCRIPT_NOT_FOUND",
                format!("Script not found: {script_name}"),
            ));
        };

        let statements = match script {
            Script::Lines(lines) => lines.clone(),
            Script::Builder(builder) => match builder(input) {
                Ok(lines) => lines,
                Err(error) => {
                    host.system_message(&format!(
                        "Script {script_name} failed: {}",
                        error.message
                    ));
                    return Ok(ScriptResult::failure(error.message));
                }
            },
        };

        host.system_message(&format!(
            "Running script: {script_name} with {} commands",
            statements.len()
        ));

        for statement in &statements {
            host.system_message(&format!("Executing: {statement}"));
            if let Err(error) = execute_block(self, statement, context, host) {
                host.system_message(&format!(
                    "Script {script_name} failed: {}",
                    error.message
                ));
                return Ok(ScriptResult::failure(error.message));
            }
        }

        Ok(ScriptResult::success(format!(
            "Script {script_name} completed successfully"
        )))
    }
}
