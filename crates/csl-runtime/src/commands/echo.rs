use csl_core::ScriptError;

use crate::context::ScriptingContext;
use crate::host::ScriptHost;

pub(crate) fn run(
    args: &str,
    context: &mut ScriptingContext,
    host: &mut dyn ScriptHost,
) -> Result<(), ScriptError> {
    let text = context.interpolate(args);
    host.chat_output(&text);
    Ok(())
}
