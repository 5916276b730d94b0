use csl_core::ScriptError;

use crate::context::ScriptingContext;
use crate::host::ScriptHost;

pub(crate) fn run(
    args: &str,
    context: &mut ScriptingContext,
    host: &mut dyn ScriptHost,
) -> Result<(), ScriptError> {
    let resolved = context.interpolate(args.trim());
    let seconds = match resolved.parse::<f64>() {
        Ok(seconds) if seconds.is_finite() && seconds >= 0.0 => seconds,
        _ => {
            host.error_line(&format!("Invalid sleep duration: {resolved}"));
            return Ok(());
        }
    };

    host.info_line(&format!("Sleeping for {seconds} seconds..."));
    host.sleep_seconds(seconds);
    host.info_line("Sleep complete");
    Ok(())
}
