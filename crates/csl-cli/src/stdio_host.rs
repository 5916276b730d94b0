use std::io::{self, BufRead, Write};
use std::thread;
use std::time::Duration;

use csl_core::ScriptError;
use csl_runtime::ScriptHost;

/// Terminal-backed host. Chat output goes to stdout; status streams go
/// to stderr so piped output stays clean. LLM prompts are answered by
/// the operator when `interactive_llm` is set, otherwise the prompt
/// text is echoed back, which keeps scripts runnable without a model.
pub(crate) struct StdioHost {
    pub(crate) interactive_llm: bool,
}

impl StdioHost {
    pub(crate) fn new(interactive_llm: bool) -> Self {
        Self { interactive_llm }
    }

    fn read_line(&self) -> Result<String, ScriptError> {
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line).map_err(|err| {
            ScriptError::new("HUMAN_UNAVAILABLE", format!("Failed to read stdin: {err}"))
        })?;
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

impl ScriptHost for StdioHost {
    fn send_prompt(&mut self, prompt: &str) -> Result<String, ScriptError> {
        if !self.interactive_llm {
            return Ok(prompt.to_string());
        }
        eprintln!("[llm] {prompt}");
        eprint!("[llm reply] ");
        let _ = io::stderr().flush();
        self.read_line()
    }

    fn ask_user(&mut self, message: &str) -> Result<String, ScriptError> {
        eprint!("{message} ");
        let _ = io::stderr().flush();
        self.read_line()
    }

    fn ask_confirmation(&mut self, message: &str) -> Result<bool, ScriptError> {
        eprint!("{message} [y/N] ");
        let _ = io::stderr().flush();
        let answer = self.read_line()?;
        Ok(matches!(answer.trim(), "y" | "Y" | "yes" | "Yes"))
    }

    fn chat_output(&mut self, text: &str) {
        println!("{text}");
    }

    fn info_line(&mut self, text: &str) {
        eprintln!("[info] {text}");
    }

    fn error_line(&mut self, text: &str) {
        eprintln!("[error] {text}");
    }

    fn system_message(&mut self, text: &str) {
        eprintln!("[script] {text}");
    }

    fn sleep_seconds(&mut self, seconds: f64) {
        thread::sleep(Duration::from_secs_f64(seconds));
    }
}
