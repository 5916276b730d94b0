use std::collections::VecDeque;

use csl_core::ScriptError;

/// The host agent boundary. The runtime never talks to a terminal, a
/// human, or an LLM directly; everything flows through this trait.
pub trait ScriptHost {
    /// Send a prompt to the LLM collaborator and return its reply.
    fn send_prompt(&mut self, prompt: &str) -> Result<String, ScriptError>;

    /// Ask the human operator a free-form question.
    fn ask_user(&mut self, message: &str) -> Result<String, ScriptError>;

    /// Ask the human operator a yes/no question.
    fn ask_confirmation(&mut self, message: &str) -> Result<bool, ScriptError>;

    /// Chat-visible output (echoed text, function call results).
    fn chat_output(&mut self, text: &str);

    /// Informational status line (definitions, assignments).
    fn info_line(&mut self, text: &str);

    /// Non-fatal error line (iteration caps, invalid usage notices).
    fn error_line(&mut self, text: &str);

    /// System-level progress message (script runner notifications).
    fn system_message(&mut self, text: &str);

    fn sleep_seconds(&mut self, seconds: f64);
}

/// A host with no capabilities attached. Output is discarded and every
/// interactive capability fails.
#[derive(Debug, Default)]
pub struct NullHost;

impl ScriptHost for NullHost {
    fn send_prompt(&mut self, _prompt: &str) -> Result<String, ScriptError> {
        Err(ScriptError::new(
            "LLM_UNAVAILABLE",
            "No prompt capability is attached to this host.",
        ))
    }

    fn ask_user(&mut self, _message: &str) -> Result<String, ScriptError> {
        Err(ScriptError::new(
            "HUMAN_UNAVAILABLE",
            "No human input capability is attached to this host.",
        ))
    }

    fn ask_confirmation(&mut self, _message: &str) -> Result<bool, ScriptError> {
        Err(ScriptError::new(
            "HUMAN_UNAVAILABLE",
            "No human input capability is attached to this host.",
        ))
    }

    fn chat_output(&mut self, _text: &str) {}
    fn info_line(&mut self, _text: &str) {}
    fn error_line(&mut self, _text: &str) {}
    fn system_message(&mut self, _text: &str) {}
    fn sleep_seconds(&mut self, _seconds: f64) {}
}

/// A host that records every interaction, for embedding tests.
///
/// Prompt and question replies are served from queues; when a queue is
/// empty the prompt text itself is echoed back, which keeps simple
/// tests deterministic without canned data.
#[derive(Debug, Default)]
pub struct RecordingHost {
    pub chat: Vec<String>,
    pub info: Vec<String>,
    pub errors: Vec<String>,
    pub system: Vec<String>,
    pub prompts: Vec<String>,
    pub slept: Vec<f64>,
    pub prompt_replies: VecDeque<String>,
    pub user_replies: VecDeque<String>,
    pub confirmations: VecDeque<bool>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue_prompt_reply(&mut self, reply: impl Into<String>) {
        self.prompt_replies.push_back(reply.into());
    }

    pub fn queue_user_reply(&mut self, reply: impl Into<String>) {
        self.user_replies.push_back(reply.into());
    }

    pub fn queue_confirmation(&mut self, confirmed: bool) {
        self.confirmations.push_back(confirmed);
    }
}

impl ScriptHost for RecordingHost {
    fn send_prompt(&mut self, prompt: &str) -> Result<String, ScriptError> {
        self.prompts.push(prompt.to_string());
        Ok(self
            .prompt_replies
            .pop_front()
            .unwrap_or_else(|| prompt.to_string()))
    }

    fn ask_user(&mut self, message: &str) -> Result<String, ScriptError> {
        Ok(self
            .user_replies
            .pop_front()
            .unwrap_or_else(|| message.to_string()))
    }

    fn ask_confirmation(&mut self, _message: &str) -> Result<bool, ScriptError> {
        Ok(self.confirmations.pop_front().unwrap_or(true))
    }

    fn chat_output(&mut self, text: &str) {
        self.chat.push(text.to_string());
    }

    fn info_line(&mut self, text: &str) {
        self.info.push(text.to_string());
    }

    fn error_line(&mut self, text: &str) {
        self.errors.push(text.to_string());
    }

    fn system_message(&mut self, text: &str) {
        self.system.push(text.to_string());
    }

    fn sleep_seconds(&mut self, seconds: f64) {
        self.slept.push(seconds);
    }
}
