use serde::{Deserialize, Serialize};

/// How a defined function produces its result when called.
///
/// Native host functions are not represented here: they carry a live
/// callable instead of a body and live only in the runtime's global
/// registry, so they never pass through serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FunctionKind {
    Static,
    Llm,
    Code,
}

/// A user-defined function: `/func [static|llm|code] name($a, $b) => body`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionDef {
    pub kind: FunctionKind,
    pub params: Vec<String>,
    pub body: String,
}

impl FunctionDef {
    pub fn new(kind: FunctionKind, params: Vec<String>, body: impl Into<String>) -> Self {
        Self {
            kind,
            params,
            body: body.into(),
        }
    }
}

/// Result of a function call: a single string, or a sequence of
/// strings (the only value shapes the language has).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FunctionValue {
    Text(String),
    Items(Vec<String>),
}

impl FunctionValue {
    /// Flatten to one string; item sequences join with newlines.
    pub fn into_text(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Items(items) => items.join("\n"),
        }
    }

    /// Flatten to an item sequence; a single string becomes one item.
    pub fn into_items(self) -> Vec<String> {
        match self {
            Self::Text(text) => vec![text],
            Self::Items(items) => items,
        }
    }
}

/// A registered script: either a ready statement list or a multi-line
/// source that still has to go through the preprocessor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScriptSource {
    Lines(Vec<String>),
    Source(String),
}

/// Outcome record of one script run. Failures are represented here,
/// not propagated as errors, except for pre-flight conditions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptResult {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ScriptResult {
    pub fn success(output: impl Into<String>) -> Self {
        Self {
            ok: true,
            output: Some(output.into()),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            output: None,
            error: Some(error.into()),
        }
    }
}

/// Serializable image of one execution context's three stores.
/// Round-tripping through this type is lossless.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextSnapshot {
    pub variables: Vec<(String, String)>,
    pub lists: Vec<(String, Vec<String>)>,
    pub functions: Vec<(String, FunctionDef)>,
}
