use std::collections::BTreeMap;
use std::sync::OnceLock;

use csl_core::{ContextSnapshot, FunctionDef, ScriptError};
use regex::Regex;

/// A condition value is false iff it is undefined, empty, `"false"`,
/// `"0"`, or `"no"`. Everything else is truthy.
pub fn is_truthy(value: Option<&str>) -> bool {
    match value {
        None => false,
        Some(value) => !(value.is_empty() || value == "false" || value == "0" || value == "no"),
    }
}

/// Per-conversation scripting state: three independent flat namespaces
/// for variables, lists, and locally defined functions. Created empty,
/// cleared on reset, mutated only through the `/var`, `/list`, `/func`
/// command family.
#[derive(Debug, Clone, Default)]
pub struct ScriptingContext {
    variables: BTreeMap<String, String>,
    lists: BTreeMap<String, Vec<String>>,
    functions: BTreeMap<String, FunctionDef>,
}

impl ScriptingContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.variables.clear();
        self.lists.clear();
        self.functions.clear();
    }

    pub fn variables(&self) -> &BTreeMap<String, String> {
        &self.variables
    }

    pub fn lists(&self) -> &BTreeMap<String, Vec<String>> {
        &self.lists
    }

    pub fn functions(&self) -> &BTreeMap<String, FunctionDef> {
        &self.functions
    }

    /// Assign a variable. The variable and list namespaces are
    /// disjoint, so a name already taken by a list is rejected.
    pub fn set_variable(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), ScriptError> {
        let name = name.into();
        if self.lists.contains_key(&name) {
            return Err(ScriptError::new(
                "NAME_CONFLICT",
                format!("Name '{}' already exists as a list (@{})", name, name),
            ));
        }
        self.variables.insert(name, value.into());
        Ok(())
    }

    pub fn get_variable(&self, name: &str) -> Option<&str> {
        self.variables.get(name).map(String::as_str)
    }

    pub fn delete_variable(&mut self, name: &str) -> bool {
        self.variables.remove(name).is_some()
    }

    /// Assign a list, rejecting names already taken by a variable.
    pub fn set_list(
        &mut self,
        name: impl Into<String>,
        items: Vec<String>,
    ) -> Result<(), ScriptError> {
        let name = name.into();
        if self.variables.contains_key(&name) {
            return Err(ScriptError::new(
                "NAME_CONFLICT",
                format!("Name '{}' already exists as a variable (${})", name, name),
            ));
        }
        self.lists.insert(name, items);
        Ok(())
    }

    pub fn get_list(&self, name: &str) -> Option<&Vec<String>> {
        self.lists.get(name)
    }

    pub fn delete_list(&mut self, name: &str) -> bool {
        self.lists.remove(name).is_some()
    }

    pub fn define_function(&mut self, name: impl Into<String>, def: FunctionDef) {
        self.functions.insert(name.into(), def);
    }

    pub fn get_function(&self, name: &str) -> Option<&FunctionDef> {
        self.functions.get(name)
    }

    pub fn delete_function(&mut self, name: &str) -> bool {
        self.functions.remove(name).is_some()
    }

    /// Parameter/loop-variable overlay binding: writes the variable
    /// namespace directly, skipping the cross-namespace conflict check
    /// so a parameter may shadow any name for the call's duration.
    pub(crate) fn bind_variable(&mut self, name: &str, value: &str) {
        self.variables.insert(name.to_string(), value.to_string());
    }

    pub(crate) fn unbind_variable(&mut self, name: &str) {
        self.variables.remove(name);
    }

    pub(crate) fn variables_snapshot(&self) -> BTreeMap<String, String> {
        self.variables.clone()
    }

    pub(crate) fn restore_variables(&mut self, snapshot: BTreeMap<String, String>) {
        self.variables = snapshot;
    }

    /// Substitute `$name` variable tokens and `@name` list tokens
    /// (joined with `", "`). Undefined names become the empty string.
    /// A preceding backslash suppresses substitution; the backslash
    /// itself stays in the output. Inserted values are never
    /// re-scanned, so substitution cannot recurse.
    pub fn interpolate(&self, text: &str) -> String {
        token_regex()
            .replace_all(text, |caps: &regex::Captures<'_>| {
                if caps[0].starts_with('\\') {
                    return caps[0].to_string();
                }
                let name = &caps[2];
                match &caps[1] {
                    "$" => self.variables.get(name).cloned().unwrap_or_default(),
                    _ => self
                        .lists
                        .get(name)
                        .map(|items| items.join(", "))
                        .unwrap_or_default(),
                }
            })
            .into_owned()
    }

    pub fn snapshot(&self) -> ContextSnapshot {
        ContextSnapshot {
            variables: self
                .variables
                .iter()
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect(),
            lists: self
                .lists
                .iter()
                .map(|(name, items)| (name.clone(), items.clone()))
                .collect(),
            functions: self
                .functions
                .iter()
                .map(|(name, def)| (name.clone(), def.clone()))
                .collect(),
        }
    }

    pub fn restore(&mut self, snapshot: ContextSnapshot) {
        self.variables = snapshot.variables.into_iter().collect();
        self.lists = snapshot.lists.into_iter().collect();
        self.functions = snapshot.functions.into_iter().collect();
    }
}

fn token_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"\\?([$@])(\w+)").expect("interpolation token regex"))
}

#[cfg(test)]
mod context_tests {
    use super::*;
    use csl_core::FunctionKind;

    #[test]
    fn truthiness_matches_the_fixed_rule() {
        assert!(!is_truthy(None));
        assert!(!is_truthy(Some("")));
        assert!(!is_truthy(Some("false")));
        assert!(!is_truthy(Some("0")));
        assert!(!is_truthy(Some("no")));
        assert!(is_truthy(Some("yes")));
        assert!(is_truthy(Some("1")));
        assert!(is_truthy(Some("anything")));
    }

    #[test]
    fn interpolates_variables_and_lists() {
        let mut context = ScriptingContext::new();
        assert_eq!(context.interpolate("Hello $name"), "Hello ");

        context.set_variable("name", "Alice").expect("set");
        assert_eq!(context.interpolate("Hello $name"), "Hello Alice");

        context
            .set_list("xs", vec!["a".to_string(), "b".to_string()])
            .expect("set list");
        assert_eq!(context.interpolate("Items: @xs"), "Items: a, b");
        assert_eq!(context.interpolate("@missing here"), " here");
    }

    #[test]
    fn backslash_escape_suppresses_substitution_and_is_kept() {
        let mut context = ScriptingContext::new();
        context.set_variable("name", "Alice").expect("set");
        assert_eq!(context.interpolate(r"say \$name"), r"say \$name");
        assert_eq!(context.interpolate(r"keep \@xs"), r"keep \@xs");
    }

    #[test]
    fn inserted_values_are_not_rescanned() {
        let mut context = ScriptingContext::new();
        context.set_variable("a", "$b").expect("set");
        context.set_variable("b", "deep").expect("set");
        context
            .set_list("xs", vec!["x".to_string()])
            .expect("set list");
        context.set_variable("holder", "@xs").expect("set");

        assert_eq!(context.interpolate("$a"), "$b");
        assert_eq!(context.interpolate("$holder"), "@xs");
    }

    #[test]
    fn variable_and_list_namespaces_conflict_both_ways() {
        let mut context = ScriptingContext::new();
        context
            .set_list("files", vec!["a.txt".to_string()])
            .expect("set list");
        let error = context
            .set_variable("files", "x")
            .expect_err("variable over list should fail");
        assert_eq!(error.code, "NAME_CONFLICT");

        context.set_variable("name", "Alice").expect("set");
        let error = context
            .set_list("name", vec![])
            .expect_err("list over variable should fail");
        assert_eq!(error.code, "NAME_CONFLICT");
    }

    #[test]
    fn reset_clears_all_three_stores() {
        let mut context = ScriptingContext::new();
        context.set_variable("a", "1").expect("set");
        context.set_list("xs", vec!["x".to_string()]).expect("set");
        context.define_function(
            "f",
            FunctionDef::new(FunctionKind::Static, vec![], "\"hi\""),
        );

        context.reset();
        assert!(context.variables().is_empty());
        assert!(context.lists().is_empty());
        assert!(context.functions().is_empty());
    }

    #[test]
    fn snapshot_round_trip_is_lossless() {
        let mut context = ScriptingContext::new();
        context.set_variable("a", "1").expect("set");
        context.set_variable("b", "two").expect("set");
        context
            .set_list("xs", vec!["x".to_string(), "y".to_string()])
            .expect("set");
        context.define_function(
            "greet",
            FunctionDef::new(FunctionKind::Static, vec!["name".to_string()], "\"Hi $name\""),
        );

        let snapshot = context.snapshot();
        let json = serde_json::to_string(&snapshot).expect("serialize");
        let restored_snapshot: ContextSnapshot =
            serde_json::from_str(&json).expect("deserialize");

        let mut restored = ScriptingContext::new();
        restored.restore(restored_snapshot);
        assert_eq!(restored.variables(), context.variables());
        assert_eq!(restored.lists(), context.lists());
        assert_eq!(restored.functions(), context.functions());
    }

    #[test]
    fn last_write_wins_within_a_namespace() {
        let mut context = ScriptingContext::new();
        context.set_variable("x", "first").expect("set");
        context.set_variable("x", "second").expect("set");
        assert_eq!(context.get_variable("x"), Some("second"));
    }
}
