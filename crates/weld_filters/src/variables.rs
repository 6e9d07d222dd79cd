//! Placeholder substitution.

use std::collections::BTreeMap;
use std::path::Path;

use weld_core::{Compiler, FileFilter, Filter, FilterError};

const DEFAULT_START: &str = "{{$";
const DEFAULT_END: &str = "}}";

/// Replaces `{{$name}}` placeholders with configured values.
///
/// Usable both as a bundle filter and as a file filter. Unknown placeholders
/// are left in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariablesFilter {
    variables: BTreeMap<String, String>,
    start: String,
    end: String,
}

impl Default for VariablesFilter {
    fn default() -> Self {
        Self {
            variables: BTreeMap::new(),
            start: DEFAULT_START.to_string(),
            end: DEFAULT_END.to_string(),
        }
    }
}

impl VariablesFilter {
    /// Creates a filter with the given variables and the default delimiters.
    pub fn new<I, K, V>(variables: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            variables: variables
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            ..Self::default()
        }
    }

    /// Sets a variable, replacing any previous value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(name.into(), value.into());
    }

    /// Returns the value of a variable.
    pub fn get(&self, name: &str) -> Result<&str, FilterError> {
        self.variables
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| FilterError::VariableNotSet {
                name: name.to_string(),
            })
    }

    /// Returns `true` if the variable is set.
    pub fn has(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    /// Returns all variables.
    pub fn variables(&self) -> &BTreeMap<String, String> {
        &self.variables
    }

    /// Changes the placeholder delimiters.
    pub fn set_delimiter(&mut self, start: impl Into<String>, end: impl Into<String>) -> &mut Self {
        self.start = start.into();
        self.end = end.into();
        self
    }

    /// Substitutes every known placeholder in `code`.
    pub fn apply(&self, code: &str) -> String {
        let mut out = code.to_string();
        for (name, value) in &self.variables {
            let placeholder = format!("{}{}{}", self.start, name, self.end);
            if out.contains(&placeholder) {
                out = out.replace(&placeholder, value);
            }
        }
        out
    }
}

impl Filter for VariablesFilter {
    fn apply(&self, content: String, _compiler: &Compiler) -> Result<String, FilterError> {
        Ok(VariablesFilter::apply(self, &content))
    }
}

impl FileFilter for VariablesFilter {
    fn apply(
        &self,
        content: String,
        _compiler: &Compiler,
        _file: &Path,
    ) -> Result<String, FilterError> {
        Ok(VariablesFilter::apply(self, &content))
    }
}
