use serde_json::Value;

use crate::domain::{invalid, node_str, Coded};
use crate::error::Result;

/// An API response language.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Language {
    pub code: String,
    pub name: String,
}

impl Language {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }

    /// Decodes a language from its JSON representation.
    pub fn parse(node: &Value) -> Result<Self> {
        let code = node_str(node, "code");
        let name = node_str(node, "name");

        match (code, name) {
            (Some(code), Some(name)) if !code.is_empty() && !name.is_empty() => {
                Ok(Self { code, name })
            }
            _ => Err(invalid("language")),
        }
    }
}

impl Coded for Language {
    fn code(&self) -> &str {
        &self.code
    }
}
