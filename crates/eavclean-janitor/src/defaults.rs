//! System-default configuration tree
//!
//! Compiled-in configuration defaults, loaded from a TOML or JSON document
//! whose nested tables mirror `/`-delimited config paths:
//!
//! ```toml
//! [web.secure]
//! use_in_frontend = "0"
//!
//! [catalog.frontend]
//! grid_per_page = 12
//! ```

use crate::error::JanitorError;
use eavclean_domain::{SystemDefaults, Value};
use std::path::Path;

/// Configuration default tree
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigTree {
    root: serde_json::Value,
}

impl Default for ConfigTree {
    fn default() -> Self {
        Self::empty()
    }
}

impl ConfigTree {
    /// Tree with no defaults at all
    pub fn empty() -> Self {
        Self {
            root: serde_json::Value::Object(serde_json::Map::new()),
        }
    }

    /// Wrap an already parsed document
    pub fn from_value(root: serde_json::Value) -> Self {
        Self { root }
    }

    /// Parse a TOML document
    pub fn from_toml_str(input: &str) -> Result<Self, JanitorError> {
        let root: serde_json::Value =
            toml::from_str(input).map_err(|e| JanitorError::Config(format!("invalid TOML defaults: {}", e)))?;
        Ok(Self { root })
    }

    /// Parse a JSON document
    pub fn from_json_str(input: &str) -> Result<Self, JanitorError> {
        let root: serde_json::Value = serde_json::from_str(input)
            .map_err(|e| JanitorError::Config(format!("invalid JSON defaults: {}", e)))?;
        Ok(Self { root })
    }

    /// Load a document, choosing the format by extension (`.json` or TOML)
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, JanitorError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| JanitorError::Config(format!("cannot read {}: {}", path.display(), e)))?;

        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&contents)
        } else {
            Self::from_toml_str(&contents)
        }
    }

    fn node(&self, path: &str) -> Option<&serde_json::Value> {
        path.split('/')
            .filter(|segment| !segment.is_empty())
            .try_fold(&self.root, |node, segment| node.as_object()?.get(segment))
    }
}

impl SystemDefaults for ConfigTree {
    fn lookup(&self, path: &str) -> Option<Value> {
        match self.node(path)? {
            serde_json::Value::Null => Some(Value::Null),
            serde_json::Value::String(s) => Some(Value::Text(s.clone())),
            serde_json::Value::Number(n) => Some(Value::Text(n.to_string())),
            serde_json::Value::Bool(b) => Some(Value::Text(if *b { "1" } else { "0" }.to_string())),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => None,
        }
    }
}
