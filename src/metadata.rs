//! Artifact Hub package metadata document (`artifacthub-pkg.yml`).
//!
//! The document is kept as an ordered YAML mapping so keys this tool does not
//! manage survive a rewrite in their original position.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde_yaml::{Mapping, Value};

use crate::domain::Change;
use crate::error::{ChartSyncError, Result};

pub const VERSION_KEY: &str = "version";
pub const CREATED_AT_KEY: &str = "createdAt";
pub const CHANGES_KEY: &str = "changes";

/// `createdAt` format: UTC, second precision
pub const CREATED_AT_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PackageMetadata {
    fields: Mapping,
}

impl PackageMetadata {
    /// Parse metadata YAML. Empty or `null` documents give an empty mapping.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(PackageMetadata::default());
        }

        match serde_yaml::from_str::<Value>(content)? {
            Value::Null => Ok(PackageMetadata::default()),
            Value::Mapping(fields) => Ok(PackageMetadata { fields }),
            other => Err(ChartSyncError::metadata(format!(
                "expected a mapping at the top level, found {}",
                value_kind(&other)
            ))),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    pub fn version(&self) -> Option<&str> {
        self.fields.get(VERSION_KEY).and_then(Value::as_str)
    }

    pub fn created_at(&self) -> Option<&str> {
        self.fields.get(CREATED_AT_KEY).and_then(Value::as_str)
    }

    /// Current `changes` list, decoded
    pub fn changes(&self) -> Result<Vec<Change>> {
        match self.fields.get(CHANGES_KEY) {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(value) => Ok(serde_yaml::from_value(value.clone())?),
        }
    }

    /// Raw access to any top-level key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn set_version(&mut self, version: &str) {
        self.fields
            .insert(Value::from(VERSION_KEY), Value::from(version));
    }

    pub fn set_created_at(&mut self, at: DateTime<Utc>) {
        let stamp = at.format(CREATED_AT_FORMAT).to_string();
        self.fields
            .insert(Value::from(CREATED_AT_KEY), Value::from(stamp));
    }

    /// Replace `changes` entirely; entries from earlier releases never survive.
    pub fn replace_changes(&mut self, changes: &[Change]) -> Result<()> {
        let value = serde_yaml::to_value(changes)?;
        self.fields.insert(Value::from(CHANGES_KEY), value);
        Ok(())
    }

    /// Block-style YAML, keys in insertion order
    pub fn to_yaml_string(&self) -> Result<String> {
        Ok(serde_yaml::to_string(&self.fields)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_yaml_string()?)?;
        Ok(())
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
