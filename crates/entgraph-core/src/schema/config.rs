use crate::Result;

use serde::Deserialize;

/// Schema-build options, loadable from JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// If set, prefix all table names with this string
    pub table_name_prefix: Option<String>,
}

impl Config {
    pub fn from_json(src: &str) -> Result<Config> {
        Ok(serde_json::from_str(src)?)
    }
}
