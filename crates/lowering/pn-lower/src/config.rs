//! Fixed names used by the lowering

use serde::{Deserialize, Serialize};

/// Names the target runtime expects
///
/// Every field has a default matching the runtime, so a config file only
/// lists what it overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LowerConfig {
    /// Prefix of the surrogate given to a shadowing parameter
    pub param_prefix: String,
    /// Identifier of the runtime context object
    pub global_namespace: String,
    /// Property of the context holding global state cells
    pub global_scope: String,
    /// Prefix of a global state cell key
    pub global_key_prefix: String,
}

impl Default for LowerConfig {
    fn default() -> Self {
        Self {
            param_prefix: "_param_".to_owned(),
            global_namespace: "$".to_owned(),
            global_scope: "let".to_owned(),
            global_key_prefix: "glb1_".to_owned(),
        }
    }
}

impl LowerConfig {
    /// Surrogate name for a shadowing parameter
    pub fn surrogate(&self, name: &str) -> String {
        format!("{}{name}", self.param_prefix)
    }

    /// Key of the global state cell for `name`
    pub fn global_key(&self, name: &str) -> String {
        format!("{}{name}", self.global_key_prefix)
    }
}
