//! Trial records.
//!
//! Created by explicit user submission, prepended to `trials`, and never
//! mutated afterward. Deletion only happens through a full document import.

use serde::{Deserialize, Serialize};

use super::clock::WallMs;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trial {
    pub ts: WallMs,
    pub app: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Run duration in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format_forcer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Trial {
    pub fn new(app: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            ts: WallMs::default(),
            app: app.into(),
            model: None,
            seed: None,
            duration: None,
            prompt: prompt.into(),
            format_forcer: None,
            notes: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_fields_are_omitted_when_absent() {
        let trial = Trial::new("composer", "make it hum");
        let json = serde_json::to_value(&trial).unwrap();
        let obj = json.as_object().unwrap();
        assert!(!obj.contains_key("model"));
        assert!(!obj.contains_key("seed"));
        assert!(obj.contains_key("prompt"));
    }
}
