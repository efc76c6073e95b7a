use serde_json::{json, Map, Value};

use crate::db::operations::Notebook;

pub fn default_settings() -> Map<String, Value> {
    let defaults = json!({
        "exclude_mastered": false,
        "default_direction": "word-to-meaning",
        "default_order": "sequential",
        "card_colors": {
            "front": "blue",
            "back": "light-blue"
        }
    });
    match defaults {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Stored settings as a JSON object. Malformed or non-object text reads as
/// `None`.
pub fn parse_stored(raw: Option<&str>) -> Option<Map<String, Value>> {
    let raw = raw?;
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Some(map),
        Ok(_) => None,
        Err(err) => {
            tracing::warn!(error = %err, "ignoring unreadable notebook settings");
            None
        }
    }
}

impl Notebook {
    pub fn settings_json(&self) -> Option<Map<String, Value>> {
        parse_stored(self.settings.as_deref())
    }

    /// Stored keys laid over the defaults.
    pub fn effective_settings(&self) -> Map<String, Value> {
        let mut merged = default_settings();
        if let Some(stored) = self.settings_json() {
            merged.extend(stored);
        }
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn notebook(settings: Option<&str>) -> Notebook {
        Notebook {
            id: 1,
            name: "TOEIC".to_string(),
            created_at: Utc::now(),
            settings: settings.map(str::to_string),
        }
    }

    #[test]
    fn test_defaults_without_stored_settings() {
        let settings = notebook(None).effective_settings();
        assert_eq!(settings["exclude_mastered"], json!(false));
        assert_eq!(settings["default_direction"], json!("word-to-meaning"));
        assert_eq!(settings["card_colors"]["back"], json!("light-blue"));
    }

    #[test]
    fn test_stored_keys_override_defaults() {
        let nb = notebook(Some(r#"{"exclude_mastered": true, "font": "large"}"#));
        let settings = nb.effective_settings();
        assert_eq!(settings["exclude_mastered"], json!(true));
        assert_eq!(settings["font"], json!("large"));
        assert_eq!(settings["default_order"], json!("sequential"));
    }

    #[test]
    fn test_malformed_settings_read_as_none() {
        assert!(notebook(Some("{not json")).settings_json().is_none());
        assert!(notebook(Some("[1, 2]")).settings_json().is_none());
    }
}
