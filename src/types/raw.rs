//! Records produced by the in-page walker, before normalization.
//!
//! The walker hands back loosely-typed JSON; these structs are the validated
//! landing zone at that boundary. Absent keys fall back to defaults, but a
//! value of the wrong JSON type is a schema failure.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RawPage {
    pub url: Option<String>,
    pub title: Option<String>,
    pub headers: Vec<Option<String>>,
    pub forms: Vec<RawForm>,
    pub interactive_elements: Vec<RawAction>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RawForm {
    pub section_context: Option<String>,
    pub fields: Vec<RawField>,
    pub submit_buttons: Vec<RawAction>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RawField {
    #[serde(rename = "type")]
    pub field_type: Option<String>,
    pub label_for: Option<String>,
    pub label_wrapped: Option<String>,
    pub aria_label: Option<String>,
    pub placeholder: Option<String>,
    pub required: Option<bool>,
    pub options: Option<Vec<Option<String>>>,
    pub disabled: Option<bool>,
    pub section_context: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RawAction {
    pub role: Option<String>,
    pub visible_text: Option<String>,
    pub aria_label: Option<String>,
    pub disabled: Option<bool>,
    pub section_context: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_keys_default() {
        let page: RawPage = serde_json::from_value(json!({"url": "https://example.com"})).unwrap();
        assert_eq!(page.url.as_deref(), Some("https://example.com"));
        assert!(page.headers.is_empty());
        assert!(page.forms.is_empty());
    }

    #[test]
    fn wrong_types_are_rejected() {
        let err = serde_json::from_value::<RawPage>(json!({"forms": "nope"}));
        assert!(err.is_err());

        let err = serde_json::from_value::<RawAction>(json!({"visible_text": 42}));
        assert!(err.is_err());
    }

    #[test]
    fn field_type_reads_type_key() {
        let field: RawField =
            serde_json::from_value(json!({"type": "email", "required": true, "options": null}))
                .unwrap();
        assert_eq!(field.field_type.as_deref(), Some("email"));
        assert_eq!(field.required, Some(true));
        assert_eq!(field.options, None);
    }
}
