use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::normalize::sort_key;

/// Version tag stamped on every [`PageSummary`].
pub const SCHEMA_VERSION: &str = "1.0";

/// One clickable unit: button, link, image link, or image-map area.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(deny_unknown_fields)]
pub struct InteractiveElement {
    pub action_signature: String,
    pub role: String,
    pub visible_text: Option<String>,
    pub aria_label: Option<String>,
    pub disabled: bool,
    pub section_context: Option<String>,
}

/// Borrowed identity tuple used for merging, dedup and tie-breaking.
pub type ActionIdentity<'a> = (
    &'a str,
    &'a str,
    Option<&'a str>,
    Option<&'a str>,
    Option<&'a str>,
);

impl InteractiveElement {
    /// `(action_signature, role, visible_text, aria_label, section_context)`.
    pub fn identity(&self) -> ActionIdentity<'_> {
        (
            &self.action_signature,
            &self.role,
            self.visible_text.as_deref(),
            self.aria_label.as_deref(),
            self.section_context.as_deref(),
        )
    }

    /// Ordinal ordering key; absent values sort as empty strings.
    pub fn sort_key(&self) -> [&str; 5] {
        sort_key([
            Some(self.action_signature.as_str()),
            Some(self.role.as_str()),
            self.visible_text.as_deref(),
            self.aria_label.as_deref(),
            self.section_context.as_deref(),
        ])
    }

    /// Total order: identity key, then `disabled` so fully equal keys still
    /// sort the same way whatever the input order.
    pub fn canonical_cmp(&self, other: &Self) -> Ordering {
        self.sort_key()
            .cmp(&other.sort_key())
            .then(self.disabled.cmp(&other.disabled))
    }
}

/// One form control that collects a value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FieldSummary {
    pub field_signature: String,
    pub label: Option<String>,
    #[serde(rename = "type")]
    pub field_type: String,
    pub required: bool,
    pub placeholder: Option<String>,
    pub options: Option<Vec<String>>,
    pub disabled: bool,
}

impl FieldSummary {
    pub fn sort_key(&self) -> [&str; 3] {
        sort_key([
            Some(self.field_signature.as_str()),
            self.label.as_deref(),
            Some(self.field_type.as_str()),
        ])
    }

    /// Total order: the sort key, then the remaining attributes.
    pub fn canonical_cmp(&self, other: &Self) -> Ordering {
        self.sort_key()
            .cmp(&other.sort_key())
            .then(self.required.cmp(&other.required))
            .then(self.disabled.cmp(&other.disabled))
            .then_with(|| self.placeholder.cmp(&other.placeholder))
            .then_with(|| self.options.cmp(&other.options))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FormSummary {
    pub form_signature: String,
    pub section_context: Option<String>,
    pub fields: Vec<FieldSummary>,
    pub submit_buttons: Vec<InteractiveElement>,
}

impl FormSummary {
    pub fn sort_key(&self) -> [&str; 2] {
        sort_key([
            Some(self.form_signature.as_str()),
            self.section_context.as_deref(),
        ])
    }

    /// Total order: the sort key, then members pairwise.
    pub fn canonical_cmp(&self, other: &Self) -> Ordering {
        self.sort_key()
            .cmp(&other.sort_key())
            .then_with(|| cmp_members(&self.fields, &other.fields, FieldSummary::canonical_cmp))
            .then_with(|| {
                cmp_members(
                    &self.submit_buttons,
                    &other.submit_buttons,
                    InteractiveElement::canonical_cmp,
                )
            })
    }
}

fn cmp_members<T>(left: &[T], right: &[T], cmp: impl Fn(&T, &T) -> Ordering) -> Ordering {
    left.iter()
        .zip(right)
        .map(|(a, b)| cmp(a, b))
        .find(|ordering| ordering.is_ne())
        .unwrap_or_else(|| left.len().cmp(&right.len()))
}

/// Deterministic semantic summary of one rendered page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PageSummary {
    pub schema_version: String,
    pub url: String,
    pub title: String,
    pub page_signature: String,
    pub headers: Vec<String>,
    pub forms: Vec<FormSummary>,
    pub interactive_elements: Vec<InteractiveElement>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn field_type_serializes_as_type() {
        let field = FieldSummary {
            field_signature: "sig".into(),
            label: Some("Email".into()),
            field_type: "email".into(),
            required: true,
            placeholder: None,
            options: None,
            disabled: false,
        };
        let value = serde_json::to_value(&field).unwrap();
        assert_eq!(value["type"], json!("email"));
        assert_eq!(value["placeholder"], json!(null));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let payload = json!({
            "action_signature": "a",
            "role": "link",
            "visible_text": "Help",
            "aria_label": null,
            "disabled": false,
            "section_context": null,
            "xpath": "/html/body/a"
        });
        assert!(serde_json::from_value::<InteractiveElement>(payload).is_err());
    }

    #[test]
    fn sort_key_treats_absent_as_empty() {
        let element = InteractiveElement {
            action_signature: "s".into(),
            role: "button".into(),
            visible_text: None,
            aria_label: Some("Close".into()),
            disabled: false,
            section_context: None,
        };
        assert_eq!(element.sort_key(), ["s", "button", "", "Close", ""]);
        assert_eq!(
            element.identity(),
            ("s", "button", None, Some("Close"), None)
        );
    }
}
