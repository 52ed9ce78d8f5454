//! Page model builder: raw walker records in, signed and ordered
//! [`PageSummary`] out.
//!
//! Every collection is sorted by an explicit ordinal key, so the summary is a
//! function of page content rather than of DOM traversal order.

use serde_json::Value;

use crate::error::ExtractionError;
use crate::normalize::{normalize_text, resolve_field_label};
use crate::signature::{action_signature, field_signature, form_signature, page_signature};
use crate::types::{
    FieldSummary, FormSummary, InteractiveElement, PageSummary, RawAction, RawField, RawForm,
    RawPage, SCHEMA_VERSION,
};

/// Validate the walker output and assemble a [`PageSummary`].
///
/// A shape mismatch is reported as `SCHEMA_VALIDATION_FAILED`; a non-object
/// payload as `EXTRACTION_FAILED`. No partial summary is ever returned.
pub fn build_page_summary(raw: Value) -> Result<PageSummary, ExtractionError> {
    if !raw.is_object() {
        let kind = json_kind(&raw);
        return Err(ExtractionError::semantic(format!(
            "walker returned {kind}, expected an object"
        )));
    }
    let raw: RawPage = serde_json::from_value(raw).map_err(ExtractionError::schema)?;
    Ok(summarize(raw))
}

/// Assemble a [`PageSummary`] from an already validated record.
pub fn summarize(raw: RawPage) -> PageSummary {
    let mut headers: Vec<String> = raw
        .headers
        .iter()
        .filter_map(|header| normalize_text(header.as_deref()))
        .collect();
    headers.sort_by_cached_key(|header| (header.to_lowercase(), header.clone()));

    let mut forms: Vec<FormSummary> = raw.forms.iter().map(to_form).collect();
    forms.sort_by(FormSummary::canonical_cmp);

    let mut interactive: Vec<InteractiveElement> =
        raw.interactive_elements.iter().map(to_interactive).collect();
    sort_actions(&mut interactive);

    let raw_title = raw.title.as_deref().unwrap_or_default();
    let page_signature = page_signature(raw_title, &headers, forms.len(), interactive.len());

    PageSummary {
        schema_version: SCHEMA_VERSION.to_string(),
        url: raw.url.unwrap_or_default(),
        title: normalize_text(Some(raw_title)).unwrap_or_default(),
        page_signature,
        headers,
        forms,
        interactive_elements: interactive,
    }
}

pub(crate) fn sort_actions(actions: &mut [InteractiveElement]) {
    actions.sort_by(InteractiveElement::canonical_cmp);
}

pub(crate) fn to_interactive(raw: &RawAction) -> InteractiveElement {
    let visible_text = normalize_text(raw.visible_text.as_deref());
    let role = normalize_text(raw.role.as_deref()).unwrap_or_else(|| "button".to_string());
    let section_context = normalize_text(raw.section_context.as_deref());
    InteractiveElement {
        action_signature: action_signature(
            visible_text.as_deref(),
            &role,
            section_context.as_deref(),
        ),
        role,
        visible_text,
        aria_label: normalize_text(raw.aria_label.as_deref()),
        disabled: raw.disabled.unwrap_or(false),
        section_context,
    }
}

pub(crate) fn to_field(raw: &RawField) -> FieldSummary {
    let label = resolve_field_label(
        raw.label_for.as_deref(),
        raw.label_wrapped.as_deref(),
        raw.aria_label.as_deref(),
        raw.placeholder.as_deref(),
    );
    let field_type =
        normalize_text(raw.field_type.as_deref()).unwrap_or_else(|| "text".to_string());
    let section_context = normalize_text(raw.section_context.as_deref());
    let options = raw.options.as_ref().and_then(|options| {
        let mut options: Vec<String> = options
            .iter()
            .filter_map(|option| normalize_text(option.as_deref()))
            .collect();
        options.sort();
        (!options.is_empty()).then_some(options)
    });

    FieldSummary {
        field_signature: field_signature(
            label.as_deref(),
            &field_type,
            section_context.as_deref(),
        ),
        label,
        field_type,
        required: raw.required.unwrap_or(false),
        placeholder: normalize_text(raw.placeholder.as_deref()),
        options,
        disabled: raw.disabled.unwrap_or(false),
    }
}

pub(crate) fn to_form(raw: &RawForm) -> FormSummary {
    let mut fields: Vec<FieldSummary> = raw.fields.iter().map(to_field).collect();
    fields.sort_by(FieldSummary::canonical_cmp);

    let mut submit_buttons: Vec<InteractiveElement> =
        raw.submit_buttons.iter().map(to_interactive).collect();
    sort_actions(&mut submit_buttons);

    let section_context = normalize_text(raw.section_context.as_deref());
    let field_sigs: Vec<String> = fields.iter().map(|f| f.field_signature.clone()).collect();
    let submit_sigs: Vec<String> = submit_buttons
        .iter()
        .map(|s| s.action_signature.clone())
        .collect();

    FormSummary {
        form_signature: form_signature(&field_sigs, &submit_sigs, section_context.as_deref()),
        section_context,
        fields,
        submit_buttons,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use serde_json::json;

    fn action(role: &str, text: &str, section: Option<&str>) -> Value {
        json!({
            "role": role,
            "visible_text": text,
            "aria_label": null,
            "disabled": false,
            "section_context": section,
        })
    }

    fn login_page() -> Value {
        json!({
            "url": "https://example.com/login",
            "title": "  Login   Page ",
            "headers": ["Account Login"],
            "forms": [{
                "section_context": "Account Login",
                "fields": [
                    {
                        "type": "email", "label_for": "Email", "label_wrapped": null,
                        "aria_label": null, "placeholder": null, "required": true,
                        "options": null, "disabled": false, "section_context": "Account Login"
                    },
                    {
                        "type": "password", "label_for": "Password", "label_wrapped": null,
                        "aria_label": null, "placeholder": null, "required": false,
                        "options": null, "disabled": false, "section_context": "Account Login"
                    }
                ],
                "submit_buttons": [action("button", "Sign in", Some("Account Login"))]
            }],
            "interactive_elements": [
                action("button", "Sign in", Some("Account Login")),
                action("link", "Forgot password?", Some("Account Login"))
            ]
        })
    }

    #[test]
    fn login_page_summary_has_expected_shape() {
        let summary = build_page_summary(login_page()).unwrap();
        assert_eq!(summary.schema_version, "1.0");
        assert_eq!(summary.title, "Login Page");
        assert_eq!(summary.forms.len(), 1);
        assert_eq!(summary.forms[0].fields.len(), 2);
        assert_eq!(summary.forms[0].submit_buttons.len(), 1);

        let links: Vec<_> = summary
            .interactive_elements
            .iter()
            .filter(|e| e.role == "link")
            .collect();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].visible_text.as_deref(), Some("Forgot password?"));

        let email = summary.forms[0]
            .fields
            .iter()
            .find(|f| f.field_type == "email")
            .unwrap();
        assert!(email.required);
        assert_eq!(email.label.as_deref(), Some("Email"));
    }

    #[test]
    fn traversal_order_does_not_change_summary() {
        let forward = login_page();
        let mut reversed = forward.clone();
        reversed["interactive_elements"]
            .as_array_mut()
            .unwrap()
            .reverse();
        reversed["forms"][0]["fields"].as_array_mut().unwrap().reverse();

        let a = build_page_summary(forward).unwrap();
        let b = build_page_summary(reversed).unwrap();
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn headers_sort_case_insensitively_without_dedup() {
        let summary = build_page_summary(json!({
            "headers": ["beta", "Alpha", "  ", null, "beta", "Gamma"]
        }))
        .unwrap();
        assert_eq!(summary.headers, vec!["Alpha", "beta", "beta", "Gamma"]);
    }

    #[test]
    fn interactive_role_defaults_to_button() {
        let summary = build_page_summary(json!({
            "interactive_elements": [{"role": "  ", "visible_text": "Go"}]
        }))
        .unwrap();
        assert_eq!(summary.interactive_elements[0].role, "button");
    }

    #[test]
    fn options_are_normalized_and_sorted() {
        let field = to_field(&RawField {
            field_type: Some("select".into()),
            label_for: Some("Country".into()),
            options: Some(vec![Some(" US ".into()), Some("   ".into()), None, Some("IN".into())]),
            ..RawField::default()
        });
        assert_eq!(field.options, Some(vec!["IN".to_string(), "US".to_string()]));

        let empty = to_field(&RawField {
            options: Some(vec![Some(" ".into())]),
            ..RawField::default()
        });
        assert_eq!(empty.options, None);
        assert_eq!(empty.field_type, "text");
    }

    #[test]
    fn disabled_flags_carry_through() {
        let field = to_field(&RawField {
            field_type: Some("text".into()),
            label_for: Some("Name".into()),
            disabled: Some(true),
            section_context: Some("Profile".into()),
            ..RawField::default()
        });
        assert!(field.disabled);

        let action = to_interactive(&RawAction {
            role: Some("button".into()),
            visible_text: Some("Save".into()),
            disabled: Some(true),
            section_context: Some("Profile".into()),
            ..RawAction::default()
        });
        assert!(action.disabled);
    }

    #[test]
    fn optional_text_is_never_empty() {
        let summary = build_page_summary(json!({
            "interactive_elements": [{
                "role": "link", "visible_text": "   ", "aria_label": "",
                "section_context": "\n"
            }]
        }))
        .unwrap();
        let element = &summary.interactive_elements[0];
        assert_eq!(element.visible_text, None);
        assert_eq!(element.aria_label, None);
        assert_eq!(element.section_context, None);
    }

    #[test]
    fn identical_buttons_in_different_sections_stay_distinct() {
        let elements: Vec<Value> = (1..=16)
            .map(|n| action("button", "Add to cart", Some(&format!("Product {n}"))))
            .collect();
        let summary = build_page_summary(json!({ "interactive_elements": elements })).unwrap();
        let mut sigs: Vec<&str> = summary
            .interactive_elements
            .iter()
            .map(|e| e.action_signature.as_str())
            .collect();
        sigs.dedup();
        assert_eq!(sigs.len(), 16);
    }

    #[test]
    fn wrong_shape_is_schema_failure() {
        let err = build_page_summary(json!({"forms": [{"fields": 3}]})).unwrap_err();
        assert_eq!(err.code, ErrorCode::SchemaValidationFailed);
    }

    #[test]
    fn non_object_is_extraction_failure() {
        let err = build_page_summary(Value::Null).unwrap_err();
        assert_eq!(err.code, ErrorCode::ExtractionFailed);
        assert!(err.message.contains("null"));
    }
}
