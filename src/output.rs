//! Shapes a [`PageSummary`] into the payload variant a caller asked for.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::actionable::{
    dedupe_actionable_elements, extract_actionable_elements, merge_actionable_elements,
};
use crate::intent::{DEFAULT_MIN_SCORE, filter_actionable_elements};
use crate::signature::canonical_json;
use crate::types::{InteractiveElement, PageSummary};

/// Keys removed by [`OutputFormat::Json`].
pub const STRIPPED_KEYS: [&str; 2] = ["action_signature", "disabled"];

/// Version tag of the compact encoding.
pub const COMPACT_VERSION: u64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Drop `action_signature` and `disabled` everywhere.
    Json,
    /// Dictionary-encode an actionable array.
    Compact,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Some(OutputFormat::Json),
            "compact" => Some(OutputFormat::Compact),
            _ => None,
        }
    }
}

/// Caller options for [`build_output_payload`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputOptions {
    pub actionable_only: bool,
    pub intent: Option<String>,
    pub min_score: f64,
    pub max_results: Option<usize>,
    pub output_format: Option<OutputFormat>,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            actionable_only: false,
            intent: None,
            min_score: DEFAULT_MIN_SCORE,
            max_results: None,
            output_format: None,
        }
    }
}

impl OutputOptions {
    /// Whether these options change anything compared to the full summary.
    pub fn requests_projection(&self) -> bool {
        self.actionable_only
            || self.intent().is_some()
            || self.max_results.is_some()
            || self.output_format.is_some()
    }

    fn intent(&self) -> Option<&str> {
        self.intent.as_deref().filter(|intent| !intent.is_empty())
    }
}

/// Project a summary into the requested payload.
pub fn build_output_payload(summary: &PageSummary, options: &OutputOptions) -> Value {
    let payload = if let Some(intent) = options.intent() {
        let mut elements = filter_actionable_elements(
            &merge_actionable_elements(summary),
            intent,
            options.min_score,
            options.max_results,
        );
        if options.actionable_only {
            elements = dedupe_actionable_elements(&elements);
        }
        elements_to_value(&elements)
    } else if options.actionable_only {
        elements_to_value(&extract_actionable_elements(summary))
    } else {
        summary_to_value(summary)
    };

    match options.output_format {
        Some(OutputFormat::Json) => strip_fields(&payload, &STRIPPED_KEYS),
        Some(OutputFormat::Compact) => compact_actionable_payload(&payload),
        None => payload,
    }
}

fn elements_to_value(elements: &[InteractiveElement]) -> Value {
    to_payload(elements)
}

fn summary_to_value(summary: &PageSummary) -> Value {
    to_payload(summary)
}

// Summary types only hold string-keyed data, so serialization cannot fail.
fn to_payload<T: Serialize + ?Sized>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

/// Recursively drop `blocked` keys from every object in `payload`.
pub fn strip_fields(payload: &Value, blocked: &[&str]) -> Value {
    match payload {
        Value::Object(map) => Value::Object(
            map.iter()
                .filter(|(key, _)| !blocked.contains(&key.as_str()))
                .map(|(key, value)| (key.clone(), strip_fields(value, blocked)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| strip_fields(item, blocked))
                .collect(),
        ),
        other => other.clone(),
    }
}

fn empty_compact() -> Value {
    json!({"v": COMPACT_VERSION, "r": [], "t": [], "c": [], "i": []})
}

fn text_field<'a>(item: &'a Map<String, Value>, key: &str) -> &'a str {
    item.get(key)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
        .unwrap_or("")
}

fn truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Number(number)) => number.as_f64().is_some_and(|n| n != 0.0),
        Some(Value::String(text)) => !text.is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Object(map)) => !map.is_empty(),
    }
}

/// Dictionary-encode an array of actionable elements.
///
/// `t` holds `visible_text`, falling back to `aria_label`, so the two fields
/// share one table and cannot be told apart after decoding. Anything other
/// than an array of objects that all carry `role` is returned unchanged.
pub fn compact_actionable_payload(payload: &Value) -> Value {
    let Value::Array(items) = payload else {
        return payload.clone();
    };
    if items.is_empty() {
        return empty_compact();
    }
    let Some(objects) = items
        .iter()
        .map(|item| item.as_object().filter(|map| map.contains_key("role")))
        .collect::<Option<Vec<_>>>()
    else {
        return payload.clone();
    };

    let text_of = |item: &Map<String, Value>| -> String {
        let visible = text_field(item, "visible_text");
        if visible.is_empty() {
            text_field(item, "aria_label").to_string()
        } else {
            visible.to_string()
        }
    };

    let roles: BTreeSet<String> = objects
        .iter()
        .map(|item| text_field(item, "role").to_string())
        .collect();
    let texts: BTreeSet<String> = objects.iter().map(|item| text_of(item)).collect();
    let contexts: BTreeSet<String> = objects
        .iter()
        .map(|item| text_field(item, "section_context").to_string())
        .collect();

    let index_of = |set: &BTreeSet<String>| -> BTreeMap<String, usize> {
        set.iter()
            .enumerate()
            .map(|(idx, value)| (value.clone(), idx))
            .collect()
    };
    let role_idx = index_of(&roles);
    let text_idx = index_of(&texts);
    let context_idx = index_of(&contexts);

    let rows: Vec<Value> = objects
        .iter()
        .map(|item| {
            let mut row = vec![
                role_idx[text_field(item, "role")],
                text_idx[&text_of(item)],
                context_idx[text_field(item, "section_context")],
            ];
            if truthy(item.get("disabled")) {
                row.push(1);
            }
            json!(row)
        })
        .collect();

    json!({
        "v": COMPACT_VERSION,
        "r": roles,
        "t": texts,
        "c": contexts,
        "i": rows,
    })
}

/// One decoded row of a compact payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompactRow {
    pub role: String,
    /// `visible_text`, or `aria_label` when the element had no text.
    pub text: String,
    pub section_context: String,
    pub disabled: bool,
}

/// Reverse [`compact_actionable_payload`]; `None` if the payload is not a
/// well-formed compact document.
pub fn decode_compact_payload(payload: &Value) -> Option<Vec<CompactRow>> {
    let table = |key: &str| -> Option<Vec<String>> {
        payload
            .get(key)?
            .as_array()?
            .iter()
            .map(|value| value.as_str().map(str::to_string))
            .collect()
    };
    if payload.get("v")?.as_u64()? != COMPACT_VERSION {
        return None;
    }
    let roles = table("r")?;
    let texts = table("t")?;
    let contexts = table("c")?;

    payload
        .get("i")?
        .as_array()?
        .iter()
        .map(|row| {
            let row = row.as_array()?;
            let index = |pos: usize| -> Option<usize> {
                usize::try_from(row.get(pos)?.as_u64()?).ok()
            };
            Some(CompactRow {
                role: roles.get(index(0)?)?.clone(),
                text: texts.get(index(1)?)?.clone(),
                section_context: contexts.get(index(2)?)?.clone(),
                disabled: row.get(3).and_then(Value::as_u64) == Some(1),
            })
        })
        .collect()
}

/// Deterministic, key-sorted JSON text for a payload. The minified form is
/// the canonical encoding used for hashing; otherwise two-space indentation.
pub fn render_payload(payload: &Value, minify: bool) -> Result<String, serde_json::Error> {
    if minify {
        return Ok(canonical_json(payload));
    }
    serde_json::to_string_pretty(&sort_keys(payload))
}

fn sort_keys(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let sorted: BTreeMap<&String, Value> =
                map.iter().map(|(key, item)| (key, sort_keys(item))).collect();
            let mut out = Map::new();
            for (key, item) in sorted {
                out.insert(key.clone(), item);
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.iter().map(sort_keys).collect()),
        other => other.clone(),
    }
}

/// Keys present anywhere in a payload; handy for asserting on stripping.
pub fn collect_keys(payload: &Value) -> HashSet<String> {
    let mut keys = HashSet::new();
    let mut stack = vec![payload];
    while let Some(value) = stack.pop() {
        match value {
            Value::Object(map) => {
                for (key, item) in map {
                    keys.insert(key.clone());
                    stack.push(item);
                }
            }
            Value::Array(items) => stack.extend(items),
            _ => {}
        }
    }
    keys
}
