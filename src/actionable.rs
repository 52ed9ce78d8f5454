//! Union and structural dedup of actionable elements across scopes.

use std::collections::HashSet;

use crate::builder::sort_actions;
use crate::types::{InteractiveElement, PageSummary};

/// Concatenate the page-level interactive elements with every form's submit
/// buttons, ordered by identity key. Duplicates are kept.
pub fn merge_actionable_elements(summary: &PageSummary) -> Vec<InteractiveElement> {
    let mut merged: Vec<InteractiveElement> = summary.interactive_elements.clone();
    for form in &summary.forms {
        merged.extend(form.submit_buttons.iter().cloned());
    }
    sort_actions(&mut merged);
    merged
}

/// Keep the first element of each distinct identity key, in identity order.
pub fn dedupe_actionable_elements(elements: &[InteractiveElement]) -> Vec<InteractiveElement> {
    let mut ordered: Vec<&InteractiveElement> = elements.iter().collect();
    ordered.sort_by(|a, b| a.canonical_cmp(b));

    let mut seen = HashSet::new();
    let mut deduped = Vec::with_capacity(ordered.len());
    for element in ordered {
        if seen.insert(element.identity()) {
            deduped.push(element.clone());
        }
    }
    deduped
}

/// Merged and deduplicated actionable elements of a page.
pub fn extract_actionable_elements(summary: &PageSummary) -> Vec<InteractiveElement> {
    dedupe_actionable_elements(&merge_actionable_elements(summary))
}
