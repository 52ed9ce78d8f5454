//! Free-text intent ranking over actionable elements.
//!
//! Each element is scored against the query as
//! `0.5 * exact + 0.3 * token_coverage + 0.2 * fuzzy`, rounded to six
//! decimals. Ties fall back to the element identity key, so the ranking never
//! depends on input order.

use std::sync::OnceLock;

use regex::Regex;

use crate::actionable::extract_actionable_elements;
use crate::normalize::normalize_text;
use crate::similarity::ratio;
use crate::types::{InteractiveElement, PageSummary};

/// Score threshold applied when callers do not pick one.
pub const DEFAULT_MIN_SCORE: f64 = 0.45;

/// An element paired with its score for one query.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedActionableElement {
    pub element: InteractiveElement,
    pub score: f64,
}

fn token_regex() -> &'static Regex {
    static TOKENS: OnceLock<Regex> = OnceLock::new();
    TOKENS.get_or_init(|| Regex::new(r"[a-z0-9]+").expect("token pattern is valid"))
}

fn tokens(query: &str) -> Vec<&str> {
    token_regex()
        .find_iter(query)
        .map(|found| found.as_str())
        .collect()
}

fn search_fields(element: &InteractiveElement) -> [String; 4] {
    [
        element.visible_text.as_deref(),
        element.aria_label.as_deref(),
        element.section_context.as_deref(),
        Some(element.role.as_str()),
    ]
    .map(|field| normalize_text(field).unwrap_or_default())
}

/// Score one element against a query in `[0, 1]`.
pub fn score_element(element: &InteractiveElement, query: &str) -> f64 {
    let query = normalize_text(Some(query))
        .unwrap_or_default()
        .to_lowercase();
    if query.is_empty() {
        return 0.0;
    }

    let fields = search_fields(element);
    let lowered: Vec<String> = fields
        .iter()
        .filter(|field| !field.is_empty())
        .map(|field| field.to_lowercase())
        .collect();
    let haystack = lowered.join(" ");
    if haystack.is_empty() {
        return 0.0;
    }

    let exact = if lowered.iter().any(|field| field.contains(&query)) {
        1.0
    } else {
        0.0
    };

    let query_tokens = tokens(&query);
    let token_coverage = if query_tokens.is_empty() {
        0.0
    } else {
        let hits = query_tokens
            .iter()
            .filter(|token| haystack.contains(**token))
            .count();
        hits as f64 / query_tokens.len() as f64
    };

    let fuzzy = lowered
        .iter()
        .chain(std::iter::once(&haystack))
        .map(|field| ratio(&query, field))
        .fold(0.0_f64, f64::max);

    round6(0.5 * exact + 0.3 * token_coverage + 0.2 * fuzzy)
}

/// Round to 6 decimals on the exact binary value, ties to even.
///
/// Fixed-precision float formatting is correctly rounded, so going through
/// the decimal text avoids the error of scaling by 1e6 first.
fn round6(value: f64) -> f64 {
    format!("{value:.6}").parse().unwrap_or(value)
}

/// Score every element and order by descending score, then identity key.
pub fn rank_actionable_elements(
    elements: &[InteractiveElement],
    query: &str,
) -> Vec<RankedActionableElement> {
    let mut ranked: Vec<RankedActionableElement> = elements
        .iter()
        .map(|element| RankedActionableElement {
            score: score_element(element, query),
            element: element.clone(),
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.element.canonical_cmp(&b.element))
    });
    ranked
}

/// Rank, keep scores `>= min_score`, then truncate to `max_results`.
pub fn filter_actionable_elements(
    elements: &[InteractiveElement],
    query: &str,
    min_score: f64,
    max_results: Option<usize>,
) -> Vec<InteractiveElement> {
    let filtered = rank_actionable_elements(elements, query)
        .into_iter()
        .filter(|ranked| ranked.score >= min_score)
        .map(|ranked| ranked.element);
    match max_results {
        Some(limit) => filtered.take(limit).collect(),
        None => filtered.collect(),
    }
}

/// [`filter_actionable_elements`] over the deduplicated actionable set of a page.
pub fn filter_actionable_from_summary(
    summary: &PageSummary,
    query: &str,
    min_score: f64,
    max_results: Option<usize>,
) -> Vec<InteractiveElement> {
    let actionable = extract_actionable_elements(summary);
    filter_actionable_elements(&actionable, query, min_score, max_results)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round6_uses_exact_value_and_ties_to_even() {
        assert_eq!(round6(0.0078125), 0.007812);
        assert_eq!(round6(0.0234375), 0.023438);
        assert_eq!(round6(0.1234565), 0.123456);
        assert_eq!(round6(2.0 / 3.0), 0.666667);
        assert_eq!(round6(1.0), 1.0);
    }

    fn element(sig: &str, text: Option<&str>, section: Option<&str>, role: &str) -> InteractiveElement {
        InteractiveElement {
            action_signature: sig.to_string(),
            role: role.to_string(),
            visible_text: text.map(str::to_string),
            aria_label: None,
            disabled: false,
            section_context: section.map(str::to_string),
        }
    }

    fn button(sig: &str, text: &str) -> InteractiveElement {
        element(sig, Some(text), None, "button")
    }

    #[test]
    fn exact_match_ranks_first() {
        let items = vec![
            element("1", Some("Buy now"), Some("Phone A"), "button"),
            element("2", Some("Add to cart"), Some("Phone B"), "button"),
            element("3", Some("Compare"), Some("Phone C"), "button"),
        ];
        let ranked = rank_actionable_elements(&items, "add to cart");
        assert_eq!(ranked[0].element.action_signature, "2");
        assert!(ranked[0].score > ranked[1].score);
    }

    #[test]
    fn exact_match_score_is_known() {
        let score = score_element(&button("1", "Add to cart"), "Add to cart");
        // exact 0.5, full coverage 0.3, identical field 0.2
        assert_eq!(score, 1.0);
    }

    #[test]
    fn scores_are_tuned_values() {
        let cases = [
            (button("1", "Add to cart"), "ad to crt", 0.38),
            (button("2", "Proceed to checkout"), "ad to crt", 0.2),
            (
                element("3", Some("Buy now"), Some("Phone A"), "button"),
                "add to cart",
                0.148485,
            ),
            (button("4", "Add to cart now"), "add to cart", 0.969231),
            (button("5", "Cart summary"), "cart", 0.9),
            (
                element("6", None, Some("iPhone 17 Pro listing"), "image_link"),
                "iphone 17",
                0.92,
            ),
        ];
        for (item, query, expected) in cases {
            let score = score_element(&item, query);
            assert!(
                (score - expected).abs() < 1e-9,
                "{query:?} vs {:?}: {score} != {expected}",
                item.visible_text
            );
        }
    }

    #[test]
    fn fuzzy_typo_still_selects_the_right_element() {
        let items = vec![button("1", "Add to cart"), button("2", "Proceed to checkout")];
        let filtered = filter_actionable_elements(&items, "ad to crt", 0.35, None);
        assert!(!filtered.is_empty());
        assert_eq!(filtered[0].action_signature, "1");
    }

    #[test]
    fn section_context_participates_in_matching() {
        let items = vec![
            element("1", None, Some("iPhone 17 Pro listing"), "image_link"),
            element("2", Some("Explore"), Some("Accessories"), "link"),
        ];
        let filtered = filter_actionable_elements(&items, "iphone 17", 0.35, None);
        let sigs: Vec<_> = filtered.iter().map(|e| e.action_signature.as_str()).collect();
        assert_eq!(sigs, vec!["1"]);
    }

    #[test]
    fn ties_break_on_identity() {
        let items = vec![button("b", "Add to cart"), button("a", "Add to cart")];
        let first: Vec<_> = filter_actionable_elements(&items, "add to cart", 0.1, None)
            .into_iter()
            .map(|e| e.action_signature)
            .collect();
        let reversed: Vec<InteractiveElement> = items.into_iter().rev().collect();
        let second: Vec<_> = filter_actionable_elements(&reversed, "add to cart", 0.1, None)
            .into_iter()
            .map(|e| e.action_signature)
            .collect();
        assert_eq!(first, vec!["a", "b"]);
        assert_eq!(first, second);
    }

    #[test]
    fn blank_query_and_empty_haystack_score_zero() {
        assert_eq!(score_element(&button("1", "Save"), "   "), 0.0);
        let empty = element("2", None, None, "");
        assert_eq!(score_element(&empty, "save"), 0.0);
    }

    #[test]
    fn query_without_tokens_has_no_coverage() {
        // Only punctuation: no tokens, but the exact substring still counts.
        let score = score_element(&button("1", "?!"), "?!");
        assert_eq!(score, 0.7);
    }

    #[test]
    fn max_results_truncates_without_reordering() {
        let items = vec![
            button("1", "Add to cart"),
            button("2", "Add to cart now"),
            button("3", "Add to wishlist"),
        ];
        let all = filter_actionable_elements(&items, "add to cart", 0.0, None);
        let top_two = filter_actionable_elements(&items, "add to cart", 0.0, Some(2));
        assert_eq!(&all[..2], &top_two[..]);
    }

    #[test]
    fn raising_min_score_never_adds_results() {
        let items = vec![
            button("1", "Add to cart"),
            button("2", "Checkout"),
            button("3", "Cart summary"),
        ];
        let mut previous = usize::MAX;
        for threshold in [0.0, 0.2, 0.45, 0.6, 0.9, 1.0] {
            let count = filter_actionable_elements(&items, "cart", threshold, None).len();
            assert!(count <= previous);
            previous = count;
        }
    }
}
