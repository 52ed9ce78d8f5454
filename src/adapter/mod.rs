//! Browser-engine bindings for [`ScriptEvaluator`](crate::extractor::ScriptEvaluator).

pub mod chromiumoxide;
