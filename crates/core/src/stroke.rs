//! Stroke recognition for case post-processing.

use std::collections::BTreeSet;

/// Decides whether a case is about stroke.
///
/// The adapter only depends on this trait, so the keyword heuristic below can be swapped for
/// a proper classifier.
pub trait StrokeDetector: Send + Sync {
    fn is_stroke_related(&self, domains: &BTreeSet<String>, texts: &[String]) -> bool;
}

/// Substring match on `"stroke"` across domain tags and case text, ignoring case.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordStrokeDetector;

const STROKE_KEYWORD: &str = "stroke";

impl StrokeDetector for KeywordStrokeDetector {
    fn is_stroke_related(&self, domains: &BTreeSet<String>, texts: &[String]) -> bool {
        domains
            .iter()
            .chain(texts.iter())
            .any(|text| text.to_lowercase().contains(STROKE_KEYWORD))
    }
}
