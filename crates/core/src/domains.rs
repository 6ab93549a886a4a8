//! Clinical domain tags.
//!
//! Domain tags are short lower-case labels ("neurology", "stroke", "cardiology") attached to a
//! generated case. The LMIC adapter treats them as an opaque set of keywords.

use crate::case::CaseRecord;
use std::collections::BTreeSet;

/// Tags that count as neurology for LMIC stroke adaptation.
pub const NEUROLOGY_TAGS: &[&str] = &["neurology", "neuro", "neurological", "neurologic"];

/// True if any tag is a neurology-equivalent tag, ignoring case and surrounding whitespace.
pub fn has_neurology_domain(domains: &BTreeSet<String>) -> bool {
    domains.iter().any(|tag| {
        let tag = tag.trim();
        NEUROLOGY_TAGS.iter().any(|n| tag.eq_ignore_ascii_case(n))
    })
}

/// Assigns domain tags to a generated case.
pub trait DomainClassifier: Send + Sync {
    fn classify(&self, case: &CaseRecord, topic: &str) -> BTreeSet<String>;
}

/// Keyword rules: a tag is assigned when any of its keywords appears in the topic or the
/// case's clinical text.
#[derive(Debug, Clone)]
pub struct KeywordDomainClassifier {
    rules: Vec<(&'static str, &'static [&'static str])>,
}

const NEUROLOGY_KEYWORDS: &[&str] = &[
    "stroke",
    "neurolog",
    "seizure",
    "epilep",
    "hemipare",
    "aphasia",
    "meningitis",
    "transient ischaemic",
    "transient ischemic",
];
const STROKE_KEYWORDS: &[&str] = &["stroke", "cerebrovascular", "cerebral infarct"];
const CARDIOLOGY_KEYWORDS: &[&str] =
    &["myocardial", "cardiac", "heart failure", "atrial fibrillation"];
const INFECTIOUS_DISEASE_KEYWORDS: &[&str] = &["sepsis", "malaria", "tuberculosis", "pneumonia"];

impl Default for KeywordDomainClassifier {
    fn default() -> Self {
        Self {
            rules: vec![
                ("neurology", NEUROLOGY_KEYWORDS),
                ("stroke", STROKE_KEYWORDS),
                ("cardiology", CARDIOLOGY_KEYWORDS),
                ("infectious_disease", INFECTIOUS_DISEASE_KEYWORDS),
            ],
        }
    }
}

impl DomainClassifier for KeywordDomainClassifier {
    fn classify(&self, case: &CaseRecord, topic: &str) -> BTreeSet<String> {
        let mut haystack = topic.to_lowercase();
        for text in case.clinical_texts() {
            haystack.push('\n');
            haystack.push_str(&text.to_lowercase());
        }

        self.rules
            .iter()
            .filter(|(_, keywords)| keywords.iter().any(|k| haystack.contains(k)))
            .map(|(tag, _)| tag.to_string())
            .collect()
    }
}
