//! Low-resource (LMIC) adaptation of generated stroke cases.
//!
//! When a case is generated in LMIC mode for a neurology stroke presentation, the guideline
//! section is re-anchored on WHO and LMIC guidance and management text stops assuming that
//! CT or MRI is available.
//!
//! The adapter never touches the caller's record. It works on a clone and every seeding step
//! checks for an existing matching entry first, so adapting an adapted case changes nothing.

use crate::case::{value_text, CaseRecord};
use crate::constants::{
    CLINICAL_ASSESSMENT, CT_UNAVAILABLE_TEXT, ESO_SECONDARY_CITATION, LMIC_NEURO_PATHWAY_CITATION,
    MRI_UNAVAILABLE_TEXT, PRIMARY_LOCKED_INTERNATIONAL, WHO_PEN_STROKE_CITATION,
};
use crate::domains::has_neurology_domain;
use crate::region::RegionCode;
use crate::stroke::{KeywordStrokeDetector, StrokeDetector};
use regex::Regex;
use serde_json::{json, Map, Value};
use std::collections::BTreeSet;
use std::sync::LazyLock;

/// National sources stripped from `guidelines.usa`.
const US_STROKE_SOURCES: &[&str] = &["nih", "aha", "american heart association"];
const LMIC_MARKERS: &[&str] = &["lmic", "low resource"];
const ESO_MARKERS: &[&str] = &["eso", "european stroke"];

/// A case-insensitive whole-word imaging pattern and the text that replaces it.
struct ImagingRewrite {
    regex: Regex,
    replacement: &'static str,
}

/// Compiles the rules, logging and dropping any pattern that does not compile.
fn compile_rewrites(rules: &[(&str, &'static str)]) -> Vec<ImagingRewrite> {
    rules
        .iter()
        .filter_map(|(pattern, replacement)| match Regex::new(pattern) {
            Ok(regex) => Some(ImagingRewrite {
                regex,
                replacement,
            }),
            Err(e) => {
                tracing::error!(pattern, "invalid imaging rewrite pattern: {e}");
                None
            }
        })
        .collect()
}

/// Applied to both `management.initial` and `management.definitive`.
static IMAGING_REWRITES: LazyLock<Vec<ImagingRewrite>> = LazyLock::new(|| {
    compile_rewrites(&[
        (r"(?i)\bCT scan\b", CT_UNAVAILABLE_TEXT),
        (r"(?i)\bMRI\b", MRI_UNAVAILABLE_TEXT),
    ])
});

// Only `management.initial` gets the spelled-out modality names rewritten. The definitive
// plan keeps them until product confirms it should match.
static INITIAL_ONLY_REWRITES: LazyLock<Vec<ImagingRewrite>> = LazyLock::new(|| {
    compile_rewrites(&[
        (r"(?i)\bcomputed tomography\b", CLINICAL_ASSESSMENT),
        (r"(?i)\bmagnetic resonance imaging\b", CLINICAL_ASSESSMENT),
    ])
});

/// Rewrites LMIC stroke cases; see the module docs.
#[derive(Debug, Clone, Default)]
pub struct LmicAdapter<D = KeywordStrokeDetector> {
    detector: D,
}

impl LmicAdapter<KeywordStrokeDetector> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<D: StrokeDetector> LmicAdapter<D> {
    pub fn with_detector(detector: D) -> Self {
        Self { detector }
    }

    /// True when the case is in LMIC mode, carries a neurology tag and is about stroke.
    pub fn should_adapt(&self, case: &CaseRecord, domains: &BTreeSet<String>) -> bool {
        if !case.lmic_mode() {
            return false;
        }
        if !has_neurology_domain(domains) {
            return false;
        }
        self.detector
            .is_stroke_related(domains, &case.clinical_texts())
    }

    /// Returns an adapted copy of `case`, or an unchanged copy when the gate is closed.
    pub fn adapt(
        &self,
        case: &CaseRecord,
        domains: &BTreeSet<String>,
        region: &RegionCode,
    ) -> CaseRecord {
        let mut adapted = case.clone();

        if !self.should_adapt(case, domains) {
            tracing::debug!(%region, "LMIC stroke adaptation not applicable");
            return adapted;
        }

        tracing::debug!(%region, "applying LMIC stroke adaptation");

        let root = adapted.as_value_mut();
        if let Some(guidelines) = root.get_mut("guidelines").and_then(Value::as_object_mut) {
            reorder_guidelines(guidelines);
        }
        if let Some(management) = root.get_mut("management").and_then(Value::as_object_mut) {
            rewrite_management(management);
        }
        if let Some(meta) = root.get_mut("meta").and_then(Value::as_object_mut) {
            annotate(meta);
        }

        adapted
    }
}

fn reorder_guidelines(guidelines: &mut Map<String, Value>) {
    if let Some(Value::Array(usa)) = guidelines.get_mut("usa") {
        usa.retain(|entry| !mentions_any(entry, US_STROKE_SOURCES));
    }

    if let Some(international) = ensure_array(guidelines, "international") {
        if !international
            .iter()
            .any(|entry| mentions_all(entry, &["who", "stroke"]))
        {
            international.insert(0, Value::String(WHO_PEN_STROKE_CITATION.to_string()));
        }
        if !international
            .iter()
            .any(|entry| mentions_any(entry, LMIC_MARKERS))
        {
            international.push(Value::String(LMIC_NEURO_PATHWAY_CITATION.to_string()));
        }
    }

    if let Some(continental) = ensure_array(guidelines, "continental") {
        if !continental
            .iter()
            .any(|entry| mentions_any(entry, ESO_MARKERS))
        {
            continental.push(Value::String(ESO_SECONDARY_CITATION.to_string()));
        }
    }

    guidelines.insert(
        "primary_locked".to_string(),
        Value::String(PRIMARY_LOCKED_INTERNATIONAL.to_string()),
    );
}

fn rewrite_management(management: &mut Map<String, Value>) {
    if let Some(Value::String(initial)) = management.get_mut("initial") {
        let mut text = apply_rewrites(initial, &IMAGING_REWRITES);
        text = apply_rewrites(&text, &INITIAL_ONLY_REWRITES);
        *initial = text;
    }
    if let Some(Value::String(definitive)) = management.get_mut("definitive") {
        *definitive = apply_rewrites(definitive, &IMAGING_REWRITES);
    }
}

fn annotate(meta: &mut Map<String, Value>) {
    if meta.get("stroke_lmic_adaptation").is_some_and(is_truthy) {
        return;
    }

    meta.insert(
        "stroke_lmic_adaptation".to_string(),
        json!({
            "guideline_hierarchy": [
                "WHO PEN stroke protocol (primary)",
                "LMIC neurology pathway: clinical diagnosis with adapted NIHSS",
                "ESO guidelines (secondary reference)",
            ],
            "imaging_removed": "CT and MRI are assumed unavailable; stroke is diagnosed clinically \
                and severity is graded with the NIHSS.",
            "management_adapted": "Imaging-dependent steps were replaced with clinical assessment; \
                reperfusion decisions depend on locally available resources.",
        }),
    );
}

/// `null`, `false`, `0` and `""` count as unset; any other value counts as set.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Makes `map[key]` an array, replacing a missing or non-array value with `[]`.
fn ensure_array<'a>(map: &'a mut Map<String, Value>, key: &str) -> Option<&'a mut Vec<Value>> {
    if !matches!(map.get(key), Some(Value::Array(_))) {
        map.insert(key.to_string(), Value::Array(Vec::new()));
    }
    map.get_mut(key).and_then(Value::as_array_mut)
}

fn lowercase_text(entry: &Value) -> String {
    value_text(entry).unwrap_or_default().to_lowercase()
}

fn mentions_any(entry: &Value, needles: &[&str]) -> bool {
    let text = lowercase_text(entry);
    needles.iter().any(|needle| text.contains(needle))
}

fn mentions_all(entry: &Value, needles: &[&str]) -> bool {
    let text = lowercase_text(entry);
    needles.iter().all(|needle| text.contains(needle))
}

fn apply_rewrites(text: &str, rewrites: &[ImagingRewrite]) -> String {
    rewrites.iter().fold(text.to_string(), |acc, rule| {
        replace_unrewritten(&acc, &rule.regex, rule.replacement)
    })
}

/// Replaces every match except those that sit inside an earlier
/// "clinical assessment (... unavailable in LMIC)" replacement.
fn replace_unrewritten(text: &str, regex: &Regex, replacement: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for found in regex.find_iter(text) {
        out.push_str(&text[last..found.start()]);
        if inside_rewrite(&text[..found.start()], &text[found.end()..]) {
            out.push_str(found.as_str());
        } else {
            out.push_str(replacement);
        }
        last = found.end();
    }
    out.push_str(&text[last..]);
    out
}

fn inside_rewrite(prefix: &str, suffix: &str) -> bool {
    const OPENING: &str = "clinical assessment (";
    const CLOSING: &str = " unavailable in LMIC)";
    let opened = prefix
        .len()
        .checked_sub(OPENING.len())
        .and_then(|start| prefix.get(start..))
        .is_some_and(|tail| tail.eq_ignore_ascii_case(OPENING));
    let closed = suffix
        .get(..CLOSING.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(CLOSING));
    opened && closed
}
