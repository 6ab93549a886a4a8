//! Case assembly: generation, domain tagging and LMIC post-processing.
//!
//! The language-model call lives behind [`CaseGenerator`]; MedPlat core only owns what
//! happens to the case once it exists.

use crate::case::CaseRecord;
use crate::domains::{DomainClassifier, KeywordDomainClassifier};
use crate::lmic::LmicAdapter;
use crate::region::RegionCode;
use crate::stroke::{KeywordStrokeDetector, StrokeDetector};
use crate::CoreResult;
use std::collections::BTreeSet;

/// What the caller asked to be generated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseRequest {
    pub topic: String,
    pub region: RegionCode,
    pub lmic_mode: bool,
}

/// Produces a raw case record, typically by prompting a language model.
pub trait CaseGenerator: Send + Sync {
    /// # Errors
    ///
    /// Implementations return `CoreError::Generation` when no case could be produced.
    fn generate(&self, request: &CaseRequest) -> CoreResult<CaseRecord>;
}

/// An assembled case together with the domain tags it was adapted against.
#[derive(Debug, Clone, PartialEq)]
pub struct AssembledCase {
    pub case: CaseRecord,
    pub domains: BTreeSet<String>,
}

pub struct CaseAssembler<G, C = KeywordDomainClassifier, D = KeywordStrokeDetector> {
    generator: G,
    classifier: C,
    adapter: LmicAdapter<D>,
}

impl<G: CaseGenerator> CaseAssembler<G> {
    /// Assembler with keyword domain tagging and keyword stroke detection.
    pub fn new(generator: G) -> Self {
        Self {
            generator,
            classifier: KeywordDomainClassifier::default(),
            adapter: LmicAdapter::new(),
        }
    }
}

impl<G, C, D> CaseAssembler<G, C, D>
where
    G: CaseGenerator,
    C: DomainClassifier,
    D: StrokeDetector,
{
    pub fn with_parts(generator: G, classifier: C, adapter: LmicAdapter<D>) -> Self {
        Self {
            generator,
            classifier,
            adapter,
        }
    }

    /// Generates a case and threads it through domain tagging and LMIC adaptation.
    ///
    /// If the generator left `meta.lmic_mode` unset, the request's flag is stamped onto the
    /// case before adaptation.
    ///
    /// # Errors
    ///
    /// Propagates the generator's error unchanged.
    pub fn assemble(&self, request: &CaseRequest) -> CoreResult<AssembledCase> {
        let mut raw = self.generator.generate(request)?;
        if !raw.has_lmic_mode() {
            raw.set_lmic_mode(request.lmic_mode);
        }

        let domains = self.classifier.classify(&raw, &request.topic);
        tracing::debug!(topic = %request.topic, ?domains, "case classified");

        let case = self.adapter.adapt(&raw, &domains, &request.region);
        Ok(AssembledCase { case, domains })
    }
}
