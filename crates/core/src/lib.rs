//! # MedPlat Core
//!
//! Business rules behind MedPlat's generated clinical teaching cases:
//! - region detection from request headers (`region`)
//! - regional clinical guideline lookup with a global fallback chain (`guidelines`)
//! - LMIC adaptation of generated stroke cases (`lmic`, `stroke`, `domains`)
//! - case assembly around a pluggable generator (`pipeline`)
//!
//! Everything here is synchronous and free of I/O beyond loading configuration files at
//! startup.
//!
//! **No API concerns**: HTTP servers and wire types belong in `api-rest` and `api-shared`.

pub mod case;
pub mod config;
pub mod constants;
pub mod domains;
pub mod error;
pub mod guidelines;
pub mod lmic;
pub mod pipeline;
pub mod region;
pub mod stroke;

pub use case::CaseRecord;
pub use config::CoreConfig;
pub use domains::{DomainClassifier, KeywordDomainClassifier};
pub use error::{CoreError, CoreResult};
pub use guidelines::{GuidelineEntry, GuidelineRegistry, GuidelineSet, GuidelineTable};
pub use lmic::LmicAdapter;
pub use pipeline::{AssembledCase, CaseAssembler, CaseGenerator, CaseRequest};
pub use region::{choose_lookup_region, RegionCode, RegionDirectory, RegionResolver};
pub use stroke::{KeywordStrokeDetector, StrokeDetector};
