//! Constants used throughout the MedPlat core crate.
//!
//! Header names, sentinels and the fixed citation strings that the LMIC adapter seeds into
//! case records live here so that the adapter and its tests agree on the exact text.

/// Region code returned when no request header yields a usable country.
pub const GLOBAL_REGION: &str = "global";

/// Region parameter value meaning "work the region out from the request".
pub const AUTO_REGION: &str = "auto";

/// Region echoed back by the guideline lookup when it was asked for [`AUTO_REGION`].
pub const GLOBAL_FALLBACK_LABEL: &str = "Global (Fallback)";

/// Country header set by the application platform (Google App Engine).
pub const APP_PLATFORM_COUNTRY_HEADER: &str = "x-appengine-country";

/// Value the application platform uses when the country is unknown.
pub const APP_PLATFORM_UNKNOWN_COUNTRY: &str = "ZZ";

/// Country header set by the CDN edge proxy (Cloudflare).
pub const CDN_COUNTRY_HEADER: &str = "cf-ipcountry";

/// Value the CDN uses for Tor exit nodes, where no country can be assigned.
pub const CDN_UNKNOWN_COUNTRY: &str = "T1";

/// Region key of the World Health Organization entries in the guideline table.
pub const WHO_REGION: &str = "WHO";

/// Region key whose first entry (NICE) joins the fallback chain.
pub const UNITED_KINGDOM_REGION: &str = "United Kingdom";

/// Note attached to every guideline lookup result.
pub const GUIDELINE_NOTE: &str = "Guidelines are listed in order of regional relevance. \
Regions without a dedicated set fall back to WHO, then NICE, then ESC, then AHA.";

/// WHO PEN stroke citation placed first in `guidelines.international` for LMIC stroke cases.
pub const WHO_PEN_STROKE_CITATION: &str = "WHO PEN Protocol for Stroke: Package of Essential \
Noncommunicable Disease Interventions for Primary Health Care in Low-Resource Settings";

/// LMIC neurology pathway citation appended to `guidelines.international`.
pub const LMIC_NEURO_PATHWAY_CITATION: &str = "LMIC Neurology Pathway: Clinical Diagnosis of \
Stroke with NIHSS Adapted for Resource-Limited Settings";

/// ESO citation appended to `guidelines.continental` as a secondary reference.
pub const ESO_SECONDARY_CITATION: &str = "ESO (European Stroke Organisation) Guidelines \
(secondary reference; adapt to local resources)";

/// Marker written to `guidelines.primary_locked` once international guidance is primary.
pub const PRIMARY_LOCKED_INTERNATIONAL: &str = "international";

/// Marker text already present in management text that has been rewritten.
pub const CLINICAL_ASSESSMENT: &str = "clinical assessment";

/// Replacement for CT scan mentions in LMIC management text.
pub const CT_UNAVAILABLE_TEXT: &str = "clinical assessment (CT unavailable in LMIC)";

/// Replacement for MRI mentions in LMIC management text.
pub const MRI_UNAVAILABLE_TEXT: &str = "clinical assessment (MRI unavailable in LMIC)";
