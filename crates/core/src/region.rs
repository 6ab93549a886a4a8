//! Region detection from inbound request metadata.
//!
//! The resolver looks at the country headers added by the hosting platform and the CDN in
//! front of it. It never fails: anything it cannot use degrades to [`RegionCode::global`].
//!
//! Region codes are lower-case tokens such as `"dk"` or `"us"`. The guideline table, however,
//! is keyed by display names ("Denmark", "United States"). Translating between the two is the
//! job of a [`RegionDirectory`], which the integrator supplies; this crate does not guess it.

use crate::constants::{
    APP_PLATFORM_COUNTRY_HEADER, APP_PLATFORM_UNKNOWN_COUNTRY, AUTO_REGION,
    CDN_COUNTRY_HEADER, CDN_UNKNOWN_COUNTRY, GLOBAL_REGION,
};
use crate::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::convert::Infallible;
use std::path::Path;

/// A resolved region token, or the `"global"` sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionCode(String);

impl RegionCode {
    /// Builds a region code from a raw header value, trimmed and lower-cased.
    pub fn new(value: impl AsRef<str>) -> Self {
        Self(value.as_ref().trim().to_lowercase())
    }

    /// The sentinel used when no region could be determined.
    pub fn global() -> Self {
        Self(GLOBAL_REGION.to_string())
    }

    pub fn is_global(&self) -> bool {
        self.0 == GLOBAL_REGION
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RegionCode {
    fn default() -> Self {
        Self::global()
    }
}

impl std::fmt::Display for RegionCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One header consulted by the resolver, with the value that source uses for "unknown".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountryHeaderSource {
    pub header: &'static str,
    pub unknown_sentinel: &'static str,
}

/// Header sources in priority order. The first accepted value wins.
pub const DEFAULT_COUNTRY_SOURCES: &[CountryHeaderSource] = &[
    CountryHeaderSource {
        header: APP_PLATFORM_COUNTRY_HEADER,
        unknown_sentinel: APP_PLATFORM_UNKNOWN_COUNTRY,
    },
    CountryHeaderSource {
        header: CDN_COUNTRY_HEADER,
        unknown_sentinel: CDN_UNKNOWN_COUNTRY,
    },
];

/// Derives a [`RegionCode`] from request headers.
#[derive(Debug, Clone, Copy)]
pub struct RegionResolver {
    sources: &'static [CountryHeaderSource],
}

impl Default for RegionResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl RegionResolver {
    pub fn new() -> Self {
        Self {
            sources: DEFAULT_COUNTRY_SOURCES,
        }
    }

    /// Resolves the region from a plain header map.
    ///
    /// Header names are compared case-insensitively, matching HTTP semantics.
    pub fn resolve(&self, headers: &HashMap<String, String>) -> RegionCode {
        self.resolve_with(|name| {
            Ok::<_, Infallible>(
                headers
                    .iter()
                    .find(|(key, _)| key.eq_ignore_ascii_case(name))
                    .map(|(_, value)| value.as_str()),
            )
        })
    }

    /// Resolves the region using an arbitrary header accessor.
    ///
    /// `lookup` returns `Ok(None)` for an absent header. A header that is present but cannot
    /// be read as text stops resolution and yields the global region, the same as any other
    /// resolution failure; later sources are not consulted.
    pub fn resolve_with<'a, F, E>(&self, lookup: F) -> RegionCode
    where
        F: Fn(&str) -> Result<Option<&'a str>, E>,
        E: std::fmt::Display,
    {
        for source in self.sources {
            let raw = match lookup(source.header) {
                Ok(Some(raw)) => raw,
                Ok(None) => continue,
                Err(e) => {
                    tracing::warn!(header = source.header, "unreadable region header: {e}");
                    return RegionCode::global();
                }
            };
            let value = raw.trim();
            if value.is_empty() || value.eq_ignore_ascii_case(source.unknown_sentinel) {
                continue;
            }
            tracing::debug!(header = source.header, value, "region resolved from header");
            return RegionCode::new(value);
        }

        RegionCode::global()
    }
}

/// Integrator-supplied translation from region codes to guideline-table region names.
///
/// Empty by default: without a mapping every detected region falls through to the
/// guideline fallback chain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionDirectory {
    names: BTreeMap<String, String>,
}

impl RegionDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a directory from `(code, display name)` pairs.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidInput` if a code or a name is blank.
    pub fn from_pairs<I, K, V>(pairs: I) -> CoreResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut names = BTreeMap::new();
        for (code, name) in pairs {
            let code = code.as_ref().trim().to_lowercase();
            let name = name.as_ref().trim();
            if code.is_empty() {
                return Err(CoreError::InvalidInput(
                    "region directory code cannot be empty".into(),
                ));
            }
            if name.is_empty() {
                return Err(CoreError::InvalidInput(format!(
                    "region directory name for '{code}' cannot be empty"
                )));
            }
            names.insert(code, name.to_string());
        }
        Ok(Self { names })
    }

    /// Parses a YAML mapping of `code: Display Name`.
    pub fn from_yaml_str(yaml: &str) -> CoreResult<Self> {
        let raw: BTreeMap<String, String> =
            serde_yaml::from_str(yaml).map_err(CoreError::YamlDeserialization)?;
        Self::from_pairs(raw)
    }

    /// Loads a YAML directory file from disk.
    pub fn from_path(path: &Path) -> CoreResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(CoreError::FileRead)?;
        Self::from_yaml_str(&contents)
    }

    pub fn display_name(&self, code: &RegionCode) -> Option<&str> {
        self.names.get(code.as_str()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Picks the region name to hand to the guideline registry for one request.
///
/// An explicit `requested` region is used as-is. A blank or `"auto"` request is translated
/// from the detected code through `directory`; when there is no mapping the `"auto"`
/// sentinel is passed on so the registry applies its global fallback.
pub fn choose_lookup_region(
    requested: &str,
    detected: &RegionCode,
    directory: &RegionDirectory,
) -> String {
    let requested = requested.trim();
    if !requested.is_empty() && !requested.eq_ignore_ascii_case(AUTO_REGION) {
        return requested.to_string();
    }

    match directory.display_name(detected) {
        Some(name) => name.to_string(),
        None => AUTO_REGION.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn returns_global_without_country_headers() {
        let resolver = RegionResolver::new();
        assert_eq!(resolver.resolve(&HashMap::new()), RegionCode::global());
        assert_eq!(
            resolver.resolve(&headers(&[("accept-language", "da-DK")])),
            RegionCode::global()
        );
    }

    #[test]
    fn app_platform_header_wins_over_cdn_header() {
        let resolver = RegionResolver::new();
        let region = resolver.resolve(&headers(&[
            ("X-AppEngine-Country", "DK"),
            ("CF-IPCountry", "US"),
        ]));
        assert_eq!(region.as_str(), "dk");
    }

    #[test]
    fn falls_back_to_cdn_header_when_app_platform_is_unknown() {
        let resolver = RegionResolver::new();
        let region = resolver.resolve(&headers(&[
            ("x-appengine-country", "ZZ"),
            ("cf-ipcountry", "GB"),
        ]));
        assert_eq!(region.as_str(), "gb");
    }

    #[test]
    fn rejects_sentinels_and_blank_values() {
        let resolver = RegionResolver::new();
        let region = resolver.resolve(&headers(&[
            ("x-appengine-country", "  "),
            ("cf-ipcountry", "T1"),
        ]));
        assert!(region.is_global());
    }

    #[test]
    fn absent_header_falls_through_to_next_source() {
        let resolver = RegionResolver::new();
        let region = resolver.resolve_with(|name| {
            Ok::<_, Infallible>((name == CDN_COUNTRY_HEADER).then_some("de"))
        });
        assert_eq!(region.as_str(), "de");
    }

    #[test]
    fn unreadable_header_degrades_to_global() {
        let resolver = RegionResolver::new();
        let region = resolver.resolve_with(|name| {
            if name == CDN_COUNTRY_HEADER {
                Ok(Some("gb"))
            } else {
                Err("header value is not visible ASCII")
            }
        });
        assert!(region.is_global());
    }

    #[test]
    fn directory_normalises_codes() {
        let directory =
            RegionDirectory::from_pairs([(" DK ", "Denmark"), ("us", "United States")])
                .expect("valid directory");
        assert_eq!(directory.len(), 2);
        assert_eq!(
            directory.display_name(&RegionCode::new("dk")),
            Some("Denmark")
        );
        assert_eq!(directory.display_name(&RegionCode::new("fr")), None);
    }

    #[test]
    fn directory_rejects_blank_entries() {
        let err = RegionDirectory::from_pairs([("", "Denmark")]).expect_err("blank code");
        assert!(matches!(err, CoreError::InvalidInput(msg) if msg.contains("code")));

        let err = RegionDirectory::from_pairs([("dk", " ")]).expect_err("blank name");
        assert!(matches!(err, CoreError::InvalidInput(msg) if msg.contains("dk")));
    }

    #[test]
    fn directory_loads_from_yaml() {
        let directory = RegionDirectory::from_yaml_str("dk: Denmark\nGB: United Kingdom\n")
            .expect("valid yaml");
        assert_eq!(
            directory.display_name(&RegionCode::new("gb")),
            Some("United Kingdom")
        );
    }

    #[test]
    fn choose_lookup_region_keeps_explicit_requests() {
        let directory = RegionDirectory::from_pairs([("dk", "Denmark")]).expect("directory");
        let detected = RegionCode::new("dk");
        assert_eq!(
            choose_lookup_region(" Germany ", &detected, &directory),
            "Germany"
        );
    }

    #[test]
    fn choose_lookup_region_translates_auto() {
        let directory = RegionDirectory::from_pairs([("dk", "Denmark")]).expect("directory");
        assert_eq!(
            choose_lookup_region("auto", &RegionCode::new("dk"), &directory),
            "Denmark"
        );
        assert_eq!(
            choose_lookup_region("", &RegionCode::new("dk"), &directory),
            "Denmark"
        );
        assert_eq!(
            choose_lookup_region("AUTO", &RegionCode::new("fr"), &directory),
            AUTO_REGION
        );
        assert_eq!(
            choose_lookup_region("auto", &RegionCode::global(), &RegionDirectory::new()),
            AUTO_REGION
        );
    }
}
