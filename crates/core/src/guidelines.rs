//! Clinical guideline reference data and region lookup.
//!
//! The table is read-only after construction and is handed to [`GuidelineRegistry`] as an
//! `Arc`, so alternate tables can be injected in tests or loaded from YAML at startup.

use crate::constants::{
    AUTO_REGION, GLOBAL_FALLBACK_LABEL, GUIDELINE_NOTE, UNITED_KINGDOM_REGION, WHO_REGION,
};
use crate::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

/// A single citable clinical practice guideline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuidelineEntry {
    pub society: String,
    pub title: String,
    pub url: String,
}

impl GuidelineEntry {
    pub fn new(society: &str, title: &str, url: &str) -> Self {
        Self {
            society: society.to_string(),
            title: title.to_string(),
            url: url.to_string(),
        }
    }
}

/// Result of a guideline lookup for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuidelineSet {
    pub region: String,
    pub topic: String,
    pub guidelines: Vec<GuidelineEntry>,
    pub note: String,
}

/// ESC entry appended to every fallback chain.
pub fn esc_fallback_entry() -> GuidelineEntry {
    GuidelineEntry::new(
        "ESC",
        "European Society of Cardiology Clinical Practice Guidelines",
        "https://www.escardio.org/Guidelines",
    )
}

/// AHA entry closing every fallback chain.
pub fn aha_fallback_entry() -> GuidelineEntry {
    GuidelineEntry::new(
        "AHA",
        "American Heart Association Guidelines and Statements",
        "https://professional.heart.org/en/guidelines-and-statements",
    )
}

/// Mapping from region display name to its ordered guideline list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuidelineTable {
    regions: BTreeMap<String, Vec<GuidelineEntry>>,
}

impl GuidelineTable {
    /// Creates a table from already validated entries.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidInput` if a region name is blank or an entry has a blank
    /// society, title or url.
    pub fn new(regions: BTreeMap<String, Vec<GuidelineEntry>>) -> CoreResult<Self> {
        for (region, entries) in &regions {
            if region.trim().is_empty() {
                return Err(CoreError::InvalidInput(
                    "guideline region name cannot be empty".into(),
                ));
            }
            for entry in entries {
                if entry.society.trim().is_empty()
                    || entry.title.trim().is_empty()
                    || entry.url.trim().is_empty()
                {
                    return Err(CoreError::InvalidInput(format!(
                        "guideline entry for '{region}' must have society, title and url"
                    )));
                }
            }
        }
        Ok(Self { regions })
    }

    /// The table shipped with MedPlat.
    pub fn builtin() -> Self {
        let mut regions = BTreeMap::new();

        regions.insert(
            "Denmark".to_string(),
            vec![
                GuidelineEntry::new(
                    "Sundhedsstyrelsen",
                    "Nationale kliniske retningslinjer",
                    "https://www.sst.dk/da/udgivelser/nkr",
                ),
                GuidelineEntry::new(
                    "DSAM",
                    "Dansk Selskab for Almen Medicin kliniske vejledninger",
                    "https://www.dsam.dk/vejledninger",
                ),
                GuidelineEntry::new(
                    "Dansk Cardiologisk Selskab",
                    "NBV Kardiologi",
                    "https://nbv.cardio.dk",
                ),
            ],
        );

        regions.insert(
            "United States".to_string(),
            vec![
                GuidelineEntry::new(
                    "AHA/ACC",
                    "ACC/AHA Clinical Practice Guidelines",
                    "https://www.ahajournals.org/guidelines",
                ),
                GuidelineEntry::new(
                    "USPSTF",
                    "U.S. Preventive Services Task Force Recommendations",
                    "https://www.uspreventiveservicestaskforce.org/uspstf/recommendation-topics",
                ),
                GuidelineEntry::new(
                    "IDSA",
                    "Infectious Diseases Society of America Practice Guidelines",
                    "https://www.idsociety.org/practice-guideline/practice-guidelines",
                ),
            ],
        );

        regions.insert(
            UNITED_KINGDOM_REGION.to_string(),
            vec![
                GuidelineEntry::new(
                    "NICE",
                    "NICE Guidance",
                    "https://www.nice.org.uk/guidance",
                ),
                GuidelineEntry::new(
                    "SIGN",
                    "Scottish Intercollegiate Guidelines Network",
                    "https://www.sign.ac.uk/our-guidelines",
                ),
            ],
        );

        regions.insert(
            "Germany".to_string(),
            vec![
                GuidelineEntry::new(
                    "AWMF",
                    "AWMF Leitlinien",
                    "https://register.awmf.org/de/leitlinien/aktuelle-leitlinien",
                ),
                GuidelineEntry::new(
                    "DGK",
                    "Deutsche Gesellschaft für Kardiologie Leitlinien",
                    "https://leitlinien.dgk.org",
                ),
            ],
        );

        regions.insert(
            "Canada".to_string(),
            vec![
                GuidelineEntry::new(
                    "CTFPHC",
                    "Canadian Task Force on Preventive Health Care Guidelines",
                    "https://canadiantaskforce.ca/guidelines/published-guidelines",
                ),
                GuidelineEntry::new(
                    "Heart & Stroke",
                    "Canadian Stroke Best Practice Recommendations",
                    "https://www.strokebestpractices.ca",
                ),
            ],
        );

        regions.insert(
            "Australia".to_string(),
            vec![
                GuidelineEntry::new(
                    "NHMRC",
                    "NHMRC Clinical Practice Guidelines",
                    "https://www.nhmrc.gov.au/guidelinesforguidelines",
                ),
                GuidelineEntry::new(
                    "Therapeutic Guidelines",
                    "eTG complete",
                    "https://www.tg.org.au",
                ),
            ],
        );

        regions.insert(
            WHO_REGION.to_string(),
            vec![
                GuidelineEntry::new(
                    "WHO",
                    "WHO Guidelines",
                    "https://www.who.int/publications/who-guidelines",
                ),
                GuidelineEntry::new(
                    "WHO",
                    "WHO Package of Essential Noncommunicable (PEN) Disease Interventions",
                    "https://www.who.int/publications/i/item/9789240009226",
                ),
            ],
        );

        Self { regions }
    }

    /// Parses a YAML table of `Region Name: [ {society, title, url}, ... ]`.
    pub fn from_yaml_str(yaml: &str) -> CoreResult<Self> {
        let regions: BTreeMap<String, Vec<GuidelineEntry>> =
            serde_yaml::from_str(yaml).map_err(CoreError::YamlDeserialization)?;
        Self::new(regions)
    }

    /// Loads a YAML table from disk.
    pub fn from_path(path: &Path) -> CoreResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(CoreError::FileRead)?;
        Self::from_yaml_str(&contents)
    }

    pub fn get(&self, region: &str) -> Option<&[GuidelineEntry]> {
        self.regions.get(region).map(Vec::as_slice)
    }

    pub fn regions(&self) -> impl Iterator<Item = &str> {
        self.regions.keys().map(String::as_str)
    }
}

/// Resolves guideline sets against an injected [`GuidelineTable`].
#[derive(Debug, Clone)]
pub struct GuidelineRegistry {
    table: Arc<GuidelineTable>,
}

impl GuidelineRegistry {
    pub fn new(table: Arc<GuidelineTable>) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &GuidelineTable {
        &self.table
    }

    /// Looks up the guideline set for `region`.
    ///
    /// Unknown regions, and regions whose list is empty, receive the fallback chain. The
    /// returned list is never empty.
    pub fn lookup(&self, region: &str, topic: &str) -> GuidelineSet {
        let guidelines = match self.table.get(region) {
            Some(entries) if !entries.is_empty() => entries.to_vec(),
            _ => {
                tracing::debug!(region, "no guideline set for region, using fallback chain");
                self.fallback_chain()
            }
        };

        let region = if region == AUTO_REGION {
            GLOBAL_FALLBACK_LABEL.to_string()
        } else {
            region.to_string()
        };

        GuidelineSet {
            region,
            topic: topic.to_string(),
            guidelines,
            note: GUIDELINE_NOTE.to_string(),
        }
    }

    /// WHO entries, then the first United Kingdom entry, then ESC, then AHA.
    pub fn fallback_chain(&self) -> Vec<GuidelineEntry> {
        let mut chain: Vec<GuidelineEntry> = self
            .table
            .get(WHO_REGION)
            .map(<[GuidelineEntry]>::to_vec)
            .unwrap_or_default();

        if let Some(nice) = self
            .table
            .get(UNITED_KINGDOM_REGION)
            .and_then(<[GuidelineEntry]>::first)
        {
            chain.push(nice.clone());
        }

        chain.push(esc_fallback_entry());
        chain.push(aha_fallback_entry());
        chain
    }
}

impl Default for GuidelineRegistry {
    fn default() -> Self {
        Self::new(Arc::new(GuidelineTable::builtin()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn societies(set: &GuidelineSet) -> Vec<&str> {
        set.guidelines.iter().map(|g| g.society.as_str()).collect()
    }

    #[test]
    fn who_lookup_returns_who_entries() {
        let registry = GuidelineRegistry::default();
        let set = registry.lookup("WHO", "hypertension");
        assert!(!set.guidelines.is_empty());
        assert!(set.guidelines.iter().any(|g| g.society == "WHO"));
        assert_eq!(set.region, "WHO");
        assert_eq!(set.topic, "hypertension");
        assert_eq!(set.note, GUIDELINE_NOTE);
    }

    #[test]
    fn known_region_returns_its_own_list_in_order() {
        let registry = GuidelineRegistry::default();
        let set = registry.lookup("Denmark", "");
        assert_eq!(set.guidelines[0].society, "Sundhedsstyrelsen");
        assert_eq!(set.guidelines.len(), 3);
    }

    #[test]
    fn unknown_region_gets_exact_fallback_order() {
        let registry = GuidelineRegistry::default();
        let set = registry.lookup("Atlantis", "sepsis");
        assert_eq!(societies(&set), vec!["WHO", "WHO", "NICE", "ESC", "AHA"]);
        assert_eq!(set.region, "Atlantis");
    }

    #[test]
    fn region_keys_are_case_sensitive() {
        let registry = GuidelineRegistry::default();
        let set = registry.lookup("denmark", "");
        assert_eq!(set.guidelines, registry.fallback_chain());
    }

    #[test]
    fn auto_region_is_labelled_global_fallback() {
        let registry = GuidelineRegistry::default();
        let set = registry.lookup(AUTO_REGION, "asthma");
        assert_eq!(set.region, GLOBAL_FALLBACK_LABEL);
        assert_eq!(set.guidelines, registry.fallback_chain());
    }

    #[test]
    fn empty_region_list_uses_fallback() {
        let mut regions = BTreeMap::new();
        regions.insert("Denmark".to_string(), Vec::new());
        regions.insert(
            "WHO".to_string(),
            vec![GuidelineEntry::new("WHO", "WHO Guidelines", "https://who.int")],
        );
        let table = GuidelineTable::new(regions).expect("valid table");
        let registry = GuidelineRegistry::new(Arc::new(table));

        let set = registry.lookup("Denmark", "");
        assert_eq!(societies(&set), vec!["WHO", "ESC", "AHA"]);
    }

    #[test]
    fn fallback_is_never_empty_even_for_empty_table() {
        let registry = GuidelineRegistry::new(Arc::new(GuidelineTable::default()));
        let set = registry.lookup("Anywhere", "");
        assert_eq!(societies(&set), vec!["ESC", "AHA"]);
    }

    #[test]
    fn table_loads_from_yaml() {
        let yaml = r#"Denmark:
  - society: Sundhedsstyrelsen
    title: NKR
    url: https://www.sst.dk
"#;
        let table = GuidelineTable::from_yaml_str(yaml).expect("valid yaml");
        assert_eq!(table.regions().collect::<Vec<_>>(), vec!["Denmark"]);
        assert_eq!(table.get("Denmark").map(<[GuidelineEntry]>::len), Some(1));
    }

    #[test]
    fn table_rejects_incomplete_entries() {
        let yaml = r#"Denmark:
  - society: Sundhedsstyrelsen
    title: ""
    url: https://www.sst.dk
"#;
        let err = GuidelineTable::from_yaml_str(yaml).expect_err("blank title");
        assert!(matches!(err, CoreError::InvalidInput(msg) if msg.contains("Denmark")));
    }

    #[test]
    fn table_rejects_malformed_yaml() {
        let err = GuidelineTable::from_yaml_str("Denmark: 42").expect_err("not a list");
        assert!(matches!(err, CoreError::YamlDeserialization(_)));
    }

    #[test]
    fn table_loads_from_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("guidelines.yaml");
        std::fs::write(
            &path,
            "WHO:\n  - society: WHO\n    title: WHO Guidelines\n    url: https://who.int\n",
        )
        .expect("write table");

        let table = GuidelineTable::from_path(&path).expect("load table");
        assert_eq!(table.get("WHO").map(<[GuidelineEntry]>::len), Some(1));

        let missing = GuidelineTable::from_path(&dir.path().join("missing.yaml"));
        assert!(matches!(missing, Err(CoreError::FileRead(_))));
    }
}
