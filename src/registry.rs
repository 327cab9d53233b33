//! Language and region tables.
//!
//! The registry is a plain read-only value handed to the `Explorer`; the
//! built-in reference table can be swapped for a JSON file of the same shape.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::common::{EntityId, LanguageCode};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    pub name: String,
    pub code: LanguageCode,
}

/// One explorable region and its two curated featured entities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionConfig {
    pub name: String,
    pub region_id: EntityId,
    pub featured_figure: EntityId,
    pub featured_monument: EntityId,
}

/// Deserializing goes through `Registry::new`, so a parsed registry is never
/// empty and never holds duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRegistry")]
pub struct Registry {
    languages: Vec<Language>,
    regions: Vec<RegionConfig>,
}

#[derive(Deserialize)]
struct RawRegistry {
    languages: Vec<Language>,
    regions: Vec<RegionConfig>,
}

impl TryFrom<RawRegistry> for Registry {
    type Error = anyhow::Error;

    fn try_from(raw: RawRegistry) -> Result<Self> {
        Self::new(raw.languages, raw.regions)
    }
}

impl Registry {
    pub fn new(languages: Vec<Language>, regions: Vec<RegionConfig>) -> Result<Self> {
        if languages.is_empty() {
            bail!("Registry needs at least one language");
        }
        if regions.is_empty() {
            bail!("Registry needs at least one region");
        }

        let mut names = HashSet::new();
        let mut codes = HashSet::new();
        for language in &languages {
            if !names.insert(language.name.to_lowercase()) {
                bail!("Duplicate language name: {}", language.name);
            }
            if !codes.insert(language.code.as_str()) {
                bail!("Duplicate language code: {}", language.code);
            }
        }
        names.clear();
        let mut ids = HashSet::new();
        for region in &regions {
            if !names.insert(region.name.to_lowercase()) {
                bail!("Duplicate region name: {}", region.name);
            }
            if !ids.insert(region.region_id.as_str()) {
                bail!("Duplicate region id {} for {}", region.region_id, region.name);
            }
        }

        Ok(Self { languages, regions })
    }

    /// Loads a registry from a JSON file shaped like the serialized `Registry`.
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read registry file {}", path.display()))?;
        let registry: Registry = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse registry file {}", path.display()))?;
        info!(
            "Loaded {} languages and {} regions from {}",
            registry.languages.len(),
            registry.regions.len(),
            path.display()
        );
        Ok(registry)
    }

    pub fn languages(&self) -> &[Language] {
        &self.languages
    }

    pub fn regions(&self) -> &[RegionConfig] {
        &self.regions
    }

    /// Finds a language by display name (case-insensitive) or by code.
    pub fn language(&self, selection: &str) -> Option<&Language> {
        let wanted = selection.trim();
        self.languages
            .iter()
            .find(|l| l.name.eq_ignore_ascii_case(wanted) || l.code.as_str() == wanted)
            .or_else(|| {
                // "Tamil" should select "தமிழ் (Tamil)"
                let lowered = wanted.to_lowercase();
                self.languages
                    .iter()
                    .find(|l| l.name.to_lowercase().contains(&format!("({})", lowered)))
            })
    }

    /// Finds a region by display name (case-insensitive) or by region identifier.
    pub fn region(&self, selection: &str) -> Option<&RegionConfig> {
        let wanted = selection.trim();
        self.regions
            .iter()
            .find(|r| r.name.eq_ignore_ascii_case(wanted) || r.region_id.as_str() == wanted)
    }

    pub fn default_language(&self) -> &Language {
        &self.languages[0]
    }

    pub fn default_region(&self) -> &RegionConfig {
        &self.regions[0]
    }
}

impl Default for Registry {
    /// The reference table: five Indian languages and five states.
    fn default() -> Self {
        let language = |name: &str, code: &str| Language {
            name: name.to_string(),
            code: LanguageCode::parse(code).expect("built-in language code"),
        };
        let region = |name: &str, region_id: &str, figure: &str, monument: &str| RegionConfig {
            name: name.to_string(),
            region_id: EntityId::parse(region_id).expect("built-in region id"),
            featured_figure: EntityId::parse(figure).expect("built-in figure id"),
            featured_monument: EntityId::parse(monument).expect("built-in monument id"),
        };

        Self {
            languages: vec![
                language("English", "en"),
                language("हिंदी (Hindi)", "hi"),
                language("தமிழ் (Tamil)", "ta"),
                language("বাংলা (Bengali)", "bn"),
                language("ಕನ್ನಡ (Kannada)", "kn"),
            ],
            regions: vec![
                // Krishnadevaraya, Hampi
                region("Karnataka", "Q1185", "Q3349636", "Q34998"),
                // Shivaji, Ajanta Caves
                region("Maharashtra", "Q1191", "Q43416", "Q11438"),
                // Rajaraja I, Great Living Chola Temples
                region("Tamil Nadu", "Q1445", "Q372138", "Q24916262"),
                // Rani Lakshmibai, Taj Mahal
                region("Uttar Pradesh", "Q1498", "Q80093", "Q9542"),
                // Subhas Chandra Bose, Sundarbans National Park
                region("West Bengal", "Q1588", "Q2149", "Q190691"),
            ],
        }
    }
}
