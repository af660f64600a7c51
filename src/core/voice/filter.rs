//! Voice filtering by language and a coarse gender keyword.
//!
//! Gender classification is a best-effort name heuristic: a voice counts as
//! "male" or "female" when its lowercased name contains one of the keywords
//! below. Nothing is verified against the provider, and since `female`
//! contains `male`, a voice named "... Female" also passes the male filter.

use serde::{Deserialize, Serialize};

use super::types::Voice;

const MALE_KEYWORDS: &[&str] = &["male", "david", "james", "mark", "george"];
const FEMALE_KEYWORDS: &[&str] = &["female", "zira", "sarah", "hazel", "susan"];

/// Coarse gender keyword used to narrow the voice list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenderKeyword {
    #[default]
    All,
    Male,
    Female,
}

impl GenderKeyword {
    pub const ALL: [GenderKeyword; 3] = [GenderKeyword::All, GenderKeyword::Male, GenderKeyword::Female];

    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Male => "Male",
            Self::Female => "Female",
        }
    }

    /// Keywords for this category; empty for `All`.
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            Self::All => &[],
            Self::Male => MALE_KEYWORDS,
            Self::Female => FEMALE_KEYWORDS,
        }
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|&g| g == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|&g| g == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// Literal substring test against the lowercased voice name.
    pub fn matches(self, voice: &Voice) -> bool {
        if self == Self::All {
            return true;
        }
        let name = voice.name.to_lowercase();
        self.keywords().iter().any(|kw| name.contains(kw))
    }
}

impl std::str::FromStr for GenderKeyword {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            other => Err(format!("unknown gender keyword: {other}")),
        }
    }
}

/// The voice filter inputs.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub selected_lang: Option<String>,
    pub gender: GenderKeyword,
}

/// Ordered subsequence of `catalog` with `lang == selected_lang` (exact match)
/// that also passes the gender keyword test.
pub fn filter(catalog: &[Voice], selected_lang: &str, gender: GenderKeyword) -> Vec<Voice> {
    catalog
        .iter()
        .filter(|v| v.lang == selected_lang && gender.matches(v))
        .cloned()
        .collect()
}

/// [`filter`] driven by [`FilterCriteria`]; no language selected means no voices.
pub fn apply(catalog: &[Voice], criteria: &FilterCriteria) -> Vec<Voice> {
    match criteria.selected_lang.as_deref() {
        Some(lang) => filter(catalog, lang, criteria.gender),
        None => Vec::new(),
    }
}
