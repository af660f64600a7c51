//! Voice catalog snapshot and the language index derived from it.
//!
//! The catalog is replaced wholesale on every reload. Clones share the same
//! `Arc<[Voice]>`, so a reader holding an old snapshot never observes a
//! half-updated list.

use std::sync::Arc;

use indexmap::IndexSet;

use super::filter::{self, FilterCriteria};
use super::types::Voice;

// ============================================================================
// Voice Catalog
// ============================================================================

/// Immutable, ordered snapshot of the voices a provider offers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceCatalog {
    voices: Arc<[Voice]>,
}

impl Default for VoiceCatalog {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl VoiceCatalog {
    pub fn new(voices: Vec<Voice>) -> Self {
        Self {
            voices: voices.into(),
        }
    }

    pub fn voices(&self) -> &[Voice] {
        &self.voices
    }

    pub fn len(&self) -> usize {
        self.voices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }

    /// First voice with this display name.
    pub fn find_by_name(&self, name: &str) -> Option<&Voice> {
        self.voices.iter().find(|v| v.name == name)
    }

    /// Distinct language codes in first-seen order.
    pub fn language_index(&self) -> LanguageIndex {
        LanguageIndex {
            langs: self.voices.iter().map(|v| v.lang.clone()).collect(),
        }
    }
}

// ============================================================================
// Language Index
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LanguageIndex {
    langs: IndexSet<String>,
}

impl LanguageIndex {
    pub fn contains(&self, lang: &str) -> bool {
        self.langs.contains(lang)
    }

    pub fn first(&self) -> Option<&str> {
        self.langs.first().map(String::as_str)
    }

    pub fn position(&self, lang: &str) -> Option<usize> {
        self.langs.get_index_of(lang)
    }

    pub fn get(&self, idx: usize) -> Option<&str> {
        self.langs.get_index(idx).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.langs.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.langs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.langs.is_empty()
    }
}

// ============================================================================
// Reload
// ============================================================================

/// Everything that is recomputed when the provider's voice list changes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogSelection {
    pub catalog: VoiceCatalog,
    pub languages: LanguageIndex,
    pub criteria: FilterCriteria,
    pub visible: Vec<Voice>,
    pub selected_voice: Option<String>,
}

impl CatalogSelection {
    /// Replace the catalog with `voices` and recompute the index and filter.
    ///
    /// The previously selected language is kept if it is still present, else
    /// the first available language is selected. The same applies to the
    /// selected voice within the filtered list.
    pub fn reload(&self, voices: Vec<Voice>) -> Self {
        let catalog = VoiceCatalog::new(voices);
        let languages = catalog.language_index();

        let selected_lang = self
            .criteria
            .selected_lang
            .as_deref()
            .filter(|lang| languages.contains(lang))
            .or_else(|| languages.first())
            .map(str::to_string);

        let criteria = FilterCriteria {
            selected_lang,
            gender: self.criteria.gender,
        };

        log::debug!(
            "Voice catalog reloaded: {} voices, {} languages",
            catalog.len(),
            languages.len()
        );

        Self {
            catalog,
            languages,
            criteria,
            visible: Vec::new(),
            selected_voice: self.selected_voice.clone(),
        }
        .refilter()
    }

    /// Select a language. Unknown languages are ignored.
    pub fn select_language(&self, lang: &str) -> Self {
        if !self.languages.contains(lang) {
            return self.clone();
        }
        let mut next = self.clone();
        next.criteria.selected_lang = Some(lang.to_string());
        next.refilter()
    }

    pub fn select_gender(&self, gender: filter::GenderKeyword) -> Self {
        let mut next = self.clone();
        next.criteria.gender = gender;
        next.refilter()
    }

    /// Select a voice by name. Names outside the filtered list are ignored.
    pub fn select_voice(&self, name: &str) -> Self {
        let mut next = self.clone();
        if self.visible.iter().any(|v| v.name == name) {
            next.selected_voice = Some(name.to_string());
        }
        next
    }

    /// Resolve the selected voice by name against the current catalog.
    /// `None` means the provider default voice.
    pub fn resolve_selected(&self) -> Option<Voice> {
        self.selected_voice
            .as_deref()
            .and_then(|name| self.catalog.find_by_name(name))
            .cloned()
    }

    fn refilter(mut self) -> Self {
        self.visible = filter::apply(self.catalog.voices(), &self.criteria);
        let keep = self
            .selected_voice
            .as_deref()
            .is_some_and(|name| self.visible.iter().any(|v| v.name == name));
        if !keep {
            self.selected_voice = self.visible.first().map(|v| v.name.clone());
        }
        self
    }
}

// ============================================================================
// Display Names
// ============================================================================

const LANGUAGE_NAMES: &[(&str, &str)] = &[
    ("af", "Afrikaans"),
    ("ar", "Arabic"),
    ("bg", "Bulgarian"),
    ("bn", "Bangla"),
    ("ca", "Catalan"),
    ("cs", "Czech"),
    ("cy", "Welsh"),
    ("da", "Danish"),
    ("de", "German"),
    ("el", "Greek"),
    ("en", "English"),
    ("eo", "Esperanto"),
    ("es", "Spanish"),
    ("et", "Estonian"),
    ("eu", "Basque"),
    ("fa", "Persian"),
    ("fi", "Finnish"),
    ("fr", "French"),
    ("ga", "Irish"),
    ("he", "Hebrew"),
    ("hi", "Hindi"),
    ("hr", "Croatian"),
    ("hu", "Hungarian"),
    ("id", "Indonesian"),
    ("is", "Icelandic"),
    ("it", "Italian"),
    ("ja", "Japanese"),
    ("ko", "Korean"),
    ("la", "Latin"),
    ("lt", "Lithuanian"),
    ("lv", "Latvian"),
    ("ms", "Malay"),
    ("nb", "Norwegian Bokmål"),
    ("nl", "Dutch"),
    ("pl", "Polish"),
    ("pt", "Portuguese"),
    ("ro", "Romanian"),
    ("ru", "Russian"),
    ("sk", "Slovak"),
    ("sl", "Slovenian"),
    ("sr", "Serbian"),
    ("sv", "Swedish"),
    ("sw", "Swahili"),
    ("ta", "Tamil"),
    ("th", "Thai"),
    ("tr", "Turkish"),
    ("uk", "Ukrainian"),
    ("ur", "Urdu"),
    ("vi", "Vietnamese"),
    ("zh", "Chinese"),
];

/// English name of the primary subtag, if known (`en-US` → `English`).
pub fn language_name(lang: &str) -> Option<&'static str> {
    let primary = lang.split(['-', '_']).next()?.to_lowercase();
    LANGUAGE_NAMES
        .iter()
        .find(|(code, _)| *code == primary)
        .map(|(_, name)| *name)
}

/// Selector label for a language code, e.g. `English (en-US)`.
pub fn language_label(lang: &str) -> String {
    match language_name(lang) {
        Some(name) => format!("{name} ({lang})"),
        None => lang.to_string(),
    }
}
