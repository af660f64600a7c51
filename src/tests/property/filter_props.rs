//! Property-based tests for voice filtering.

use proptest::prelude::*;

use crate::core::voice::filter::{self, FilterCriteria};
use crate::core::voice::{CatalogSelection, GenderKeyword, Voice};

// ============================================================================
// Strategies
// ============================================================================

const LANGS: &[&str] = &["en-US", "en-GB", "fr-FR", "ko-KR", "de-DE"];
const NAME_PARTS: &[&str] = &["David", "Zira", "Female", "Male", "Hazel", "Mark", "Voice", "Nova"];

fn arb_voice() -> impl Strategy<Value = Voice> {
    (
        prop::sample::select(NAME_PARTS),
        prop::sample::select(NAME_PARTS),
        prop::sample::select(LANGS),
        0u8..100,
    )
        .prop_map(|(a, b, lang, n)| Voice::new(format!("{a} {b} {n}"), lang))
}

fn arb_catalog() -> impl Strategy<Value = Vec<Voice>> {
    prop::collection::vec(arb_voice(), 0..30)
}

fn arb_gender() -> impl Strategy<Value = GenderKeyword> {
    prop::sample::select(GenderKeyword::ALL.to_vec())
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn filtered_is_ordered_subset(catalog in arb_catalog(), lang in prop::sample::select(LANGS), gender in arb_gender()) {
        let result = filter::filter(&catalog, lang, gender);

        // Walk the catalog once: every result entry must appear in order.
        let mut source = catalog.iter();
        for voice in &result {
            prop_assert!(source.any(|v| v == voice), "{} out of order or missing", voice.name);
        }
    }

    #[test]
    fn filtered_voices_match_language(catalog in arb_catalog(), lang in prop::sample::select(LANGS), gender in arb_gender()) {
        for voice in filter::filter(&catalog, lang, gender) {
            prop_assert_eq!(voice.lang.as_str(), lang);
        }
    }

    #[test]
    fn gendered_results_narrow_all(catalog in arb_catalog(), lang in prop::sample::select(LANGS)) {
        let all = filter::filter(&catalog, lang, GenderKeyword::All);
        for gender in [GenderKeyword::Male, GenderKeyword::Female] {
            for voice in filter::filter(&catalog, lang, gender) {
                prop_assert!(all.contains(&voice));
            }
        }
    }

    #[test]
    fn apply_matches_filter(catalog in arb_catalog(), lang in prop::sample::select(LANGS), gender in arb_gender()) {
        let criteria = FilterCriteria { selected_lang: Some(lang.to_string()), gender };
        prop_assert_eq!(filter::apply(&catalog, &criteria), filter::filter(&catalog, lang, gender));
    }

    #[test]
    fn reload_is_idempotent(catalog in arb_catalog(), gender in arb_gender()) {
        let base = CatalogSelection::default().select_gender(gender);
        let once = base.reload(catalog.clone());
        let twice = once.reload(catalog);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn reload_selects_known_language(catalog in arb_catalog()) {
        let selection = CatalogSelection::default().reload(catalog.clone());
        match &selection.criteria.selected_lang {
            Some(lang) => prop_assert!(catalog.iter().any(|v| &v.lang == lang)),
            None => prop_assert!(catalog.is_empty()),
        }
        if let Some(name) = &selection.selected_voice {
            prop_assert!(selection.visible.iter().any(|v| &v.name == name));
        }
    }
}
