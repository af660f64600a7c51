//! Voice catalog, selection and playback.

pub mod catalog;
pub mod filter;
pub mod playback;
pub mod providers;
pub mod types;

pub use catalog::{language_label, CatalogSelection, LanguageIndex, VoiceCatalog};
pub use filter::{FilterCriteria, GenderKeyword};
pub use playback::{Playback, PlaybackError, PlaybackState, ProviderCommand};
pub use providers::{EspeakProvider, ProviderEvent, ProviderEventSink, SynthesisProvider};
pub use types::{SpeakRequest, SpeechParams, UtteranceId, ValidationError, Voice, VoiceError};
