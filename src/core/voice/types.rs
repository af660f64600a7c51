use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Error, Debug)]
pub enum VoiceError {
    #[error("Speech provider not available: {0}")]
    Unavailable(String),

    #[error("Provider error: {0}")]
    ProviderError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Operation not supported on this platform: {0}")]
    Unsupported(&'static str),
}

pub type Result<T> = std::result::Result<T, VoiceError>;

/// Validation failures raised before any provider call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter some text to speak")]
    EmptyText,
}

// ============================================================================
// Voice
// ============================================================================

/// A named synthesis profile tied to a language code.
///
/// `name` is a display identifier and is not guaranteed unique. `uri` is the
/// provider-specific handle used to select the voice when speaking.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Voice {
    pub name: String,
    pub lang: String,
    #[serde(default)]
    pub uri: String,
}

impl Voice {
    pub fn new(name: impl Into<String>, lang: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            uri: name.clone(),
            name,
            lang: lang.into(),
        }
    }

    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = uri.into();
        self
    }
}

// ============================================================================
// Speech Parameters
// ============================================================================

pub const RATE_MIN: f32 = 0.5;
pub const RATE_MAX: f32 = 2.0;
pub const RATE_STEP: f32 = 0.1;
pub const VOLUME_MIN: f32 = 0.0;
pub const VOLUME_MAX: f32 = 1.0;
pub const VOLUME_STEP: f32 = 0.05;
pub const PITCH_MIN: f32 = 0.0;
pub const PITCH_MAX: f32 = 2.0;
pub const PITCH_STEP: f32 = 0.1;

/// Rate, volume and pitch as bundled into every speak request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeechParams {
    pub rate: f32,
    pub volume: f32,
    pub pitch: f32,
}

impl Default for SpeechParams {
    fn default() -> Self {
        Self {
            rate: 1.0,
            volume: 1.0,
            pitch: 1.0,
        }
    }
}

impl SpeechParams {
    /// Build params, clamping every value into its allowed range.
    pub fn new(rate: f32, volume: f32, pitch: f32) -> Self {
        Self {
            rate: clamp_step(rate, RATE_MIN, RATE_MAX),
            volume: clamp_step(volume, VOLUME_MIN, VOLUME_MAX),
            pitch: clamp_step(pitch, PITCH_MIN, PITCH_MAX),
        }
    }

    pub fn with_rate(self, rate: f32) -> Self {
        Self::new(rate, self.volume, self.pitch)
    }

    pub fn with_volume(self, volume: f32) -> Self {
        Self::new(self.rate, volume, self.pitch)
    }

    pub fn with_pitch(self, pitch: f32) -> Self {
        Self::new(self.rate, self.volume, pitch)
    }

    /// Rate label as shown next to the slider, e.g. `1.2x`.
    pub fn rate_label(&self) -> String {
        format!("{:.1}x", self.rate)
    }

    /// Volume label as a rounded percentage, e.g. `75%`.
    pub fn volume_label(&self) -> String {
        format!("{}%", (self.volume * 100.0).round() as u32)
    }

    pub fn pitch_label(&self) -> String {
        format!("{:.1}", self.pitch)
    }
}

/// Clamp to range and round to two decimals so repeated steps don't drift.
fn clamp_step(value: f32, min: f32, max: f32) -> f32 {
    if value.is_nan() {
        return min;
    }
    (value.clamp(min, max) * 100.0).round() / 100.0
}

// ============================================================================
// Speak Request
// ============================================================================

/// Parameters needed to start one utterance. Built fresh per playback attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeakRequest {
    text: String,
    pub voice: Option<Voice>,
    pub params: SpeechParams,
}

impl SpeakRequest {
    /// Build a request. The text is trimmed and must not be empty.
    pub fn new(
        text: &str,
        voice: Option<Voice>,
        params: SpeechParams,
    ) -> std::result::Result<Self, ValidationError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ValidationError::EmptyText);
        }
        Ok(Self {
            text: text.to_string(),
            voice,
            params,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Identifier of one started utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UtteranceId(pub u64);

impl std::fmt::Display for UtteranceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_clamp() {
        let params = SpeechParams::new(5.0, -1.0, 9.0);
        assert_eq!(params.rate, RATE_MAX);
        assert_eq!(params.volume, VOLUME_MIN);
        assert_eq!(params.pitch, PITCH_MAX);
    }

    #[test]
    fn test_params_nan_goes_to_min() {
        let params = SpeechParams::default().with_rate(f32::NAN);
        assert_eq!(params.rate, RATE_MIN);
    }

    #[test]
    fn test_labels() {
        let params = SpeechParams::new(1.2, 0.75, 1.0);
        assert_eq!(params.rate_label(), "1.2x");
        assert_eq!(params.volume_label(), "75%");
        assert_eq!(params.pitch_label(), "1.0");
    }

    #[test]
    fn test_repeated_steps_do_not_drift() {
        let mut params = SpeechParams::default();
        for _ in 0..3 {
            params = params.with_rate(params.rate + RATE_STEP);
        }
        assert_eq!(params.rate, 1.3);
    }

    #[test]
    fn test_speak_request_trims() {
        let req = SpeakRequest::new("  hello  ", None, SpeechParams::default()).unwrap();
        assert_eq!(req.text(), "hello");
    }

    #[test]
    fn test_speak_request_rejects_blank() {
        let err = SpeakRequest::new(" \n\t ", None, SpeechParams::default()).unwrap_err();
        assert_eq!(err, ValidationError::EmptyText);
    }

    #[test]
    fn test_voice_uri_defaults_to_name() {
        let voice = Voice::new("David", "en-US");
        assert_eq!(voice.uri, "David");
        assert_eq!(voice.with_uri("en-us").uri, "en-us");
    }
}
