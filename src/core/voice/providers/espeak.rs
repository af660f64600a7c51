//! eSpeak NG provider.
//!
//! Drives the `espeak-ng` command line tool. Each utterance is one child
//! process; pause and resume stop and continue that process with
//! `SIGSTOP`/`SIGCONT`, so they are only supported on unix.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::sync::{oneshot, Mutex};

use super::{ProviderEvent, ProviderEventSink, SynthesisProvider};
use crate::core::voice::types::{Result, SpeakRequest, SpeechParams, UtteranceId, Voice, VoiceError};

const BASE_WPM: f32 = 175.0;
const MIN_WPM: u32 = 80;
const MAX_WPM: u32 = 450;

/// An utterance that has been spawned and not yet reaped.
struct Running {
    id: UtteranceId,
    pid: Option<u32>,
    cancel: oneshot::Sender<()>,
}

pub struct EspeakProvider {
    binary: PathBuf,
    sink: Arc<dyn ProviderEventSink>,
    running: Arc<Mutex<Option<Running>>>,
}

impl EspeakProvider {
    pub fn new(binary: impl Into<PathBuf>, sink: Arc<dyn ProviderEventSink>) -> Self {
        Self {
            binary: binary.into(),
            sink,
            running: Arc::new(Mutex::new(None)),
        }
    }

    /// Resolve `program` on `PATH` (or accept it as a path) and build a provider.
    pub fn locate(program: &str, sink: Arc<dyn ProviderEventSink>) -> Result<Self> {
        let binary = which::which(program)
            .map_err(|e| VoiceError::Unavailable(format!("{program}: {e}")))?;
        log::info!("Using speech engine at {}", binary.display());
        Ok(Self::new(binary, sink))
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    async fn stop_running(&self) -> Option<UtteranceId> {
        let running = self.running.lock().await.take()?;
        // The waiter task owns the child and kills it on receipt.
        let _ = running.cancel.send(());
        Some(running.id)
    }

    async fn signal_running(&self, action: SignalAction) -> Result<()> {
        let guard = self.running.lock().await;
        let Some(pid) = guard.as_ref().and_then(|r| r.pid) else {
            return Err(VoiceError::ProviderError("Nothing is playing".to_string()));
        };
        send_signal(pid, action)
    }
}

#[async_trait]
impl SynthesisProvider for EspeakProvider {
    fn id(&self) -> &'static str {
        "espeak-ng"
    }

    async fn is_available(&self) -> bool {
        match Command::new(&self.binary)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
        {
            Ok(status) => status.success(),
            Err(e) => {
                log::warn!("Speech engine check failed: {e}");
                false
            }
        }
    }

    async fn list_voices(&self) -> Result<Vec<Voice>> {
        let output = Command::new(&self.binary).arg("--voices").output().await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(VoiceError::ProviderError(format!(
                "voice listing failed ({}): {}",
                output.status,
                stderr.trim()
            )));
        }
        let voices = parse_voice_list(&String::from_utf8_lossy(&output.stdout));
        log::debug!("espeak-ng reported {} voices", voices.len());
        Ok(voices)
    }

    async fn speak(&self, id: UtteranceId, request: &SpeakRequest) -> Result<()> {
        if let Some(previous) = self.stop_running().await {
            log::debug!("Cancelled {previous} to start {id}");
        }

        let mut child = Command::new(&self.binary)
            .args(speak_args(request))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        let pid = child.id();
        let (cancel_tx, cancel_rx) = oneshot::channel();
        *self.running.lock().await = Some(Running {
            id,
            pid,
            cancel: cancel_tx,
        });
        self.sink.emit(ProviderEvent::UtteranceStarted { id });

        let sink = Arc::clone(&self.sink);
        let running = Arc::clone(&self.running);
        tokio::spawn(async move {
            let stderr = child.stderr.take();
            tokio::select! {
                status = child.wait() => {
                    {
                        let mut guard = running.lock().await;
                        if guard.as_ref().is_some_and(|r| r.id == id) {
                            guard.take();
                        }
                    }
                    let event = match status {
                        Ok(status) if status.success() => ProviderEvent::UtteranceEnded { id },
                        Ok(status) => {
                            let detail = read_stderr(stderr).await;
                            ProviderEvent::UtteranceFailed {
                                id,
                                message: failure_message(status.to_string(), &detail),
                            }
                        }
                        Err(e) => ProviderEvent::UtteranceFailed { id, message: e.to_string() },
                    };
                    sink.emit(event);
                }
                _ = cancel_rx => {
                    if let Err(e) = child.kill().await {
                        log::warn!("Failed to kill utterance {id}: {e}");
                    }
                }
            }
        });

        Ok(())
    }

    async fn pause(&self) -> Result<()> {
        self.signal_running(SignalAction::Pause).await
    }

    async fn resume(&self) -> Result<()> {
        self.signal_running(SignalAction::Resume).await
    }

    async fn cancel(&self) -> Result<()> {
        if let Some(id) = self.stop_running().await {
            log::debug!("Cancelled {id}");
        }
        Ok(())
    }
}

// ============================================================================
// Process signals
// ============================================================================

#[derive(Debug, Clone, Copy)]
enum SignalAction {
    Pause,
    Resume,
}

#[cfg(unix)]
fn send_signal(pid: u32, action: SignalAction) -> Result<()> {
    let signal = match action {
        SignalAction::Pause => libc::SIGSTOP,
        SignalAction::Resume => libc::SIGCONT,
    };
    // SAFETY: kill(2) has no memory-safety preconditions.
    let rc = unsafe { libc::kill(pid as libc::pid_t, signal) };
    if rc != 0 {
        return Err(std::io::Error::last_os_error().into());
    }
    Ok(())
}

#[cfg(not(unix))]
fn send_signal(_pid: u32, action: SignalAction) -> Result<()> {
    Err(VoiceError::Unsupported(match action {
        SignalAction::Pause => "pause",
        SignalAction::Resume => "resume",
    }))
}

async fn read_stderr(stderr: Option<tokio::process::ChildStderr>) -> String {
    use tokio::io::AsyncReadExt;

    let Some(mut stderr) = stderr else {
        return String::new();
    };
    let mut buf = String::new();
    if stderr.read_to_string(&mut buf).await.is_err() {
        return String::new();
    }
    buf.trim().to_string()
}

fn failure_message(status: String, detail: &str) -> String {
    if detail.is_empty() {
        format!("speech engine exited with {status}")
    } else {
        format!("speech engine exited with {status}: {detail}")
    }
}

// ============================================================================
// Argument mapping
// ============================================================================

/// Words per minute for a rate multiplier.
pub fn words_per_minute(rate: f32) -> u32 {
    ((BASE_WPM * rate).round() as u32).clamp(MIN_WPM, MAX_WPM)
}

/// espeak amplitude (0-200, 100 is normal) for a 0.0-1.0 volume.
pub fn amplitude(volume: f32) -> u32 {
    ((100.0 * volume).round() as u32).min(200)
}

/// espeak pitch (0-99, 50 is normal) for a 0.0-2.0 pitch multiplier.
pub fn pitch_level(pitch: f32) -> u32 {
    ((50.0 * pitch).round() as u32).min(99)
}

fn param_args(params: &SpeechParams) -> [String; 6] {
    [
        "-s".to_string(),
        words_per_minute(params.rate).to_string(),
        "-a".to_string(),
        amplitude(params.volume).to_string(),
        "-p".to_string(),
        pitch_level(params.pitch).to_string(),
    ]
}

/// Full argument list for one utterance. The text follows `--` so input
/// starting with a dash is not read as an option.
pub fn speak_args(request: &SpeakRequest) -> Vec<String> {
    let mut args = Vec::with_capacity(10);
    if let Some(voice) = &request.voice {
        args.push("-v".to_string());
        args.push(voice.uri.clone());
    }
    args.extend(param_args(&request.params));
    args.push("--".to_string());
    args.push(request.text().to_string());
    args
}

// ============================================================================
// Voice list parsing
// ============================================================================

/// Parse `espeak-ng --voices` output.
///
/// Columns are `Pty Language Age/Gender VoiceName File [Other Languages]`.
/// The language column becomes both the BCP 47 tag (`en-us` → `en-US`) and
/// the `-v` handle.
pub fn parse_voice_list(output: &str) -> Vec<Voice> {
    output
        .lines()
        .filter(|line| !line.trim_start().starts_with("Pty"))
        .filter_map(|line| {
            let mut cols = line.split_whitespace();
            let _priority = cols.next()?.parse::<u32>().ok()?;
            let lang = cols.next()?;
            let _age_gender = cols.next()?;
            let name = cols.next()?;
            Some(Voice::new(name.replace('_', " "), normalize_lang(lang)).with_uri(lang))
        })
        .collect()
}

/// Uppercase a two-letter region subtag: `en-us` → `en-US`, `pt-br` → `pt-BR`.
pub fn normalize_lang(code: &str) -> String {
    code.split('-')
        .enumerate()
        .map(|(i, part)| {
            if i == 1 && part.len() == 2 && part.chars().all(|c| c.is_ascii_alphabetic()) {
                part.to_ascii_uppercase()
            } else {
                part.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}
