use std::sync::Arc;

use tokio::sync::mpsc;

use crate::config::AppConfig;
use crate::core::panel::{Effect, PanelMsg};
use crate::core::preferences::PreferenceStore;
use crate::core::save::SaveClient;
use crate::core::text_file::read_text_file;
use crate::core::voice::providers::{run_command, ProviderEvent, ProviderEventSink};
use crate::core::voice::{EspeakProvider, ProviderCommand, SynthesisProvider, UtteranceId};

use super::events::AppEvent;

/// Handle to everything the panel talks to outside its own state.
///
/// Effects returned by the panel update are executed here on spawned tasks;
/// results come back as [`AppEvent::Panel`] messages.
pub struct Services {
    pub provider: Arc<dyn SynthesisProvider>,
    pub save: SaveClient,
    pub preferences: PreferenceStore,
    pub event_tx: mpsc::UnboundedSender<AppEvent>,
    commands: mpsc::UnboundedSender<ProviderCommand>,
}

impl Services {
    /// Build services from config. A missing speech engine is not fatal here;
    /// [`Services::check_provider`] reports it to the panel.
    pub fn init(config: &AppConfig, event_tx: mpsc::UnboundedSender<AppEvent>) -> Self {
        let sink: Arc<dyn ProviderEventSink> = Arc::new(TuiProviderSink::new(event_tx.clone()));
        let provider: Arc<dyn SynthesisProvider> =
            match EspeakProvider::locate(&config.speech.espeak_bin, Arc::clone(&sink)) {
                Ok(provider) => Arc::new(provider),
                Err(e) => {
                    log::warn!("{e}");
                    Arc::new(EspeakProvider::new(&config.speech.espeak_bin, sink))
                }
            };

        Self::with_parts(
            provider,
            SaveClient::new(config.save.endpoint.clone()),
            PreferenceStore::in_dir(&config.data_dir()),
            event_tx,
        )
    }

    pub fn with_parts(
        provider: Arc<dyn SynthesisProvider>,
        save: SaveClient,
        preferences: PreferenceStore,
        event_tx: mpsc::UnboundedSender<AppEvent>,
    ) -> Self {
        let commands = spawn_command_worker(Arc::clone(&provider), event_tx.clone());
        Self {
            provider,
            save,
            preferences,
            event_tx,
            commands,
        }
    }

    fn send(&self, msg: PanelMsg) {
        send_panel(&self.event_tx, msg);
    }

    /// Check the provider once and either load voices or disable playback.
    pub fn check_provider(&self) {
        let provider = Arc::clone(&self.provider);
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            if provider.is_available().await {
                load_voices(provider.as_ref(), &tx).await;
            } else {
                send_panel(
                    &tx,
                    PanelMsg::ProviderUnavailable(format!("{} could not be started", provider.id())),
                );
            }
        });
    }

    /// Execute one effect. Notifications are handled by the app itself.
    pub fn run_effect(&self, effect: Effect) {
        match effect {
            Effect::Provider(command) => {
                if self.commands.send(command).is_err() {
                    self.send(PanelMsg::ProviderCommandFailed(None, "speech worker stopped".into()));
                }
            }
            Effect::ReloadVoices => {
                let provider = Arc::clone(&self.provider);
                let tx = self.event_tx.clone();
                tokio::spawn(async move { load_voices(provider.as_ref(), &tx).await });
            }
            Effect::SaveText(text) => {
                let client = self.save.clone();
                let tx = self.event_tx.clone();
                tokio::spawn(async move {
                    let msg = match client.save_text(&text).await {
                        Ok(receipt) => PanelMsg::SaveSucceeded(receipt),
                        Err(e) => PanelMsg::SaveFailed(e.user_message()),
                    };
                    send_panel(&tx, msg);
                });
            }
            Effect::ReadFile(path) => {
                let tx = self.event_tx.clone();
                tokio::spawn(async move {
                    let msg = match read_text_file(&path).await {
                        Ok(text) => PanelMsg::FileLoaded(text),
                        Err(e) => {
                            log::warn!("Failed to load {}: {e}", path.display());
                            PanelMsg::FileFailed(e.to_string())
                        }
                    };
                    send_panel(&tx, msg);
                });
            }
            Effect::PersistTheme(theme) => {
                let store = self.preferences.clone();
                tokio::spawn(async move {
                    if let Err(e) = store.save_theme(theme).await {
                        log::warn!("Failed to persist theme: {e}");
                    }
                });
            }
            Effect::Notify(notice) => {
                let _ = self.event_tx.send(AppEvent::Notification(notice.into()));
            }
        }
    }
}

fn send_panel(tx: &mpsc::UnboundedSender<AppEvent>, msg: PanelMsg) {
    if tx.send(AppEvent::Panel(msg)).is_err() {
        log::debug!("Panel event dropped: app closed");
    }
}

async fn load_voices(provider: &dyn SynthesisProvider, tx: &mpsc::UnboundedSender<AppEvent>) {
    match provider.list_voices().await {
        Ok(voices) => {
            log::info!("Loaded {} voices from {}", voices.len(), provider.id());
            send_panel(tx, PanelMsg::VoicesLoaded(voices));
        }
        Err(e) => {
            log::error!("Voice listing failed: {e}");
            send_panel(tx, PanelMsg::VoicesLoaded(Vec::new()));
        }
    }
}

/// Runs provider commands one at a time, in the order the panel issued them.
fn spawn_command_worker(
    provider: Arc<dyn SynthesisProvider>,
    event_tx: mpsc::UnboundedSender<AppEvent>,
) -> mpsc::UnboundedSender<ProviderCommand> {
    let (tx, mut rx) = mpsc::unbounded_channel::<ProviderCommand>();
    tokio::spawn(async move {
        // Pause, Resume and Cancel act on the most recently started utterance.
        let mut current: Option<UtteranceId> = None;
        while let Some(command) = rx.recv().await {
            if let ProviderCommand::Start { id, .. } = &command {
                current = Some(*id);
            }
            if let Err(e) = run_command(provider.as_ref(), command).await {
                log::error!("Speech command for {current:?} failed: {e}");
                send_panel(&event_tx, PanelMsg::ProviderCommandFailed(current, e.to_string()));
            }
        }
        log::debug!("Speech command worker stopped");
    });
    tx
}

/// Provider event sink that forwards events into the TUI event channel.
pub struct TuiProviderSink {
    tx: mpsc::UnboundedSender<AppEvent>,
}

impl TuiProviderSink {
    pub fn new(tx: mpsc::UnboundedSender<AppEvent>) -> Self {
        Self { tx }
    }
}

impl ProviderEventSink for TuiProviderSink {
    fn emit(&self, event: ProviderEvent) {
        log::debug!("Provider event: {event:?}");
        let msg = match event {
            ProviderEvent::VoicesChanged => PanelMsg::ReloadVoices,
            ProviderEvent::UtteranceStarted { id } => PanelMsg::UtteranceStarted(id),
            ProviderEvent::UtteranceEnded { id } => PanelMsg::UtteranceEnded(id),
            ProviderEvent::UtteranceFailed { id, message } => PanelMsg::UtteranceFailed(id, message),
        };
        send_panel(&self.tx, msg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::voice::UtteranceId;

    #[test]
    fn test_sink_maps_events() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let sink = TuiProviderSink::new(tx);
        sink.emit(ProviderEvent::UtteranceEnded { id: UtteranceId(4) });
        sink.emit(ProviderEvent::VoicesChanged);

        match rx.try_recv().unwrap() {
            AppEvent::Panel(PanelMsg::UtteranceEnded(id)) => assert_eq!(id, UtteranceId(4)),
            other => panic!("unexpected event: {other:?}"),
        }
        assert!(matches!(rx.try_recv().unwrap(), AppEvent::Panel(PanelMsg::ReloadVoices)));
    }
}
