//! Panel runtime tests.
//!
//! Runs `PanelState::update` and hands its effects to a real `Services`
//! backed by the recording provider, then feeds the resulting events back
//! in, the same way the app loop does.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio::sync::mpsc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::core::panel::{Effect, NoticeLevel, PanelMsg, PanelState};
use crate::core::preferences::PreferenceStore;
use crate::core::save::SaveClient;
use crate::core::voice::{PlaybackState, ProviderCommand, ProviderEventSink, Voice};
use crate::tests::mocks::RecordingProvider;
use crate::tui::events::AppEvent;
use crate::tui::services::{Services, TuiProviderSink};

struct Harness {
    panel: PanelState,
    services: Services,
    rx: mpsc::UnboundedReceiver<AppEvent>,
    notices: Vec<(NoticeLevel, String)>,
    _dir: tempfile::TempDir,
}

impl Harness {
    fn new(provider: RecordingProvider, endpoint: &str) -> (Self, Arc<RecordingProvider>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let sink: Arc<dyn ProviderEventSink> = Arc::new(TuiProviderSink::new(tx.clone()));
        let provider = Arc::new(provider.with_sink(sink));
        let dir = tempfile::tempdir().unwrap();
        let services = Services::with_parts(
            Arc::clone(&provider) as Arc<dyn crate::core::voice::SynthesisProvider>,
            SaveClient::new(endpoint),
            PreferenceStore::in_dir(dir.path()),
            tx,
        );
        let harness = Self {
            panel: PanelState::default(),
            services,
            rx,
            notices: Vec::new(),
            _dir: dir,
        };
        (harness, provider)
    }

    fn dispatch(&mut self, msg: PanelMsg) {
        let update = self.panel.update(msg);
        self.panel = update.state;
        for effect in update.effects {
            match effect {
                Effect::Notify(notice) => self.notices.push((notice.level, notice.message)),
                other => self.services.run_effect(other),
            }
        }
    }

    /// Wait for the next panel message from a background task.
    async fn next_msg(&mut self) -> PanelMsg {
        loop {
            let event = tokio::time::timeout(Duration::from_secs(5), self.rx.recv())
                .await
                .expect("timed out waiting for panel event")
                .expect("event channel closed");
            if let AppEvent::Panel(msg) = event {
                return msg;
            }
        }
    }

    /// Receive one message and apply it.
    async fn pump(&mut self) -> PanelMsg {
        let msg = self.next_msg().await;
        self.dispatch(msg.clone());
        msg
    }
}

fn voices() -> Vec<Voice> {
    vec![
        Voice::new("Microsoft David", "en-US"),
        Voice::new("Microsoft Zira", "en-US"),
        Voice::new("Amelie", "fr-FR"),
    ]
}

#[tokio::test]
async fn test_provider_check_loads_voices() {
    let (mut h, _provider) = Harness::new(RecordingProvider::new().with_voices(voices()), "http://127.0.0.1:9");
    h.services.check_provider();

    assert!(matches!(h.pump().await, PanelMsg::VoicesLoaded(_)));
    assert_eq!(h.panel.selection.criteria.selected_lang.as_deref(), Some("en-US"));
    assert_eq!(h.panel.selection.visible.len(), 2);
    assert_eq!(h.panel.selection.selected_voice.as_deref(), Some("Microsoft David"));
}

#[tokio::test]
async fn test_provider_check_unavailable_disables_controls() {
    let (mut h, provider) = Harness::new(RecordingProvider::unavailable(), "http://127.0.0.1:9");
    h.services.check_provider();

    assert!(matches!(h.pump().await, PanelMsg::ProviderUnavailable(_)));
    assert!(!h.panel.controls_enabled);
    assert!(h.panel.blocking_notice.is_some());

    h.dispatch(PanelMsg::SetText("Hello".into()));
    h.dispatch(PanelMsg::Speak);
    assert_eq!(h.panel.playback_state(), PlaybackState::Idle);
    assert!(provider.commands().is_empty());
}

#[tokio::test]
async fn test_speak_runs_through_provider() {
    let (mut h, provider) = Harness::new(RecordingProvider::new(), "http://127.0.0.1:9");
    h.dispatch(PanelMsg::VoicesLoaded(voices()));
    h.dispatch(PanelMsg::SelectVoice("Microsoft Zira".into()));
    h.dispatch(PanelMsg::SetRate(1.5));
    h.dispatch(PanelMsg::SetText("Hello there".into()));
    h.dispatch(PanelMsg::Speak);
    assert_eq!(h.panel.playback_state(), PlaybackState::Speaking);

    let id = match h.pump().await {
        PanelMsg::UtteranceStarted(id) => id,
        other => panic!("unexpected message: {other:?}"),
    };

    match &provider.commands()[0] {
        ProviderCommand::Start { id: started, request } => {
            assert_eq!(*started, id);
            assert_eq!(request.text(), "Hello there");
            assert_eq!(request.voice.as_ref().map(|v| v.name.as_str()), Some("Microsoft Zira"));
            assert!((request.params.rate - 1.5).abs() < 1e-6);
        }
        other => panic!("unexpected command: {other:?}"),
    }

    h.dispatch(PanelMsg::Pause);
    h.dispatch(PanelMsg::Speak);
    assert_eq!(h.panel.playback_state(), PlaybackState::Speaking);

    h.dispatch(PanelMsg::UtteranceEnded(id));
    assert_eq!(h.panel.playback_state(), PlaybackState::Idle);

    // The worker runs commands in order.
    tokio::time::sleep(Duration::from_millis(50)).await;
    let commands = provider.commands();
    assert!(matches!(commands[1], ProviderCommand::Pause));
    assert!(matches!(commands[2], ProviderCommand::Resume));
}

#[tokio::test]
async fn test_failed_start_returns_to_idle() {
    let (mut h, _provider) = Harness::new(RecordingProvider::new().failing(), "http://127.0.0.1:9");
    h.dispatch(PanelMsg::SetText("Hello".into()));
    h.dispatch(PanelMsg::Speak);

    assert!(matches!(h.pump().await, PanelMsg::ProviderCommandFailed(Some(_), _)));
    assert_eq!(h.panel.playback_state(), PlaybackState::Idle);
    assert!(h.notices.iter().any(|(level, _)| *level == NoticeLevel::Error));
}

#[tokio::test]
async fn test_open_text_file_replaces_text() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("notes.txt");
    std::fs::write(&file, "Read me aloud").unwrap();

    let (mut h, _provider) = Harness::new(RecordingProvider::new(), "http://127.0.0.1:9");
    h.dispatch(PanelMsg::SetText("old".into()));
    h.dispatch(PanelMsg::OpenFile(file));

    assert!(matches!(h.pump().await, PanelMsg::FileLoaded(_)));
    assert_eq!(h.panel.text, "Read me aloud");
}

#[tokio::test]
async fn test_open_non_text_file_keeps_text() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("notes.pdf");
    std::fs::write(&file, "binary").unwrap();

    let (mut h, _provider) = Harness::new(RecordingProvider::new(), "http://127.0.0.1:9");
    h.dispatch(PanelMsg::SetText("keep".into()));
    h.dispatch(PanelMsg::OpenFile(file));

    assert_eq!(h.panel.text, "keep");
    assert_eq!(
        h.notices.last(),
        Some(&(NoticeLevel::Error, "Please select a text file (.txt)".to_string()))
    );
}

#[tokio::test]
async fn test_save_reports_server_result() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/save-text"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Text saved successfully",
            "filename": "text_1.txt"
        })))
        .mount(&server)
        .await;

    let (mut h, _provider) = Harness::new(RecordingProvider::new(), &server.uri());
    h.dispatch(PanelMsg::SetText("Keep this".into()));
    h.dispatch(PanelMsg::SaveRequested);
    assert!(h.panel.saving);

    assert!(matches!(h.pump().await, PanelMsg::SaveSucceeded(_)));
    assert!(!h.panel.saving);
    assert_eq!(
        h.notices.last(),
        Some(&(NoticeLevel::Success, "Text saved successfully (text_1.txt)".to_string()))
    );
}
