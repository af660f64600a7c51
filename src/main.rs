mod args;

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use speakpanel::config::AppConfig;
use speakpanel::core::logging;
use speakpanel::core::voice::providers::NoopSink;
use speakpanel::core::voice::{language_label, EspeakProvider, GenderKeyword, SynthesisProvider};
use speakpanel::server::{serve_until, SaveTextService};

use args::{Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?
            .with_context(|| format!("config file not found: {}", path.display()))?,
        None => AppConfig::load(),
    };
    let data_dir = config.data_dir();

    match cli.command.unwrap_or(Command::Panel {
        endpoint: None,
        serve: false,
    }) {
        Command::Panel { endpoint, serve } => {
            let _log_guard = logging::init_tui(&data_dir);
            log::info!("{} v{} starting", speakpanel::NAME, speakpanel::VERSION);

            let mut config = config;
            if let Some(endpoint) = endpoint {
                config.save.endpoint = endpoint;
            }

            let mut service = None;
            if serve {
                let mut embedded = SaveTextService::new(config.server.addr(), config.server.saves_dir.clone());
                embedded.start().await?;
                config.save.endpoint = embedded.url();
                service = Some(embedded);
            }

            speakpanel::tui::run(&config).await?;

            if let Some(mut service) = service {
                service.stop();
            }
        }
        Command::Serve { host, port, saves_dir } => {
            let _log_guard = logging::init(&data_dir);

            let mut server = config.server;
            if let Some(host) = host {
                server.host = host;
            }
            if let Some(port) = port {
                server.port = port;
            }
            if let Some(dir) = saves_dir {
                server.saves_dir = dir;
            }

            serve_until(server.addr(), server.saves_dir, async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    log::error!("Failed to listen for Ctrl+C: {e}");
                }
            })
            .await?;
        }
        Command::Voices { lang, gender } => {
            let _log_guard = logging::init(&data_dir);
            print_voices(&config, lang.as_deref(), gender).await?;
        }
    }

    Ok(())
}

async fn print_voices(config: &AppConfig, lang: Option<&str>, gender: GenderKeyword) -> anyhow::Result<()> {
    let provider = EspeakProvider::locate(&config.speech.espeak_bin, Arc::new(NoopSink))?;
    let voices = provider.list_voices().await?;

    let mut by_lang: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for voice in &voices {
        if lang.is_some_and(|l| l != voice.lang) || !gender.matches(voice) {
            continue;
        }
        by_lang.entry(voice.lang.as_str()).or_default().push(voice.name.as_str());
    }

    if by_lang.is_empty() {
        println!("No voices match.");
        return Ok(());
    }
    for (lang, names) in by_lang {
        println!("{}", language_label(lang));
        for name in names {
            println!("  {name}");
        }
    }
    Ok(())
}
