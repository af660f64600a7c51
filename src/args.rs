use clap::{Parser, Subcommand};
use speakpanel::core::voice::GenderKeyword;
use std::net::IpAddr;
use std::path::PathBuf;

/// Terminal text-to-speech control panel
///
/// Runs the interactive panel by default. `serve` hosts the `/save-text`
/// endpoint the panel saves to.
#[derive(Parser, Debug)]
#[command(name = "speakpanel")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file (defaults to ~/.config/speakpanel/config.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Open the interactive panel (default)
    Panel {
        /// Save endpoint base URL (overrides config)
        #[arg(long, conflicts_with = "serve")]
        endpoint: Option<String>,

        /// Also run the save service in-process and save to it
        #[arg(long)]
        serve: bool,
    },

    /// Serve the save-text endpoint in the foreground
    Serve {
        /// Address to bind (overrides config)
        #[arg(long)]
        host: Option<IpAddr>,

        /// Port to bind (overrides config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Directory saved texts are written to (overrides config)
        #[arg(long)]
        saves_dir: Option<PathBuf>,
    },

    /// Print the voices the speech engine offers
    Voices {
        /// Only show this language tag (e.g. en-US)
        #[arg(short, long)]
        lang: Option<String>,

        /// Gender keyword filter: all, male or female
        #[arg(short, long, default_value = "all")]
        gender: GenderKeyword,
    },
}
