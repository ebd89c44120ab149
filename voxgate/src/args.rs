use std::path::PathBuf;

use clap::Parser;

/// Voxgate speech proxy
#[derive(Debug, Parser)]
#[command(name = "voxgate", about = "Proxy that turns Gemini text-to-speech output into WAV files")]
pub struct Args {
    /// Path to configuration file, built-in defaults apply when absent
    #[arg(short, long, env = "VOXGATE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the listen address
    #[arg(long, env = "VOXGATE_LISTEN")]
    pub listen: Option<std::net::SocketAddr>,
}
