use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// `EcoEarn` - receipt and shopping-bag verification gateway.
#[derive(Parser, Debug)]
#[command(name = "ecoearn")]
#[command(version)]
#[command(about = "Verify receipt photos and reward recyclable bag purchases.", long_about = None)]
pub struct Cli {
    /// Config file to load instead of ~/.ecoearn/config.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP gateway
    Serve {
        /// Port to listen on (use 0 for random available port)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,
    },

    /// Classify a single photo and print the verdict as JSON
    Classify {
        /// Path to a PNG, JPEG, GIF or WebP photo
        image: PathBuf,

        /// Caller UTC offset in minutes used for the receipt date check
        #[arg(long, allow_hyphen_values = true)]
        utc_offset_minutes: Option<i32>,
    },
}
