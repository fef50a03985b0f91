use std::path::PathBuf;

use clap::{Parser, Subcommand};
use snaplink_crypto::LinkStyle;
use tracing_subscriber::EnvFilter;

mod api_client;
mod commands;
mod config;
#[cfg(test)]
mod test_util;

use commands::create::{Expiry, Input};

#[derive(Parser)]
#[command(
    name = "snaplink",
    version,
    about = "snaplink: share secrets through links that work exactly once"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt a secret, upload it, and print a one-time link
    Create {
        /// Secret text; read from stdin when omitted
        text: Option<String>,
        /// Share a file instead of text
        #[arg(long, conflicts_with = "text")]
        file: Option<PathBuf>,
        /// Delete the secret after this long if nobody opens it
        #[arg(long, value_enum, default_value_t = Expiry::Day)]
        expires: Expiry,
        /// Print a compact `#<id>_<key>` link
        #[arg(long)]
        compact: bool,
    },
    /// Open a link. This consumes the secret on the server.
    View {
        link: String,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
        /// Directory for shared files (defaults to storage.download_dir)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Print a fresh base58 key
    Keygen,
    /// Check whether a string is a valid snaplink key
    CheckKey { key: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Create {
            text,
            file,
            expires,
            compact,
        } => {
            let config = config::CliConfig::load()?;
            let api = api_client::ApiClient::from_config(&config);
            let input = match (file, text) {
                (Some(path), _) => Input::File(path),
                (None, Some(text)) => Input::Text(text),
                (None, None) => Input::Text(commands::create::read_stdin().await?),
            };
            let style = if compact {
                LinkStyle::Compact
            } else {
                config.link.style
            };
            commands::create::run(&config, &api, input, expires, style, &mut std::io::stdout())
                .await?;
        }
        Commands::View { link, yes, output } => {
            let config = config::CliConfig::load()?;
            let api = api_client::ApiClient::from_config(&config);
            commands::view::run(&config, &api, &link, yes, output, &mut std::io::stdout())
                .await?;
        }
        Commands::Keygen => commands::keygen::run(),
        Commands::CheckKey { key } => commands::keygen::check(&key)?,
    }

    Ok(())
}
