//! Image Upload - Dropbox to Slack
//!
//! Uploads a base64-encoded image to Dropbox, creates (or reuses) a public
//! shared link for it, and posts that link to a Slack incoming webhook.
//!
//! # Usage
//!
//! ```bash
//! # Upload and post to Slack
//! image-upload-to-dropbox-and-post-to-slack \
//!     --content "$(base64 screenshot.png)" \
//!     --dropbox-access-token "$DROPBOX_TOKEN" \
//!     --dropbox-file-path /failures/build-42.png \
//!     --slack-webhook https://hooks.slack.com/services/T000/B000/XXXX
//!
//! # Upload only, printing the shared link
//! image-upload-to-dropbox-and-post-to-slack -c "$IMAGE" -a "$TOKEN" -p /failures/a.png
//!
//! # Debug logging
//! RUST_LOG=debug image-upload-to-dropbox-and-post-to-slack ...
//! ```
//!
//! Every flag can also be set through its `IMAGE_UPLOAD_TO_DROPBOX_AND_POST_TO_SLACK_*`
//! environment variable.

mod config;
mod pipeline;
mod shutdown;

use clap::{CommandFactory, Parser};
use colored::Colorize;
use dropbox_uploader::DropboxUploader;
use reqwest::Client;
use slack_sink::{Notifier, SlackWebhook};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use crate::config::{Args, Config};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_http_client(config: &Config) -> reqwest::Result<Client> {
    let mut builder = Client::builder();
    if let Some(timeout) = config.timeout {
        builder = builder.timeout(timeout);
    }
    builder.build()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = match Args::parse().into_config() {
        Ok(c) => c,
        Err(missing) => {
            Args::command().print_help()?;
            println!();
            for flag in missing {
                eprintln!("  {}", flag.to_string().red());
            }
            std::process::exit(1);
        }
    };

    let http = match build_http_client(&config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", format!("Failed to build HTTP client: {e}").red());
            std::process::exit(1);
        }
    };

    let uploader = DropboxUploader::new(config.dropbox_access_token.clone(), http.clone());
    let notifier = config
        .slack_webhook
        .as_deref()
        .map(|url| SlackWebhook::new(url, http.clone()));

    // Set up SIGTERM and Ctrl-C handlers for graceful shutdown
    let cancel = CancellationToken::new();
    tokio::spawn(shutdown::cancel_on_signal(cancel.clone()));

    tokio::select! {
        () = cancel.cancelled() => {
            println!("I'll be back.");
        }

        result = pipeline::run(&config, &uploader, notifier.as_ref().map(|n| n as &dyn Notifier)) => {
            match result {
                Ok(delivery) if !delivery.notified => println!("{}", delivery.url),
                Ok(_) => {}
                Err(e) => {
                    eprintln!("{}", format!("{e:#}").red());
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}
