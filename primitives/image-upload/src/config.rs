//! Command-line and environment configuration.
//!
//! Required flags are declared optional to clap so that every missing one can
//! be reported at once, the same way for a flag and its env var.

use std::fmt;
use std::time::Duration;

use clap::Parser;

/// Message posted to Slack when no template is given.
pub const DEFAULT_MESSAGE_TEMPLATE: &str = "{url}";

/// Uploads an image to Dropbox and posts the shared link to Slack.
#[derive(Parser, Debug, Clone)]
#[command(name = "image-upload-to-dropbox-and-post-to-slack")]
#[command(about = "Uploads a base64 image to Dropbox and posts its shared link to Slack")]
#[command(version)]
pub struct Args {
    /// Base64 encoded image content.
    #[arg(
        short,
        long,
        env = "IMAGE_UPLOAD_TO_DROPBOX_AND_POST_TO_SLACK_CONTENT",
        hide_env_values = true
    )]
    pub content: Option<String>,

    /// Dropbox access token.
    #[arg(
        short = 'a',
        long,
        env = "IMAGE_UPLOAD_TO_DROPBOX_AND_POST_TO_SLACK_DROPBOX_ACCESS_TOKEN",
        hide_env_values = true
    )]
    pub dropbox_access_token: Option<String>,

    /// Remote path to upload the image to, e.g. /failures/build-42.png.
    #[arg(
        short = 'p',
        long,
        env = "IMAGE_UPLOAD_TO_DROPBOX_AND_POST_TO_SLACK_DROPBOX_FILE_PATH"
    )]
    pub dropbox_file_path: Option<String>,

    /// Slack incoming webhook URL. Without it the link is printed instead.
    #[arg(
        short,
        long,
        env = "IMAGE_UPLOAD_TO_DROPBOX_AND_POST_TO_SLACK_SLACK_WEBHOOK",
        hide_env_values = true
    )]
    pub slack_webhook: Option<String>,

    /// Slack message template; `{url}` is replaced with the shared link.
    #[arg(
        long,
        env = "IMAGE_UPLOAD_TO_DROPBOX_AND_POST_TO_SLACK_MESSAGE_TEMPLATE",
        default_value = DEFAULT_MESSAGE_TEMPLATE
    )]
    pub message_template: String,

    /// Per-request HTTP timeout in seconds (0 = no timeout).
    #[arg(
        long,
        env = "IMAGE_UPLOAD_TO_DROPBOX_AND_POST_TO_SLACK_TIMEOUT",
        default_value = "0"
    )]
    pub timeout: u64,
}

/// A required flag that was neither passed nor set in the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissingFlag {
    pub long: &'static str,
    pub env: &'static str,
}

impl fmt::Display for MissingFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Missing required flag --{} or {}", self.long, self.env)
    }
}

const CONTENT: MissingFlag = MissingFlag {
    long: "content",
    env: "IMAGE_UPLOAD_TO_DROPBOX_AND_POST_TO_SLACK_CONTENT",
};
const DROPBOX_ACCESS_TOKEN: MissingFlag = MissingFlag {
    long: "dropbox-access-token",
    env: "IMAGE_UPLOAD_TO_DROPBOX_AND_POST_TO_SLACK_DROPBOX_ACCESS_TOKEN",
};
const DROPBOX_FILE_PATH: MissingFlag = MissingFlag {
    long: "dropbox-file-path",
    env: "IMAGE_UPLOAD_TO_DROPBOX_AND_POST_TO_SLACK_DROPBOX_FILE_PATH",
};

/// Validated settings for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub content: String,
    pub dropbox_access_token: String,
    pub dropbox_file_path: String,
    pub slack_webhook: Option<String>,
    pub message_template: String,
    pub timeout: Option<Duration>,
}

impl Args {
    /// Checks required flags, reporting every one that is missing or empty.
    pub fn into_config(self) -> Result<Config, Vec<MissingFlag>> {
        let mut missing = Vec::new();

        let content = require(self.content, CONTENT, &mut missing);
        let dropbox_access_token =
            require(self.dropbox_access_token, DROPBOX_ACCESS_TOKEN, &mut missing);
        let dropbox_file_path = require(self.dropbox_file_path, DROPBOX_FILE_PATH, &mut missing);

        match (content, dropbox_access_token, dropbox_file_path) {
            (Some(content), Some(dropbox_access_token), Some(dropbox_file_path)) => Ok(Config {
                content,
                dropbox_access_token,
                dropbox_file_path,
                slack_webhook: self.slack_webhook.filter(|url| !url.is_empty()),
                message_template: self.message_template,
                timeout: (self.timeout > 0).then(|| Duration::from_secs(self.timeout)),
            }),
            _ => Err(missing),
        }
    }
}

fn require(
    value: Option<String>,
    flag: MissingFlag,
    missing: &mut Vec<MissingFlag>,
) -> Option<String> {
    let value = value.filter(|v| !v.is_empty());
    if value.is_none() {
        missing.push(flag);
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        let mut argv = vec!["image-upload-to-dropbox-and-post-to-slack"];
        argv.extend_from_slice(args);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn complete_flags_produce_config() {
        let config = parse(&[
            "--content",
            "aGVsbG8=",
            "--dropbox-access-token",
            "token",
            "--dropbox-file-path",
            "/failures/a.png",
            "--slack-webhook",
            "https://hooks.slack.com/services/T/B/X",
            "--timeout",
            "15",
        ])
        .into_config()
        .unwrap();

        assert_eq!(config.content, "aGVsbG8=");
        assert_eq!(config.dropbox_access_token, "token");
        assert_eq!(config.dropbox_file_path, "/failures/a.png");
        assert_eq!(
            config.slack_webhook.as_deref(),
            Some("https://hooks.slack.com/services/T/B/X")
        );
        assert_eq!(config.message_template, DEFAULT_MESSAGE_TEMPLATE);
        assert_eq!(config.timeout, Some(Duration::from_secs(15)));
    }

    #[test]
    fn slack_webhook_and_timeout_are_optional() {
        let config = parse(&["-c", "aGVsbG8=", "-a", "token", "-p", "/a.png"])
            .into_config()
            .unwrap();

        assert_eq!(config.slack_webhook, None);
        assert_eq!(config.timeout, None);
    }

    #[test]
    fn every_missing_flag_is_reported() {
        let missing = parse(&["--dropbox-access-token", "token"])
            .into_config()
            .unwrap_err();

        assert_eq!(missing, vec![CONTENT, DROPBOX_FILE_PATH]);
    }

    #[test]
    fn empty_values_count_as_missing() {
        let missing = parse(&["-c", "", "-a", "token", "-p", "/a.png", "-s", ""])
            .into_config()
            .unwrap_err();

        assert_eq!(missing, vec![CONTENT]);
    }

    #[test]
    fn missing_flag_message_names_flag_and_env_var() {
        assert_eq!(
            DROPBOX_ACCESS_TOKEN.to_string(),
            "Missing required flag --dropbox-access-token or IMAGE_UPLOAD_TO_DROPBOX_AND_POST_TO_SLACK_DROPBOX_ACCESS_TOKEN"
        );
    }
}
