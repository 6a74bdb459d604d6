//! Upload, then notify.
//!
//! The first error ends the run; Slack is only contacted after the link exists.

use dropbox_uploader::Uploader;
use slack_sink::Notifier;
use tracing::{debug, info};

use crate::config::Config;

/// Placeholder in the message template replaced by the shared link.
pub const URL_PLACEHOLDER: &str = "{url}";

/// What happened to the shared link once it was resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub url: String,
    pub notified: bool,
}

/// Renders the Slack message for `url`.
pub fn render_message(template: &str, url: &str) -> String {
    template.replace(URL_PLACEHOLDER, url)
}

/// Uploads the configured image, then posts its link if a notifier is set.
///
/// Stops at the first error; nothing is posted when the upload fails.
pub async fn run(
    config: &Config,
    uploader: &dyn Uploader,
    notifier: Option<&dyn Notifier>,
) -> anyhow::Result<Delivery> {
    debug!(path = %config.dropbox_file_path, "uploading image");

    let url = uploader
        .upload_base64(&config.dropbox_file_path, &config.content)
        .await?
        .into_public_url();

    let Some(notifier) = notifier else {
        return Ok(Delivery {
            url,
            notified: false,
        });
    };

    notifier
        .post(&render_message(&config.message_template, &url))
        .await?;
    info!(url = %url, "posted shared link to slack");

    Ok(Delivery {
        url,
        notified: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use dropbox_uploader::{UploadError, UploadResult};
    use slack_sink::NotifyError;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Accepts every upload, or fails every one when `fail` is set.
    struct FakeUploader {
        fail: bool,
        uploads: Mutex<Vec<(String, Vec<u8>)>>,
    }

    impl FakeUploader {
        fn new(fail: bool) -> Self {
            Self {
                fail,
                uploads: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Uploader for FakeUploader {
        async fn upload(
            &self,
            remote_file_path: &str,
            content: Vec<u8>,
        ) -> Result<UploadResult, UploadError> {
            self.uploads
                .lock()
                .unwrap()
                .push((remote_file_path.to_string(), content));
            if self.fail {
                return Err(UploadError::SharedLinkNotFound);
            }
            UploadResult::new(format!("https://dropbox.biz{remote_file_path}"))
        }
    }

    #[derive(Default)]
    struct FakeNotifier {
        posts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Notifier for FakeNotifier {
        async fn post(&self, text: &str) -> Result<(), NotifyError> {
            self.posts.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    fn config(template: &str) -> Config {
        Config {
            content: "aGVsbG8=".to_string(),
            dropbox_access_token: "token".to_string(),
            dropbox_file_path: "/failures/a.png".to_string(),
            slack_webhook: Some("https://hooks.slack.com/services/T/B/X".to_string()),
            message_template: template.to_string(),
            timeout: Some(Duration::from_secs(5)),
        }
    }

    #[test]
    fn render_message_substitutes_every_placeholder() {
        assert_eq!(
            render_message("Build failed: {url} ({url})", "https://x"),
            "Build failed: https://x (https://x)"
        );
        assert_eq!(render_message("no link", "https://x"), "no link");
    }

    #[tokio::test]
    async fn posts_rendered_link_after_upload() {
        let uploader = FakeUploader::new(false);
        let notifier = FakeNotifier::default();

        let delivery = run(&config("Screenshot: {url}"), &uploader, Some(&notifier))
            .await
            .unwrap();

        assert_eq!(delivery.url, "https://dropbox.biz/failures/a.png");
        assert!(delivery.notified);
        assert_eq!(
            uploader.uploads.lock().unwrap().as_slice(),
            &[("/failures/a.png".to_string(), b"hello".to_vec())]
        );
        assert_eq!(
            notifier.posts.lock().unwrap().as_slice(),
            &["Screenshot: https://dropbox.biz/failures/a.png".to_string()]
        );
    }

    #[tokio::test]
    async fn upload_failure_skips_notification() {
        let uploader = FakeUploader::new(true);
        let notifier = FakeNotifier::default();

        let err = run(&config("{url}"), &uploader, Some(&notifier))
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "shared link already existed, but could not retrieve it"
        );
        assert!(notifier.posts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn without_notifier_the_link_is_returned_unposted() {
        let uploader = FakeUploader::new(false);

        let delivery = run(&config("{url}"), &uploader, None).await.unwrap();

        assert_eq!(delivery.url, "https://dropbox.biz/failures/a.png");
        assert!(!delivery.notified);
    }

    #[tokio::test]
    async fn invalid_content_is_reported_before_upload() {
        let uploader = FakeUploader::new(false);
        let mut config = config("{url}");
        config.content = "***".to_string();

        let err = run(&config, &uploader, None).await.unwrap_err();

        assert!(err.downcast_ref::<UploadError>().is_some());
        assert!(uploader.uploads.lock().unwrap().is_empty());
    }
}
