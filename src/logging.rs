//! ログ出力
//!
//! `tracing` の購読者初期化と、コントローラのイベントをログへ流すオブザーバ。

use ocr_upload_common::{UploadEvent, UploadObserver};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// グローバルロガーを初期化する
///
/// `RUST_LOG` が設定されていればそちらを優先する。
pub fn init_logger(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .try_init();
}

/// イベントを `tracing` に、アラートを標準エラー出力に流す
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl UploadObserver for TracingObserver {
    fn on_event(&self, event: &UploadEvent) {
        match event {
            UploadEvent::FileSelected { file_name, size } => {
                tracing::debug!(file = %file_name, size, "file selected");
            }
            UploadEvent::SubmissionStarted { seq, file_name } => {
                tracing::info!(seq, file = %file_name, "uploading image");
            }
            UploadEvent::Recognized { seq, chars } => {
                tracing::info!(seq, chars, "text recognized");
            }
            UploadEvent::Failed { seq, error } => {
                tracing::error!(seq, %error, "error uploading image");
            }
            UploadEvent::Superseded { seq, latest } => {
                tracing::warn!(seq, latest, "discarded response from superseded upload");
            }
            UploadEvent::StateChanged(state) => {
                tracing::debug!(state = state.as_str(), "state changed");
            }
            UploadEvent::Downloaded { file_name, size } => {
                tracing::info!(file = %file_name, size, "result saved");
            }
        }
    }

    fn alert(&self, message: &str) {
        eprintln!("⚠ {}", message);
    }
}
