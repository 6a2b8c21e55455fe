//! アップロードコントローラ
//!
//! 画像選択 → OCRエンドポイントへの送信 → 結果表示 → ダウンロード、
//! の一連の流れを状態機械として管理する。
//!
//! ネットワーク・ファイル保存・ログ出力はホスト側（CLI / ブラウザ）が
//! トレイトで差し込む:
//! - [`OcrTransport`]: multipartで画像を送り `text` を受け取る
//! - [`FileSaver`]: エクスポートファイルを保存する
//! - [`UploadObserver`]: 診断イベントとユーザー向けアラート
//!
//! 状態はロックの内側にあるが、`.await` をまたいで保持しない。

use crate::error::{Error, Result};
use crate::export::{ExportArtifact, ExportFormat};
use crate::types::{SelectedFile, UploadState};
use crate::validation::validate_image;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// 失敗時にユーザーへ表示する固定メッセージ
pub const ALERT_MESSAGE: &str = "An error occurred while processing the image";

/// OCRエンドポイントへの送信
#[allow(async_fn_in_trait)]
pub trait OcrTransport {
    /// 画像を `image` フィールドに載せて送信し、レスポンスの `text` を返す
    async fn recognize(&self, file: &SelectedFile) -> Result<String>;
}

/// エクスポートファイルの保存先
pub trait FileSaver {
    fn save(&self, artifact: &ExportArtifact) -> Result<()>;
}

/// 診断ログとアラートの受け口
pub trait UploadObserver {
    fn on_event(&self, event: &UploadEvent);

    /// ユーザーへのブロッキングなエラー通知
    fn alert(&self, message: &str);
}

/// 何もしないオブザーバ
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl UploadObserver for NoopObserver {
    fn on_event(&self, _event: &UploadEvent) {}
    fn alert(&self, _message: &str) {}
}

/// 診断イベント
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadEvent {
    FileSelected { file_name: String, size: usize },
    SubmissionStarted { seq: u64, file_name: String },
    Recognized { seq: u64, chars: usize },
    Failed { seq: u64, error: String },
    /// 後発の送信があるため破棄されたレスポンス
    Superseded { seq: u64, latest: u64 },
    StateChanged(UploadState),
    Downloaded { file_name: String, size: usize },
}

/// 重複送信時のレスポンス適用方針
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResponseOrdering {
    /// 最新の送信のレスポンスだけを適用する
    #[default]
    LatestSubmission,
    /// 到着順にすべて適用する（最後に届いたものが残る）
    LastResponse,
}

impl std::str::FromStr for ResponseOrdering {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "latest-submission" | "latest" => Ok(ResponseOrdering::LatestSubmission),
            "last-response" | "last" => Ok(ResponseOrdering::LastResponse),
            _ => Err(format!(
                "Unknown ordering: {}. Use latest-submission or last-response",
                s
            )),
        }
    }
}

impl std::fmt::Display for ResponseOrdering {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResponseOrdering::LatestSubmission => write!(f, "latest-submission"),
            ResponseOrdering::LastResponse => write!(f, "last-response"),
        }
    }
}

/// 1回の送信の結果
#[derive(Debug)]
pub enum SubmitOutcome {
    Recognized(String),
    Failed(Error),
    Superseded,
}

impl SubmitOutcome {
    pub fn text(&self) -> Option<&str> {
        match self {
            SubmitOutcome::Recognized(text) => Some(text),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    state: UploadState,
    selected: Option<SelectedFile>,
    latest_seq: u64,
}

pub struct UploadController<T, S, O> {
    transport: T,
    saver: S,
    observer: O,
    ordering: ResponseOrdering,
    export_format: ExportFormat,
    inner: Mutex<Inner>,
}

impl<T, S, O> UploadController<T, S, O>
where
    T: OcrTransport,
    S: FileSaver,
    O: UploadObserver,
{
    pub fn new(transport: T, saver: S, observer: O) -> Self {
        Self {
            transport,
            saver,
            observer,
            ordering: ResponseOrdering::default(),
            export_format: ExportFormat::default(),
            inner: Mutex::new(Inner::default()),
        }
    }

    pub fn with_ordering(mut self, ordering: ResponseOrdering) -> Self {
        self.ordering = ordering;
        self
    }

    pub fn with_export_format(mut self, export_format: ExportFormat) -> Self {
        self.export_format = export_format;
        self
    }

    pub fn state(&self) -> UploadState {
        self.inner.lock().state.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.inner.lock().state.is_loading()
    }

    pub fn result_text(&self) -> Option<String> {
        self.inner.lock().state.result_text().map(str::to_string)
    }

    pub fn selected_file(&self) -> Option<SelectedFile> {
        self.inner.lock().selected.clone()
    }

    pub fn ordering(&self) -> ResponseOrdering {
        self.ordering
    }

    pub fn export_format(&self) -> ExportFormat {
        self.export_format
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn saver(&self) -> &S {
        &self.saver
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// ファイルを選択し、そのまま送信する
    pub async fn select_file(&self, file: SelectedFile) -> SubmitOutcome {
        self.observer.on_event(&UploadEvent::FileSelected {
            file_name: file.file_name.clone(),
            size: file.size(),
        });
        self.inner.lock().selected = Some(file.clone());

        self.submit(&file).await
    }

    /// 読み込めなかった選択を失敗として扱う
    ///
    /// 送信はせず、通常の失敗と同じくアラートは1回だけ。
    pub fn reject_selection(&self, error: Error) -> SubmitOutcome {
        let seq = {
            let mut inner = self.inner.lock();
            inner.latest_seq += 1;
            inner.latest_seq
        };
        self.finish(seq, Err(error))
    }

    /// 画像を送信して結果を状態に反映する
    ///
    /// 失敗はすべて1回のアラートにまとめ、詳細はオブザーバへのイベントにだけ残す。
    pub async fn submit(&self, file: &SelectedFile) -> SubmitOutcome {
        let seq = {
            let mut inner = self.inner.lock();
            inner.latest_seq += 1;
            inner.latest_seq
        };

        if let Err(e) = validate_image(file) {
            return self.finish(seq, Err(e));
        }

        self.set_state(UploadState::Loading);
        self.observer.on_event(&UploadEvent::SubmissionStarted {
            seq,
            file_name: file.file_name.clone(),
        });

        let result = self.transport.recognize(file).await;
        self.finish(seq, result)
    }

    /// 結果テキストをエクスポートして保存する
    ///
    /// 結果がなければ何もせず `Ok(None)`。
    pub fn download(&self) -> Result<Option<ExportArtifact>> {
        let Some(text) = self.result_text() else {
            return Ok(None);
        };

        let artifact = self.export_format.artifact(&text);
        self.saver.save(&artifact)?;

        self.observer.on_event(&UploadEvent::Downloaded {
            file_name: artifact.file_name.clone(),
            size: artifact.bytes.len(),
        });
        Ok(Some(artifact))
    }

    fn set_state(&self, state: UploadState) {
        self.inner.lock().state = state.clone();
        self.observer.on_event(&UploadEvent::StateChanged(state));
    }

    fn finish(&self, seq: u64, result: Result<String>) -> SubmitOutcome {
        // 判定と状態更新は同じロック内で行う
        let applied = {
            let mut inner = self.inner.lock();
            let stale = self.ordering == ResponseOrdering::LatestSubmission
                && seq != inner.latest_seq;

            if stale {
                Err(inner.latest_seq)
            } else {
                let next = match &result {
                    Ok(text) => UploadState::Done(text.clone()),
                    Err(_) => UploadState::Failed,
                };
                inner.state = next.clone();
                Ok(next)
            }
        };

        let state = match applied {
            Ok(state) => state,
            Err(latest) => {
                if let Err(e) = &result {
                    self.observer.on_event(&UploadEvent::Failed {
                        seq,
                        error: e.to_string(),
                    });
                }
                self.observer.on_event(&UploadEvent::Superseded { seq, latest });
                return SubmitOutcome::Superseded;
            }
        };

        match result {
            Ok(text) => {
                self.observer.on_event(&UploadEvent::Recognized {
                    seq,
                    chars: text.chars().count(),
                });
                self.observer.on_event(&UploadEvent::StateChanged(state));
                SubmitOutcome::Recognized(text)
            }
            Err(e) => {
                self.observer.on_event(&UploadEvent::Failed {
                    seq,
                    error: e.to_string(),
                });
                self.observer.on_event(&UploadEvent::StateChanged(state));
                self.observer.alert(ALERT_MESSAGE);
                SubmitOutcome::Failed(e)
            }
        }
    }
}
