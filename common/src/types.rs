//! 共通型定義

use serde::{Deserialize, Serialize};

/// ユーザーが選択した画像ファイル
///
/// ファイルピッカーまたはカメラ撮影で選ばれた生データ。永続化はしない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn new(
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// ファイルサイズ（バイト）
    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// アップロード状態
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "text", rename_all = "camelCase")]
pub enum UploadState {
    #[default]
    Idle,
    Loading,
    Done(String),
    Failed,
}

impl UploadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, UploadState::Loading)
    }

    /// 表示中の結果テキスト（空文字列は結果なし扱い）
    pub fn result_text(&self) -> Option<&str> {
        match self {
            UploadState::Done(text) if !text.is_empty() => Some(text),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UploadState::Idle => "idle",
            UploadState::Loading => "loading",
            UploadState::Done(_) => "done",
            UploadState::Failed => "failed",
        }
    }
}

/// OCRエンドポイントの成功レスポンス
///
/// `text` 以外のフィールドは無視する。
#[derive(Debug, Clone, Deserialize)]
pub struct OcrResponse {
    pub text: String,
}
