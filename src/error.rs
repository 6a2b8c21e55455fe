use thiserror::Error;

#[derive(Error, Debug)]
pub enum OcrUploadError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("OCRエンドポイントが設定されていません。`ocr-upload config --set-base-url URL` で設定してください")]
    MissingBaseUrl,

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("画像ではありません: {0}")]
    NotAnImage(String),

    #[error("画像が見つかりません: {0}")]
    NoImagesFound(String),

    #[error("OCRに失敗しました: {0}")]
    RecognitionFailed(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] ocr_upload_common::Error),
}

pub type Result<T> = std::result::Result<T, OcrUploadError>;
