//! OCR Upload Common Library
//!
//! CLIとWeb(WASM)で共有される型・コントローラ・エクスポート処理

pub mod controller;
pub mod error;
pub mod export;
pub mod parser;
pub mod types;
pub mod validation;

pub use controller::{
    FileSaver, NoopObserver, OcrTransport, ResponseOrdering, SubmitOutcome, UploadController,
    UploadEvent, UploadObserver, ALERT_MESSAGE,
};
pub use error::{Error, Result};
pub use export::{ExportArtifact, ExportFormat, DEFAULT_FILE_STEM};
pub use parser::{
    check_status, endpoint_url, parse_ocr_response, text_from_value, IMAGE_FIELD_NAME,
    OCR_ENDPOINT_PATH,
};
pub use types::{OcrResponse, SelectedFile, UploadState};
pub use validation::{is_image_mime_type, mime_type_from_file_name, validate_image};
