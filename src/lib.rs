//! 画像OCRアップロードツール
//!
//! 共通のコントローラ（`ocr_upload_common`）をreqwest・ファイル保存・tracingで動かす。

pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod logging;
pub mod recognizer;
pub mod scanner;
pub mod transport;
