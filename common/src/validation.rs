//! 画像選択のバリデーション
//!
//! ファイルピッカーの `accept="image/*"` だけに頼らず、送信前に検査する。

use crate::error::{Error, Result};
use crate::types::SelectedFile;

/// 拡張子とMIMEタイプの対応表
const IMAGE_MIME_TYPES: &[(&str, &str)] = &[
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("gif", "image/gif"),
    ("bmp", "image/bmp"),
    ("webp", "image/webp"),
    ("tif", "image/tiff"),
    ("tiff", "image/tiff"),
    ("heic", "image/heic"),
];

/// ファイル名の拡張子から画像MIMEタイプを推定する
///
/// 画像として扱わない拡張子は `None`。
pub fn mime_type_from_file_name(file_name: &str) -> Option<&'static str> {
    let ext = file_name.rsplit_once('.')?.1.to_ascii_lowercase();
    IMAGE_MIME_TYPES
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, mime)| *mime)
}

/// 画像MIMEタイプか（`image/*`）
pub fn is_image_mime_type(mime_type: &str) -> bool {
    mime_type
        .trim()
        .to_ascii_lowercase()
        .strip_prefix("image/")
        .is_some_and(|subtype| !subtype.is_empty())
}

/// 送信前の検査
pub fn validate_image(file: &SelectedFile) -> Result<()> {
    if !is_image_mime_type(&file.mime_type) {
        return Err(Error::InvalidSelection(format!(
            "{} is not an image ({})",
            file.file_name,
            if file.mime_type.is_empty() { "unknown type" } else { &file.mime_type }
        )));
    }

    if file.bytes.is_empty() {
        return Err(Error::InvalidSelection(format!("{} is empty", file.file_name)));
    }

    Ok(())
}
