//! OCRエンドポイントのリクエスト定数とレスポンスパーサー
//!
//! トランスポート（reqwest / fetch）が共通で使う。

use crate::error::{Error, Result};
use crate::types::OcrResponse;

/// OCRエンドポイントのパス
pub const OCR_ENDPOINT_PATH: &str = "/api/ocr";

/// multipartボディ内の画像フィールド名
pub const IMAGE_FIELD_NAME: &str = "image";

/// ベースURLからエンドポイントURLを組み立てる
///
/// 空文字列のベースURLは同一オリジン（ブラウザ）の相対パスになる。
///
/// # Examples
/// ```
/// use ocr_upload_common::endpoint_url;
///
/// assert_eq!(endpoint_url("http://localhost:3000/"), "http://localhost:3000/api/ocr");
/// assert_eq!(endpoint_url(""), "/api/ocr");
/// ```
pub fn endpoint_url(base_url: &str) -> String {
    format!("{}{}", base_url.trim().trim_end_matches('/'), OCR_ENDPOINT_PATH)
}

/// HTTPステータスを検査する（2xx以外はサービスエラー）
pub fn check_status(status: u16) -> Result<()> {
    if (200..300).contains(&status) {
        Ok(())
    } else {
        Err(Error::Service { status })
    }
}

/// 成功レスポンスのボディから `text` を取り出す
///
/// # Arguments
/// * `body` - レスポンスボディ（JSON文字列）
///
/// # Returns
/// * `Ok(String)` - 抽出されたテキスト
/// * `Err(Error::MalformedResponse)` - JSONでない、または `text` が文字列でない
pub fn parse_ocr_response(body: &str) -> Result<String> {
    let response: OcrResponse = serde_json::from_str(body)
        .map_err(|e| Error::MalformedResponse(e.to_string()))?;
    Ok(response.text)
}

/// デコード済みJSON値から `text` を取り出す
pub fn text_from_value(value: &serde_json::Value) -> Result<String> {
    value
        .get("text")
        .and_then(|t| t.as_str())
        .map(str::to_string)
        .ok_or_else(|| Error::MalformedResponse("`text` field is missing".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_endpoint_url() {
        assert_eq!(endpoint_url("http://localhost:3000"), "http://localhost:3000/api/ocr");
        assert_eq!(endpoint_url("https://ocr.example.com//"), "https://ocr.example.com/api/ocr");
        assert_eq!(endpoint_url("  "), "/api/ocr");
    }

    #[test]
    fn test_check_status() {
        assert!(check_status(200).is_ok());
        assert!(check_status(204).is_ok());
        assert!(matches!(check_status(404), Err(Error::Service { status: 404 })));
        assert!(matches!(check_status(500), Err(Error::Service { status: 500 })));
        assert!(check_status(302).is_err());
    }

    #[test]
    fn test_parse_ocr_response_ignores_extra_fields() {
        let body = r#"{"text": "HELLO", "confidence": 0.93, "lang": "eng"}"#;
        assert_eq!(parse_ocr_response(body).unwrap(), "HELLO");
    }

    #[test]
    fn test_parse_ocr_response_empty_text() {
        assert_eq!(parse_ocr_response(r#"{"text": ""}"#).unwrap(), "");
    }

    #[test]
    fn test_parse_ocr_response_missing_text() {
        let result = parse_ocr_response(r#"{"message": "ok"}"#);
        assert!(matches!(result, Err(Error::MalformedResponse(_))));
    }

    #[test]
    fn test_parse_ocr_response_not_json() {
        let result = parse_ocr_response("<html>502 Bad Gateway</html>");
        assert!(matches!(result, Err(Error::MalformedResponse(_))));
    }

    #[test]
    fn test_text_from_value() {
        assert_eq!(text_from_value(&json!({"text": "abc"})).unwrap(), "abc");
        assert!(text_from_value(&json!({"text": 42})).is_err());
        assert!(text_from_value(&json!([])).is_err());
    }
}
