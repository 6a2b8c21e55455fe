//! reqwestによるOCRエンドポイント呼び出し

use ocr_upload_common::{
    check_status, endpoint_url, text_from_value, Error, OcrTransport, Result, SelectedFile,
    IMAGE_FIELD_NAME,
};
use reqwest::multipart::{Form, Part};

/// `POST {base_url}/api/ocr` に画像をmultipartで送る
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            endpoint: endpoint_url(base_url),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn build_form(file: &SelectedFile) -> Result<Form> {
        let part = Part::bytes(file.bytes.clone())
            .file_name(file.file_name.clone())
            .mime_str(&file.mime_type)
            .map_err(|e| Error::InvalidSelection(e.to_string()))?;
        Ok(Form::new().part(IMAGE_FIELD_NAME, part))
    }
}

impl OcrTransport for HttpTransport {
    async fn recognize(&self, file: &SelectedFile) -> Result<String> {
        let form = Self::build_form(file)?;

        // Content-Type (multipart/form-data; boundary=...) はreqwestが付与する
        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;

        check_status(response.status().as_u16())?;

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| Error::MalformedResponse(e.to_string()))?;
        text_from_value(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_from_base_url() {
        let transport = HttpTransport::new("http://localhost:3000/");
        assert_eq!(transport.endpoint(), "http://localhost:3000/api/ocr");
    }

    #[test]
    fn test_build_form_rejects_bad_mime() {
        let file = SelectedFile::new("a.png", "not a mime", vec![1]);
        assert!(matches!(
            HttpTransport::build_form(&file),
            Err(Error::InvalidSelection(_))
        ));
    }

    #[test]
    fn test_build_form_sets_boundary() {
        let file = SelectedFile::new("a.png", "image/png", vec![1, 2, 3]);
        let form = HttpTransport::build_form(&file).unwrap();
        assert!(!form.boundary().is_empty());
    }
}
