//! fetch APIによるOCRエンドポイント呼び出し

use ocr_upload_common::{
    check_status, endpoint_url, text_from_value, Error, OcrTransport, Result, SelectedFile,
    IMAGE_FIELD_NAME,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, BlobPropertyBag, FormData, Request, RequestInit, Response};

/// 同一オリジンの `/api/ocr` へFormDataで送信する
pub struct FetchTransport {
    endpoint: String,
}

impl FetchTransport {
    pub fn same_origin() -> Self {
        Self {
            endpoint: endpoint_url(""),
        }
    }
}

/// バイト列をMIMEタイプ付きのBlobにする
pub fn bytes_to_blob(bytes: &[u8], mime_type: &str) -> std::result::Result<Blob, JsValue> {
    let array = js_sys::Uint8Array::from(bytes);
    let parts = js_sys::Array::of1(&array);
    let options = BlobPropertyBag::new();
    options.set_type(mime_type);
    Blob::new_with_u8_array_sequence_and_options(&parts, &options)
}

fn transport_error(e: JsValue) -> Error {
    Error::Transport(e.as_string().unwrap_or_else(|| format!("{:?}", e)))
}

fn malformed(e: JsValue) -> Error {
    Error::MalformedResponse(e.as_string().unwrap_or_else(|| format!("{:?}", e)))
}

impl OcrTransport for FetchTransport {
    async fn recognize(&self, file: &SelectedFile) -> Result<String> {
        let blob = bytes_to_blob(&file.bytes, &file.mime_type).map_err(transport_error)?;
        let form = FormData::new().map_err(transport_error)?;
        form.append_with_blob_and_filename(IMAGE_FIELD_NAME, &blob, &file.file_name)
            .map_err(transport_error)?;

        // Content-Type はブラウザがboundary付きで設定する
        let opts = RequestInit::new();
        opts.set_method("POST");
        opts.set_body(&form);

        let request = Request::new_with_str_and_init(&self.endpoint, &opts)
            .map_err(transport_error)?;

        let window = web_sys::window().ok_or_else(|| Error::Transport("window unavailable".into()))?;
        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(transport_error)?;
        let resp: Response = resp_value.dyn_into().map_err(transport_error)?;

        check_status(resp.status())?;

        let json = JsFuture::from(resp.json().map_err(malformed)?)
            .await
            .map_err(malformed)?;
        let value: serde_json::Value = serde_wasm_bindgen::from_value(json)
            .map_err(|e| Error::MalformedResponse(e.to_string()))?;

        text_from_value(&value)
    }
}
