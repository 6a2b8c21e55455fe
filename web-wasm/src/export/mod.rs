//! Blobダウンロードによる保存

use crate::api::fetch::bytes_to_blob;
use ocr_upload_common::{Error, ExportArtifact, FileSaver, Result};
use wasm_bindgen::prelude::*;
use web_sys::{HtmlAnchorElement, Url};

/// オブジェクトURLを一時的に作り、`<a download>` をクリックして保存させる
#[derive(Debug, Default, Clone, Copy)]
pub struct BlobSaver;

impl FileSaver for BlobSaver {
    fn save(&self, artifact: &ExportArtifact) -> Result<()> {
        download_bytes(&artifact.bytes, &artifact.mime_type, &artifact.file_name)
            .map_err(|e| Error::Io(std::io::Error::other(format!("download failed: {:?}", e))))
    }
}

fn download_bytes(bytes: &[u8], mime_type: &str, file_name: &str) -> std::result::Result<(), JsValue> {
    let blob = bytes_to_blob(bytes, mime_type)?;
    let url = Url::create_object_url_with_blob(&blob)?;

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("document unavailable"))?;
    let anchor: HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
    anchor.set_href(&url);
    anchor.set_download(file_name);
    anchor.click();

    Url::revoke_object_url(&url)
}
