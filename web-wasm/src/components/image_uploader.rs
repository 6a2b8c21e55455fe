//! 画像アップロードコンポーネント
//!
//! ファイル選択とカメラ撮影の2つの入力から、選んだ1枚をそのまま送信する。

use leptos::prelude::*;
use ocr_upload_common::{Error, SelectedFile, UploadController, UploadState};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{console, Event, File, HtmlInputElement, MouseEvent};

use crate::api::fetch::FetchTransport;
use crate::components::result_panel::ResultPanel;
use crate::export::BlobSaver;
use crate::observer::BrowserObserver;

type Controller = UploadController<FetchTransport, BlobSaver, BrowserObserver>;

#[component]
pub fn ImageUploader() -> impl IntoView {
    let (state, set_state) = signal(UploadState::Idle);

    // コントローラはSendでないのでローカルストレージに置く
    let controller = StoredValue::new_local(Rc::new(Controller::new(
        FetchTransport::same_origin(),
        BlobSaver,
        BrowserObserver::new(set_state),
    )));

    let on_file_change = move |ev: Event| {
        let Some(file) = first_file(&ev) else {
            return;
        };
        let controller = controller.get_value();

        spawn_local(async move {
            match read_file(&file).await {
                Ok(selected) => {
                    controller.select_file(selected).await;
                }
                Err(e) => {
                    console::error_2(&JsValue::from_str("Error reading file:"), &e);
                    controller.reject_selection(Error::InvalidSelection(format!(
                        "{} could not be read",
                        file.name()
                    )));
                }
            }
        });
    };

    let on_download = move |_: MouseEvent| {
        if let Err(e) = controller.get_value().download() {
            console::error_1(&JsValue::from_str(&e.to_string()));
        }
    };

    view! {
        <div class="image-uploader">
            <input
                type="file"
                accept="image/*"
                id="fileInput"
                style="display: none"
                on:change=on_file_change
            />
            <label for="fileInput" class="btn btn-primary mr-2">
                "Choose File"
            </label>

            <input
                type="file"
                accept="image/*"
                capture="environment"
                id="cameraInput"
                style="display: none"
                on:change=on_file_change
            />
            <label for="cameraInput" class="btn btn-secondary">
                "Take Photo"
            </label>

            <Show when=move || state.get().is_loading()>
                <p class="processing">"Processing..."</p>
            </Show>

            <ResultPanel state=state on_download=on_download />
        </div>
    }
}

/// changeイベントから最初のファイルを取り出す
fn first_file(ev: &Event) -> Option<File> {
    let input: HtmlInputElement = ev.target()?.dyn_into().ok()?;
    input.files()?.get(0)
}

async fn read_file(file: &File) -> Result<SelectedFile, JsValue> {
    let buffer = JsFuture::from(file.array_buffer()).await?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
    Ok(SelectedFile::new(file.name(), file.type_(), bytes))
}
