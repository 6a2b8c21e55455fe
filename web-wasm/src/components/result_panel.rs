//! 認識結果パネル

use leptos::prelude::*;
use ocr_upload_common::UploadState;
use web_sys::MouseEvent;

#[component]
pub fn ResultPanel<F>(
    state: ReadSignal<UploadState>,
    on_download: F,
) -> impl IntoView
where
    F: Fn(MouseEvent) + 'static + Clone + Send + Sync,
{
    let result_text = move || state.get().result_text().map(str::to_string);

    view! {
        <Show when=move || result_text().is_some()>
            <div class="ocr-result">
                <h3>"OCR Result:"</h3>
                <pre>{move || result_text().unwrap_or_default()}</pre>
                <button
                    class="btn btn-primary"
                    on:click={
                        let on_download = on_download.clone();
                        move |ev| on_download(ev)
                    }
                >
                    "Download"
                </button>
            </div>
        </Show>
    }
}
