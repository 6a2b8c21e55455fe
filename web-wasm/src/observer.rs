//! ブラウザ向けオブザーバ
//!
//! 状態変化をシグナルへ反映し、診断はコンソール、アラートは `window.alert` に出す。

use leptos::prelude::*;
use ocr_upload_common::{UploadEvent, UploadObserver, UploadState};
use wasm_bindgen::JsValue;
use web_sys::console;

pub struct BrowserObserver {
    set_state: WriteSignal<UploadState>,
}

impl BrowserObserver {
    pub fn new(set_state: WriteSignal<UploadState>) -> Self {
        Self { set_state }
    }
}

impl UploadObserver for BrowserObserver {
    fn on_event(&self, event: &UploadEvent) {
        match event {
            UploadEvent::StateChanged(state) => self.set_state.set(state.clone()),
            UploadEvent::Failed { error, .. } => {
                console::error_1(&JsValue::from_str(&format!("Error uploading image: {}", error)));
            }
            other => console::debug_1(&JsValue::from_str(&format!("{:?}", other))),
        }
    }

    fn alert(&self, message: &str) {
        if let Some(window) = web_sys::window() {
            let _ = window.alert_with_message(message);
        }
    }
}
