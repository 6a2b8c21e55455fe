//! メインアプリケーションコンポーネント

use leptos::prelude::*;
use crate::components::{
    header::Header,
    image_uploader::ImageUploader,
};

#[component]
pub fn App() -> impl IntoView {
    view! {
        <div class="container">
            <Header />
            <ImageUploader />
        </div>
    }
}
