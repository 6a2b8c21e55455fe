pub mod header;
pub mod image_uploader;
pub mod result_panel;
