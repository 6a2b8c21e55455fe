pub mod cache;
mod types;

pub use cache::{CacheFile, CachedTransport};
pub use types::BatchRecord;

use crate::error::Result;
use crate::export::DiskSaver;
use crate::scanner::ImageInfo;
use indicatif::{ProgressBar, ProgressStyle};
use ocr_upload_common::{FileSaver, OcrTransport, SubmitOutcome, UploadController, UploadObserver};
use std::path::Path;

/// 画像を1枚ずつ送信して結果を集める
///
/// 個々の失敗は記録して続行する。`save_artifacts` が真なら成功した画像ごとに
/// `<画像名>.<拡張子>` のエクスポートファイルをコントローラの保存先へ書き出す。
pub async fn recognize_images<T, O>(
    controller: &UploadController<T, DiskSaver, O>,
    images: &[ImageInfo],
    save_artifacts: bool,
    show_progress: bool,
) -> Vec<BatchRecord>
where
    T: OcrTransport,
    O: UploadObserver,
{
    let pb = if show_progress {
        let pb = ProgressBar::new(images.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner} [{bar:30}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        pb
    } else {
        ProgressBar::hidden()
    };

    let mut records = Vec::with_capacity(images.len());

    for image in images {
        pb.set_message(image.file_name.clone());

        let mut record = BatchRecord {
            file_name: image.file_name.clone(),
            ..Default::default()
        };

        match image.load() {
            Err(e) => record.error = Some(e.to_string()),
            Ok(file) => match controller.select_file(file).await {
                SubmitOutcome::Recognized(text) => {
                    if save_artifacts {
                        let saver = controller.saver();
                        let artifact = controller
                            .export_format()
                            .artifact_named(&image.stem(), &text);
                        match saver.save(&artifact) {
                            Ok(()) => {
                                record.artifact =
                                    Some(saver.path_for(&artifact).display().to_string());
                            }
                            Err(e) => {
                                tracing::warn!(file = %image.file_name, error = %e, "artifact not saved");
                                record.artifact_error = Some(e.to_string());
                            }
                        }
                    }
                    record.text = Some(text);
                }
                SubmitOutcome::Failed(e) => record.error = Some(e.to_string()),
                SubmitOutcome::Superseded => record.error = Some("superseded".into()),
            },
        }

        records.push(record);
        pb.inc(1);
    }

    pb.finish_and_clear();
    records
}

/// バッチ結果をJSONで保存
pub fn write_records(path: &Path, records: &[BatchRecord]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(records)?;
    std::fs::write(path, json)?;
    Ok(())
}
