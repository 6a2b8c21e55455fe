//! エクスポートファイルのディスク保存

use ocr_upload_common::{ExportArtifact, FileSaver};
use std::path::{Path, PathBuf};

/// 出力ディレクトリにファイルを書き出す
#[derive(Debug, Clone)]
pub struct DiskSaver {
    output_dir: PathBuf,
}

impl DiskSaver {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn path_for(&self, artifact: &ExportArtifact) -> PathBuf {
        self.output_dir.join(&artifact.file_name)
    }
}

impl FileSaver for DiskSaver {
    fn save(&self, artifact: &ExportArtifact) -> ocr_upload_common::Result<()> {
        std::fs::create_dir_all(&self.output_dir)?;
        std::fs::write(self.path_for(artifact), &artifact.bytes)?;
        Ok(())
    }
}
