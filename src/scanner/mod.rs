use crate::error::{OcrUploadError, Result};
use ocr_upload_common::{mime_type_from_file_name, SelectedFile};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct ImageInfo {
    pub path: PathBuf,
    pub file_name: String,
    pub mime_type: &'static str,
}

impl ImageInfo {
    /// 拡張子を除いたファイル名
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| self.file_name.clone())
    }

    /// 画像を読み込んで送信用データにする
    pub fn load(&self) -> Result<SelectedFile> {
        let bytes = std::fs::read(&self.path)?;
        Ok(SelectedFile::new(self.file_name.clone(), self.mime_type, bytes))
    }
}

/// 1ファイルを画像として解決する
pub fn image_info(path: &Path) -> Result<ImageInfo> {
    if !path.is_file() {
        return Err(OcrUploadError::FileNotFound(path.display().to_string()));
    }

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let mime_type = mime_type_from_file_name(&file_name)
        .ok_or_else(|| OcrUploadError::NotAnImage(path.display().to_string()))?;

    Ok(ImageInfo {
        path: path.to_path_buf(),
        file_name,
        mime_type,
    })
}

pub fn scan_folder(folder: &Path) -> Result<Vec<ImageInfo>> {
    if !folder.is_dir() {
        return Err(OcrUploadError::FolderNotFound(folder.display().to_string()));
    }

    let mut images: Vec<ImageInfo> = WalkDir::new(folder)
        .max_depth(1)  // 直下のみ（再帰しない）
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| image_info(e.path()).ok())
        .collect();

    // ファイル名でソート
    images.sort_by(|a, b| a.file_name.cmp(&b.file_name));

    Ok(images)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_scan_folder_not_found() {
        let result = scan_folder(Path::new("/nonexistent/folder"));
        assert!(matches!(result, Err(OcrUploadError::FolderNotFound(_))));
    }

    #[test]
    fn test_scan_folder_with_images() {
        let dir = tempdir().unwrap();

        File::create(dir.path().join("test1.jpg")).unwrap().write_all(b"dummy").unwrap();
        File::create(dir.path().join("test2.JPG")).unwrap().write_all(b"dummy").unwrap();
        File::create(dir.path().join("test3.png")).unwrap().write_all(b"dummy").unwrap();
        File::create(dir.path().join("readme.txt")).unwrap().write_all(b"text").unwrap();
        fs::create_dir(dir.path().join("nested.png")).unwrap();

        let result = scan_folder(dir.path()).unwrap();
        assert_eq!(result.len(), 3);
        assert_eq!(result[0].file_name, "test1.jpg");
        assert_eq!(result[1].file_name, "test2.JPG");
        assert_eq!(result[1].mime_type, "image/jpeg");
        assert_eq!(result[2].mime_type, "image/png");
    }

    #[test]
    fn test_images_sorted_by_filename() {
        let dir = tempdir().unwrap();

        File::create(dir.path().join("c.jpg")).unwrap();
        File::create(dir.path().join("a.jpg")).unwrap();
        File::create(dir.path().join("b.jpg")).unwrap();

        let result = scan_folder(dir.path()).unwrap();
        let names: Vec<_> = result.iter().map(|i| i.file_name.as_str()).collect();
        assert_eq!(names, vec!["a.jpg", "b.jpg", "c.jpg"]);
    }

    #[test]
    fn test_image_info_rejects_non_image() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, "hello").unwrap();

        assert!(matches!(image_info(&path), Err(OcrUploadError::NotAnImage(_))));
    }

    #[test]
    fn test_load_reads_bytes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("receipt.webp");
        fs::write(&path, b"RIFF").unwrap();

        let info = image_info(&path).unwrap();
        let file = info.load().unwrap();

        assert_eq!(info.stem(), "receipt");
        assert_eq!(file.file_name, "receipt.webp");
        assert_eq!(file.mime_type, "image/webp");
        assert_eq!(file.bytes, b"RIFF");
    }
}
