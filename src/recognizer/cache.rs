//! 認識結果キャッシュモジュール
//!
//! 送信先エンドポイントと画像のSHA-256ハッシュをキーにしてOCR結果を
//! キャッシュし、同じ画像の再送信をスキップする。

use crate::error::Result;
use chrono::{DateTime, Utc};
use ocr_upload_common::{OcrTransport, SelectedFile};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

const CACHE_FILE_NAME: &str = ".ocr-cache.json";

/// キャッシュファイルの構造
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheFile {
    /// バージョン（互換性チェック用）
    version: u32,
    /// ファイルハッシュ → 認識結果のマップ
    entries: HashMap<String, CacheEntry>,
}

/// キャッシュエントリ
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub file_name: String,
    pub file_size: u64,
    pub text: String,
    pub recognized_at: DateTime<Utc>,
}

impl CacheFile {
    const CURRENT_VERSION: u32 = 2;

    pub fn cache_path(folder: &Path) -> PathBuf {
        folder.join(CACHE_FILE_NAME)
    }

    /// キャッシュファイルを読み込み
    ///
    /// 存在しない・壊れている・バージョン違いの場合は空のキャッシュ。
    pub fn load(folder: &Path) -> Self {
        let cache_path = Self::cache_path(folder);

        let file = match File::open(&cache_path) {
            Ok(f) => f,
            Err(_) => return Self::default(),
        };

        match serde_json::from_reader::<_, CacheFile>(BufReader::new(file)) {
            Ok(cache) if cache.version == Self::CURRENT_VERSION => cache,
            Ok(cache) => {
                tracing::warn!(
                    found = cache.version,
                    expected = Self::CURRENT_VERSION,
                    "cache version mismatch, starting fresh"
                );
                Self::default()
            }
            Err(e) => {
                tracing::warn!(error = %e, path = %cache_path.display(), "unreadable cache ignored");
                Self::default()
            }
        }
    }

    /// キャッシュファイルを保存
    pub fn save(&self, folder: &Path) -> Result<()> {
        let file = File::create(Self::cache_path(folder))?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }

    /// キャッシュファイルを削除（存在しなければ `false`）
    pub fn clear(folder: &Path) -> Result<bool> {
        let cache_path = Self::cache_path(folder);
        if !cache_path.exists() {
            return Ok(false);
        }
        std::fs::remove_file(cache_path)?;
        Ok(true)
    }

    pub fn get(&self, hash: &str) -> Option<&CacheEntry> {
        self.entries.get(hash)
    }

    pub fn insert(&mut self, hash: String, file_name: String, file_size: u64, text: String) {
        self.entries.insert(hash, CacheEntry {
            file_name,
            file_size,
            text,
            recognized_at: Utc::now(),
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for CacheFile {
    fn default() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            entries: HashMap::new(),
        }
    }
}

/// キャッシュキー（送信先と画像データのSHA-256, 16進）
///
/// 送信先が違えば同じ画像でも別のキーになる。
pub fn cache_key(scope: &str, bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(scope.as_bytes());
    hasher.update([0u8]);
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// キャッシュを挟んだトランスポート
///
/// ヒットすれば送信せずにキャッシュの結果を返し、成功した結果だけを記録する。
pub struct CachedTransport<T> {
    inner: T,
    scope: String,
    cache: Mutex<CacheFile>,
    hits: Mutex<usize>,
}

impl<T: OcrTransport> CachedTransport<T> {
    pub fn new(inner: T, cache: CacheFile) -> Self {
        Self {
            inner,
            scope: String::new(),
            cache: Mutex::new(cache),
            hits: Mutex::new(0),
        }
    }

    /// キーに混ぜる送信先（通常はエンドポイントURL）
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    pub fn hits(&self) -> usize {
        *self.hits.lock()
    }

    pub fn save(&self, folder: &Path) -> Result<()> {
        self.cache.lock().save(folder)
    }

    pub fn into_cache(self) -> CacheFile {
        self.cache.into_inner()
    }
}

impl<T: OcrTransport> OcrTransport for CachedTransport<T> {
    async fn recognize(&self, file: &SelectedFile) -> ocr_upload_common::Result<String> {
        let hash = cache_key(&self.scope, &file.bytes);

        let cached = self.cache.lock().get(&hash).map(|e| e.text.clone());
        if let Some(text) = cached {
            *self.hits.lock() += 1;
            tracing::debug!(file = %file.file_name, "cache hit");
            return Ok(text);
        }

        let text = self.inner.recognize(file).await?;
        self.cache.lock().insert(
            hash,
            file.file_name.clone(),
            file.size() as u64,
            text.clone(),
        );
        Ok(text)
    }
}
