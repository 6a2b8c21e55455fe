use clap::Parser;
use ocr_upload::{cli, config, error, export, logging, recognizer, scanner, transport};
use cli::{Cli, Commands};
use config::{Config, BASE_URL_ENV};
use error::{OcrUploadError, Result};
use export::DiskSaver;
use logging::TracingObserver;
use ocr_upload_common::{SubmitOutcome, UploadController};
use transport::HttpTransport;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logger(cli.verbose);
    let config = Config::load()?;

    match cli.command {
        Commands::Recognize { image, output, format, no_save } => {
            let base_url = config.resolve_base_url(cli.base_url.as_deref())?;
            let info = scanner::image_info(&image)?;
            let file = info.load()?;

            let controller = UploadController::new(
                HttpTransport::new(&base_url),
                DiskSaver::new(&output),
                TracingObserver,
            )
            .with_ordering(config.response_ordering)
            .with_export_format(format.unwrap_or(config.export_format));

            println!("📷 {} を送信中... ({})", info.file_name, controller.transport().endpoint());

            match controller.select_file(file).await {
                SubmitOutcome::Recognized(text) => {
                    println!("OCR Result:\n{}", text);
                }
                SubmitOutcome::Failed(e) => {
                    return Err(OcrUploadError::RecognitionFailed(e.to_string()));
                }
                SubmitOutcome::Superseded => {}
            }

            if !no_save {
                match controller.download()? {
                    Some(artifact) => {
                        let path = controller.saver().path_for(&artifact);
                        println!("✔ 結果を保存: {}", path.display());
                    }
                    None => println!("- 認識結果が空のため保存しません"),
                }
            }
        }

        Commands::Batch { folder, output, artifacts, format, use_cache } => {
            let base_url = config.resolve_base_url(cli.base_url.as_deref())?;

            println!("[1/3] 画像をスキャン中...");
            let images = scanner::scan_folder(&folder)?;
            if images.is_empty() {
                return Err(OcrUploadError::NoImagesFound(folder.display().to_string()));
            }
            println!("✔ {}枚の画像を検出\n", images.len());

            let cache = if use_cache {
                recognizer::CacheFile::load(&folder)
            } else {
                recognizer::CacheFile::default()
            };
            let http = HttpTransport::new(&base_url);
            let scope = http.endpoint().to_string();
            let transport = recognizer::CachedTransport::new(http, cache).with_scope(scope);
            let save_artifacts = artifacts.is_some();
            let controller = UploadController::new(
                transport,
                DiskSaver::new(artifacts.unwrap_or_else(|| folder.clone())),
                TracingObserver,
            )
            .with_ordering(config.response_ordering)
            .with_export_format(format.unwrap_or(config.export_format));

            println!("[2/3] OCR送信中...{}", if use_cache { " (キャッシュ有効)" } else { "" });
            let records =
                recognizer::recognize_images(&controller, &images, save_artifacts, !cli.verbose)
                    .await;

            let succeeded = records.iter().filter(|r| r.is_success()).count();
            println!("✔ {}/{}枚を認識", succeeded, records.len());
            if save_artifacts {
                let unsaved = records.iter().filter(|r| r.artifact_error.is_some()).count();
                println!("  出力先: {}", controller.saver().output_dir().display());
                if unsaved > 0 {
                    println!("  ⚠ {}件のファイルを保存できませんでした", unsaved);
                }
            }
            if use_cache {
                println!("  キャッシュヒット: {}枚", controller.transport().hits());
            }

            println!("\n[3/3] 結果を保存中...");
            let output = output.unwrap_or_else(|| folder.join("ocr-results.json"));
            recognizer::write_records(&output, &records)?;
            println!("✔ 結果を保存: {}", output.display());
            if use_cache {
                controller.transport().save(&folder)?;
            }

            if succeeded < records.len() {
                println!("\n⚠ {}枚の認識に失敗しました", records.len() - succeeded);
            } else {
                println!("\n✅ 完了");
            }
        }

        Commands::Config { set_base_url, set_format, set_ordering, show } => {
            let mut config = config;

            if let Some(url) = set_base_url {
                config.set_base_url(url)?;
                println!("✔ ベースURLを設定しました");
            }

            if let Some(format) = set_format {
                config.export_format = format;
                config.save()?;
                println!("✔ 出力形式を設定しました");
            }

            if let Some(ordering) = set_ordering {
                config.response_ordering = ordering;
                config.save()?;
                println!("✔ 適用方針を設定しました");
            }

            if show {
                println!("設定:");
                println!("  パス: {}", Config::config_path()?.display());
                println!("  ベースURL: {}", config.base_url);
                if let Ok(env_url) = std::env::var(BASE_URL_ENV) {
                    println!("  ({} により上書き: {})", BASE_URL_ENV, env_url);
                }
                println!("  出力形式: {}", config.export_format);
                println!("  適用方針: {}", config.response_ordering);
            }
        }

        Commands::Cache { clear, folder, info } => {
            let target = folder.unwrap_or_else(|| std::path::PathBuf::from("."));
            let cache_path = recognizer::CacheFile::cache_path(&target);

            if info || !clear {
                if cache_path.exists() {
                    let cache = recognizer::CacheFile::load(&target);
                    println!("キャッシュ情報:");
                    println!("  パス: {}", cache_path.display());
                    println!("  件数: {}", cache.len());
                    if let Ok(meta) = std::fs::metadata(&cache_path) {
                        println!("  サイズ: {} bytes", meta.len());
                    }
                } else {
                    println!("キャッシュファイルが存在しません: {}", cache_path.display());
                }
            }

            if clear {
                match recognizer::CacheFile::clear(&target) {
                    Ok(true) => println!("✔ キャッシュを削除しました: {}", cache_path.display()),
                    Ok(false) => println!("キャッシュファイルが存在しません"),
                    Err(e) => println!("キャッシュ削除エラー: {}", e),
                }
            }
        }
    }

    Ok(())
}
