use clap::{Parser, Subcommand};
use ocr_upload_common::{ExportFormat, ResponseOrdering};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ocr-upload")]
#[command(about = "画像をOCRエンドポイントへ送信し、結果をダウンロードするツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// OCRサーバのベースURL（設定ファイル・環境変数より優先）
    #[arg(long, global = true)]
    pub base_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 画像1枚を送信して結果を表示・保存
    Recognize {
        /// 画像ファイルのパス
        #[arg(required = true)]
        image: PathBuf,

        /// 保存先ディレクトリ
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// 出力形式 (doc/txt/word-xml)
        #[arg(short, long)]
        format: Option<ExportFormat>,

        /// 結果ファイルを保存しない
        #[arg(long)]
        no_save: bool,
    },

    /// フォルダ内の画像をまとめて送信
    Batch {
        /// 画像フォルダのパス
        #[arg(required = true)]
        folder: PathBuf,

        /// 出力JSONファイル（デフォルト: 入力フォルダ/ocr-results.json）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 画像ごとのエクスポートファイルを書き出すディレクトリ
        #[arg(long)]
        artifacts: Option<PathBuf>,

        /// 出力形式 (doc/txt/word-xml)
        #[arg(short, long)]
        format: Option<ExportFormat>,

        /// キャッシュを使用（送信済み画像をスキップ）
        #[arg(long)]
        use_cache: bool,
    },

    /// 設定を表示/編集
    Config {
        /// ベースURLを設定
        #[arg(long)]
        set_base_url: Option<String>,

        /// 既定の出力形式を設定
        #[arg(long)]
        set_format: Option<ExportFormat>,

        /// 重複送信時の適用方針を設定 (latest-submission/last-response)
        #[arg(long)]
        set_ordering: Option<ResponseOrdering>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },

    /// キャッシュ管理
    Cache {
        /// キャッシュを削除
        #[arg(long)]
        clear: bool,

        /// 対象フォルダ（省略時はカレント）
        #[arg(short, long)]
        folder: Option<PathBuf>,

        /// キャッシュ情報を表示
        #[arg(long)]
        info: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_recognize() {
        let cli = Cli::try_parse_from([
            "ocr-upload", "recognize", "scan.png", "--format", "word-xml", "--base-url", "http://x",
        ])
        .unwrap();

        assert_eq!(cli.base_url.as_deref(), Some("http://x"));
        match cli.command {
            Commands::Recognize { image, output, format, no_save } => {
                assert_eq!(image, PathBuf::from("scan.png"));
                assert_eq!(output, PathBuf::from("."));
                assert_eq!(format, Some(ExportFormat::WordXml));
                assert!(!no_save);
            }
            _ => panic!("expected recognize"),
        }
    }

    #[test]
    fn test_parse_config_ordering() {
        let cli = Cli::try_parse_from(["ocr-upload", "config", "--set-ordering", "last-response"])
            .unwrap();
        match cli.command {
            Commands::Config { set_ordering, .. } => {
                assert_eq!(set_ordering, Some(ResponseOrdering::LastResponse));
            }
            _ => panic!("expected config"),
        }
    }

    #[test]
    fn test_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["ocr-upload", "recognize", "a.png", "-f", "pdf"]).is_err());
    }
}
