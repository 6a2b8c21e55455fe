//! 結果テキストのエクスポート
//!
//! ダウンロード用のファイル（名前・MIMEタイプ・バイト列）を組み立てる。
//! `Doc` は本文をそのまま `application/msword` として出す互換形式。

use serde::{Deserialize, Serialize};

/// ダウンロードファイルの既定ベース名
pub const DEFAULT_FILE_STEM: &str = "ocr_result";

/// 出力形式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExportFormat {
    /// プレーンテキストを `.doc` / `application/msword` として出力
    #[default]
    Doc,
    /// `.txt` / `text/plain`
    Txt,
    /// WordprocessingML 2003 XML（Wordで開ける実ドキュメント）
    WordXml,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Doc | ExportFormat::WordXml => "doc",
            ExportFormat::Txt => "txt",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Doc | ExportFormat::WordXml => "application/msword",
            ExportFormat::Txt => "text/plain; charset=utf-8",
        }
    }

    /// 結果テキストからエクスポートファイルを作る
    pub fn artifact(&self, text: &str) -> ExportArtifact {
        self.artifact_named(DEFAULT_FILE_STEM, text)
    }

    /// ベース名を指定してエクスポートファイルを作る
    pub fn artifact_named(&self, stem: &str, text: &str) -> ExportArtifact {
        let bytes = match self {
            ExportFormat::Doc | ExportFormat::Txt => text.as_bytes().to_vec(),
            ExportFormat::WordXml => build_word_xml(text).into_bytes(),
        };

        ExportArtifact {
            file_name: format!("{}.{}", stem, self.extension()),
            mime_type: self.mime_type().to_string(),
            bytes,
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "doc" => Ok(ExportFormat::Doc),
            "txt" | "text" => Ok(ExportFormat::Txt),
            "word-xml" | "wordxml" | "xml" => Ok(ExportFormat::WordXml),
            _ => Err(format!("Unknown format: {}. Use doc, txt, or word-xml", s)),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Doc => write!(f, "doc"),
            ExportFormat::Txt => write!(f, "txt"),
            ExportFormat::WordXml => write!(f, "word-xml"),
        }
    }
}

/// ダウンロード対象ファイル
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

fn escape_xml(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '\'' => out.push_str("&apos;"),
            '"' => out.push_str("&quot;"),
            // XML 1.0で使えない制御文字は落とす
            c if (c as u32) < 0x20 && !matches!(c, '\t' | '\n' | '\r') => {}
            _ => out.push(ch),
        }
    }
    out
}

/// 1行1段落のWordprocessingML文書を生成
///
/// フォームフィード（OCRエンジンのページ区切り）は改ページにする。
fn build_word_xml(text: &str) -> String {
    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push('\n');
    xml.push_str(r#"<?mso-application progid="Word.Document"?>"#);
    xml.push('\n');
    xml.push_str(r#"<w:wordDocument xmlns:w="http://schemas.microsoft.com/office/word/2003/wordml">"#);
    xml.push('\n');
    xml.push_str("  <w:body>\n");

    let pages: Vec<&str> = text
        .split('\x0c')
        .filter(|page| !page.trim().is_empty())
        .collect();

    for (i, page) in pages.iter().enumerate() {
        if i > 0 {
            xml.push_str("    <w:p><w:r><w:br w:type=\"page\"/></w:r></w:p>\n");
        }
        for line in page.lines() {
            xml.push_str(&format!(
                "    <w:p><w:r><w:t xml:space=\"preserve\">{}</w:t></w:r></w:p>\n",
                escape_xml(line)
            ));
        }
    }

    xml.push_str("  </w:body>\n");
    xml.push_str("</w:wordDocument>");
    xml
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_doc_artifact_is_raw_text() {
        let artifact = ExportFormat::Doc.artifact("HELLO");
        assert_eq!(artifact.file_name, "ocr_result.doc");
        assert_eq!(artifact.mime_type, "application/msword");
        assert_eq!(artifact.bytes, b"HELLO");
    }

    #[test]
    fn test_txt_artifact() {
        let artifact = ExportFormat::Txt.artifact("こんにちは");
        assert_eq!(artifact.file_name, "ocr_result.txt");
        assert!(artifact.mime_type.starts_with("text/plain"));
        assert_eq!(String::from_utf8(artifact.bytes).unwrap(), "こんにちは");
    }

    #[test]
    fn test_word_xml_escapes_and_splits_lines() {
        let artifact = ExportFormat::WordXml.artifact("a < b\nTom & \"Jerry\"");
        let xml = String::from_utf8(artifact.bytes).unwrap();

        assert_eq!(artifact.file_name, "ocr_result.doc");
        assert!(xml.contains("Word.Document"));
        assert!(xml.contains("a &lt; b"));
        assert!(xml.contains("Tom &amp; &quot;Jerry&quot;"));
        assert_eq!(xml.matches("<w:p>").count(), 2);
    }

    fn illegal_xml_chars(xml: &str) -> Vec<char> {
        xml.chars()
            .filter(|c| (*c as u32) < 0x20 && !matches!(c, '\t' | '\n' | '\r'))
            .collect()
    }

    #[test]
    fn test_word_xml_drops_trailing_page_separator() {
        let artifact = ExportFormat::WordXml.artifact("PAGE ONE\n\x0c");
        let xml = String::from_utf8(artifact.bytes).unwrap();

        assert!(illegal_xml_chars(&xml).is_empty());
        assert!(xml.contains("PAGE ONE"));
        assert!(!xml.contains("w:type=\"page\""));
        assert_eq!(xml.matches("<w:p>").count(), 1);
    }

    #[test]
    fn test_word_xml_page_separator_becomes_page_break() {
        let artifact = ExportFormat::WordXml.artifact("PAGE ONE\n\x0cPAGE TWO\n\x0c");
        let xml = String::from_utf8(artifact.bytes).unwrap();

        assert!(illegal_xml_chars(&xml).is_empty());
        assert_eq!(xml.matches("w:type=\"page\"").count(), 1);
        assert!(xml.find("PAGE ONE").unwrap() < xml.find("<w:br").unwrap());
        assert!(xml.find("<w:br").unwrap() < xml.find("PAGE TWO").unwrap());
    }

    #[test]
    fn test_word_xml_strips_other_control_chars() {
        let artifact = ExportFormat::WordXml.artifact("a\x00b\x07c\td");
        let xml = String::from_utf8(artifact.bytes).unwrap();

        assert!(illegal_xml_chars(&xml).is_empty());
        assert!(xml.contains("abc\td"));
    }

    #[test]
    fn test_doc_artifact_keeps_page_separator() {
        let artifact = ExportFormat::Doc.artifact("PAGE ONE\n\x0c");
        assert_eq!(artifact.bytes, b"PAGE ONE\n\x0c");
    }

    #[test]
    fn test_artifact_named() {
        let artifact = ExportFormat::Txt.artifact_named("receipt_01", "x");
        assert_eq!(artifact.file_name, "receipt_01.txt");
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("DOC".parse::<ExportFormat>().unwrap(), ExportFormat::Doc);
        assert_eq!("text".parse::<ExportFormat>().unwrap(), ExportFormat::Txt);
        assert_eq!("word-xml".parse::<ExportFormat>().unwrap(), ExportFormat::WordXml);
        assert!("pdf".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_format_display_round_trips_through_from_str() {
        for format in [ExportFormat::Doc, ExportFormat::Txt, ExportFormat::WordXml] {
            assert_eq!(format.to_string().parse::<ExportFormat>().unwrap(), format);
        }
    }
}
