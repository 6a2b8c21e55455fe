use serde::{Deserialize, Serialize};

/// バッチ処理での1画像分の結果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchRecord {
    pub file_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// 保存したエクスポートファイル
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact: Option<String>,

    /// エクスポートファイルの保存に失敗した理由
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact_error: Option<String>,
}

impl BatchRecord {
    pub fn is_success(&self) -> bool {
        self.text.is_some()
    }
}
