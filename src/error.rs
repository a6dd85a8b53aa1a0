use thiserror::Error;

#[derive(Error, Debug)]
pub enum AllergenScanError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("アレルゲンが登録されていません。`allergen-scan allergens --add NAME` で追加するか --allergen を指定してください")]
    NoAllergens,

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("成分データベースが不正: {0}")]
    InvalidDatabase(String),

    #[error("照合エラー: {0}")]
    Core(#[from] allergen_scan_common::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AllergenScanError>;
