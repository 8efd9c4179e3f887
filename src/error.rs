use thiserror::Error;

#[derive(Error, Debug)]
pub enum AgencySplitError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("ブック読み込みエラー: {0}")]
    WorkbookRead(String),

    #[error("ZIP作成エラー: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("xlsxファイルが見つかりません: {0}")]
    NoWorkbooksFound(String),

    #[error(transparent)]
    Common(#[from] agency_split_common::Error),
}

pub type Result<T> = std::result::Result<T, AgencySplitError>;
