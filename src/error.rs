use thiserror::Error;

#[derive(Error, Debug)]
pub enum ListError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ルーム名が不正です: {0}（英数字と . _ - のみ、64文字以内）")]
    InvalidRoom(String),

    #[error("アイテムが見つかりません: {0}")]
    ItemNotFound(String),

    #[error("ストアエラー: {0}")]
    Store(String),

    #[error("入力エラー: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] shared_list_core::Error),
}

pub type Result<T> = std::result::Result<T, ListError>;
