//! 外部ドキュメントストア
//!
//! 永続化・リアルタイム配信はストア側の責務。
//! クライアントはスナップショットの取得と、書き込みの発行だけを行う。
//!
//! ## レイアウト（ルームごと）
//! - items: アイテムID → ドキュメント
//! - meta/config: `{"groups": [...]}`

pub mod file;
pub mod memory;

use crate::error::{ListError, Result};
use lazy_static::lazy_static;
use regex::Regex;
use shared_list_core::{Item, ItemPatch};

pub use file::FileStore;
pub use memory::MemoryStore;

lazy_static! {
    static ref ROOM_RE: Regex = Regex::new(r"^[A-Za-z0-9._-]{1,64}$").unwrap();
}

/// ストアの内容を表すフィンガープリント
///
/// どれかのドキュメントが変われば値も変わる。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revision(pub String);

/// ルーム単位のストア
pub trait RoomStore {
    /// ルーム名
    fn room(&self) -> &str;

    /// 全アイテムのスナップショット
    fn fetch_items(&self) -> Result<Vec<Item>>;

    /// グループカタログ（ルームに未登録なら None）
    fn fetch_groups(&self) -> Result<Option<Vec<String>>>;

    /// 現在のリビジョン
    fn revision(&self) -> Result<Revision>;

    /// アイテム作成（createdAt はストアが付与）
    fn create_item(&self, item: &Item) -> Result<()>;

    /// アイテムの部分更新
    fn patch_item(&self, id: &str, patch: &ItemPatch) -> Result<()>;

    /// アイテム削除（存在しないIDは無視）
    fn delete_items(&self, ids: &[String]) -> Result<()>;

    /// グループカタログの更新（マージ書き込み）
    fn patch_groups(&self, groups: &[String]) -> Result<()>;
}

impl<S: RoomStore + ?Sized> RoomStore for std::sync::Arc<S> {
    fn room(&self) -> &str {
        (**self).room()
    }

    fn fetch_items(&self) -> Result<Vec<Item>> {
        (**self).fetch_items()
    }

    fn fetch_groups(&self) -> Result<Option<Vec<String>>> {
        (**self).fetch_groups()
    }

    fn revision(&self) -> Result<Revision> {
        (**self).revision()
    }

    fn create_item(&self, item: &Item) -> Result<()> {
        (**self).create_item(item)
    }

    fn patch_item(&self, id: &str, patch: &ItemPatch) -> Result<()> {
        (**self).patch_item(id, patch)
    }

    fn delete_items(&self, ids: &[String]) -> Result<()> {
        (**self).delete_items(ids)
    }

    fn patch_groups(&self, groups: &[String]) -> Result<()> {
        (**self).patch_groups(groups)
    }
}

/// ルーム名を検証
pub fn validate_room(room: &str) -> Result<()> {
    if ROOM_RE.is_match(room) && room != "." && room != ".." {
        Ok(())
    } else {
        Err(ListError::InvalidRoom(room.to_string()))
    }
}

/// ストア側の時刻（UNIXミリ秒）
pub fn server_timestamp() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_room() {
        assert!(validate_room("casa").is_ok());
        assert!(validate_room("wullyann-pamela").is_ok());
        assert!(validate_room("room_2.v1").is_ok());

        assert!(validate_room("").is_err());
        assert!(validate_room("..").is_err());
        assert!(validate_room("a/b").is_err());
        assert!(validate_room("com espaço").is_err());
        assert!(validate_room(&"x".repeat(65)).is_err());
    }

    #[test]
    fn test_invalid_room_error() {
        let err = validate_room("../etc").unwrap_err();
        assert!(matches!(err, ListError::InvalidRoom(_)));
        assert!(format!("{}", err).contains("../etc"));
    }
}
