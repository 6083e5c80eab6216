//! JSONファイルによるドキュメントストア
//!
//! `<data_dir>/rooms/<room>/items.json` と `meta/config.json` に保存する。
//! 書き込みは一時ファイル経由のリネームで行う。

use super::{server_timestamp, validate_room, Revision, RoomStore};
use crate::error::{ListError, Result};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use shared_list_core::{Item, ItemPatch};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

const ITEMS_FILE_NAME: &str = "items.json";
const META_DIR_NAME: &str = "meta";
const META_FILE_NAME: &str = "config.json";

#[derive(Debug, Clone)]
pub struct FileStore {
    room: String,
    dir: PathBuf,
}

impl FileStore {
    /// ルームのディレクトリを開く（なければ作成）
    pub fn open(data_dir: &Path, room: &str) -> Result<Self> {
        validate_room(room)?;
        let dir = data_dir.join("rooms").join(room);
        std::fs::create_dir_all(dir.join(META_DIR_NAME))?;
        debug!(room, dir = %dir.display(), "file store opened");
        Ok(Self {
            room: room.to_string(),
            dir,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn items_path(&self) -> PathBuf {
        self.dir.join(ITEMS_FILE_NAME)
    }

    pub fn meta_path(&self) -> PathBuf {
        self.dir.join(META_DIR_NAME).join(META_FILE_NAME)
    }

    fn read_object(path: &Path) -> Result<Option<Map<String, Value>>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path)?;
        match serde_json::from_str::<Value>(&content)? {
            Value::Object(map) => Ok(Some(map)),
            _ => Err(ListError::Store(format!(
                "オブジェクト形式ではありません: {}",
                path.display()
            ))),
        }
    }

    fn read_items(&self) -> Result<Map<String, Value>> {
        Ok(Self::read_object(&self.items_path())?.unwrap_or_default())
    }

    /// 書き込みごとに一意な一時ファイルへ書いてからリネームする
    fn write_atomic(path: &Path, value: &Value) -> Result<()> {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        let mut tmp = NamedTempFile::new_in(parent)?;
        serde_json::to_writer_pretty(&mut tmp, value)?;
        tmp.flush()?;
        tmp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }

    fn write_items(&self, items: Map<String, Value>) -> Result<()> {
        Self::write_atomic(&self.items_path(), &Value::Object(items))
    }
}

impl RoomStore for FileStore {
    fn room(&self) -> &str {
        &self.room
    }

    fn fetch_items(&self) -> Result<Vec<Item>> {
        let docs = self.read_items()?;
        Ok(docs
            .iter()
            .map(|(id, doc)| Item::from_document(id, doc))
            .collect())
    }

    fn fetch_groups(&self) -> Result<Option<Vec<String>>> {
        let meta = match Self::read_object(&self.meta_path())? {
            Some(meta) => meta,
            None => return Ok(None),
        };
        Ok(meta.get("groups").and_then(Value::as_array).map(|groups| {
            groups
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        }))
    }

    fn revision(&self) -> Result<Revision> {
        let mut hasher = Sha256::new();
        for path in [self.items_path(), self.meta_path()] {
            match std::fs::read(&path) {
                Ok(bytes) => {
                    hasher.update((bytes.len() as u64).to_le_bytes());
                    hasher.update(&bytes);
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    hasher.update(u64::MAX.to_le_bytes());
                }
                Err(e) => return Err(e.into()),
            }
        }
        Ok(Revision(hex::encode(hasher.finalize())))
    }

    fn create_item(&self, item: &Item) -> Result<()> {
        let mut docs = self.read_items()?;
        let mut doc = item.to_document();
        if let Some(fields) = doc.as_object_mut() {
            fields.insert("createdAt".into(), Value::from(server_timestamp()));
        }
        docs.insert(item.id.clone(), doc);
        self.write_items(docs)?;
        debug!(room = %self.room, id = %item.id, "item created");
        Ok(())
    }

    fn patch_item(&self, id: &str, patch: &ItemPatch) -> Result<()> {
        let mut docs = self.read_items()?;
        let doc = docs
            .get_mut(id)
            .ok_or_else(|| ListError::ItemNotFound(id.to_string()))?;
        if !doc.is_object() {
            *doc = Value::Object(Map::new());
        }
        if let Value::Object(fields) = doc {
            fields.extend(patch.to_document());
        }
        self.write_items(docs)?;
        debug!(room = %self.room, id, "item patched");
        Ok(())
    }

    fn delete_items(&self, ids: &[String]) -> Result<()> {
        let mut docs = self.read_items()?;
        let before = docs.len();
        for id in ids {
            docs.remove(id);
        }
        let removed = before - docs.len();
        if removed > 0 {
            self.write_items(docs)?;
        }
        debug!(room = %self.room, requested = ids.len(), removed, "items deleted");
        Ok(())
    }

    fn patch_groups(&self, groups: &[String]) -> Result<()> {
        let mut meta = Self::read_object(&self.meta_path())?.unwrap_or_default();
        meta.insert("groups".into(), Value::from(groups.to_vec()));
        Self::write_atomic(&self.meta_path(), &Value::Object(meta))?;
        debug!(room = %self.room, count = groups.len(), "groups patched");
        Ok(())
    }
}
