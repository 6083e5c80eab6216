//! メモリ上のドキュメントストア
//!
//! FileStore と同じ意味論。書き込み・読み込みの失敗を注入できる。

use super::{server_timestamp, Revision, RoomStore};
use crate::error::{ListError, Result};
use serde_json::{Map, Value};
use shared_list_core::{Item, ItemPatch};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
struct MemoryState {
    items: BTreeMap<String, Value>,
    groups: Option<Vec<String>>,
    version: u64,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    room: String,
    state: Mutex<MemoryState>,
    fail_writes: AtomicBool,
    fail_reads: AtomicBool,
}

impl MemoryStore {
    pub fn new(room: &str) -> Self {
        Self {
            room: room.to_string(),
            ..Default::default()
        }
    }

    /// 以降の書き込みを失敗させる
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// 以降の読み込みを失敗させる
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// 生ドキュメントを直接投入（他クライアントからの書き込みを模擬）
    pub fn put_document(&self, id: &str, doc: Value) -> Result<()> {
        let mut state = self.lock()?;
        state.items.insert(id.to_string(), doc);
        state.version += 1;
        Ok(())
    }

    pub fn document(&self, id: &str) -> Option<Value> {
        self.lock().ok().and_then(|state| state.items.get(id).cloned())
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>> {
        self.state
            .lock()
            .map_err(|_| ListError::Store("ストアのロックが破損しています".into()))
    }

    fn check_read(&self) -> Result<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(ListError::Store("読み込み権限がありません".into()));
        }
        Ok(())
    }

    fn check_write(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(ListError::Store("書き込みが拒否されました".into()));
        }
        Ok(())
    }
}

impl RoomStore for MemoryStore {
    fn room(&self) -> &str {
        &self.room
    }

    fn fetch_items(&self) -> Result<Vec<Item>> {
        self.check_read()?;
        let state = self.lock()?;
        Ok(state
            .items
            .iter()
            .map(|(id, doc)| Item::from_document(id, doc))
            .collect())
    }

    fn fetch_groups(&self) -> Result<Option<Vec<String>>> {
        self.check_read()?;
        Ok(self.lock()?.groups.clone())
    }

    fn revision(&self) -> Result<Revision> {
        self.check_read()?;
        Ok(Revision(self.lock()?.version.to_string()))
    }

    fn create_item(&self, item: &Item) -> Result<()> {
        self.check_write()?;
        let mut doc = item.to_document();
        if let Some(fields) = doc.as_object_mut() {
            fields.insert("createdAt".into(), Value::from(server_timestamp()));
        }
        let mut state = self.lock()?;
        state.items.insert(item.id.clone(), doc);
        state.version += 1;
        Ok(())
    }

    fn patch_item(&self, id: &str, patch: &ItemPatch) -> Result<()> {
        self.check_write()?;
        let mut state = self.lock()?;
        let doc = state
            .items
            .get_mut(id)
            .ok_or_else(|| ListError::ItemNotFound(id.to_string()))?;
        if !doc.is_object() {
            *doc = Value::Object(Map::new());
        }
        if let Value::Object(fields) = doc {
            fields.extend(patch.to_document());
        }
        state.version += 1;
        Ok(())
    }

    fn delete_items(&self, ids: &[String]) -> Result<()> {
        self.check_write()?;
        let mut state = self.lock()?;
        let before = state.items.len();
        for id in ids {
            state.items.remove(id);
        }
        if state.items.len() != before {
            state.version += 1;
        }
        Ok(())
    }

    fn patch_groups(&self, groups: &[String]) -> Result<()> {
        self.check_write()?;
        let mut state = self.lock()?;
        state.groups = Some(groups.to_vec());
        state.version += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_item(id: &str) -> Item {
        Item::from_document(id, &json!({"item": "Leite", "prio": 8, "grupo": "Cozinha", "valor": 12.5}))
    }

    #[test]
    fn test_create_assigns_server_timestamp() {
        let store = MemoryStore::new("casa");
        let item = sample_item("a");
        assert_eq!(item.created_at, None);

        store.create_item(&item).unwrap();
        let items = store.fetch_items().unwrap();
        assert_eq!(items.len(), 1);
        assert!(items[0].created_at.is_some());
    }

    #[test]
    fn test_revision_changes_on_write() {
        let store = MemoryStore::new("casa");
        let before = store.revision().unwrap();
        store.create_item(&sample_item("a")).unwrap();
        assert_ne!(before, store.revision().unwrap());
    }

    #[test]
    fn test_patch_unknown_item() {
        let store = MemoryStore::new("casa");
        let err = store.patch_item("nope", &ItemPatch::done(true)).unwrap_err();
        assert!(matches!(err, ListError::ItemNotFound(_)));
    }

    #[test]
    fn test_delete_unknown_ids_is_not_an_error() {
        let store = MemoryStore::new("casa");
        let before = store.revision().unwrap();
        store.delete_items(&["ghost".to_string()]).unwrap();
        assert_eq!(before, store.revision().unwrap());
    }

    #[test]
    fn test_failure_injection() {
        let store = MemoryStore::new("casa");
        store.set_fail_writes(true);
        assert!(store.create_item(&sample_item("a")).is_err());
        store.set_fail_reads(true);
        assert!(store.fetch_items().is_err());
        assert!(store.revision().is_err());
    }
}
