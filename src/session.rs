//! クライアントセッション
//!
//! 最新のスナップショット（アイテム・グループ）とフィルタ設定を保持する。
//! スナップショットは配信ハンドラ経由でのみ置き換え、プロジェクションは毎回全量を再計算する。
//!
//! 書き込みは楽観的: ローカルを先に更新してからストアへ発行し、
//! 失敗してもロールバックしない（次の配信が正となる）。

use crate::error::Result;
use crate::prompt::Prompter;
use crate::store::RoomStore;
use crate::sync::{Snapshot, SubscriptionFault};
use shared_list_core::{
    project, FilterConfig, GroupCatalog, GroupInsert, Item, ItemDraft, ItemPatch, Projection,
};
use tracing::{debug, warn};

/// 一時的なステータスメッセージ
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Info(String),
    /// ストアへの書き込み失敗（自動リトライはしない）
    WriteFailed(String),
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Info(message) => write!(f, "{}", message),
            Status::WriteFailed(message) => write!(f, "保存に失敗しました: {}", message),
        }
    }
}

pub struct Session<S> {
    store: S,
    items: Vec<Item>,
    catalog: GroupCatalog,
    filter: FilterConfig,
    status: Option<Status>,
    items_fault: Option<String>,
    groups_fault: Option<String>,
}

impl<S: RoomStore> Session<S> {
    /// 空のスナップショットで開始
    pub fn new(store: S) -> Self {
        Self {
            store,
            items: Vec::new(),
            catalog: GroupCatalog::with_defaults(),
            filter: FilterConfig::default(),
            status: None,
            items_fault: None,
            groups_fault: None,
        }
    }

    /// ルームを開く
    ///
    /// グループ未登録のルームには既定グループを投入し、初回スナップショットを読み込む。
    pub fn open(store: S) -> Self {
        let mut session = Self::new(store);
        session.seed_groups();
        let items = session.store.fetch_items();
        session.on_items(items.map_err(|e| SubscriptionFault(e.to_string())));
        let groups = session.store.fetch_groups();
        session.on_groups(groups.map_err(|e| SubscriptionFault(e.to_string())));
        session
    }

    fn seed_groups(&mut self) {
        match self.store.fetch_groups() {
            Ok(None) => {
                debug!(room = self.store.room(), "seeding default groups");
                let defaults = GroupCatalog::with_defaults();
                let result = self.store.patch_groups(defaults.names());
                self.record_write("グループ初期化", result);
            }
            Ok(Some(_)) => {}
            Err(e) => self.groups_fault = Some(fault_message(e.to_string())),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // ========================
    // 配信ハンドラ
    // ========================

    /// アイテムのスナップショットを受け取る
    pub fn on_items(&mut self, snapshot: Snapshot<Vec<Item>>) {
        match snapshot {
            Ok(items) => {
                debug!(count = items.len(), "items snapshot");
                self.items = items;
                self.items_fault = None;
            }
            Err(fault) => self.items_fault = Some(fault_message(fault.to_string())),
        }
    }

    /// グループのスナップショットを受け取る（未登録なら既定値）
    pub fn on_groups(&mut self, snapshot: Snapshot<Option<Vec<String>>>) {
        match snapshot {
            Ok(Some(names)) => {
                self.catalog = GroupCatalog::from_names(names);
                self.groups_fault = None;
            }
            Ok(None) => {
                self.catalog = GroupCatalog::with_defaults();
                self.groups_fault = None;
            }
            Err(fault) => self.groups_fault = Some(fault_message(fault.to_string())),
        }
    }

    // ========================
    // 参照
    // ========================

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn catalog(&self) -> &GroupCatalog {
        &self.catalog
    }

    pub fn filter(&self) -> &FilterConfig {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: FilterConfig) {
        self.filter = filter;
    }

    /// 現在の表示内容
    pub fn projection(&self) -> Projection {
        project(&self.items, &self.catalog, &self.filter)
    }

    /// ステータスを取り出して消去
    pub fn take_status(&mut self) -> Option<Status> {
        self.status.take()
    }

    /// 購読エラー（そのストリームの次の正常な配信まで残る）
    pub fn subscription_error(&self) -> Option<&str> {
        self.items_fault.as_deref().or(self.groups_fault.as_deref())
    }

    // ========================
    // 書き込み
    // ========================

    /// アイテム追加。テキストが空なら何もしない
    pub fn add_item(&mut self, draft: ItemDraft) -> Option<String> {
        let id = uuid::Uuid::new_v4().to_string();
        let mut item = draft.into_item(id)?;
        if let Some(canonical) = self.catalog.canonical(&item.group) {
            item.group = canonical.to_string();
        }

        self.items.push(item.clone());
        let result = self.store.create_item(&item);
        self.record_write("追加", result);
        Some(item.id)
    }

    /// アイテム更新。ローカルに存在しなければ false
    pub fn update_item(&mut self, id: &str, patch: ItemPatch) -> bool {
        let mut patch = patch.sanitized();
        if let Some(group) = &patch.group {
            if let Some(canonical) = self.catalog.canonical(group) {
                patch.group = Some(canonical.to_string());
            }
        }

        let Some(item) = self.items.iter_mut().find(|item| item.id == id) else {
            return false;
        };
        if patch.is_empty() {
            return true;
        }
        item.apply(&patch);

        let result = self.store.patch_item(id, &patch);
        self.record_write("更新", result);
        true
    }

    /// 完了フラグの切り替え
    pub fn set_done(&mut self, id: &str, done: bool) -> bool {
        self.update_item(id, ItemPatch::done(done))
    }

    /// 完了済みアイテムを確認のうえ一括削除
    pub fn clear_done(&mut self, prompter: &dyn Prompter) -> Result<usize> {
        let done: Vec<String> = self
            .items
            .iter()
            .filter(|item| item.done)
            .map(|item| item.id.clone())
            .collect();
        if done.is_empty() {
            return Ok(0);
        }
        if !prompter.confirm(&format!("完了済み {} 件を削除しますか?", done.len()))? {
            return Ok(0);
        }

        Ok(self.delete_ids(&done))
    }

    /// ID指定で削除。ローカルで削除した件数を返す
    pub fn delete_ids(&mut self, ids: &[String]) -> usize {
        if ids.is_empty() {
            return 0;
        }
        let before = self.items.len();
        self.items.retain(|item| !ids.contains(&item.id));
        let removed = before - self.items.len();

        let result = self.store.delete_items(ids);
        self.record_write("削除", result);
        removed
    }

    /// 削除するIDを入力で受け取る（カンマ区切り）
    pub fn delete_prompted(&mut self, prompter: &dyn Prompter) -> Result<usize> {
        let Some(input) = prompter.input("削除するID（カンマ区切り、空でキャンセル）")? else {
            return Ok(0);
        };
        let ids = parse_id_list(&input);
        Ok(self.delete_ids(&ids))
    }

    /// グループ追加。追加できたらカタログ全体を保存する
    pub fn add_group(&mut self, name: &str) -> GroupInsert {
        let outcome = self.catalog.insert(name);
        match &outcome {
            GroupInsert::Added(name) => {
                let result = self.store.patch_groups(self.catalog.names());
                if result.is_ok() {
                    self.status = Some(Status::Info(format!("グループを追加しました: {}", name)));
                }
                self.record_write("グループ追加", result);
            }
            GroupInsert::Duplicate(existing) => {
                self.status = Some(Status::Info(format!("既に存在するグループです: {}", existing)));
            }
            GroupInsert::Empty => {}
        }
        outcome
    }

    fn record_write(&mut self, action: &str, result: Result<()>) {
        if let Err(e) = result {
            warn!(room = self.store.room(), action, error = %e, "write failed");
            self.status = Some(Status::WriteFailed(format!("{}: {}", action, e)));
        }
    }
}

fn fault_message(message: String) -> String {
    warn!(error = %message, "subscription error");
    message
}

/// カンマ区切りのID列を分解（空要素は除外）
pub fn parse_id_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}
