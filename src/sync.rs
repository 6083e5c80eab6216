//! リアルタイム配信ポート
//!
//! データストリームごとにハンドラを1つだけ登録できる。
//! ハンドラの役目はスナップショットを保存して再描画を起こすことだけで、差分計算はしない。

use crate::store::{Revision, RoomStore};
use shared_list_core::Item;
use tracing::{debug, warn};

/// 購読チャネルの障害（権限・接続）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionFault(pub String);

impl std::fmt::Display for SubscriptionFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 配信されるスナップショット
pub type Snapshot<T> = std::result::Result<T, SubscriptionFault>;

type Handler<T> = Box<dyn FnMut(Snapshot<T>) + Send>;

/// 変更通知ポート
pub struct ChangePort<T> {
    handler: Option<Handler<T>>,
}

impl<T> Default for ChangePort<T> {
    fn default() -> Self {
        Self { handler: None }
    }
}

impl<T> ChangePort<T> {
    /// ハンドラを登録（既存のハンドラは置き換え）
    pub fn register<F>(&mut self, handler: F)
    where
        F: FnMut(Snapshot<T>) + Send + 'static,
    {
        self.handler = Some(Box::new(handler));
    }

    pub fn is_registered(&self) -> bool {
        self.handler.is_some()
    }

    /// スナップショットを通知（未登録なら捨てる）
    pub fn emit(&mut self, snapshot: Snapshot<T>) {
        if let Some(handler) = self.handler.as_mut() {
            handler(snapshot);
        }
    }
}

/// ルームの購読
///
/// `poll()` のたびにリビジョンを比較し、変わっていれば全量を配信する。
pub struct RoomSubscription<S> {
    store: S,
    last_revision: Option<Revision>,
    pub items: ChangePort<Vec<Item>>,
    pub groups: ChangePort<Option<Vec<String>>>,
}

impl<S: RoomStore> RoomSubscription<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            last_revision: None,
            items: ChangePort::default(),
            groups: ChangePort::default(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// 変更を確認して配信。配信したら true
    pub fn poll(&mut self) -> bool {
        let revision = match self.store.revision() {
            Ok(revision) => revision,
            Err(e) => {
                warn!(room = self.store.room(), error = %e, "subscription failed");
                let fault = SubscriptionFault(e.to_string());
                self.items.emit(Err(fault.clone()));
                self.groups.emit(Err(fault));
                // 復旧後に必ず再配信する
                self.last_revision = None;
                return true;
            }
        };

        if self.last_revision.as_ref() == Some(&revision) {
            return false;
        }

        debug!(room = self.store.room(), revision = %revision.0, "snapshot changed");

        let items = self.store.fetch_items();
        let groups = self.store.fetch_groups();
        let failed = items.is_err() || groups.is_err();

        self.items
            .emit(items.map_err(|e| SubscriptionFault(e.to_string())));
        self.groups
            .emit(groups.map_err(|e| SubscriptionFault(e.to_string())));

        self.last_revision = if failed { None } else { Some(revision) };
        true
    }
}
