//! グループカタログ
//!
//! ルームで使えるグループ名の順序付き集合。
//! 同一性は大文字小文字を区別せず、表示は最初に登録された表記を保つ。

use crate::format::{compare_text, group_key, normalize_group};
use serde::{Deserialize, Serialize};

/// ルーム初回利用時に投入する既定グループ
pub const DEFAULT_GROUPS: &[&str] = &["Cozinha", "Quarto", "Sala", "Banheiro", "Serviços"];

/// グループ追加の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupInsert {
    /// 追加された（正規化後の名前）
    Added(String),
    /// 既に存在する（既存の表記）
    Duplicate(String),
    /// 空の名前
    Empty,
}

/// グループカタログ
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupCatalog {
    names: Vec<String>,
}

impl GroupCatalog {
    /// 既定グループで初期化
    pub fn with_defaults() -> Self {
        Self::from_names(DEFAULT_GROUPS.iter().copied())
    }

    /// 名前の列から構築（空・重複は除去、最初の表記を優先）
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut catalog = Self::default();
        for name in names {
            catalog.push_unique(name.as_ref());
        }
        catalog.sort();
        catalog
    }

    /// グループを追加（削除操作はない）
    pub fn insert(&mut self, name: &str) -> GroupInsert {
        let name = normalize_group(name);
        if name.is_empty() {
            return GroupInsert::Empty;
        }
        if let Some(existing) = self.canonical(&name) {
            return GroupInsert::Duplicate(existing.to_string());
        }
        self.names.push(name.clone());
        self.sort();
        GroupInsert::Added(name)
    }

    /// 大文字小文字を区別せず存在確認
    pub fn contains(&self, name: &str) -> bool {
        self.canonical(name).is_some()
    }

    /// 登録済みの表記を取得
    pub fn canonical(&self, name: &str) -> Option<&str> {
        let key = group_key(name);
        self.names
            .iter()
            .find(|n| group_key(n) == key)
            .map(String::as_str)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    fn push_unique(&mut self, name: &str) {
        let name = normalize_group(name);
        if !name.is_empty() && !self.contains(&name) {
            self.names.push(name);
        }
    }

    fn sort(&mut self) {
        self.names.sort_by(|a, b| compare_text(a, b));
    }
}
