//! 表示フィルタ設定
//!
//! UIセッション内だけで保持し、ストアには送らない。

use crate::error::Error;
use crate::format::{group_key, PRIORITY_MAX, PRIORITY_MIN};
use crate::types::Item;
use serde::{Deserialize, Serialize};

/// 完了状態フィルタ
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateFilter {
    #[default]
    All,
    Pending,
    Done,
}

impl StateFilter {
    pub fn matches(self, item: &Item) -> bool {
        match self {
            StateFilter::All => true,
            StateFilter::Pending => !item.done,
            StateFilter::Done => item.done,
        }
    }
}

impl std::str::FromStr for StateFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "todos" | "all" => Ok(StateFilter::All),
            "pendentes" | "pending" => Ok(StateFilter::Pending),
            "realizados" | "done" => Ok(StateFilter::Done),
            _ => Err(Error::Parse(format!(
                "Unknown state: {}. Use todos, pendentes, or realizados",
                s
            ))),
        }
    }
}

/// グループフィルタ
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupFilter {
    /// 「todos」: 絞り込まない
    #[default]
    All,
    Only(String),
}

impl GroupFilter {
    const ALL_SENTINELS: &'static [&'static str] = &["todos", "all"];

    /// UIの選択値から生成（空・番兵値は All）
    pub fn parse(selected: &str) -> Self {
        let key = group_key(selected);
        if key.is_empty() || Self::ALL_SENTINELS.contains(&key.as_str()) {
            GroupFilter::All
        } else {
            GroupFilter::Only(selected.trim().to_string())
        }
    }

    pub fn matches(&self, item: &Item) -> bool {
        match self {
            GroupFilter::All => true,
            GroupFilter::Only(group) => group_key(&item.group) == group_key(group),
        }
    }
}

impl std::str::FromStr for GroupFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

/// 優先度の比較演算子
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriorityComparator {
    /// `>=`
    #[default]
    AtLeast,
    /// `<=`
    AtMost,
    /// `=`
    Equal,
}

impl PriorityComparator {
    pub fn compare(self, priority: i64, operand: i64) -> bool {
        match self {
            PriorityComparator::AtLeast => priority >= operand,
            PriorityComparator::AtMost => priority <= operand,
            PriorityComparator::Equal => priority == operand,
        }
    }
}

impl std::str::FromStr for PriorityComparator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            ">=" | "≥" | "ge" => Ok(PriorityComparator::AtLeast),
            "<=" | "≤" | "le" => Ok(PriorityComparator::AtMost),
            "=" | "==" | "eq" => Ok(PriorityComparator::Equal),
            _ => Err(Error::Parse(format!(
                "Unknown comparator: {}. Use >=, <=, or =",
                s
            ))),
        }
    }
}

impl std::fmt::Display for PriorityComparator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PriorityComparator::AtLeast => write!(f, ">="),
            PriorityComparator::AtMost => write!(f, "<="),
            PriorityComparator::Equal => write!(f, "="),
        }
    }
}

/// フィルタ設定一式
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterConfig {
    pub state: StateFilter,
    pub group: GroupFilter,
    pub comparator: PriorityComparator,
    /// 優先度の比較値（1〜10 のときだけ有効）
    pub priority: Option<i64>,
    /// 自由テキスト検索
    pub search: String,
}

impl FilterConfig {
    /// 優先度フィルタが有効か
    pub fn priority_operand(&self) -> Option<i64> {
        self.priority
            .filter(|p| (PRIORITY_MIN as i64..=PRIORITY_MAX as i64).contains(p))
    }

    /// 検索語（trim・小文字化済み、空なら None）
    pub fn search_needle(&self) -> Option<String> {
        let needle = self.search.trim().to_lowercase();
        (!needle.is_empty()).then_some(needle)
    }

    pub fn matches_state(&self, item: &Item) -> bool {
        self.state.matches(item)
    }

    pub fn matches_group(&self, item: &Item) -> bool {
        self.group.matches(item)
    }

    pub fn matches_priority(&self, item: &Item) -> bool {
        match self.priority_operand() {
            Some(operand) => self.comparator.compare(item.priority as i64, operand),
            None => true,
        }
    }

    pub fn matches_search(&self, item: &Item) -> bool {
        match self.search_needle() {
            Some(needle) => {
                item.text.to_lowercase().contains(&needle)
                    || item
                        .link
                        .as_deref()
                        .map(|link| link.to_lowercase().contains(&needle))
                        .unwrap_or(false)
            }
            None => true,
        }
    }

    /// 全フィルタを満たすか
    pub fn matches(&self, item: &Item) -> bool {
        self.matches_state(item)
            && self.matches_group(item)
            && self.matches_priority(item)
            && self.matches_search(item)
    }
}
