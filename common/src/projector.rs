//! 表示用プロジェクション
//!
//! アイテム集合・グループカタログ・フィルタ設定から、
//! 画面に出す順序付きの行と集計値を計算する純粋関数。

use crate::catalog::GroupCatalog;
use crate::filter::{FilterConfig, GroupFilter};
use crate::format::{compare_text, finite_or_zero};
use crate::types::Item;
use serde::Serialize;
use std::cmp::Ordering;

/// 集計値（フィルタ後の集合に対して計算）
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub count: usize,
    pub pending_count: usize,
    pub done_count: usize,
    pub total_value: f64,
    pub pending_value: f64,
}

impl Summary {
    pub fn from_items<'a, I>(items: I) -> Self
    where
        I: IntoIterator<Item = &'a Item>,
    {
        let mut summary = Summary::default();
        for item in items {
            let value = finite_or_zero(item.value);
            summary.count += 1;
            summary.total_value += value;
            if !item.done {
                summary.pending_count += 1;
                summary.pending_value += value;
            }
        }
        summary.done_count = summary.count - summary.pending_count;
        summary
    }
}

/// プロジェクション結果
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Projection {
    pub rows: Vec<Item>,
    pub summary: Summary,
    /// カタログにないグループで絞り込んだときの、その名前
    pub unknown_group: Option<String>,
}

/// フィルタ → ソート → 集計
pub fn project(items: &[Item], groups: &GroupCatalog, filter: &FilterConfig) -> Projection {
    let mut rows: Vec<Item> = items
        .iter()
        .filter(|item| filter.matches(item))
        .cloned()
        .collect();

    // sort_by は安定ソート。キーが等しい行は入力順のまま
    rows.sort_by(compare_rows);

    let summary = Summary::from_items(&rows);
    let unknown_group = match &filter.group {
        GroupFilter::Only(selected) if !groups.contains(selected) => Some(selected.clone()),
        _ => None,
    };
    Projection {
        rows,
        summary,
        unknown_group,
    }
}

/// 表示順: 未完了 → 優先度降順 → テキスト昇順
pub fn compare_rows(a: &Item, b: &Item) -> Ordering {
    a.done
        .cmp(&b.done)
        .then_with(|| b.priority.cmp(&a.priority))
        .then_with(|| compare_text(&a.text, &b.text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{PriorityComparator, StateFilter};

    fn item(id: &str, text: &str, priority: u8, group: &str, value: f64, done: bool) -> Item {
        Item {
            id: id.to_string(),
            text: text.to_string(),
            priority,
            group: group.to_string(),
            value,
            done,
            created_at: None,
            link: None,
        }
    }

    fn ids(projection: &Projection) -> Vec<&str> {
        projection.rows.iter().map(|i| i.id.as_str()).collect()
    }

    fn household() -> Vec<Item> {
        vec![
            item("leite", "Leite", 8, "Cozinha", 12.5, false),
            item("sabao", "Sabão", 3, "Banheiro", 0.0, true),
        ]
    }

    #[test]
    fn test_pending_state_scenario() {
        let filter = FilterConfig {
            state: "pendentes".parse().unwrap(),
            ..Default::default()
        };
        let projection = project(&household(), &GroupCatalog::with_defaults(), &filter);

        assert_eq!(ids(&projection), vec!["leite"]);
        assert_eq!(projection.summary.count, 1);
        assert_eq!(projection.summary.pending_count, 1);
        assert_eq!(projection.summary.done_count, 0);
        assert_eq!(projection.summary.total_value, 12.5);
        assert_eq!(projection.summary.pending_value, 12.5);
    }

    #[test]
    fn test_priority_at_least_scenario() {
        let items = vec![
            item("p3", "Três", 3, "Sala", 0.0, false),
            item("p5", "Cinco", 5, "Sala", 0.0, false),
            item("p8", "Oito", 8, "Sala", 0.0, false),
        ];
        let filter = FilterConfig {
            comparator: PriorityComparator::AtLeast,
            priority: Some(5),
            ..Default::default()
        };
        let projection = project(&items, &GroupCatalog::default(), &filter);
        assert_eq!(ids(&projection), vec!["p8", "p5"]);
    }

    #[test]
    fn test_priority_at_most_and_equal() {
        let items = vec![
            item("p3", "a", 3, "", 0.0, false),
            item("p5", "b", 5, "", 0.0, false),
            item("p8", "c", 8, "", 0.0, false),
        ];
        let at_most = FilterConfig {
            comparator: PriorityComparator::AtMost,
            priority: Some(5),
            ..Default::default()
        };
        assert_eq!(ids(&project(&items, &GroupCatalog::default(), &at_most)), vec!["p5", "p3"]);

        let equal = FilterConfig {
            comparator: PriorityComparator::Equal,
            priority: Some(8),
            ..Default::default()
        };
        assert_eq!(ids(&project(&items, &GroupCatalog::default(), &equal)), vec!["p8"]);
    }

    #[test]
    fn test_sort_order() {
        let items = vec![
            item("done-high", "Zebra", 10, "", 0.0, true),
            item("low", "Arroz", 2, "", 0.0, false),
            item("high-b", "banana", 9, "", 0.0, false),
            item("high-a", "Abacate", 9, "", 0.0, false),
        ];
        let projection = project(&items, &GroupCatalog::default(), &FilterConfig::default());
        assert_eq!(ids(&projection), vec!["high-a", "high-b", "low", "done-high"]);
    }

    #[test]
    fn test_sort_is_stable_for_equal_keys() {
        let items = vec![
            item("first", "Sabão", 4, "", 0.0, false),
            item("second", "sabao", 4, "", 0.0, false),
            item("third", "SABÃO", 4, "", 0.0, false),
        ];
        let projection = project(&items, &GroupCatalog::default(), &FilterConfig::default());
        assert_eq!(ids(&projection), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let items = vec![
            item("a", "Leite", 8, "Cozinha", 12.5, false),
            item("b", "Pão", 6, "cozinha", 7.0, true),
            item("c", "Sabão", 3, "Banheiro", 4.0, false),
            item("d", "Detergente", 5, "Cozinha", 3.2, false),
        ];
        let catalog = GroupCatalog::with_defaults();
        let filter = FilterConfig {
            group: GroupFilter::parse("COZINHA"),
            comparator: PriorityComparator::AtLeast,
            priority: Some(5),
            ..Default::default()
        };

        let once = project(&items, &catalog, &filter);
        let twice = project(&once.rows, &catalog, &filter);
        assert_eq!(once, twice);
        assert_eq!(ids(&once), vec!["a", "d", "b"]);
    }

    #[test]
    fn test_all_group_sentinel_does_not_narrow() {
        let items = vec![
            item("a", "Leite", 8, "Cozinha", 1.0, false),
            item("b", "Sabão", 3, "Banheiro", 2.0, false),
            item("c", "Vaso", 5, "Sem grupo", 3.0, true),
        ];
        let catalog = GroupCatalog::with_defaults();
        let with_sentinel = FilterConfig {
            state: StateFilter::All,
            group: GroupFilter::parse("todos"),
            search: "a".to_string(),
            ..Default::default()
        };
        let without_group = FilterConfig {
            group: GroupFilter::All,
            ..with_sentinel.clone()
        };
        assert_eq!(
            project(&items, &catalog, &with_sentinel),
            project(&items, &catalog, &without_group)
        );
    }

    #[test]
    fn test_summary_treats_non_finite_as_zero() {
        let items = vec![
            item("a", "a", 5, "", f64::NAN, false),
            item("b", "b", 5, "", 10.0, true),
            item("c", "c", 5, "", 2.5, false),
        ];
        let summary = project(&items, &GroupCatalog::default(), &FilterConfig::default()).summary;
        assert_eq!(summary.count, 3);
        assert_eq!(summary.pending_count + summary.done_count, summary.count);
        assert_eq!(summary.total_value, 12.5);
        assert_eq!(summary.pending_value, 2.5);
        assert!(summary.pending_value <= summary.total_value);
    }

    #[test]
    fn test_group_filter_reports_unknown_group() {
        let items = vec![
            item("a", "Leite", 5, "Cozinha", 1.0, false),
            item("b", "Vaso", 5, "Jardim", 1.0, false),
        ];
        let catalog = GroupCatalog::with_defaults();

        let known = FilterConfig {
            group: GroupFilter::Only("cozinha".into()),
            ..Default::default()
        };
        let projection = project(&items, &catalog, &known);
        assert_eq!(ids(&projection), vec!["a"]);
        assert_eq!(projection.unknown_group, None);

        // カタログ外のグループでも絞り込みは行う
        let unknown = FilterConfig {
            group: GroupFilter::Only("Jardim".into()),
            ..Default::default()
        };
        let projection = project(&items, &catalog, &unknown);
        assert_eq!(ids(&projection), vec!["b"]);
        assert_eq!(projection.unknown_group.as_deref(), Some("Jardim"));

        let all = project(&items, &catalog, &FilterConfig::default());
        assert_eq!(all.unknown_group, None);
    }

    #[test]
    fn test_empty_input() {
        let projection = project(&[], &GroupCatalog::default(), &FilterConfig::default());
        assert!(projection.rows.is_empty());
        assert_eq!(projection.summary, Summary::default());
    }
}
