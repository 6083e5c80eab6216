//! テキスト描画
//!
//! プロジェクションの行と集計を端末向けの文字列にする。

use crate::error::Result;
use shared_list_core::{format_amount, format_money, GroupCatalog, Item, Projection, Summary};

/// 行の一覧（1アイテム1行）
pub fn render_rows(rows: &[Item]) -> String {
    if rows.is_empty() {
        return "（表示するアイテムはありません）\n".to_string();
    }

    let group_width = rows
        .iter()
        .map(|item| item.group.chars().count())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for item in rows {
        out.push_str(&render_row(item, group_width));
        out.push('\n');
    }
    out
}

fn render_row(item: &Item, group_width: usize) -> String {
    let check = if item.done { "[x]" } else { "[ ]" };
    let link = item
        .link
        .as_deref()
        .map(|link| format!("  🔗 {}", link))
        .unwrap_or_default();

    format!(
        "{} {:>2}  {:<gw$}  {:>12}  {}{}  ({})",
        check,
        item.priority,
        item.group,
        format_amount(item.value),
        item.text,
        link,
        item.id,
        gw = group_width,
    )
}

/// 集計行
pub fn render_summary(summary: &Summary) -> String {
    format!(
        "{} itens • {} pendentes • {} realizados • Total {} • Falta {}",
        summary.count,
        summary.pending_count,
        summary.done_count,
        format_money(summary.total_value),
        format_money(summary.pending_value),
    )
}

/// グループ一覧
pub fn render_groups(catalog: &GroupCatalog) -> String {
    let mut out = String::new();
    for name in catalog.names() {
        out.push_str("- ");
        out.push_str(name);
        out.push('\n');
    }
    out
}

/// 一覧と集計をまとめて描画
pub fn render_projection(projection: &Projection) -> String {
    let mut out = String::new();
    if let Some(group) = &projection.unknown_group {
        out.push_str(&format!("（グループ「{}」は未登録です）\n", group));
    }
    out.push_str(render_rows(&projection.rows).trim_end());
    out.push('\n');
    out.push_str(&render_summary(&projection.summary));
    out.push('\n');
    out
}

/// プロジェクションをJSONで出力
pub fn render_json(projection: &Projection) -> Result<String> {
    Ok(serde_json::to_string_pretty(projection)?)
}
