//! リストアイテムの型定義
//!
//! - Item: 画面に表示する1件（ストアから受け取ったスナップショット）
//! - ItemDraft: 新規追加時のユーザー入力
//! - ItemPatch: 既存アイテムへの部分更新

use crate::format::{clamp_priority, normalize_group, parse_money, parse_priority, sanitize_value};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// グループ未設定時の既定グループ
pub const FALLBACK_GROUP: &str = "Outros";

/// リストアイテム
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,

    /// 表示テキスト
    pub text: String,

    /// 優先度（1〜10）
    pub priority: u8,

    /// グループ名
    pub group: String,

    /// 金額（0以上）
    pub value: f64,

    /// 完了フラグ
    pub done: bool,

    /// 作成日時（UNIXミリ秒）。サーバー側で付与されるため、作成直後は None
    #[serde(default)]
    pub created_at: Option<i64>,

    /// 外部リンク
    #[serde(default)]
    pub link: Option<String>,
}

impl Item {
    /// ストアの生ドキュメントから寛容にデコード
    ///
    /// 欠損・型違いのフィールドは既定値に置き換え、範囲外の値は丸め込む。
    pub fn from_document(id: &str, doc: &Value) -> Self {
        let text = doc
            .get("item")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let priority = clamp_priority(doc.get("prio").and_then(number_of).or(Some(5.0)));

        let group = doc
            .get("grupo")
            .and_then(Value::as_str)
            .map(normalize_group)
            .unwrap_or_else(|| FALLBACK_GROUP.to_string());

        let value = sanitize_value(doc.get("valor").and_then(number_of).unwrap_or(0.0));

        let done = doc.get("feito").map(truthy).unwrap_or(false);

        let created_at = doc.get("createdAt").and_then(Value::as_i64);

        let link = doc
            .get("link")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        Self {
            id: id.to_string(),
            text,
            priority,
            group,
            value,
            done,
            created_at,
            link,
        }
    }

    /// ストア保存用のドキュメントに変換
    pub fn to_document(&self) -> Value {
        serde_json::json!({
            "item": self.text,
            "prio": self.priority,
            "grupo": self.group,
            "valor": self.value,
            "link": self.link,
            "feito": self.done,
            "createdAt": self.created_at,
        })
    }

    /// 部分更新を適用（値は事前に sanitized() 済みであること）
    pub fn apply(&mut self, patch: &ItemPatch) {
        if let Some(text) = &patch.text {
            self.text = text.clone();
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(group) = &patch.group {
            self.group = group.clone();
        }
        if let Some(value) = patch.value {
            self.value = value;
        }
        if let Some(done) = patch.done {
            self.done = done;
        }
        if let Some(link) = &patch.link {
            self.link = link.clone();
        }
    }
}

/// 新規アイテムの入力値（未加工）
#[derive(Debug, Clone, Default)]
pub struct ItemDraft {
    pub text: String,
    pub priority: String,
    pub group: String,
    pub value: String,
    pub link: String,
}

impl ItemDraft {
    /// 入力を丸め込んで Item を作る
    ///
    /// テキストが空なら None（追加しない）。created_at はストアが付与する。
    pub fn into_item(self, id: String) -> Option<Item> {
        let text = self.text.trim().to_string();
        if text.is_empty() {
            return None;
        }

        let group = normalize_group(&self.group);
        let link = self.link.trim();

        Some(Item {
            id,
            text,
            priority: parse_priority(&self.priority),
            group: if group.is_empty() {
                FALLBACK_GROUP.to_string()
            } else {
                group
            },
            value: parse_money(&self.value),
            done: false,
            created_at: None,
            link: if link.is_empty() {
                None
            } else {
                Some(link.to_string())
            },
        })
    }
}

/// 部分更新
///
/// `link` は `Some(None)` でリンク削除を表す。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub done: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<Option<String>>,
}

impl ItemPatch {
    pub fn done(done: bool) -> Self {
        Self {
            done: Some(done),
            ..Default::default()
        }
    }

    /// 変更なしか
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// 作成時と同じ丸め込みを適用
    pub fn sanitized(mut self) -> Self {
        self.text = self.text.map(|t| t.trim().to_string());
        self.priority = self.priority.map(|p| clamp_priority(Some(p as f64)));
        self.group = self.group.map(|g| normalize_group(&g));
        self.value = self.value.map(sanitize_value);
        self.link = self.link.map(|link| {
            link.map(|l| l.trim().to_string())
                .filter(|l| !l.is_empty())
        });
        self
    }

    /// ストアのドキュメント形式（元のフィールド名）に変換
    pub fn to_document(&self) -> serde_json::Map<String, Value> {
        let mut doc = serde_json::Map::new();
        if let Some(text) = &self.text {
            doc.insert("item".into(), Value::from(text.as_str()));
        }
        if let Some(priority) = self.priority {
            doc.insert("prio".into(), Value::from(priority));
        }
        if let Some(group) = &self.group {
            doc.insert("grupo".into(), Value::from(group.as_str()));
        }
        if let Some(value) = self.value {
            doc.insert("valor".into(), Value::from(value));
        }
        if let Some(done) = self.done {
            doc.insert("feito".into(), Value::from(done));
        }
        if let Some(link) = &self.link {
            doc.insert(
                "link".into(),
                link.as_deref().map(Value::from).unwrap_or(Value::Null),
            );
        }
        doc
    }
}

fn number_of(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => !s.is_empty(),
        Value::Null => false,
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_document_full() {
        let doc = json!({
            "item": "Leite",
            "prio": 8,
            "grupo": " Cozinha ",
            "valor": 12.5,
            "link": "https://leite.com",
            "feito": false,
            "createdAt": 1700000000000i64
        });

        let item = Item::from_document("a1", &doc);
        assert_eq!(item.id, "a1");
        assert_eq!(item.text, "Leite");
        assert_eq!(item.priority, 8);
        assert_eq!(item.group, "Cozinha");
        assert_eq!(item.value, 12.5);
        assert!(!item.done);
        assert_eq!(item.created_at, Some(1700000000000));
        assert_eq!(item.link.as_deref(), Some("https://leite.com"));
    }

    #[test]
    fn test_from_document_missing_fields() {
        let item = Item::from_document("x", &json!({}));
        assert_eq!(item.text, "");
        assert_eq!(item.priority, 5);
        assert_eq!(item.group, FALLBACK_GROUP);
        assert_eq!(item.value, 0.0);
        assert!(!item.done);
        assert_eq!(item.created_at, None); // サーバー時刻の付与待ち
        assert_eq!(item.link, None);
    }

    #[test]
    fn test_from_document_clamps_out_of_range() {
        let doc = json!({"prio": 99, "valor": -4.0, "link": "  "});
        let item = Item::from_document("x", &doc);
        assert_eq!(item.priority, 10);
        assert_eq!(item.value, 0.0);
        assert_eq!(item.link, None);

        let doc = json!({"prio": "0", "valor": "7.25", "feito": 1});
        let item = Item::from_document("x", &doc);
        assert_eq!(item.priority, 1);
        assert_eq!(item.value, 7.25);
        assert!(item.done);
    }

    #[test]
    fn test_draft_into_item() {
        let draft = ItemDraft {
            text: "  Pão ".to_string(),
            priority: "12".to_string(),
            group: "".to_string(),
            value: "R$ 1.050,3".to_string(),
            link: " ".to_string(),
        };

        let item = draft.into_item("id-1".to_string()).expect("アイテムが作られない");
        assert_eq!(item.text, "Pão");
        assert_eq!(item.priority, 10);
        assert_eq!(item.group, FALLBACK_GROUP);
        assert_eq!(item.value, 1050.3);
        assert_eq!(item.link, None);
        assert_eq!(item.created_at, None);
        assert!(!item.done);
    }

    #[test]
    fn test_draft_with_empty_text_is_ignored() {
        let draft = ItemDraft {
            text: "   ".to_string(),
            ..Default::default()
        };
        assert!(draft.into_item("id".to_string()).is_none());
    }

    #[test]
    fn test_patch_sanitized_and_applied() {
        let mut item = Item::from_document("x", &json!({"item": "Café", "link": "http://a"}));
        let patch = ItemPatch {
            priority: Some(0),
            value: Some(f64::NAN),
            link: Some(Some("   ".to_string())),
            ..Default::default()
        }
        .sanitized();

        item.apply(&patch);
        assert_eq!(item.priority, 1);
        assert_eq!(item.value, 0.0);
        assert_eq!(item.link, None);
        assert_eq!(item.text, "Café");
    }

    #[test]
    fn test_patch_to_document_uses_store_field_names() {
        let patch = ItemPatch {
            done: Some(true),
            link: Some(None),
            ..Default::default()
        };
        let doc = patch.to_document();
        assert_eq!(doc.get("feito"), Some(&json!(true)));
        assert_eq!(doc.get("link"), Some(&Value::Null));
        assert!(doc.get("item").is_none());
    }

    #[test]
    fn test_item_document_roundtrip_keeps_fields() {
        let doc = json!({"item": "Sabão", "prio": 3, "grupo": "Banheiro", "valor": 0, "feito": true});
        let item = Item::from_document("s", &doc);
        let back = Item::from_document("s", &item.to_document());
        assert_eq!(item, back);
    }
}
