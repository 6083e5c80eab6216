//! Shared List Core Library
//!
//! CLIと他のフロントエンドで共有される型と、表示用プロジェクションの純粋ロジック

pub mod types;
pub mod catalog;
pub mod error;
pub mod filter;
pub mod format;
pub mod projector;

pub use types::{Item, ItemDraft, ItemPatch, FALLBACK_GROUP};
pub use catalog::{GroupCatalog, GroupInsert, DEFAULT_GROUPS};
pub use error::{Error, Result};
pub use filter::{FilterConfig, GroupFilter, PriorityComparator, StateFilter};
pub use format::{clamp_priority, compare_text, format_amount, format_money, parse_money, parse_priority};
pub use projector::{project, Projection, Summary};
