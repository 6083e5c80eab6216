//! Shared List
//!
//! ルーム単位で共有する買い物・タスクリストのクライアント。
//! 永続化と配信は外部ストアに任せ、フィルタ・並べ替え・集計は shared-list-core で行う。

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod prompt;
pub mod render;
pub mod session;
pub mod store;
pub mod sync;
