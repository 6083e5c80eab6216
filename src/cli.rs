use clap::{Args, Parser, Subcommand};
use shared_list_core::{FilterConfig, GroupFilter, PriorityComparator, StateFilter};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "shared-list")]
#[command(about = "複数人で共有する買い物・タスクリスト", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// ルーム名（設定・環境変数より優先）
    #[arg(long, global = true)]
    pub room: Option<String>,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// アイテムを追加
    Add {
        /// アイテムのテキスト
        #[arg(required = true)]
        text: String,

        /// 優先度 (1-10)
        #[arg(short, long, default_value = "5", allow_hyphen_values = true)]
        priority: String,

        /// グループ
        #[arg(short, long, default_value = "")]
        group: String,

        /// 金額（例: 12,50）
        #[arg(short = 'V', long, default_value = "")]
        value: String,

        /// 外部リンク
        #[arg(short, long, default_value = "")]
        link: String,
    },

    /// フィルタ・並べ替え済みの一覧を表示
    List {
        #[command(flatten)]
        filter: FilterArgs,

        /// JSONで出力
        #[arg(long)]
        json: bool,
    },

    /// アイテムを編集
    Set {
        /// アイテムID
        #[arg(required = true)]
        id: String,

        /// テキスト
        #[arg(long)]
        text: Option<String>,

        /// 優先度 (1-10)
        #[arg(long, allow_hyphen_values = true)]
        prio: Option<String>,

        /// グループ
        #[arg(long)]
        group: Option<String>,

        /// 金額
        #[arg(long)]
        value: Option<String>,

        /// 外部リンク（空文字で削除）
        #[arg(long)]
        link: Option<String>,
    },

    /// 完了にする
    Done {
        /// アイテムID
        #[arg(required = true)]
        id: String,

        /// 未完了に戻す
        #[arg(long)]
        undo: bool,
    },

    /// 完了済みのアイテムを一括削除
    ClearDone {
        /// 確認せずに削除
        #[arg(short, long)]
        yes: bool,
    },

    /// IDを指定して削除（省略時は入力を求める）
    Delete {
        ids: Vec<String>,
    },

    /// グループ管理
    Group {
        #[command(subcommand)]
        command: GroupCommands,
    },

    /// 変更を監視して一覧を再描画
    Watch {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// 設定を表示/編集
    Config {
        /// 既定のルーム名を設定
        #[arg(long)]
        room: Option<String>,

        /// データディレクトリを設定
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// 監視間隔（ミリ秒）を設定
        #[arg(long)]
        poll_interval_ms: Option<u64>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

#[derive(Subcommand)]
pub enum GroupCommands {
    /// グループを追加（省略時は入力を求める）
    Add {
        name: Option<String>,
    },

    /// グループ一覧
    List,
}

/// 一覧表示のフィルタ
#[derive(Args, Clone, Debug, Default)]
pub struct FilterArgs {
    /// 状態 (todos/pendentes/realizados)
    #[arg(long, default_value = "todos")]
    pub state: StateFilter,

    /// グループ（todos で全件）
    #[arg(long, default_value = "todos")]
    pub group: GroupFilter,

    /// 優先度の比較 (>=, <=, =)
    #[arg(long, default_value = ">=")]
    pub cmp: PriorityComparator,

    /// 優先度の比較値 (1-10、範囲外は無視)
    #[arg(long, allow_hyphen_values = true)]
    pub prio: Option<i64>,

    /// テキスト・リンクの検索語
    #[arg(long, default_value = "")]
    pub search: String,
}

impl From<FilterArgs> for FilterConfig {
    fn from(args: FilterArgs) -> Self {
        FilterConfig {
            state: args.state,
            group: args.group,
            comparator: args.cmp,
            priority: args.prio,
            search: args.search,
        }
    }
}
