use clap::Parser;
use shared_list::{cli, config, error, logging, prompt, render, session, store, sync};
use cli::{Cli, Commands, GroupCommands};
use config::Config;
use error::{ListError, Result};
use prompt::{AutoConfirm, Prompter, TerminalPrompter};
use session::{parse_id_list, Session, Status};
use shared_list_core::{parse_money, parse_priority, GroupInsert, Item, ItemDraft, ItemPatch};
use std::sync::Arc;
use store::{FileStore, RoomStore};
use sync::{RoomSubscription, Snapshot};

/// 配信ポートからメインループへ渡す通知
enum Push {
    Items(Snapshot<Vec<Item>>),
    Groups(Snapshot<Option<Vec<String>>>),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    let config = Config::load()?;

    let room = config.resolve_room(cli.room.as_deref());
    let open_store = || -> Result<Arc<FileStore>> {
        Ok(Arc::new(FileStore::open(&config.resolve_data_dir()?, &room)?))
    };

    match cli.command {
        Commands::Add { text, priority, group, value, link } => {
            let mut session = Session::open(open_store()?);
            let draft = ItemDraft { text, priority, group, value, link };
            match session.add_item(draft) {
                Some(id) => println!("✔ 追加しました: {}", id),
                None => println!("テキストが空のため追加しませんでした"),
            }
            report(&mut session);
        }

        Commands::List { filter, json } => {
            let mut session = Session::open(open_store()?);
            session.set_filter(filter.into());
            let projection = session.projection();

            if json {
                println!("{}", render::render_json(&projection)?);
            } else {
                print!("{}", render::render_projection(&projection));
            }
            report(&mut session);
        }

        Commands::Set { id, text, prio, group, value, link } => {
            let mut session = Session::open(open_store()?);
            let patch = ItemPatch {
                text,
                priority: prio.as_deref().map(parse_priority),
                group,
                value: value.as_deref().map(parse_money),
                done: None,
                link: link.map(Some),
            };
            if patch.is_empty() {
                println!("変更する項目がありません");
                return Ok(());
            }
            if !session.update_item(&id, patch) {
                return Err(ListError::ItemNotFound(id));
            }
            println!("✔ 更新しました: {}", id);
            report(&mut session);
        }

        Commands::Done { id, undo } => {
            let mut session = Session::open(open_store()?);
            if !session.set_done(&id, !undo) {
                return Err(ListError::ItemNotFound(id));
            }
            println!("✔ {}: {}", if undo { "未完了に戻しました" } else { "完了にしました" }, id);
            report(&mut session);
        }

        Commands::ClearDone { yes } => {
            let mut session = Session::open(open_store()?);
            let prompter: Box<dyn Prompter> = if yes {
                Box::new(AutoConfirm)
            } else {
                Box::new(TerminalPrompter)
            };
            let removed = session.clear_done(prompter.as_ref())?;
            println!("✔ {}件を削除しました", removed);
            report(&mut session);
        }

        Commands::Delete { ids } => {
            let mut session = Session::open(open_store()?);
            let removed = if ids.is_empty() {
                session.delete_prompted(&TerminalPrompter)?
            } else {
                let ids: Vec<String> = ids.iter().flat_map(|s| parse_id_list(s)).collect();
                session.delete_ids(&ids)
            };
            println!("✔ {}件を削除しました", removed);
            report(&mut session);
        }

        Commands::Group { command } => {
            let mut session = Session::open(open_store()?);
            match command {
                GroupCommands::Add { name } => {
                    let name = match name {
                        Some(name) => Some(name),
                        None => TerminalPrompter.input("新しいグループ名")?,
                    };
                    if let Some(name) = name {
                        if let GroupInsert::Empty = session.add_group(&name) {
                            println!("グループ名が空です");
                        }
                    }
                }
                GroupCommands::List => {
                    print!("{}", render::render_groups(session.catalog()));
                }
            }
            report(&mut session);
        }

        Commands::Watch { filter } => {
            watch(open_store()?, filter.into(), &config).await?;
        }

        Commands::Config { room: new_room, data_dir, poll_interval_ms, show } => {
            configure(config.clone(), cli.room.as_deref(), new_room, data_dir, poll_interval_ms, show)?;
        }
    }

    Ok(())
}

/// 設定の表示・編集
fn configure(
    mut config: Config,
    cli_room: Option<&str>,
    room: Option<String>,
    data_dir: Option<std::path::PathBuf>,
    poll_interval_ms: Option<u64>,
    show: bool,
) -> Result<()> {
    let changed = room.is_some() || data_dir.is_some() || poll_interval_ms.is_some();

    if let Some(room) = room {
        store::validate_room(room.trim())?;
        config.room = room.trim().to_string();
    }
    if let Some(dir) = data_dir {
        config.data_dir = Some(dir);
    }
    if let Some(ms) = poll_interval_ms {
        config.poll_interval_ms = ms;
    }
    if changed {
        config.save()?;
        println!("✔ 設定を保存しました");
    }

    if show || !changed {
        println!("設定:");
        println!("  ルーム: {}", config.resolve_room(cli_room));
        println!("  データ: {}", config.resolve_data_dir()?.display());
        println!("  監視間隔: {}ms", config.poll_interval().as_millis());
    }
    Ok(())
}

/// ステータス・購読エラーを表示
fn report<S: RoomStore>(session: &mut Session<S>) {
    if let Some(error) = session.subscription_error() {
        eprintln!("⚠ 同期エラー: {}", error);
    }
    match session.take_status() {
        Some(status @ Status::WriteFailed(_)) => eprintln!("⚠ {}", status),
        Some(status) => println!("{}", status),
        None => {}
    }
}

/// 変更を監視し、配信のたびに再描画する
async fn watch(
    store: Arc<FileStore>,
    filter: shared_list_core::FilterConfig,
    config: &Config,
) -> Result<()> {
    let mut session = Session::open(Arc::clone(&store));
    session.set_filter(filter);

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<Push>();
    let mut subscription = RoomSubscription::new(Arc::clone(&store));
    let items_tx = tx.clone();
    subscription.items.register(move |snapshot| {
        let _ = items_tx.send(Push::Items(snapshot));
    });
    subscription.groups.register(move |snapshot| {
        let _ = tx.send(Push::Groups(snapshot));
    });

    println!("👀 {} を監視中（Ctrl+C で終了）\n", store.room());

    let mut ticker = tokio::time::interval(config.poll_interval());
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if !subscription.poll() {
                    continue;
                }
                while let Ok(push) = rx.try_recv() {
                    match push {
                        Push::Items(snapshot) => session.on_items(snapshot),
                        Push::Groups(snapshot) => session.on_groups(snapshot),
                    }
                }
                println!("── {} {} ──", store.room(), chrono::Local::now().format("%H:%M:%S"));
                if session.subscription_error().is_none() {
                    print!("{}", render::render_projection(&session.projection()));
                }
                report(&mut session);
                println!();
            }
            _ = &mut ctrl_c => {
                println!("\n✅ 監視を終了しました");
                break;
            }
        }
    }

    Ok(())
}
