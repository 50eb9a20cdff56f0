use anyhow::Context;
use clap::{Arg, ArgMatches, Command};
use download_callback::core::callback::FileDownloadCallback;
use download_callback::core::dispatcher::Dispatcher;
use download_callback::core::store::{DownloadsRepository, SqliteStore};
use download_callback::i18n::{get_messages, Locale};
use download_callback::plugins::log_sinks::{LogNotifier, LogPixel};
use download_callback::plugins::replay::parse_script;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn build_cli() -> Command {
    let replay = Command::new("replay")
        .about("Feed a script of engine signals to the download callback")
        .arg(
            Arg::new("script")
                .help("Signal script, one signal per line")
                .required(true)
                .num_args(1),
        );

    Command::new("download-callback")
        .about("Download lifecycle callback: records, telemetry and UI messages")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("db")
                .long("db")
                .help("SQLite database holding download records")
                .default_value("./downloads/.downloads.sqlite")
                .global(true)
                .num_args(1),
        )
        .arg(
            Arg::new("locale")
                .long("locale")
                .help("Language of rendered messages (en, zh)")
                .default_value("en")
                .global(true)
                .num_args(1),
        )
        .arg(
            Arg::new("log_level")
                .long("log-level")
                .help("Log filter used when RUST_LOG is unset")
                .default_value("info")
                .global(true)
                .num_args(1),
        )
        .subcommand(replay)
        .subcommand(Command::new("list").about("List stored download records"))
        .subcommand(Command::new("clear").about("Delete all stored download records"))
}

fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn string_arg(m: &ArgMatches, id: &str) -> anyhow::Result<String> {
    m.get_one::<String>(id)
        .cloned()
        .with_context(|| format!("missing argument {}", id))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = build_cli().get_matches();

    init_tracing(&string_arg(&matches, "log_level")?);
    let db_path: PathBuf = string_arg(&matches, "db")?.into();
    let messages = get_messages(Locale::parse(&string_arg(&matches, "locale")?));

    let store = Arc::new(SqliteStore::open(&db_path).await?);

    match matches.subcommand() {
        Some(("replay", m)) => {
            let script_path = string_arg(m, "script")?;
            let script = tokio::fs::read_to_string(&script_path)
                .await
                .with_context(|| format!("read script {}", script_path))?;
            let signals = parse_script(&script)?;
            info!(signals = signals.len(), script = %script_path, "replaying engine signals");

            let callback = FileDownloadCallback::new(
                Arc::new(LogNotifier::new()),
                store.clone(),
                Arc::new(LogPixel::new()),
                Dispatcher::current(),
            );

            for signal in signals {
                signal.deliver(&callback);
                // one signal at a time, so every command is read before the next one can evict it
                callback.dispatcher().drain().await;
                while let Some(cmd) = callback.try_next_command() {
                    println!("{}", messages.render(&cmd));
                }
            }

            callback.dispatcher().shutdown().await;
        }
        Some(("list", _)) => {
            let items = store.get_downloads().await?;
            if items.is_empty() {
                println!("no downloads");
            }
            for item in items {
                println!(
                    "- id={} status={:?} name={} path={} length={} mime={}",
                    item.download_id,
                    item.download_status,
                    item.file_name,
                    item.file_path,
                    item.content_length,
                    item.mime_type.as_deref().unwrap_or("-"),
                );
            }
        }
        Some(("clear", _)) => {
            let removed = store.delete_all().await?;
            println!("removed {} download record(s)", removed);
        }
        _ => {}
    }

    Ok(())
}
