use clap::Parser;
use rssfeed_sync::config::{
    DatabaseConfig, ReconcilePolicy, StorageKey, SyncConfig, DEFAULT_PLUGIN_ID,
    DEFAULT_STORAGE_KEY, PASSWORD_ENV,
};
use rssfeed_sync::reconciliation::sync_feed_list;
use rssfeed_sync::store::PostgresStore;
use rssfeed_sync::logging;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

const DEFAULT_FEED_FILE: &str = "feeds.txt";

/// Reconcile a feed list file with the Mattermost RSS feed plugin's subscriptions
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Feed list file, one URL per line, "# " starts a comment
    #[arg(short, long, env = "RSSFEED_FEED_FILE", default_value = DEFAULT_FEED_FILE)]
    feed_file: PathBuf,

    /// Channel the declared feeds are delivered to
    #[arg(short, long, env = "RSSFEED_CHANNEL_ID")]
    channel_id: String,

    #[arg(long, env = "RSSFEED_DB_HOST", default_value = "localhost")]
    db_host: String,

    #[arg(long, env = "RSSFEED_DB_PORT", default_value_t = 5432)]
    db_port: u16,

    #[arg(long, env = "RSSFEED_DB_USER", default_value = "mattermost")]
    db_user: String,

    #[arg(long, env = "RSSFEED_DB_NAME", default_value = "mattermost")]
    db_name: String,

    /// Plugin id of the key-value row holding the subscriptions
    #[arg(long, env = "RSSFEED_PLUGIN_ID", default_value = DEFAULT_PLUGIN_ID)]
    plugin_id: String,

    /// Key of the key-value row holding the subscriptions
    #[arg(long, env = "RSSFEED_KEY", default_value = DEFAULT_STORAGE_KEY)]
    key: String,

    /// "prune" removes feeds missing from the file, "additive" only adds
    #[arg(long, env = "RSSFEED_POLICY", value_enum, default_value_t = ReconcilePolicy::Prune)]
    policy: ReconcilePolicy,

    /// Report changes without writing them
    #[arg(long)]
    dry_run: bool,

    #[arg(long, env = "RSSFEED_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = logging::init(&args.log_level) {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let database = DatabaseConfig::new(
        args.db_host,
        args.db_port,
        args.db_user,
        std::env::var(PASSWORD_ENV).ok(),
        args.db_name,
    )?;
    let key = StorageKey::new(args.plugin_id, args.key);
    let sync = SyncConfig {
        feed_file: args.feed_file,
        channel_id: args.channel_id,
        policy: args.policy,
        dry_run: args.dry_run,
    };

    // Dropped (and disconnected) on any early return below
    let mut store = PostgresStore::connect(&database, key).await?;
    let result = sync_feed_list(&mut store, &sync).await?;
    store.close().await?;

    for line in result.report_lines() {
        println!("{line}");
    }

    info!(
        added = result.added.len(),
        removed = result.removed.len(),
        subscriptions = result.subscriptions.len(),
        "Done"
    );
    Ok(())
}
