//! Process entry point: parse configuration, open the external clients
//! once, and serve the gateway until shutdown.

use std::sync::Arc;

use anyhow::{anyhow, Result};
use chrono_tz::Tz;
use clap::Parser;
use plop_gateway::{run_server, AppState};
use plop_line::{LineClient, LineClientConfig, MessagingTransport};
use plop_runtime::Dispatcher;
use plop_store::{
    ContextRegistry, EventLogStore, SheetsClient, SheetsClientConfig, SheetsContextRegistry,
    SheetsEventLog,
};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "plop-bot", about = "LINE webhook bot logging events to a shared sheet", version)]
struct Cli {
    #[arg(long, env = "PLOP_BIND", default_value = "0.0.0.0:8000")]
    bind: String,

    #[arg(
        long,
        env = "PLOP_TIMEZONE",
        default_value = "Asia/Taipei",
        help = "IANA timezone used for timestamps and window math."
    )]
    timezone: String,

    #[arg(long, env = "LINE_API_BASE", default_value = "https://api.line.me")]
    line_api_base: String,

    #[arg(long, env = "LINE_CHANNEL_ACCESS_TOKEN", hide_env_values = true)]
    line_channel_access_token: String,

    #[arg(long, env = "LINE_CHANNEL_SECRET", hide_env_values = true)]
    line_channel_secret: String,

    #[arg(
        long,
        env = "SHEETS_API_BASE",
        default_value = "https://sheets.googleapis.com"
    )]
    sheets_api_base: String,

    #[arg(
        long,
        env = "SHEETS_ACCESS_TOKEN",
        hide_env_values = true,
        help = "Ready bearer token for the Sheets API; token minting stays outside this process."
    )]
    sheets_access_token: String,

    #[arg(long, env = "PLOP_SPREADSHEET_ID")]
    spreadsheet_id: String,

    #[arg(long, env = "PLOP_RECORDS_SHEET", default_value = "紀錄")]
    records_sheet: String,

    #[arg(long, env = "PLOP_REGISTRY_SHEET", default_value = "推播名單")]
    registry_sheet: String,

    #[arg(
        long,
        env = "PLOP_ENABLE_DRAW",
        help = "Turns the 屎王 trigger into the weighted rarity draw."
    )]
    enable_draw: bool,
}

fn init_tracing() {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let timezone = cli
        .timezone
        .parse::<Tz>()
        .map_err(|error| anyhow!("invalid --timezone '{}': {error}", cli.timezone))?;

    let sheets = Arc::new(SheetsClient::new(SheetsClientConfig {
        api_base: cli.sheets_api_base,
        spreadsheet_id: cli.spreadsheet_id,
        access_token: cli.sheets_access_token,
        records_sheet: cli.records_sheet,
        registry_sheet: cli.registry_sheet,
    })?);
    let log: Arc<dyn EventLogStore> = Arc::new(SheetsEventLog::new(Arc::clone(&sheets)));
    let registry: Arc<dyn ContextRegistry> =
        Arc::new(SheetsContextRegistry::new(Arc::clone(&sheets)));

    let transport: Arc<dyn MessagingTransport> = Arc::new(LineClient::new(LineClientConfig {
        api_base: cli.line_api_base,
        channel_access_token: cli.line_channel_access_token,
    })?);

    let dispatcher = Dispatcher::new(
        Arc::clone(&log),
        Arc::clone(&registry),
        Arc::clone(&transport),
        timezone,
        cli.enable_draw,
    );

    let state = Arc::new(AppState {
        dispatcher,
        registry,
        transport,
        channel_secret: cli.line_channel_secret,
    });

    run_server(&cli.bind, state).await
}
