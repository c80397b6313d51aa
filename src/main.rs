//! JurisFinance - office management backend for a small legal practice
//!
//! Command-line entry point over the shared library: dashboard report,
//! backup export/import and the assistant chat surface.

use std::fs;

use chrono::{Datelike, Utc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use jurisfinance::assistant::Assistant;
use jurisfinance::format::format_currency;
use jurisfinance::report::dashboard_summary;
use jurisfinance::store::FileStore;
use jurisfinance::{backup, Config, DataStore};

/// Initialize tracing/logging
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jurisfinance=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn usage() -> ! {
    eprintln!("Usage: jurisfinance <command>");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  report              Print the dashboard figures for the current month");
    eprintln!("  export <file>       Write a full backup of the stored state");
    eprintln!("  import <file>       Replace the stored state with a backup");
    eprintln!("  ask <question>      Ask the financial assistant");
    std::process::exit(2);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    init_tracing();

    // Load configuration
    let config = Config::from_env()?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first() else {
        usage();
    };

    let backend = FileStore::open(&config.data_dir)?;
    let mut store = DataStore::load(Box::new(backend));

    match command.as_str() {
        "report" => {
            let today = Utc::now().date_naive();
            let summary = dashboard_summary(store.agreements(), today.year(), today.month());
            let privacy = store.settings().privacy_mode_enabled;

            println!("Resumo de {:02}/{}", today.month(), today.year());
            println!(
                "  Total a receber:    {}",
                format_currency(summary.total_to_receive, privacy)
            );
            println!(
                "  Recebido no mês:    {}",
                format_currency(summary.received_in_month, privacy)
            );
            println!("  Acordos ativos:     {}", summary.active_agreements);
            println!("  Inadimplentes:      {}", summary.delinquent_agreements);
            println!("  Quitados:           {}", summary.settled_agreements);
        }
        "export" => {
            let Some(path) = args.get(1) else { usage() };
            let document = backup::export_state(store.backend())?;
            fs::write(path, document)?;
            tracing::info!(path = %path, "Backup written");
        }
        "import" => {
            let Some(path) = args.get(1) else { usage() };
            let document = fs::read_to_string(path)?;
            let entries = backup::import_state(store.backend_mut(), &document)?;
            println!("Backup importado: {entries} coleções restauradas.");
        }
        "ask" => {
            if args.len() < 2 {
                usage();
            }
            let question = args[1..].join(" ");

            // No text-generation backend is bundled with the CLI; with a
            // key set, a caller embedding the library wires its own
            // TextGenerator.
            if config.assistant_api_key.is_some() {
                tracing::warn!("GEMINI_API_KEY is set but the CLI has no assistant backend");
            }
            let assistant = Assistant::unconfigured();
            let reply = assistant
                .ask(
                    &question,
                    store.debtors(),
                    store.agreements(),
                    Utc::now().date_naive(),
                )
                .await;
            println!("{reply}");
        }
        _ => usage(),
    }

    Ok(())
}
