use std::process::ExitCode;

use agence_core::money::parse_money;
use agence_core::sync::SyncSummary;
use agence_core::types::DbId;
use agence_core::workflow::WorkflowKind;
use agence_worker::commands::seo_sync::{self, SeoSyncOptions};
use agence_worker::commands::{invoice, transition, update_status};
use agence_worker::config::{LogFormat, WorkerConfig};
use agence_worker::scheduler;
use agence_worker::sync::KeywordSyncOptions;
use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "agence-worker")]
#[command(about = "Agency back office console commands")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sync SEO keyword positions and Google reviews
    SeoSync {
        /// Only sync Search Console keywords
        #[arg(long, conflicts_with = "reviews_only")]
        keywords_only: bool,
        /// Only sync Google reviews
        #[arg(long)]
        reviews_only: bool,
        /// Sync even if the cached data is still fresh
        #[arg(long)]
        force: bool,
        /// Do not import new keywords from Search Console queries
        #[arg(long)]
        no_import: bool,
        /// Do not purge old positions nor deactivate stale keywords
        #[arg(long)]
        no_cleanup: bool,
    },
    /// Expire lapsed quotes and flag overdue invoices
    UpdateStatus,
    /// Apply a workflow action, e.g. `transition devis 12 envoyer`
    Transition {
        /// devis, facture or prospect
        kind: WorkflowKind,
        id: DbId,
        action: String,
    },
    /// Issue a deposit or balance invoice from an accepted quote
    Invoice {
        devis_id: DbId,
        #[command(subcommand)]
        kind: InvoiceKind,
    },
    /// Run update-status and seo-sync periodically until Ctrl-C
    Run,
}

#[derive(Subcommand)]
enum InvoiceKind {
    /// Deposit invoice for a share of the quote
    Deposit {
        /// Percentage of the quote HT, e.g. 30 or 12,5
        #[arg(long, value_parser = parse_money)]
        percent: Decimal,
    },
    /// Balance invoice for what remains after deposits
    Balance,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();

    let config = WorkerConfig::from_env()?;
    init_tracing(config.log_format);

    let pool = agence_db::create_pool(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    agence_db::health_check(&pool)
        .await
        .context("Database health check failed")?;
    agence_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::debug!("Database ready");

    let success = match cli.command {
        Command::SeoSync {
            keywords_only,
            reviews_only,
            force,
            no_import,
            no_cleanup,
        } => {
            let options = SeoSyncOptions {
                keywords: !reviews_only,
                reviews: !keywords_only,
                keyword: KeywordSyncOptions {
                    force,
                    import: !no_import,
                    cleanup: !no_cleanup,
                },
            };
            let report = seo_sync::run(&pool, &config, options, Utc::now()).await?;
            if let Some(summary) = &report.keywords {
                print_summary("Keywords", summary);
            }
            if let Some(summary) = &report.reviews {
                print_summary("Reviews", summary);
            }
            report.is_success()
        }
        Command::UpdateStatus => {
            let report = update_status::run(&pool, Utc::now().date_naive()).await?;
            println!(
                "{} quote(s) expired, {} invoice(s) overdue, {} error(s)",
                report.expired_devis, report.overdue_factures, report.errors
            );
            report.is_success()
        }
        Command::Transition { kind, id, action } => {
            let outcome = transition::run(&pool, kind, id, &action).await?;
            println!("{}", outcome.message);
            if let Some(client_id) = outcome.client_id {
                println!("Client #{client_id}");
            }
            true
        }
        Command::Invoice { devis_id, kind } => {
            let today = Utc::now().date_naive();
            let facture = match kind {
                InvoiceKind::Deposit { percent } => {
                    invoice::create_deposit(&pool, devis_id, percent, today).await?
                }
                InvoiceKind::Balance => invoice::create_balance(&pool, devis_id, today).await?,
            };
            println!(
                "{} created: {} € TTC",
                facture.reference,
                agence_core::money::format_money(facture.total_ttc)
            );
            true
        }
        Command::Run => {
            let cancel = CancellationToken::new();
            let task = tokio::spawn(scheduler::run(pool.clone(), config.clone(), cancel.clone()));

            tokio::signal::ctrl_c()
                .await
                .context("Failed to listen for Ctrl-C")?;
            tracing::info!("Shutdown requested");
            cancel.cancel();
            task.await.context("Scheduler task panicked")?;
            true
        }
    };

    pool.close().await;
    Ok(if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn init_tracing(format: LogFormat) {
    let json = format == LogFormat::Json;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "agence_worker=info,agence_db=info".into()),
        )
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(tracing_subscriber::fmt::layer))
        .init();
}

fn print_summary(label: &str, summary: &SyncSummary) {
    if summary.skipped {
        println!("{label}: skipped ({})", summary.message);
    } else {
        println!("{label}: {}", summary.describe());
    }
}
