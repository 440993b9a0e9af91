//! Health Check developer harness.
//!
//! Runs the app's page flow outside Zendesk: a fixture file stands in for the
//! ZAF host, backend requests go out over HTTP, and the local cache lives in
//! a directory instead of `localStorage`.
//!
//! Usage:
//!   healthcheck-cli --fixture host.json --page-url 'https://app.local/app/' check

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use healthcheck_app::controllers::{
    ChatWidgetController, CheckController, Frequency, MonitoringController, MonitoringForm,
    ReportController,
};
use healthcheck_app::filters::FilterStore;
use healthcheck_app::{
    bootstrap, AppConfig, Backend, Environment, FrameBand, MemoryView, PageStart, ResultsView,
};
use healthcheck_cache::{BlobCache, FileStore, SystemClock};
use healthcheck_host::{HostFixture, ProxyClient, StaticHostFactory};
use healthcheck_session::{BackendReplicator, Session, SessionManager, UrlParamReconciler};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;
use url::Url;

/// How long to wait for session replication before exiting.
const REPLICATION_GRACE: Duration = Duration::from_secs(10);

#[derive(Parser, Debug)]
#[command(name = "healthcheck-cli")]
#[command(about = "Run Health Check page flows against a fixture host")]
struct Args {
    /// Host fixture (context, metadata and current user as JSON)
    #[arg(short, long)]
    fixture: PathBuf,

    /// URL of the page being loaded
    #[arg(short, long)]
    page_url: Url,

    /// Backend environment (overrides HEALTHCHECK_ENVIRONMENT)
    #[arg(short, long)]
    environment: Option<Environment>,

    /// Backend base URL (overrides the environment's URL)
    #[arg(long)]
    backend_url: Option<String>,

    /// Local cache directory
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Bootstrap the page and print the reconciled parameters
    Reconcile,
    /// Run a health check
    Check,
    /// Show a stored report
    Report {
        #[arg(long)]
        id: u64,
    },
    /// Query a report's unlock status
    UnlockStatus {
        #[arg(long)]
        report_id: u64,
    },
    /// Save monitoring settings
    Monitoring {
        #[arg(long)]
        active: bool,
        #[arg(long, default_value = "weekly")]
        frequency: Frequency,
        #[arg(long = "email")]
        emails: Vec<String>,
    },
    /// Load the support chat widget
    ChatWidget,
    /// Save issue filter selections and print the active filter
    Filters {
        #[arg(long)]
        severity: Option<String>,
        #[arg(long)]
        category: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .compact()
        .init();

    let mut config = AppConfig::from_env()?;
    if let Some(environment) = args.environment {
        config.environment = environment;
    }
    if let Some(url) = &args.backend_url {
        config.backend_base_url = Some(url.clone());
    }
    info!("Backend: {}", config.base_url());

    let fixture = HostFixture::load(&args.fixture)
        .with_context(|| format!("failed to load fixture {}", args.fixture.display()))?;
    let factory = Arc::new(StaticHostFactory::new(fixture, ProxyClient::new()?));

    let cache_dir = match &args.cache_dir {
        Some(dir) => dir.clone(),
        None => dirs::cache_dir()
            .context("no cache directory on this platform; pass --cache-dir")?
            .join("healthcheck"),
    };
    let store = Arc::new(FileStore::open(&cache_dir)?);
    let filters = FilterStore::new(store.clone());
    let cache = BlobCache::new(store, Arc::new(SystemClock));

    let replicator = BackendReplicator::new(config.endpoint(&config.session.replicate_path));
    let manager = SessionManager::new(factory, cache.clone(), config.session.clone())
        .with_replicator(Arc::new(replicator));
    let reconciler = UrlParamReconciler::new(cache, config.session.params_ttl());

    let view = Arc::new(MemoryView::new());
    let frame = FrameBand::from_config(&config);

    let started = bootstrap(&manager, &reconciler, &args.page_url, view.as_ref(), &frame).await;
    let result = match started {
        Ok(PageStart::Ready(session)) => {
            run(
                args.command,
                session,
                &config,
                &args.page_url,
                &reconciler,
                &filters,
                view.clone(),
            )
            .await
        }
        Ok(PageStart::Navigate(target)) => {
            println!("navigate: {target}");
            Ok(())
        }
        Err(e) => Err(e.into()),
    };

    let html = view.html();
    if !html.is_empty() {
        println!("{html}");
    }
    if !manager.flush(REPLICATION_GRACE).await {
        warn!("Session replication did not finish before exit");
    }
    result
}

async fn run(
    command: Command,
    session: Session,
    config: &AppConfig,
    page_url: &Url,
    reconciler: &UrlParamReconciler,
    filters: &FilterStore,
    view: Arc<MemoryView>,
) -> Result<()> {
    match command {
        Command::Reconcile => {
            println!("ready: {page_url}");
            for (param, value) in reconciler.params(page_url).iter() {
                println!("  {param} = {value}");
            }
        }
        Command::Check => {
            CheckController::new(session, config, view)
                .with_filters(filters.clone())
                .run()
                .await
                .context("health check failed")?;
        }
        Command::Report { id } => {
            ReportController::new(session, config, view)
                .with_filters(filters.clone())
                .show(id)
                .await
                .with_context(|| format!("failed to load report {id}"))?;
        }
        Command::UnlockStatus { report_id } => {
            let backend = Backend::from_config(session.client().clone(), config);
            let status = backend.unlock_status(report_id).await?;
            println!("report {report_id} unlocked: {}", status.is_unlocked);
            if let Some(html) = status.html {
                view.set_html(&html);
            }
        }
        Command::Monitoring {
            active,
            frequency,
            emails,
        } => {
            let form = MonitoringForm {
                is_active: active,
                frequency,
                notification_emails: emails,
                ..MonitoringForm::for_session(&session)
            };
            MonitoringController::new(session, config, view)
                .submit(&form, page_url)
                .await
                .context("failed to save monitoring settings")?;
        }
        Command::ChatWidget => {
            let injected = ChatWidgetController::new(&session, config, view)
                .load()
                .await?;
            println!("chat widget {}", if injected { "loaded" } else { "disabled" });
        }
        Command::Filters { severity, category } => {
            if let Some(severity) = &severity {
                filters.save_severity(severity)?;
            }
            if let Some(category) = &category {
                filters.save_category(category)?;
            }
            let active = filters.load();
            println!("severity = {}", active.severity);
            println!("category = {}", active.category);
        }
    }
    Ok(())
}
