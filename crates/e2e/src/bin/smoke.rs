//! Login smoke check
//!
//! Leases one pooled account, drives the login flow, and exits 0 when the
//! authenticated landing view is reached. Useful for verifying the driver
//! install and the credentials before running the full suite.
//!
//! Run with: cargo run -p todoflow-e2e --bin smoke

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use todoflow_e2e::{flows, AccountPool, SuiteConfig, SuiteResult};
use todoflow_harness::{Session, SessionConfig};

#[derive(Parser, Debug)]
#[command(name = "todoflow-smoke")]
#[command(about = "Login smoke check against the hosted app")]
struct Args {
    /// Public entry URL
    #[arg(long)]
    entry_url: Option<String>,

    /// Authenticated landing URL to wait for
    #[arg(long)]
    landing_url: Option<String>,

    /// Run with a visible browser window
    #[arg(long)]
    headful: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("info".parse().expect("static directive")),
        )
        .init();

    let args = Args::parse();

    let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
    match rt.block_on(run(args)) {
        Ok(()) => {
            info!("Smoke login succeeded");
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

async fn run(args: Args) -> SuiteResult<()> {
    let mut config = SuiteConfig::from_env();
    if let Some(url) = args.entry_url {
        config.entry_url = url;
    }
    if let Some(url) = args.landing_url {
        config.landing_url = url;
    }

    let pool = AccountPool::from_env()?;
    let account = pool.lease().await;

    let mut session_config = SessionConfig::from_env();
    if args.headful {
        session_config.headless = false;
    }

    let session = Session::launch(session_config).await?;
    let page = session.page();
    let outcome = flows::login(&page, &config, &account).await;
    session.close().await?;
    outcome
}
