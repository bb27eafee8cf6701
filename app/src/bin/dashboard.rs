use anyhow::Context;
use aquapoll::config::CONFIG;
use aquapoll::dashboard::{self, Connection, DashboardClient, DashboardPoller};
use aquapoll::logging;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

/// Terminal dashboard of one refilling station.
/// Type `start` and enter to queue a test run.
#[derive(Parser, Debug)]
#[command(name = "dashboard", version)]
struct Args {
    /// Base URL of the aquapoll server
    #[arg(long, default_value = "http://127.0.0.1:8080")]
    base_url: String,

    /// Station to monitor
    #[arg(long)]
    station_id: Option<i32>,

    /// Poll period in milliseconds, overrides DASHBOARD_POLL_MS
    #[arg(long)]
    poll_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_logging();
    let args = Args::parse();

    let period = dashboard::poll_period(args.poll_ms, || CONFIG.dashboard_poll_ms());
    let client = DashboardClient::new(&args.base_url).context("Failed building HTTP client")?;
    let handle = DashboardPoller::new(client, args.station_id, period).spawn();

    let mut view = handle.view.clone();
    tokio::spawn(async move {
        while view.changed().await.is_ok() {
            let current = view.borrow_and_update().clone();
            let online = current.connection == Connection::Online;
            info!(online = online, "{} | {}", current.timestamp_label, current.status_message);
            for gauge in &current.gauges {
                info!(
                    "  {:<10} {:>8} {:<8} needle {:>7.1}",
                    gauge.kind.name(),
                    gauge.lcd,
                    gauge.status,
                    gauge.rotation
                );
            }
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) if line.trim().eq_ignore_ascii_case("start") => {
                    info!("{}", handle.start_test().await);
                }
                Some(_) => info!("Unknown input, type `start` to queue a test run"),
                None => break,
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }
    Ok(())
}
