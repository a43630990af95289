//! QRPaste API server entrypoint.

use chrono::Utc;
use qrpaste_core::DEFAULT_PORT;
use qrpaste_server::{
    config::env_flag_enabled, resolve_bind_address, serve_router, sweep, AppState, Config,
    Database,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct CliFlags {
    help: bool,
    cleanup: bool,
    reclaim: bool,
}

fn parse_cli_flags(args: &[String]) -> anyhow::Result<CliFlags> {
    let mut flags = CliFlags::default();
    for arg in args.iter().skip(1) {
        match arg.as_str() {
            "--help" => flags.help = true,
            "--cleanup" => flags.cleanup = true,
            "--reclaim" => flags.reclaim = true,
            value if value.starts_with('-') => {
                anyhow::bail!(
                    "Unknown option: '{}'. Use --help to see supported options.",
                    value
                );
            }
            value => {
                anyhow::bail!(
                    "Unexpected positional argument: '{}'. Use --help to see supported options.",
                    value
                );
            }
        }
    }
    if flags.reclaim && !flags.cleanup {
        anyhow::bail!("--reclaim only applies together with --cleanup");
    }
    Ok(flags)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "qrpaste=info,tower_http=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = std::env::args().collect();
    let cli_flags = parse_cli_flags(&args)?;

    if cli_flags.help {
        print_help();
        return Ok(());
    }

    let config = Config::from_env();

    if cli_flags.cleanup {
        return run_cleanup_pass(&config, cli_flags.reclaim);
    }

    if config.secret_is_default() {
        tracing::warn!("QRPASTE_SECRET is not set - fingerprints use the development fallback");
    }
    if config.cleanup_token.is_none() {
        tracing::warn!("CLEANUP_TOKEN is not set - the cleanup endpoint stays closed");
    }

    let database = Database::new(&config.db_path)?;
    let state = AppState::new(config.clone(), database);

    let allow_public = env_flag_enabled("ALLOW_PUBLIC_ACCESS");
    if allow_public {
        tracing::warn!("Public access enabled - server will accept requests from any origin");
    }

    let bind_addr = resolve_bind_address(&config, allow_public);
    if !bind_addr.ip().is_loopback() {
        tracing::warn!(
            "Binding to non-localhost address: {} - ensure proper security measures are in place",
            bind_addr
        );
    }

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    let actual_addr = listener.local_addr().unwrap_or(bind_addr);
    tracing::info!("QRPaste running at http://{}", actual_addr);

    let db = state.db.clone();
    let serve_result = serve_router(listener, state, allow_public, shutdown_signal()).await;

    if let Err(err) = db.flush() {
        tracing::error!("Failed to flush database: {}", err);
    } else {
        tracing::info!("Database flushed successfully");
    }

    serve_result?;

    Ok(())
}

/// Run one cleanup pass from the command line and print the report.
///
/// Intended for cron jobs on hosts that prefer a process over an HTTP
/// call; equivalent to the authenticated cleanup endpoint.
fn run_cleanup_pass(config: &Config, reclaim: bool) -> anyhow::Result<()> {
    let database = Database::new(&config.db_path)?;
    let report = sweep::run(&database, Utc::now(), reclaim)?;

    println!("=== QRPaste Cleanup Report ===");
    println!("Deleted pastes: {}", report.deleted_count);
    println!("Active pastes: {}", report.active_count);
    println!("Database size: {} bytes", report.db_size_bytes);
    println!("Reclaimed: {}", if report.reclaimed { "yes" } else { "no" });
    println!("Execution time: {} ms", report.elapsed_ms);
    if !report.stats.is_empty() {
        println!("Breakdown by type:");
        for entry in &report.stats {
            println!(
                "  - {}: {} pastes, {} bytes",
                entry.content_type, entry.count, entry.total_size_bytes
            );
        }
    }

    database.flush()?;
    Ok(())
}

fn print_help() {
    println!("QRPaste Server\n");
    println!("Usage: qrpaste [OPTIONS]\n");
    println!("Options:");
    println!("  --cleanup         Delete expired pastes and print a report");
    println!("  --reclaim         With --cleanup, also flush storage");
    println!("  --help            Show this help message");
    println!("\nEnvironment variables:");
    println!("  DB_PATH           Database path (default: ~/.cache/qrpaste/db)");
    println!("  PORT              Server port (default: {})", DEFAULT_PORT);
    println!("  PUBLIC_BASE_URL   Base URL used in shareable links");
    println!("  MAX_TEXT_SIZE     Text size ceiling in bytes (default: 5MB)");
    println!("  MAX_CODE_SIZE     Code size ceiling in bytes (default: 2MB)");
    println!("  MAX_IMAGE_SIZE    Image size ceiling in bytes (default: 10MB)");
    println!("  RATE_LIMIT_PER_MINUTE / PER_HOUR / PER_DAY  Submission caps");
    println!("  QRPASTE_SECRET    Salt for submitter fingerprints");
    println!("  CLEANUP_TOKEN     Token required by POST /api/cleanup");
    println!("  ALLOW_PUBLIC_ACCESS  Allow CORS from any origin");
    println!(
        "  BIND              Override bind address (e.g. 0.0.0.0:{})",
        DEFAULT_PORT
    );
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_cli_flags, CliFlags};

    #[test]
    fn parse_cli_flags_accepts_supported_options() {
        let args = vec![
            "qrpaste".to_string(),
            "--cleanup".to_string(),
            "--reclaim".to_string(),
        ];
        let flags = parse_cli_flags(&args).expect("known options should parse");
        assert_eq!(
            flags,
            CliFlags {
                help: false,
                cleanup: true,
                reclaim: true,
            }
        );
    }

    #[test]
    fn parse_cli_flags_rejects_unknown_and_positional_arguments() {
        let cases = [
            (
                vec!["qrpaste".to_string(), "--clean-up".to_string()],
                "Unknown option",
            ),
            (
                vec!["qrpaste".to_string(), "cleanup".to_string()],
                "Unexpected positional argument",
            ),
        ];

        for (args, expected_fragment) in cases {
            let err = parse_cli_flags(&args).expect_err("invalid args should be rejected");
            assert!(err.to_string().contains(expected_fragment));
        }
    }

    #[test]
    fn reclaim_requires_cleanup() {
        let args = vec!["qrpaste".to_string(), "--reclaim".to_string()];
        let err = parse_cli_flags(&args).expect_err("reclaim alone is invalid");
        assert!(err.to_string().contains("--cleanup"));
    }
}
