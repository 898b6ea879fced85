//! Live poll server
//!
//! Run with: livepoll [BIND_ADDR]
//!
//! Without an address the server binds to 0.0.0.0 on `PORT` (default 8000).
//!
//! ## Try it
//!
//!   websocat ws://localhost:8000/ws
//!   curl -X POST localhost:8000/api/polls \
//!        -H 'content-type: application/json' \
//!        -d '{"question":"Best fruit?","options":["Apple","Banana"]}'

use livepoll::{PollServer, ServerConfig};

fn print_usage() {
    eprintln!("Usage: livepoll [BIND_ADDR]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  BIND_ADDR    Address to bind to (default: 0.0.0.0:$PORT, PORT defaults to 8000)");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  livepoll                     # binds to 0.0.0.0:8000");
    eprintln!("  livepoll localhost           # binds to 127.0.0.1:$PORT");
    eprintln!("  livepoll 127.0.0.1:8001      # binds to 127.0.0.1:8001");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return Ok(());
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("livepoll=debug".parse()?),
        )
        .init();

    let mut config = ServerConfig::from_env();
    if let Some(arg) = args.get(1) {
        match config.bind_arg(arg) {
            Ok(bound) => config = bound,
            Err(e) => {
                eprintln!("Error: {}", e);
                eprintln!();
                print_usage();
                std::process::exit(1);
            }
        }
    }

    let server = PollServer::new(config);

    server
        .run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for Ctrl+C");
                std::future::pending::<()>().await;
            }
        })
        .await?;

    Ok(())
}
