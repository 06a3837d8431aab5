//! cmdlink Server Binary
//!
//! Runs the simulated provisioning device over TCP, or over stdin/stdout
//! with `--stdio`.

use std::io;

use clap::Parser;
use cmdlink::network::Server;
use cmdlink::{default_table, Config, Interpreter, SimulatedDevice};
use tracing_subscriber::{fmt, EnvFilter};

/// cmdlink Server
#[derive(Parser, Debug)]
#[command(name = "cmdlink-server")]
#[command(about = "Simulated provisioning device speaking the MC+ command protocol")]
#[command(version)]
struct Args {
    /// Directory holding the simulated flash and crypto element images
    #[arg(short, long, default_value = "./cmdlink_data")]
    data_dir: String,

    /// Listen address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:7878")]
    listen: String,

    /// Serve a single session on stdin/stdout instead of TCP
    #[arg(long)]
    stdio: bool,

    /// Close idle TCP sessions after this many milliseconds (0 = never)
    #[arg(long, default_value = "0")]
    read_timeout_ms: u64,
}

fn main() {
    // Logs go to stderr; stdout may carry the protocol
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,cmdlink=debug"));

    fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("cmdlink Server v{}", cmdlink::VERSION);
    tracing::info!("Data directory: {}", args.data_dir);

    let config = Config::builder()
        .data_dir(&args.data_dir)
        .listen_addr(&args.listen)
        .read_timeout_ms(args.read_timeout_ms)
        .build();

    if let Err(e) = config.validate() {
        tracing::error!("Invalid configuration: {}", e);
        std::process::exit(1);
    }

    let mut device = match SimulatedDevice::open(&config) {
        Ok(device) => device,
        Err(e) => {
            tracing::error!("Failed to open device images: {}", e);
            std::process::exit(1);
        }
    };

    let outcome = if args.stdio {
        tracing::info!("Serving on stdio");
        let stdout = io::stdout().lock();
        Interpreter::new(&config, default_table(), &mut device, stdout).and_then(
            |mut interpreter| {
                interpreter.start()?;
                interpreter.run(io::stdin().lock())
            },
        )
    } else {
        tracing::info!("Listen address: {}", args.listen);
        Server::new(config).run(&mut device)
    };

    if let Err(e) = outcome {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Server stopped");
}
