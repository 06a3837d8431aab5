//! cmdlink CLI Client
//!
//! Sends commands to a cmdlink server and prints the replies.

use std::fs;
use std::process;

use clap::{Parser, Subcommand};
use cmdlink::network::Client;
use cmdlink::{CmdlinkError, Result};
use tracing_subscriber::{fmt, EnvFilter};

/// cmdlink CLI
#[derive(Parser, Debug)]
#[command(name = "cmdlink-cli")]
#[command(about = "Host client for the MC+ command protocol")]
#[command(version)]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:7878")]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Send a raw command line, e.g. `MC+VERSION=FIRMWARE`
    Send {
        /// The command line, without terminator
        line: String,

        /// Blob to send after the prompt
        #[arg(short, long, conflicts_with = "blob_file")]
        blob: Option<String>,

        /// Read the blob from a file
        #[arg(long)]
        blob_file: Option<String>,
    },

    /// Round-trip a token through MC+PING
    Ping {
        #[arg(default_value = "HELLO")]
        token: String,
    },

    /// Print firmware and board identification
    About,

    /// List the commands the device accepts
    List,
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match execute(&args) {
        Ok(data) => {
            if !data.is_empty() {
                println!("{}", data);
            }
            println!("OK");
        }
        Err(CmdlinkError::Device(status)) => {
            println!("ERROR: 0x{:X}", status.code());
            process::exit(2);
        }
        Err(e) => {
            eprintln!("cmdlink-cli: {}", e);
            process::exit(1);
        }
    }
}

fn execute(args: &Args) -> Result<String> {
    let mut client = Client::connect(&args.server)?;
    tracing::debug!("Connected to {}", args.server);

    match &args.command {
        Commands::Send {
            line,
            blob,
            blob_file,
        } => {
            let blob = match (blob, blob_file) {
                (Some(text), _) => Some(text.clone().into_bytes()),
                (None, Some(path)) => Some(fs::read(path)?),
                (None, None) => None,
            };
            match blob {
                Some(blob) => {
                    // The declared length is always the last argument
                    let separator = if line.contains('=') { ',' } else { '=' };
                    let line = format!("{}{}{}", line, separator, blob.len());
                    client.command_with_blob(&line, &blob)
                }
                None => client.command(line),
            }
        }
        Commands::Ping { token } => client.command(&format!("MC+PING={}", token)),
        Commands::About => client.command("MC+ABOUT"),
        Commands::List => client.command("MC+LISTCOMMANDS"),
    }
}
