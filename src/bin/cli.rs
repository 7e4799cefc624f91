//! hivecache CLI
//!
//! Wire-level inspector for the request frame format: encodes a store
//! request from arguments, shows the routing decision, hex-dumps the frame
//! and decodes it back. Useful for checking frames against a packet capture.

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use hivecache::protocol::{decode_request, encode_request, StoreRequest};
use hivecache::{StoreOperation, VBucketTable};

/// hivecache frame inspector
#[derive(Parser, Debug)]
#[command(name = "hivecache-cli")]
#[command(about = "Inspect hivecache request frames and routing decisions")]
#[command(version)]
struct Args {
    /// Number of vbuckets in the demo table (power of two)
    #[arg(long, default_value = "1024")]
    vbuckets: usize,

    /// Number of servers in the demo table
    #[arg(long, default_value = "4")]
    servers: u16,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Encode a store request and dump the frame
    Encode {
        /// Operation: set, add, replace, append or prepend
        #[arg(long, default_value = "set")]
        op: String,

        /// The key
        key: String,

        /// The value
        value: String,

        /// Application flags
        #[arg(long, default_value = "0")]
        flags: u32,

        /// Expiration (seconds if <= 30 days, else unix timestamp)
        #[arg(long, default_value = "0")]
        expiry: u32,

        /// Compare-and-swap token (0 = unconditional)
        #[arg(long, default_value = "0")]
        cas: u64,

        /// Correlation token to stamp into the frame
        #[arg(long, default_value = "1")]
        opaque: u32,
    },

    /// Show which vbucket and server a key routes to
    Route {
        /// The key
        key: String,
    },
}

fn main() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,hivecache=debug"));

    fmt().with_env_filter(filter).with_target(true).init();

    let args = Args::parse();

    let table = match VBucketTable::uniform(args.servers, args.vbuckets) {
        Ok(t) => t,
        Err(e) => {
            tracing::error!("Invalid demo table: {}", e);
            std::process::exit(1);
        }
    };

    match args.command {
        Commands::Encode {
            op,
            key,
            value,
            flags,
            expiry,
            cas,
            opaque,
        } => {
            let operation = match parse_operation(&op) {
                Some(operation) => operation,
                None => {
                    tracing::error!("Unknown operation '{}'", op);
                    std::process::exit(1);
                }
            };

            let vbucket = table.vbucket_for(key.as_bytes());
            let server = table.server_index_for(vbucket);

            let request = StoreRequest {
                operation,
                key: key.as_bytes(),
                value: value.as_bytes(),
                flags,
                expiry,
                cas,
            };

            let frame = match encode_request(&request, vbucket, opaque) {
                Ok(f) => f,
                Err(e) => {
                    tracing::error!("Encode failed: {}", e);
                    std::process::exit(1);
                }
            };

            println!(
                "{:?} key={:?} -> vbucket {} (server {:?}), {} bytes:",
                operation,
                key,
                vbucket,
                server,
                frame.len()
            );
            print_hex(&frame);

            match decode_request(&frame) {
                Ok(decoded) => println!("decoded: {:#?}", decoded),
                Err(e) => {
                    tracing::error!("Round-trip decode failed: {}", e);
                    std::process::exit(1);
                }
            }
        }

        Commands::Route { key } => {
            let vbucket = table.vbucket_for(key.as_bytes());
            match table.server_index_for(vbucket) {
                Some(server) => {
                    println!("key {:?} -> vbucket {} -> server {}", key, vbucket, server)
                }
                None => println!("key {:?} -> vbucket {} -> unassigned", key, vbucket),
            }
        }
    }
}

/// Map an operation name to its opcode variant
fn parse_operation(name: &str) -> Option<StoreOperation> {
    match name.to_ascii_lowercase().as_str() {
        "set" => Some(StoreOperation::Set),
        "add" => Some(StoreOperation::Add),
        "replace" => Some(StoreOperation::Replace),
        "append" => Some(StoreOperation::Append),
        "prepend" => Some(StoreOperation::Prepend),
        _ => None,
    }
}

/// Hex dump, 16 bytes per row with offsets
fn print_hex(bytes: &[u8]) {
    for (row, chunk) in bytes.chunks(16).enumerate() {
        let hex: Vec<String> = chunk.iter().map(|b| format!("{:02x}", b)).collect();
        println!("  {:04x}  {}", row * 16, hex.join(" "));
    }
}
