//! Kumite matchmaking and combat server.
//!
//! Clients connect to `/ws`, authenticate, pair up in rooms of two, and each
//! pick a combatant. Once both have chosen, the server runs the battle on its
//! own and pushes every hit to the room.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin kumite-server
//! cargo run --bin kumite-server -- --host 0.0.0.0 --port 3000
//! ```

use clap::Parser;
use kumite_server::ui::Server;
use kumite_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "kumite-server")]
#[command(about = "Two-player matchmaking and real-time combat server", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "PORT", default_value = "8000")]
    port: u16,

    /// Default log level when RUST_LOG is not set
    #[arg(long, default_value = "debug")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    let server = Server::in_memory();
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
