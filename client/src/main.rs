use clap::Parser;
use client::input::InputEvent;
use client::session::Session;
use client::sink::LogSink;
use log::info;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server address to connect to
    #[arg(short = 's', long, default_value = "127.0.0.1:9000")]
    server: String,

    /// Viewport width in world units
    #[arg(short = 'w', long, default_value = "800")]
    width: i32,

    /// Viewport height (no short flag to avoid conflict with --help)
    #[arg(long, default_value = "600")]
    height: i32,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    if std::env::var("RUST_LOG").is_err() {
        eprintln!("Set RUST_LOG=info for detailed logging");
    }

    let args = Args::parse();

    info!("Starting client...");
    info!("Connecting to: {}", args.server);
    info!("Controls: WASD to move, Space/M to mine, F to shoot");

    let (mut session, input_tx) = Session::new(&args.server, (args.width, args.height), LogSink);

    // Feed keystrokes from stdin into the session's input channel.
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            for key in line.chars() {
                if let Some(event) = InputEvent::from_key(key) {
                    if input_tx.send(event).is_err() {
                        return;
                    }
                }
            }
        }
    });

    session.run().await
}
