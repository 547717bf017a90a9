use clap::Parser;

use whisper_worker::cli::Args;
use whisper_worker::logging;

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = logging::init_logger() {
        eprintln!("ERROR: Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    match whisper_worker::run(args).await {
        // The transcript is the only thing ever written to stdout.
        Ok(transcript) => println!("{}", transcript),
        Err(message) => {
            log::error!("{}", message);
            std::process::exit(1);
        }
    }
}
