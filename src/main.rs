// src/main.rs

use streammon::{cli, error_message, logging, run};

#[tokio::main]
async fn main() {
    if std::env::args_os().len() <= 1 {
        eprintln!("{}", cli::usage());
        std::process::exit(1);
    }

    if let Err(err) = run_main().await {
        eprintln!("{}", error_message(&err));
        std::process::exit(1);
    }

    // A stdin read can still be parked on a blocking thread after Ctrl-C;
    // don't wait for the runtime to reclaim it.
    std::process::exit(0);
}

async fn run_main() -> anyhow::Result<()> {
    let args = cli::parse();
    logging::init_logging(args.log_level)?;
    run(args).await
}
