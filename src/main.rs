// src/main.rs

use taskweave::engine::RunOutcome;
use taskweave::{cli, logging, run};

const EXIT_FAILURE: i32 = 2;

#[tokio::main]
async fn main() {
    match run_main().await {
        Ok(outcome) => std::process::exit(outcome.exit_code()),
        Err(err) => {
            eprintln!("taskweave error: {err:?}");
            std::process::exit(EXIT_FAILURE);
        }
    }
}

async fn run_main() -> anyhow::Result<RunOutcome> {
    let args = cli::parse();
    logging::init_logging(args.log_level)?;
    Ok(run(args).await?)
}
