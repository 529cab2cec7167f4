//! Binary entrypoint for the `neighborly` CLI.

use std::process::ExitCode;

fn main() -> ExitCode {
    // A missing .env file is fine; the environment alone is enough.
    let _ = dotenvy::dotenv();
    neighborly::init_tracing();

    match neighborly::run(std::env::args()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
