use colored::Colorize;
use s3stream::cli::{dispatch, start};
use std::process;

#[tokio::main]
async fn main() {
    let (s3, action) = match start() {
        Ok(started) => started,
        Err(e) => {
            eprintln!("{}", format!("{e:#}").red());
            process::exit(1);
        }
    };

    if let Err(e) = dispatch(&s3, action).await {
        eprintln!("{}", format!("Error: {e:#}").red());
        process::exit(1);
    }
}
