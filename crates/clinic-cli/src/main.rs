use clap::Parser;

use clinic_cli::cli::Cli;
use clinic_cli::output::print_error;

#[tokio::main]
async fn main() {
    // A missing .env is normal; anything else is worth mentioning.
    if let Err(e) = dotenvy::dotenv()
        && !matches!(
            e,
            dotenvy::Error::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::NotFound
        )
    {
        print_error(&format!("Failed to load .env: {e}"));
    }

    let cli = Cli::parse();
    if let Err(e) = clinic_cli::run(cli).await {
        print_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}
