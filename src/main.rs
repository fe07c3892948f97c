#[tokio::main]
async fn main() {
    if let Err(e) = formstate_lib::cli::run_cli().await {
        eprintln!("CLI Error: {:#}", e);
        std::process::exit(1);
    }
}
