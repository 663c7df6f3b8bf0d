#[tokio::main]
async fn main() {
    let code = stratus_cli::run().await;
    std::process::exit(code);
}
