#[tokio::main]
async fn main() {
    if let Err(e) = glycotrack::run().await {
        tracing::error!("{e}");
        eprintln!("glycotrack: {e}");
        std::process::exit(1);
    }
}
