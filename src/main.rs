#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = restgate::run().await {
        eprintln!("restgate fatal: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
