#[tokio::main]
async fn main() -> anyhow::Result<()> {
    flashcard_ingest_backend::run().await
}
