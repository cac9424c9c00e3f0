//! Aqualan HTTP server binary.

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    aqualan_server::start_server().await
}
