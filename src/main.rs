#[tokio::main]
async fn main() {
    clinic_records::init_tracing();

    if let Err(e) = clinic_records::run().await {
        tracing::error!("Startup failed: {e}");
        std::process::exit(1);
    }
}
