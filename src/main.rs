#[tokio::main]
async fn main() {
    courtside_backend::run().await;
}
