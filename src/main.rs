#[tokio::main]
async fn main() {
    aftercare::run().await;
}
