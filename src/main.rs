#[actix_rt::main]
async fn main() -> std::io::Result<()> {
    carnet::run().await
}
