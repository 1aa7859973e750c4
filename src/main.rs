use referral_bot::{app::Application, config::Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let config = Config::load()?;
    Application::build(config).await
}
