use marketing_site::config::get_configuration;
use marketing_site::startup::Application;
use marketing_site::telemetry::{get_subscriber, init_subscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = get_subscriber(
        String::from("marketing_site"),
        String::from("info"),
        std::io::stdout,
    );

    init_subscriber(subscriber);

    let config = get_configuration()?;
    let application = Application::build(config).await?;

    application.run_until_stop().await?;

    Ok(())
}
