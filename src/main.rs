use std::num::NonZeroU32;

use anyhow::{Error, Result, anyhow};
use docstore_client::{
    clients::{entities::EntityClient, templates::TemplateClient},
    config::Config,
    utils::count_entities_by_template_name,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = Config::load()?;
    let template_client = TemplateClient::new(&config)?;

    match std::env::args().nth(1) {
        Some(template_name) => {
            let entity_client = EntityClient::new(&config)?;
            let batch_size = NonZeroU32::new(config.default_batch_size)
                .ok_or_else(|| anyhow!("DEFAULT_BATCH_SIZE must be positive"))?;

            let count = count_entities_by_template_name(
                &template_client,
                &entity_client,
                &template_name,
                batch_size,
            )
            .await?;

            println!("{template_name}: {count} entities");
        }
        None => {
            let listing = template_client.list(Some(&["id", "name"])).await?;
            println!("{listing}");
        }
    }

    Ok(())
}
