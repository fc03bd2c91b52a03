use std::num::NonZeroU32;

use tracing::{debug, info};

use crate::{
    clients::{entities::EntityClient, templates::TemplateClient},
    error::ClientError,
    xml,
};

/// Resolves a template by its user-facing name, fetches its entities, and
/// counts them through the structured decode path.
pub async fn count_entities_by_template_name(
    template_client: &TemplateClient,
    entity_client: &EntityClient,
    template_name: &str,
    batch_size: NonZeroU32,
) -> Result<usize, ClientError> {
    let templates = template_client.fetch_all().await?;

    let template_id = templates
        .iter()
        .find(|template| template.name == template_name)
        .and_then(|template| template.id.clone())
        .ok_or_else(|| ClientError::UnknownTemplate {
            template_id: template_name.to_string(),
        })?;

    debug!(template_name, %template_id, "Resolved template by name");

    let listing = entity_client
        .list(&template_id, Some(&["id"]), batch_size)
        .await?;
    let count = xml::count_items(&listing, "entities", "entity")?;

    info!(template_name, count, "Entity count aggregated");

    Ok(count)
}
