use std::{num::NonZeroU32, time::Duration};

use reqwest::{Client, StatusCode};
use tracing::{debug, info, warn};

use crate::{
    config::Config,
    error::ClientError,
    models::{entity::Entity, response::PagedResponse},
    xml::{self, Record},
};

pub struct EntityClient {
    http_client: Client,
    base_url: String,
    username: String,
    password: String,
    language: String,
}

impl EntityClient {
    pub fn new(config: &Config) -> Result<Self, ClientError> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(ClientError::transport)?;

        info!(base_url = %config.docstore_url, "Entity client initialized");

        Ok(Self {
            http_client,
            base_url: config.docstore_url.clone(),
            username: config.docstore_username.clone(),
            password: config.docstore_password.clone(),
            language: config.default_language.clone(),
        })
    }

    /// Fetches every entity owned by `template_id`, paginating in windows of
    /// `batch_size` until the server delivers a short or empty page. The
    /// batch size is a transport knob only; the logical result set is the
    /// same for any value.
    pub async fn fetch_all(
        &self,
        template_id: &str,
        batch_size: NonZeroU32,
    ) -> Result<Vec<Entity>, ClientError> {
        let mut entities: Vec<Entity> = Vec::new();
        let mut start = 0u64;
        let mut reported_total = None;

        loop {
            let page = self.fetch_page(template_id, start, batch_size.get()).await?;

            if page.total_rows.is_some() {
                reported_total = page.total_rows;
            }

            let delivered = page.rows.len();
            entities.extend(page.rows);

            debug!(
                template_id,
                start,
                delivered,
                total = entities.len(),
                "Fetched entity page"
            );

            if delivered < batch_size.get() as usize {
                break;
            }
            start += u64::from(batch_size.get());
        }

        if let Some(reported) = reported_total {
            if (entities.len() as u64) < reported {
                warn!(
                    template_id,
                    fetched = entities.len(),
                    reported,
                    "Server reported more rows than pagination delivered"
                );
                return Err(ClientError::IncompletePagination {
                    fetched: entities.len(),
                    reported,
                });
            }
        }

        Ok(entities)
    }

    /// Lists entities for a template as an XML document. `fields` may name
    /// the fixed keys (`id`, `sharedId`, `title`, `template`), individual
    /// metadata labels, or `metadata` to expand every metadata label; `id` is
    /// always retained.
    pub async fn list(
        &self,
        template_id: &str,
        fields: Option<&[&str]>,
        batch_size: NonZeroU32,
    ) -> Result<String, ClientError> {
        let entities = self.fetch_all(template_id, batch_size).await?;

        debug!(
            template_id,
            count = entities.len(),
            "Entity listing assembled"
        );

        let records: Vec<Record> = entities
            .iter()
            .map(|entity| project_entity(entity, fields))
            .collect();

        xml::encode(&records, "entities", "entity")
    }

    async fn fetch_page(
        &self,
        template_id: &str,
        start: u64,
        limit: u32,
    ) -> Result<PagedResponse<Entity>, ClientError> {
        let url = format!("{}/api/entities", self.base_url);

        let response = self
            .http_client
            .get(&url)
            .query(&[("template", template_id), ("language", self.language.as_str())])
            .query(&[("start", start), ("limit", u64::from(limit))])
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .await
            .map_err(ClientError::transport)?;

        match response.status() {
            status if status.is_success() => {
                response.json().await.map_err(ClientError::transport)
            }
            StatusCode::NOT_FOUND => Err(ClientError::UnknownTemplate {
                template_id: template_id.to_string(),
            }),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ClientError::AuthRequired),
            status if status.is_server_error() => Err(ClientError::RemoteUnavailable {
                reason: format!("server returned {status}"),
            }),
            status => Err(ClientError::UnexpectedStatus { status }),
        }
    }
}

fn project_entity(entity: &Entity, fields: Option<&[&str]>) -> Record {
    let Some(fields) = fields else {
        let mut record = vec![
            ("id".to_string(), entity.id.clone()),
            (
                "sharedId".to_string(),
                entity.shared_id.clone().unwrap_or_default(),
            ),
            ("title".to_string(), entity.title.clone()),
            ("template".to_string(), entity.template.clone()),
        ];
        push_metadata(&mut record, entity);
        return record;
    };

    let mut record: Record = Vec::new();
    if !fields.contains(&"id") {
        record.push(("id".to_string(), entity.id.clone()));
    }
    for field in fields {
        match *field {
            "id" => record.push(("id".to_string(), entity.id.clone())),
            "sharedId" => record.push((
                "sharedId".to_string(),
                entity.shared_id.clone().unwrap_or_default(),
            )),
            "title" => record.push(("title".to_string(), entity.title.clone())),
            "template" => record.push(("template".to_string(), entity.template.clone())),
            "metadata" => push_metadata(&mut record, entity),
            label => {
                if let Some(value) = entity.metadata.get(label) {
                    record.push((label.to_string(), metadata_value_to_string(value)));
                }
            }
        }
    }
    record
}

fn push_metadata(record: &mut Record, entity: &Entity) {
    for (label, value) in &entity.metadata {
        record.push((label.clone(), metadata_value_to_string(value)));
    }
}

fn metadata_value_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}
