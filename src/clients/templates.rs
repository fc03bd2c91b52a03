use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::{debug, info};

use crate::{
    config::Config,
    error::ClientError,
    models::{response::RowsResponse, template::Template, validation::screen_properties},
    xml::{self, Record},
};

pub struct TemplateClient {
    http_client: Client,
    base_url: String,
    username: String,
    password: String,
    language: String,
}

impl TemplateClient {
    pub fn new(config: &Config) -> Result<Self, ClientError> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(ClientError::transport)?;

        info!(base_url = %config.docstore_url, "Template client initialized");

        Ok(Self {
            http_client,
            base_url: config.docstore_url.clone(),
            username: config.docstore_username.clone(),
            password: config.docstore_password.clone(),
            language: config.default_language.clone(),
        })
    }

    /// Fetches every template as typed rows, in server-delivered order.
    pub async fn fetch_all(&self) -> Result<Vec<Template>, ClientError> {
        let url = format!("{}/api/templates", self.base_url);

        debug!(%url, "Fetching templates");

        let response = self
            .http_client
            .get(&url)
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .await
            .map_err(ClientError::transport)?;

        match response.status() {
            status if status.is_success() => {
                let body: RowsResponse<Template> =
                    response.json().await.map_err(ClientError::transport)?;
                Ok(body.rows)
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ClientError::AuthRequired),
            status if status.is_server_error() => Err(ClientError::RemoteUnavailable {
                reason: format!("server returned {status}"),
            }),
            status => Err(ClientError::UnexpectedStatus { status }),
        }
    }

    /// Lists all templates as an XML document. When `fields` is given, each
    /// record is projected to those keys; `id` is always retained since it is
    /// the addressing key for entity lookups.
    pub async fn list(&self, fields: Option<&[&str]>) -> Result<String, ClientError> {
        let templates = self.fetch_all().await?;

        debug!(count = templates.len(), "Template listing assembled");

        let records: Vec<Record> = templates
            .iter()
            .map(|template| project_template(template, fields))
            .collect();

        xml::encode(&records, "templates", "template")
    }

    /// Screens the raw property inputs, then submits the creation request.
    /// The only operation with a durable remote effect; it is not idempotent.
    pub async fn create(
        &self,
        name: &str,
        raw_properties: &[Value],
        color: Option<&str>,
    ) -> Result<Template, ClientError> {
        let properties = screen_properties(raw_properties);
        let template = Template::new_for_creation(name, color, properties);

        let url = format!("{}/api/templates", self.base_url);

        debug!(
            name,
            property_count = template.properties.len(),
            "Submitting template creation"
        );

        let response = self
            .http_client
            .post(&url)
            .query(&[("language", self.language.as_str())])
            .basic_auth(&self.username, Some(&self.password))
            .json(&template)
            .send()
            .await
            .map_err(ClientError::transport)?;

        match response.status() {
            status if status.is_success() => {
                let created: Template = response.json().await.map_err(ClientError::transport)?;
                info!(id = ?created.id, name, "Template created");
                Ok(created)
            }
            StatusCode::CONFLICT => Err(ClientError::DuplicateName {
                name: name.to_string(),
            }),
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                let reason = response.text().await.unwrap_or_default();
                Err(ClientError::ValidationRejected { reason })
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ClientError::AuthRequired),
            status if status.is_server_error() => Err(ClientError::RemoteUnavailable {
                reason: format!("server returned {status}"),
            }),
            status => Err(ClientError::UnexpectedStatus { status }),
        }
    }
}

fn project_template(template: &Template, fields: Option<&[&str]>) -> Record {
    let id = template.id.clone().unwrap_or_default();

    let Some(fields) = fields else {
        return vec![
            ("id".to_string(), id),
            ("name".to_string(), template.name.clone()),
            ("color".to_string(), template.color.clone()),
        ];
    };

    let mut record: Record = Vec::new();
    if !fields.contains(&"id") {
        record.push(("id".to_string(), id.clone()));
    }
    for field in fields {
        match *field {
            "id" => record.push(("id".to_string(), id.clone())),
            "name" => record.push(("name".to_string(), template.name.clone())),
            "color" => record.push(("color".to_string(), template.color.clone())),
            // Unknown keys are ignored rather than rejected.
            _ => {}
        }
    }
    record
}
