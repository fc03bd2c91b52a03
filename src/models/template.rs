use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    #[default]
    Text,
    Markdown,
    Numeric,
    Date,
    Link,
    Select,
    Multiselect,
    Relationship,
    Nested,
    Image,
    Media,
    Preview,
    Geolocation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TemplateProperty {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default)]
    pub label: String,

    #[serde(rename = "type")]
    pub kind: PropertyType,

    #[serde(default, skip_serializing_if = "is_false")]
    pub required: bool,

    #[serde(rename = "showInCard", default, skip_serializing_if = "is_false")]
    pub show_in_card: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub filter: bool,

    #[serde(rename = "defaultfilter", default, skip_serializing_if = "is_false")]
    pub default_filter: bool,

    #[serde(rename = "prioritySorting", default, skip_serializing_if = "is_false")]
    pub priority_sorting: bool,

    #[serde(rename = "noLabel", default, skip_serializing_if = "is_false")]
    pub no_label: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,

    #[serde(rename = "generatedId", default, skip_serializing_if = "is_false")]
    pub generated_id: bool,

    #[serde(rename = "isCommonProperty", default, skip_serializing_if = "is_false")]
    pub is_common_property: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub name: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(rename = "entityViewPage", default)]
    pub entity_view_page: String,

    #[serde(default)]
    pub properties: Vec<TemplateProperty>,

    #[serde(rename = "commonProperties", default, skip_serializing_if = "Vec::is_empty")]
    pub common_properties: Vec<TemplateProperty>,
}

impl Template {
    /// Builds an outgoing creation payload. The server assigns the id; the
    /// three default common properties are always attached.
    pub fn new_for_creation(
        name: &str,
        color: Option<&str>,
        properties: Vec<TemplateProperty>,
    ) -> Self {
        Self {
            id: None,
            name: name.to_string(),
            color: color.map_or_else(default_color, ToString::to_string),
            entity_view_page: String::new(),
            properties,
            common_properties: default_common_properties(),
        }
    }
}

fn default_common_properties() -> Vec<TemplateProperty> {
    [
        ("Title", "title", PropertyType::Text),
        ("Date added", "creationDate", PropertyType::Date),
        ("Date modified", "editDate", PropertyType::Date),
    ]
    .into_iter()
    .map(|(label, name, kind)| TemplateProperty {
        name: Some(name.to_string()),
        label: label.to_string(),
        kind,
        is_common_property: true,
        ..TemplateProperty::default()
    })
    .collect()
}

fn default_color() -> String {
    "#000000".to_string()
}

fn is_false(value: &bool) -> bool {
    !*value
}
