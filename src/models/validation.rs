use serde_json::{Map, Value};
use tracing::warn;

use crate::models::template::{PropertyType, TemplateProperty};

/// Keys the remote system accepts on a property definition; anything else is
/// stripped before submission.
pub const ALLOWED_PROPERTY_KEYS: [&str; 12] = [
    "label",
    "type",
    "name",
    "required",
    "showInCard",
    "filter",
    "defaultfilter",
    "prioritySorting",
    "noLabel",
    "style",
    "generatedId",
    "isCommonProperty",
];

#[derive(Debug, Clone, PartialEq)]
pub enum ScreenedProperty {
    Valid(TemplateProperty),
    Rejected { reason: String },
}

/// Screens one raw property-like input. Pure and total: every input maps to
/// either a cleaned property or a rejection with its reason.
pub fn screen_property(raw: &Value) -> ScreenedProperty {
    let Some(map) = raw.as_object() else {
        return ScreenedProperty::Rejected {
            reason: "not a structured record".to_string(),
        };
    };

    let Some(kind) = map.get("type") else {
        return ScreenedProperty::Rejected {
            reason: "missing type".to_string(),
        };
    };

    if serde_json::from_value::<PropertyType>(kind.clone()).is_err() {
        return ScreenedProperty::Rejected {
            reason: format!("unrecognized type {kind}"),
        };
    }

    let retained: Map<String, Value> = map
        .iter()
        .filter(|(key, _)| ALLOWED_PROPERTY_KEYS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    match serde_json::from_value::<TemplateProperty>(Value::Object(retained)) {
        Ok(mut property) => {
            if property.name.is_none() && !property.label.is_empty() {
                property.name = Some(derive_property_name(&property.label));
            }
            ScreenedProperty::Valid(property)
        }
        Err(e) => ScreenedProperty::Rejected {
            reason: format!("malformed property: {e}"),
        },
    }
}

/// Screens a raw property list, dropping rejected entries and preserving the
/// order of the rest. Rejections are logged, never substituted.
pub fn screen_properties(raw: &[Value]) -> Vec<TemplateProperty> {
    let mut cleaned = Vec::with_capacity(raw.len());

    for (index, input) in raw.iter().enumerate() {
        match screen_property(input) {
            ScreenedProperty::Valid(property) => cleaned.push(property),
            ScreenedProperty::Rejected { reason } => {
                warn!(index, %reason, "Dropping property from creation request");
            }
        }
    }

    cleaned
}

fn derive_property_name(label: &str) -> String {
    label.to_lowercase().replace(' ', "_")
}
