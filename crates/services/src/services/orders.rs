use db::models::order::{Order, OrderError, UpdateOrder};
use db::store::OrderStore;
use serde_json::{Map as JsonMap, Value as JsonValue};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrderServiceError {
    #[error(transparent)]
    Order(#[from] OrderError),
    #[error("Invalid value for field '{field}': {reason}")]
    InvalidField { field: String, reason: String },
    #[error("Unknown wedding details field '{0}'")]
    UnknownField(String),
}

pub type Result<T> = std::result::Result<T, OrderServiceError>;

/// Wedding details fields generation depends on; these reject null and blank
/// values in update payloads.
const REQUIRED_FIELDS: &[&str] = &["coupleNames", "weddingDate", "venue"];

const OPTIONAL_STRING_FIELDS: &[&str] = &[
    "weddingTime",
    "venueAddress",
    "googleMapsUrl",
    "dressCode",
    "loveStory",
    "registryLinks",
    "musicLink",
    "transportation",
    "accommodation",
    "rsvpDeadline",
];

const STRING_LIST_FIELDS: &[&str] = &["guestMealOptions", "galleryImages"];

const AGENDA_FIELD: &str = "agenda";

#[derive(Clone, Default)]
pub struct OrderService;

impl OrderService {
    pub fn new() -> Self {
        Self
    }

    pub async fn update_order(
        &self,
        store: &dyn OrderStore,
        order_id: i64,
        payload: UpdateOrder,
    ) -> Result<Order> {
        if let Some(patch) = payload.wedding_details.as_ref() {
            validate_details_patch(patch)?;
        }
        Ok(store.update(order_id, payload).await?)
    }
}

/// Checks every present key of a wedding details patch against the known
/// field table. Invalid values are rejected outright, never dropped or
/// coerced.
fn validate_details_patch(patch: &JsonMap<String, JsonValue>) -> Result<()> {
    for (key, value) in patch {
        if REQUIRED_FIELDS.contains(&key.as_str()) {
            validate_required_string(key, value)?;
        } else if OPTIONAL_STRING_FIELDS.contains(&key.as_str()) {
            validate_optional_string(key, value)?;
        } else if STRING_LIST_FIELDS.contains(&key.as_str()) {
            validate_string_list(key, value)?;
        } else if key == AGENDA_FIELD {
            validate_agenda(value)?;
        } else {
            return Err(OrderServiceError::UnknownField(key.clone()));
        }
    }
    Ok(())
}

fn invalid(field: &str, reason: &str) -> OrderServiceError {
    OrderServiceError::InvalidField {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

fn validate_required_string(field: &str, value: &JsonValue) -> Result<()> {
    match value.as_str() {
        Some(text) if !text.trim().is_empty() => Ok(()),
        Some(_) => Err(invalid(field, "must not be empty")),
        None => Err(invalid(field, "must be a non-empty string")),
    }
}

fn validate_optional_string(field: &str, value: &JsonValue) -> Result<()> {
    if value.is_null() || value.is_string() {
        Ok(())
    } else {
        Err(invalid(field, "must be a string"))
    }
}

fn validate_string_list(field: &str, value: &JsonValue) -> Result<()> {
    if value.is_null() {
        return Ok(());
    }
    let entries = value
        .as_array()
        .ok_or_else(|| invalid(field, "must be a list of strings"))?;
    if entries.iter().all(JsonValue::is_string) {
        Ok(())
    } else {
        Err(invalid(field, "must contain only strings"))
    }
}

fn validate_agenda(value: &JsonValue) -> Result<()> {
    if value.is_null() {
        return Ok(());
    }
    let entries = value
        .as_array()
        .ok_or_else(|| invalid(AGENDA_FIELD, "must be a list of {time, event} entries"))?;

    for (index, entry) in entries.iter().enumerate() {
        let pair = entry.as_object().ok_or_else(|| {
            invalid(
                AGENDA_FIELD,
                &format!("entry {index} must be a {{time, event}} object"),
            )
        })?;
        for part in ["time", "event"] {
            if !pair.get(part).is_some_and(JsonValue::is_string) {
                return Err(invalid(
                    AGENDA_FIELD,
                    &format!("entry {index} needs a string '{part}'"),
                ));
            }
        }
        if let Some(extra) = pair.keys().find(|key| !matches!(key.as_str(), "time" | "event")) {
            return Err(invalid(
                AGENDA_FIELD,
                &format!("entry {index} has unknown key '{extra}'"),
            ));
        }
    }
    Ok(())
}
