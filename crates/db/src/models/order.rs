use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, Set,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map as JsonMap, Value as JsonValue};
use thiserror::Error;

use crate::entities::order;
pub use crate::types::{AgendaItem, GeneratedContent, OrderStatus, Template, WeddingDetails};

#[derive(Debug, Error)]
pub enum OrderError {
    #[error(transparent)]
    Database(#[from] DbErr),
    #[error("Order not found")]
    NotFound,
    #[error("An order with this access code already exists")]
    DuplicateAccessCode,
    #[error("An order with this Etsy order id already exists")]
    DuplicateEtsyOrderId,
    #[error("Invalid wedding details: {0}")]
    Details(String),
}

/// One customer's purchase and its accumulated customization state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    pub etsy_order_id: String,
    pub access_code: String,
    pub status: OrderStatus,
    pub template: Option<Template>,
    pub wedding_details: Option<WeddingDetails>,
    pub generated_content: Option<GeneratedContent>,
    pub domain: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrder {
    pub etsy_order_id: String,
    pub access_code: String,
    pub status: Option<OrderStatus>,
    pub template: Option<Template>,
    pub wedding_details: Option<WeddingDetails>,
}

/// Wizard update payload. `wedding_details` is a field-level patch: present
/// keys overwrite, JSON null clears, absent keys are left untouched.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrder {
    pub template: Option<Template>,
    pub wedding_details: Option<JsonMap<String, JsonValue>>,
}

/// Shallow merge of a details patch over the stored details.
pub fn merge_details(
    existing: Option<&WeddingDetails>,
    patch: &JsonMap<String, JsonValue>,
) -> Result<WeddingDetails, OrderError> {
    let mut merged = existing
        .map(serde_json::to_value)
        .transpose()
        .map_err(|err| OrderError::Details(err.to_string()))?
        .and_then(|value| match value {
            JsonValue::Object(map) => Some(map),
            _ => None,
        })
        .unwrap_or_default();

    for (key, value) in patch {
        if value.is_null() {
            merged.remove(key);
        } else {
            merged.insert(key.clone(), value.clone());
        }
    }

    serde_json::from_value(JsonValue::Object(merged))
        .map_err(|err| OrderError::Details(err.to_string()))
}

impl Order {
    fn from_model(model: order::Model) -> Self {
        Self {
            id: model.id,
            etsy_order_id: model.etsy_order_id,
            access_code: model.access_code,
            status: model.status,
            template: model.template,
            wedding_details: model.wedding_details,
            generated_content: model.generated_content,
            domain: model.domain,
            created_at: model.created_at,
        }
    }

    pub async fn find_by_id<C: ConnectionTrait>(
        db: &C,
        id: i64,
    ) -> Result<Option<Self>, OrderError> {
        let record = order::Entity::find_by_id(id).one(db).await?;
        Ok(record.map(Self::from_model))
    }

    pub async fn find_by_access_code<C: ConnectionTrait>(
        db: &C,
        access_code: &str,
    ) -> Result<Option<Self>, OrderError> {
        let record = order::Entity::find()
            .filter(order::Column::AccessCode.eq(access_code))
            .one(db)
            .await?;
        Ok(record.map(Self::from_model))
    }

    pub async fn find_by_etsy_order_id<C: ConnectionTrait>(
        db: &C,
        etsy_order_id: &str,
    ) -> Result<Option<Self>, OrderError> {
        let record = order::Entity::find()
            .filter(order::Column::EtsyOrderId.eq(etsy_order_id))
            .one(db)
            .await?;
        Ok(record.map(Self::from_model))
    }

    pub async fn create<C: ConnectionTrait>(
        db: &C,
        data: &CreateOrder,
    ) -> Result<Self, OrderError> {
        if Self::find_by_access_code(db, &data.access_code).await?.is_some() {
            return Err(OrderError::DuplicateAccessCode);
        }
        if Self::find_by_etsy_order_id(db, &data.etsy_order_id)
            .await?
            .is_some()
        {
            return Err(OrderError::DuplicateEtsyOrderId);
        }

        let active = order::ActiveModel {
            etsy_order_id: Set(data.etsy_order_id.clone()),
            access_code: Set(data.access_code.clone()),
            status: Set(data.status.clone().unwrap_or_default()),
            template: Set(data.template.clone()),
            wedding_details: Set(data.wedding_details.clone()),
            generated_content: Set(None),
            domain: Set(None),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        let model = active.insert(db).await?;
        Ok(Self::from_model(model))
    }

    pub async fn update<C: ConnectionTrait>(
        db: &C,
        id: i64,
        data: &UpdateOrder,
    ) -> Result<Self, OrderError> {
        let record = order::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or(OrderError::NotFound)?;

        let merged_details = match data.wedding_details.as_ref() {
            Some(patch) => Some(merge_details(record.wedding_details.as_ref(), patch)?),
            None => None,
        };

        let mut active: order::ActiveModel = record.into();
        if let Some(template) = data.template.as_ref() {
            active.template = Set(Some(template.clone()));
        }
        if let Some(details) = merged_details {
            active.wedding_details = Set(Some(details));
        }

        let updated = active.update(db).await?;
        Ok(Self::from_model(updated))
    }

    /// Commits the pipeline result: content and completed status in one write.
    pub async fn complete_generation<C: ConnectionTrait>(
        db: &C,
        id: i64,
        content: GeneratedContent,
    ) -> Result<Self, OrderError> {
        let record = order::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or(OrderError::NotFound)?;

        let mut active: order::ActiveModel = record.into();
        active.generated_content = Set(Some(content));
        active.status = Set(OrderStatus::Completed);

        let updated = active.update(db).await?;
        Ok(Self::from_model(updated))
    }
}
