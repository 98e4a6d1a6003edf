use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::DBService;
use crate::models::order::{
    CreateOrder, GeneratedContent, Order, OrderError, OrderStatus, UpdateOrder, merge_details,
};

/// Capability contract for order persistence. The rest of the system mutates
/// order state only through this seam.
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn get_by_id(&self, id: i64) -> Result<Option<Order>, OrderError>;

    async fn get_by_access_code(&self, access_code: &str) -> Result<Option<Order>, OrderError>;

    async fn create(&self, data: CreateOrder) -> Result<Order, OrderError>;

    async fn update(&self, id: i64, data: UpdateOrder) -> Result<Order, OrderError>;

    /// Persists generated content and the completed status as one write.
    async fn complete_generation(
        &self,
        id: i64,
        content: GeneratedContent,
    ) -> Result<Order, OrderError>;
}

/// Durable variant backed by the SQLite database.
#[derive(Clone)]
pub struct DbOrderStore {
    db: DBService,
}

impl DbOrderStore {
    pub fn new(db: DBService) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OrderStore for DbOrderStore {
    async fn get_by_id(&self, id: i64) -> Result<Option<Order>, OrderError> {
        Order::find_by_id(&self.db.conn, id).await
    }

    async fn get_by_access_code(&self, access_code: &str) -> Result<Option<Order>, OrderError> {
        Order::find_by_access_code(&self.db.conn, access_code).await
    }

    async fn create(&self, data: CreateOrder) -> Result<Order, OrderError> {
        Order::create(&self.db.conn, &data).await
    }

    async fn update(&self, id: i64, data: UpdateOrder) -> Result<Order, OrderError> {
        Order::update(&self.db.conn, id, &data).await
    }

    async fn complete_generation(
        &self,
        id: i64,
        content: GeneratedContent,
    ) -> Result<Order, OrderError> {
        Order::complete_generation(&self.db.conn, id, content).await
    }
}

#[derive(Default)]
struct MemoryState {
    orders: HashMap<i64, Order>,
    next_id: i64,
}

/// In-memory variant for tests and local runs. Explicitly owned state behind
/// one lock, so per-id updates are serialized and the container is resettable.
#[derive(Default)]
pub struct InMemoryOrderStore {
    state: RwLock<MemoryState>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn clear(&self) {
        let mut state = self.state.write().await;
        state.orders.clear();
        state.next_id = 0;
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn get_by_id(&self, id: i64) -> Result<Option<Order>, OrderError> {
        let state = self.state.read().await;
        Ok(state.orders.get(&id).cloned())
    }

    async fn get_by_access_code(&self, access_code: &str) -> Result<Option<Order>, OrderError> {
        let state = self.state.read().await;
        Ok(state
            .orders
            .values()
            .find(|order| order.access_code == access_code)
            .cloned())
    }

    async fn create(&self, data: CreateOrder) -> Result<Order, OrderError> {
        let mut state = self.state.write().await;
        if state
            .orders
            .values()
            .any(|order| order.access_code == data.access_code)
        {
            return Err(OrderError::DuplicateAccessCode);
        }
        if state
            .orders
            .values()
            .any(|order| order.etsy_order_id == data.etsy_order_id)
        {
            return Err(OrderError::DuplicateEtsyOrderId);
        }

        state.next_id += 1;
        let order = Order {
            id: state.next_id,
            etsy_order_id: data.etsy_order_id,
            access_code: data.access_code,
            status: data.status.unwrap_or_default(),
            template: data.template,
            wedding_details: data.wedding_details,
            generated_content: None,
            domain: None,
            created_at: Utc::now(),
        };
        state.orders.insert(order.id, order.clone());
        Ok(order)
    }

    async fn update(&self, id: i64, data: UpdateOrder) -> Result<Order, OrderError> {
        let mut state = self.state.write().await;
        let order = state.orders.get_mut(&id).ok_or(OrderError::NotFound)?;

        if let Some(patch) = data.wedding_details.as_ref() {
            order.wedding_details = Some(merge_details(order.wedding_details.as_ref(), patch)?);
        }
        if let Some(template) = data.template {
            order.template = Some(template);
        }
        Ok(order.clone())
    }

    async fn complete_generation(
        &self,
        id: i64,
        content: GeneratedContent,
    ) -> Result<Order, OrderError> {
        let mut state = self.state.write().await;
        let order = state.orders.get_mut(&id).ok_or(OrderError::NotFound)?;
        order.generated_content = Some(content);
        order.status = OrderStatus::Completed;
        Ok(order.clone())
    }
}
