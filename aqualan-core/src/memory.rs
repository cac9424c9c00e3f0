//! In-memory product and order stores.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::model::{Order, OrderStatus, Product};
use crate::ports::{OrderStore, PortError, ProductFilter, ProductStore};

#[derive(Debug, Default)]
/// Product store kept in process memory, in insertion order.
pub struct InMemoryProductStore {
    products: RwLock<Vec<Product>>,
}

impl InMemoryProductStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn count(&self) -> Result<usize, PortError> {
        Ok(self.products.read().len())
    }

    async fn insert_many(&self, products: Vec<Product>) -> Result<(), PortError> {
        self.products.write().extend(products);
        Ok(())
    }

    async fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>, PortError> {
        Ok(self
            .products
            .read()
            .iter()
            .filter(|product| filter.matches(product))
            .cloned()
            .collect())
    }

    async fn get(&self, id: &str) -> Result<Option<Product>, PortError> {
        Ok(self
            .products
            .read()
            .iter()
            .find(|product| product.id == id)
            .cloned())
    }
}

#[derive(Debug, Default)]
/// Order store kept in process memory.
pub struct InMemoryOrderStore {
    orders: RwLock<Vec<Order>>,
}

impl InMemoryOrderStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn insert(&self, order: Order) -> Result<(), PortError> {
        self.orders.write().push(order);
        Ok(())
    }

    async fn list(&self, email: Option<&str>, limit: usize) -> Result<Vec<Order>, PortError> {
        let mut orders: Vec<Order> = self
            .orders
            .read()
            .iter()
            .filter(|order| email.is_none_or(|wanted| order.customer_email == wanted))
            .cloned()
            .collect();
        orders.sort_by(|left, right| right.created_at.cmp(&left.created_at));
        orders.truncate(limit);
        Ok(orders)
    }

    async fn get(&self, id: &str) -> Result<Option<Order>, PortError> {
        Ok(self
            .orders
            .read()
            .iter()
            .find(|order| order.id == id)
            .cloned())
    }

    async fn update_status(
        &self,
        id: &str,
        status: OrderStatus,
        at: DateTime<Utc>,
    ) -> Result<Order, PortError> {
        let mut orders = self.orders.write();
        let order = orders
            .iter_mut()
            .find(|order| order.id == id)
            .ok_or(PortError::OrderNotFound)?;
        order.status = status;
        order.updated_at = at;
        Ok(order.clone())
    }
}
