//! Traits describing the collaborators the core depends on, plus shared error types.

use async_trait::async_trait;
use chrono::{DateTime, Local, NaiveDateTime, Utc};
use reqwest::Error as ReqwestError;

use crate::mail::EmailMessage;
use crate::model::{Order, OrderStatus, Product};

#[derive(thiserror::Error, Debug)]
/// Errors raised by ports and the service layer.
pub enum PortError {
    /// Network layer failed.
    #[error("Network error: {0}")]
    Network(#[from] ReqwestError),
    /// Local file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The route sheet could not be read as a table.
    #[error("Malformed route sheet: {0}")]
    Sheet(String),
    /// Requested product does not exist.
    #[error("Product not found")]
    ProductNotFound,
    /// Requested order does not exist.
    #[error("Order not found")]
    OrderNotFound,
    /// Order status text is not a known status.
    #[error("Invalid status {0:?}; expected one of pendiente, confirmado, en_camino, entregado, cancelado")]
    InvalidStatus(String),
    /// Submitted data is incomplete or inconsistent.
    #[error("Invalid request: {0}")]
    Validation(String),
    /// Email delivery failed.
    #[error("Notifier error: {0}")]
    Notifier(String),
    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Source of the current local date and time.
pub trait Clock: Send + Sync {
    /// Current local date and time.
    fn now(&self) -> NaiveDateTime;
}

#[derive(Debug, Clone, Copy, Default)]
/// Wall clock in the process time zone.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

#[derive(Debug, Clone, Copy)]
/// Clock frozen at a given instant.
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One row of a route sheet, before validation.
pub struct RouteRow {
    /// Locality name or hyphen-joined group.
    pub locality: String,
    /// Delivery flags, Monday to Friday.
    pub days: [bool; 5],
    /// Period label such as `SEMANA A`; blank for weekly routes.
    pub period: String,
}

#[async_trait]
/// External tabular source for the routing table.
pub trait RouteTableSource: Send + Sync {
    /// Where the rows come from, for logs.
    fn describe(&self) -> String;

    /// Fetch all rows.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the source cannot be read at all.
    async fn fetch_rows(&self) -> Result<Vec<RouteRow>, PortError>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Catalog query parameters.
pub struct ProductFilter {
    /// Only products in this category.
    pub category: Option<String>,
    /// Only products of this brand.
    pub brand: Option<String>,
}

impl ProductFilter {
    /// Whether `product` passes the filter.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        self.category
            .as_deref()
            .is_none_or(|category| product.category == category)
            && self
                .brand
                .as_deref()
                .is_none_or(|brand| product.brand.as_deref() == Some(brand))
    }
}

#[async_trait]
/// Product persistence.
pub trait ProductStore: Send + Sync {
    /// Number of stored products.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the store is unavailable.
    async fn count(&self) -> Result<usize, PortError>;

    /// Store new products.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the store is unavailable.
    async fn insert_many(&self, products: Vec<Product>) -> Result<(), PortError>;

    /// Products matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the store is unavailable.
    async fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>, PortError>;

    /// Product by id.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the store is unavailable.
    async fn get(&self, id: &str) -> Result<Option<Product>, PortError>;
}

#[async_trait]
/// Order persistence.
pub trait OrderStore: Send + Sync {
    /// Store a new order.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the store is unavailable.
    async fn insert(&self, order: Order) -> Result<(), PortError>;

    /// Most recent orders first, optionally for one customer email.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the store is unavailable.
    async fn list(&self, email: Option<&str>, limit: usize) -> Result<Vec<Order>, PortError>;

    /// Order by id.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the store is unavailable.
    async fn get(&self, id: &str) -> Result<Option<Order>, PortError>;

    /// Change an order's status.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::OrderNotFound`] when no order has this id.
    async fn update_status(
        &self,
        id: &str,
        status: OrderStatus,
        at: DateTime<Utc>,
    ) -> Result<Order, PortError>;
}

#[async_trait]
/// Outgoing email.
pub trait Notifier: Send + Sync {
    /// Deliver one message.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the message could not be handed over.
    async fn send(&self, message: &EmailMessage) -> Result<(), PortError>;
}
