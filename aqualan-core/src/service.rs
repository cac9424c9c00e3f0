//! High-level service facade combining scheduling, catalog, orders, and email.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::catalog;
use crate::mail::{self, EmailMessage};
use crate::model::{
    Category, DeliveryEstimate, DeliveryZone, OfferRequest, Order, OrderCreate, OrderStatus,
    Product, UnknownStatus,
};
use crate::ports::{
    Clock, Notifier, OrderStore, PortError, ProductFilter, ProductStore, RouteTableSource,
};
use crate::scheduler::{ReloadReport, SharedScheduler};

/// Maximum number of orders returned by a listing.
pub const ORDER_LIST_LIMIT: usize = 100;

/// Default recipient of staff alerts.
pub const DEFAULT_STAFF_EMAIL: &str = "pedidos@aqualan.es";

/// Public entry point for the storefront and staff tools.
pub struct AqualanService {
    scheduler: Arc<SharedScheduler>,
    products: Arc<dyn ProductStore>,
    orders: Arc<dyn OrderStore>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    staff_email: String,
}

impl AqualanService {
    /// Create a new service bound to the provided collaborators.
    #[must_use]
    pub fn new(
        scheduler: Arc<SharedScheduler>,
        products: Arc<dyn ProductStore>,
        orders: Arc<dyn OrderStore>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            scheduler,
            products,
            orders,
            notifier,
            clock,
            staff_email: DEFAULT_STAFF_EMAIL.to_owned(),
        }
    }

    /// Send staff alerts to `staff_email` instead of the default inbox.
    #[must_use]
    pub fn with_staff_email(mut self, staff_email: impl Into<String>) -> Self {
        self.staff_email = staff_email.into();
        self
    }

    /// Live route tables.
    #[must_use]
    pub fn scheduler(&self) -> &Arc<SharedScheduler> {
        &self.scheduler
    }

    /// Clock used for estimates and timestamps.
    #[must_use]
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Catalog categories.
    #[must_use]
    pub fn categories(&self) -> Vec<Category> {
        catalog::categories()
    }

    /// Provinces served.
    #[must_use]
    pub fn delivery_zones(&self) -> Vec<DeliveryZone> {
        catalog::delivery_zones()
    }

    /// Insert the built-in catalog when the product store is empty.
    /// Returns how many products were inserted.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if the product store fails.
    pub async fn seed_catalog(&self) -> Result<usize, PortError> {
        if self.products.count().await? > 0 {
            return Ok(0);
        }
        let products = catalog::seed_products(Utc::now());
        let inserted = products.len();
        self.products.insert_many(products).await?;
        info!(inserted, "catalog seeded");
        Ok(inserted)
    }

    /// Products matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if the product store fails.
    pub async fn products(&self, filter: &ProductFilter) -> Result<Vec<Product>, PortError> {
        self.products.list(filter).await
    }

    /// Product by id.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::ProductNotFound`] when no product has this id.
    pub async fn product(&self, id: &str) -> Result<Product, PortError> {
        self.products
            .get(id)
            .await?
            .ok_or(PortError::ProductNotFound)
    }

    /// Next delivery for `city` as of now.
    #[must_use]
    pub fn delivery_estimate(&self, city: &str) -> DeliveryEstimate {
        self.scheduler.estimate(city, self.clock.now())
    }

    /// Validate, price, schedule, and store an order, then notify the
    /// customer and staff. Email failures are logged only.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::Validation`] for incomplete orders, or a
    /// [`PortError`] if a store fails.
    pub async fn create_order(&self, request: OrderCreate) -> Result<Order, PortError> {
        validate_order(&request)?;

        let mut items = request.items;
        for item in &mut items {
            if item.price.is_none() {
                let product = self.products.get(&item.product_id).await?.ok_or_else(|| {
                    PortError::Validation(format!("unknown product {}", item.product_id))
                })?;
                item.price = Some(product.price);
            }
        }
        let total = round_cents(
            items
                .iter()
                .map(|item| item.price.unwrap_or_default() * f64::from(item.quantity))
                .sum(),
        );

        let estimate = self.delivery_estimate(&request.delivery_city);
        let now = Utc::now();
        let order = Order {
            id: Uuid::new_v4().to_string(),
            customer_name: request.customer_name,
            customer_email: request.customer_email,
            customer_phone: request.customer_phone,
            delivery_address: request.delivery_address,
            delivery_city: request.delivery_city,
            delivery_zone: request.delivery_zone,
            items,
            notes: request.notes,
            total,
            status: OrderStatus::Pendiente,
            delivery_date: estimate.date,
            delivery_day: estimate.day_name,
            created_at: now,
            updated_at: now,
        };

        self.orders.insert(order.clone()).await?;
        info!(
            order = %order.id,
            city = %order.delivery_city,
            total = order.total,
            delivery_date = ?order.delivery_date,
            "order created"
        );

        self.notify_quietly(&mail::order_confirmation(&order), "customer confirmation")
            .await;
        self.notify_quietly(
            &mail::staff_order_alert(&order, &self.staff_email),
            "staff alert",
        )
        .await;

        Ok(order)
    }

    /// Most recent orders, optionally for one customer.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if the order store fails.
    pub async fn orders(&self, email: Option<&str>) -> Result<Vec<Order>, PortError> {
        self.orders.list(email, ORDER_LIST_LIMIT).await
    }

    /// Order by id.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::OrderNotFound`] when no order has this id.
    pub async fn order(&self, id: &str) -> Result<Order, PortError> {
        self.orders.get(id).await?.ok_or(PortError::OrderNotFound)
    }

    /// Move an order to the status named by `status`.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::InvalidStatus`] for unknown status text and
    /// [`PortError::OrderNotFound`] for unknown orders.
    pub async fn update_order_status(&self, id: &str, status: &str) -> Result<Order, PortError> {
        let status: OrderStatus = status
            .parse()
            .map_err(|unknown: UnknownStatus| PortError::InvalidStatus(unknown.0))?;
        let order = self.orders.update_status(id, status, Utc::now()).await?;
        info!(order = %order.id, %status, "order status updated");
        Ok(order)
    }

    /// Forward a business quote request to staff.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::Validation`] for incomplete requests and
    /// [`PortError::Notifier`] when the email cannot be sent.
    pub async fn submit_offer_request(&self, request: &OfferRequest) -> Result<(), PortError> {
        validate_offer(request)?;
        let message = mail::offer_request_alert(request, &self.staff_email);
        self.notifier.send(&message).await?;
        info!(company = %request.empresa, "offer request forwarded");
        Ok(())
    }

    /// Merge the rows of `source` into the live route tables.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the source cannot be read; the live
    /// tables are left as they were.
    pub async fn reload_routes(
        &self,
        source: &dyn RouteTableSource,
    ) -> Result<ReloadReport, PortError> {
        let rows = source.fetch_rows().await.inspect_err(|err| {
            warn!(source = %source.describe(), error = %err, "route sheet unavailable");
        })?;
        let report = self.scheduler.apply_rows(&rows);
        info!(
            source = %source.describe(),
            accepted = report.accepted,
            rejected = report.rejected,
            applied = report.applied,
            "route reload finished"
        );
        Ok(report)
    }

    async fn notify_quietly(&self, message: &EmailMessage, what: &str) {
        if let Err(err) = self.notifier.send(message).await {
            warn!(what, to = ?message.to, error = %err, "email not sent");
        }
    }
}

fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

fn require(value: &str, field: &str) -> Result<(), PortError> {
    if value.trim().is_empty() {
        return Err(PortError::Validation(format!("{field} is required")));
    }
    Ok(())
}

fn require_email(value: &str, field: &str) -> Result<(), PortError> {
    require(value, field)?;
    if !value.contains('@') {
        return Err(PortError::Validation(format!("{field} is not an email address")));
    }
    Ok(())
}

fn validate_order(request: &OrderCreate) -> Result<(), PortError> {
    require(&request.customer_name, "customer_name")?;
    require_email(&request.customer_email, "customer_email")?;
    require(&request.customer_phone, "customer_phone")?;
    require(&request.delivery_address, "delivery_address")?;
    require(&request.delivery_city, "delivery_city")?;
    if request.items.is_empty() {
        return Err(PortError::Validation("order has no items".to_owned()));
    }
    if let Some(item) = request.items.iter().find(|item| item.quantity == 0) {
        return Err(PortError::Validation(format!(
            "quantity for {} must be positive",
            item.product_id
        )));
    }
    if let Some(item) = request
        .items
        .iter()
        .find(|item| item.price.is_some_and(|price| !price.is_finite() || price < 0.0))
    {
        return Err(PortError::Validation(format!(
            "price for {} must be a non-negative amount",
            item.product_id
        )));
    }
    Ok(())
}

fn validate_offer(request: &OfferRequest) -> Result<(), PortError> {
    require(&request.empresa, "empresa")?;
    require(&request.nombre, "nombre")?;
    require(&request.telefono, "telefono")?;
    require_email(&request.email, "email")?;
    require(&request.ubicacion, "ubicacion")?;
    require(&request.ciudad, "ciudad")?;
    if request.ubicacion == "otra" {
        require(
            request.otra_provincia.as_deref().unwrap_or_default(),
            "otra_provincia",
        )?;
    }
    if request.productos.is_empty() {
        return Err(PortError::Validation(
            "at least one product family is required".to_owned(),
        ));
    }
    Ok(())
}
