//! Domain data structures for the catalog, orders, and delivery estimates.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Shown when no route covers the customer's city.
pub const CONTACT_MESSAGE: &str = "Te contactaremos para confirmar la fecha de entrega.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Answer to "when will my order arrive".
pub struct DeliveryEstimate {
    /// Whether the city is on a known route.
    pub found: bool,
    /// Human-readable summary, e.g. `Miércoles 08/01/2025`.
    pub message: String,
    /// Predicted delivery date.
    pub date: Option<NaiveDate>,
    /// Weekday label of `date`.
    pub day_name: Option<String>,
}

impl DeliveryEstimate {
    /// Estimate for a resolved route.
    #[must_use]
    pub fn on(date: NaiveDate, day_name: &str) -> Self {
        Self {
            found: true,
            message: format!("{day_name} {}", date.format("%d/%m/%Y")),
            date: Some(date),
            day_name: Some(day_name.to_owned()),
        }
    }

    /// Estimate for a city no route covers.
    #[must_use]
    pub fn not_found() -> Self {
        Self {
            found: false,
            message: CONTACT_MESSAGE.to_owned(),
            date: None,
            day_name: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// A product in the catalog.
pub struct Product {
    /// Unique identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Marketing description.
    pub description: String,
    /// Category id, see [`Category`].
    pub category: String,
    /// Optional finer grouping such as `accesorios`.
    #[serde(default)]
    pub subcategory: Option<String>,
    /// Unit price in euros.
    pub price: f64,
    /// Sales unit (`unidad`, `pack 100`, …).
    pub unit: String,
    /// Product picture.
    pub image_url: String,
    /// Volume label such as `19L`.
    #[serde(default)]
    pub capacity: Option<String>,
    /// Water brand.
    #[serde(default)]
    pub brand: Option<String>,
    /// Whether the product can be ordered.
    pub available: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// A catalog category.
pub struct Category {
    /// Identifier matching [`Product::category`].
    pub id: String,
    /// Display name.
    pub name: String,
    /// Short description.
    pub description: String,
    /// Icon name used by the storefront.
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// A province the business delivers to.
pub struct DeliveryZone {
    /// Identifier.
    pub id: String,
    /// Display name.
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// A cart line sent with an order.
pub struct CartItem {
    /// Product identifier.
    pub product_id: String,
    /// Product name at the time of ordering.
    pub product_name: String,
    /// Number of units.
    pub quantity: u32,
    /// Unit price; filled from the catalog when the client omits it.
    #[serde(default)]
    pub price: Option<f64>,
    /// Sales unit.
    pub unit: String,
    /// Product picture.
    #[serde(default)]
    pub image_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Order as submitted by the storefront.
pub struct OrderCreate {
    /// Customer full name.
    pub customer_name: String,
    /// Customer email; confirmations are sent here.
    pub customer_email: String,
    /// Customer phone.
    pub customer_phone: String,
    /// Free-text city used for delivery scheduling.
    pub delivery_city: String,
    /// Street address.
    pub delivery_address: String,
    /// Province, when the client sends one.
    #[serde(default)]
    pub delivery_zone: Option<String>,
    /// Cart lines.
    pub items: Vec<CartItem>,
    /// Customer notes.
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Lifecycle of an order.
pub enum OrderStatus {
    /// Received, not yet confirmed.
    Pendiente,
    /// Confirmed by staff.
    Confirmado,
    /// Out for delivery.
    EnCamino,
    /// Delivered.
    Entregado,
    /// Cancelled.
    Cancelado,
}

impl OrderStatus {
    /// All statuses in lifecycle order.
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pendiente,
        OrderStatus::Confirmado,
        OrderStatus::EnCamino,
        OrderStatus::Entregado,
        OrderStatus::Cancelado,
    ];

    /// Wire name of the status.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pendiente => "pendiente",
            OrderStatus::Confirmado => "confirmado",
            OrderStatus::EnCamino => "en_camino",
            OrderStatus::Entregado => "entregado",
            OrderStatus::Cancelado => "cancelado",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown order status {0:?}")]
/// Text that is not a known order status.
pub struct UnknownStatus(pub String);

impl FromStr for OrderStatus {
    type Err = UnknownStatus;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let wanted = text.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == wanted)
            .ok_or_else(|| UnknownStatus(text.to_owned()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// A stored order.
pub struct Order {
    /// Unique identifier (UUID v4).
    pub id: String,
    /// Customer full name.
    pub customer_name: String,
    /// Customer email.
    pub customer_email: String,
    /// Customer phone.
    pub customer_phone: String,
    /// Street address.
    pub delivery_address: String,
    /// Free-text city.
    pub delivery_city: String,
    /// Province, when given.
    pub delivery_zone: Option<String>,
    /// Cart lines with prices resolved.
    pub items: Vec<CartItem>,
    /// Customer notes.
    pub notes: Option<String>,
    /// Order total in euros.
    pub total: f64,
    /// Current status.
    pub status: OrderStatus,
    /// Predicted delivery date, when the city is on a route.
    pub delivery_date: Option<NaiveDate>,
    /// Weekday label of `delivery_date`.
    pub delivery_day: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last status change.
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Quote request from a business customer.
pub struct OfferRequest {
    /// Company name.
    pub empresa: String,
    /// Contact person.
    pub nombre: String,
    /// Contact phone.
    pub telefono: String,
    /// Contact email.
    pub email: String,
    /// Province id, or `otra`.
    pub ubicacion: String,
    /// Province name when `ubicacion` is `otra`.
    #[serde(default)]
    pub otra_provincia: Option<String>,
    /// City.
    pub ciudad: String,
    /// Product families of interest.
    #[serde(default)]
    pub productos: Vec<String>,
    /// Free-text message.
    #[serde(default)]
    pub mensaje: Option<String>,
}
