//! Email bodies for customers and staff.

use serde::{Deserialize, Serialize};

use crate::model::{CONTACT_MESSAGE, CartItem, OfferRequest, Order};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// A composed email, ready for a [`Notifier`](crate::ports::Notifier).
pub struct EmailMessage {
    /// Recipients.
    pub to: Vec<String>,
    /// Subject line.
    pub subject: String,
    /// HTML body.
    pub html: String,
    /// Plain-text body.
    pub text: String,
}

/// Escape text for inclusion in HTML.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Euro amount with a decimal comma, e.g. `12,50 €`.
#[must_use]
pub fn format_euros(amount: f64) -> String {
    format!("{amount:.2} €").replace('.', ",")
}

/// Delivery sentence for an order.
#[must_use]
pub fn delivery_line(order: &Order) -> String {
    match (&order.delivery_day, order.delivery_date) {
        (Some(day), Some(date)) => {
            format!("Tu pedido llegará el {day} {}.", date.format("%d/%m/%Y"))
        }
        _ => CONTACT_MESSAGE.to_owned(),
    }
}

fn short_id(order: &Order) -> &str {
    order.id.get(..8).unwrap_or(&order.id)
}

fn item_lines(order: &Order) -> (String, String) {
    let html = order
        .items
        .iter()
        .map(|item| {
            format!(
                "<li>{} x {} ({}) {}</li>",
                item.quantity,
                escape_html(&item.product_name),
                escape_html(&item.unit),
                item_price(item)
            )
        })
        .collect::<String>();
    let text = order
        .items
        .iter()
        .map(|item| {
            format!(
                "- {} x {} ({}) {}\n",
                item.quantity,
                item.product_name,
                item.unit,
                item_price(item)
            )
        })
        .collect::<String>();
    (format!("<ul>{html}</ul>"), text)
}

fn item_price(item: &CartItem) -> String {
    item.price.map(format_euros).unwrap_or_default()
}

/// Confirmation sent to the customer after an order is stored.
#[must_use]
pub fn order_confirmation(order: &Order) -> EmailMessage {
    let (items_html, items_text) = item_lines(order);
    let delivery = delivery_line(order);
    let total = format_euros(order.total);

    let html = format!(
        "<h2>¡Gracias por tu pedido, {name}!</h2>\
         <p>Hemos recibido tu pedido <strong>#{id}</strong>.</p>\
         {items_html}\
         <p><strong>Total: {total}</strong></p>\
         <p>{delivery}</p>\
         <p>Dirección de entrega: {address}, {city}</p>\
         <p>Aqualan</p>",
        name = escape_html(&order.customer_name),
        id = short_id(order),
        delivery = escape_html(&delivery),
        address = escape_html(&order.delivery_address),
        city = escape_html(&order.delivery_city),
    );
    let text = format!(
        "¡Gracias por tu pedido, {name}!\n\n\
         Pedido #{id}\n{items_text}\nTotal: {total}\n{delivery}\n\
         Dirección de entrega: {address}, {city}\n\nAqualan\n",
        name = order.customer_name,
        id = short_id(order),
        address = order.delivery_address,
        city = order.delivery_city,
    );

    EmailMessage {
        to: vec![order.customer_email.clone()],
        subject: format!("Aqualan - Pedido #{} recibido", short_id(order)),
        html,
        text,
    }
}

/// Alert sent to staff for every new order.
#[must_use]
pub fn staff_order_alert(order: &Order, staff_email: &str) -> EmailMessage {
    let (items_html, items_text) = item_lines(order);
    let delivery = delivery_line(order);
    let notes = order.notes.as_deref().unwrap_or("-");
    let zone = order.delivery_zone.as_deref().unwrap_or("-");
    let total = format_euros(order.total);

    let html = format!(
        "<h2>Nuevo pedido #{id}</h2>\
         <p><strong>Cliente:</strong> {name}<br>\
         <strong>Email:</strong> {email}<br>\
         <strong>Teléfono:</strong> {phone}</p>\
         <p><strong>Dirección:</strong> {address}, {city} ({zone})</p>\
         {items_html}\
         <p><strong>Total: {total}</strong></p>\
         <p><strong>Entrega prevista:</strong> {delivery}</p>\
         <p><strong>Notas:</strong> {notes}</p>",
        id = short_id(order),
        name = escape_html(&order.customer_name),
        email = escape_html(&order.customer_email),
        phone = escape_html(&order.customer_phone),
        address = escape_html(&order.delivery_address),
        city = escape_html(&order.delivery_city),
        zone = escape_html(zone),
        delivery = escape_html(&delivery),
        notes = escape_html(notes),
    );
    let text = format!(
        "Nuevo pedido #{id}\n\nCliente: {name}\nEmail: {email}\nTeléfono: {phone}\n\
         Dirección: {address}, {city} ({zone})\n\n{items_text}\nTotal: {total}\n\
         Entrega prevista: {delivery}\nNotas: {notes}\n",
        id = short_id(order),
        name = order.customer_name,
        email = order.customer_email,
        phone = order.customer_phone,
        address = order.delivery_address,
        city = order.delivery_city,
    );

    EmailMessage {
        to: vec![staff_email.to_owned()],
        subject: format!(
            "Nuevo pedido #{} - {} ({})",
            short_id(order),
            order.customer_name,
            order.delivery_city
        ),
        html,
        text,
    }
}

/// Alert sent to staff for a business quote request.
#[must_use]
pub fn offer_request_alert(offer: &OfferRequest, staff_email: &str) -> EmailMessage {
    let province = match offer.otra_provincia.as_deref() {
        Some(other) if offer.ubicacion == "otra" => other,
        _ => offer.ubicacion.as_str(),
    };
    let products = offer.productos.join(", ");
    let message = offer.mensaje.as_deref().unwrap_or("-");

    let html = format!(
        "<h2>Solicitud de oferta de {company}</h2>\
         <p><strong>Contacto:</strong> {contact}<br>\
         <strong>Teléfono:</strong> {phone}<br>\
         <strong>Email:</strong> {email}</p>\
         <p><strong>Ubicación:</strong> {city} ({province})</p>\
         <p><strong>Productos:</strong> {products}</p>\
         <p><strong>Mensaje:</strong> {message}</p>",
        company = escape_html(&offer.empresa),
        contact = escape_html(&offer.nombre),
        phone = escape_html(&offer.telefono),
        email = escape_html(&offer.email),
        city = escape_html(&offer.ciudad),
        province = escape_html(province),
        products = escape_html(&products),
        message = escape_html(message),
    );
    let text = format!(
        "Solicitud de oferta de {company}\n\nContacto: {contact}\nTeléfono: {phone}\n\
         Email: {email}\nUbicación: {city} ({province})\nProductos: {products}\n\
         Mensaje: {message}\n",
        company = offer.empresa,
        contact = offer.nombre,
        phone = offer.telefono,
        email = offer.email,
        city = offer.ciudad,
    );

    EmailMessage {
        to: vec![staff_email.to_owned()],
        subject: format!("Solicitud de oferta - {}", offer.empresa),
        html,
        text,
    }
}
