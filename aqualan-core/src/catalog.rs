//! Built-in catalog: categories, delivery zones, and the seed product list.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::model::{Category, DeliveryZone, Product};

struct SeedProduct {
    name: &'static str,
    description: &'static str,
    category: &'static str,
    subcategory: Option<&'static str>,
    price: f64,
    unit: &'static str,
    image: &'static str,
    capacity: Option<&'static str>,
    brand: Option<&'static str>,
}

const IMG_BOTTLE: &str = "https://images.unsplash.com/photo-1558640476-437a2b9438a2?w=400";
const IMG_BLUE: &str = "https://images.unsplash.com/photo-1637905351378-67232a5f0c9b?w=400";
const IMG_BOX: &str = "https://images.unsplash.com/photo-1639256150782-ecdb00b01e84?w=400";
const IMG_GLASS: &str = "https://images.unsplash.com/photo-1591656927346-5c8e933b966d?w=400";

const SAN_ANDRES: Option<&str> = Some("San Andrés");
const ALZOLA: Option<&str> = Some("Alzola");

const SEED: &[SeedProduct] = &[
    SeedProduct {
        name: "Botellón 19L San Andrés",
        description: "Botellón PET de 19 litros con asa incorporada. Agua mineral natural del manantial de San Andrés de León.",
        category: "botellones",
        subcategory: None,
        price: 6.50,
        unit: "unidad",
        image: IMG_BOTTLE,
        capacity: Some("19L"),
        brand: SAN_ANDRES,
    },
    SeedProduct {
        name: "Botellón 12L San Andrés",
        description: "Botellón PET de 12 litros color azul. Formato cómodo y manejable gracias a su bajo peso.",
        category: "botellones",
        subcategory: None,
        price: 4.50,
        unit: "unidad",
        image: IMG_BLUE,
        capacity: Some("12L"),
        brand: SAN_ANDRES,
    },
    SeedProduct {
        name: "Ecobox 5L Alzola",
        description: "Bag in box de sobremesa. Tamaño práctico de 5 litros para hidratarse en cualquier lugar.",
        category: "ecobox",
        subcategory: None,
        price: 3.90,
        unit: "unidad",
        image: IMG_BOX,
        capacity: Some("5L"),
        brand: ALZOLA,
    },
    SeedProduct {
        name: "Ecobox 15L Alzola",
        description: "Bag in box ecológico compatible con adaptadores Water Kit Vitop para coolers.",
        category: "ecobox",
        subcategory: None,
        price: 9.50,
        unit: "unidad",
        image: IMG_GLASS,
        capacity: Some("15L"),
        brand: ALZOLA,
    },
    SeedProduct {
        name: "Adaptador Water Kit Vitop",
        description: "Adaptador con bandeja para acoplar el Ecobox a fuentes dispensadoras.",
        category: "ecobox",
        subcategory: Some("accesorios"),
        price: 25.00,
        unit: "unidad",
        image: IMG_BOTTLE,
        capacity: None,
        brand: None,
    },
    SeedProduct {
        name: "Botellín 0.33L Alzola",
        description: "Formato de 0,33L ideal para reuniones de empresa. Agua mineral Alzola Basque Water.",
        category: "botellines",
        subcategory: None,
        price: 0.60,
        unit: "unidad",
        image: IMG_BOX,
        capacity: Some("0.33L"),
        brand: ALZOLA,
    },
    SeedProduct {
        name: "Botellín 0.5L Alzola",
        description: "Formato de 0,5L perfecto para reuniones y deporte.",
        category: "botellines",
        subcategory: None,
        price: 0.75,
        unit: "unidad",
        image: IMG_BLUE,
        capacity: Some("0.5L"),
        brand: ALZOLA,
    },
    SeedProduct {
        name: "Botellín 0.5L San Andrés",
        description: "Agua mineral San Andrés en formato 0,5L, baja en sodio.",
        category: "botellines",
        subcategory: None,
        price: 0.70,
        unit: "unidad",
        image: IMG_GLASS,
        capacity: Some("0.5L"),
        brand: SAN_ANDRES,
    },
    SeedProduct {
        name: "Botella 1.5L San Andrés",
        description: "Formato 1,5L para desplazamientos y actividades prolongadas.",
        category: "botellines",
        subcategory: None,
        price: 0.95,
        unit: "unidad",
        image: IMG_BOTTLE,
        capacity: Some("1.5L"),
        brand: SAN_ANDRES,
    },
    SeedProduct {
        name: "Dispensador Agua Fría/Caliente",
        description: "Dispensador con función fría y caliente para oficinas y hogares. Incluye instalación.",
        category: "dispensadores",
        subcategory: None,
        price: 150.00,
        unit: "unidad",
        image: IMG_BOTTLE,
        capacity: None,
        brand: None,
    },
    SeedProduct {
        name: "Generador de Ozono",
        description: "Sistema de higienización para dispensadores mediante reacción fotoquímica.",
        category: "dispensadores",
        subcategory: Some("higienizacion"),
        price: 45.00,
        unit: "unidad",
        image: IMG_BLUE,
        capacity: None,
        brand: None,
    },
    SeedProduct {
        name: "Vasos Compostables 220ml",
        description: "Vasos reciclables y compostables de 220ml para infusiones, café y agua. Pack de 100.",
        category: "vasos",
        subcategory: None,
        price: 8.50,
        unit: "pack 100",
        image: IMG_BOX,
        capacity: Some("220ml"),
        brand: None,
    },
    SeedProduct {
        name: "Vasos Plástico Transparente 220ml",
        description: "Vasos desechables transparentes de 220ml. Pack de 100.",
        category: "vasos",
        subcategory: None,
        price: 5.50,
        unit: "pack 100",
        image: IMG_GLASS,
        capacity: Some("220ml"),
        brand: None,
    },
    SeedProduct {
        name: "Dispensador de Vasos",
        description: "Se acopla al lateral del dispensador de agua con los 2 tornillos incluidos.",
        category: "vasos",
        subcategory: Some("accesorios"),
        price: 15.00,
        unit: "unidad",
        image: IMG_BOTTLE,
        capacity: None,
        brand: None,
    },
    SeedProduct {
        name: "Cafetera de Cápsulas Roja",
        description: "Cafetera de cápsulas funcional y sencilla, color rojo.",
        category: "cafe",
        subcategory: None,
        price: 89.00,
        unit: "unidad",
        image: IMG_BLUE,
        capacity: None,
        brand: None,
    },
    SeedProduct {
        name: "Cafetera de Cápsulas Negra",
        description: "Cafetera de cápsulas funcional y sencilla, color negro.",
        category: "cafe",
        subcategory: None,
        price: 89.00,
        unit: "unidad",
        image: IMG_BOX,
        capacity: None,
        brand: None,
    },
    SeedProduct {
        name: "Cápsulas Café Cremoso",
        description: "Caja de 10 cápsulas de aroma cremoso, compatibles con nuestras cafeteras.",
        category: "cafe",
        subcategory: Some("capsulas"),
        price: 4.50,
        unit: "caja 10",
        image: IMG_GLASS,
        capacity: None,
        brand: None,
    },
    SeedProduct {
        name: "Cápsulas Café Intenso",
        description: "Caja de 10 cápsulas de aroma intenso, compatibles con nuestras cafeteras.",
        category: "cafe",
        subcategory: Some("capsulas"),
        price: 4.50,
        unit: "caja 10",
        image: IMG_BLUE,
        capacity: None,
        brand: None,
    },
    SeedProduct {
        name: "Cápsulas Café Descafeinado",
        description: "Caja de 10 cápsulas de café descafeinado.",
        category: "cafe",
        subcategory: Some("capsulas"),
        price: 4.50,
        unit: "caja 10",
        image: IMG_BOX,
        capacity: None,
        brand: None,
    },
    SeedProduct {
        name: "Pack Azúcar + Paletinas",
        description: "Pack de 100 sobres de azúcar con paletinas.",
        category: "cafe",
        subcategory: Some("accesorios"),
        price: 6.00,
        unit: "pack 100",
        image: IMG_BOTTLE,
        capacity: None,
        brand: None,
    },
];

/// Seed products with fresh ids, stamped with `created_at`.
#[must_use]
pub fn seed_products(created_at: DateTime<Utc>) -> Vec<Product> {
    SEED.iter()
        .map(|seed| Product {
            id: Uuid::new_v4().to_string(),
            name: seed.name.to_owned(),
            description: seed.description.to_owned(),
            category: seed.category.to_owned(),
            subcategory: seed.subcategory.map(str::to_owned),
            price: seed.price,
            unit: seed.unit.to_owned(),
            image_url: seed.image.to_owned(),
            capacity: seed.capacity.map(str::to_owned),
            brand: seed.brand.map(str::to_owned),
            available: true,
            created_at,
        })
        .collect()
}

/// Catalog categories in display order.
#[must_use]
pub fn categories() -> Vec<Category> {
    [
        ("botellones", "Botellones", "Botellones de 12L y 19L", "water"),
        ("ecobox", "Ecobox", "Formato bag in box ecológico", "leaf"),
        ("botellines", "Botellines", "Botellas de 0.33L a 1.5L", "flask"),
        ("dispensadores", "Dispensadores", "Dispensadores de agua fría/caliente", "beaker"),
        ("vasos", "Vasos", "Vasos plásticos y compostables", "cup"),
        ("cafe", "Café", "Cafeteras y cápsulas", "cafe"),
    ]
    .into_iter()
    .map(|(id, name, description, icon)| Category {
        id: id.to_owned(),
        name: name.to_owned(),
        description: description.to_owned(),
        icon: icon.to_owned(),
    })
    .collect()
}

/// Provinces the trucks reach.
#[must_use]
pub fn delivery_zones() -> Vec<DeliveryZone> {
    [
        ("bizkaia", "Bizkaia"),
        ("gipuzkoa", "Gipuzkoa"),
        ("alava", "Álava"),
        ("cantabria", "Cantabria"),
        ("navarra", "Navarra"),
    ]
    .into_iter()
    .map(|(id, name)| DeliveryZone {
        id: id.to_owned(),
        name: name.to_owned(),
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn seed_products_belong_to_known_categories() {
        let known: HashSet<String> = categories().into_iter().map(|category| category.id).collect();
        let products = seed_products(Utc::now());
        assert_eq!(products.len(), SEED.len());
        assert!(products.iter().all(|product| known.contains(&product.category)));
        assert!(products.iter().all(|product| product.price > 0.0 && product.available));
    }

    #[test]
    fn seed_ids_are_unique() {
        let products = seed_products(Utc::now());
        let ids: HashSet<&str> = products.iter().map(|product| product.id.as_str()).collect();
        assert_eq!(ids.len(), products.len());
    }

    #[test]
    fn zones_cover_the_five_provinces() {
        let ids: Vec<String> = delivery_zones().into_iter().map(|zone| zone.id).collect();
        assert_eq!(ids, ["bizkaia", "gipuzkoa", "alava", "cantabria", "navarra"]);
    }
}
