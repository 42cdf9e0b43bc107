//! Product corpus records

use serde::{Deserialize, Serialize};

/// One record of the product corpus.
///
/// Loaded once at startup and shared read-only between the database seeder
/// and the load engines, which draw records from it to synthesize request
/// payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub name: String,
    pub description: String,
    pub brand: String,
    pub category: String,
    pub price: f64,
    pub currency: String,
    pub stock: i32,
    pub ean: String,
    pub color: String,
    pub size: String,
    pub availability: String,
    pub internal_id: String,
}

impl ProductRecord {
    /// Header columns every corpus file must carry, in canonical order.
    pub const COLUMNS: [&'static str; 12] = [
        "name",
        "description",
        "brand",
        "category",
        "price",
        "currency",
        "stock",
        "ean",
        "color",
        "size",
        "availability",
        "internal_id",
    ];
}
