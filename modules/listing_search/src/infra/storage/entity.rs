//! Listing record as stored in a JSON fixture or exported from the listings table

use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize)]
pub struct ListingRecord {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub teaser: Option<String>,
    /// "operational" or "digital"
    pub mode: String,
    pub category_code: String,
    #[serde(default)]
    pub subcategory_code: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub asking_price: Option<f64>,
    #[serde(default)]
    pub revenue: Option<f64>,
    #[serde(default)]
    pub ebitda: Option<f64>,
    #[serde(default)]
    pub mrr: Option<f64>,
    #[serde(default)]
    pub churn_rate: Option<f64>,
    #[serde(default)]
    pub verified: bool,
    pub created_at: DateTime<Utc>,
}
