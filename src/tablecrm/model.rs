use serde::Serialize;

use crate::model::{CashbackType, ProductType};

/// One record of the nomenclature create request. The endpoint takes a list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NomenclatureItem {
    pub name: String,
    #[serde(rename = "type")]
    pub product_type: ProductType,
    pub description_short: String,
    pub description_long: String,
    pub code: String,
    pub unit: i64,
    pub category: i64,
    pub cashback_type: CashbackType,
    pub seo_title: String,
    pub seo_description: String,
    pub seo_keywords: Vec<String>,
    pub global_category_id: i64,
    pub marketplace_price: f64,
    pub chatting_percent: f64,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Raw reply from the nomenclature endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamReply {
    pub status: u16,
    pub body: String,
}

impl UpstreamReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
