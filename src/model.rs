use serde::de::value::StrDeserializer;
use serde::de::{DeserializeOwned, IntoDeserializer};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Number;

use crate::error::ApiError;
use crate::tablecrm::model::NomenclatureItem;

/// Units offered by the product form, keyed by CRM id.
pub const UNITS: &[(i64, &str)] = &[
    (116, "Штука (шт)"),
    (117, "Килограмм (кг)"),
    (118, "Грамм (г)"),
    (119, "Литр (л)"),
    (120, "Миллилитр (мл)"),
    (121, "Метр (м)"),
    (122, "Сантиметр (см)"),
    (123, "Квадратный метр (м²)"),
    (124, "Кубический метр (м³)"),
    (125, "Упаковка (упак)"),
];

pub const UNIT_PIECE: i64 = 116;

pub const DEFAULT_CATEGORY: i64 = 2477;
pub const DEFAULT_GLOBAL_CATEGORY: i64 = 127;

pub fn unit_label(id: i64) -> Option<&'static str> {
    UNITS.iter().find(|(unit, _)| *unit == id).map(|(_, label)| *label)
}

/// Minimum character count for a product name or a text to format.
pub const MIN_INPUT_CHARS: usize = 2;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProductType {
    #[default]
    Product,
    Service,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum CashbackType {
    #[default]
    #[serde(rename = "lcard_cashback")]
    LcardCashback,
    #[serde(rename = "none")]
    Disabled,
}

/// A numeric form field that may arrive as a JSON number or as the raw input string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LooseNumber {
    Number(Number),
    Text(String),
}

impl LooseNumber {
    fn is_blank(&self) -> bool {
        matches!(self, LooseNumber::Text(s) if s.trim().is_empty())
    }

    fn to_f64(&self) -> Option<f64> {
        let v = match self {
            LooseNumber::Number(n) => n.as_f64()?,
            LooseNumber::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        v.is_finite().then_some(v)
    }

    fn to_i64(&self) -> Option<i64> {
        match self {
            LooseNumber::Number(n) => n.as_i64().or_else(|| {
                let f = n.as_f64()?;
                (f.fract() == 0.0 && f.abs() < i64::MAX as f64).then_some(f as i64)
            }),
            LooseNumber::Text(s) => s.trim().parse::<i64>().ok(),
        }
    }
}

/// Keywords arrive either already split or as the comma-separated form input.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Keywords {
    List(Vec<String>),
    Text(String),
}

impl Keywords {
    fn into_vec(self) -> Vec<String> {
        let raw: Vec<String> = match self {
            Keywords::List(list) => list,
            Keywords::Text(text) => text.split(',').map(str::to_owned).collect(),
        };
        raw.into_iter()
            .map(|k| k.trim().to_owned())
            .filter(|k| !k.is_empty())
            .collect()
    }
}

/// A select field the form may submit as `""`, which means "not chosen".
fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => {
            let de: StrDeserializer<'_, serde::de::value::Error> = value.into_deserializer();
            T::deserialize(de).map(Some).map_err(serde::de::Error::custom)
        }
    }
}

/// Body of `POST /api/create-product`: the unpersisted product listing draft.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductDraft {
    pub name: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "blank_as_none")]
    pub product_type: Option<ProductType>,
    pub description_short: Option<String>,
    pub description_long: Option<String>,
    pub code: Option<String>,
    pub unit: Option<LooseNumber>,
    pub category: Option<LooseNumber>,
    pub global_category_id: Option<LooseNumber>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub cashback_type: Option<CashbackType>,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub seo_keywords: Option<Keywords>,
    pub marketplace_price: Option<LooseNumber>,
    pub chatting_percent: Option<LooseNumber>,
    pub address: Option<String>,
    pub latitude: Option<LooseNumber>,
    pub longitude: Option<LooseNumber>,
    pub token: Option<String>,
}

impl ProductDraft {
    /// Request token with blanks treated as absent.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }

    /// Coerce the draft into the record the nomenclature endpoint expects.
    pub fn to_item(&self) -> Result<NomenclatureItem, ApiError> {
        let name = require_name(self.name.as_deref(), "Название товара должно содержать минимум 2 символа")?;

        Ok(NomenclatureItem {
            name: name.to_owned(),
            product_type: self.product_type.unwrap_or_default(),
            description_short: text_or_empty(&self.description_short),
            description_long: text_or_empty(&self.description_long),
            code: text_or_empty(&self.code),
            unit: int_or("unit", &self.unit, UNIT_PIECE)?,
            category: int_or("category", &self.category, DEFAULT_CATEGORY)?,
            cashback_type: self.cashback_type.unwrap_or_default(),
            seo_title: text_or_empty(&self.seo_title),
            seo_description: text_or_empty(&self.seo_description),
            seo_keywords: self
                .seo_keywords
                .clone()
                .map(Keywords::into_vec)
                .unwrap_or_default(),
            global_category_id: int_or(
                "global_category_id",
                &self.global_category_id,
                DEFAULT_GLOBAL_CATEGORY,
            )?,
            marketplace_price: float("marketplace_price", &self.marketplace_price)?.unwrap_or(0.0),
            chatting_percent: float("chatting_percent", &self.chatting_percent)?.unwrap_or(0.0),
            address: text_or_empty(&self.address),
            latitude: float("latitude", &self.latitude)?,
            longitude: float("longitude", &self.longitude)?,
        })
    }
}

/// Reject a missing name or one shorter than [`MIN_INPUT_CHARS`] characters.
pub fn require_name<'a>(name: Option<&'a str>, message: &str) -> Result<&'a str, ApiError> {
    match name {
        Some(n) if n.chars().count() >= MIN_INPUT_CHARS => Ok(n),
        _ => Err(ApiError::validation(message)),
    }
}

fn text_or_empty(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn int_or(field: &str, value: &Option<LooseNumber>, default: i64) -> Result<i64, ApiError> {
    match value {
        None => Ok(default),
        Some(v) if v.is_blank() => Ok(default),
        Some(v) => v
            .to_i64()
            .ok_or_else(|| ApiError::validation(format!("Поле {} должно быть целым числом", field))),
    }
}

fn float(field: &str, value: &Option<LooseNumber>) -> Result<Option<f64>, ApiError> {
    match value {
        None => Ok(None),
        Some(v) if v.is_blank() => Ok(None),
        Some(v) => v
            .to_f64()
            .map(Some)
            .ok_or_else(|| ApiError::validation(format!("Поле {} должно быть числом", field))),
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NameRequest {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeoRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FormatRequest {
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedFields {
    pub description_short: String,
    pub description_long: String,
    pub code: String,
    pub unit: i64,
    pub category: i64,
    pub global_category_id: i64,
    pub marketplace_price: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeoCopy {
    pub seo_title: String,
    pub seo_description: String,
    pub seo_keywords: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategorySuggestion {
    pub category: i64,
    pub global_category_id: i64,
    pub category_name: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattedText {
    pub formatted_text: String,
}
