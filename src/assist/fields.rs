use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use rand::Rng;
use regex::Regex;

use crate::assist::category::electronics_or_default;
use crate::model::{GeneratedFields, UNIT_PIECE};

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

const CODE_PREFIX: &str = "ART";
const CODE_SLUG_CHARS: usize = 10;

pub const PRICE_MIN: u32 = 500;
pub const PRICE_MAX_EXCLUSIVE: u32 = 5500;

/// Pre-fill the draft from its name. `now` feeds the code suffix, `rng` the price.
pub fn generate_fields<R: Rng>(
    name: &str,
    now: DateTime<Utc>,
    rng: &mut R,
) -> GeneratedFields {
    let lower = name.to_lowercase();
    let category = electronics_or_default(&lower);

    GeneratedFields {
        description_short: short_description(name),
        description_long: long_description(name),
        code: product_code(name, now),
        unit: UNIT_PIECE,
        category: category.category,
        global_category_id: category.global_category_id,
        marketplace_price: rng.gen_range(PRICE_MIN..PRICE_MAX_EXCLUSIVE),
    }
}

fn short_description(name: &str) -> String {
    format!("Качественный {}. Отличное соотношение цены и качества.", name)
}

fn long_description(name: &str) -> String {
    format!(
        "Представляем вашему вниманию {name} - продукт, который сочетает в себе высокое качество и доступную цену. \n\
         \n\
         Основные преимущества:\n\
         • Высокое качество материалов\n\
         • Надежность и долговечность\n\
         • Удобство в использовании\n\
         • Современный дизайн\n\
         \n\
         {name} - это идеальный выбор для тех, кто ценит качество и комфорт."
    )
}

/// `ART-<uppercased name, whitespace runs as '-', first 10 chars>-<last 6 digits of unix ms>`.
pub fn product_code(name: &str, now: DateTime<Utc>) -> String {
    let upper = name.to_uppercase();
    let slug: String = WHITESPACE
        .replace_all(&upper, "-")
        .chars()
        .take(CODE_SLUG_CHARS)
        .collect();
    let suffix = now.timestamp_millis().rem_euclid(1_000_000);
    format!("{}-{}-{:06}", CODE_PREFIX, slug, suffix)
}
