use crate::model::SeoCopy;

const STORE_BRAND: &str = "TableCRM";
const DESCRIPTION_EXCERPT_CHARS: usize = 120;
const MAX_KEYWORDS: usize = 10;
const MIN_KEYWORD_WORD_CHARS: usize = 4;

/// Marketing terms appended after the name-derived keywords.
const SUFFIX_KEYWORDS: &[&str] = &["купить", "интернет-магазин", "доставка", "гарантия"];

pub fn generate_seo(name: &str, description: Option<&str>) -> SeoCopy {
    SeoCopy {
        seo_title: format!("{} - купить в интернет-магазине | {}", name, STORE_BRAND),
        seo_description: seo_description(name, description),
        seo_keywords: seo_keywords(name),
    }
}

fn seo_description(name: &str, description: Option<&str>) -> String {
    match description.filter(|d| !d.is_empty()) {
        Some(description) => {
            let excerpt: String = description.chars().take(DESCRIPTION_EXCERPT_CHARS).collect();
            format!(
                "Купить {}. {}... Доставка по всей России. Гарантия качества.",
                name, excerpt
            )
        }
        None => format!(
            "Купить {} по выгодной цене. Широкий ассортимент, быстрая доставка, гарантия качества. Заказывайте прямо сейчас!",
            name
        ),
    }
}

/// Full lower-cased name, then its words longer than 3 chars, then the suffix terms.
/// First occurrence wins; at most ten entries.
pub fn seo_keywords(name: &str) -> Vec<String> {
    let lower = name.to_lowercase();
    let words = lower
        .split_whitespace()
        .filter(|w| w.chars().count() >= MIN_KEYWORD_WORD_CHARS)
        .map(str::to_owned);

    let mut keywords: Vec<String> = Vec::with_capacity(MAX_KEYWORDS);
    let candidates = std::iter::once(lower.clone())
        .chain(words)
        .chain(SUFFIX_KEYWORDS.iter().map(|k| (*k).to_owned()));
    for candidate in candidates {
        if keywords.len() == MAX_KEYWORDS {
            break;
        }
        if !keywords.contains(&candidate) {
            keywords.push(candidate);
        }
    }
    keywords
}
