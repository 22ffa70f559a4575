use crate::model::{CategorySuggestion, DEFAULT_CATEGORY, DEFAULT_GLOBAL_CATEGORY};

const ELECTRONICS: CategorySuggestion = CategorySuggestion {
    category: 2477,
    global_category_id: 127,
    category_name: "Электроника",
};

pub const DEFAULT_SUGGESTION: CategorySuggestion = CategorySuggestion {
    category: DEFAULT_CATEGORY,
    global_category_id: DEFAULT_GLOBAL_CATEGORY,
    category_name: "Другое",
};

/// Substring match table, scanned in order; first hit wins.
pub const CATEGORY_TABLE: &[(&str, CategorySuggestion)] = &[
    ("телефон", ELECTRONICS),
    ("смартфон", ELECTRONICS),
    ("ноутбук", ELECTRONICS),
    ("компьютер", ELECTRONICS),
    (
        "одежда",
        CategorySuggestion { category: 2477, global_category_id: 128, category_name: "Одежда" },
    ),
    (
        "обувь",
        CategorySuggestion { category: 2477, global_category_id: 128, category_name: "Обувь" },
    ),
    (
        "еда",
        CategorySuggestion { category: 2477, global_category_id: 129, category_name: "Продукты питания" },
    ),
    (
        "продукт",
        CategorySuggestion { category: 2477, global_category_id: 129, category_name: "Продукты питания" },
    ),
    (
        "мебель",
        CategorySuggestion { category: 2477, global_category_id: 130, category_name: "Мебель" },
    ),
    (
        "книга",
        CategorySuggestion { category: 2477, global_category_id: 131, category_name: "Книги" },
    ),
];

/// Keywords that generate-fields treats as electronics.
pub(crate) const ELECTRONICS_KEYWORDS: &[&str] = &["телефон", "смартфон", "ноутбук", "компьютер"];

pub fn suggest_category(name: &str) -> CategorySuggestion {
    let lower = name.to_lowercase();
    CATEGORY_TABLE
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|(_, suggestion)| *suggestion)
        .unwrap_or(DEFAULT_SUGGESTION)
}

/// Electronics category when the name mentions a device, defaults otherwise.
pub(crate) fn electronics_or_default(name_lower: &str) -> CategorySuggestion {
    if ELECTRONICS_KEYWORDS.iter().any(|k| name_lower.contains(k)) {
        ELECTRONICS
    } else {
        DEFAULT_SUGGESTION
    }
}
