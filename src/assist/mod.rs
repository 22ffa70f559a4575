//! Deterministic helpers behind the `/api/ai/*` endpoints. Lookup tables and
//! templates only; nothing here calls out to a model.

pub mod category;
pub mod fields;
pub mod format;
pub mod seo;

pub use category::suggest_category;
pub use fields::generate_fields;
pub use format::format_text;
pub use seo::generate_seo;
