use anyhow::{Context, Result};
use clap::Parser;
use serde_json::json;

use tablecrm_cards::assist;
use tablecrm_cards::model::{unit_label, MIN_INPUT_CHARS};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Print the pre-filled product draft the assist endpoints would produce for a name"
)]
struct Args {
    /// Product name
    #[arg(long)]
    name: String,

    /// Optional description used for the SEO copy
    #[arg(long)]
    description: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();

    let args = Args::parse();
    if args.name.chars().count() < MIN_INPUT_CHARS {
        anyhow::bail!("name must contain at least {} characters", MIN_INPUT_CHARS);
    }

    let fields = assist::generate_fields(&args.name, chrono::Utc::now(), &mut rand::thread_rng());
    let category = assist::suggest_category(&args.name);
    let description = args
        .description
        .as_deref()
        .unwrap_or(fields.description_short.as_str());
    let seo = assist::generate_seo(&args.name, Some(description));

    let draft = json!({
        "name": args.name,
        "type": "product",
        "code": fields.code,
        "description_short": fields.description_short,
        "description_long": fields.description_long,
        "unit": fields.unit,
        "unit_label": unit_label(fields.unit),
        "category": category.category,
        "global_category_id": category.global_category_id,
        "category_name": category.category_name,
        "marketplace_price": fields.marketplace_price,
        "seo_title": seo.seo_title,
        "seo_description": seo.seo_description,
        "seo_keywords": seo.seo_keywords,
    });
    let out = serde_json::to_string_pretty(&draft).context("failed to render draft")?;
    println!("{}", out);
    Ok(())
}
