use anyhow::Context as _;
use rust_embed::RustEmbed;
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::store::Storefront;
use crate::store::catalog::{StockBand, format_price};
use crate::store::form::FormStage;

#[derive(RustEmbed)]
#[folder = "templates/"]
pub struct Asset;

const TEMPLATES: [&str; 4] = [
    "page.html.tera",
    "menu.html.tera",
    "order_form.html.tera",
    "confirmation.html.tera",
];

pub fn register_tera_filters(tera: &mut Tera) {
    use convert_case::{Case, Casing};
    tera.register_filter(
        "kebabcase",
        move |value: &tera::Value, _: &HashMap<String, tera::Value>| {
            let s = match value.as_str() {
                Some(s) => s,
                None => {
                    return Err(tera::Error::msg(
                        "kebabcase filter can only be used on strings",
                    ));
                }
            };
            Ok(tera::Value::String(s.to_case(Case::Kebab)))
        },
    );
    tera.register_filter(
        "money",
        move |value: &tera::Value, _: &HashMap<String, tera::Value>| {
            let amount = match value.as_f64() {
                Some(amount) => amount,
                None => {
                    return Err(tera::Error::msg("money filter can only be used on numbers"));
                }
            };
            Ok(tera::Value::String(format_price(amount)))
        },
    );
}

fn load_templates() -> anyhow::Result<Tera> {
    let mut tera = Tera::default();
    register_tera_filters(&mut tera);
    let mut sources = Vec::with_capacity(TEMPLATES.len());
    for name in TEMPLATES {
        let file = Asset::get(name).with_context(|| format!("Missing embedded template {name}"))?;
        let source = std::str::from_utf8(file.data.as_ref())
            .with_context(|| format!("Template {name} is not valid UTF-8"))?
            .to_string();
        sources.push((name, source));
    }
    tera.add_raw_templates(sources)
        .context("Failed to compile page templates")?;
    tera.autoescape_on(vec![".html.tera"]);
    Ok(tera)
}

#[derive(Serialize)]
struct MenuCard<'a> {
    name: &'a str,
    description: &'a str,
    price: f64,
    image_url: &'a str,
    stock_band: StockBand,
    stock_label: String,
}

#[derive(Serialize)]
struct OptionView {
    id: u32,
    label: String,
    data_price: String,
    selected: bool,
}

#[derive(Serialize)]
struct SummaryLine {
    label: &'static str,
    value: String,
}

fn menu_cards(store: &Storefront) -> Vec<MenuCard<'_>> {
    store
        .catalog()
        .products()
        .iter()
        .map(|p| MenuCard {
            name: &p.name,
            description: &p.description,
            price: p.price,
            image_url: &p.image_url,
            stock_band: p.stock_band(),
            stock_label: p.stock_label(),
        })
        .collect()
}

fn option_views(store: &Storefront) -> Vec<OptionView> {
    let selected = store.form().draft().product_id;
    store
        .product_options()
        .into_iter()
        .map(|o| OptionView {
            id: o.id,
            data_price: o.price.to_string(),
            selected: selected == Some(o.id),
            label: o.label,
        })
        .collect()
}

/// Builds the template context for the current storefront state.
fn page_context(store: &Storefront) -> Context {
    let form = store.form();
    let draft = form.draft();

    let mut context = Context::new();
    context.insert("loading", &store.is_loading());
    context.insert("products", &menu_cards(store));
    context.insert("options", &option_views(store));
    context.insert("draft", draft);
    context.insert(
        "unit_price",
        &draft.unit_price.map(|p| p.to_string()).unwrap_or_default(),
    );
    context.insert("total", &draft.total_display());
    context.insert("editing", &(form.stage() == FormStage::Editing));
    context.insert("submission", store.submission().state());
    context.insert("chrome", store.chrome());

    if let Some(confirmation) = form.confirmation() {
        let lines: Vec<SummaryLine> = confirmation
            .summary
            .lines()
            .into_iter()
            .map(|(label, value)| SummaryLine { label, value })
            .collect();
        context.insert("order_number", confirmation.order_number.as_str());
        context.insert("summary", &lines);
    }
    context
}

/// Renders the whole storefront page for `store`. Pure: same state, same HTML.
pub fn render_page(store: &Storefront) -> anyhow::Result<String> {
    let tera = load_templates()?;
    tera.render("page.html.tera", &page_context(store))
        .context("Failed to render storefront page")
}
