use anyhow::Context;
use log::{error, info, warn};
use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::cli::{Cli, Command, Config, load_config};
use crate::render::render_page;
use crate::store::Storefront;
use crate::store::catalog::format_price;
use crate::store::chrome::PageChrome;
use crate::store::endpoint::{HttpEndpoint, StoreEndpoint};
use crate::store::inventory::SyncOutcome;
use crate::store::submit::SubmissionStatus;

pub fn run_app(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(&cli).context("Failed to load configuration")?;
    let http = HttpEndpoint::new(config.endpoint_url()?);
    info!("Store endpoint: {}", http.url());
    let endpoint: Arc<dyn StoreEndpoint> = Arc::new(http);

    match cli.command {
        Command::Render { .. } => render_storefront(&config, endpoint.as_ref()),
        Command::Menu => print_menu(endpoint.as_ref()),
        Command::Order {
            name,
            phone,
            product,
            quantity,
            note,
            ..
        } => {
            let order = OrderInput {
                name,
                phone,
                product,
                quantity,
                note: note.unwrap_or_default(),
            };
            place_order(&config, endpoint, &order).map(|_| ())
        }
    }
}

/// Page load: the storefront with whatever inventory could be read.
fn load_storefront(endpoint: &dyn StoreEndpoint) -> Storefront {
    let mut store = Storefront::new(PageChrome::current());
    if let SyncOutcome::Fallback { reason } = store.load_inventory(endpoint) {
        warn!("Showing the built-in menu ({reason})");
    }
    store
}

fn write_page(store: &Storefront, output_path: &Path) -> anyhow::Result<()> {
    let html = render_page(store)?;
    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.exists() {
            info!("Output directory does not exist, creating: {parent:?}");
            fs::create_dir_all(parent).context("Failed to create output directory")?;
        }
    }
    fs::write(output_path, html).context("Failed to write page")?;
    info!("Generated: {}", output_path.display());
    Ok(())
}

fn render_storefront(config: &Config, endpoint: &dyn StoreEndpoint) -> anyhow::Result<()> {
    let store = load_storefront(endpoint);
    write_page(&store, Path::new(&config.output_path))
}

fn print_menu(endpoint: &dyn StoreEndpoint) -> anyhow::Result<()> {
    let store = load_storefront(endpoint);
    for product in store.catalog().products() {
        println!(
            "{:>3}  {:<32} {:>8}  {}",
            product.id,
            product.name,
            format_price(product.price),
            product.stock_label()
        );
    }
    Ok(())
}

struct OrderInput {
    name: String,
    phone: String,
    product: u32,
    quantity: String,
    note: String,
}

/// Fills and submits the order form. Only form errors fail the command; a
/// failed delivery is reported and logged. The page is written once with the
/// optimistic confirmation and again once the delivery status is known.
fn place_order(
    config: &Config,
    endpoint: Arc<dyn StoreEndpoint>,
    order: &OrderInput,
) -> anyhow::Result<SubmissionStatus> {
    let mut store = load_storefront(endpoint.as_ref());
    store.set_customer(&order.name, &order.phone)?;
    store.select_product(order.product)?;
    let total = store.set_quantity(&order.quantity)?;
    store.set_note(&order.note)?;
    info!("Order total: Q{total}");

    let (confirmation, pending) = store.submit(endpoint).context("Order form was rejected")?;
    println!("Número de orden: {}", confirmation.order_number);
    print!("{}", confirmation.summary);
    write_page(&store, Path::new(&config.output_path))?;

    info!("Waiting for order {} to reach the store", pending.order_number());
    let status = pending.wait();
    match &status {
        SubmissionStatus::Delivered { message } => {
            match message {
                Some(message) => println!("Pedido enviado: {message}"),
                None => println!("Pedido enviado"),
            }
        }
        SubmissionStatus::Failed { reason } => {
            error!("Order {} was not delivered: {reason}", confirmation.order_number);
        }
        SubmissionStatus::NotSent | SubmissionStatus::Pending => {}
    }
    store.record_submission(status.clone());
    write_page(&store, Path::new(&config.output_path))?;
    Ok(status)
}
