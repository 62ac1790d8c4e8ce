//! showroom — browse a remote catalog from the terminal
//!
//! Usage: `showroom [vehicles|tyres|offers|slides] [search text...]`
//!
//! Loads the collection, applies the search text and prints the first page.

use anyhow::{Context, bail};
use showroom_client::{
    AuthorizationGate, CatalogStore, ClientConfig, ProductFamily, RemoteCatalog, ViewState,
    logger::init_logger,
};
use shared::catalog::CatalogRecord;
use shared::models::{Promotion, Tyre, Vehicle};
use std::sync::Arc;

fn parse_family(arg: Option<&str>) -> anyhow::Result<ProductFamily> {
    Ok(match arg.unwrap_or("vehicles") {
        "vehicles" | "bikes" => ProductFamily::Vehicles,
        "tyres" => ProductFamily::Tyres,
        "offers" => ProductFamily::Offers,
        "slides" | "carousal" => ProductFamily::Slides,
        other => bail!("unknown catalog '{other}' (expected vehicles, tyres, offers or slides)"),
    })
}

async fn browse<R: CatalogRecord>(
    config: &ClientConfig,
    family: ProductFamily,
    search: &str,
) -> anyhow::Result<()> {
    let http = config.build_http_client()?;
    let store: CatalogStore<R> = CatalogStore::new(Arc::new(RemoteCatalog::<R>::new(http, family)));

    store
        .load()
        .await
        .map_err(|e| anyhow::anyhow!(e.to_app_error()))
        .with_context(|| format!("loading {family} from {}", config.base_url))?;

    let mut view = ViewState::new(config.page_size);
    view.set_search(search);

    let records = store.snapshot();
    let page = view.page(&records);
    for record in &page.items {
        let price = record.price_display();
        if price.is_empty() {
            println!("{:<24} {}", record.id(), record.display_name());
        } else {
            println!("{:<24} {} ({})", record.id(), record.display_name(), price);
        }
    }
    if page.has_more() {
        println!("... {} more", page.hidden_count);
    }
    tracing::info!(family = %family, shown = page.items.len(), matched = page.visible_count, "Done");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ClientConfig::from_env();
    init_logger(&config.log_level, config.log_json)?;

    let mut args = std::env::args().skip(1);
    let family = parse_family(args.next().as_deref())?;
    let search = args.collect::<Vec<_>>().join(" ");

    let admin = config.gate().is_admin();
    tracing::info!(family = %family, api = %config.base_url, admin, "Starting showroom");

    match family {
        ProductFamily::Vehicles => browse::<Vehicle>(&config, family, &search).await,
        ProductFamily::Tyres => browse::<Tyre>(&config, family, &search).await,
        ProductFamily::Offers | ProductFamily::Slides => {
            browse::<Promotion>(&config, family, &search).await
        }
    }
}
