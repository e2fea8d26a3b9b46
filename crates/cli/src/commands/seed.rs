//! Seed the store with a demo catalog, banners and settings.

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::info;

use attar_admin::banners::{self, NewBanner};
use attar_admin::products::{self, NewPerfume};
use attar_admin::settings;
use attar_core::Category;
use attar_datastore::{RestStore, StoreConfig};

fn demo_catalog() -> Vec<NewPerfume> {
    let perfume = |name: &str,
                   brand: &str,
                   price: i64,
                   discount: Option<i64>,
                   category: Category,
                   featured: bool| NewPerfume {
        name: name.to_string(),
        brand: brand.to_string(),
        description: format!("{name} by {brand}"),
        price: Decimal::new(price, 0),
        discount_price: discount.map(|d| Decimal::new(d, 0)),
        image_url: format!(
            "https://images.attar.com.bd/{}.jpg",
            name.to_lowercase().replace(' ', "-")
        ),
        category,
        stock: 25,
        featured,
    };

    vec![
        perfume("Oud Royale", "Attar House", 8000, None, Category::Unisex, true),
        perfume("Jasmine Mist", "Bela", 2000, Some(1500), Category::Women, true),
        perfume("Citrus Sky", "Bela", 1200, None, Category::Men, false),
        perfume("Sandal Noir", "Attar House", 5500, Some(4900), Category::Men, false),
        perfume("Rose Dhaka", "Gulab", 1800, None, Category::Women, true),
        perfume("Amber Dusk", "Gulab", 3200, Some(2800), Category::Unisex, false),
    ]
}

/// Run the seed command.
///
/// # Errors
///
/// Returns an error if configuration is missing or any insert fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let store = RestStore::new(&StoreConfig::from_env()?);

    for new in demo_catalog() {
        let perfume = products::create_perfume(&store, new).await?;
        info!(perfume_id = %perfume.id, name = %perfume.name, "seeded perfume");
    }

    let banner = banners::create_banner(
        &store,
        NewBanner {
            title: "Eid Collection".to_string(),
            subtitle: Some("Up to 25% off attars".to_string()),
            image_url: "https://images.attar.com.bd/banners/eid.jpg".to_string(),
            link_url: "/collections/discounted".to_string(),
            active: true,
            position: 1,
        },
    )
    .await?;
    info!(banner_id = %banner.id, "seeded banner");

    settings::put_setting(&store, "store_name", "Attar").await?;
    settings::put_setting(&store, "support_phone", "+8801700000000").await?;
    info!(seeded_at = %Utc::now(), "seed complete");

    Ok(())
}
