//! Product commands
//!
//! Seller/admin screen: the seller's own listings, counters, and the
//! add/edit forms.

use anyhow::Result;
use clap::Subcommand;
use serde::Serialize;
use tabled::Tabled;

use shopctl_core::models::Image;
use shopctl_core::products::{create_product, parse_tags, update_product, ProductBackend};
use shopctl_core::{Product, ProductDraft};

use super::{ensure_route, Context};
use crate::output::{print_output, print_single, print_success};

const ROUTE: &str = "/dashboard/products";

#[derive(Subcommand)]
pub enum ProductAction {
    /// List your products
    List {
        #[arg(long)]
        limit: Option<i64>,

        /// Include inactive products
        #[arg(long)]
        include_inactive: bool,
    },

    /// Show product counters and the per-category breakdown
    Stats,

    /// Show one product
    Show { id: String },

    /// Create a product
    Add {
        name: String,

        #[arg(long)]
        description: String,

        #[arg(long)]
        price: f64,

        #[arg(long, default_value_t = 0)]
        stock: i64,

        /// Category id
        #[arg(long)]
        category: String,

        #[arg(long)]
        subcategory: Option<String>,

        #[arg(long)]
        short_description: Option<String>,

        #[arg(long)]
        discount_price: Option<f64>,

        #[arg(long)]
        sku: Option<String>,

        #[arg(long)]
        brand: Option<String>,

        /// Comma-separated tags
        #[arg(long)]
        tags: Option<String>,

        /// Thumbnail URL
        #[arg(long)]
        thumbnail: Option<String>,

        /// Image URLs (repeatable)
        #[arg(long)]
        image: Vec<String>,

        #[arg(long)]
        featured: bool,
    },

    /// Update a product
    Update {
        id: String,

        #[arg(long)]
        name: String,

        #[arg(long)]
        description: String,

        #[arg(long)]
        price: f64,

        #[arg(long, default_value_t = 0)]
        stock: i64,

        #[arg(long)]
        category: String,

        #[arg(long)]
        subcategory: Option<String>,

        #[arg(long)]
        short_description: Option<String>,

        #[arg(long)]
        discount_price: Option<f64>,

        #[arg(long)]
        sku: Option<String>,

        #[arg(long)]
        brand: Option<String>,

        #[arg(long)]
        tags: Option<String>,

        #[arg(long)]
        thumbnail: Option<String>,

        #[arg(long)]
        image: Vec<String>,

        #[arg(long)]
        featured: bool,
    },
}

#[derive(Debug, Serialize, Tabled)]
pub struct ProductListRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Price")]
    pub price: String,
    #[tabled(rename = "Stock")]
    pub stock: i64,
    #[tabled(rename = "Sold")]
    pub sold: i64,
    #[tabled(rename = "Active")]
    pub active: String,
}

pub async fn execute(ctx: &mut Context, action: ProductAction) -> Result<()> {
    ensure_route(ctx, ROUTE)?;

    match action {
        ProductAction::List { limit, include_inactive } => {
            let products = ctx.api.mine(limit, include_inactive).await?;
            let rows: Vec<ProductListRow> = products.iter().map(product_row).collect();
            print_output(&rows, ctx.format)?;
            Ok(())
        }
        ProductAction::Stats => stats(ctx).await,
        ProductAction::Show { id } => {
            let product = ProductBackend::get(&ctx.api, &id).await?;
            print_single(&product_row(&product), ctx.format)?;
            Ok(())
        }
        ProductAction::Add {
            name, description, price, stock, category, subcategory, short_description,
            discount_price, sku, brand, tags, thumbnail, image, featured,
        } => {
            let draft = draft(
                name, description, price, stock, category, subcategory, short_description,
                discount_price, sku, brand, tags, thumbnail, image, featured,
            );
            create_product(&ctx.api, &draft).await?;
            print_success("Product created", ctx.quiet);
            Ok(())
        }
        ProductAction::Update {
            id, name, description, price, stock, category, subcategory, short_description,
            discount_price, sku, brand, tags, thumbnail, image, featured,
        } => {
            let draft = draft(
                name, description, price, stock, category, subcategory, short_description,
                discount_price, sku, brand, tags, thumbnail, image, featured,
            );
            update_product(&ctx.api, &id, &draft).await?;
            print_success("Product updated", ctx.quiet);
            Ok(())
        }
    }
}

async fn stats(ctx: &mut Context) -> Result<()> {
    let bundle = ProductBackend::stats(&ctx.api).await?;
    let stats = bundle.stats;
    let rows = vec![
        super::dashboard::StatRow {
            metric: "Total Products".into(),
            value: stats.total_products.to_string(),
        },
        super::dashboard::StatRow {
            metric: "Active Products".into(),
            value: stats.active_products.to_string(),
        },
        super::dashboard::StatRow {
            metric: "Average Price".into(),
            value: format!("${:.2}", stats.average_price),
        },
        super::dashboard::StatRow {
            metric: "Total Stock".into(),
            value: stats.total_stock.to_string(),
        },
        super::dashboard::StatRow {
            metric: "Total Sold".into(),
            value: stats.total_sold.to_string(),
        },
    ];
    print_output(&rows, ctx.format)?;
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn draft(
    name: String,
    description: String,
    price: f64,
    stock: i64,
    category: String,
    subcategory: Option<String>,
    short_description: Option<String>,
    discount_price: Option<f64>,
    sku: Option<String>,
    brand: Option<String>,
    tags: Option<String>,
    thumbnail: Option<String>,
    images: Vec<String>,
    featured: bool,
) -> ProductDraft {
    ProductDraft {
        name,
        description,
        short_description,
        price,
        discount_price,
        stock,
        sku,
        brand,
        category,
        subcategory,
        tags: tags.map(|t| parse_tags(&t)).unwrap_or_default(),
        thumbnail,
        images: images.into_iter().map(|url| Image { url }).collect(),
        is_featured: featured,
    }
}

fn product_row(product: &Product) -> ProductListRow {
    ProductListRow {
        id: product.id.clone(),
        name: product.name.clone(),
        price: match product.discount_price {
            Some(discount) => format!("${:.2} (was ${:.2})", discount, product.price),
            None => format!("${:.2}", product.price),
        },
        stock: product.stock,
        sold: product.sold,
        active: if product.is_active { "yes" } else { "no" }.to_string(),
    }
}
