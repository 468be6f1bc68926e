//! Dashboard command
//!
//! The summary screen: product counters, recent products, and for
//! admins the category counters and per-category breakdown.

use anyhow::Result;
use serde::Serialize;
use tabled::Tabled;

use shopctl_core::categories::CategoryBackend;
use shopctl_core::products::{low_stock_count, ProductBackend};
use shopctl_core::{Product, Role};

use super::{ensure_route, Context};
use crate::output::{print_info, print_output};

#[derive(Debug, Serialize, Tabled)]
pub struct StatRow {
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

#[derive(Debug, Serialize, Tabled)]
pub struct ProductRow {
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Price")]
    pub price: String,
    #[tabled(rename = "Stock")]
    pub stock: i64,
    #[tabled(rename = "Status")]
    pub status: String,
}

#[derive(Debug, Serialize, Tabled)]
pub struct CategoryShareRow {
    #[tabled(rename = "Category")]
    pub category: String,
    #[tabled(rename = "Products")]
    pub count: i64,
    #[tabled(rename = "Share")]
    pub share: String,
}

pub async fn execute(ctx: &mut Context) -> Result<()> {
    let user = ensure_route(ctx, "/dashboard")?;

    let bundle = ProductBackend::stats(&ctx.api).await?;
    let recent = ctx.api.mine(Some(5), true).await?;

    let stats = bundle.stats;
    let rows = vec![
        StatRow { metric: "Total Products".into(), value: stats.total_products.to_string() },
        StatRow { metric: "Active Products".into(), value: stats.active_products.to_string() },
        StatRow { metric: "Average Price".into(), value: format!("${:.2}", stats.average_price) },
        StatRow { metric: "Total Stock".into(), value: stats.total_stock.to_string() },
        StatRow { metric: "Total Sold".into(), value: stats.total_sold.to_string() },
        StatRow { metric: "Low Stock".into(), value: low_stock_count(&recent).to_string() },
    ];
    print_output(&rows, ctx.format)?;

    if user.role == Role::Admin {
        let category_stats = CategoryBackend::stats(&ctx.api).await?;
        let rows = vec![
            StatRow { metric: "Total Categories".into(), value: category_stats.total.to_string() },
            StatRow { metric: "Active Categories".into(), value: category_stats.active.to_string() },
            StatRow { metric: "Main Categories".into(), value: category_stats.main_categories.to_string() },
            StatRow { metric: "Subcategories".into(), value: category_stats.subcategories.to_string() },
        ];
        print_output(&rows, ctx.format)?;
    }

    if !bundle.by_category.is_empty() {
        let total = stats.total_products.max(1);
        let rows: Vec<CategoryShareRow> = bundle
            .by_category
            .iter()
            .map(|entry| CategoryShareRow {
                category: entry.name.clone(),
                count: entry.count,
                share: format!("{:.1}%", entry.count as f64 / total as f64 * 100.0),
            })
            .collect();
        print_output(&rows, ctx.format)?;
    }

    print_info("Recent products:", ctx.quiet);
    let rows: Vec<ProductRow> = recent.iter().map(product_row).collect();
    print_output(&rows, ctx.format)?;

    Ok(())
}

fn product_row(product: &Product) -> ProductRow {
    ProductRow {
        name: product.name.clone(),
        price: match product.discount_price {
            Some(discount) => format!("${:.2} (was ${:.2})", discount, product.price),
            None => format!("${:.2}", product.price),
        },
        stock: product.stock,
        status: if product.is_active { "active" } else { "inactive" }.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(json: serde_json::Value) -> Product {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_product_row_shows_discount() {
        let p = product(serde_json::json!({
            "_id": "p1", "name": "Mug", "price": 12.0, "discountPrice": 9.5, "stock": 3
        }));
        let row = product_row(&p);
        assert_eq!(row.price, "$9.50 (was $12.00)");
        assert_eq!(row.status, "active");
    }

    #[test]
    fn test_product_row_inactive() {
        let p = product(serde_json::json!({
            "_id": "p1", "name": "Mug", "price": 12.0, "isActive": false
        }));
        assert_eq!(product_row(&p).status, "inactive");
    }
}
