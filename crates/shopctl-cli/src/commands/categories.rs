//! Category commands
//!
//! Admin-only screen: list, counters, create/update/delete and the
//! active-status toggle.

use anyhow::Result;
use clap::Subcommand;
use serde::Serialize;
use tabled::Tabled;

use shopctl_core::categories::{create_category, update_category, CategoryBackend};
use shopctl_core::models::Image;
use shopctl_core::{Category, CategoryDraft};

use super::{confirm, ensure_route, Context};
use crate::output::{print_info, print_output, print_success};

const ROUTE: &str = "/dashboard/categories";

#[derive(Subcommand)]
pub enum CategoryAction {
    /// List categories
    List {
        /// Maximum number of categories to fetch
        #[arg(long)]
        limit: Option<i64>,

        /// Only categories at this level (0 = main)
        #[arg(long)]
        level: Option<i64>,
    },

    /// Show category counters
    Stats,

    /// Create a category
    Add {
        name: String,

        #[arg(long)]
        description: Option<String>,

        /// Parent category id (makes this a subcategory)
        #[arg(long)]
        parent: Option<String>,

        /// Image URL
        #[arg(long)]
        image: Option<String>,

        #[arg(long)]
        icon: Option<String>,

        /// Display order
        #[arg(long, default_value_t = 0)]
        order: i64,

        #[arg(long)]
        featured: bool,
    },

    /// Update a category
    Update {
        id: String,

        #[arg(long)]
        name: String,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        parent: Option<String>,

        #[arg(long)]
        image: Option<String>,

        #[arg(long)]
        icon: Option<String>,

        #[arg(long, default_value_t = 0)]
        order: i64,

        #[arg(long)]
        featured: bool,
    },

    /// Delete a category
    Delete { id: String },

    /// Toggle a category between active and inactive
    Toggle { id: String },
}

#[derive(Debug, Serialize, Tabled)]
pub struct CategoryRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Parent")]
    pub parent: String,
    #[tabled(rename = "Level")]
    pub level: i64,
    #[tabled(rename = "Active")]
    pub active: String,
    #[tabled(rename = "Featured")]
    pub featured: String,
}

pub async fn execute(ctx: &mut Context, action: CategoryAction) -> Result<()> {
    ensure_route(ctx, ROUTE)?;

    match action {
        CategoryAction::List { limit, level } => list(ctx, limit, level).await,
        CategoryAction::Stats => stats(ctx).await,
        CategoryAction::Add { name, description, parent, image, icon, order, featured } => {
            let draft = draft(name, description, parent, image, icon, order, featured);
            create_category(&ctx.api, &draft).await?;
            print_success("Category created", ctx.quiet);
            Ok(())
        }
        CategoryAction::Update { id, name, description, parent, image, icon, order, featured } => {
            let draft = draft(name, description, parent, image, icon, order, featured);
            update_category(&ctx.api, &id, &draft).await?;
            print_success("Category updated", ctx.quiet);
            Ok(())
        }
        CategoryAction::Delete { id } => delete(ctx, id).await,
        CategoryAction::Toggle { id } => {
            ctx.api.toggle_status(&id).await?;
            print_success("Category status toggled", ctx.quiet);
            Ok(())
        }
    }
}

async fn list(ctx: &mut Context, limit: Option<i64>, level: Option<i64>) -> Result<()> {
    let categories = CategoryBackend::list(&ctx.api, limit, level).await?;
    let rows: Vec<CategoryRow> = categories.iter().map(category_row).collect();
    print_output(&rows, ctx.format)?;
    Ok(())
}

async fn stats(ctx: &mut Context) -> Result<()> {
    let stats = CategoryBackend::stats(&ctx.api).await?;
    let rows = vec![
        super::dashboard::StatRow { metric: "Total".into(), value: stats.total.to_string() },
        super::dashboard::StatRow { metric: "Active".into(), value: stats.active.to_string() },
        super::dashboard::StatRow {
            metric: "Main Categories".into(),
            value: stats.main_categories.to_string(),
        },
        super::dashboard::StatRow {
            metric: "Subcategories".into(),
            value: stats.subcategories.to_string(),
        },
    ];
    print_output(&rows, ctx.format)?;
    Ok(())
}

async fn delete(ctx: &mut Context, id: String) -> Result<()> {
    if !confirm(&format!("Are you sure you want to delete category {}?", id), ctx.assume_yes)? {
        print_info("Cancelled.", ctx.quiet);
        return Ok(());
    }
    CategoryBackend::delete(&ctx.api, &id).await?;
    print_success("Category deleted", ctx.quiet);
    Ok(())
}

fn draft(
    name: String,
    description: Option<String>,
    parent: Option<String>,
    image: Option<String>,
    icon: Option<String>,
    order: i64,
    featured: bool,
) -> CategoryDraft {
    CategoryDraft {
        name,
        description,
        parent,
        image: image.map(|url| Image { url }),
        icon,
        order,
        is_featured: featured,
    }
}

fn category_row(category: &Category) -> CategoryRow {
    CategoryRow {
        id: category.id.clone(),
        name: category.name.clone(),
        parent: category
            .parent
            .as_ref()
            .map(|p| p.name.clone())
            .unwrap_or_else(|| "-".to_string()),
        level: category.level,
        active: if category.is_active { "yes" } else { "no" }.to_string(),
        featured: if category.is_featured { "yes" } else { "no" }.to_string(),
    }
}
