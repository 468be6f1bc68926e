//! Review moderation commands
//!
//! The moderation screen: filtered listing, global counters, the
//! approve/reject decisions, the one-time seller response, and
//! deletion.

use anyhow::{bail, Result};
use clap::Subcommand;
use serde::Serialize;
use tabled::Tabled;

use shopctl_core::guard::page_window;
use shopctl_core::reviews::Moderated;
use shopctl_core::{ModerationDesk, Review, ReviewQuery, ReviewStats, ReviewStatus, SortOrder};

use super::{confirm, ensure_route, Context};
use crate::output::{print_info, print_output, print_success};

const ROUTE: &str = "/dashboard/reviews";

#[derive(Subcommand)]
pub enum ReviewAction {
    /// List reviews
    List {
        /// Filter by status: pending, approved or rejected
        #[arg(long)]
        status: Option<String>,

        /// Filter by star rating (1-5)
        #[arg(long)]
        rating: Option<u8>,

        /// Sort: newest, oldest, rating_high, rating_low or helpful
        #[arg(long)]
        sort: Option<String>,

        /// Search product name, user or review content
        #[arg(long)]
        search: Option<String>,

        #[arg(long, default_value_t = 1)]
        page: i64,
    },

    /// Show the global moderation counters
    Stats,

    /// Approve a review
    Approve { id: String },

    /// Reject a review
    Reject { id: String },

    /// Attach the one-time seller response
    Respond { id: String, message: String },

    /// Permanently delete a review
    Delete { id: String },
}

#[derive(Debug, Serialize, Tabled)]
pub struct ReviewRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Product")]
    pub product: String,
    #[tabled(rename = "User")]
    pub user: String,
    #[tabled(rename = "Rating")]
    pub rating: String,
    #[tabled(rename = "Status")]
    pub status: String,
    #[tabled(rename = "Helpful")]
    pub helpful: i64,
    #[tabled(rename = "Response")]
    pub response: String,
    #[tabled(rename = "Created")]
    pub created: String,
}

pub async fn execute(ctx: &mut Context, action: ReviewAction) -> Result<()> {
    ensure_route(ctx, ROUTE)?;
    let desk = ModerationDesk::new(ctx.api.clone());

    match action {
        ReviewAction::List { status, rating, sort, search, page } => {
            list(ctx, &desk, status, rating, sort, search, page).await
        }
        ReviewAction::Stats => {
            let stats = desk.counters().await?;
            print_output(&stat_rows(&stats), ctx.format)?;
            Ok(())
        }
        ReviewAction::Approve { id } => {
            let out = desk.set_status(&id, ReviewStatus::Approved).await?;
            print_success("Review approved successfully!", ctx.quiet);
            print_output(&stat_rows(&out.stats), ctx.format)?;
            Ok(())
        }
        ReviewAction::Reject { id } => reject(ctx, &desk, id).await,
        ReviewAction::Respond { id, message } => {
            desk.respond(&id, &message).await?;
            print_success("Response added successfully!", ctx.quiet);
            Ok(())
        }
        ReviewAction::Delete { id } => delete(ctx, &desk, id).await,
    }
}

async fn list(
    ctx: &mut Context,
    desk: &ModerationDesk<shopctl_core::ApiClient>,
    status: Option<String>,
    rating: Option<u8>,
    sort: Option<String>,
    search: Option<String>,
    page: i64,
) -> Result<()> {
    let mut query = ReviewQuery::default();
    if let Some(value) = status {
        let Some(status) = ReviewStatus::parse(&value) else {
            bail!("Unknown status: {}. Use pending, approved or rejected", value);
        };
        query = query.with_status(Some(status));
    }
    if let Some(value) = rating {
        query = query.with_rating(Some(value));
    }
    if let Some(value) = sort {
        let Some(sort) = SortOrder::parse(&value) else {
            bail!("Unknown sort: {}. Use newest, oldest, rating_high, rating_low or helpful", value);
        };
        query = query.with_sort(sort);
    }
    if let Some(value) = search {
        query = query.with_search(value);
    }
    // the page applies to the final filter set
    query = query.with_page(page);
    let limit = query.limit;
    let page_no = query.page;
    desk.set_query(query);

    let view = desk.load().await?;
    let rows: Vec<ReviewRow> = view.reviews.iter().map(review_row).collect();
    print_output(&rows, ctx.format)?;

    let (start, end) = page_window(page_no, limit, view.total);
    if view.total > 0 {
        print_info(
            &format!(
                "Showing {} to {} of {} (page {} of {})",
                start, end, view.total, page_no, view.total_pages
            ),
            ctx.quiet,
        );
    }
    Ok(())
}

async fn reject(
    ctx: &mut Context,
    desk: &ModerationDesk<shopctl_core::ApiClient>,
    id: String,
) -> Result<()> {
    if !confirm("Are you sure you want to reject this review?", ctx.assume_yes)? {
        print_info("Cancelled.", ctx.quiet);
        return Ok(());
    }
    let out: Moderated = desk.set_status(&id, ReviewStatus::Rejected).await?;
    print_success("Review rejected", ctx.quiet);
    print_output(&stat_rows(&out.stats), ctx.format)?;
    Ok(())
}

async fn delete(
    ctx: &mut Context,
    desk: &ModerationDesk<shopctl_core::ApiClient>,
    id: String,
) -> Result<()> {
    if !confirm("Are you sure you want to permanently delete this review?", ctx.assume_yes)? {
        print_info("Cancelled.", ctx.quiet);
        return Ok(());
    }
    let out = desk.delete(&id).await?;
    print_success("Review deleted successfully", ctx.quiet);
    print_output(&stat_rows(&out.stats), ctx.format)?;
    Ok(())
}

fn stat_rows(stats: &ReviewStats) -> Vec<super::dashboard::StatRow> {
    vec![
        super::dashboard::StatRow { metric: "Pending".into(), value: stats.pending.to_string() },
        super::dashboard::StatRow { metric: "Approved".into(), value: stats.approved.to_string() },
        super::dashboard::StatRow { metric: "Rejected".into(), value: stats.rejected.to_string() },
        super::dashboard::StatRow { metric: "Total".into(), value: stats.total.to_string() },
    ]
}

fn review_row(review: &Review) -> ReviewRow {
    ReviewRow {
        id: review.id.clone(),
        product: review.product.name.clone(),
        user: review.user.name.clone(),
        rating: format!("{}/5", review.rating),
        status: review.status.to_string(),
        helpful: review.helpful_count,
        response: if review.response.is_some() { "yes" } else { "no" }.to_string(),
        created: review.created_at.format("%Y-%m-%d %H:%M").to_string(),
    }
}
