//! Command-line front end for the order pipeline.
//!
//! Usage:
//!     orders --input bookings.json list --status in_progress --sort-by amount
//!     orders --input bookings.json stats --format json
//!     curl -s $API/orders | orders attention

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use tailorboard_aggregate::aggregate;
use tailorboard_explain::{attention, deadline_label, summarize};
use tailorboard_model::lenient::parse_timestamp;
use tailorboard_model::{
    records_from_response, Priority, QueryParams, RawRecord, SortBy, SortOrder, StatusCategory,
    ViewRecord, DEFAULT_PAGE_SIZE,
};
use tailorboard_normalize::{normalize_all, NormalizeConfig};
use tailorboard_query::query;

#[derive(Parser)]
#[command(name = "orders")]
#[command(about = "Normalize, query and summarize marketplace orders")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON file with a backend response (reads stdin when omitted)
    #[arg(short, long, global = true)]
    input: Option<PathBuf>,

    /// Reference time for deadlines (defaults to the current time)
    #[arg(long, global = true)]
    now: Option<String>,

    /// Days until the fallback deadline for undated orders
    #[arg(long, global = true, default_value = "7")]
    lead_days: i64,
}

#[derive(Subcommand)]
enum Commands {
    /// Search, filter, sort and page orders
    List {
        /// Case-insensitive search over id, customer and tags
        #[arg(short, long, default_value = "")]
        search: String,

        /// Status category, or "all"
        #[arg(long, default_value = "all")]
        status: String,

        /// Priority (low, medium, high)
        #[arg(long)]
        priority: Option<String>,

        /// Sort key (createdAt, amount, status, customerName, deadline)
        #[arg(long, default_value = "createdAt")]
        sort_by: String,

        /// Sort order (asc, desc)
        #[arg(long, default_value = "desc")]
        order: String,

        #[arg(short, long, default_value = "1")]
        page: usize,

        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        page_size: usize,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Show summary statistics
    Stats {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Print every normalized record as JSON
    Normalize,

    /// List open high-priority orders
    Attention,
}

fn main() -> Result<()> {
    // Logs go to stderr so JSON output stays clean
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("tailorboard=info".parse()?)
                .add_directive("orders=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    let now = match cli.now.as_deref() {
        Some(text) => parse_timestamp(text).with_context(|| format!("invalid --now: {text}"))?,
        None => Utc::now(),
    };
    let config = NormalizeConfig {
        fallback_lead_days: cli.lead_days,
        ..Default::default()
    };

    let raws = load_records(cli.input.as_ref())?;
    tracing::info!(count = raws.len(), now = %now, "loaded raw records");
    let records = normalize_all(&raws, now, &config);

    match cli.command {
        Commands::List {
            search,
            status,
            priority,
            sort_by,
            order,
            page,
            page_size,
            format,
        } => {
            let params = QueryParams {
                search_text: search,
                status_filter: StatusCategory::parse_filter(&status)?,
                priority_filter: priority.as_deref().map(str::parse::<Priority>).transpose()?,
                sort_by: sort_by.parse::<SortBy>()?,
                sort_order: order.parse::<SortOrder>()?,
                page,
                page_size,
            };
            run_list(&records, &params, &format)?;
        }
        Commands::Stats { format } => {
            run_stats(&records, &format)?;
        }
        Commands::Normalize => {
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        Commands::Attention => {
            run_attention(&records);
        }
    }

    Ok(())
}

fn load_records(input: Option<&PathBuf>) -> Result<Vec<RawRecord>> {
    let text = match input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            buf
        }
    };

    let response: serde_json::Value =
        serde_json::from_str(&text).context("input is not valid JSON")?;
    Ok(records_from_response(response))
}

fn run_list(records: &[ViewRecord], params: &QueryParams, format: &str) -> Result<()> {
    let result = query(records, params);

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    if result.items.is_empty() {
        println!("No orders found.");
    }
    for record in &result.items {
        println!(
            "{:<10} {:<24} {:<18} {:<7} {:>10.2}  {:>3}%  {}",
            record.display_id,
            record.customer_name,
            record.status_category.label(),
            record.priority.label(),
            record.amount,
            record.progress_percent,
            deadline_label(record)
        );
        if !record.tags.is_empty() {
            println!("           Tags: {}", record.tags.join(", "));
        }
    }

    println!("---");
    println!(
        "Page {} of {} ({} matching)",
        result.page,
        result.total_pages.max(1),
        result.total_count
    );

    Ok(())
}

fn run_stats(records: &[ViewRecord], format: &str) -> Result<()> {
    let stats = aggregate(records);

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("{}", summarize(&stats));
    println!("---");
    for (status, count) in &stats.count_by_status {
        println!("{:<18} {}", status.label(), count);
    }
    println!("---");
    for (priority, count) in &stats.count_by_priority {
        println!("{:<18} {}", priority.label(), count);
    }

    Ok(())
}

fn run_attention(records: &[ViewRecord]) {
    let notices = attention(records);
    if notices.is_empty() {
        println!("Nothing needs attention.");
        return;
    }

    for (i, notice) in notices.iter().enumerate() {
        println!("{}. {}", i + 1, notice.summary);
        println!("   {}", notice.detail);
    }
}
