use anyhow::Result;
use clap::Args;
use rumors_core::client::ArticleLister;
use rumors_core::config::ApiConfig;
use rumors_core::datalayer::{DataLayer, TriggeredPush};
use rumors_core::list::ListView;
use rumors_core::model::{Article, Edge};
use rumors_core::query::PAGE_SIZE;
use rumors_core::transport::HttpTransport;
use rumors_core::translate;
use rumors_core::vars::ListQueryVars;
use serde::Serialize;
use serde_json::json;
use std::io::{self, Write};
use tracing::info;

use super::args::ListingArgs;
use crate::output::{self, CliError, OutputMode};

/// Arguments for `rumors list`.
#[derive(Args, Debug)]
pub struct ListArgs {
    #[command(flatten)]
    pub listing: ListingArgs,

    /// Number of pages to load (each page holds up to 25 articles).
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u16).range(1..))]
    pub pages: u16,

    /// GraphQL endpoint; overrides the config file and RUMORS_API_URL.
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Write analytics events to stderr as JSON lines.
    #[arg(long)]
    pub events: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ListOutput<'a> {
    page: &'static str,
    variables: &'a ListQueryVars,
    total_count: Option<u64>,
    has_more: bool,
    articles: Vec<&'a Article>,
}

/// Fetch a listing and print its articles.
pub fn run_list(
    args: &ListArgs,
    user: Option<&str>,
    api: &ApiConfig,
    mode: OutputMode,
) -> Result<()> {
    let page = args.listing.page_config()?;
    let params = args.listing.query_params()?;
    let vars = translate(&params, user, &page);

    let mut api = api.clone();
    if let Some(endpoint) = &args.endpoint {
        api.endpoint.clone_from(endpoint);
    }
    let transport = HttpTransport::new(&api);
    info!(
        endpoint = transport.endpoint(),
        page = %page.kind,
        pages = args.pages,
        page_size = PAGE_SIZE,
        "listing articles"
    );

    let mut layer = DataLayer::new();
    TriggeredPush::new(json!({ "event": "userIdentified" })).update(user.is_some(), &mut layer);

    let mut lister = ArticleLister::new(transport);
    lister.open(vars.clone());
    let first_page = lister.orchestrator().edges().len();
    layer.push_event(
        "listLoaded",
        json!({ "page": page.kind.as_str(), "count": first_page }),
    );

    lister.load_pages(usize::from(args.pages));
    let held = lister.orchestrator().edges().len();
    if held > first_page {
        layer.push_event(
            "listLoadedMore",
            json!({ "page": page.kind.as_str(), "count": held }),
        );
    }

    if args.events {
        write_events(&mut layer)?;
    }

    match lister.view() {
        ListView::Failed(err) => {
            let code = err.code();
            output::render_error(mode, &CliError::with_code(err.to_string(), code))?;
            Err(err.clone().into())
        }
        ListView::Ready {
            edges,
            stats,
            has_more,
            ..
        } => {
            let listing = ListOutput {
                page: page.kind.as_str(),
                variables: &vars,
                total_count: stats.and_then(|s| s.total_count),
                has_more,
                articles: edges.iter().map(|e| &e.node).collect(),
            };
            output::render_mode(mode, &listing, write_text, |l, w| write_pretty(l, edges, w))
        }
        ListView::Idle | ListView::Loading => {
            anyhow::bail!("list did not settle after fetching")
        }
    }
}

fn write_events(layer: &mut DataLayer) -> Result<()> {
    let stderr = io::stderr();
    let mut out = stderr.lock();
    for entry in layer.drain() {
        serde_json::to_writer(&mut out, &entry)?;
        writeln!(out)?;
    }
    Ok(())
}

/// First line of an article body, cut to `max` characters.
fn summary(text: Option<&str>, max: usize) -> String {
    let line = text.and_then(|t| t.lines().next()).unwrap_or("").trim();
    if line.chars().count() > max {
        let cut: String = line.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}…")
    } else {
        line.to_string()
    }
}

fn write_text(listing: &ListOutput<'_>, w: &mut dyn Write) -> io::Result<()> {
    for article in &listing.articles {
        writeln!(
            w,
            "{}  requests={}  replies={}  {}",
            article.id,
            article.reply_request_count.unwrap_or(0),
            article.reply_count.unwrap_or(0),
            summary(article.text.as_deref(), 60)
        )?;
    }
    if listing.has_more {
        writeln!(w, "# more available")?;
    }
    Ok(())
}

fn write_pretty(
    listing: &ListOutput<'_>,
    edges: &[Edge<Article>],
    w: &mut dyn Write,
) -> io::Result<()> {
    let order = listing.variables.order_by.field().label();
    output::pretty_section(w, &format!("Articles ({}, {order})", listing.page))?;
    for edge in edges {
        let article = &edge.node;
        writeln!(w, "{}", summary(article.text.as_deref(), 68))?;
        output::pretty_kv(w, "  Id", &article.id)?;
        output::pretty_kv(
            w,
            "  Requests",
            article.reply_request_count.unwrap_or(0).to_string(),
        )?;
        output::pretty_kv(w, "  Replies", article.reply_count.unwrap_or(0).to_string())?;
        if let Some(at) = &article.last_requested_at {
            output::pretty_kv(w, "  Last asked", at)?;
        }
    }
    output::pretty_rule(w)?;
    let total = listing
        .total_count
        .map_or_else(|| "?".to_string(), |n| n.to_string());
    output::pretty_kv(w, "Shown", format!("{} of {total}", edges.len()))?;
    if listing.has_more {
        writeln!(w, "More available; rerun with a larger --pages.")?;
    }
    Ok(())
}
