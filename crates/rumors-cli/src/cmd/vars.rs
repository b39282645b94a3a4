use anyhow::Result;
use clap::Args;
use rumors_core::translate;
use rumors_core::vars::ListQueryVars;
use std::io::{self, Write};
use tracing::debug;

use super::args::ListingArgs;
use crate::output::{self, OutputMode};

/// Arguments for `rumors vars`.
#[derive(Args, Debug)]
pub struct VarsArgs {
    #[command(flatten)]
    pub listing: ListingArgs,
}

/// Print the `ListArticles` variables a listing translates to.
///
/// Works offline; nothing is fetched.
pub fn run_vars(args: &VarsArgs, user: Option<&str>, mode: OutputMode) -> Result<()> {
    let page = args.listing.page_config()?;
    let params = args.listing.query_params()?;
    let vars = translate(&params, user, &page);
    debug!(page = %page.kind, anonymous = user.is_none(), "translated listing");

    output::render_mode(mode, &vars, write_text, |v, w| write_pretty(v, page.kind.as_str(), w))
}

fn write_text(vars: &ListQueryVars, w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "{}", serde_json::to_string(vars).map_err(io::Error::other)?)
}

fn write_pretty(vars: &ListQueryVars, page: &str, w: &mut dyn Write) -> io::Result<()> {
    output::pretty_section(w, "ListArticles variables")?;
    output::pretty_kv(w, "Page", page)?;
    let field = vars.order_by.field();
    output::pretty_kv(w, "Order", format!("{} ({field})", field.label()))?;
    match &vars.filter {
        Some(filter) => {
            let fields: Vec<&str> = filter.fields().collect();
            output::pretty_kv(w, "Filters", fields.join(", "))?;
        }
        None => output::pretty_kv(w, "Filters", "(none)")?,
    }
    output::pretty_rule(w)?;
    let body = serde_json::to_string_pretty(vars).map_err(io::Error::other)?;
    writeln!(w, "{body}")
}
