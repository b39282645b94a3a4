//! Blocking article list client.
//!
//! Runs the tickets of a [`ListOrchestrator`] against a [`GraphqlTransport`].
//! The list query always goes to the network; the stats query is answered
//! from an in-memory cache when the same list was counted before. The cache
//! holds at most [`STATS_CACHE_LIMIT`] lists and starts over when full.

use std::collections::HashMap;

use tracing::debug;

use crate::error::FetchError;
use crate::list::{FetchTicket, ListOrchestrator, ListView, Resolution};
use crate::model::{Article, ListStats};
use crate::query::{self, GraphqlRequest};
use crate::transport::GraphqlTransport;
use crate::vars::ListQueryVars;

/// Lists counted before the stats cache is cleared.
pub const STATS_CACHE_LIMIT: usize = 64;

pub struct ArticleLister<T> {
    transport: T,
    list: ListOrchestrator<Article>,
    stats_cache: HashMap<String, ListStats>,
    stats_cache_limit: usize,
}

impl<T: GraphqlTransport> ArticleLister<T> {
    #[must_use]
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            list: ListOrchestrator::new(),
            stats_cache: HashMap::new(),
            stats_cache_limit: STATS_CACHE_LIMIT,
        }
    }

    /// Cap the stats cache at `limit` lists (at least one).
    #[must_use]
    pub fn with_stats_cache_limit(mut self, limit: usize) -> Self {
        self.stats_cache_limit = limit.max(1);
        self
    }

    /// Show the list selected by `vars`, fetching its first page and stats.
    ///
    /// Does nothing when `vars` selects the list already shown.
    pub fn open(&mut self, vars: ListQueryVars) {
        let Some(refetch) = self.list.set_vars(vars) else {
            return;
        };
        self.run_list(&refetch.list);
        self.run_stats(&refetch.stats);
    }

    /// Refetch the current list from its first page, e.g. after it failed.
    ///
    /// Returns `false` when no list was opened yet.
    pub fn reload(&mut self) -> bool {
        let Some(refetch) = self.list.reload() else {
            return false;
        };
        self.run_list(&refetch.list);
        self.run_stats(&refetch.stats);
        true
    }

    /// Fetch and append the next page.
    ///
    /// Returns `false` when no fetch was issued.
    pub fn load_more(&mut self) -> bool {
        let Some(ticket) = self.list.load_more() else {
            return false;
        };
        self.run_list(&ticket);
        true
    }

    /// Load pages until `max_pages` are held or the list is exhausted.
    pub fn load_pages(&mut self, max_pages: usize) {
        for _ in 1..max_pages {
            if !self.list.has_more() || !self.load_more() {
                break;
            }
            if self.list.error().is_some() {
                break;
            }
        }
    }

    #[must_use]
    pub fn view(&self) -> ListView<'_, Article> {
        self.list.view()
    }

    #[must_use]
    pub const fn orchestrator(&self) -> &ListOrchestrator<Article> {
        &self.list
    }

    fn run_list(&mut self, ticket: &FetchTicket) {
        let result = self
            .transport
            .execute(&GraphqlRequest::list(ticket.vars.clone()))
            .and_then(query::decode_list);
        if self.list.resolve_list(ticket, result) == Resolution::Stale {
            debug!(request = %ticket.id, "list result arrived for an old context");
        }
    }

    fn run_stats(&mut self, ticket: &FetchTicket) {
        let key = ticket.vars.list_key();
        let result = if let Some(cached) = self.stats_cache.get(&key) {
            debug!(request = %ticket.id, "stats served from cache");
            Ok(cached.clone())
        } else {
            self.fetch_stats(&ticket.vars)
        };
        if let Ok(stats) = &result
            && !self.stats_cache.contains_key(&key)
        {
            if self.stats_cache.len() >= self.stats_cache_limit {
                debug!(entries = self.stats_cache.len(), "stats cache full, clearing");
                self.stats_cache.clear();
            }
            self.stats_cache.insert(key, stats.clone());
        }
        self.list.resolve_stats(ticket, result);
    }

    fn fetch_stats(&self, vars: &ListQueryVars) -> Result<ListStats, FetchError> {
        self.transport
            .execute(&GraphqlRequest::stats(vars))
            .and_then(query::decode_stats)
    }
}
