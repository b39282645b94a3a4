//! List orchestration: which fetch to issue next and what to do with its result.
//!
//! [`ListOrchestrator`] performs no I/O. It hands out [`FetchTicket`]s and
//! accepts their results through `resolve_*`. Every ticket carries the
//! [`ContextId`] of the filter/order it was issued for plus its own
//! [`RequestId`]; a result whose ticket no longer matches the current context
//! or the pending request is discarded, whatever order results arrive in.

use std::fmt;

use tracing::{debug, info, warn};

use crate::error::FetchError;
use crate::model::{Connection, Edge, ListStats};
use crate::vars::ListQueryVars;

/// Version of the current `{filter, orderBy}`; bumped on every change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ContextId(u64);

/// Identity of one issued fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(u64);

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ctx#{}", self.0)
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "req#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchKind {
    /// First page of a filter context; replaces accumulated edges.
    Initial,
    /// Next page; appended to accumulated edges.
    More,
    /// Stats-only query (page info and total count).
    Stats,
}

/// A fetch the caller must perform and then hand back via `resolve_*`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub id: RequestId,
    pub context: ContextId,
    pub kind: FetchKind,
    pub vars: ListQueryVars,
}

/// Fetches issued for a new filter context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Refetch {
    pub list: FetchTicket,
    pub stats: FetchTicket,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Ready,
    LoadingMore,
    Failed,
}

/// Outcome of handing a result back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Applied,
    /// Ticket belonged to an older context or a superseded request.
    Stale,
}

/// What a list page should show right now.
#[derive(Debug, PartialEq, Eq)]
pub enum ListView<'a, T> {
    Idle,
    /// First page still loading.
    Loading,
    Failed(&'a FetchError),
    Ready {
        edges: &'a [Edge<T>],
        stats: Option<&'a ListStats>,
        /// A load-more fetch is in flight.
        loading: bool,
        has_more: bool,
    },
}

/// Whether a "load more" control should be offered.
///
/// Never while loading or with nothing loaded. With the stats' last cursor
/// known, more exists until the last held edge carries it; otherwise the
/// total count decides. Without stats, nothing more is offered.
#[must_use]
pub fn has_more<T>(edges: &[Edge<T>], stats: Option<&ListStats>, loading: bool) -> bool {
    let Some(last) = edges.last() else {
        return false;
    };
    if loading {
        return false;
    }
    let Some(stats) = stats else {
        return false;
    };
    if let Some(last_cursor) = stats.page_info.last_cursor.as_deref() {
        return last.cursor != last_cursor;
    }
    stats
        .total_count
        .is_some_and(|total| (edges.len() as u64) < total)
}

#[derive(Debug)]
pub struct ListOrchestrator<T> {
    vars: Option<ListQueryVars>,
    context: ContextId,
    next_request: u64,
    edges: Vec<Edge<T>>,
    stats: Option<ListStats>,
    error: Option<FetchError>,
    pending_list: Option<(RequestId, FetchKind)>,
    pending_stats: Option<RequestId>,
}

impl<T> Default for ListOrchestrator<T> {
    fn default() -> Self {
        Self {
            vars: None,
            context: ContextId::default(),
            next_request: 0,
            edges: Vec::new(),
            stats: None,
            error: None,
            pending_list: None,
            pending_stats: None,
        }
    }
}

impl<T> ListOrchestrator<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Point the list at `vars`.
    ///
    /// Returns the first-page and stats fetches when this starts a new
    /// context, and `None` when `vars` selects the list already shown. A new
    /// context drops every accumulated edge, stats and error immediately.
    pub fn set_vars(&mut self, vars: ListQueryVars) -> Option<Refetch> {
        let vars = vars.first_page();
        if self.vars.as_ref().is_some_and(|current| current.same_list(&vars)) {
            return None;
        }
        Some(self.start_context(vars))
    }

    /// Refetch the current list from its first page in a fresh context.
    ///
    /// The only way back from a failed first page, since `set_vars` with the
    /// same vars is a no-op and `load_more` needs a held edge. Results of the
    /// old context become stale. `None` before any vars are set.
    pub fn reload(&mut self) -> Option<Refetch> {
        let vars = self.vars.clone()?;
        Some(self.start_context(vars))
    }

    fn start_context(&mut self, vars: ListQueryVars) -> Refetch {
        self.context = ContextId(self.context.0 + 1);
        self.edges.clear();
        self.stats = None;
        self.error = None;

        let list = self.issue(FetchKind::Initial, vars.clone());
        let stats = self.issue(FetchKind::Stats, vars.clone());
        self.pending_list = Some((list.id, FetchKind::Initial));
        self.pending_stats = Some(stats.id);
        self.vars = Some(vars);

        debug!(context = %self.context, list = %list.id, stats = %stats.id, "new list context");
        Refetch { list, stats }
    }

    /// Fetch the page after the last held edge.
    ///
    /// `None` while any list fetch is in flight or before anything is held.
    pub fn load_more(&mut self) -> Option<FetchTicket> {
        if self.pending_list.is_some() {
            debug!(context = %self.context, "load more ignored: list fetch in flight");
            return None;
        }
        let cursor = self.edges.last()?.cursor.clone();
        let vars = self.vars.as_ref()?.continue_after(cursor);

        self.error = None;
        let ticket = self.issue(FetchKind::More, vars);
        self.pending_list = Some((ticket.id, FetchKind::More));
        debug!(context = %self.context, request = %ticket.id, "load more");
        Some(ticket)
    }

    /// Hand back the result of an `Initial` or `More` ticket.
    pub fn resolve_list(
        &mut self,
        ticket: &FetchTicket,
        result: Result<Connection<T>, FetchError>,
    ) -> Resolution {
        if ticket.context != self.context
            || self.pending_list.map(|(id, _)| id) != Some(ticket.id)
        {
            debug!(
                request = %ticket.id,
                ticket_context = %ticket.context,
                context = %self.context,
                "discarding stale list result"
            );
            return Resolution::Stale;
        }
        self.pending_list = None;

        match result {
            Ok(page) => {
                let received = page.edges.len();
                match ticket.kind {
                    FetchKind::More => self.edges.extend(page.edges),
                    FetchKind::Initial | FetchKind::Stats => self.edges = page.edges,
                }
                info!(
                    context = %self.context,
                    received,
                    held = self.edges.len(),
                    "list page applied"
                );
            }
            Err(err) => {
                warn!(context = %self.context, code = %err.code(), "list fetch failed: {err}");
                self.error = Some(err);
            }
        }
        Resolution::Applied
    }

    /// Hand back the result of a `Stats` ticket.
    ///
    /// A failed stats fetch only leaves stats empty.
    pub fn resolve_stats(
        &mut self,
        ticket: &FetchTicket,
        result: Result<ListStats, FetchError>,
    ) -> Resolution {
        if ticket.context != self.context || self.pending_stats != Some(ticket.id) {
            debug!(request = %ticket.id, "discarding stale stats result");
            return Resolution::Stale;
        }
        self.pending_stats = None;

        match result {
            Ok(stats) => self.stats = Some(stats),
            Err(err) => {
                warn!(context = %self.context, "stats fetch failed: {err}");
                self.stats = None;
            }
        }
        Resolution::Applied
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        match self.pending_list {
            Some((_, FetchKind::More)) => Phase::LoadingMore,
            Some(_) => Phase::Loading,
            None if self.error.is_some() => Phase::Failed,
            None if self.vars.is_none() => Phase::Idle,
            None => Phase::Ready,
        }
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.pending_list.is_some()
    }

    #[must_use]
    pub const fn context(&self) -> ContextId {
        self.context
    }

    #[must_use]
    pub const fn vars(&self) -> Option<&ListQueryVars> {
        self.vars.as_ref()
    }

    #[must_use]
    pub fn edges(&self) -> &[Edge<T>] {
        &self.edges
    }

    #[must_use]
    pub const fn stats(&self) -> Option<&ListStats> {
        self.stats.as_ref()
    }

    #[must_use]
    pub const fn error(&self) -> Option<&FetchError> {
        self.error.as_ref()
    }

    #[must_use]
    pub fn has_more(&self) -> bool {
        has_more(&self.edges, self.stats.as_ref(), self.is_loading())
    }

    /// Loading-with-nothing-held first, then error, then the list.
    #[must_use]
    pub fn view(&self) -> ListView<'_, T> {
        if self.vars.is_none() {
            return ListView::Idle;
        }
        let loading = self.is_loading();
        if loading && self.edges.is_empty() {
            return ListView::Loading;
        }
        if let Some(err) = &self.error {
            return ListView::Failed(err);
        }
        ListView::Ready {
            edges: &self.edges,
            stats: self.stats.as_ref(),
            loading,
            has_more: self.has_more(),
        }
    }

    fn issue(&mut self, kind: FetchKind, vars: ListQueryVars) -> FetchTicket {
        self.next_request += 1;
        FetchTicket {
            id: RequestId(self.next_request),
            context: self.context,
            kind,
            vars,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PageInfo;
    use crate::order::{OrderField, OrderSpec};

    fn vars(field: OrderField) -> ListQueryVars {
        ListQueryVars::new(None, OrderSpec::desc(field))
    }

    fn page(cursors: &[&str]) -> Connection<String> {
        Connection {
            edges: cursors
                .iter()
                .map(|c| Edge {
                    node: format!("node-{c}"),
                    cursor: (*c).to_string(),
                })
                .collect(),
            page_info: None,
            total_count: None,
        }
    }

    fn cursors(list: &ListOrchestrator<String>) -> Vec<&str> {
        list.edges().iter().map(|e| e.cursor.as_str()).collect()
    }

    fn stats(last: &str, total: u64) -> ListStats {
        ListStats {
            page_info: PageInfo {
                first_cursor: Some("c1".into()),
                last_cursor: Some(last.into()),
            },
            total_count: Some(total),
        }
    }

    #[test]
    fn starts_idle() {
        let list = ListOrchestrator::<String>::new();
        assert_eq!(list.phase(), Phase::Idle);
        assert_eq!(list.view(), ListView::Idle);
    }

    #[test]
    fn initial_fetch_issues_list_and_stats() {
        let mut list = ListOrchestrator::<String>::new();
        let refetch = list
            .set_vars(vars(OrderField::LastRequestedAt).continue_after("ignored"))
            .expect("first vars start a context");

        assert_eq!(refetch.list.kind, FetchKind::Initial);
        assert_eq!(refetch.stats.kind, FetchKind::Stats);
        assert_eq!(refetch.list.vars.after, None);
        assert_ne!(refetch.list.id, refetch.stats.id);
        assert_eq!(list.phase(), Phase::Loading);
        assert_eq!(list.view(), ListView::Loading);
    }

    #[test]
    fn same_vars_do_not_refetch() {
        let mut list = ListOrchestrator::<String>::new();
        assert!(list.set_vars(vars(OrderField::LastRequestedAt)).is_some());
        assert!(list.set_vars(vars(OrderField::LastRequestedAt)).is_none());
    }

    #[test]
    fn load_more_appends_in_order() {
        let mut list = ListOrchestrator::<String>::new();
        let refetch = list.set_vars(vars(OrderField::LastRequestedAt)).expect("refetch");
        list.resolve_list(&refetch.list, Ok(page(&["c1", "c2"])));
        list.resolve_stats(&refetch.stats, Ok(stats("c4", 4)));
        assert_eq!(list.phase(), Phase::Ready);
        assert!(list.has_more());

        let more = list.load_more().expect("more available");
        assert_eq!(more.vars.after.as_deref(), Some("c2"));
        assert_eq!(list.phase(), Phase::LoadingMore);
        assert!(!list.has_more());

        assert_eq!(list.resolve_list(&more, Ok(page(&["c3", "c4"]))), Resolution::Applied);
        assert_eq!(cursors(&list), vec!["c1", "c2", "c3", "c4"]);
        assert!(!list.has_more());
    }

    #[test]
    fn only_one_load_more_in_flight() {
        let mut list = ListOrchestrator::<String>::new();
        let refetch = list.set_vars(vars(OrderField::LastRequestedAt)).expect("refetch");
        assert!(list.load_more().is_none(), "nothing held yet");

        list.resolve_list(&refetch.list, Ok(page(&["c1"])));
        let first = list.load_more().expect("first load more");
        assert!(list.load_more().is_none());

        list.resolve_list(&first, Ok(page(&["c2"])));
        assert!(list.load_more().is_some());
    }

    #[test]
    fn view_keeps_edges_visible_while_loading_more() {
        let mut list = ListOrchestrator::<String>::new();
        let refetch = list.set_vars(vars(OrderField::LastRequestedAt)).expect("refetch");
        list.resolve_list(&refetch.list, Ok(page(&["c1"])));
        list.load_more().expect("load more");

        match list.view() {
            ListView::Ready {
                edges,
                loading,
                has_more,
                ..
            } => {
                assert_eq!(edges.len(), 1);
                assert!(loading);
                assert!(!has_more);
            }
            other => panic!("unexpected view {other:?}"),
        }
    }

    #[test]
    fn filter_change_discards_stale_results() {
        let mut list = ListOrchestrator::<String>::new();
        let old = list.set_vars(vars(OrderField::LastRequestedAt)).expect("old");
        let new = list.set_vars(vars(OrderField::ReplyRequestCount)).expect("new");
        assert_ne!(old.list.context, new.list.context);

        assert_eq!(
            list.resolve_list(&old.list, Ok(page(&["old1", "old2"]))),
            Resolution::Stale
        );
        assert_eq!(list.resolve_stats(&old.stats, Ok(stats("old2", 2))), Resolution::Stale);
        assert!(list.edges().is_empty());
        assert!(list.stats().is_none());

        list.resolve_list(&new.list, Ok(page(&["n1"])));
        assert_eq!(cursors(&list), vec!["n1"]);
    }

    #[test]
    fn filter_change_drops_accumulated_edges() {
        let mut list = ListOrchestrator::<String>::new();
        let old = list.set_vars(vars(OrderField::LastRequestedAt)).expect("old");
        list.resolve_list(&old.list, Ok(page(&["a", "b"])));
        let more = list.load_more().expect("more");

        let new = list.set_vars(vars(OrderField::LastRepliedAt)).expect("new");
        assert!(list.edges().is_empty());
        assert_eq!(list.resolve_list(&more, Ok(page(&["c"]))), Resolution::Stale);

        list.resolve_list(&new.list, Ok(page(&["x"])));
        assert_eq!(cursors(&list), vec!["x"]);
    }

    #[test]
    fn error_is_surfaced_without_retry() {
        let mut list = ListOrchestrator::<String>::new();
        let refetch = list.set_vars(vars(OrderField::LastRequestedAt)).expect("refetch");
        let err = FetchError::Transport("connection refused".into());
        list.resolve_list(&refetch.list, Err(err.clone()));

        assert_eq!(list.phase(), Phase::Failed);
        assert_eq!(list.view(), ListView::Failed(&err));
        assert!(list.load_more().is_none());
    }

    #[test]
    fn reload_recovers_from_failed_first_page() {
        let mut list = ListOrchestrator::<String>::new();
        assert!(list.reload().is_none());

        let failed = list.set_vars(vars(OrderField::LastRequestedAt)).expect("refetch");
        list.resolve_list(&failed.list, Err(FetchError::Transport("down".into())));
        assert!(list.set_vars(vars(OrderField::LastRequestedAt)).is_none());

        let retry = list.reload().expect("reload");
        assert_ne!(retry.list.context, failed.list.context);
        assert_eq!(retry.list.vars, failed.list.vars);
        assert!(list.error().is_none());
        assert_eq!(list.phase(), Phase::Loading);

        assert_eq!(list.resolve_stats(&failed.stats, Ok(stats("c1", 1))), Resolution::Stale);
        list.resolve_list(&retry.list, Ok(page(&["c1"])));
        assert_eq!(list.phase(), Phase::Ready);
        assert_eq!(cursors(&list), vec!["c1"]);
    }

    #[test]
    fn failed_load_more_shows_error_over_partial_list() {
        let mut list = ListOrchestrator::<String>::new();
        let refetch = list.set_vars(vars(OrderField::LastRequestedAt)).expect("refetch");
        list.resolve_list(&refetch.list, Ok(page(&["c1"])));
        let more = list.load_more().expect("more");
        list.resolve_list(&more, Err(FetchError::Decode("bad".into())));

        assert!(matches!(list.view(), ListView::Failed(_)));
        assert_eq!(cursors(&list), vec!["c1"]);
    }

    #[test]
    fn stats_failure_leaves_list_usable() {
        let mut list = ListOrchestrator::<String>::new();
        let refetch = list.set_vars(vars(OrderField::LastRequestedAt)).expect("refetch");
        list.resolve_stats(&refetch.stats, Err(FetchError::Transport("timeout".into())));
        list.resolve_list(&refetch.list, Ok(page(&["c1"])));

        assert_eq!(list.phase(), Phase::Ready);
        assert!(list.stats().is_none());
        assert!(!list.has_more());
    }

    #[test]
    fn duplicate_resolution_is_stale() {
        let mut list = ListOrchestrator::<String>::new();
        let refetch = list.set_vars(vars(OrderField::LastRequestedAt)).expect("refetch");
        assert_eq!(list.resolve_list(&refetch.list, Ok(page(&["c1"]))), Resolution::Applied);
        assert_eq!(list.resolve_list(&refetch.list, Ok(page(&["c9"]))), Resolution::Stale);
        assert_eq!(cursors(&list), vec!["c1"]);
    }

    #[test]
    fn has_more_falls_back_to_total_count() {
        let edges = page(&["c1", "c2"]).edges;
        let by_count = ListStats {
            page_info: PageInfo::default(),
            total_count: Some(3),
        };
        assert!(has_more(&edges, Some(&by_count), false));
        assert!(!has_more(&edges, Some(&by_count), true));
        assert!(!has_more(&edges, None, false));
        assert!(!has_more::<String>(&[], Some(&by_count), false));

        let done = ListStats {
            page_info: PageInfo::default(),
            total_count: Some(2),
        };
        assert!(!has_more(&edges, Some(&done), false));
    }
}
