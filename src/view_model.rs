//! The transaction list view-model.
//!
//! `TransactionViewModel` owns the fetched collection, the fetch lifecycle, the type filter and the
//! search query, and keeps `filtered_transactions` derived from them. State is published through a
//! tokio `watch` channel: a presentation layer can either pull a `snapshot` or `subscribe` and
//! re-render on every change.
//!
//! Lifecycle of a fetch:
//!
//! ```text
//! Idle ──▶ Loading ──▶ Success ──┐
//!             ▲   └──▶ Failure ──┤
//!             └────── refresh ───┘
//! ```
//!
//! Only one fetch runs at a time. Dropping the view-model aborts the in-flight fetch and the search
//! debounce, so no state is written after it is gone.

use crate::debounce::Debouncer;
use crate::error::FetchError;
use crate::model::{filter_transactions, Transaction, TransactionFilter, Transactions};
use crate::source::TransactionSource;
use crate::Result;
use anyhow::Context;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// How long the search query must stay unchanged before the list is filtered by it.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewSettings {
    pub debounce: Duration,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}

/// Where the view-model is in the fetch lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchStatus {
    /// No fetch has been started.
    #[default]
    Idle,
    Loading,
    Success,
    Failure,
}

/// Everything a presentation layer renders from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ViewState {
    transactions: Transactions,
    filtered_transactions: Vec<Transaction>,
    status: FetchStatus,
    error: Option<String>,
    search_query: String,
    debounced_search_query: String,
    filter: TransactionFilter,
}

impl ViewState {
    /// The full collection from the last successful fetch, empty after a failure.
    pub fn transactions(&self) -> &Transactions {
        &self.transactions
    }

    /// `transactions` narrowed by `filter` and `debounced_search_query`.
    pub fn filtered_transactions(&self) -> &[Transaction] {
        &self.filtered_transactions
    }

    pub fn status(&self) -> FetchStatus {
        self.status
    }

    pub fn is_loading(&self) -> bool {
        self.status == FetchStatus::Loading
    }

    /// The message of the last fetch, if it failed.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn debounced_search_query(&self) -> &str {
        &self.debounced_search_query
    }

    pub fn filter(&self) -> TransactionFilter {
        self.filter
    }

    /// True when nothing is loading and the search has caught up with the typed query.
    pub fn is_settled(&self) -> bool {
        !self.is_loading() && self.debounced_search_query == self.search_query
    }

    fn recompute(&mut self) {
        self.filtered_transactions = filter_transactions(
            self.transactions.data(),
            self.filter,
            &self.debounced_search_query,
        );
    }

    fn begin_fetch(&mut self) {
        self.status = FetchStatus::Loading;
        self.error = None;
    }

    fn finish_fetch(&mut self, result: std::result::Result<Transactions, FetchError>) {
        match result {
            Ok(transactions) => {
                self.transactions = transactions;
                self.error = None;
                self.status = FetchStatus::Success;
            }
            Err(e) => {
                self.transactions = Transactions::default();
                self.error = Some(e.to_string());
                self.status = FetchStatus::Failure;
            }
        }
        self.recompute();
    }
}

struct Shared {
    state: watch::Sender<ViewState>,
    source: Arc<dyn TransactionSource>,
}

pub struct TransactionViewModel {
    shared: Arc<Shared>,
    query: Debouncer<String>,
    fetch: Option<JoinHandle<()>>,
    query_watch: JoinHandle<()>,
}

impl TransactionViewModel {
    /// Creates the view-model and starts the initial fetch.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(source: Arc<dyn TransactionSource>, settings: ViewSettings) -> Self {
        let (state, _) = watch::channel(ViewState::default());
        let shared = Arc::new(Shared { state, source });
        let query = Debouncer::new(String::new(), settings.debounce);
        let query_watch = tokio::spawn(apply_debounced_query(
            query.subscribe(),
            Arc::clone(&shared),
        ));

        let mut view_model = Self {
            shared,
            query,
            fetch: None,
            query_watch,
        };
        view_model.refresh();
        view_model
    }

    /// Starts a new fetch. Returns `false`, and does nothing, when a fetch is already in flight.
    ///
    /// The previous collection stays visible while loading and is replaced, or cleared on failure,
    /// when the fetch completes.
    pub fn refresh(&mut self) -> bool {
        // `Loading` is the only in-flight marker, the previous task may still be winding down
        let started = self.shared.state.send_if_modified(|state| {
            if state.is_loading() {
                return false;
            }
            state.begin_fetch();
            true
        });
        if !started {
            debug!("A fetch is already in flight, ignoring refresh");
            return false;
        }

        let shared = Arc::clone(&self.shared);
        self.fetch = Some(tokio::spawn(async move {
            let result = shared.source.fetch().await;
            match &result {
                Ok(transactions) => info!("Fetched {} transactions", transactions.len()),
                Err(e) => warn!("Fetch failed: {e}"),
            }
            shared.state.send_modify(|state| state.finish_fetch(result));
        }));
        true
    }

    /// Records the typed query. The list is filtered by it once it has been left alone for the
    /// debounce delay.
    pub fn set_search_query(&self, text: impl Into<String>) {
        let text = text.into();
        self.shared.state.send_if_modified(|state| {
            if state.search_query == text {
                return false;
            }
            state.search_query.clone_from(&text);
            true
        });
        self.query.set(text);
    }

    /// Changes the type filter. The list is recomputed immediately.
    pub fn set_filter(&self, filter: TransactionFilter) {
        self.shared.state.send_if_modified(|state| {
            if state.filter == filter {
                return false;
            }
            state.filter = filter;
            state.recompute();
            true
        });
    }

    /// A copy of the current state.
    pub fn snapshot(&self) -> ViewState {
        self.shared.state.borrow().clone()
    }

    /// Watches the state. The receiver sees every committed change.
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.shared.state.subscribe()
    }

    /// Waits until no fetch is in flight and the debounced query has caught up with the typed one,
    /// then returns that state.
    pub async fn settled(&self) -> Result<ViewState> {
        let mut rx = self.subscribe();
        let state = rx
            .wait_for(ViewState::is_settled)
            .await
            .context("The view-model state channel closed")?
            .clone();
        Ok(state)
    }

    pub fn transactions(&self) -> Transactions {
        self.shared.state.borrow().transactions.clone()
    }

    pub fn filtered_transactions(&self) -> Vec<Transaction> {
        self.shared.state.borrow().filtered_transactions.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.shared.state.borrow().is_loading()
    }

    pub fn status(&self) -> FetchStatus {
        self.shared.state.borrow().status
    }

    pub fn error(&self) -> Option<String> {
        self.shared.state.borrow().error.clone()
    }

    pub fn search_query(&self) -> String {
        self.shared.state.borrow().search_query.clone()
    }

    pub fn debounced_search_query(&self) -> String {
        self.shared.state.borrow().debounced_search_query.clone()
    }

    pub fn filter(&self) -> TransactionFilter {
        self.shared.state.borrow().filter
    }
}

impl Drop for TransactionViewModel {
    fn drop(&mut self) {
        if let Some(fetch) = self.fetch.take() {
            fetch.abort();
        }
        self.query_watch.abort();
    }
}

impl std::fmt::Debug for TransactionViewModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionViewModel")
            .field("state", &*self.shared.state.borrow())
            .field("query", &self.query)
            .finish_non_exhaustive()
    }
}

/// Copies every settled search query into the state and recomputes the list.
async fn apply_debounced_query(mut debounced: watch::Receiver<String>, shared: Arc<Shared>) {
    while debounced.changed().await.is_ok() {
        let query = debounced.borrow_and_update().clone();
        debug!("Filtering by search query {query:?}");
        shared.state.send_modify(|state| {
            state.debounced_search_query = query;
            state.recompute();
        });
    }
}
