//! The domain data store.
//!
//! Four independently subscribable containers hold the client's view of the backend:
//! categories, transactions, the financial summary, and the dashboard chart points. Each
//! container has a `load_*` operation that fetches from the backend and atomically replaces
//! the contents on success. A failed load leaves the previous contents in place: stale data
//! beats no data when a refresh hiccups.
//!
//! Summary and chart data are pure functions of the transaction set, so
//! [`DataStore::load_transactions`] refreshes both aggregates after the transaction
//! replacement is visible. Mutations do not live here; callers mutate through the backend
//! and then reload the affected container.

use crate::api::Backend;
use crate::model::{Category, ChartPoint, Summary, Transaction};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, warn};

/// One subscribable container with out-of-order protection.
///
/// Concurrent loads of the same container are not de-duplicated, so a slow early response
/// could land after a fast later one. Each fetch takes a ticket before issuing its request
/// and a response is applied only if no younger response has been applied already.
struct Container<T> {
    state: watch::Sender<T>,
    tickets: AtomicU64,
    applied: AtomicU64,
}

impl<T: Clone> Container<T> {
    fn new(initial: T) -> Self {
        let (state, _) = watch::channel(initial);
        Self {
            state,
            tickets: AtomicU64::new(0),
            applied: AtomicU64::new(0),
        }
    }

    /// Takes the next ticket. Call before issuing the fetch.
    fn ticket(&self) -> u64 {
        self.tickets.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Replaces the contents, unless a younger response already landed. Returns whether the
    /// value was applied.
    fn apply(&self, ticket: u64, value: T) -> bool {
        if self.applied.fetch_max(ticket, Ordering::SeqCst) < ticket {
            self.state.send_replace(value);
            true
        } else {
            false
        }
    }

    fn get(&self) -> T {
        self.state.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<T> {
        self.state.subscribe()
    }
}

/// The reactive data store.
pub struct DataStore {
    backend: Arc<dyn Backend>,
    categories: Container<Vec<Category>>,
    transactions: Container<Vec<Transaction>>,
    summary: Container<Summary>,
    chart_data: Container<Vec<ChartPoint>>,
}

impl DataStore {
    /// Creates an empty store over `backend`. Nothing is fetched until a `load_*` call.
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            categories: Container::new(Vec::new()),
            transactions: Container::new(Vec::new()),
            summary: Container::new(Summary::default()),
            chart_data: Container::new(Vec::new()),
        }
    }

    pub fn categories(&self) -> Vec<Category> {
        self.categories.get()
    }

    pub fn transactions(&self) -> Vec<Transaction> {
        self.transactions.get()
    }

    pub fn summary(&self) -> Summary {
        self.summary.get()
    }

    pub fn chart_data(&self) -> Vec<ChartPoint> {
        self.chart_data.get()
    }

    pub fn subscribe_categories(&self) -> watch::Receiver<Vec<Category>> {
        self.categories.subscribe()
    }

    pub fn subscribe_transactions(&self) -> watch::Receiver<Vec<Transaction>> {
        self.transactions.subscribe()
    }

    pub fn subscribe_summary(&self) -> watch::Receiver<Summary> {
        self.summary.subscribe()
    }

    pub fn subscribe_chart_data(&self) -> watch::Receiver<Vec<ChartPoint>> {
        self.chart_data.subscribe()
    }

    /// Reloads the category list.
    pub async fn load_categories(&self) {
        let ticket = self.categories.ticket();
        match self.backend.list_categories().await {
            Ok(categories) => {
                if !self.categories.apply(ticket, categories) {
                    debug!("discarding stale categories response");
                }
            }
            Err(e) => warn!("Failed to load categories: {e}"),
        }
    }

    /// Reloads the transaction list and then, on success, the summary and chart data in
    /// that order, awaiting each.
    ///
    /// The aggregate refresh is unconditional once the transaction fetch succeeds, and a
    /// failure in either aggregate neither rolls back the transaction container nor stops
    /// the rest of the cascade (each aggregate load contains its own failure).
    pub async fn load_transactions(&self) {
        let ticket = self.transactions.ticket();
        match self.backend.list_transactions().await {
            Ok(transactions) => {
                if !self.transactions.apply(ticket, transactions) {
                    debug!("discarding stale transactions response");
                }
                // Always refresh the aggregates when transactions change.
                self.load_summary().await;
                self.load_chart_data().await;
            }
            Err(e) => warn!("Failed to load transactions: {e}"),
        }
    }

    /// Reloads the financial summary.
    pub async fn load_summary(&self) {
        let ticket = self.summary.ticket();
        match self.backend.summary().await {
            Ok(summary) => {
                if !self.summary.apply(ticket, summary) {
                    debug!("discarding stale summary response");
                }
            }
            Err(e) => warn!("Failed to load summary: {e}"),
        }
    }

    /// Reloads the dashboard chart points.
    pub async fn load_chart_data(&self) {
        let ticket = self.chart_data.ticket();
        match self.backend.chart_data().await {
            Ok(points) => {
                if !self.chart_data.apply(ticket, points) {
                    debug!("discarding stale chart data response");
                }
            }
            Err(e) => warn!("Failed to load chart data: {e}"),
        }
    }

    /// Loads everything: categories, then transactions with their aggregate cascade.
    pub async fn load_all(&self) {
        self.load_categories().await;
        self.load_transactions().await;
    }
}
