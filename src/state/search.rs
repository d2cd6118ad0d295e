//! Search-as-you-type over external volumes.
//!
//! ARCHITECTURE
//! ============
//! A background task owns the pipeline: keystrokes arrive on an `mpsc`
//! channel, a resettable timer debounces them, and the settled query is
//! compared with the previous settled query so repeats are dropped. Each
//! accepted query aborts the lookup still in flight before starting its own
//! (switch semantics), and a result is only published while it still
//! belongs to the current query. Observers read a `watch` channel.

#[cfg(test)]
#[path = "search_test.rs"]
mod search_test;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::net::search::VolumeSource;
use crate::net::types::ExternalBook;

/// Queries at or below this many characters clear results instead.
pub const MIN_QUERY_CHARS: usize = 2;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SearchState {
    /// Last settled query.
    pub query: String,
    pub results: Vec<ExternalBook>,
    pub searching: bool,
}

#[derive(Debug)]
pub struct BookSearch {
    input: mpsc::UnboundedSender<String>,
    state: watch::Receiver<SearchState>,
    task: JoinHandle<()>,
}

impl BookSearch {
    /// Start the pipeline on the current tokio runtime.
    #[must_use]
    pub fn spawn(source: Arc<dyn VolumeSource>, debounce: Duration) -> Self {
        let (input, rx) = mpsc::unbounded_channel();
        let (tx, state) = watch::channel(SearchState::default());
        let task = tokio::spawn(run(source, debounce, rx, Arc::new(tx)));
        Self { input, state, task }
    }

    /// Feed one keystroke's worth of input.
    pub fn input(&self, query: &str) {
        if self.input.send(query.to_owned()).is_err() {
            tracing::debug!("search pipeline stopped; input dropped");
        }
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.clone()
    }

    #[must_use]
    pub fn state(&self) -> SearchState {
        self.state.borrow().clone()
    }
}

impl Drop for BookSearch {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run(
    source: Arc<dyn VolumeSource>,
    debounce: Duration,
    mut rx: mpsc::UnboundedReceiver<String>,
    tx: Arc<watch::Sender<SearchState>>,
) {
    let mut pending: Option<String> = None;
    let mut last_settled: Option<String> = None;
    let mut in_flight: Option<JoinHandle<()>> = None;
    let timer = tokio::time::sleep(debounce);
    tokio::pin!(timer);

    loop {
        tokio::select! {
            input = rx.recv() => match input {
                Some(query) => {
                    pending = Some(query);
                    timer.as_mut().reset(Instant::now() + debounce);
                }
                None => break,
            },
            () = &mut timer, if pending.is_some() => {
                let Some(query) = pending.take() else { continue };
                if last_settled.as_deref() == Some(query.as_str()) {
                    continue;
                }
                last_settled = Some(query.clone());
                if let Some(previous) = in_flight.take() {
                    previous.abort();
                }

                if query.trim().chars().count() <= MIN_QUERY_CHARS {
                    tx.send_modify(|state| {
                        state.query.clone_from(&query);
                        state.results.clear();
                        state.searching = false;
                    });
                    continue;
                }

                tx.send_modify(|state| {
                    state.query.clone_from(&query);
                    state.searching = true;
                });
                in_flight = Some(tokio::spawn(lookup(Arc::clone(&source), query, Arc::clone(&tx))));
            }
        }
    }

    if let Some(task) = in_flight {
        task.abort();
    }
}

async fn lookup(source: Arc<dyn VolumeSource>, query: String, tx: Arc<watch::Sender<SearchState>>) {
    tracing::debug!(%query, "external search");
    let results = match source.search(&query).await {
        Ok(results) => results,
        Err(error) => {
            tracing::warn!(%error, %query, "external search failed");
            Vec::new()
        }
    };
    tx.send_if_modified(|state| {
        if state.query != query {
            return false;
        }
        state.results = results;
        state.searching = false;
        true
    });
}
