//! Trail query state
//!
//! [`TrailFinder`] owns the current [`Selection`] and the [`QueryResult`]
//! shown to the user. Changing either half of the selection starts a new
//! query on a background task; outcomes come back over a channel and are
//! applied only if they belong to the latest query.

use std::future::Future;

use chrono::{DateTime, Local};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::data::{find_first_match, Level, Selection, SelectionError, TrailRecord, TrailsClient};

/// Capacity of the outcome channel between query tasks and the finder
const OUTCOME_CHANNEL_CAPACITY: usize = 32;

/// Outcome of the most recent query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryResult {
    /// A query is in flight
    Loading,
    /// The query failed; holds a human-readable message
    Failed(String),
    /// The first row matching the selection
    Found(TrailRecord),
    /// The dataset has no row matching the selection
    NotFound,
}

impl QueryResult {
    /// Whether a query is still in flight
    pub fn is_loading(&self) -> bool {
        matches!(self, QueryResult::Loading)
    }
}

/// Result of one query task, tagged with the generation it was started for
#[derive(Debug, Clone)]
pub struct QueryOutcome {
    /// Generation of the query that produced this result
    pub generation: u64,
    /// The query result
    pub result: QueryResult,
}

/// Runs a single query: fetch the dataset and pick the first matching row
///
/// Errors never escape: they are logged and turned into
/// [`QueryResult::Failed`] so the caller can show them and carry on.
pub async fn query(client: &TrailsClient, selection: &Selection) -> QueryResult {
    match client.fetch_rows().await {
        Ok(rows) => {
            let total = rows.len();
            match find_first_match(&rows, selection).cloned() {
                Some(record) => {
                    info!(
                        level = %selection.level,
                        district = selection.district(),
                        course = %record.name,
                        "found trail"
                    );
                    QueryResult::Found(record)
                }
                None => {
                    info!(
                        level = %selection.level,
                        district = selection.district(),
                        rows = total,
                        "no trail matches selection"
                    );
                    QueryResult::NotFound
                }
            }
        }
        Err(err) => {
            warn!(error = %err, "trail query failed");
            QueryResult::Failed(err.to_string())
        }
    }
}

/// State container for the selection and its query result
pub struct TrailFinder {
    /// API client shared with query tasks
    client: TrailsClient,
    /// Current user selection
    selection: Selection,
    /// Result of the latest query
    result: QueryResult,
    /// Number of the latest query; outcomes for older numbers are dropped
    generation: u64,
    /// When the current result arrived
    last_updated: Option<DateTime<Local>>,
    outcome_tx: mpsc::Sender<QueryOutcome>,
    outcome_rx: mpsc::Receiver<QueryOutcome>,
}

impl TrailFinder {
    /// Creates a finder for the given selection without querying yet
    pub fn new(client: TrailsClient, selection: Selection) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::channel(OUTCOME_CHANNEL_CAPACITY);
        Self {
            client,
            selection,
            result: QueryResult::Loading,
            generation: 0,
            last_updated: None,
            outcome_tx,
            outcome_rx,
        }
    }

    /// The current selection
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// The current query result
    pub fn result(&self) -> &QueryResult {
        &self.result
    }

    /// When the current result arrived, if any query has completed
    pub fn last_updated(&self) -> Option<DateTime<Local>> {
        self.last_updated
    }

    /// Number of the latest query started
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Issues the initial query for the current selection
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&mut self) {
        self.refresh();
    }

    /// Changes the level, querying again if it differs from the current one
    ///
    /// # Returns
    /// `true` if the selection changed and a query was started
    pub fn set_level(&mut self, level: Level) -> bool {
        if self.selection.level == level {
            return false;
        }
        self.selection.level = level;
        self.refresh();
        true
    }

    /// Changes the district, querying again if it differs from the current one
    ///
    /// # Returns
    /// * `Ok(true)` if the selection changed and a query was started
    /// * `Ok(false)` if the district is unchanged
    /// * `Err(SelectionError)` if the district is empty; the selection is kept
    pub fn set_district(&mut self, district: &str) -> Result<bool, SelectionError> {
        if self.selection.district() == district {
            return Ok(false);
        }
        self.selection = Selection::new(self.selection.level, district)?;
        self.refresh();
        Ok(true)
    }

    /// Applies every outcome that has arrived so far without blocking
    ///
    /// # Returns
    /// The number of outcomes that updated the result
    pub fn poll_outcomes(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            if self.apply_outcome(outcome) {
                applied += 1;
            }
        }
        applied
    }

    /// Waits until the latest query has produced a result
    ///
    /// Only meaningful after [`TrailFinder::start`] or a mutator has issued
    /// a query.
    pub async fn wait_for_result(&mut self) -> &QueryResult {
        while self.result.is_loading() {
            match self.outcome_rx.recv().await {
                Some(outcome) => {
                    self.apply_outcome(outcome);
                }
                None => break,
            }
        }
        &self.result
    }

    /// Applies an outcome if it belongs to the latest query
    ///
    /// # Returns
    /// `true` if the outcome was applied, `false` if it was stale
    pub fn apply_outcome(&mut self, outcome: QueryOutcome) -> bool {
        if outcome.generation != self.generation {
            debug!(
                stale = outcome.generation,
                current = self.generation,
                "discarding superseded query result"
            );
            return false;
        }
        self.result = outcome.result;
        self.last_updated = Some(Local::now());
        true
    }

    /// Starts a query for the current selection
    fn refresh(&mut self) {
        let generation = self.begin_query();
        self.spawn_query(generation);
    }

    /// Moves to a new generation and marks the result as loading
    fn begin_query(&mut self) -> u64 {
        self.generation += 1;
        self.result = QueryResult::Loading;
        debug!(
            generation = self.generation,
            level = %self.selection.level,
            district = self.selection.district(),
            "starting trail query"
        );
        self.generation
    }

    /// Runs the query on a background task and reports back over the channel
    fn spawn_query(&self, generation: u64) {
        let client = self.client.clone();
        let selection = self.selection.clone();

        self.spawn_reporting(generation, async move { query(&client, &selection).await });
    }

    /// Runs `work` on its own task and always sends an outcome for `generation`
    ///
    /// A panicking task still reports back as [`QueryResult::Failed`], so the
    /// finder never stays in `Loading`.
    fn spawn_reporting<F>(&self, generation: u64, work: F)
    where
        F: Future<Output = QueryResult> + Send + 'static,
    {
        let tx = self.outcome_tx.clone();

        tokio::spawn(async move {
            let result = match tokio::spawn(work).await {
                Ok(result) => result,
                Err(err) => {
                    warn!(generation, error = %err, "trail query task aborted");
                    QueryResult::Failed(format!("Query task aborted: {}", err))
                }
            };
            let _ = tx.send(QueryOutcome { generation, result }).await;
        });
    }
}
