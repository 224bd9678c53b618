//! Application context tying intake, results and history to one store.
//!
//! [`Clinic`] owns the store and the configuration. The pending assessment
//! lives in a single slot: [`Clinic::submit`] fills it, the results view
//! reads it, and [`Clinic::finish`] commits it to history when the user
//! leaves the results view.

use chrono::{DateTime, Local};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::assessment::AssessmentRecord;
use crate::config::{CommitPolicy, Config};
use crate::error::Result;
use crate::history::{self, HistoryEntry};
use crate::report::ResultsView;
use crate::routes::Route;
use crate::storage::{
    self, KeyValueStore, COMMITTED_ASSESSMENT_KEY, CONSULTATION_HISTORY_KEY,
    CURRENT_ASSESSMENT_KEY,
};

/// The two ways out of the results view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultsExit {
    /// "Nova Consulta": back to the intake form.
    NewConsultation,
    /// "Histórico": on to the history list.
    GoToHistory,
}

impl ResultsExit {
    /// Where this exit navigates to.
    #[must_use]
    pub fn destination(&self) -> Route {
        match self {
            Self::NewConsultation => Route::Intake,
            Self::GoToHistory => Route::History,
        }
    }
}

/// What committing the pending assessment did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    /// A new entry was prepended to history.
    Appended(HistoryEntry),
    /// This pending assessment was already committed.
    AlreadyCommitted,
    /// There was no pending assessment.
    NothingPending,
}

/// Result of leaving the results view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finish {
    /// What happened to the pending assessment.
    pub outcome: CommitOutcome,
    /// Where to navigate next.
    pub next: Route,
}

/// A rendered page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    /// The intake form.
    Intake,
    /// The results view of the pending assessment.
    Results(Box<ResultsView>),
    /// The history list, newest first.
    History(Vec<HistoryEntry>),
    /// An unknown path.
    NotFound(String),
}

/// Snapshot of what the store currently holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Status {
    /// A pending assessment exists.
    pub pending: bool,
    /// The pending assessment has been committed to history.
    pub committed: bool,
    /// History length, `None` when the history has never been read.
    pub history_len: Option<usize>,
}

/// Application context.
#[derive(Debug)]
pub struct Clinic<S> {
    store: S,
    config: Config,
}

impl<S: KeyValueStore> Clinic<S> {
    /// Create a context over `store`.
    #[must_use]
    pub fn new(store: S, config: Config) -> Self {
        Self { store, config }
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Consume the context and return the store.
    #[must_use]
    pub fn into_store(self) -> S {
        self.store
    }

    /// Store `record` as the pending assessment, replacing any previous one.
    ///
    /// Returns the route to navigate to.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub fn submit(&mut self, record: &AssessmentRecord) -> Result<Route> {
        storage::save(&mut self.store, CURRENT_ASSESSMENT_KEY, record)?;
        self.store.remove(COMMITTED_ASSESSMENT_KEY)?;
        info!(
            "Submitted assessment ({} conditions)",
            record.medical_history.len()
        );
        Ok(Route::Results)
    }

    /// The pending assessment, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails or the slot is corrupt under the
    /// `fail` policy.
    pub fn pending(&self) -> Result<Option<AssessmentRecord>> {
        storage::load(&self.store, CURRENT_ASSESSMENT_KEY, self.config.storage.on_corrupt)
    }

    /// Build the results view for the pending assessment.
    ///
    /// Returns `None` when nothing is pending; callers redirect to intake.
    ///
    /// # Errors
    ///
    /// Returns an error if the pending slot cannot be read.
    pub fn results(&self, at: &DateTime<Local>) -> Result<Option<ResultsView>> {
        Ok(self
            .pending()?
            .map(|record| ResultsView::new(&record, at)))
    }

    /// Leave the results view through `exit`, committing the pending
    /// assessment to history.
    ///
    /// Under [`CommitPolicy::Once`] a pending assessment is committed at most
    /// once, whichever exit is taken; under [`CommitPolicy::EveryExit`] each
    /// call appends a new entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub fn finish(&mut self, exit: ResultsExit, at: &DateTime<Local>) -> Result<Finish> {
        let outcome = self.commit(at)?;
        Ok(Finish {
            outcome,
            next: exit.destination(),
        })
    }

    fn commit(&mut self, at: &DateTime<Local>) -> Result<CommitOutcome> {
        let Some(record) = self.pending()? else {
            debug!("Nothing pending to commit");
            return Ok(CommitOutcome::NothingPending);
        };

        let fingerprint = match self.config.history.commit_policy {
            CommitPolicy::EveryExit => None,
            CommitPolicy::Once => {
                let fingerprint = record.fingerprint()?;
                if self.committed_fingerprint()?.as_deref() == Some(fingerprint.as_str()) {
                    info!("Assessment already committed, skipping");
                    return Ok(CommitOutcome::AlreadyCommitted);
                }
                Some(fingerprint)
            }
        };

        // Guard first; a failed append clears it again.
        if let Some(fingerprint) = &fingerprint {
            storage::save(&mut self.store, COMMITTED_ASSESSMENT_KEY, fingerprint)?;
        }

        match history::append_to_history(&mut self.store, &self.config, &record, at) {
            Ok(entry) => Ok(CommitOutcome::Appended(entry)),
            Err(err) => {
                if fingerprint.is_some() {
                    if let Err(rollback) = self.store.remove(COMMITTED_ASSESSMENT_KEY) {
                        warn!("Failed to clear commit guard after error: {}", rollback);
                    }
                }
                Err(err)
            }
        }
    }

    fn committed_fingerprint(&self) -> Result<Option<String>> {
        storage::load(
            &self.store,
            COMMITTED_ASSESSMENT_KEY,
            self.config.storage.on_corrupt,
        )
    }

    /// The consultation history, newest first, seeding it if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the history cannot be read or seeded.
    pub fn history(&mut self) -> Result<Vec<HistoryEntry>> {
        history::load_history(&mut self.store, &self.config)
    }

    /// Resolve `route` to a page.
    ///
    /// The results route falls back to the intake form when nothing is
    /// pending.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub fn visit(&mut self, route: &Route, at: &DateTime<Local>) -> Result<Page> {
        let page = match route {
            Route::Intake => Page::Intake,
            Route::Results => match self.results(at)? {
                Some(view) => Page::Results(Box::new(view)),
                None => {
                    info!("No pending assessment, redirecting to {}", Route::Intake);
                    Page::Intake
                }
            },
            Route::History => Page::History(self.history()?),
            Route::NotFound(path) => {
                error!("404: attempted to access non-existent route: {}", path);
                Page::NotFound(path.clone())
            }
        };
        Ok(page)
    }

    /// Report what the store holds without seeding anything.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub fn status(&self) -> Result<Status> {
        let pending = self.pending()?;
        let committed = match &pending {
            Some(record) => {
                self.committed_fingerprint()?.as_deref() == Some(record.fingerprint()?.as_str())
            }
            None => false,
        };
        let history: Option<Vec<HistoryEntry>> = storage::load(
            &self.store,
            CONSULTATION_HISTORY_KEY,
            self.config.storage.on_corrupt,
        )?;

        Ok(Status {
            pending: pending.is_some(),
            committed,
            history_len: history.map(|h| h.len()),
        })
    }
}
