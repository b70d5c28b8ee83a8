//! Load-once, edit-in-memory stores for the JSON content documents.
//!
//! A [`ContentStore<T>`] fetches `/content/<name>.json` exactly once, keeps
//! the parsed document in memory, and writes every edit through to local
//! storage as a backup. The canonical JSON always wins at load time: local
//! storage only contributes the last-saved timestamp.
//!
//! # Lifecycle
//!
//! `Uninitialized -> Loading -> (Ready | Failed)`. `Ready -> Ready` on every
//! edit. A failed store stays failed; building a new store is the only way
//! to reload.
//!
//! # Remote persistence
//!
//! [`ContentStore::save_remote`] is a placeholder for a durable write to a
//! remote repository. No transport exists yet: it refreshes the local
//! last-saved timestamp and reports success. Callers already handle
//! [`SaveError::Remote`] so a transport can be added without reshaping them.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use fratelli_core::{ContentDocument, ContentKind, LoadState};
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::{debug, error, info, instrument, warn};

use crate::source::ContentSource;
use crate::storage::{CacheWrite, LocalStorage, StorageError, data_key, last_saved_key};

/// Errors from in-memory edits.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{kind} is not ready (state: {state})")]
    NotReady { kind: ContentKind, state: LoadState },
    #[error("failed to serialize {kind}: {source}")]
    Serialize {
        kind: ContentKind,
        #[source]
        source: serde_json::Error,
    },
    #[error("store lock poisoned")]
    LockPoisoned,
}

/// Errors from [`ContentStore::save_remote`].
#[derive(Debug, Error)]
pub enum SaveError {
    /// There is nothing to save until the document has loaded.
    #[error("{0} has not been loaded")]
    NotLoaded(ContentKind),
    /// The local timestamp could not be written.
    #[error("local storage error: {0}")]
    Storage(#[from] StorageError),
    /// The remote write failed. Callers should offer a retry.
    #[error("remote save failed: {0}")]
    Remote(String),
    #[error("store lock poisoned")]
    LockPoisoned,
}

/// Observable state of a content store.
#[derive(Debug, Clone)]
pub struct ContentState<T> {
    pub status: LoadState,
    pub data: Option<T>,
    pub error: Option<String>,
    pub last_saved: Option<DateTime<Utc>>,
}

impl<T> Default for ContentState<T> {
    fn default() -> Self {
        Self {
            status: LoadState::Uninitialized,
            data: None,
            error: None,
            last_saved: None,
        }
    }
}

/// Store for one content document.
///
/// Cheaply cloneable; clones share the same state.
pub struct ContentStore<T: ContentDocument> {
    inner: Arc<ContentStoreInner<T>>,
}

struct ContentStoreInner<T> {
    source: ContentSource,
    storage: Arc<dyn LocalStorage>,
    state: RwLock<ContentState<T>>,
    loaded: OnceCell<()>,
    alive: AtomicBool,
}

impl<T: ContentDocument> Clone for ContentStore<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: ContentDocument> std::fmt::Debug for ContentStore<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentStore")
            .field("kind", &T::KIND)
            .field("status", &self.status())
            .finish_non_exhaustive()
    }
}

impl<T: ContentDocument> ContentStore<T> {
    /// Create an unloaded store.
    #[must_use]
    pub fn new(source: ContentSource, storage: Arc<dyn LocalStorage>) -> Self {
        Self {
            inner: Arc::new(ContentStoreInner {
                source,
                storage,
                state: RwLock::new(ContentState::default()),
                loaded: OnceCell::new(),
                alive: AtomicBool::new(true),
            }),
        }
    }

    /// Which document this store holds.
    #[must_use]
    pub const fn kind(&self) -> ContentKind {
        T::KIND
    }

    /// Fetch the canonical document.
    ///
    /// Only the first call fetches; concurrent callers wait for that fetch
    /// and later calls return immediately. Failures are recorded in the
    /// store's state, never returned.
    pub async fn load(&self) {
        self.inner
            .loaded
            .get_or_init(|| self.fetch_and_apply())
            .await;
    }

    #[instrument(skip(self), fields(kind = %T::KIND))]
    async fn fetch_and_apply(&self) {
        if !self.is_alive() {
            debug!("Store disposed before load");
            return;
        }
        self.write_state(|state| state.status = LoadState::Loading);

        let result = self.inner.source.fetch::<T>(T::KIND).await;

        if !self.is_alive() {
            debug!("Store disposed during load, discarding fetched document");
            return;
        }

        match result {
            Ok(document) => {
                let last_saved = self.read_last_saved();
                self.write_state(|state| {
                    state.status = LoadState::Ready;
                    state.data = Some(document);
                    state.error = None;
                    state.last_saved = last_saved;
                });
                info!("Loaded content document");
            }
            Err(e) => {
                error!(error = %e, "Failed to load content document");
                self.write_state(|state| {
                    state.status = LoadState::Failed;
                    state.error = Some(e.to_string());
                });
            }
        }
    }

    /// Replace the whole document and write it through to local storage.
    ///
    /// The in-memory document is replaced even if the cache write fails; the
    /// returned [`CacheWrite`] says whether it reached storage. `last_saved`
    /// only advances on a successful write. If the document is written but
    /// its timestamp is not, the previously cached document is put back and
    /// the result is [`CacheWrite::Failed`].
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotReady` if the document has not loaded, or
    /// `StoreError::Serialize` if it cannot be encoded. Nothing changes in
    /// either case.
    pub fn update_data(&self, document: T) -> Result<CacheWrite, StoreError> {
        self.try_edit(|_| Ok(document))
    }

    /// Edit a copy of the current document and commit it.
    ///
    /// The store stays locked from reading the document until the result is
    /// cached, so concurrent edits are applied one after another.
    ///
    /// # Errors
    ///
    /// Same as [`update_data`](Self::update_data).
    pub fn edit(&self, apply: impl FnOnce(&mut T)) -> Result<CacheWrite, StoreError> {
        self.try_edit(|current| {
            let mut document = current.clone();
            apply(&mut document);
            Ok(document)
        })
    }

    /// Derive a new document from the current one and commit it, unless
    /// `plan` fails.
    ///
    /// `plan` runs while the store is locked and must not call back into it.
    ///
    /// # Errors
    ///
    /// Returns the error from `plan`, or the store errors of
    /// [`update_data`](Self::update_data). Nothing changes in any error case.
    pub fn try_edit<E>(&self, plan: impl FnOnce(&T) -> Result<T, E>) -> Result<CacheWrite, E>
    where
        E: From<StoreError>,
    {
        let mut state = self
            .inner
            .state
            .write()
            .map_err(|_| StoreError::LockPoisoned)?;
        let status = state.status;
        let Some(current) = state.data.as_ref().filter(|_| status == LoadState::Ready) else {
            return Err(StoreError::NotReady {
                kind: T::KIND,
                state: status,
            }
            .into());
        };

        let document = plan(current)?;
        let json = serde_json::to_string(&document).map_err(|source| StoreError::Serialize {
            kind: T::KIND,
            source,
        })?;
        state.data = Some(document);

        match self.write_through(&json) {
            Ok(now) => {
                state.last_saved = Some(now);
                drop(state);
                debug!(kind = %T::KIND, "Cached content document");
                Ok(CacheWrite::Stored(now))
            }
            Err(e) => {
                drop(state);
                warn!(kind = %T::KIND, error = %e, "Failed to cache content document");
                Ok(CacheWrite::Failed)
            }
        }
    }

    /// Persist the current document remotely.
    ///
    /// Remote persistence is not implemented: this refreshes the local
    /// last-saved timestamp and returns it.
    ///
    /// # Errors
    ///
    /// Returns `SaveError::NotLoaded` before the document has loaded and
    /// `SaveError::Storage` if the timestamp cannot be written.
    pub fn save_remote(&self) -> Result<DateTime<Utc>, SaveError> {
        let mut state = self
            .inner
            .state
            .write()
            .map_err(|_| SaveError::LockPoisoned)?;
        if state.status != LoadState::Ready {
            return Err(SaveError::NotLoaded(T::KIND));
        }

        let now = Utc::now();
        self.inner
            .storage
            .set_item(&last_saved_key(T::KIND.name()), &now.to_rfc3339())?;
        state.last_saved = Some(now);
        drop(state);

        info!(
            kind = %T::KIND,
            "Remote persistence not implemented; refreshed local save timestamp only"
        );
        Ok(now)
    }

    /// Stop applying results to this store. A fetch still in flight is
    /// discarded when it completes.
    pub fn dispose(&self) {
        self.inner.alive.store(false, Ordering::SeqCst);
    }

    fn is_alive(&self) -> bool {
        self.inner.alive.load(Ordering::SeqCst)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Snapshot of the full state.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::LockPoisoned` if a writer panicked.
    pub fn state(&self) -> Result<ContentState<T>, StoreError> {
        self.inner
            .state
            .read()
            .map(|state| state.clone())
            .map_err(|_| StoreError::LockPoisoned)
    }

    /// Current document, `None` before load or after a failed load.
    #[must_use]
    pub fn data(&self) -> Option<T> {
        self.inner
            .state
            .read()
            .ok()
            .and_then(|state| state.data.clone())
    }

    #[must_use]
    pub fn status(&self) -> LoadState {
        self.inner
            .state
            .read()
            .map_or(LoadState::Failed, |state| state.status)
    }

    /// True until the load has settled, including before it starts.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        !self.status().is_settled()
    }

    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.inner
            .state
            .read()
            .ok()
            .and_then(|state| state.error.clone())
    }

    #[must_use]
    pub fn last_saved(&self) -> Option<DateTime<Utc>> {
        self.inner
            .state
            .read()
            .ok()
            .and_then(|state| state.last_saved)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn write_state(&self, apply: impl FnOnce(&mut ContentState<T>)) {
        match self.inner.state.write() {
            Ok(mut state) => apply(&mut state),
            Err(_) => error!(kind = %T::KIND, "Content store lock poisoned"),
        }
    }

    /// Write the document and its timestamp as a pair.
    ///
    /// If the timestamp cannot be written the previous document is put back,
    /// so storage never holds a document newer than its timestamp.
    fn write_through(&self, json: &str) -> Result<DateTime<Utc>, StorageError> {
        let storage = &self.inner.storage;
        let name = T::KIND.name();
        let key = data_key(name);

        let previous = storage.get_item(&key)?;
        storage.set_item(&key, json)?;

        let now = Utc::now();
        if let Err(e) = storage.set_item(&last_saved_key(name), &now.to_rfc3339()) {
            let restored = match previous {
                Some(previous) => storage.set_item(&key, &previous),
                None => storage.remove_item(&key),
            };
            if let Err(rollback) = restored {
                error!(key = %key, error = %rollback, "Failed to restore cached document");
            }
            return Err(e);
        }
        Ok(now)
    }

    fn read_last_saved(&self) -> Option<DateTime<Utc>> {
        let key = last_saved_key(T::KIND.name());
        match self.inner.storage.get_item(&key) {
            Ok(Some(raw)) => match DateTime::parse_from_rfc3339(raw.trim()) {
                Ok(ts) => Some(ts.with_timezone(&Utc)),
                Err(e) => {
                    warn!(key = %key, error = %e, "Ignoring malformed save timestamp");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to read save timestamp");
                None
            }
        }
    }
}
