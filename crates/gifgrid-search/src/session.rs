//! Debounced, supersession-safe search session
//!
//! [`SearchSession`] owns the single mutable [`SessionState`] and serializes
//! every mutation through a `tokio::sync::watch` channel: the UI observes
//! immutable snapshots in mutation order and never touches state directly.
//!
//! Concurrency model: composer input arms a debounce timer (newest wins);
//! when the timer fires, a replacing fetch is issued under a fresh attempt
//! generation. A completion may only apply while its generation is still
//! current, so a fast-typing user can never have stale results overwrite
//! fresher ones. Append fetches are kept from overlapping anything by the
//! loading flags, and are discarded on completion if the listing they were
//! extending has been replaced.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use gifgrid_config::ApplicationConfig;
use gifgrid_giphy::{Gif, GifAttachment, GifPage, GifProvider, GiphyResult, PageRequest};

use crate::state::{SearchMode, SessionState, has_more_after};

/// Error surfaced when no Giphy API key is configured.
///
/// Checked before any network attempt; configuration problems are state,
/// not crashes.
pub const NOT_CONFIGURED_ERROR: &str =
    "Giphy API key not configured. Set GIFGRID_GIPHY_API_KEY or giphy.api_key";

/// Tuning for a [`SearchSession`]
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Results requested per page
    pub page_size: usize,

    /// Content rating filter forwarded to the provider
    pub rating: String,

    /// Composer input debounce interval
    pub debounce: Duration,

    /// Pagination offset ceiling for trending listings
    pub max_trending_offset: usize,

    /// Pagination offset ceiling for query listings
    pub max_search_offset: usize,

    /// Whether a provider credential is configured; when false the session
    /// reports [`NOT_CONFIGURED_ERROR`] instead of fetching
    pub api_key_present: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            page_size: 10,
            rating: "g".to_string(),
            debounce: Duration::from_millis(300),
            max_trending_offset: 50,
            max_search_offset: 50,
            api_key_present: true,
        }
    }
}

impl SessionOptions {
    /// Derive session options from the application configuration
    pub fn from_config(config: &ApplicationConfig) -> Self {
        Self {
            page_size: config.search.page_size,
            rating: config.giphy.rating.clone(),
            debounce: Duration::from_millis(config.search.debounce_ms),
            max_trending_offset: config.search.max_trending_offset,
            max_search_offset: config.search.max_search_offset,
            api_key_present: config.giphy.has_api_key(),
        }
    }
}

type TaskSlot = Mutex<Option<JoinHandle<()>>>;

struct SessionInner {
    provider: Arc<dyn GifProvider>,
    options: SessionOptions,
    tx: watch::Sender<SessionState>,

    /// Attempt generation; a replacing fetch may only apply its outcome
    /// while the generation it was issued under is still current
    generation: AtomicU64,

    /// Mode of the replacing fetch currently loading or loaded. `None`
    /// after a failure, so repeating the same query retries instead of
    /// no-opping. Doubles as the lock serializing issue/apply decisions.
    active: Mutex<Option<SearchMode>>,

    debounce_task: TaskSlot,
    replace_task: TaskSlot,
    append_task: TaskSlot,
}

/// Orchestrates debounced search, pagination and state publication for
/// one picker session.
///
/// All methods must be called from within a Tokio runtime; the session
/// spawns its timer and fetch tasks onto it. Dropping the session aborts
/// any pending debounce timer and in-flight fetches.
pub struct SearchSession {
    inner: Arc<SessionInner>,
}

impl SearchSession {
    /// Create a session and start the implicit initial trending load
    /// (no debounce).
    ///
    /// # Panics
    /// Panics if called outside a Tokio runtime.
    pub fn spawn(provider: Arc<dyn GifProvider>, options: SessionOptions) -> Self {
        let (tx, _rx) = watch::channel(SessionState::new());
        let inner = Arc::new(SessionInner {
            provider,
            options,
            tx,
            generation: AtomicU64::new(0),
            active: Mutex::new(None),
            debounce_task: Mutex::new(None),
            replace_task: Mutex::new(None),
            append_task: Mutex::new(None),
        });

        Arc::clone(&inner).start_replacing(SearchMode::Trending);
        Self { inner }
    }

    /// Subscribe to state snapshots; the receiver immediately holds the
    /// current state
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.tx.subscribe()
    }

    /// The current state snapshot
    pub fn state(&self) -> SessionState {
        self.inner.tx.borrow().clone()
    }

    /// Record a composer input change.
    ///
    /// Arms the debounce timer; a newer call cancels the pending timer and
    /// invalidates any fetch the older input would have produced. After the
    /// debounce elapses the input is normalized (trim; empty means
    /// trending) and, only if that differs from what is currently loaded,
    /// a replacing fetch is issued.
    pub fn set_query(&self, input: &str) {
        let inner = Arc::clone(&self.inner);
        let raw = input.to_string();

        let Ok(mut slot) = self.inner.debounce_task.lock() else {
            return;
        };
        if let Some(previous) = slot.take() {
            previous.abort();
        }
        *slot = Some(tokio::spawn(async move {
            tokio::time::sleep(inner.options.debounce).await;
            inner.start_replacing(SearchMode::normalize(&raw));
        }));
    }

    /// Request the next page for the current mode.
    ///
    /// No-op while nothing more is available or any load is in flight;
    /// a guarded no-op changes no state field, not even `error`.
    pub fn load_more(&self) {
        let inner = Arc::clone(&self.inner);
        let Some((mode, offset, generation)) = inner.begin_append() else {
            return;
        };

        let Ok(mut slot) = self.inner.append_task.lock() else {
            return;
        };
        if let Some(previous) = slot.take() {
            // Guarded by the loading flags, a previous append is already done
            previous.abort();
        }
        let task_inner = Arc::clone(&inner);
        *slot = Some(tokio::spawn(async move {
            task_inner.run_append(mode, offset, generation).await;
        }));
    }

    /// Forward a picked gif to the message composer as an attachment
    /// payload.
    ///
    /// # Errors
    /// Returns [`gifgrid_giphy::GiphyError::NoRendition`] when the gif has
    /// no usable rendition.
    pub fn select(&self, gif: &Gif) -> GiphyResult<GifAttachment> {
        gif.attachment()
    }
}

impl Drop for SearchSession {
    fn drop(&mut self) {
        // Invalidate anything still in flight, then cancel the tasks
        self.inner.generation.fetch_add(1, Ordering::SeqCst);
        for slot in [
            &self.inner.debounce_task,
            &self.inner.replace_task,
            &self.inner.append_task,
        ] {
            if let Ok(mut guard) = slot.lock()
                && let Some(task) = guard.take()
            {
                task.abort();
            }
        }
    }
}

impl SessionInner {
    /// Issue a replacing fetch for `target` unless it is already the
    /// loading/loaded listing.
    fn start_replacing(self: Arc<Self>, target: SearchMode) {
        let Ok(mut active) = self.active.lock() else {
            return;
        };
        if active.as_ref() == Some(&target) {
            // Same normalized query as the current listing: nothing to do
            return;
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst).wrapping_add(1);
        *active = Some(target.clone());
        self.tx.send_modify(|state| state.begin_replace(target.clone()));
        tracing::debug!(?target, generation, "replacing fetch issued");

        let inner = Arc::clone(&self);
        let task = tokio::spawn(async move {
            inner.run_replacing(target, generation).await;
        });
        if let Ok(mut slot) = self.replace_task.lock()
            && let Some(superseded) = slot.replace(task)
        {
            superseded.abort();
        }
    }

    async fn run_replacing(self: Arc<Self>, target: SearchMode, generation: u64) {
        // Credential check happens before any I/O
        let result = if self.options.api_key_present {
            self.fetch(&target, 0).await.map_err(|e| e.to_string())
        } else {
            Err(NOT_CONFIGURED_ERROR.to_string())
        };

        let Ok(mut active) = self.active.lock() else {
            return;
        };
        if self.generation.load(Ordering::SeqCst) != generation {
            // Superseded by a newer query; discard the outcome entirely
            tracing::debug!(?target, generation, "stale replacing fetch discarded");
            return;
        }

        match result {
            Ok(page) => {
                let ceiling = self.ceiling(&target);
                let page_size = self.options.page_size;
                self.tx.send_modify(|state| {
                    state.gifs = page.data;
                    state.cursor = state.gifs.len();
                    state.has_more =
                        has_more_after(page.pagination.as_ref(), state.cursor, ceiling, page_size);
                    state.is_loading = false;
                });
            }
            Err(message) => {
                // Allow the same query to be retried after a failure
                *active = None;
                self.tx.send_modify(|state| {
                    state.error = Some(message);
                    state.gifs.clear();
                    state.cursor = 0;
                    state.is_loading = false;
                });
            }
        }
    }

    /// Guard and mark the start of an append fetch.
    ///
    /// Returns the mode, offset and generation to fetch under, or `None`
    /// when the append must be a silent no-op.
    fn begin_append(&self) -> Option<(SearchMode, usize, u64)> {
        if !self.options.api_key_present {
            return None;
        }
        // Holding `active` excludes a concurrent replacing-fetch issue, so
        // the generation read here matches the state we are extending
        let Ok(_active) = self.active.lock() else {
            return None;
        };
        let generation = self.generation.load(Ordering::SeqCst);

        let mut started = None;
        self.tx.send_if_modified(|state| {
            if !state.has_more || state.is_loading || state.is_loading_more {
                return false;
            }
            state.is_loading_more = true;
            state.error = None;
            started = Some((state.mode.clone(), state.cursor));
            true
        });
        started.map(|(mode, offset)| (mode, offset, generation))
    }

    async fn run_append(self: Arc<Self>, mode: SearchMode, offset: usize, generation: u64) {
        let result = self.fetch(&mode, offset).await;

        let Ok(_active) = self.active.lock() else {
            return;
        };
        if self.generation.load(Ordering::SeqCst) != generation {
            // The listing this page extends has been replaced
            tracing::debug!(?mode, offset, "stale append fetch discarded");
            return;
        }

        match result {
            Ok(page) => {
                let ceiling = self.ceiling(&mode);
                let page_size = self.options.page_size;
                self.tx.send_modify(|state| {
                    let appended = page.data.len();
                    state.gifs.extend(page.data);
                    state.cursor = state.cursor.saturating_add(appended);
                    state.has_more =
                        has_more_after(page.pagination.as_ref(), state.cursor, ceiling, page_size);
                    state.is_loading_more = false;
                });
            }
            Err(error) => {
                // A failed load-more never blanks an already-populated list
                self.tx.send_modify(|state| {
                    state.error = Some(error.to_string());
                    state.is_loading_more = false;
                });
            }
        }
    }

    async fn fetch(&self, mode: &SearchMode, offset: usize) -> GiphyResult<GifPage> {
        let page = PageRequest {
            limit: self.options.page_size,
            offset,
            rating: self.options.rating.clone(),
        };
        match mode {
            SearchMode::Trending => self.provider.trending(&page).await,
            SearchMode::Query(query) => self.provider.search(query, &page).await,
        }
    }

    const fn ceiling(&self, mode: &SearchMode) -> usize {
        if mode.is_trending() {
            self.options.max_trending_offset
        } else {
            self.options.max_search_offset
        }
    }
}
