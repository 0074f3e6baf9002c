//! Search orchestration crate for gifgrid
//!
//! Turns free-text composer input into a paginated, cancellable stream of
//! GIF results: debounced queries, supersession of stale fetches, guarded
//! load-more, and a single observable session state consumed by the UI.

pub mod session;
pub mod state;

// Re-export main types
pub use session::{NOT_CONFIGURED_ERROR, SearchSession, SessionOptions};
pub use state::{SearchMode, SessionState};
