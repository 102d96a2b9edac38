//! UI effect types.
//!
//! Effects are commands returned by the reducer that the runtime executes.
//! They represent I/O only; the reducer never touches the store or the
//! network directly. Results come back as events through the runtime inbox.

use newsbee_core::news::Category;

/// Effects returned by the reducer for the runtime to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEffect {
    /// Create an account in the credential store.
    SubmitSignup { username: String, password: String },

    /// Check credentials against the store.
    SubmitLogin { username: String, password: String },

    /// Fetch top headlines for a category on a background task.
    FetchHeadlines { category: Category },
}
