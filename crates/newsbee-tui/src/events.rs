//! UI event types.
//!
//! Events are inputs to the reducer: terminal input, the tick timer, and
//! results of async work sent back through the runtime inbox.

use newsbee_core::news::{Article, Category, NewsError};
use newsbee_core::store::StoreError;

/// Events consumed by the reducer.
#[derive(Debug)]
pub enum UiEvent {
    /// Periodic timer tick (drives the spinner).
    Tick,
    /// Raw terminal input.
    Terminal(crossterm::event::Event),
    /// A signup submit finished.
    SignupCompleted { result: Result<(), StoreError> },
    /// A login submit finished.
    LoginCompleted {
        username: String,
        result: Result<(), StoreError>,
    },
    /// A headline fetch finished.
    HeadlinesLoaded {
        category: Category,
        result: Result<Vec<Article>, NewsError>,
    },
}
