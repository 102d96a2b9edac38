//! Application state composition.
//!
//! Top-level state hierarchy for the TUI:
//!
//! ```text
//! AppState
//! ├── session: Session          (logged-in flag + username)
//! ├── screen: Screen            (Auth form or headline Feed)
//! ├── notice: Option<Notice>    (one-line inline message)
//! └── should_quit: bool
//! ```
//!
//! The reducer in `update` is the only place that mutates this state.

use std::collections::HashSet;

use newsbee_core::auth::Session;
use newsbee_core::news::{Article, Category};

/// Severity of an inline notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Warning,
    Error,
}

/// A one-line inline message shown in the footer.
///
/// All recoverable failures (store load/save, duplicate username, invalid
/// credentials, non-200 fetch) end up here; nothing terminates the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn new(kind: NoticeKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::new(NoticeKind::Success, text)
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self::new(NoticeKind::Warning, text)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(NoticeKind::Error, text)
    }
}

/// Which auth form is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    Login,
    Signup,
}

impl AuthMode {
    pub fn title(&self) -> &'static str {
        match self {
            AuthMode::Login => "Log In",
            AuthMode::Signup => "Sign Up",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            AuthMode::Login => AuthMode::Signup,
            AuthMode::Signup => AuthMode::Login,
        }
    }
}

/// Which text field has focus on the auth screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthField {
    #[default]
    Username,
    Password,
}

impl AuthField {
    pub fn next(&self) -> Self {
        match self {
            AuthField::Username => AuthField::Password,
            AuthField::Password => AuthField::Username,
        }
    }
}

/// State of the login/signup form.
#[derive(Debug, Clone, Default)]
pub struct AuthScreen {
    pub mode: AuthMode,
    pub username: String,
    pub password: String,
    pub focus: AuthField,
    /// True while the runtime is executing a submit effect.
    pub submitting: bool,
}

impl AuthScreen {
    /// Returns the focused field's buffer.
    pub fn focused_buffer_mut(&mut self) -> &mut String {
        match self.focus {
            AuthField::Username => &mut self.username,
            AuthField::Password => &mut self.password,
        }
    }
}

/// State of the headline feed.
#[derive(Debug, Clone)]
pub struct FeedScreen {
    pub category: Category,
    pub articles: Vec<Article>,
    /// Index of the selected article.
    pub selected: usize,
    /// Articles whose "Read more" link has been revealed.
    pub revealed_links: HashSet<usize>,
    /// Articles whose share links have been revealed.
    pub revealed_shares: HashSet<usize>,
    /// True while a fetch is in flight.
    pub loading: bool,
}

impl FeedScreen {
    /// Creates a feed for `category` with a fetch in flight.
    pub fn loading(category: Category) -> Self {
        Self {
            category,
            articles: Vec::new(),
            selected: 0,
            revealed_links: HashSet::new(),
            revealed_shares: HashSet::new(),
            loading: true,
        }
    }

    /// Replaces the article list, resetting selection and reveals.
    pub fn set_articles(&mut self, articles: Vec<Article>) {
        self.articles = articles;
        self.selected = 0;
        self.revealed_links.clear();
        self.revealed_shares.clear();
        self.loading = false;
    }
}

/// Which screen is showing.
#[derive(Debug, Clone)]
pub enum Screen {
    Auth(AuthScreen),
    Feed(FeedScreen),
}

/// Combined application state for the TUI.
pub struct AppState {
    /// Flag indicating the app should quit.
    pub should_quit: bool,
    /// Per-session context: logged-in flag and username. Reset on logout.
    pub session: Session,
    /// Active screen.
    pub screen: Screen,
    /// Inline notice shown in the footer.
    pub notice: Option<Notice>,
    /// Spinner animation frame counter (for in-flight fetches).
    pub spinner_frame: usize,
}

impl AppState {
    /// Creates the initial state: logged out, on the auth screen.
    pub fn new() -> Self {
        Self {
            should_quit: false,
            session: Session::new(),
            screen: Screen::Auth(AuthScreen::default()),
            notice: None,
            spinner_frame: 0,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
