//! TUI reducer (update function).
//!
//! All state mutations happen here. The runtime calls `update(state, event)`
//! and executes the returned effects.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use newsbee_core::news::Category;
use newsbee_core::store::StoreError;

use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::state::{AppState, AuthMode, AuthScreen, FeedScreen, Notice, Screen};

/// The main reducer function.
///
/// Takes the current state and an event, mutates state, and returns effects
/// for the runtime to execute.
pub fn update(state: &mut AppState, event: UiEvent) -> Vec<UiEffect> {
    match event {
        UiEvent::Tick => {
            state.spinner_frame = state.spinner_frame.wrapping_add(1);
            vec![]
        }
        UiEvent::Terminal(term_event) => handle_terminal_event(state, term_event),
        UiEvent::SignupCompleted { result } => {
            handle_signup_completed(state, result);
            vec![]
        }
        UiEvent::LoginCompleted { username, result } => {
            handle_login_completed(state, username, result)
        }
        UiEvent::HeadlinesLoaded { category, result } => {
            handle_headlines_loaded(state, category, result);
            vec![]
        }
    }
}

fn handle_terminal_event(state: &mut AppState, event: Event) -> Vec<UiEffect> {
    let Event::Key(key) = event else {
        return vec![];
    };
    // Ignore key release events (kitty protocol reports both)
    if key.kind == KeyEventKind::Release {
        return vec![];
    }

    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        state.should_quit = true;
        return vec![];
    }

    if matches!(state.screen, Screen::Auth(_)) {
        handle_auth_key(state, key)
    } else {
        handle_feed_key(state, key)
    }
}

// ============================================================================
// Auth screen
// ============================================================================

fn handle_auth_key(state: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    let Screen::Auth(auth) = &mut state.screen else {
        return vec![];
    };

    match key.code {
        KeyCode::Esc => {
            state.should_quit = true;
            vec![]
        }
        KeyCode::Tab | KeyCode::Up | KeyCode::Down => {
            auth.focus = auth.focus.next();
            vec![]
        }
        KeyCode::Left | KeyCode::Right => {
            auth.mode = auth.mode.toggled();
            state.notice = None;
            vec![]
        }
        KeyCode::Enter => {
            if auth.submitting {
                return vec![];
            }
            auth.submitting = true;
            let username = auth.username.clone();
            let password = auth.password.clone();
            match auth.mode {
                AuthMode::Login => vec![UiEffect::SubmitLogin { username, password }],
                AuthMode::Signup => vec![UiEffect::SubmitSignup { username, password }],
            }
        }
        KeyCode::Backspace => {
            auth.focused_buffer_mut().pop();
            vec![]
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            auth.focused_buffer_mut().push(c);
            vec![]
        }
        _ => vec![],
    }
}

fn handle_signup_completed(state: &mut AppState, result: Result<(), StoreError>) {
    let Screen::Auth(auth) = &mut state.screen else {
        return;
    };
    auth.submitting = false;

    match result {
        Ok(()) => {
            state.notice = Some(Notice::success("Signup successful! Please log in."));
            auth.mode = AuthMode::Login;
            auth.password.clear();
        }
        Err(e @ StoreError::EmptyField) => {
            state.notice = Some(Notice::warning(e.to_string()));
        }
        Err(e) => {
            state.notice = Some(Notice::error(e.to_string()));
        }
    }
}

fn handle_login_completed(
    state: &mut AppState,
    username: String,
    result: Result<(), StoreError>,
) -> Vec<UiEffect> {
    let Screen::Auth(auth) = &mut state.screen else {
        return vec![];
    };
    auth.submitting = false;

    match result {
        Ok(()) => {
            state.session.begin(username);
            state.notice = Some(Notice::success("Logged in successfully!"));
            let category = Category::default();
            state.screen = Screen::Feed(FeedScreen::loading(category));
            vec![UiEffect::FetchHeadlines { category }]
        }
        Err(e) => {
            state.notice = Some(Notice::error(e.to_string()));
            vec![]
        }
    }
}

// ============================================================================
// Feed screen
// ============================================================================

fn handle_feed_key(state: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    let Screen::Feed(feed) = &mut state.screen else {
        return vec![];
    };

    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => {
            state.should_quit = true;
            vec![]
        }
        KeyCode::Char('l') => {
            logout(state);
            vec![]
        }
        KeyCode::Up | KeyCode::Char('k') => {
            feed.selected = feed.selected.saturating_sub(1);
            vec![]
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if !feed.articles.is_empty() {
                feed.selected = (feed.selected + 1).min(feed.articles.len() - 1);
            }
            vec![]
        }
        KeyCode::Left | KeyCode::Char('h') => switch_category(state, CategoryStep::Previous),
        KeyCode::Right | KeyCode::Tab => switch_category(state, CategoryStep::Next),
        KeyCode::Char(c @ '1'..='5') => {
            let index = (c as usize) - ('1' as usize);
            let category = Category::all()[index];
            select_category(state, category)
        }
        KeyCode::Char('g') => {
            let category = feed.category;
            *feed = FeedScreen::loading(category);
            vec![UiEffect::FetchHeadlines { category }]
        }
        KeyCode::Enter | KeyCode::Char('r') => {
            toggle_reveal(feed, Reveal::Link);
            vec![]
        }
        KeyCode::Char('s') => {
            toggle_reveal(feed, Reveal::Share);
            vec![]
        }
        _ => vec![],
    }
}

enum CategoryStep {
    Previous,
    Next,
}

enum Reveal {
    Link,
    Share,
}

fn switch_category(state: &mut AppState, step: CategoryStep) -> Vec<UiEffect> {
    let Screen::Feed(feed) = &state.screen else {
        return vec![];
    };

    let all = Category::all();
    let current = all
        .iter()
        .position(|c| *c == feed.category)
        .unwrap_or_default();
    let next = match step {
        CategoryStep::Next => (current + 1) % all.len(),
        CategoryStep::Previous => (current + all.len() - 1) % all.len(),
    };
    select_category(state, all[next])
}

fn select_category(state: &mut AppState, category: Category) -> Vec<UiEffect> {
    let Screen::Feed(feed) = &mut state.screen else {
        return vec![];
    };
    if feed.category == category && !feed.articles.is_empty() {
        return vec![];
    }

    *feed = FeedScreen::loading(category);
    state.notice = None;
    vec![UiEffect::FetchHeadlines { category }]
}

fn toggle_reveal(feed: &mut FeedScreen, reveal: Reveal) {
    if feed.articles.is_empty() {
        return;
    }
    let set = match reveal {
        Reveal::Link => &mut feed.revealed_links,
        Reveal::Share => &mut feed.revealed_shares,
    };
    if !set.remove(&feed.selected) {
        set.insert(feed.selected);
    }
}

fn logout(state: &mut AppState) {
    state.session.reset();
    state.screen = Screen::Auth(AuthScreen::default());
    state.notice = Some(Notice::success("Logged out."));
}

fn handle_headlines_loaded(
    state: &mut AppState,
    category: Category,
    result: Result<Vec<newsbee_core::news::Article>, newsbee_core::news::NewsError>,
) {
    let Screen::Feed(feed) = &mut state.screen else {
        return;
    };
    // Drop stale results from a category the user has already left
    if feed.category != category {
        return;
    }

    match result {
        Ok(articles) => {
            feed.set_articles(articles);
            state.notice = None;
        }
        Err(e) => {
            // Report the failure and show an empty feed; nothing raises.
            feed.set_articles(Vec::new());
            state.notice = Some(Notice::error(e.to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use newsbee_core::news::{Article, NewsError};
    use newsbee_core::store::StoreError;

    use super::*;
    use crate::state::NoticeKind;

    fn key(code: KeyCode) -> UiEvent {
        UiEvent::Terminal(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    fn article(title: &str) -> Article {
        Article {
            title: title.to_string(),
            description: None,
            url_to_image: None,
            url: format!("https://example.com/{title}"),
        }
    }

    fn feed_state(articles: Vec<Article>) -> AppState {
        let mut state = AppState::new();
        state.session.begin("alice");
        let mut feed = FeedScreen::loading(Category::General);
        feed.set_articles(articles);
        state.screen = Screen::Feed(feed);
        state
    }

    /// Typing fills the focused field; Tab moves focus to the password.
    #[test]
    fn test_auth_typing_and_focus() {
        let mut state = AppState::new();

        update(&mut state, key(KeyCode::Char('a')));
        update(&mut state, key(KeyCode::Tab));
        update(&mut state, key(KeyCode::Char('p')));
        update(&mut state, key(KeyCode::Char('w')));
        update(&mut state, key(KeyCode::Backspace));

        let Screen::Auth(auth) = &state.screen else {
            panic!("expected auth screen");
        };
        assert_eq!(auth.username, "a");
        assert_eq!(auth.password, "p");
    }

    /// Enter on the login form emits a login effect with the typed fields.
    #[test]
    fn test_auth_enter_submits_login() {
        let mut state = AppState::new();
        update(&mut state, key(KeyCode::Char('a')));
        update(&mut state, key(KeyCode::Tab));
        update(&mut state, key(KeyCode::Char('p')));

        let effects = update(&mut state, key(KeyCode::Enter));
        assert_eq!(
            effects,
            vec![UiEffect::SubmitLogin {
                username: "a".to_string(),
                password: "p".to_string()
            }]
        );

        // A second Enter while submitting is ignored
        assert!(update(&mut state, key(KeyCode::Enter)).is_empty());
    }

    /// Right arrow toggles to the signup form; Enter submits a signup.
    #[test]
    fn test_auth_mode_toggle_submits_signup() {
        let mut state = AppState::new();
        update(&mut state, key(KeyCode::Right));
        update(&mut state, key(KeyCode::Char('a')));

        let effects = update(&mut state, key(KeyCode::Enter));
        assert!(matches!(effects[0], UiEffect::SubmitSignup { .. }));
    }

    /// Successful login starts the session and fetches the default category.
    #[test]
    fn test_login_success_opens_feed() {
        let mut state = AppState::new();

        let effects = update(
            &mut state,
            UiEvent::LoginCompleted {
                username: "alice".to_string(),
                result: Ok(()),
            },
        );

        assert!(state.session.is_logged_in());
        assert_eq!(state.session.username.as_deref(), Some("alice"));
        assert!(matches!(state.screen, Screen::Feed(_)));
        assert_eq!(
            effects,
            vec![UiEffect::FetchHeadlines {
                category: Category::General
            }]
        );
    }

    /// Failed login stays on the auth screen with an error notice.
    #[test]
    fn test_login_failure_shows_notice() {
        let mut state = AppState::new();

        let effects = update(
            &mut state,
            UiEvent::LoginCompleted {
                username: "alice".to_string(),
                result: Err(StoreError::InvalidCredentials),
            },
        );

        assert!(effects.is_empty());
        assert!(!state.session.is_logged_in());
        assert!(matches!(state.screen, Screen::Auth(_)));
        let notice = state.notice.unwrap();
        assert_eq!(notice.kind, NoticeKind::Error);
        assert!(notice.text.contains("Invalid username or password"));
    }

    /// Successful signup flips back to the login form and clears the password.
    #[test]
    fn test_signup_success_switches_to_login() {
        let mut state = AppState::new();
        update(&mut state, key(KeyCode::Right)); // signup mode
        update(&mut state, key(KeyCode::Tab));
        update(&mut state, key(KeyCode::Char('p')));

        update(&mut state, UiEvent::SignupCompleted { result: Ok(()) });

        let Screen::Auth(auth) = &state.screen else {
            panic!("expected auth screen");
        };
        assert_eq!(auth.mode, AuthMode::Login);
        assert!(auth.password.is_empty());
        assert_eq!(state.notice.as_ref().unwrap().kind, NoticeKind::Success);
    }

    /// Empty-field signup surfaces as a warning, not an error.
    #[test]
    fn test_signup_empty_field_is_warning() {
        let mut state = AppState::new();

        update(
            &mut state,
            UiEvent::SignupCompleted {
                result: Err(StoreError::EmptyField),
            },
        );

        assert_eq!(state.notice.as_ref().unwrap().kind, NoticeKind::Warning);
    }

    /// A fetch failure becomes an empty feed plus a notice with the status.
    #[test]
    fn test_fetch_failure_is_empty_feed_with_notice() {
        let mut state = AppState::new();
        state.session.begin("alice");
        state.screen = Screen::Feed(FeedScreen::loading(Category::General));

        update(
            &mut state,
            UiEvent::HeadlinesLoaded {
                category: Category::General,
                result: Err(NewsError::HttpStatus { status: 404 }),
            },
        );

        let Screen::Feed(feed) = &state.screen else {
            panic!("expected feed screen");
        };
        assert!(feed.articles.is_empty());
        assert!(!feed.loading);
        assert!(state.notice.unwrap().text.contains("404"));
    }

    /// Results for a category the user already left are dropped.
    #[test]
    fn test_stale_fetch_result_is_dropped() {
        let mut state = AppState::new();
        state.session.begin("alice");
        state.screen = Screen::Feed(FeedScreen::loading(Category::Sports));

        update(
            &mut state,
            UiEvent::HeadlinesLoaded {
                category: Category::General,
                result: Ok(vec![article("stale")]),
            },
        );

        let Screen::Feed(feed) = &state.screen else {
            panic!("expected feed screen");
        };
        assert!(feed.articles.is_empty());
        assert!(feed.loading);
    }

    /// Category switch resets the feed and emits a fetch effect.
    #[test]
    fn test_category_switch_fetches() {
        let mut state = feed_state(vec![article("a")]);

        let effects = update(&mut state, key(KeyCode::Right));
        assert_eq!(
            effects,
            vec![UiEffect::FetchHeadlines {
                category: Category::Business
            }]
        );

        let Screen::Feed(feed) = &state.screen else {
            panic!("expected feed screen");
        };
        assert_eq!(feed.category, Category::Business);
        assert!(feed.loading);
    }

    /// Number keys jump straight to a category.
    #[test]
    fn test_number_key_selects_category() {
        let mut state = feed_state(vec![article("a")]);

        let effects = update(&mut state, key(KeyCode::Char('5')));
        assert_eq!(
            effects,
            vec![UiEffect::FetchHeadlines {
                category: Category::Technology
            }]
        );
    }

    /// Enter toggles the article-link reveal; 's' toggles the share links.
    #[test]
    fn test_reveal_toggles() {
        let mut state = feed_state(vec![article("a"), article("b")]);

        update(&mut state, key(KeyCode::Down));
        update(&mut state, key(KeyCode::Enter));
        update(&mut state, key(KeyCode::Char('s')));

        let Screen::Feed(feed) = &state.screen else {
            panic!("expected feed screen");
        };
        assert!(feed.revealed_links.contains(&1));
        assert!(feed.revealed_shares.contains(&1));

        // Toggling again hides
        update(&mut state, key(KeyCode::Enter));
        let Screen::Feed(feed) = &state.screen else {
            panic!("expected feed screen");
        };
        assert!(!feed.revealed_links.contains(&1));
    }

    /// Logout resets the session and returns to the auth screen.
    #[test]
    fn test_logout_resets_session() {
        let mut state = feed_state(vec![article("a")]);
        assert!(state.session.is_logged_in());

        update(&mut state, key(KeyCode::Char('l')));

        assert!(!state.session.is_logged_in());
        assert_eq!(state.session.username, None);
        assert!(matches!(state.screen, Screen::Auth(_)));
    }

    /// Ctrl+C quits from any screen.
    #[test]
    fn test_ctrl_c_quits() {
        let mut state = AppState::new();
        update(
            &mut state,
            UiEvent::Terminal(Event::Key(KeyEvent::new(
                KeyCode::Char('c'),
                KeyModifiers::CONTROL,
            ))),
        );
        assert!(state.should_quit);
    }

    /// Selection clamps at the end of the list.
    #[test]
    fn test_selection_clamps() {
        let mut state = feed_state(vec![article("a"), article("b")]);

        for _ in 0..5 {
            update(&mut state, key(KeyCode::Down));
        }
        let Screen::Feed(feed) = &state.screen else {
            panic!("expected feed screen");
        };
        assert_eq!(feed.selected, 1);
    }
}
