//! Pure view/render functions for the TUI.
//!
//! Functions here take `&AppState` by immutable reference, draw to a ratatui
//! Frame, and never mutate state or return effects.

use chrono::Local;
use newsbee_core::news::Category;
use newsbee_core::share;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::state::{AppState, AuthField, AuthMode, AuthScreen, FeedScreen, Notice, NoticeKind, Screen};

/// Height of the header line.
const HEADER_HEIGHT: u16 = 1;

/// Height of the footer (key hints + notice line).
const FOOTER_HEIGHT: u16 = 2;

/// Spinner frames for the in-flight fetch indicator.
const SPINNER_FRAMES: &[&str] = &["◐", "◓", "◑", "◒"];

/// Placeholder when an article carries no description.
const NO_DESCRIPTION: &str = "No description available.";

/// Notice shown for an empty headline list.
const NO_ARTICLES: &str = "No articles found.";

/// Renders the entire TUI to the frame.
pub fn render(state: &AppState, frame: &mut Frame) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Min(1),
            Constraint::Length(FOOTER_HEIGHT),
        ])
        .split(area);

    render_header(state, frame, chunks[0]);

    match &state.screen {
        Screen::Auth(auth) => render_auth(auth, frame, chunks[1]),
        Screen::Feed(feed) => render_feed(feed, state.spinner_frame, frame, chunks[1]),
    }

    render_footer(state, frame, chunks[2]);
}

/// Renders the header: app title, and username plus clock when logged in.
fn render_header(state: &AppState, frame: &mut Frame, area: Rect) {
    let title = Span::styled(
        " NewsBee ",
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    );

    let right = if state.session.is_logged_in() {
        let username = state.session.username.as_deref().unwrap_or_default();
        let now = Local::now().format("%Y-%m-%d %H:%M:%S");
        format!("Welcome, {username}!  {now} ")
    } else {
        format!("{} ", Local::now().format("%Y-%m-%d %H:%M:%S"))
    };

    let right_width = right.len() as u16;
    frame.render_widget(Paragraph::new(Line::from(title)), area);
    let right_area = Rect {
        x: area.x + area.width.saturating_sub(right_width),
        y: area.y,
        width: right_width.min(area.width),
        height: area.height,
    };
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            right,
            Style::default().fg(Color::DarkGray),
        )))
        .alignment(Alignment::Right),
        right_area,
    );
}

// ============================================================================
// Auth screen
// ============================================================================

/// Renders the centered login/signup form.
fn render_auth(auth: &AuthScreen, frame: &mut Frame, area: Rect) {
    let popup_width = 44.min(area.width);
    let popup_height = 9.min(area.height);
    let popup_area = Rect {
        x: area.x + (area.width.saturating_sub(popup_width)) / 2,
        y: area.y + (area.height.saturating_sub(popup_height)) / 2,
        width: popup_width,
        height: popup_height,
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" {} ", auth.mode.title()));
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let para = Paragraph::new(auth_lines(auth));
    frame.render_widget(para, inner);
}

/// Builds the auth form lines: mode tabs, username and password fields, hints.
pub fn auth_lines(auth: &AuthScreen) -> Vec<Line<'static>> {
    let tab_style = |mode: AuthMode| {
        if auth.mode == mode {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        }
    };

    let field_style = |field: AuthField| {
        if auth.focus == field {
            Style::default().fg(Color::White)
        } else {
            Style::default().fg(Color::Gray)
        }
    };

    let cursor = |field: AuthField| if auth.focus == field { "_" } else { "" };

    let masked: String = "•".repeat(auth.password.chars().count());

    vec![
        Line::from(vec![
            Span::styled("  Log In ", tab_style(AuthMode::Login)),
            Span::raw("| "),
            Span::styled("Sign Up", tab_style(AuthMode::Signup)),
            Span::styled("   (←/→ to switch)", Style::default().fg(Color::DarkGray)),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Username: ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!("{}{}", auth.username, cursor(AuthField::Username)),
                field_style(AuthField::Username),
            ),
        ]),
        Line::from(vec![
            Span::styled("  Password: ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!("{}{}", masked, cursor(AuthField::Password)),
                field_style(AuthField::Password),
            ),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            if auth.submitting {
                "  Submitting..."
            } else {
                "  Tab switch field · Enter submit · Esc quit"
            },
            Style::default().fg(Color::DarkGray),
        )),
    ]
}

// ============================================================================
// Feed screen
// ============================================================================

/// Renders the category selector and the headline list.
fn render_feed(feed: &FeedScreen, spinner_frame: usize, frame: &mut Frame, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(area);

    frame.render_widget(Paragraph::new(category_tabs_line(feed.category)), chunks[0]);

    let (lines, block_starts) = feed_lines(feed, spinner_frame);

    // Scroll so the selected article's block is visible.
    let height = chunks[1].height as usize;
    let total = lines.len();
    let target = block_starts.get(feed.selected).copied().unwrap_or(0);
    let max_offset = total.saturating_sub(height);
    let offset = target.saturating_sub(1).min(max_offset);

    let para = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((offset as u16, 0));
    frame.render_widget(para, chunks[1]);
}

/// Builds the one-line category selector.
pub fn category_tabs_line(current: Category) -> Line<'static> {
    let mut spans = vec![Span::raw(" ")];
    for (index, category) in Category::all().iter().enumerate() {
        let style = if *category == current {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(
            format!("[{}] {}", index + 1, category.display_name()),
            style,
        ));
        spans.push(Span::raw("  "));
    }
    Line::from(spans)
}

/// Builds the feed body lines plus the starting line of each article block.
///
/// Pure: drives both rendering and scroll positioning, and is what the tests
/// assert against.
pub fn feed_lines(feed: &FeedScreen, spinner_frame: usize) -> (Vec<Line<'static>>, Vec<usize>) {
    if feed.loading {
        let spinner = SPINNER_FRAMES[spinner_frame % SPINNER_FRAMES.len()];
        return (
            vec![
                Line::from(""),
                Line::from(Span::styled(
                    format!(" {spinner} Fetching {} headlines...", feed.category),
                    Style::default().fg(Color::Yellow),
                )),
            ],
            Vec::new(),
        );
    }

    if feed.articles.is_empty() {
        return (
            vec![
                Line::from(""),
                Line::from(Span::styled(
                    format!(" {NO_ARTICLES}"),
                    Style::default().fg(Color::Yellow),
                )),
            ],
            Vec::new(),
        );
    }

    let mut lines = Vec::new();
    let mut block_starts = Vec::with_capacity(feed.articles.len());

    for (index, article) in feed.articles.iter().enumerate() {
        block_starts.push(lines.len());
        lines.extend(article_lines(feed, index, article));
    }

    (lines, block_starts)
}

/// Builds the lines for one article block.
fn article_lines(
    feed: &FeedScreen,
    index: usize,
    article: &newsbee_core::news::Article,
) -> Vec<Line<'static>> {
    let selected = index == feed.selected;
    let pointer = if selected { "> " } else { "  " };
    let title_style = if selected {
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };

    let mut lines = vec![Line::from(vec![
        Span::styled(pointer.to_string(), Style::default().fg(Color::Cyan)),
        Span::styled(article.title.clone(), title_style),
    ])];

    if let Some(image) = &article.url_to_image {
        lines.push(Line::from(Span::styled(
            format!("  [image] {image}"),
            Style::default().fg(Color::DarkGray),
        )));
    }

    let description = article
        .description
        .clone()
        .unwrap_or_else(|| NO_DESCRIPTION.to_string());
    lines.push(Line::from(Span::styled(
        format!("  {description}"),
        Style::default().fg(Color::Gray),
    )));

    if feed.revealed_links.contains(&index) {
        lines.push(Line::from(vec![
            Span::styled("  Link to article: ", Style::default().fg(Color::Green)),
            Span::styled(article.url.clone(), Style::default().fg(Color::Blue)),
        ]));
    }

    if feed.revealed_shares.contains(&index) {
        lines.push(Line::from(Span::styled(
            "  Share this article:",
            Style::default().fg(Color::Green),
        )));
        for link in share::share_links(&article.url) {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("    {:<9}", link.network.display_name()),
                    Style::default().fg(Color::Gray),
                ),
                Span::styled(link.url, Style::default().fg(Color::Blue)),
            ]));
        }
    }

    lines.push(Line::from(Span::styled(
        "  ---",
        Style::default().fg(Color::DarkGray),
    )));

    lines
}

// ============================================================================
// Footer
// ============================================================================

/// Renders the key hints and the notice line.
fn render_footer(state: &AppState, frame: &mut Frame, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(area);

    let hints = match &state.screen {
        Screen::Auth(_) => " ←/→ mode · Tab field · Enter submit · Ctrl+C quit",
        Screen::Feed(_) => {
            " ↑/↓ select · ←/→/1-5 category · Enter link · s share · g refresh · l logout · q quit"
        }
    };
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            hints,
            Style::default().fg(Color::DarkGray),
        ))),
        chunks[0],
    );

    if let Some(notice) = &state.notice {
        frame.render_widget(Paragraph::new(notice_line(notice)), chunks[1]);
    }
}

/// Builds the styled notice line.
pub fn notice_line(notice: &Notice) -> Line<'static> {
    let color = match notice.kind {
        NoticeKind::Success => Color::Green,
        NoticeKind::Warning => Color::Yellow,
        NoticeKind::Error => Color::Red,
    };
    Line::from(Span::styled(
        format!(" {}", notice.text),
        Style::default().fg(color),
    ))
}
