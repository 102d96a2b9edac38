//! Full-screen TUI implementation for NewsBee.

pub mod effects;
pub mod events;
pub mod render;
pub mod runtime;
pub mod state;
pub mod terminal;
pub mod update;

use std::io::{IsTerminal, Write, stderr};
use std::sync::Arc;

use anyhow::Result;
use newsbee_core::config::{Config, paths};
use newsbee_core::news::NewsClient;
use newsbee_core::store::CredentialStore;
pub use runtime::TuiRuntime;

use crate::state::{Notice, NoticeKind};

/// Runs the interactive news reader.
///
/// # Errors
/// Returns an error if stderr is not a terminal, the news client cannot be
/// built (missing API key, bad base URL), or terminal setup fails.
pub async fn run_app(config: &Config) -> Result<()> {
    // The reader requires a terminal to render the TUI
    if !stderr().is_terminal() {
        anyhow::bail!("NewsBee requires a terminal.");
    }

    let store = Arc::new(CredentialStore::open(paths::users_path()));
    let news = Arc::new(NewsClient::from_config(config)?);

    // Print pre-TUI info to stderr (will be replaced by alternate screen)
    let mut err = stderr();
    writeln!(err, "NewsBee")?;
    writeln!(err, "Users file: {}", store.path().display())?;
    err.flush()?;

    let load_warning = store.load_warning().map(str::to_string);

    let mut runtime = TuiRuntime::new(store, news)?;
    if let Some(warning) = load_warning {
        runtime.state.notice = Some(Notice::new(NoticeKind::Warning, warning));
    }

    runtime.run()?;

    // Print goodbye after TUI exits (terminal restored)
    writeln!(stderr(), "Goodbye!")?;

    Ok(())
}
