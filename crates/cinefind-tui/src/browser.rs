//! Movie browser TUI main loop.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use cinefind_api::tmdb::{Movie, TmdbApi};
use crossterm::event::{Event, EventStream, KeyEvent, KeyEventKind};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use futures::StreamExt;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::time::Instant;

use crate::debounce;
use crate::fetch::{FetchSettings, TrendingSettings, fetch_movies, fetch_trending};
use crate::input::{InputAction, InputEdit, key_action};
use crate::session::{BrowserSession, BrowserSettings, InputMode, SearchRequest};
use crate::trending::TrendingEntry;
use crate::ui;

/// Movie pages on the TMDB website.
pub const TMDB_MOVIE_PAGE_URL: &str = "https://www.themoviedb.org/movie";

/// Redraw interval for the loading spinner.
const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Completion reported by a spawned fetch task.
#[derive(Debug)]
enum BrowserEvent {
    /// A results request finished.
    SearchFinished {
        seq: u64,
        result: Result<Vec<Movie>>,
    },
    /// The trending strip is ready (empty on failure).
    TrendingLoaded(Vec<TrendingEntry>),
}

/// Runs the movie browser TUI until the user quits.
///
/// Starts the discovery and trending fetches immediately.
///
/// # Errors
///
/// Returns an error if terminal setup or event handling fails.
pub async fn run_browser<A>(api: Arc<A>, settings: BrowserSettings) -> Result<()>
where
    A: TmdbApi + Send + Sync + 'static,
{
    tracing::info!("Starting movie browser");
    let mut session = BrowserSession::new(settings);

    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen)
        .context("failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal")?;

    let result = run_event_loop(&mut terminal, &mut session, &api).await;

    // Cleanup (always attempt even if event loop failed)
    disable_raw_mode().context("failed to disable raw mode")?;
    crossterm::execute!(io::stdout(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;

    tracing::info!("Movie browser closed");
    result
}

/// Main event loop.
async fn run_event_loop<A>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    session: &mut BrowserSession,
    api: &Arc<A>,
) -> Result<()>
where
    A: TmdbApi + Send + Sync + 'static,
{
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut events = EventStream::new();
    let mut ticker = tokio::time::interval(TICK_INTERVAL);
    let mut tick: usize = 0;

    start_fetches(session, api, &tx);

    loop {
        terminal
            .draw(|frame| ui::draw(frame, session, tick))
            .context("failed to draw TUI")?;

        tokio::select! {
            maybe_event = events.next() => match maybe_event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    if handle_key(session, key) {
                        return Ok(());
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(err)) => return Err(err).context("failed to read event"),
                None => return Ok(()),
            },
            Some(event) = rx.recv() => apply_event(session, event),
            () = debounce::until(session.debounce_deadline()) => {
                if let Some(request) = session.settle_debounce(Instant::now()) {
                    spawn_search(api, &session.settings().fetch, request, &tx);
                }
            }
            _ = ticker.tick() => tick = tick.wrapping_add(1),
        }
    }
}

/// Issues the initial results request for the current term, without
/// waiting for the debounce, and the one-time trending fetch.
fn start_fetches<A>(
    session: &mut BrowserSession,
    api: &Arc<A>,
    tx: &UnboundedSender<BrowserEvent>,
) where
    A: TmdbApi + Send + Sync + 'static,
{
    let term = session.search_term().to_owned();
    let initial = session.begin_search(term);
    spawn_search(api, &session.settings().fetch, initial, tx);
    spawn_trending(api, &session.settings().trending, tx);
}

/// Applies a fetch completion to the session.
fn apply_event(session: &mut BrowserSession, event: BrowserEvent) {
    match event {
        BrowserEvent::SearchFinished { seq, result } => {
            session.complete_search(seq, result);
        }
        BrowserEvent::TrendingLoaded(entries) => session.set_trending(entries),
    }
}

/// Spawns a results request that reports back through `tx`.
fn spawn_search<A>(
    api: &Arc<A>,
    settings: &FetchSettings,
    request: SearchRequest,
    tx: &UnboundedSender<BrowserEvent>,
) where
    A: TmdbApi + Send + Sync + 'static,
{
    let api = Arc::clone(api);
    let settings = settings.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let result = fetch_movies(api.as_ref(), &request.query, &settings).await;
        let _ = tx.send(BrowserEvent::SearchFinished {
            seq: request.seq,
            result,
        });
    });
}

/// Spawns the one-time trending fetch.
fn spawn_trending<A>(
    api: &Arc<A>,
    settings: &TrendingSettings,
    tx: &UnboundedSender<BrowserEvent>,
) where
    A: TmdbApi + Send + Sync + 'static,
{
    let api = Arc::clone(api);
    let settings = settings.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let entries = fetch_trending(api.as_ref(), &settings).await;
        let _ = tx.send(BrowserEvent::TrendingLoaded(entries));
    });
}

/// Handles a key press. Returns `true` to exit.
fn handle_key(session: &mut BrowserSession, key: KeyEvent) -> bool {
    let Some(action) = key_action(session.input_mode, key) else {
        return false;
    };
    match action {
        InputAction::Quit => return true,
        InputAction::Edit(edit) => session.apply_edit(edit),
        InputAction::StartEditing => session.input_mode = InputMode::Editing,
        InputAction::StopEditing => session.input_mode = InputMode::Normal,
        InputAction::CancelEditing => {
            session.apply_edit(InputEdit::Clear);
            session.input_mode = InputMode::Normal;
        }
        InputAction::MoveUp => session.move_up(),
        InputAction::MoveDown => session.move_down(),
        InputAction::OpenSelected => open_movie_page(session),
    }
    false
}

/// TMDB website page of a movie.
#[must_use]
pub fn movie_page_url(id: u64) -> String {
    format!("{TMDB_MOVIE_PAGE_URL}/{id}")
}

/// Opens the TMDB page of the selected movie in the default browser.
fn open_movie_page(session: &BrowserSession) {
    let Some(movie) = session.selected_movie() else {
        return;
    };
    let url = movie_page_url(movie.id);
    if let Err(err) = open::that(&url) {
        tracing::warn!("Failed to open {url}: {err}");
    }
}
