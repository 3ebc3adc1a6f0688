use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use quiz_builder::catalogue::Catalogue;
use quiz_builder::config::QuizConfig;
use quiz_builder::error::Result;
use quiz_builder::fetch_worker::{spawn_fetch_worker, FetchRequest, FetchResponse};
use quiz_builder::models::{AppState, ComposerSession};
use quiz_builder::session::handle_key;
use quiz_builder::share::copy_to_clipboard;
use quiz_builder::url_sync::{UrlSynchronizer, LISTE_PARAM};
use quiz_builder::{logger, ui};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

/// Build true/false quizzes from the exo7 catalogue and export them for AMC or Moodle.
#[derive(Debug, Parser)]
#[command(name = "quiz-builder", version, about)]
struct Args {
    /// Configuration file (defaults to the platform config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Composer address to restore, e.g. `https://.../edit-new.html?liste=3+10+2`
    #[arg(long, conflicts_with = "liste")]
    url: Option<String>,

    /// Selection to restore, e.g. `3+10+2`
    #[arg(short, long)]
    liste: Option<String>,

    /// Read the catalogue from a local JSON file instead of downloading it
    #[arg(long)]
    catalogue_file: Option<PathBuf>,

    /// Directory for exported files
    #[arg(short, long)]
    export_dir: Option<PathBuf>,

    /// Log filter, overridden by RUST_LOG
    #[arg(long)]
    log_level: Option<String>,
}

fn load_config(args: &Args) -> Result<QuizConfig> {
    let mut config = QuizConfig::load_or_default(args.config.as_deref())?;
    if let Some(path) = &args.catalogue_file {
        config.catalogue_file = Some(path.clone());
    }
    if let Some(dir) = &args.export_dir {
        config.export_dir = dir.clone();
    }
    if let Some(level) = &args.log_level {
        config.log_level = level.clone();
    }
    Ok(config)
}

fn initial_location(args: &Args, config: &QuizConfig) -> Result<UrlSynchronizer> {
    match (&args.url, &args.liste) {
        (Some(url), _) => UrlSynchronizer::from_location(url),
        (None, Some(liste)) => {
            let page = UrlSynchronizer::new(&config.page_url);
            UrlSynchronizer::from_location(&format!("{}?{}={}", page.page(), LISTE_PARAM, liste))
        }
        (None, None) => Ok(UrlSynchronizer::new(&config.page_url)),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_config(&args)?;
    logger::init(&config.log_file, &config.log_level);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "quiz-builder starting");

    let url = initial_location(&args, &config)?;
    let mut session = ComposerSession::new(&config, url);
    let mut app_state = AppState::Loading;

    let (request_tx, request_rx) = mpsc::channel();
    let (response_tx, response_rx) = mpsc::channel();
    let worker = spawn_fetch_worker(
        response_tx,
        request_rx,
        Duration::from_secs(config.request_timeout_secs),
    )?;
    session.fetch_tx = Some(request_tx);

    match &config.catalogue_file {
        Some(path) => match Catalogue::load_file(path) {
            Ok(catalogue) => {
                session.apply_catalogue(catalogue);
                app_state = AppState::Browse;
            }
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "cannot read catalogue file");
                session.status = Some(format!("Catalogue illisible : {}", e));
            }
        },
        None => {
            session.request_fetch(FetchRequest::Catalogue {
                url: config.catalogue_url.clone(),
            });
        }
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut session, &mut app_state, &response_rx);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // the worker exits once its request channel is gone
    session.fetch_tx = None;
    if worker.join().is_err() {
        tracing::warn!("fetch worker panicked");
    }

    result?;
    tracing::info!(location = %session.url.location(), "quiz-builder exiting");
    println!("{}", session.url.location());
    Ok(())
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    session: &mut ComposerSession,
    app_state: &mut AppState,
    responses: &Receiver<FetchResponse>,
) -> Result<()> {
    loop {
        while let Ok(response) = responses.try_recv() {
            session.handle_fetch_response(response, app_state);
        }

        terminal.draw(|f| ui::draw(f, session, *app_state))?;

        if event::poll(Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
        {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                break;
            }
            handle_key(session, key, app_state);
        }

        if let Some(text) = session.pending_clipboard.take() {
            match copy_to_clipboard(terminal.backend_mut(), &text) {
                Ok(()) => session.status = Some("Copié dans le presse-papiers".to_string()),
                Err(e) => {
                    tracing::warn!(error = %e, "clipboard write failed");
                    session.status = Some(format!("Copie impossible : {}", e));
                }
            }
        }

        if *app_state == AppState::Exit {
            break;
        }
    }
    Ok(())
}
