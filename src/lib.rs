pub mod catalogue;
pub mod config;
pub mod error;
pub mod export;
pub mod fetch_worker;
pub mod file_io;
pub mod logger;
pub mod models;
pub mod search;
pub mod selection;
pub mod session;
pub mod share;
pub mod ui;
pub mod url_sync;
pub mod utils;


// Re-exports for convenience
pub use catalogue::{fetch_catalogue, Catalogue};
pub use config::QuizConfig;
pub use error::{QuizError, Result};
pub use export::ExportFormat;
pub use models::{AppState, ComposerSession, QuestionRecord, SelectionEntry};
pub use search::search;
pub use selection::{SelectionList, SelectionListener};
pub use session::handle_key;
pub use url_sync::UrlSynchronizer;
