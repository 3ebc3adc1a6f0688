use crate::catalogue::Catalogue;
use crate::export::ExportFormat;
use crate::fetch_worker::FetchRequest;
use crate::selection::SelectionList;
use crate::url_sync::UrlSynchronizer;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::mpsc::Sender;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    #[serde(default)]
    pub correct: bool,
}

/// One catalogue question. `identifier` is its index in the catalogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionRecord {
    pub identifier: usize,
    pub text: String,
    pub answers: Vec<Answer>,
}

impl QuestionRecord {
    /// Whether "Vrai" (the first answer) is the correct one.
    pub fn first_answer_correct(&self) -> bool {
        self.answers.first().is_some_and(|a| a.correct)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionEntry {
    pub identifier: usize,
    pub text: String,
}

impl From<&QuestionRecord> for SelectionEntry {
    fn from(record: &QuestionRecord) -> Self {
        Self {
            identifier: record.identifier,
            text: record.text.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Search,
    Results,
    Selection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareField {
    Penalty,
    Nickname,
    Randomize,
}

/// Inputs of the share screen and the outputs of the last share action.
#[derive(Debug, Clone, PartialEq)]
pub struct ShareForm {
    pub penalty: String,
    pub nickname: String,
    pub randomize: bool,
    pub field: ShareField,
    pub quiz_url: Option<String>,
    pub qr_code: Option<String>,
    pub mailto: Option<String>,
    pub error: Option<String>,
}

impl Default for ShareForm {
    fn default() -> Self {
        Self {
            penalty: "0".to_string(),
            nickname: String::new(),
            // "Non" is the preselected choice.
            randomize: false,
            field: ShareField::Penalty,
            quiz_url: None,
            qr_code: None,
            mailto: None,
            error: None,
        }
    }
}

impl ShareForm {
    /// Drops the generated link, QR code and mail link.
    pub fn invalidate(&mut self) {
        self.quiz_url = None;
        self.qr_code = None;
        self.mailto = None;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportPreview {
    pub format: ExportFormat,
    pub content: String,
    pub scroll_y: u16,
}

/// Whole application state. Handlers in [`crate::session`] mutate it.
#[derive(Debug)]
pub struct ComposerSession {
    pub catalogue: Catalogue,
    pub catalogue_url: String,
    pub catalogue_loaded: bool,
    pub query: String,
    pub cursor_position: usize,
    /// Identifiers matching `query`, catalogue order.
    pub results: Vec<usize>,
    pub selected_result: usize,
    pub selection: SelectionList,
    pub selected_entry: usize,
    pub url: UrlSynchronizer,
    /// Identifiers from the deep link, applied once the catalogue arrives.
    pub pending_restore: Vec<usize>,
    pub focus: Focus,
    pub share: ShareForm,
    pub preview: Option<ExportPreview>,
    /// Standalone document waiting for the preamble download.
    pub pending_document: Option<ExportFormat>,
    pub export_dir: PathBuf,
    pub quiz_base_url: String,
    pub preamble_url: String,
    pub status: Option<String>,
    /// Text for the main loop to put on the terminal clipboard.
    pub pending_clipboard: Option<String>,
    pub fetch_tx: Option<Sender<FetchRequest>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Loading,
    Browse,
    Share,
    ExportPreview,
    QuitConfirm,
    Exit,
}
