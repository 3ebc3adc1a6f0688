use crate::catalogue::Catalogue;
use crate::config::QuizConfig;
use crate::error::{QuizError, Result};
use crate::export::{self, ExportFormat};
use crate::fetch_worker::{FetchRequest, FetchResponse};
use crate::file_io::write_export;
use crate::models::{
    AppState, ComposerSession, ExportPreview, Focus, MoveDirection, SelectionEntry, ShareField,
    ShareForm,
};
use crate::search::search;
use crate::selection::{SelectionList, SelectionListener};
use crate::share::{self, ShareParams};
use crate::url_sync::{ParsedList, UrlSynchronizer};
use crate::utils::{insert_char, remove_char_before};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::path::PathBuf;

impl ComposerSession {
    /// Fresh session. The selection stored in `url` is applied once the
    /// catalogue is known.
    pub fn new(config: &QuizConfig, url: UrlSynchronizer) -> Self {
        let saved = url.read();
        let status = if saved.rejected.is_empty() {
            None
        } else {
            tracing::warn!(rejected = ?saved.rejected, "ignoring non-numeric identifiers in liste");
            Some(format!(
                "Identifiants ignorés : {}",
                saved.rejected.join(", ")
            ))
        };

        Self {
            catalogue: Catalogue::default(),
            catalogue_url: config.catalogue_url.clone(),
            catalogue_loaded: false,
            query: String::new(),
            cursor_position: 0,
            results: Vec::new(),
            selected_result: 0,
            selection: SelectionList::new(),
            selected_entry: 0,
            url,
            pending_restore: saved.identifiers,
            focus: Focus::Search,
            share: ShareForm::default(),
            preview: None,
            pending_document: None,
            export_dir: config.export_dir.clone(),
            quiz_base_url: config.quiz_url.clone(),
            preamble_url: config.preamble_url.clone(),
            status,
            pending_clipboard: None,
            fetch_tx: None,
        }
    }

    /// Installs the catalogue, restores the saved selection and runs the
    /// empty search.
    pub fn apply_catalogue(&mut self, catalogue: Catalogue) {
        self.catalogue = catalogue;
        self.catalogue_loaded = true;

        let saved = std::mem::take(&mut self.pending_restore);
        let issues = self.selection.restore(&saved, &self.catalogue);
        if !issues.is_empty() {
            let described: Vec<String> = issues.iter().map(ToString::to_string).collect();
            tracing::warn!(issues = ?described, "dropped identifiers while restoring selection");
            let partial = format!("Sélection partielle : {}", described.join(", "));
            self.status = Some(match self.status.take() {
                Some(previous) => format!("{} ; {}", previous, partial),
                None => partial,
            });
        }

        let restored = ParsedList {
            identifiers: self.selection.identifiers(),
            rejected: Vec::new(),
        };
        if self.url.read() != restored {
            self.notify_selection_changed();
        }

        tracing::info!(
            questions = self.catalogue.len(),
            selected = self.selection.len(),
            "catalogue ready"
        );
        self.refresh_results();
    }

    /// Recomputes the result list from the query and the selection.
    pub fn refresh_results(&mut self) {
        let excluded = self.selection.identifier_set();
        self.results = search(&self.query, &self.catalogue, &excluded)
            .into_iter()
            .map(|q| q.identifier)
            .collect();
        self.selected_result = self.selected_result.min(self.results.len().saturating_sub(1));
    }

    fn notify_selection_changed(&mut self) {
        let identifiers = self.selection.identifiers();
        let listeners: [&mut dyn SelectionListener; 1] = [&mut self.url];
        for listener in listeners {
            listener.selection_changed(&identifiers);
        }
        self.share.invalidate();
        self.selected_entry = self.selected_entry.min(self.selection.len().saturating_sub(1));
        self.refresh_results();
    }

    pub fn add_question(&mut self, identifier: usize) -> bool {
        let Some(record) = self.catalogue.get(identifier) else {
            tracing::warn!(identifier, "cannot add unknown question");
            return false;
        };
        let changed = self.selection.add(SelectionEntry::from(record));
        if changed {
            self.notify_selection_changed();
        }
        changed
    }

    pub fn remove_question(&mut self, identifier: usize) -> bool {
        let changed = self.selection.remove(identifier);
        if changed {
            self.notify_selection_changed();
        }
        changed
    }

    pub fn move_question(&mut self, identifier: usize, direction: MoveDirection) -> bool {
        let changed = self.selection.swap(identifier, direction);
        if changed {
            if let Some(position) = self.selection.position(identifier) {
                self.selected_entry = position;
            }
            self.notify_selection_changed();
        }
        changed
    }

    pub fn clear_selection(&mut self) -> bool {
        let changed = self.selection.clear();
        if changed {
            self.notify_selection_changed();
        }
        changed
    }

    pub fn highlighted_result(&self) -> Option<usize> {
        self.results.get(self.selected_result).copied()
    }

    pub fn highlighted_entry(&self) -> Option<usize> {
        self.selection
            .entries()
            .get(self.selected_entry)
            .map(|e| e.identifier)
    }

    pub fn export(&self, format: ExportFormat) -> Result<String> {
        if self.selection.is_empty() {
            return Err(QuizError::EmptySelection);
        }
        export::render(format, self.selection.entries(), &self.catalogue)
    }

    pub fn save_export(&self, format: ExportFormat) -> Result<PathBuf> {
        let content = self.export(format)?;
        let name = format.file_name(&self.selection.identifiers());
        write_export(&self.export_dir, &name, &content)
    }

    pub fn open_preview(&mut self, format: ExportFormat) -> Result<()> {
        let content = self.export(format)?;
        self.preview = Some(ExportPreview {
            format,
            content,
            scroll_y: 0,
        });
        Ok(())
    }

    /// Asks the worker for the preamble; the document is written when it arrives.
    pub fn request_document(&mut self, format: ExportFormat) -> Result<()> {
        if self.selection.is_empty() {
            return Err(QuizError::EmptySelection);
        }
        self.pending_document = None;
        let request = FetchRequest::Preamble {
            url: self.preamble_url.clone(),
            format,
        };
        if self.request_fetch(request) {
            self.pending_document = Some(format);
            self.status = Some("Téléchargement du préambule...".to_string());
        }
        Ok(())
    }

    /// Hands a download to the worker. On failure the status says why.
    pub fn request_fetch(&mut self, request: FetchRequest) -> bool {
        let Some(tx) = &self.fetch_tx else {
            tracing::warn!(?request, "no fetch worker");
            self.status = Some("Téléchargement indisponible".to_string());
            return false;
        };
        match tx.send(request) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(request = ?e.0, "fetch worker has stopped");
                self.fetch_tx = None;
                self.status = Some("Téléchargement indisponible : le service de téléchargement est arrêté".to_string());
                false
            }
        }
    }

    pub fn write_document(&mut self, format: ExportFormat, preamble: &str) -> Result<PathBuf> {
        let body = self.export(format)?;
        let document = export::standalone_document(preamble, &body);
        let name = format.document_file_name(&self.selection.identifiers());
        write_export(&self.export_dir, &name, &document)
    }

    pub fn share_params(&self) -> ShareParams {
        ShareParams {
            penalty: self.share.penalty.clone(),
            nickname: self.share.nickname.clone(),
            randomize: self.share.randomize,
        }
    }

    /// Builds the quiz link and its QR code with a new session id.
    pub fn build_share(&mut self) -> Result<String> {
        self.share.invalidate();

        let session_id = share::new_session_id();
        let url = match share::build_quiz_url(
            &self.quiz_base_url,
            &self.selection.identifiers(),
            &self.share_params(),
            &session_id,
        ) {
            Ok(url) => url,
            Err(e) => {
                tracing::info!(penalty = %self.share.penalty, "invalid penalty");
                self.share.error = Some(e.to_string());
                return Err(e);
            }
        };

        self.share.error = None;
        match share::render_qr(&url) {
            Ok(qr) => self.share.qr_code = Some(qr),
            Err(e) => tracing::warn!(error = %e, "QR code generation failed"),
        }
        self.share.quiz_url = Some(url.clone());
        Ok(url)
    }

    /// Mail link around a freshly built quiz link.
    pub fn mail_link(&mut self) -> Result<String> {
        let url = self.build_share()?;
        Ok(share::mailto_link(&self.selection.identifiers(), &url))
    }

    pub fn handle_fetch_response(&mut self, response: FetchResponse, app_state: &mut AppState) {
        match response {
            FetchResponse::Catalogue(catalogue) => {
                self.apply_catalogue(catalogue);
                if *app_state == AppState::Loading {
                    *app_state = AppState::Browse;
                }
            }
            FetchResponse::Preamble { format, text } => {
                if self.pending_document.take() != Some(format) {
                    return;
                }
                match self.write_document(format, &text) {
                    Ok(path) => self.status = Some(format!("Écrit : {}", path.display())),
                    Err(e) => self.report(e),
                }
            }
            FetchResponse::Error { what, error } => {
                self.pending_document = None;
                self.status = Some(format!("Échec du téléchargement ({}) : {}", what, error));
            }
        }
    }

    fn report(&mut self, error: QuizError) {
        tracing::warn!(error = %error, "action failed");
        self.status = Some(error.to_string());
    }

    fn report_saved(&mut self, result: Result<PathBuf>) {
        match result {
            Ok(path) => self.status = Some(format!("Écrit : {}", path.display())),
            Err(e) => self.report(e),
        }
    }
}

fn step_down(index: &mut usize, len: usize) {
    if *index < len.saturating_sub(1) {
        *index += 1;
    }
}

fn step_up(index: &mut usize) {
    *index = index.saturating_sub(1);
}

/// Keys available on the loading screen.
pub fn handle_loading_input(session: &mut ComposerSession, key: KeyEvent, app_state: &mut AppState) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => *app_state = AppState::Exit,
        KeyCode::Char('r') => {
            let request = FetchRequest::Catalogue {
                url: session.catalogue_url.clone(),
            };
            if session.request_fetch(request) {
                session.status = Some("Nouvelle tentative...".to_string());
            }
        }
        _ => {}
    }
}

pub fn handle_browse_input(session: &mut ComposerSession, key: KeyEvent, app_state: &mut AppState) {
    if key.code == KeyCode::Tab {
        session.focus = match session.focus {
            Focus::Search => Focus::Results,
            Focus::Results => Focus::Selection,
            Focus::Selection => Focus::Search,
        };
        return;
    }

    match session.focus {
        Focus::Search => handle_search_input(session, key),
        Focus::Results => handle_results_input(session, key, app_state),
        Focus::Selection => handle_selection_input(session, key, app_state),
    }
}

fn handle_search_input(session: &mut ComposerSession, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Down | KeyCode::Enter => session.focus = Focus::Results,
        KeyCode::Left => session.cursor_position = session.cursor_position.saturating_sub(1),
        KeyCode::Right => {
            session.cursor_position = (session.cursor_position + 1).min(session.query.chars().count());
        }
        KeyCode::Backspace => {
            session.cursor_position = remove_char_before(&mut session.query, session.cursor_position);
            session.selected_result = 0;
            session.refresh_results();
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            session.cursor_position = insert_char(&mut session.query, session.cursor_position, c);
            session.selected_result = 0;
            session.refresh_results();
        }
        _ => {}
    }
}

/// Shortcuts shared by the results and selection panes.
fn handle_global_key(session: &mut ComposerSession, key: KeyEvent, app_state: &mut AppState) -> bool {
    match key.code {
        KeyCode::Char('/') => session.focus = Focus::Search,
        KeyCode::Char('q') | KeyCode::Esc => *app_state = AppState::QuitConfirm,
        KeyCode::Char('a') => {
            let saved = session.save_export(ExportFormat::Amc);
            session.report_saved(saved);
        }
        KeyCode::Char('m') => {
            let saved = session.save_export(ExportFormat::Moodle);
            session.report_saved(saved);
        }
        KeyCode::Char(c @ ('A' | 'M')) => {
            let format = if c == 'A' { ExportFormat::Amc } else { ExportFormat::Moodle };
            match session.open_preview(format) {
                Ok(()) => *app_state = AppState::ExportPreview,
                Err(e) => session.report(e),
            }
        }
        KeyCode::Char(c @ ('d' | 'D')) => {
            let format = if c == 'd' { ExportFormat::Amc } else { ExportFormat::Moodle };
            if let Err(e) = session.request_document(format) {
                session.report(e);
            }
        }
        KeyCode::Char('s') => {
            session.share.error = None;
            *app_state = AppState::Share;
        }
        KeyCode::Char('y') => session.pending_clipboard = Some(session.url.location().to_string()),
        _ => return false,
    }
    true
}

fn handle_results_input(session: &mut ComposerSession, key: KeyEvent, app_state: &mut AppState) {
    if handle_global_key(session, key, app_state) {
        return;
    }
    match key.code {
        KeyCode::Up => {
            if session.selected_result == 0 {
                session.focus = Focus::Search;
            } else {
                step_up(&mut session.selected_result);
            }
        }
        KeyCode::Down => step_down(&mut session.selected_result, session.results.len()),
        KeyCode::Enter | KeyCode::Char('+') => {
            if let Some(identifier) = session.highlighted_result() {
                session.add_question(identifier);
            }
        }
        _ => {}
    }
}

fn handle_selection_input(session: &mut ComposerSession, key: KeyEvent, app_state: &mut AppState) {
    let shifted = key.modifiers.contains(KeyModifiers::SHIFT);
    match key.code {
        KeyCode::Up if shifted => {
            if let Some(identifier) = session.highlighted_entry() {
                session.move_question(identifier, MoveDirection::Up);
            }
        }
        KeyCode::Down if shifted => {
            if let Some(identifier) = session.highlighted_entry() {
                session.move_question(identifier, MoveDirection::Down);
            }
        }
        KeyCode::Char('K') => {
            if let Some(identifier) = session.highlighted_entry() {
                session.move_question(identifier, MoveDirection::Up);
            }
        }
        KeyCode::Char('J') => {
            if let Some(identifier) = session.highlighted_entry() {
                session.move_question(identifier, MoveDirection::Down);
            }
        }
        KeyCode::Up => step_up(&mut session.selected_entry),
        KeyCode::Down => step_down(&mut session.selected_entry, session.selection.len()),
        KeyCode::Delete | KeyCode::Backspace | KeyCode::Char('x') => {
            if let Some(identifier) = session.highlighted_entry() {
                session.remove_question(identifier);
            }
        }
        KeyCode::Char('c') => {
            session.clear_selection();
        }
        _ => {
            handle_global_key(session, key, app_state);
        }
    }
}

pub fn handle_share_input(session: &mut ComposerSession, key: KeyEvent, app_state: &mut AppState) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => *app_state = AppState::Browse,
        KeyCode::Tab | KeyCode::Down => {
            session.share.field = match session.share.field {
                ShareField::Penalty => ShareField::Nickname,
                ShareField::Nickname => ShareField::Randomize,
                ShareField::Randomize => ShareField::Penalty,
            };
        }
        KeyCode::BackTab | KeyCode::Up => {
            session.share.field = match session.share.field {
                ShareField::Penalty => ShareField::Randomize,
                ShareField::Nickname => ShareField::Penalty,
                ShareField::Randomize => ShareField::Nickname,
            };
        }
        KeyCode::Enter => {
            let _ = session.build_share();
        }
        KeyCode::Char('y') if ctrl => match &session.share.quiz_url {
            Some(url) => session.pending_clipboard = Some(url.clone()),
            None => session.share.error = Some("Aucun lien généré".to_string()),
        },
        KeyCode::Char('e') if ctrl => match session.mail_link() {
            Ok(link) => session.share.mailto = Some(link),
            Err(e) => tracing::debug!(error = %e, "mail link not built"),
        },
        KeyCode::Char(' ') | KeyCode::Left | KeyCode::Right
            if session.share.field == ShareField::Randomize =>
        {
            session.share.randomize = !session.share.randomize;
            session.share.invalidate();
        }
        KeyCode::Backspace => {
            match session.share.field {
                ShareField::Penalty => {
                    session.share.penalty.pop();
                }
                ShareField::Nickname => {
                    session.share.nickname.pop();
                }
                ShareField::Randomize => return,
            }
            session.share.invalidate();
        }
        KeyCode::Char(c) if !ctrl => {
            match session.share.field {
                ShareField::Penalty => session.share.penalty.push(c),
                ShareField::Nickname => session.share.nickname.push(c),
                ShareField::Randomize => return,
            }
            session.share.invalidate();
        }
        _ => {}
    }
}

pub fn handle_preview_input(session: &mut ComposerSession, key: KeyEvent, app_state: &mut AppState) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => {
            session.preview = None;
            *app_state = AppState::Browse;
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if let Some(preview) = &mut session.preview {
                preview.scroll_y = preview.scroll_y.saturating_add(1);
            }
        }
        KeyCode::Up | KeyCode::Char('k') => {
            if let Some(preview) = &mut session.preview {
                preview.scroll_y = preview.scroll_y.saturating_sub(1);
            }
        }
        KeyCode::Char('s') => {
            if let Some(format) = session.preview.as_ref().map(|p| p.format) {
                let saved = session.save_export(format);
                session.report_saved(saved);
            }
        }
        KeyCode::Char('y') => {
            if let Some(preview) = &session.preview {
                session.pending_clipboard = Some(preview.content.clone());
            }
        }
        _ => {}
    }
}

pub fn handle_quit_confirm_input(key: KeyEvent, app_state: &mut AppState) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Enter => *app_state = AppState::Exit,
        KeyCode::Char('n') | KeyCode::Esc => *app_state = AppState::Browse,
        _ => {}
    }
}

/// Routes a key press to the handler of the current screen.
pub fn handle_key(session: &mut ComposerSession, key: KeyEvent, app_state: &mut AppState) {
    match *app_state {
        AppState::Loading => handle_loading_input(session, key, app_state),
        AppState::Browse => handle_browse_input(session, key, app_state),
        AppState::Share => handle_share_input(session, key, app_state),
        AppState::ExportPreview => handle_preview_input(session, key, app_state),
        AppState::QuitConfirm => handle_quit_confirm_input(key, app_state),
        AppState::Exit => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Answer, QuestionRecord};

    const PAGE: &str = "https://example.org/edit.html";

    fn catalogue() -> Catalogue {
        let texts = [
            "Toute suite bornée converge.",
            "Une suite croissante majorée converge.",
            "La fonction exponentielle est paire.",
            "Toute matrice est inversible.",
        ];
        Catalogue::new(
            texts
                .iter()
                .enumerate()
                .map(|(identifier, text)| QuestionRecord {
                    identifier,
                    text: text.to_string(),
                    answers: vec![
                        Answer { correct: identifier == 1 },
                        Answer { correct: identifier != 1 },
                    ],
                })
                .collect(),
        )
    }

    fn session_at(location: &str) -> ComposerSession {
        let config = QuizConfig {
            page_url: PAGE.to_string(),
            ..QuizConfig::default()
        };
        let url = UrlSynchronizer::from_location(location).unwrap();
        let mut session = ComposerSession::new(&config, url);
        session.apply_catalogue(catalogue());
        session
    }

    fn session() -> ComposerSession {
        session_at(PAGE)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    fn type_text(session: &mut ComposerSession, app_state: &mut AppState, text: &str) {
        for c in text.chars() {
            handle_key(session, key(KeyCode::Char(c)), app_state);
        }
    }

    #[test]
    fn test_initial_results_show_whole_catalogue() {
        let session = session();
        assert_eq!(session.results, vec![0, 1, 2, 3]);
        assert_eq!(session.url.location(), PAGE);
    }

    #[test]
    fn test_typing_filters_results() {
        let mut session = session();
        let mut app_state = AppState::Browse;
        type_text(&mut session, &mut app_state, "suite converge");
        assert_eq!(session.results, vec![0, 1]);
        assert_eq!(session.cursor_position, 14);

        handle_key(&mut session, key(KeyCode::Backspace), &mut app_state);
        assert_eq!(session.query, "suite converg");
    }

    #[test]
    fn test_typing_q_in_search_does_not_quit() {
        let mut session = session();
        let mut app_state = AppState::Browse;
        type_text(&mut session, &mut app_state, "q");
        assert_eq!(app_state, AppState::Browse);
        assert_eq!(session.query, "q");
    }

    #[test]
    fn test_add_removes_from_results_and_updates_url() {
        let mut session = session();
        assert!(session.add_question(2));
        assert!(session.add_question(0));
        assert_eq!(session.selection.identifiers(), vec![2, 0]);
        assert_eq!(session.results, vec![1, 3]);
        assert_eq!(session.url.location(), format!("{}?liste=2+0", PAGE));
    }

    #[test]
    fn test_add_twice_is_noop() {
        let mut session = session();
        session.add_question(1);
        let history = session.url.history().len();
        assert!(!session.add_question(1));
        assert_eq!(session.url.history().len(), history);
    }

    #[test]
    fn test_add_unknown_is_rejected() {
        let mut session = session();
        assert!(!session.add_question(42));
        assert!(session.selection.is_empty());
    }

    #[test]
    fn test_remove_returns_question_to_results() {
        let mut session = session();
        session.add_question(3);
        session.add_question(1);
        assert!(session.remove_question(3));
        assert_eq!(session.results, vec![0, 2, 3]);
        assert_eq!(session.url.location(), format!("{}?liste=1", PAGE));
    }

    #[test]
    fn test_remove_unselected_is_noop() {
        let mut session = session();
        session.add_question(3);
        session.add_question(1);
        let before = session.selection.identifiers();
        assert!(!session.remove_question(0));
        assert_eq!(session.selection.identifiers(), before);
    }

    #[test]
    fn test_clear_resets_url() {
        let mut session = session();
        session.add_question(1);
        assert!(session.clear_selection());
        assert_eq!(session.url.location(), PAGE);
        assert_eq!(session.results.len(), 4);
    }

    #[test]
    fn test_results_pane_enter_adds_highlighted() {
        let mut session = session();
        let mut app_state = AppState::Browse;
        session.focus = Focus::Results;
        handle_key(&mut session, key(KeyCode::Down), &mut app_state);
        handle_key(&mut session, key(KeyCode::Enter), &mut app_state);
        assert_eq!(session.selection.identifiers(), vec![1]);
    }

    #[test]
    fn test_selection_pane_reorder_and_remove() {
        let mut session = session();
        let mut app_state = AppState::Browse;
        for id in [0, 1, 2] {
            session.add_question(id);
        }
        session.focus = Focus::Selection;

        handle_key(&mut session, key(KeyCode::Down), &mut app_state);
        handle_key(&mut session, key(KeyCode::Char('K')), &mut app_state);
        assert_eq!(session.selection.identifiers(), vec![1, 0, 2]);
        assert_eq!(session.selected_entry, 0);
        assert_eq!(session.url.location(), format!("{}?liste=1+0+2", PAGE));

        // already first
        handle_key(&mut session, key(KeyCode::Char('K')), &mut app_state);
        assert_eq!(session.selection.identifiers(), vec![1, 0, 2]);

        handle_key(&mut session, key(KeyCode::Char('x')), &mut app_state);
        assert_eq!(session.selection.identifiers(), vec![0, 2]);
    }

    #[test]
    fn test_shift_down_moves_entry() {
        let mut session = session();
        let mut app_state = AppState::Browse;
        session.add_question(0);
        session.add_question(1);
        session.focus = Focus::Selection;
        handle_key(
            &mut session,
            KeyEvent::new(KeyCode::Down, KeyModifiers::SHIFT),
            &mut app_state,
        );
        assert_eq!(session.selection.identifiers(), vec![1, 0]);
        assert_eq!(session.selected_entry, 1);
    }

    #[test]
    fn test_restore_from_deep_link() {
        let session = session_at(&format!("{}?liste=3+1+2", PAGE));
        assert_eq!(session.selection.identifiers(), vec![3, 1, 2]);
        assert_eq!(session.results, vec![0]);
        assert!(session.status.is_none());
        assert!(session.url.history().is_empty());
    }

    #[test]
    fn test_restore_drops_bad_ids_and_rewrites_url() {
        let session = session_at(&format!("{}?liste=3+abc+99+3+0", PAGE));
        assert_eq!(session.selection.identifiers(), vec![3, 0]);
        assert_eq!(session.url.location(), format!("{}?liste=3+0", PAGE));
        assert!(session.status.as_deref().unwrap().contains("99"));
    }

    #[test]
    fn test_export_uses_selection_order() {
        let mut session = session();
        session.add_question(1);
        session.add_question(0);
        let amc = session.export(ExportFormat::Amc).unwrap();
        let first = amc.find("majorée").unwrap();
        let second = amc.find("bornée").unwrap();
        assert!(first < second);
        assert!(amc.starts_with(
            "Une suite croissante majorée converge.\n\n\\begin{responses}\n\\bonne{Vrai}"
        ));
    }

    #[test]
    fn test_export_empty_selection_errors() {
        let session = session();
        assert!(matches!(
            session.export(ExportFormat::Moodle),
            Err(QuizError::EmptySelection)
        ));
    }

    #[test]
    fn test_save_export_writes_named_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session();
        session.export_dir = dir.path().to_path_buf();
        session.add_question(2);
        session.add_question(0);

        let path = session.save_export(ExportFormat::Moodle).unwrap();
        assert_eq!(path, dir.path().join("quiz-Moodle-2,0.txt"));
        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.starts_with("\\begin{truefalse}{q-2}"));
    }

    #[test]
    fn test_save_shortcut_reports_status() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session();
        let mut app_state = AppState::Browse;
        session.export_dir = dir.path().to_path_buf();
        session.add_question(1);
        session.focus = Focus::Results;

        handle_key(&mut session, key(KeyCode::Char('a')), &mut app_state);
        assert!(dir.path().join("quiz-AMC-1.txt").exists());
        assert!(session.status.as_deref().unwrap().starts_with("Écrit"));
    }

    #[test]
    fn test_preview_opens_and_closes() {
        let mut session = session();
        let mut app_state = AppState::Browse;
        session.add_question(0);
        session.focus = Focus::Results;

        handle_key(&mut session, key(KeyCode::Char('M')), &mut app_state);
        assert_eq!(app_state, AppState::ExportPreview);
        assert_eq!(session.preview.as_ref().unwrap().format, ExportFormat::Moodle);

        handle_key(&mut session, key(KeyCode::Down), &mut app_state);
        assert_eq!(session.preview.as_ref().unwrap().scroll_y, 1);

        handle_key(&mut session, key(KeyCode::Esc), &mut app_state);
        assert_eq!(app_state, AppState::Browse);
        assert!(session.preview.is_none());
    }

    #[test]
    fn test_document_written_when_preamble_arrives() {
        let dir = tempfile::tempdir().unwrap();
        let (tx, rx) = std::sync::mpsc::channel();
        let mut session = session();
        let mut app_state = AppState::Browse;
        session.export_dir = dir.path().to_path_buf();
        session.fetch_tx = Some(tx);
        session.add_question(0);

        session.request_document(ExportFormat::Amc).unwrap();
        assert!(matches!(rx.try_recv().unwrap(), FetchRequest::Preamble { format: ExportFormat::Amc, .. }));

        session.handle_fetch_response(
            FetchResponse::Preamble {
                format: ExportFormat::Amc,
                text: "\\begin{document}\n".to_string(),
            },
            &mut app_state,
        );
        let content = std::fs::read_to_string(dir.path().join("quiz-AMC-0.tex")).unwrap();
        assert!(content.starts_with("\\begin{document}\nToute suite"));
        assert!(content.ends_with("\\end{document}"));
        assert!(session.pending_document.is_none());
    }

    #[test]
    fn test_fetch_error_sets_status() {
        let mut session = session();
        let mut app_state = AppState::Browse;
        session.pending_document = Some(ExportFormat::Moodle);
        session.handle_fetch_response(
            FetchResponse::Error {
                what: "préambule".to_string(),
                error: "timeout".to_string(),
            },
            &mut app_state,
        );
        assert!(session.pending_document.is_none());
        assert!(session.status.as_deref().unwrap().contains("timeout"));
    }

    #[test]
    fn test_catalogue_response_leaves_loading() {
        let config = QuizConfig::default();
        let mut session = ComposerSession::new(&config, UrlSynchronizer::new(PAGE));
        let mut app_state = AppState::Loading;
        session.handle_fetch_response(FetchResponse::Catalogue(catalogue()), &mut app_state);
        assert_eq!(app_state, AppState::Browse);
        assert!(session.catalogue_loaded);
    }

    #[test]
    fn test_share_invalid_penalty_shows_error() {
        let mut session = session();
        let mut app_state = AppState::Share;
        session.add_question(1);
        session.share.penalty = "1.5".to_string();

        handle_key(&mut session, key(KeyCode::Enter), &mut app_state);
        assert!(session.share.quiz_url.is_none());
        assert!(session.share.error.as_deref().unwrap().starts_with("Pénalité invalide"));
    }

    #[test]
    fn test_share_builds_url_and_qr() {
        let mut session = session();
        let mut app_state = AppState::Share;
        session.add_question(2);
        session.add_question(1);

        handle_key(&mut session, key(KeyCode::Backspace), &mut app_state);
        type_text(&mut session, &mut app_state, "0.25");
        handle_key(&mut session, key(KeyCode::Tab), &mut app_state);
        type_text(&mut session, &mut app_state, "TD 3");
        handle_key(&mut session, key(KeyCode::Tab), &mut app_state);
        handle_key(&mut session, key(KeyCode::Char(' ')), &mut app_state);
        handle_key(&mut session, key(KeyCode::Enter), &mut app_state);

        let url = session.share.quiz_url.clone().unwrap();
        assert!(url.starts_with(&format!("{}?c=2+1&r=1&p=0.25&n=TD%203&i=", session.quiz_base_url)));
        assert!(session.share.qr_code.is_some());
        assert!(session.share.error.is_none());
    }

    #[test]
    fn test_share_mail_and_copy() {
        let mut session = session();
        let mut app_state = AppState::Share;
        session.add_question(0);

        handle_key(
            &mut session,
            KeyEvent::new(KeyCode::Char('e'), KeyModifiers::CONTROL),
            &mut app_state,
        );
        assert!(session.share.mailto.as_deref().unwrap().starts_with("mailto:?subject=QUIZ"));

        handle_key(
            &mut session,
            KeyEvent::new(KeyCode::Char('y'), KeyModifiers::CONTROL),
            &mut app_state,
        );
        assert_eq!(session.pending_clipboard, session.share.quiz_url);

        handle_key(&mut session, key(KeyCode::Esc), &mut app_state);
        assert_eq!(app_state, AppState::Browse);
    }

    #[test]
    fn test_mail_link_rebuilt_after_changes() {
        let mut session = session();
        let mut app_state = AppState::Share;
        session.add_question(0);
        session.share.penalty = "0.5".to_string();
        session.build_share().unwrap();

        session.add_question(1);
        assert!(session.share.quiz_url.is_none());

        session.share.penalty = "2".to_string();
        handle_key(
            &mut session,
            KeyEvent::new(KeyCode::Char('e'), KeyModifiers::CONTROL),
            &mut app_state,
        );
        assert!(session.share.mailto.is_none());
        assert!(session.share.quiz_url.is_none());
        assert!(session.share.error.as_deref().unwrap().starts_with("Pénalité invalide"));

        handle_key(&mut session, key(KeyCode::Backspace), &mut app_state);
        handle_key(&mut session, key(KeyCode::Char('1')), &mut app_state);
        handle_key(
            &mut session,
            KeyEvent::new(KeyCode::Char('e'), KeyModifiers::CONTROL),
            &mut app_state,
        );
        let url = session.share.quiz_url.clone().unwrap();
        assert!(url.contains("?c=0+1&r=0&p=1&"));
        assert!(session.share.mailto.as_deref().unwrap().contains("exercices%200%2C1."));
    }

    #[test]
    fn test_share_edit_drops_generated_link() {
        let mut session = session();
        let mut app_state = AppState::Share;
        session.add_question(2);
        handle_key(&mut session, key(KeyCode::Enter), &mut app_state);
        assert!(session.share.quiz_url.is_some());

        handle_key(&mut session, key(KeyCode::Tab), &mut app_state);
        handle_key(&mut session, key(KeyCode::Char('x')), &mut app_state);
        assert!(session.share.quiz_url.is_none());
        assert!(session.share.qr_code.is_none());

        handle_key(&mut session, key(KeyCode::Enter), &mut app_state);
        handle_key(&mut session, key(KeyCode::Tab), &mut app_state);
        handle_key(&mut session, key(KeyCode::Char(' ')), &mut app_state);
        assert!(session.share.quiz_url.is_none());
    }

    #[test]
    fn test_document_request_with_stopped_worker() {
        let (tx, rx) = std::sync::mpsc::channel();
        drop(rx);
        let mut session = session();
        session.fetch_tx = Some(tx);
        session.add_question(0);

        session.request_document(ExportFormat::Amc).unwrap();
        assert!(session.pending_document.is_none());
        assert!(session.fetch_tx.is_none());
        assert!(session.status.as_deref().unwrap().starts_with("Téléchargement indisponible"));
    }

    #[test]
    fn test_loading_retry_with_stopped_worker() {
        let (tx, rx) = std::sync::mpsc::channel();
        drop(rx);
        let config = QuizConfig::default();
        let mut session = ComposerSession::new(&config, UrlSynchronizer::new(PAGE));
        session.fetch_tx = Some(tx);
        let mut app_state = AppState::Loading;

        handle_key(&mut session, key(KeyCode::Char('r')), &mut app_state);
        assert_eq!(app_state, AppState::Loading);
        assert!(session.status.as_deref().unwrap().starts_with("Téléchargement indisponible"));
    }

    #[test]
    fn test_restore_reports_every_dropped_kind() {
        let session = session_at(&format!("{}?liste=abc+99+1", PAGE));
        let status = session.status.as_deref().unwrap();
        assert!(status.contains("abc"));
        assert!(status.contains("99"));
        assert_eq!(session.selection.identifiers(), vec![1]);
    }

    #[test]
    fn test_quit_confirm() {
        let mut session = session();
        let mut app_state = AppState::Browse;
        session.focus = Focus::Results;
        handle_key(&mut session, key(KeyCode::Char('q')), &mut app_state);
        assert_eq!(app_state, AppState::QuitConfirm);
        handle_key(&mut session, key(KeyCode::Char('n')), &mut app_state);
        assert_eq!(app_state, AppState::Browse);
        handle_key(&mut session, key(KeyCode::Char('q')), &mut app_state);
        handle_key(&mut session, key(KeyCode::Char('y')), &mut app_state);
        assert_eq!(app_state, AppState::Exit);
    }

    #[test]
    fn test_tab_cycles_focus() {
        let mut session = session();
        let mut app_state = AppState::Browse;
        handle_key(&mut session, key(KeyCode::Tab), &mut app_state);
        assert_eq!(session.focus, Focus::Results);
        handle_key(&mut session, key(KeyCode::Tab), &mut app_state);
        assert_eq!(session.focus, Focus::Selection);
        handle_key(&mut session, key(KeyCode::Tab), &mut app_state);
        assert_eq!(session.focus, Focus::Search);
    }
}
