mod browse;
pub mod layout;
mod preview;
mod share;

pub use browse::{draw_browse, draw_loading};
pub use layout::{calculate_browse_chunks, calculate_preview_chunks, calculate_share_chunks};
pub use preview::{draw_preview, draw_quit_confirmation};
pub use share::draw_share;

use crate::models::{AppState, ComposerSession};
use ratatui::{
    style::{Color, Modifier, Style},
    text::Span,
    Frame,
};

/// Highlighted key followed by its description.
pub(crate) fn key_hint(key: &'static str, action: &'static str) -> Vec<Span<'static>> {
    vec![
        Span::styled(
            key,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::from(action),
    ]
}

/// Draws the screen matching `app_state`.
pub fn draw(f: &mut Frame, session: &mut ComposerSession, app_state: AppState) {
    match app_state {
        AppState::Loading => draw_loading(f, session),
        AppState::Browse | AppState::Exit => draw_browse(f, session),
        AppState::Share => draw_share(f, session),
        AppState::ExportPreview => draw_preview(f, session),
        AppState::QuitConfirm => draw_quit_confirmation(f, session),
    }
}
