use crate::models::ComposerSession;
use crate::ui::key_hint;
use crate::ui::layout::calculate_preview_chunks;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Text},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn draw_preview(f: &mut Frame, session: &mut ComposerSession) {
    let layout = calculate_preview_chunks(f.area());
    let file_name = session
        .preview
        .as_ref()
        .map(|p| p.format.file_name(&session.selection.identifiers()))
        .unwrap_or_default();
    let Some(preview) = session.preview.as_mut() else {
        return;
    };

    let header = Paragraph::new(format!("Aperçu {} - {}", preview.format.label(), file_name))
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, layout.header_area);

    // exactly what gets saved
    let text = Text::raw(preview.content.as_str());

    // keep scrolling inside the content
    let visible_height = layout.content_area.height.saturating_sub(2) as usize;
    let max_scroll = text.lines.len().saturating_sub(visible_height) as u16;
    preview.scroll_y = preview.scroll_y.min(max_scroll);

    let content = Paragraph::new(text)
        .scroll((preview.scroll_y, 0))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(content, layout.content_area);

    let help = Paragraph::new(Line::from(
        [
            key_hint("↑/↓", " Défiler  "),
            key_hint("s", " Enregistrer  "),
            key_hint("y", " Copier  "),
            key_hint("Esc", " Retour"),
        ]
        .concat(),
    ))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, layout.help_area);
}

pub fn draw_quit_confirmation(f: &mut Frame, session: &ComposerSession) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(5)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Length(3),
        ])
        .split(f.area());

    let title = Paragraph::new("Quitter")
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    let message = Paragraph::new(vec![
        Line::from("Quitter Quiz Builder ? La sélection reste dans l'adresse :"),
        Line::from(session.url.location().to_string()),
    ])
    .style(Style::default().fg(Color::White))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(message, chunks[1]);

    let help = Paragraph::new(Line::from(
        [key_hint("y", " Oui  "), key_hint("n", " Non")].concat(),
    ))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[2]);
}
