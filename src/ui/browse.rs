use crate::models::{ComposerSession, Focus};
use crate::ui::key_hint;
use crate::ui::layout::calculate_browse_chunks;
use crate::utils::{single_line, truncate_string};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

fn pane_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

pub fn draw_browse(f: &mut Frame, session: &ComposerSession) {
    let layout = calculate_browse_chunks(f.area());

    let header = Paragraph::new(session.url.location().to_string())
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Quiz Builder"));
    f.render_widget(header, layout.header_area);

    let search_focused = session.focus == Focus::Search;
    let search = Paragraph::new(if session.query.is_empty() && !search_focused {
        "[Rechercher...]".to_string()
    } else {
        session.query.clone()
    })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(pane_style(search_focused))
            .title("Recherche"),
    );
    f.render_widget(search, layout.search_area);

    if search_focused {
        let before: String = session.query.chars().take(session.cursor_position).collect();
        let cursor_x = layout.search_area.x + 1 + before.width() as u16;
        f.set_cursor_position((cursor_x, layout.search_area.y + 1));
    }

    draw_results(f, session, layout.results_area);
    draw_selection(f, session, layout.selection_area);

    if let Some(status) = &session.status {
        let status_line = Paragraph::new(status.as_str()).style(Style::default().fg(Color::Yellow));
        f.render_widget(status_line, layout.status_area);
    }

    let help_text = vec![
        Line::from(
            [
                key_hint("Tab", " Panneau  "),
                key_hint("/", " Rechercher  "),
                key_hint("Enter", " Ajouter  "),
                key_hint("x", " Retirer  "),
                key_hint("K/J", " Monter/Descendre  "),
                key_hint("c", " Vider"),
            ]
            .concat(),
        ),
        Line::from(
            [
                key_hint("a/m", " Fichier AMC/Moodle  "),
                key_hint("A/M", " Aperçu  "),
                key_hint("d/D", " Document .tex  "),
                key_hint("s", " Partager  "),
                key_hint("y", " Copier l'adresse  "),
                key_hint("q", " Quitter"),
            ]
            .concat(),
        ),
    ];
    let help = Paragraph::new(help_text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, layout.help_area);
}

fn draw_results(f: &mut Frame, session: &ComposerSession, area: Rect) {
    let focused = session.focus == Focus::Results;
    let width = area.width.saturating_sub(4) as usize;

    let items: Vec<ListItem> = if session.results.is_empty() {
        vec![ListItem::new("Aucune question").style(
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )]
    } else {
        session
            .results
            .iter()
            .filter_map(|&id| session.catalogue.get(id))
            .map(|record| {
                let label = format!("{}. {}", record.identifier, single_line(&record.text));
                ListItem::new(truncate_string(&label, width))
            })
            .collect()
    };

    let title = format!("Questions ({})", session.results.len());
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(pane_style(focused))
                .title(title),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

    let mut state = ListState::default();
    if focused && !session.results.is_empty() {
        state.select(Some(session.selected_result));
    }
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_selection(f: &mut Frame, session: &ComposerSession, area: Rect) {
    let focused = session.focus == Focus::Selection;
    let width = area.width.saturating_sub(4) as usize;

    let items: Vec<ListItem> = if session.selection.is_empty() {
        vec![ListItem::new("Quiz vide").style(
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )]
    } else {
        session
            .selection
            .entries()
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let line = Line::from(vec![
                    Span::styled(
                        format!("{:>2}. ", i + 1),
                        Style::default().fg(Color::DarkGray),
                    ),
                    Span::from(truncate_string(
                        &format!("[{}] {}", entry.identifier, single_line(&entry.text)),
                        width.saturating_sub(4),
                    )),
                ]);
                ListItem::new(line)
            })
            .collect()
    };

    let title = format!("Quiz ({})", session.selection.len());
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(pane_style(focused))
                .title(title),
        )
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut state = ListState::default();
    if focused && !session.selection.is_empty() {
        state.select(Some(session.selected_entry));
    }
    f.render_stateful_widget(list, area, &mut state);
}

pub fn draw_loading(f: &mut Frame, session: &ComposerSession) {
    let layout = crate::ui::layout::calculate_preview_chunks(f.area());

    let title = Paragraph::new("Quiz Builder")
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, layout.header_area);

    let message = session
        .status
        .clone()
        .unwrap_or_else(|| format!("Chargement du catalogue depuis {}...", session.catalogue_url));
    let body = Paragraph::new(message)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(body, layout.content_area);

    let help = Paragraph::new(Line::from(
        [key_hint("r", " Réessayer  "), key_hint("q", " Quitter")].concat(),
    ))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, layout.help_area);
}
