use crate::models::{ComposerSession, ShareField};
use crate::ui::key_hint;
use crate::ui::layout::calculate_share_chunks;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

fn field_line<'a>(label: &'a str, value: String, active: bool) -> Line<'a> {
    let style = if active {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    Line::from(vec![
        Span::styled(if active { "> " } else { "  " }, style),
        Span::styled(label, Style::default().fg(Color::Cyan)),
        Span::styled(value, style),
    ])
}

pub fn draw_share(f: &mut Frame, session: &ComposerSession) {
    let layout = calculate_share_chunks(f.area());
    let form = &session.share;

    let header = Paragraph::new(format!(
        "Partager le quiz ({} questions)",
        session.selection.len()
    ))
    .style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, layout.header_area);

    let fields = vec![
        field_line(
            "Pénalité (0 à 1) : ",
            form.penalty.clone(),
            form.field == ShareField::Penalty,
        ),
        field_line(
            "Pseudo : ",
            form.nickname.clone(),
            form.field == ShareField::Nickname,
        ),
        field_line(
            "Ordre aléatoire : ",
            if form.randomize { "Oui" } else { "Non" }.to_string(),
            form.field == ShareField::Randomize,
        ),
    ];
    let form_widget =
        Paragraph::new(fields).block(Block::default().borders(Borders::ALL).title("Paramètres"));
    f.render_widget(form_widget, layout.form_area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(layout.output_area);

    let mut text = Text::default();
    if let Some(error) = &form.error {
        text.push_line(Line::from(Span::styled(
            error.as_str(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )));
    }
    match &form.quiz_url {
        Some(url) => {
            text.push_line(Line::from(Span::styled(
                "Lien du quiz :",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )));
            text.push_line(Line::from(url.as_str()));
        }
        None if form.error.is_none() => {
            text.push_line(Line::from("Entrée pour générer le lien."));
        }
        None => {}
    }
    if let Some(mailto) = &form.mailto {
        text.push_line(Line::from(""));
        text.push_line(Line::from(Span::styled(
            "Courriel :",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        text.push_line(Line::from(mailto.as_str()));
    }
    let link = Paragraph::new(text)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title("Lien"));
    f.render_widget(link, columns[0]);

    let qr = Paragraph::new(form.qr_code.clone().unwrap_or_default())
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("QR code"));
    f.render_widget(qr, columns[1]);

    let help_text = vec![
        Line::from(
            [
                key_hint("Tab/↑/↓", " Champ  "),
                key_hint("Espace", " Oui/Non  "),
                key_hint("Enter", " Générer"),
            ]
            .concat(),
        ),
        Line::from(
            [
                key_hint("Ctrl+Y", " Copier le lien  "),
                key_hint("Ctrl+E", " Courriel  "),
                key_hint("Esc", " Retour"),
            ]
            .concat(),
        ),
    ];
    let help = Paragraph::new(help_text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, layout.help_area);
}
