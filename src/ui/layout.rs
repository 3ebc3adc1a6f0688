use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub struct BrowseLayout {
    pub header_area: Rect,
    pub search_area: Rect,
    pub results_area: Rect,
    pub selection_area: Rect,
    pub status_area: Rect,
    pub help_area: Rect,
}

pub struct ShareLayout {
    pub header_area: Rect,
    pub form_area: Rect,
    pub output_area: Rect,
    pub help_area: Rect,
}

pub struct PreviewLayout {
    pub header_area: Rect,
    pub content_area: Rect,
    pub help_area: Rect,
}

pub fn calculate_browse_chunks(area: Rect) -> BrowseLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
            Constraint::Length(4),
        ])
        .split(area);

    // results on the left, the quiz being built on the right
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[2]);

    BrowseLayout {
        header_area: chunks[0],
        search_area: chunks[1],
        results_area: columns[0],
        selection_area: columns[1],
        status_area: chunks[3],
        help_area: chunks[4],
    }
}

pub fn calculate_share_chunks(area: Rect) -> ShareLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Min(5),
            Constraint::Length(4),
        ])
        .split(area);

    ShareLayout {
        header_area: chunks[0],
        form_area: chunks[1],
        output_area: chunks[2],
        help_area: chunks[3],
    }
}

pub fn calculate_preview_chunks(area: Rect) -> PreviewLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(3),
        ])
        .split(area);

    PreviewLayout {
        header_area: chunks[0],
        content_area: chunks[1],
        help_area: chunks[2],
    }
}
