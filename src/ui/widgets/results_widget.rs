use crate::state::ResultsPane;
use crate::utils::text::{format_correlation, snippet_line, truncate_title};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

/// Renders the records of the current page, three lines per hit
pub struct ResultsWidget<'a> {
    pane: &'a ResultsPane,
    show_correlation: bool,
    title_width_ratio: f64,
    focused: bool,
}

impl<'a> ResultsWidget<'a> {
    pub fn new(pane: &'a ResultsPane) -> Self {
        Self {
            pane,
            show_correlation: true,
            title_width_ratio: 0.9,
            focused: true,
        }
    }

    pub fn with_correlation(mut self, show: bool) -> Self {
        self.show_correlation = show;
        self
    }

    pub fn with_title_width_ratio(mut self, ratio: f64) -> Self {
        self.title_width_ratio = ratio;
        self
    }

    pub fn with_focus(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    fn items(&self, width: usize) -> Vec<ListItem<'static>> {
        self.pane
            .records
            .iter()
            .map(|record| {
                let mut title = vec![Span::styled(
                    truncate_title(&record.title, width, self.title_width_ratio),
                    Style::default().fg(Color::LightBlue).add_modifier(Modifier::BOLD),
                )];
                if self.show_correlation {
                    title.push(Span::styled(
                        format!("  {}", format_correlation(record.correlation)),
                        Style::default().fg(Color::Green),
                    ));
                }

                ListItem::new(vec![
                    Line::from(title),
                    Line::from(Span::styled(
                        record.link.clone(),
                        Style::default().fg(Color::DarkGray),
                    )),
                    Line::from(snippet_line(&record.snippet)),
                ])
            })
            .collect()
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        let width = area.width.saturating_sub(2) as usize;
        let border_style = if self.focused {
            Style::default()
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let title = if self.pane.loading {
            format!(" {} (loading...) ", self.pane.query)
        } else {
            format!(" {} ", self.pane.query)
        };

        let list = List::new(self.items(width))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(title)
                    .border_style(border_style),
            )
            .highlight_style(Style::default().bg(Color::Rgb(40, 40, 60)))
            .highlight_symbol("▌");

        let mut state = ListState::default();
        if !self.pane.records.is_empty() {
            state.select(Some(self.pane.selected));
        }
        f.render_stateful_widget(list, area, &mut state);
    }
}
