use crate::pagination::PagePlan;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Renders the page-index window under the result list
pub struct PageNavWidget<'a> {
    plan: &'a PagePlan,
}

impl<'a> PageNavWidget<'a> {
    pub fn new(plan: &'a PagePlan) -> Self {
        Self { plan }
    }

    /// Entry labels in display order, e.g. `["1", "…", "2", "[7]", "Next »"]`
    pub fn labels(&self) -> Vec<String> {
        let mut labels = Vec::new();
        if self.plan.show_first_pinned {
            labels.push(self.page_label(1));
            labels.push("…".to_string());
        }
        for &page in &self.plan.pages {
            labels.push(self.page_label(page));
        }
        if self.plan.show_next {
            labels.push("Next »".to_string());
        }
        labels
    }

    fn page_label(&self, page: usize) -> String {
        if page == self.plan.current_page {
            format!("[{page}]")
        } else {
            page.to_string()
        }
    }

    fn line(&self) -> Line<'static> {
        let mut spans = Vec::new();
        let targets = self.plan.targets();

        for (slot, &page) in targets.iter().enumerate() {
            if slot > 0 {
                spans.push(Span::raw(" "));
            }
            // 1-9 jump straight to the entry
            if slot < 9 {
                spans.push(Span::styled(
                    format!("{}:", slot + 1),
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::DIM),
                ));
            }

            let style = if page == self.plan.current_page {
                Style::default()
                    .fg(Color::White)
                    .bg(Color::Blue)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Cyan)
            };
            spans.push(Span::styled(self.page_label(page), style));

            if self.plan.show_first_pinned && slot == 0 {
                spans.push(Span::styled(" …", Style::default().fg(Color::DarkGray)));
            }
        }

        if self.plan.show_next {
            spans.push(Span::styled(
                "  Next »",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ));
        }
        Line::from(spans)
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        if self.plan.is_empty() && !self.plan.show_next {
            return;
        }

        let nav = Paragraph::new(self.line())
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::TOP)
                    .border_style(Style::default().fg(Color::DarkGray)),
            );
        f.render_widget(nav, area);
    }

    pub fn height(&self) -> u16 {
        2
    }
}
