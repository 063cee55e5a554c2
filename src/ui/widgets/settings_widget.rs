use crate::search::RankingMode;
use crate::state::SettingsForm;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SettingsField {
    #[default]
    Mode,
    Order,
}

impl SettingsField {
    pub fn toggle(self) -> Self {
        match self {
            SettingsField::Mode => SettingsField::Order,
            SettingsField::Order => SettingsField::Mode,
        }
    }
}

/// Overlay for editing the ranking mode and order
pub fn render_settings(f: &mut Frame, area: Rect, form: &SettingsForm, field: SettingsField) {
    let active = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    let idle = Style::default().fg(Color::Gray);

    let mut lines = vec![Line::from(Span::styled(
        "Ranking mode",
        if field == SettingsField::Mode { active } else { idle },
    ))];
    for mode in RankingMode::ALL {
        let marker = if mode == form.mode { "(•)" } else { "( )" };
        lines.push(Line::from(format!("  {marker} {} {}", mode.id(), mode.label())));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled(
            "Ranking order: ",
            if field == SettingsField::Order { active } else { idle },
        ),
        Span::raw(form.order.clone()),
    ]));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Tab: field | ↑↓: mode | digits: order | Enter: apply | Esc: close",
        Style::default().fg(Color::DarkGray),
    )));

    let panel = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Settings ")
            .style(Style::default().bg(Color::Black)),
    );
    f.render_widget(Clear, area);
    f.render_widget(panel, area);
}
