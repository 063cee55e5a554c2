use crate::state::CorrelationChart;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols::Marker,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};

/// Line chart of correlation against rank
pub fn render_chart(f: &mut Frame, area: Rect, chart: &CorrelationChart) {
    let max_rank = chart.max_rank();
    let dataset = Dataset::default()
        .name("correlation")
        .marker(Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Cyan))
        .data(chart.points());

    let x_labels = vec![
        "1".to_string(),
        format!("{}", (max_rank / 2.0).ceil()),
        format!("{max_rank}"),
    ];
    let widget = Chart::new(vec![dataset])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Correlation: {} ", chart.query())),
        )
        .x_axis(
            Axis::default()
                .title("rank")
                .style(Style::default().fg(Color::Gray))
                .bounds([1.0, max_rank])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, 1.0])
                .labels(vec!["0", "0.5", "1"]),
        );

    f.render_widget(widget, area);
}
