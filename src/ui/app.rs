use crate::api_client::SearchBackend;
use crate::config::Config;
use crate::search::RankingMode;
use crate::services::{ApplicationOrchestrator, FetchWorker, Job, PageTarget, WorkerEvent};
use crate::state::{Location, SettingsForm};
use crate::ui::widgets::{render_chart, render_settings, PageNavWidget, ResultsWidget, SettingsField};
use crate::utils::logging::LogRingBuffer;
use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use ratatui::backend::Backend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::{Frame, Terminal};
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};
use tui_input::backend::crossterm::EventHandler;
use tui_input::Input;

/// Where keystrokes go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Landing,
    SearchBox,
    List,
    Settings,
}

/// Terminal front end for the search client
pub struct SearchTui {
    app: ApplicationOrchestrator,
    worker: FetchWorker,
    config: Config,

    /// Search box of the home view
    landing_input: Input,

    /// Search box in the results menu bar
    search_input: Input,

    focus: Focus,
    settings_form: Option<(SettingsForm, SettingsField)>,

    /// F12 log panel
    show_logs: bool,
    log_buffer: Option<LogRingBuffer>,

    should_quit: bool,
}

impl SearchTui {
    pub fn new(config: Config, backend: Arc<dyn SearchBackend>) -> Self {
        Self {
            app: ApplicationOrchestrator::new(&config),
            worker: FetchWorker::new(backend),
            config,
            landing_input: Input::default(),
            search_input: Input::default(),
            focus: Focus::Landing,
            settings_form: None,
            show_logs: false,
            log_buffer: None,
            should_quit: false,
        }
    }

    pub fn with_log_buffer(mut self, buffer: LogRingBuffer) -> Self {
        self.log_buffer = Some(buffer);
        self
    }

    /// Kick off startup jobs and, optionally, a first query
    pub fn start(&mut self, initial_query: Option<&str>) {
        for job in self.app.startup_jobs() {
            self.spawn(job);
        }
        if let Some(query) = initial_query {
            self.landing_input = Input::new(query.to_string());
            self.submit_landing();
        }
    }

    pub fn orchestrator(&self) -> &ApplicationOrchestrator {
        &self.app
    }

    /// Main run loop
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            self.drain_worker();
            self.app.tick(Instant::now());

            terminal.draw(|f| self.draw(f))?;

            // Handle input
            if event::poll(Duration::from_millis(100))? {
                match event::read()? {
                    Event::Key(key) => {
                        if self.handle_key_event(key) {
                            break;
                        }
                    }
                    Event::Resize(..) => self.app.rerender(),
                    _ => {}
                }
            }

            if self.should_quit {
                break;
            }
        }
        Ok(())
    }

    fn spawn(&mut self, job: Job) {
        if let Err(e) = self.worker.spawn(job) {
            error!(target: "worker", "Could not start background job: {}", e);
            self.app
                .notify("Could not start a background request", Instant::now());
        }
    }

    fn spawn_opt(&mut self, job: Option<Job>) {
        if let Some(job) = job {
            self.spawn(job);
        }
    }

    /// Apply every completed job
    fn drain_worker(&mut self) {
        while let Some(event) = self.worker.try_next() {
            self.handle_worker_event(event);
        }
    }

    fn handle_worker_event(&mut self, event: WorkerEvent) {
        let outcome = self.app.handle_event(event, Instant::now());
        if let Some(query) = outcome.applied_query {
            let cursor = query.chars().count();
            self.search_input = Input::new(query).with_cursor(cursor);
        }
        self.spawn_opt(outcome.follow_up);
    }

    /// Handle keyboard input; returns true to quit
    fn handle_key_event(&mut self, key: KeyEvent) -> bool {
        // Global keys
        if matches!(key.code, KeyCode::Char('c')) && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return true;
        }
        if key.code == KeyCode::F(12) {
            self.show_logs = !self.show_logs;
            return false;
        }

        match self.focus {
            Focus::Landing => self.handle_landing_key(key),
            Focus::SearchBox => self.handle_search_box_key(key),
            Focus::List => self.handle_list_key(key),
            Focus::Settings => self.handle_settings_key(key),
        }
    }

    fn handle_landing_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Enter => self.submit_landing(),
            KeyCode::Esc => {
                self.should_quit = true;
                return true;
            }
            _ => {
                self.landing_input.handle_event(&Event::Key(key));
            }
        }
        false
    }

    fn submit_landing(&mut self) {
        let job = self.app.submit_search(self.landing_input.value());
        if job.is_some() && self.app.view().state().location == Location::Results {
            let query = self.landing_input.value().trim().to_string();
            let cursor = query.chars().count();
            self.search_input = Input::new(query).with_cursor(cursor);
            self.landing_input.reset();
            self.focus = Focus::List;
        }
        self.spawn_opt(job);
    }

    fn handle_search_box_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Enter => {
                let job = self.app.submit_search(self.search_input.value());
                self.spawn_opt(job);
                self.focus = Focus::List;
            }
            KeyCode::Esc => self.focus = Focus::List,
            _ => {
                self.search_input.handle_event(&Event::Key(key));
            }
        }
        false
    }

    fn handle_list_key(&mut self, key: KeyEvent) -> bool {
        let job = match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                return true;
            }
            KeyCode::Char('/') => {
                self.focus = Focus::SearchBox;
                None
            }
            KeyCode::Char('n') | KeyCode::Right => self.app.next_page(),
            KeyCode::Char('p') | KeyCode::Left => self.app.previous_page(),
            KeyCode::Char('g') => self.app.change_page(PageTarget::Page(1)),
            KeyCode::Char(c @ '1'..='9') => {
                let slot = c.to_digit(10).map(|d| d as usize).unwrap_or(0);
                self.app.jump_to_slot(slot)
            }
            KeyCode::Char('c') => {
                let visible = self.app.toggle_chart();
                debug!(target: "view", "Chart visible: {}", visible);
                None
            }
            KeyCode::Char('s') => {
                self.open_settings();
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.app.pane_mut().select_next();
                None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.app.pane_mut().select_previous();
                None
            }
            _ => None,
        };
        if let Some(query) = self.app.take_restored_query() {
            let cursor = query.chars().count();
            self.search_input = Input::new(query).with_cursor(cursor);
        }
        self.spawn_opt(job);
        false
    }

    fn open_settings(&mut self) {
        if self.app.toggle_settings() {
            self.settings_form = Some((self.app.settings_form(), SettingsField::Mode));
            self.focus = Focus::Settings;
        } else {
            self.settings_form = None;
        }
    }

    fn close_settings(&mut self) {
        self.app.close_settings();
        self.settings_form = None;
        self.focus = Focus::List;
    }

    fn handle_settings_key(&mut self, key: KeyEvent) -> bool {
        let Some((form, field)) = self.settings_form.as_mut() else {
            self.focus = Focus::List;
            return false;
        };

        match (key.code, *field) {
            (KeyCode::Esc, _) => self.close_settings(),
            (KeyCode::Tab, _) => *field = field.toggle(),
            (KeyCode::Up, SettingsField::Mode) => form.mode = form.mode.prev(),
            (KeyCode::Down, SettingsField::Mode) => form.mode = form.mode.next(),
            (KeyCode::Char(c @ '0'..='3'), SettingsField::Mode) => {
                if let Some(mode) = c.to_digit(10).and_then(|d| RankingMode::from_id(d as u8)) {
                    form.mode = mode;
                }
            }
            (KeyCode::Char(c), SettingsField::Order) => form.push_digit(c),
            (KeyCode::Backspace, SettingsField::Order) => form.pop_digit(),
            (KeyCode::Enter, _) => {
                let form = form.clone();
                let job = self.app.submit_settings(&form);
                info!(target: "settings", "Settings applied (mode {})", self.app.settings().mode);
                self.settings_form = None;
                self.focus = Focus::List;
                self.spawn_opt(job);
            }
            _ => {}
        }
        false
    }

    fn draw(&mut self, f: &mut Frame) {
        let size = f.area();

        let (main_area, log_area) = if self.show_logs {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(10), Constraint::Length(12)])
                .split(size);
            (chunks[0], Some(chunks[1]))
        } else {
            (size, None)
        };

        match self.app.view().state().location {
            Location::Home => self.draw_home(f, main_area),
            Location::Results => self.draw_results(f, main_area),
        }

        if let Some(area) = log_area {
            self.draw_logs(f, area);
        }

        if let Some((form, field)) = &self.settings_form {
            render_settings(f, centered(size, 60, 12), form, *field);
        }

        self.draw_notification(f, size);
    }

    fn draw_home(&self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage(35),
                Constraint::Length(2), // Title
                Constraint::Length(3), // Search box
                Constraint::Length(1), // Help line
                Constraint::Min(0),
            ])
            .split(area);

        let title = Paragraph::new(Line::from(Span::styled(
            "searchvd",
            Style::default().fg(Color::LightBlue).add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center);
        f.render_widget(title, chunks[1]);

        let box_area = centered_horizontally(chunks[2], 60);
        self.draw_input(f, box_area, &self.landing_input, "Search", true);

        let help = Paragraph::new("Enter: search | F12: logs | Esc: quit")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        f.render_widget(help, chunks[3]);
    }

    fn draw_results(&self, f: &mut Frame, area: Rect) {
        let pane = self.app.pane();
        let nav = PageNavWidget::new(&pane.plan);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),            // Search box
                Constraint::Length(1),            // Result count
                Constraint::Min(5),               // List (and chart)
                Constraint::Length(nav.height()), // Page navigation
                Constraint::Length(1),            // Help line
            ])
            .split(area);

        let title = format!("Search [mode {}: {}]", self.app.settings().mode, self.app.settings().mode.label());
        self.draw_input(f, chunks[0], &self.search_input, &title, self.focus == Focus::SearchBox);

        let info_style = if pane.result_info.starts_with("Error") {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(Color::Gray)
        };
        let mut info = vec![Span::styled(pane.result_info.clone(), info_style)];
        if pane.loading {
            info.push(Span::styled("  ⟳ loading", Style::default().fg(Color::Yellow)));
        }
        f.render_widget(Paragraph::new(Line::from(info)), chunks[1]);

        let view = self.app.view();
        let (list_area, chart_area) = match view.chart() {
            Some(chart) if view.state().chart_visible => {
                let split = Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
                    .split(chunks[2]);
                (split[0], Some((split[1], chart)))
            }
            _ => (chunks[2], None),
        };

        ResultsWidget::new(pane)
            .with_correlation(self.config.display.show_correlation)
            .with_title_width_ratio(self.config.display.title_width_ratio)
            .with_focus(self.focus == Focus::List)
            .render(f, list_area);

        if let Some((area, chart)) = chart_area {
            render_chart(f, area, chart);
        }

        nav.render(f, chunks[3]);

        let help = Paragraph::new(
            "/: search | n/→: next | p/←: prev | 1-9: page | g: first | c: chart | s: settings | F12: logs | q: quit",
        )
        .style(Style::default().fg(Color::DarkGray));
        f.render_widget(help, chunks[4]);
    }

    fn draw_input(&self, f: &mut Frame, area: Rect, input: &Input, title: &str, active: bool) {
        let style = if active {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let inner_width = area.width.saturating_sub(2) as usize;
        let scroll = input.visual_scroll(inner_width);
        let widget = Paragraph::new(input.value())
            .scroll((0, scroll as u16))
            .block(Block::default().borders(Borders::ALL).title(title.to_string()).style(style));
        f.render_widget(widget, area);

        if active {
            let cursor = input.visual_cursor().saturating_sub(scroll) as u16;
            f.set_cursor_position((area.x + 1 + cursor, area.y + 1));
        }
    }

    fn draw_logs(&self, f: &mut Frame, area: Rect) {
        let lines: Vec<Line> = self
            .log_buffer
            .as_ref()
            .map(|buffer| {
                buffer
                    .get_recent(area.height.saturating_sub(2) as usize)
                    .into_iter()
                    .map(|entry| {
                        let color = match entry.level.as_str() {
                            "ERROR" => Color::Red,
                            "WARN" => Color::Yellow,
                            "DEBUG" | "TRACE" => Color::DarkGray,
                            _ => Color::Gray,
                        };
                        Line::from(Span::styled(entry.format_for_display(), Style::default().fg(color)))
                    })
                    .collect()
            })
            .unwrap_or_default();

        let logs = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(" Logs (F12) "));
        f.render_widget(logs, area);
    }

    fn draw_notification(&self, f: &mut Frame, size: Rect) {
        let Some(note) = self.app.view().active_notification(Instant::now()) else {
            return;
        };

        let width = 50.min(size.width.saturating_sub(2));
        let area = Rect {
            x: size.width.saturating_sub(width + 1),
            y: 1.min(size.height),
            width,
            height: 4.min(size.height),
        };

        let popup = Paragraph::new(note.message.clone())
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Notice ")
                    .style(Style::default().bg(Color::DarkGray)),
            );
        f.render_widget(Clear, area);
        f.render_widget(popup, area);
    }
}

/// Rect of `width` x `height` centred in `area`
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn centered_horizontally(area: Rect, percent: u16) -> Rect {
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent) / 2),
            Constraint::Percentage(percent),
            Constraint::Percentage((100 - percent) / 2),
        ])
        .split(area)[1]
}

/// Set up the terminal, run the client and restore the terminal
pub fn run_tui(
    config: Config,
    backend: Arc<dyn SearchBackend>,
    log_buffer: LogRingBuffer,
    initial_query: Option<String>,
) -> Result<()> {
    // Setup terminal
    crossterm::terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, crossterm::terminal::EnterAlternateScreen)?;

    let backend_term = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend_term)?;

    // Run the app
    let mut app = SearchTui::new(config, backend).with_log_buffer(log_buffer);
    app.start(initial_query.as_deref());
    let result = app.run(&mut terminal);

    // Cleanup
    crossterm::terminal::disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        crossterm::terminal::LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    Ok(result?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SearchError;
    use crate::search::{OrderUpdate, SearchPayload};

    struct StaticBackend;

    impl SearchBackend for StaticBackend {
        fn search(&self, query: &str, offset: usize, _mode: RankingMode) -> Result<SearchPayload, SearchError> {
            let count = 30usize.saturating_sub(offset).min(10);
            Ok(SearchPayload {
                results_count: 30,
                links: (offset..offset + count).map(|i| format!("https://example.org/{i}")).collect(),
                titles: (offset..offset + count).map(|i| format!("{query} {i}")).collect(),
                contents: vec!["snippet".to_string(); count],
                correlations: vec![0.5; count],
                time: 0.01,
            })
        }

        fn fetch_order(&self) -> Result<i64, SearchError> {
            Ok(100)
        }

        fn update_order(&self, _order: i64) -> Result<OrderUpdate, SearchError> {
            Ok(OrderUpdate { computed: false })
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(tui: &mut SearchTui, text: &str) {
        for c in text.chars() {
            tui.handle_key_event(key(KeyCode::Char(c)));
        }
    }

    fn wait_for_event(tui: &mut SearchTui) {
        let event = tui
            .worker
            .next_timeout(Duration::from_secs(5))
            .expect("worker event");
        tui.handle_worker_event(event);
    }

    fn new_tui() -> SearchTui {
        let mut config = Config::default();
        config.behavior.load_order_on_startup = false;
        SearchTui::new(config, Arc::new(StaticBackend))
    }

    #[test]
    fn test_landing_submit_switches_to_results() {
        let mut tui = new_tui();
        type_text(&mut tui, "ocean");
        tui.handle_key_event(key(KeyCode::Enter));

        assert_eq!(tui.focus, Focus::List);
        assert_eq!(tui.landing_input.value(), "");
        assert_eq!(tui.search_input.value(), "ocean");
        assert_eq!(tui.orchestrator().view().state().location, Location::Results);

        wait_for_event(&mut tui);
        assert_eq!(tui.orchestrator().pane().records.len(), 10);
    }

    #[test]
    fn test_blank_landing_stays_home() {
        let mut tui = new_tui();
        type_text(&mut tui, "   ");
        tui.handle_key_event(key(KeyCode::Enter));
        assert_eq!(tui.focus, Focus::Landing);
        assert_eq!(tui.orchestrator().view().state().location, Location::Home);
    }

    #[test]
    fn test_next_page_key_fetches_and_renders() {
        let mut tui = new_tui();
        tui.start(Some("ocean"));
        wait_for_event(&mut tui);

        assert!(!tui.handle_key_event(key(KeyCode::Char('n'))));
        wait_for_event(&mut tui);
        let pane = tui.orchestrator().pane();
        assert_eq!(pane.plan.current_page, 2);
        assert_eq!(pane.records[0].title, "ocean 10");
    }

    #[test]
    fn test_settings_flow() {
        let mut tui = new_tui();
        tui.start(Some("ocean"));
        wait_for_event(&mut tui);

        tui.handle_key_event(key(KeyCode::Char('s')));
        assert_eq!(tui.focus, Focus::Settings);
        tui.handle_key_event(key(KeyCode::Char('1')));
        tui.handle_key_event(key(KeyCode::Tab));
        type_text(&mut tui, "250");
        tui.handle_key_event(key(KeyCode::Enter));

        assert_eq!(tui.focus, Focus::List);
        assert_eq!(tui.orchestrator().settings().mode, RankingMode::TermByDocumentIdf);
        assert!(!tui.orchestrator().view().state().settings_visible);

        wait_for_event(&mut tui);
        assert_eq!(tui.orchestrator().settings().svd_order, 250);
        assert!(tui
            .orchestrator()
            .view()
            .active_notification(Instant::now())
            .is_some());
    }

    #[test]
    fn test_paging_after_new_submission_restores_search_box() {
        let mut tui = new_tui();
        tui.start(Some("ocean"));
        wait_for_event(&mut tui);

        tui.handle_key_event(key(KeyCode::Char('/')));
        for _ in 0.."ocean".len() {
            tui.handle_key_event(key(KeyCode::Backspace));
        }
        type_text(&mut tui, "coral");
        tui.handle_key_event(key(KeyCode::Enter));
        assert_eq!(tui.search_input.value(), "coral");

        // Page 1 is cached, so this cancels the pending "coral" search
        tui.handle_key_event(key(KeyCode::Char('g')));
        assert_eq!(tui.search_input.value(), "ocean");
        assert!(!tui.orchestrator().pane().loading);
    }

    #[test]
    fn test_quit_keys() {
        let mut tui = new_tui();
        assert!(tui.handle_key_event(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));

        let mut tui = new_tui();
        tui.start(Some("ocean"));
        assert!(tui.handle_key_event(key(KeyCode::Char('q'))));
    }
}
