// Terminal dashboard: one tab per panel, one row per control
use crate::panels::{PanelController, PanelKind, PanelOptions};
use crate::view::outline::{flatten, ControlRow, RowKind};
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use protogen_core::ProtogenClient;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Tabs},
    Frame, Terminal,
};
use std::io::stdout;
use std::time::Duration;
use tokio::runtime::Handle;

const AUDIO_STEP: i16 = 5;

pub struct Dashboard {
    client: ProtogenClient,
    options: PanelOptions,
    period: Duration,
    runtime: Handle,

    active_tab: PanelKind,
    selected_index: usize,
    panel: Option<PanelController>,

    show_help: bool,
    /// Outcome of the last user action: (text, is_error)
    message: Option<(String, bool)>,
}

impl Dashboard {
    /// `runtime` drives the panel's requests and sync loop; the dashboard
    /// itself runs on the calling thread, which must not be a runtime worker.
    pub fn new(
        client: ProtogenClient,
        options: PanelOptions,
        period: Duration,
        runtime: Handle,
    ) -> Self {
        Self {
            client,
            options,
            period,
            runtime,
            active_tab: PanelKind::Apps,
            selected_index: 0,
            panel: None,
            show_help: false,
            message: None,
        }
    }

    pub fn run(mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        self.open_tab();
        let res = self.run_app(&mut terminal);
        self.close_tab();

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        res
    }

    fn run_app<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        loop {
            // The sync loop patches the document in the background; redraw
            // on every pass to pick that up.
            terminal.draw(|f| self.draw_ui(f))?;

            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.show_help {
                        self.show_help = false;
                        continue;
                    }
                    if self.handle_key(key.code) {
                        return Ok(());
                    }
                }
            }
        }
    }

    /// Returns true when the dashboard should quit
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return true,
            KeyCode::Tab | KeyCode::Right => self.next_tab(),
            KeyCode::BackTab | KeyCode::Left => self.prev_tab(),
            KeyCode::Up => self.select_prev(),
            KeyCode::Down => self.select_next(),
            KeyCode::Enter | KeyCode::Char(' ') => self.activate_selected(),
            KeyCode::Char('+') | KeyCode::Char('=') => self.adjust_selected(AUDIO_STEP),
            KeyCode::Char('-') | KeyCode::Char('_') => self.adjust_selected(-AUDIO_STEP),
            KeyCode::Char('r') | KeyCode::Char('R') => self.refresh(),
            KeyCode::Char('?') | KeyCode::Char('h') | KeyCode::Char('H') => self.show_help = true,
            _ => {}
        }
        false
    }

    // ========================================================================
    // Panel lifecycle
    // ========================================================================

    fn open_tab(&mut self) {
        self.close_tab();
        self.selected_index = 0;
        let result = self.runtime.block_on(PanelController::open(
            self.active_tab,
            self.client.clone(),
            &self.options,
            self.period,
        ));
        match result {
            Ok(panel) => {
                self.panel = Some(panel);
                self.message = None;
                self.select_first();
            }
            Err(e) => {
                tracing::warn!(
                    panel = self.active_tab.as_str(),
                    error = %e,
                    "could not open panel"
                );
                let text = format!("Could not load {}: {}", self.active_tab.title(), e);
                self.message = Some((text, true));
            }
        }
    }

    /// Leaving a tab stops its polling
    fn close_tab(&mut self) {
        if let Some(mut panel) = self.panel.take() {
            panel.shutdown();
        }
    }

    fn next_tab(&mut self) {
        let tabs = PanelKind::all();
        let current = tabs.iter().position(|&t| t == self.active_tab).unwrap_or(0);
        self.active_tab = tabs[(current + 1) % tabs.len()];
        self.open_tab();
    }

    fn prev_tab(&mut self) {
        let tabs = PanelKind::all();
        let current = tabs.iter().position(|&t| t == self.active_tab).unwrap_or(0);
        self.active_tab = tabs[(current + tabs.len() - 1) % tabs.len()];
        self.open_tab();
    }

    fn refresh(&mut self) {
        let Some(panel) = &self.panel else {
            self.open_tab();
            return;
        };
        self.runtime.block_on(panel.poll_all());
        self.message = Some(("Refreshed".to_string(), false));
    }

    // ========================================================================
    // Selection and actions
    // ========================================================================

    fn rows(&self) -> Vec<ControlRow> {
        self.panel
            .as_ref()
            .map(|panel| flatten(&panel.document().read()))
            .unwrap_or_default()
    }

    fn select_first(&mut self) {
        self.selected_index = self
            .rows()
            .iter()
            .position(|row| row.actionable)
            .unwrap_or(0);
    }

    fn select_next(&mut self) {
        let rows = self.rows();
        if let Some(next) = (self.selected_index + 1..rows.len()).find(|&i| rows[i].actionable) {
            self.selected_index = next;
        }
    }

    fn select_prev(&mut self) {
        let rows = self.rows();
        if let Some(prev) = (0..self.selected_index.min(rows.len()))
            .rev()
            .find(|&i| rows[i].actionable)
        {
            self.selected_index = prev;
        }
    }

    fn selected_row(&self) -> Option<ControlRow> {
        self.rows()
            .into_iter()
            .nth(self.selected_index)
            .filter(|row| row.actionable)
    }

    fn activate_selected(&mut self) {
        let (Some(panel), Some(row)) = (&self.panel, self.selected_row()) else {
            return;
        };
        let Some(id) = row.element_id.as_deref() else {
            return;
        };
        if row.is_range() {
            self.message = Some(("Use +/- to adjust".to_string(), false));
            return;
        }

        self.message = Some(match self.runtime.block_on(panel.activate(id)) {
            Ok(()) => (format!("{}: done", row.label), false),
            Err(e) => (format!("{}: {}", row.label, e), true),
        });
    }

    fn adjust_selected(&mut self, delta: i16) {
        let (Some(panel), Some(row)) = (&self.panel, self.selected_row()) else {
            return;
        };
        let (true, Some(id)) = (row.is_range(), row.element_id.as_deref()) else {
            return;
        };

        self.message = Some(match self.runtime.block_on(panel.adjust(id, delta)) {
            Ok(level) => (format!("{}: {}", row.label, level), false),
            Err(e) => (format!("{}: {}", row.label, e), true),
        });
    }

    // ========================================================================
    // Drawing
    // ========================================================================

    fn draw_ui(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4), // Header
                Constraint::Min(0),    // Controls
                Constraint::Length(2), // Footer
            ])
            .split(f.area());

        self.draw_header(f, chunks[0]);
        if self.show_help {
            self.draw_help(f, chunks[1]);
        } else {
            self.draw_controls(f, chunks[1]);
        }
        self.draw_footer(f, chunks[2]);
    }

    fn draw_header(&self, f: &mut Frame, area: Rect) {
        let header_block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Blue));
        let inner_area = header_block.inner(area);
        f.render_widget(header_block, area);

        let header_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(1)])
            .split(inner_area);

        let (state, state_color) = match &self.panel {
            Some(panel) if panel.is_running() => ("LIVE", Color::Green),
            Some(_) => ("STOPPED", Color::Yellow),
            None => ("OFFLINE", Color::Red),
        };
        let status_text = vec![
            Span::styled(
                "PROTOGEN ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("{} | ", self.client.base_url())),
            Span::styled(state, Style::default().fg(state_color)),
            Span::raw(format!(" | every {} ms", self.period.as_millis())),
        ];
        f.render_widget(
            Paragraph::new(Line::from(status_text)).alignment(Alignment::Center),
            header_chunks[0],
        );

        let titles: Vec<Line> = PanelKind::all()
            .iter()
            .map(|t| Line::from(vec![Span::raw(t.title())]))
            .collect();
        let selected = PanelKind::all()
            .iter()
            .position(|&t| t == self.active_tab)
            .unwrap_or(0);
        let tabs = Tabs::new(titles)
            .select(selected)
            .style(Style::default().fg(Color::Gray))
            .highlight_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .divider(Span::raw(" | "));
        f.render_widget(tabs, header_chunks[1]);
    }

    fn draw_controls(&self, f: &mut Frame, area: Rect) {
        let rows = self.rows();
        let table_rows: Vec<Row> = rows.iter().map(control_row).collect();

        let widths = [Constraint::Length(2), Constraint::Min(10), Constraint::Length(12)];
        let table = Table::new(table_rows, widths)
            .block(
                Block::default()
                    .title(self.active_tab.title())
                    .borders(Borders::ALL),
            )
            .row_highlight_style(
                Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");

        let mut table_state = TableState::default();
        if !rows.is_empty() {
            table_state.select(Some(self.selected_index.min(rows.len() - 1)));
        }
        f.render_stateful_widget(table, area, &mut table_state);
    }

    fn draw_help(&self, f: &mut Frame, area: Rect) {
        let help_text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "Protogen Dashboard - Help",
                Style::default().add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![Span::styled("Navigation:", Style::default().fg(Color::Cyan))]),
            Line::from("  Tab / ←→   - Switch panel (Apps  Head  Minecraft)"),
            Line::from("  ↑/↓        - Select control"),
            Line::from(""),
            Line::from(vec![Span::styled("Actions:", Style::default().fg(Color::Cyan))]),
            Line::from("  Enter      - Activate selected control"),
            Line::from("  +/-        - Adjust selected slider"),
            Line::from("  r          - Poll every field now"),
            Line::from("  q          - Quit dashboard"),
            Line::from("  ?/h        - Show this help"),
        ];
        let help = Paragraph::new(help_text)
            .block(Block::default().title("Help").borders(Borders::ALL));
        f.render_widget(help, area);
    }

    fn draw_footer(&self, f: &mut Frame, area: Rect) {
        let badge = self
            .panel
            .as_ref()
            .map(|panel| panel_badge(panel))
            .unwrap_or_default();

        let (text, color) = if self.show_help {
            ("Press any key to close help".to_string(), Color::DarkGray)
        } else if let Some((message, is_error)) = &self.message {
            (message.clone(), if *is_error { Color::Red } else { Color::Green })
        } else if !badge.is_empty() {
            (badge, Color::Yellow)
        } else {
            (
                concat!(
                    "[ENTER] Activate | [+/-] Adjust | [↑↓] Navigate | [TAB] Switch | ",
                    "[R] Refresh | [?] Help | [Q] Quit"
                )
                .to_string(),
                Color::DarkGray,
            )
        };

        let footer = Paragraph::new(text)
            .alignment(Alignment::Center)
            .style(Style::default().fg(color));
        f.render_widget(footer, area);
    }
}

impl Drop for Dashboard {
    fn drop(&mut self) {
        self.close_tab();
    }
}

fn panel_badge(panel: &PanelController) -> String {
    let doc = panel.document().read();
    doc.find(&crate::view::ids::panel_status(panel.kind().as_str()))
        .map(|badge| badge.text_content())
        .unwrap_or_default()
}

fn control_row(row: &ControlRow) -> Row<'static> {
    let indent = "  ".repeat(row.depth.saturating_sub(1));
    let (marker, marker_color) = if row.unavailable {
        ("✗", Color::Red)
    } else {
        match &row.kind {
            RowKind::Button { highlighted: true } | RowKind::Radio { checked: true } => {
                ("●", Color::Green)
            }
            RowKind::Button { .. } | RowKind::Radio { .. } | RowKind::Range { .. } => {
                ("○", Color::Gray)
            }
            RowKind::Heading | RowKind::Text => (" ", Color::Reset),
        }
    };

    let label_style = match row.kind {
        RowKind::Heading => Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
        _ if row.unavailable => Style::default().fg(Color::DarkGray),
        _ => Style::default(),
    };

    let detail = match &row.kind {
        RowKind::Range { value } => format!("[{:>3}]", value),
        RowKind::Button { highlighted: true } => "active".to_string(),
        RowKind::Radio { checked: true } => "selected".to_string(),
        _ if row.unavailable => "unavailable".to_string(),
        _ => String::new(),
    };

    Row::new(vec![
        Cell::from(marker).style(Style::default().fg(marker_color)),
        Cell::from(format!("{}{}", indent, row.label)).style(label_style),
        Cell::from(detail).style(Style::default().fg(Color::DarkGray)),
    ])
}
