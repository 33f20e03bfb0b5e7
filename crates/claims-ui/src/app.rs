//! Main application state and TUI event loop for Claimsight.
//!
//! [`App`] owns the theme, the user-selected [`ViewState`] (risk filter,
//! current page, chart mode), and the last received dashboard snapshot. It
//! derives the visible queue page from those inputs on every render; all
//! derived structures are pure functions of the snapshot plus view state.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    text::Text,
    widgets::Paragraph,
    Frame, Terminal,
};
use tokio::sync::mpsc;

use claims_core::models::{ClaimResult, ViewState, PAGE_SIZE};
use claims_data::pagination::Paginator;
use claims_data::queue::FilterEngine;
use claims_runtime::orchestrator::DashboardData;

use crate::dashboard_view::{self, DashboardViewData};
use crate::table_view::{self, QueueViewData};
use crate::themes::{resolve_theme_name, Theme};

// ── ViewMode ──────────────────────────────────────────────────────────────────

/// Which top-level mode the TUI is running in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewMode {
    /// Live dashboard fed by the background orchestrator.
    Dashboard,
    /// One-shot report over a single analysis pass.
    Report,
}

// ── App ───────────────────────────────────────────────────────────────────────

/// Root application state for the Claimsight TUI.
pub struct App {
    /// Active colour theme.
    pub theme: Theme,
    /// Resolved theme name ("dark" or "light"), the toggle's anchor.
    pub theme_name: String,
    /// Current top-level mode.
    pub view_mode: ViewMode,
    /// User-selected dashboard parameters.
    pub view_state: ViewState,
    /// Selected row index within the visible page.
    pub selected_row: usize,
    /// Whether the claim investigation panel is open.
    pub show_detail: bool,
    /// Set to `true` to break out of the event loop on the next iteration.
    pub should_quit: bool,
    /// Most recent dashboard snapshot, `None` until the first data arrives.
    pub last_data: Option<DashboardData>,
    /// Drop directory shown on the waiting screen.
    pub data_path_label: String,
}

impl App {
    /// Construct a new application with the given configuration.
    pub fn new(theme_name: &str, view_mode: ViewMode, data_path_label: String) -> Self {
        let resolved = resolve_theme_name(theme_name);
        Self {
            theme: Theme::from_name(resolved),
            theme_name: resolved.to_string(),
            view_mode,
            view_state: ViewState::default(),
            selected_row: 0,
            show_detail: false,
            should_quit: false,
            last_data: None,
            data_path_label,
        }
    }

    // ── Public event loops ────────────────────────────────────────────────────

    /// Run the live dashboard, receiving snapshots from `rx`.
    ///
    /// Uses `crossterm::event::poll` (synchronous, with a 250 ms timeout) so
    /// that the terminal event loop stays on the current thread while data
    /// updates arrive on the async channel via `try_recv`.
    ///
    /// The loop exits on `q`, `Q`, or `Ctrl+C`.
    pub async fn run_dashboard(mut self, mut rx: mpsc::Receiver<DashboardData>) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let tick_rate = Duration::from_millis(250);

        let result = loop {
            terminal.draw(|frame| self.render(frame))?;

            // Handle keyboard events with a short timeout so we don't block.
            if event::poll(tick_rate)? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key(key.code, key.modifiers);
                }
            }

            // Drain any pending data updates (non-blocking).
            loop {
                match rx.try_recv() {
                    Ok(data) => self.update_from_snapshot(data),
                    Err(mpsc::error::TryRecvError::Empty) => break,
                    Err(mpsc::error::TryRecvError::Disconnected) => {
                        self.should_quit = true;
                        break;
                    }
                }
            }

            if self.should_quit {
                break Ok(());
            }
        };

        // Restore terminal state unconditionally.
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    /// Run a one-shot report over a single snapshot, then wait for `q` / `Ctrl+C`.
    ///
    /// Filter, pagination, and chart keys stay live; only the data is static.
    pub async fn run_report(mut self, data: DashboardData) -> io::Result<()> {
        self.update_from_snapshot(data);

        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let tick_rate = Duration::from_millis(250);

        loop {
            terminal.draw(|frame| self.render(frame))?;

            if event::poll(tick_rate)? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key(key.code, key.modifiers);
                }
            }

            if self.should_quit {
                break;
            }
        }

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;
        Ok(())
    }

    // ── Input handling ────────────────────────────────────────────────────────

    /// Apply a key press to the application state.
    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        match code {
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
            KeyCode::Char('f') => {
                self.view_state.cycle_filter();
                self.selected_row = 0;
                self.show_detail = false;
            }
            KeyCode::Char('c') => self.view_state.toggle_chart_view(),
            KeyCode::Char('t') => self.toggle_theme(),
            KeyCode::Left => self.previous_page(),
            KeyCode::Right => self.next_page(),
            KeyCode::Up => {
                self.selected_row = self.selected_row.saturating_sub(1);
            }
            KeyCode::Down => {
                let rows = self.current_page_view().rows.len();
                if rows > 0 && self.selected_row + 1 < rows {
                    self.selected_row += 1;
                }
            }
            KeyCode::Enter => {
                if !self.current_page_view().rows.is_empty() {
                    self.show_detail = true;
                }
            }
            KeyCode::Esc => self.show_detail = false,
            _ => {}
        }
    }

    /// Flip between the dark and light theme.
    fn toggle_theme(&mut self) {
        self.theme_name = if self.theme_name == "dark" {
            "light".to_string()
        } else {
            "dark".to_string()
        };
        self.theme = Theme::from_name(&self.theme_name);
    }

    /// Move to the previous page, clamped at 1.
    fn previous_page(&mut self) {
        let current = self.current_page_view().effective_page;
        self.view_state.set_page(current.saturating_sub(1).max(1));
        self.selected_row = 0;
    }

    /// Move to the next page, clamped at the last page.
    fn next_page(&mut self) {
        let view = self.current_page_view();
        let next = (view.effective_page + 1).min(view.total_pages.max(1));
        self.view_state.set_page(next);
        self.selected_row = 0;
    }

    // ── Derived view data ─────────────────────────────────────────────────────

    /// The full high-risk queue for the current batch and filter.
    fn current_queue(&self) -> Vec<ClaimResult> {
        match self.last_data.as_ref().and_then(|d| d.analysis.batch.as_ref()) {
            Some(batch) => FilterEngine::build_queue(&batch.results, self.view_state.risk_filter),
            None => Vec::new(),
        }
    }

    /// The visible page of the queue plus its navigation sequence.
    pub fn current_page_view(&self) -> QueueViewData {
        let queue = self.current_queue();
        let paged = Paginator::paginate(&queue, PAGE_SIZE, self.view_state.current_page);
        let page_labels = Paginator::page_numbers(paged.total_pages, paged.effective_page);
        let selected = if paged.slice.is_empty() {
            None
        } else {
            Some(self.selected_row.min(paged.slice.len() - 1))
        };

        QueueViewData {
            queue_len: queue.len(),
            rows: paged.slice,
            effective_page: paged.effective_page,
            total_pages: paged.total_pages,
            page_labels,
            selected,
        }
    }

    /// Convert an incoming snapshot into application state.
    ///
    /// A genuinely new analysis (fresh `generated_at`) resets the view state
    /// and selection, matching the batch-load lifecycle; re-sent cached
    /// snapshots leave the user's filter and page untouched.
    pub fn update_from_snapshot(&mut self, data: DashboardData) {
        let is_new_analysis = self
            .last_data
            .as_ref()
            .map(|previous| previous.analysis.metadata.generated_at != data.analysis.metadata.generated_at)
            .unwrap_or(true);

        if is_new_analysis {
            self.view_state = ViewState::default();
            self.selected_row = 0;
            self.show_detail = false;
        }

        self.last_data = Some(data);
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    /// Render the current application state into `frame`.
    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let Some(data) = &self.last_data else {
            dashboard_view::render_no_batch(frame, area, &self.data_path_label, &self.theme);
            return;
        };
        let Some(batch) = &data.analysis.batch else {
            dashboard_view::render_no_batch(frame, area, &self.data_path_label, &self.theme);
            return;
        };

        let source = data
            .analysis
            .metadata
            .source_file
            .as_deref()
            .and_then(|p| std::path::Path::new(p).file_name())
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "batch".to_string());

        let panel = DashboardViewData {
            source,
            filter_label: self.view_state.risk_filter.label().to_string(),
            summary: batch.summary.clone(),
            aggregates: data.analysis.aggregates.clone(),
            chart_view: self.view_state.chart_view,
            batches_seen: data.batches_seen,
            ingest_error: data.ingest_error.clone(),
        };
        let panel_lines = dashboard_view::build_dashboard_lines(&panel, &self.theme);
        let panel_height = panel_lines.len() as u16;

        let queue_view = self.current_page_view();
        let detail_claim = if self.show_detail {
            queue_view
                .selected
                .and_then(|i| queue_view.rows.get(i))
                .cloned()
        } else {
            None
        };

        let constraints = if let Some(claim) = &detail_claim {
            let detail_height = dashboard_view::build_claim_detail_lines(claim, &self.theme).len()
                as u16
                + 2;
            vec![
                Constraint::Length(panel_height),
                Constraint::Min(6),
                Constraint::Length(detail_height),
                Constraint::Length(2),
            ]
        } else {
            vec![
                Constraint::Length(panel_height),
                Constraint::Min(6),
                Constraint::Length(2),
            ]
        };

        let chunks = Layout::vertical(constraints).split(area);

        frame.render_widget(
            Paragraph::new(Text::from(panel_lines)),
            chunks[0],
        );
        table_view::render_queue(frame, chunks[1], &queue_view, &self.theme);

        let footer_area = if let Some(claim) = &detail_claim {
            dashboard_view::render_claim_detail(frame, chunks[2], claim, &self.theme);
            chunks[3]
        } else {
            chunks[2]
        };

        let footer = vec![
            table_view::build_pagination_line(&queue_view, &self.theme),
            ratatui::text::Line::from(ratatui::text::Span::styled(
                "q quit · f filter · c chart · t theme · ←/→ page · ↑/↓ select · enter details",
                self.theme.dim,
            )),
        ];
        frame.render_widget(Paragraph::new(Text::from(footer)), footer_area);
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
