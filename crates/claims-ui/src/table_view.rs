//! High Risk Claims Queue table and pagination controls.
//!
//! Renders a bordered [`ratatui::widgets::Table`] with one row per queued
//! claim on the current page, plus a pagination line built from the
//! compressed page-number sequence.

use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use claims_core::classification::RiskClassifier;
use claims_core::models::ClaimResult;
use claims_data::pagination::PageLabel;

use crate::components::progress_bar::ProbabilityBar;
use crate::themes::Theme;

/// Everything needed to render the queue block.
pub struct QueueViewData {
    /// Rows on the current page, in queue order.
    pub rows: Vec<ClaimResult>,
    /// Total queued claims across all pages (the "N New" badge).
    pub queue_len: usize,
    /// Current page after clamping.
    pub effective_page: u64,
    /// Total page count; zero when the queue is empty.
    pub total_pages: u64,
    /// Compressed navigation sequence.
    pub page_labels: Vec<PageLabel>,
    /// Index of the selected row within `rows`, if any.
    pub selected: Option<usize>,
}

/// Render the queue table (or the empty-state message) into `area`.
pub fn render_queue(frame: &mut Frame, area: Rect, data: &QueueViewData, theme: &Theme) {
    if data.rows.is_empty() {
        render_no_claims(frame, area, theme);
        return;
    }

    let header_cells = ["Claim ID", "Fraud Probability", "Risk Reason", "Risk Status"]
        .iter()
        .map(|h| Cell::from(*h).style(theme.table_header));
    let header = Row::new(header_cells).height(1);

    let data_rows: Vec<Row> = data
        .rows
        .iter()
        .enumerate()
        .map(|(i, claim)| {
            let base = if data.selected == Some(i) {
                theme.table_selected
            } else if RiskClassifier::is_critical(claim.fraud_probability) {
                theme.critical
            } else if i % 2 == 0 {
                theme.table_row
            } else {
                theme.table_row_alt
            };

            let tier = RiskClassifier::classify(claim.fraud_probability);
            Row::new(vec![
                Cell::from(format!("#{}", claim.display_id())),
                Cell::from(ProbabilityBar::new(claim.fraud_probability, theme).to_line()),
                Cell::from(claim.primary_risk_reason().to_string()),
                Cell::from(Span::styled(tier.as_str(), theme.tier_style(tier))),
            ])
            .style(base)
        })
        .collect();

    let widths = [
        Constraint::Length(10),
        Constraint::Length(30),
        Constraint::Min(24),
        Constraint::Length(12),
    ];

    let title = format!(" High Risk Claims Queue ({} alerts) ", data.queue_len);
    let table = Table::new(data_rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title))
        .style(theme.text);

    frame.render_widget(table, area);
}

/// Render the empty-state message shown when no claims match the filter.
pub fn render_no_claims(frame: &mut Frame, area: Rect, theme: &Theme) {
    let paragraph = Paragraph::new(Line::from(Span::styled(
        "No claims match the selected filter criteria.",
        theme.dim,
    )))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" High Risk Claims Queue "),
    );
    frame.render_widget(paragraph, area);
}

/// Build the pagination line: `Page 2/5   1 2 [3] … 9`.
///
/// Ellipsis entries are rendered dimmed; the current page is emphasised.
/// Returns an empty line when there is at most one page.
pub fn build_pagination_line<'a>(data: &QueueViewData, theme: &'a Theme) -> Line<'a> {
    if data.total_pages <= 1 {
        return Line::from("");
    }

    let mut spans: Vec<Span<'a>> = vec![Span::styled(
        format!("Page {}/{}  ", data.effective_page, data.total_pages),
        theme.label,
    )];

    for label in &data.page_labels {
        match label {
            PageLabel::Number(n) if *n == data.effective_page => {
                spans.push(Span::styled(format!("[{}]", n), theme.page_active));
            }
            PageLabel::Number(n) => {
                spans.push(Span::styled(format!(" {} ", n), theme.page_inactive));
            }
            PageLabel::Ellipsis => {
                spans.push(Span::styled(" … ", theme.page_ellipsis));
            }
        }
    }

    Line::from(spans)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
