//! Dashboard panel rendering: KPI rows, analyst insight, and the three
//! distribution charts, plus the claim investigation panel.
//!
//! Everything is drawn as [`Paragraph`]s whose lines are built by pure
//! functions so the layout can be unit-tested without a terminal.

use ratatui::{
    layout::Rect,
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use claims_core::classification::RiskClassifier;
use claims_core::formatting;
use claims_core::models::{ChartView, ClaimResult, Summary};
use claims_data::aggregator::{AggregationEngine, Aggregates};

use crate::components::header::Header;
use crate::components::progress_bar::{DistributionBar, RatioBar};
use crate::themes::Theme;

/// All data required to render the dashboard panel.
pub struct DashboardViewData {
    /// Display name of the loaded batch file.
    pub source: String,
    /// Label of the active queue filter.
    pub filter_label: String,
    /// Classifier-reported batch counts.
    pub summary: Summary,
    /// Computed dashboard aggregates.
    pub aggregates: Aggregates,
    /// Active fraud distribution chart mode.
    pub chart_view: ChartView,
    /// Number of distinct batch files observed this session.
    pub batches_seen: usize,
    /// Ingestion failure to surface, if any.
    pub ingest_error: Option<String>,
}

// ── Row builders ──────────────────────────────────────────────────────────────

/// Build one `label: value` KPI row with a dimmed subtitle.
fn kpi_row<'a>(label: &'a str, value: String, subtitle: &'a str, theme: &'a Theme) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("{:<24}", label), theme.label),
        Span::styled(format!("{:<14}", value), theme.value),
        Span::styled(subtitle, theme.dim),
    ])
}

/// Build a section heading line.
fn section<'a>(title: &'a str, theme: &'a Theme) -> Line<'a> {
    Line::from(Span::styled(title, theme.bold))
}

// ── Main render ───────────────────────────────────────────────────────────────

/// Render the dashboard panel (header, insight, KPIs, charts) into `area`.
pub fn render_dashboard_panel(
    frame: &mut Frame,
    area: Rect,
    data: &DashboardViewData,
    theme: &Theme,
) {
    let lines = build_dashboard_lines(data, theme);
    let paragraph = Paragraph::new(Text::from(lines));
    frame.render_widget(paragraph, area);
}

/// Build the full `Vec<Line>` for the dashboard panel (extracted for
/// testability).
pub fn build_dashboard_lines<'a>(data: &'a DashboardViewData, theme: &'a Theme) -> Vec<Line<'a>> {
    let mut lines: Vec<Line<'a>> = Vec::with_capacity(24);

    // ── Header ────────────────────────────────────────────────────────────────
    let mut header_lines = Header::new(&data.source, &data.filter_label, theme).to_lines();
    // Fold the session batch count into the info line.
    header_lines[2].push_span(Span::styled(
        format!("  batches this session: {}", data.batches_seen),
        theme.dim,
    ));
    lines.extend(header_lines);

    // ── Ingestion failure ─────────────────────────────────────────────────────
    if let Some(error) = &data.ingest_error {
        lines.push(Line::from(Span::styled(error.as_str(), theme.error)));
        lines.push(Line::from(""));
    }

    // ── Analyst insight ───────────────────────────────────────────────────────
    lines.push(Line::from(vec![
        Span::styled("AI ANALYST: ", theme.info),
        Span::styled(
            formatting::analyst_insight(
                data.summary.total_claims,
                data.summary.fraud_cases,
                data.aggregates.estimated_prevented,
            ),
            theme.text,
        ),
    ]));
    lines.push(Line::from(""));

    // ── KPI rows ──────────────────────────────────────────────────────────────
    lines.push(kpi_row(
        "Total Claims",
        formatting::format_number(data.summary.total_claims as f64, 0),
        "Uploaded batch total",
        theme,
    ));
    lines.push(kpi_row(
        "Fraud Detected",
        formatting::format_number(data.summary.fraud_cases as f64, 0),
        "High risk flagged cases",
        theme,
    ));
    lines.push(kpi_row(
        "Fraud Rate",
        format!("{:.1}%", data.aggregates.fraud_rate),
        "Fraud ratio",
        theme,
    ));
    lines.push(kpi_row(
        "Fraud Prevented",
        formatting::format_currency(data.aggregates.estimated_prevented.round()),
        "Potential financial loss avoided",
        theme,
    ));
    lines.push(Line::from(""));

    // ── Fraud distribution ────────────────────────────────────────────────────
    let mode = match data.chart_view {
        ChartView::Count => "count",
        ChartView::Amount => "amount",
    };
    lines.push(section("Fraud Distribution", theme));
    lines.push(Line::from(Span::styled(
        format!("mode: {mode} (press c to toggle)"),
        theme.dim,
    )));
    let distribution =
        AggregationEngine::fraud_distribution(&data.summary, &data.aggregates, data.chart_view);
    lines.push(DistributionBar::new(distribution.to_vec(), theme).to_line());
    lines.push(Line::from(""));

    // ── Age comparison ────────────────────────────────────────────────────────
    lines.push(section("Age Comparison", theme));
    let age_groups = data.aggregates.age_groups.labelled();
    let age_max = age_groups.iter().map(|(_, n)| *n).max().unwrap_or(0) as f64;
    for (label, count) in age_groups {
        lines.push(RatioBar::new(label, count as f64, age_max, theme.chart_age, theme).to_line());
    }
    lines.push(Line::from(""));

    // ── Provider risk analysis ────────────────────────────────────────────────
    lines.push(section("Provider Risk Analysis", theme));
    if data.aggregates.provider_fraud.is_empty() {
        lines.push(Line::from(Span::styled(
            "No fraud cases grouped by provider.",
            theme.dim,
        )));
    } else {
        let provider_max = data
            .aggregates
            .provider_fraud
            .iter()
            .map(|(_, n)| *n)
            .max()
            .unwrap_or(0) as f64;
        for (provider, count) in &data.aggregates.provider_fraud {
            lines.push(
                RatioBar::new(
                    provider.clone(),
                    *count as f64,
                    provider_max,
                    theme.chart_provider,
                    theme,
                )
                .to_line(),
            );
        }
    }

    lines
}

/// Render the placeholder screen shown before any batch has been ingested.
pub fn render_no_batch(frame: &mut Frame, area: Rect, data_path: &str, theme: &Theme) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Waiting for a claims batch...",
            theme.bold,
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Drop a classifier response file into ", theme.text),
            Span::styled(data_path, theme.value),
            Span::styled(" to populate the dashboard.", theme.text),
        ]),
        Line::from(""),
        Line::from(Span::styled("Press q to quit.", theme.dim)),
    ];

    let paragraph = Paragraph::new(Text::from(lines)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Claimsight "),
    );
    frame.render_widget(paragraph, area);
}

// ── Claim investigation panel ─────────────────────────────────────────────────

/// Build the lines of the claim investigation panel for a selected row.
pub fn build_claim_detail_lines<'a>(claim: &'a ClaimResult, theme: &'a Theme) -> Vec<Line<'a>> {
    let tier = RiskClassifier::classify(claim.fraud_probability);

    let amount = claim
        .claim_amount
        .map(formatting::format_currency)
        .unwrap_or_else(|| "N/A".to_string());
    let age = claim
        .patient_age
        .map(|a| a.to_string())
        .unwrap_or_else(|| "N/A".to_string());

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Claim ", theme.label),
            Span::styled(format!("#{}", claim.display_id()), theme.value),
            Span::raw("  "),
            Span::styled(tier.as_str(), theme.tier_style(tier)),
            if RiskClassifier::is_critical(claim.fraud_probability) {
                Span::styled("  CRITICAL", theme.critical)
            } else {
                Span::raw("")
            },
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled(format!("{:<18}", "Claim Amount"), theme.label),
            Span::styled(amount, theme.value),
        ]),
        Line::from(vec![
            Span::styled(format!("{:<18}", "Patient Age"), theme.label),
            Span::styled(age, theme.value),
        ]),
        Line::from(vec![
            Span::styled(format!("{:<18}", "Provider Type"), theme.label),
            Span::styled(claim.provider_type.as_str(), theme.value),
        ]),
        Line::from(vec![
            Span::styled(format!("{:<18}", "Fraud Probability"), theme.label),
            Span::styled(
                formatting::format_probability(claim.fraud_probability),
                theme.risk_style(claim.fraud_probability),
            ),
        ]),
        Line::from(""),
        Line::from(Span::styled("Risk Factors Detected:", theme.bold)),
    ];

    for reason in &claim.risk_reasons {
        lines.push(Line::from(vec![
            Span::styled("  • ", theme.dim),
            Span::styled(reason.as_str(), theme.text),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Press esc to close.", theme.dim)));
    lines
}

/// Render the claim investigation panel into `area`.
pub fn render_claim_detail(frame: &mut Frame, area: Rect, claim: &ClaimResult, theme: &Theme) {
    let paragraph = Paragraph::new(Text::from(build_claim_detail_lines(claim, theme))).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Claim Investigation "),
    );
    frame.render_widget(paragraph, area);
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use claims_core::models::Batch;

    fn make_view_data() -> DashboardViewData {
        let batch = Batch {
            summary: Summary {
                total_claims: 4,
                fraud_cases: 2,
                legitimate_cases: 2,
            },
            results: vec![
                claim(0, true, 0.92, Some(500.0), Some(25), "Clinic"),
                claim(1, false, 0.10, Some(300.0), Some(50), "Hospital"),
                claim(2, true, 0.70, Some(150.0), Some(65), "Clinic"),
                claim(3, false, 0.20, None, None, "Pharmacy"),
            ],
        };
        DashboardViewData {
            source: "batch.json".to_string(),
            filter_label: "All Risks".to_string(),
            aggregates: AggregationEngine::compute(&batch),
            summary: batch.summary,
            chart_view: ChartView::Count,
            batches_seen: 1,
            ingest_error: None,
        }
    }

    fn claim(
        row_id: u64,
        is_fraud: bool,
        probability: f64,
        amount: Option<f64>,
        age: Option<i64>,
        provider: &str,
    ) -> ClaimResult {
        ClaimResult {
            row_id,
            claim_amount: amount,
            patient_age: age,
            provider_type: provider.to_string(),
            is_fraud,
            fraud_probability: probability,
            risk_reasons: vec!["Unusual billing pattern".to_string()],
        }
    }

    fn all_text(lines: &[Line]) -> String {
        lines
            .iter()
            .map(|l| {
                l.spans
                    .iter()
                    .map(|s| s.content.as_ref())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    // ── build_dashboard_lines ────────────────────────────────────────────────

    #[test]
    fn test_dashboard_lines_contain_kpis() {
        let theme = Theme::dark();
        let data = make_view_data();
        let text = all_text(&build_dashboard_lines(&data, &theme));

        assert!(text.contains("Total Claims"));
        assert!(text.contains("Fraud Detected"));
        assert!(text.contains("Fraud Rate"));
        assert!(text.contains("50.0%"), "fraud rate of 2/4 must render");
        assert!(text.contains("Fraud Prevented"));
        assert!(text.contains("€650"), "500 + 150 fraud amount: {text}");
    }

    #[test]
    fn test_dashboard_lines_contain_insight() {
        let theme = Theme::dark();
        let data = make_view_data();
        let text = all_text(&build_dashboard_lines(&data, &theme));
        assert!(text.contains("AI ANALYST:"));
        assert!(text.contains("Analysis complete for 4 claims"));
        assert!(text.contains("batches this session: 1"));
    }

    #[test]
    fn test_dashboard_lines_contain_chart_sections() {
        let theme = Theme::dark();
        let data = make_view_data();
        let text = all_text(&build_dashboard_lines(&data, &theme));
        assert!(text.contains("Fraud Distribution"));
        assert!(text.contains("mode: count"));
        assert!(text.contains("Age Comparison"));
        assert!(text.contains("Under 30"));
        assert!(text.contains("Provider Risk Analysis"));
        assert!(text.contains("Clinic"));
        // Hospital has no fraud records, so the provider chart omits it.
        let provider_section = text.split("Provider Risk Analysis").nth(1).unwrap();
        assert!(!provider_section.contains("Hospital"));
    }

    #[test]
    fn test_dashboard_lines_amount_mode() {
        let theme = Theme::dark();
        let mut data = make_view_data();
        data.chart_view = ChartView::Amount;
        let text = all_text(&build_dashboard_lines(&data, &theme));
        assert!(text.contains("mode: amount"));
        // Amount mode shows sums, not counts.
        assert!(text.contains("Fraudulent: 650"));
        assert!(text.contains("Legitimate: 300"));
    }

    #[test]
    fn test_dashboard_lines_surface_ingest_error() {
        let theme = Theme::dark();
        let mut data = make_view_data();
        data.ingest_error = Some("Malformed batch: missing field `summary`".to_string());
        let text = all_text(&build_dashboard_lines(&data, &theme));
        assert!(text.contains("Malformed batch"));
    }

    // ── build_claim_detail_lines ─────────────────────────────────────────────

    #[test]
    fn test_claim_detail_lines_contents() {
        let theme = Theme::dark();
        let c = claim(0, true, 0.92, Some(500.0), Some(25), "Clinic");
        let text = all_text(&build_claim_detail_lines(&c, &theme));

        assert!(text.contains("#1"));
        assert!(text.contains("HIGH"));
        assert!(text.contains("CRITICAL"));
        assert!(text.contains("€500"));
        assert!(text.contains("Clinic"));
        assert!(text.contains("92.0%"));
        assert!(text.contains("Unusual billing pattern"));
    }

    #[test]
    fn test_claim_detail_missing_amount_shows_na() {
        let theme = Theme::dark();
        let c = claim(3, true, 0.70, None, None, "Pharmacy");
        let text = all_text(&build_claim_detail_lines(&c, &theme));
        assert!(text.contains("N/A"));
        assert!(text.contains("MEDIUM"));
        assert!(!text.contains("CRITICAL"));
    }
}
