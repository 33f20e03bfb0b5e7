use claims_core::classification::{RiskClassifier, RiskTier};
use ratatui::style::{Color, Modifier, Style};

/// Terminal background type detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackgroundType {
    Dark,
    Light,
    Unknown,
}

/// Detect terminal background type from the `COLORFGBG` environment variable.
///
/// The variable has the format `"foreground;background"`.  Background values
/// 0–6 are considered dark; 7–15 are considered light.  If the variable is
/// absent or unparseable, `BackgroundType::Dark` is returned as the safe
/// default.
pub fn detect_background() -> BackgroundType {
    if let Ok(val) = std::env::var("COLORFGBG") {
        if let Some(bg) = val.split(';').next_back() {
            if let Ok(bg_num) = bg.parse::<u8>() {
                return if bg_num <= 6 {
                    BackgroundType::Dark
                } else {
                    BackgroundType::Light
                };
            }
        }
    }
    BackgroundType::Dark
}

/// Complete theme definition carrying all UI styles used by claims-ui
/// components.
#[derive(Debug, Clone)]
pub struct Theme {
    // ── Header ───────────────────────────────────────────────────────────────
    pub header: Style,
    pub header_sparkle: Style,
    pub separator: Style,

    // ── Text ─────────────────────────────────────────────────────────────────
    pub text: Style,
    pub dim: Style,
    pub bold: Style,
    pub label: Style,
    pub value: Style,

    // ── Status ───────────────────────────────────────────────────────────────
    pub info: Style,
    pub success: Style,
    pub warning: Style,
    pub error: Style,

    // ── Risk tiers ───────────────────────────────────────────────────────────
    /// Probability bars and badges for the LOW tier.
    pub risk_low: Style,
    /// Probability bars and badges for the MEDIUM tier.
    pub risk_medium: Style,
    /// Probability bars and badges for the HIGH tier.
    pub risk_high: Style,
    /// Row emphasis for critical claims (probability ≥ 0.85).
    pub critical: Style,
    /// Unfilled (empty) portion of a probability bar.
    pub progress_empty: Style,
    pub progress_label: Style,

    // ── Charts ───────────────────────────────────────────────────────────────
    pub chart_legitimate: Style,
    pub chart_fraudulent: Style,
    pub chart_age: Style,
    pub chart_provider: Style,

    // ── Table ────────────────────────────────────────────────────────────────
    pub table_header: Style,
    pub table_border: Style,
    pub table_row: Style,
    pub table_row_alt: Style,
    pub table_selected: Style,

    // ── Pagination ───────────────────────────────────────────────────────────
    pub page_active: Style,
    pub page_inactive: Style,
    pub page_ellipsis: Style,
}

impl Theme {
    // ── Constructors ─────────────────────────────────────────────────────────

    /// Dark-background terminal theme (default).
    pub fn dark() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            header_sparkle: Style::default().fg(Color::Yellow),
            separator: Style::default().fg(Color::DarkGray),

            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            bold: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            label: Style::default().fg(Color::Gray),
            value: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),

            info: Style::default().fg(Color::Cyan),
            success: Style::default().fg(Color::Green),
            warning: Style::default().fg(Color::Yellow),
            error: Style::default().fg(Color::Red),

            risk_low: Style::default().fg(Color::Green),
            risk_medium: Style::default().fg(Color::Yellow),
            risk_high: Style::default().fg(Color::Red),
            critical: Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
            progress_empty: Style::default().fg(Color::DarkGray),
            progress_label: Style::default().fg(Color::Gray),

            chart_legitimate: Style::default().fg(Color::Green),
            chart_fraudulent: Style::default().fg(Color::Red),
            chart_age: Style::default().fg(Color::Blue),
            chart_provider: Style::default().fg(Color::Magenta),

            table_header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            table_border: Style::default().fg(Color::DarkGray),
            table_row: Style::default().fg(Color::White),
            table_row_alt: Style::default().fg(Color::Gray),
            table_selected: Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan),

            page_active: Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            page_inactive: Style::default().fg(Color::White),
            page_ellipsis: Style::default().fg(Color::DarkGray),
        }
    }

    /// Light-background terminal theme.
    ///
    /// Uses dark colours for text and bright accent colours so that content
    /// remains legible against a white/light-grey terminal canvas.
    pub fn light() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            header_sparkle: Style::default().fg(Color::Magenta),
            separator: Style::default().fg(Color::Gray),

            text: Style::default().fg(Color::Black),
            dim: Style::default().fg(Color::Gray),
            bold: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            label: Style::default().fg(Color::DarkGray),
            value: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),

            info: Style::default().fg(Color::Blue),
            success: Style::default().fg(Color::Green),
            warning: Style::default().fg(Color::Yellow),
            error: Style::default().fg(Color::Red),

            risk_low: Style::default().fg(Color::Green),
            risk_medium: Style::default().fg(Color::Yellow),
            risk_high: Style::default().fg(Color::Red),
            critical: Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
            progress_empty: Style::default().fg(Color::Gray),
            progress_label: Style::default().fg(Color::DarkGray),

            chart_legitimate: Style::default().fg(Color::Green),
            chart_fraudulent: Style::default().fg(Color::Red),
            chart_age: Style::default().fg(Color::Blue),
            chart_provider: Style::default().fg(Color::Magenta),

            table_header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            table_border: Style::default().fg(Color::Gray),
            table_row: Style::default().fg(Color::Black),
            table_row_alt: Style::default().fg(Color::DarkGray),
            table_selected: Style::default()
                .fg(Color::White)
                .bg(Color::Blue),

            page_active: Style::default()
                .fg(Color::White)
                .bg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            page_inactive: Style::default().fg(Color::Black),
            page_ellipsis: Style::default().fg(Color::Gray),
        }
    }

    /// Resolve a theme by name.
    ///
    /// `"light"` and `"dark"` map directly; `"auto"` (or anything else)
    /// falls back to background detection.
    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            "dark" => Self::dark(),
            _ => match detect_background() {
                BackgroundType::Light => Self::light(),
                _ => Self::dark(),
            },
        }
    }

    // ── Style lookup ─────────────────────────────────────────────────────────

    /// Style for a fraud probability, matching its risk tier.
    pub fn risk_style(&self, probability: f64) -> Style {
        match RiskClassifier::classify(probability) {
            RiskTier::High => self.risk_high,
            RiskTier::Medium => self.risk_medium,
            RiskTier::Low => self.risk_low,
        }
    }

    /// Badge style for a risk tier.
    pub fn tier_style(&self, tier: RiskTier) -> Style {
        match tier {
            RiskTier::High => self.risk_high,
            RiskTier::Medium => self.risk_medium,
            RiskTier::Low => self.risk_low,
        }
    }
}

/// Resolve the effective theme name, collapsing `"auto"` through background
/// detection so the theme toggle has a concrete starting point.
pub fn resolve_theme_name(name: &str) -> &'static str {
    match name {
        "light" => "light",
        "dark" => "dark",
        _ => match detect_background() {
            BackgroundType::Light => "light",
            _ => "dark",
        },
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
