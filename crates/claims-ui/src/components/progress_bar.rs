use crate::themes::Theme;
use claims_core::formatting;
use ratatui::text::{Line, Span};

/// Configuration controlling visual appearance of a bar component.
pub struct BarConfig {
    /// Total width in terminal columns of the bar portion (excluding label).
    pub width: u16,
    /// Character used to fill the completed portion of the bar.
    pub filled_char: char,
    /// Character used to fill the empty portion of the bar.
    pub empty_char: char,
}

impl Default for BarConfig {
    fn default() -> Self {
        Self {
            width: 20,
            filled_char: '\u{2588}', // █  FULL BLOCK
            empty_char: '\u{2591}',  // ░  LIGHT SHADE
        }
    }
}

// ── ProbabilityBar ───────────────────────────────────────────────────────────

/// Horizontal bar visualising one claim's fraud probability.
///
/// The fill is coloured by risk tier and followed by the probability as a
/// one-decimal percentage, matching the queue table's probability column.
pub struct ProbabilityBar<'a> {
    /// Fraud probability in `[0, 1]`; out-of-range values are clamped for
    /// display only.
    pub probability: f64,
    /// Theme from which the tier colour is taken.
    pub theme: &'a Theme,
    /// Visual configuration.
    pub config: BarConfig,
}

impl<'a> ProbabilityBar<'a> {
    /// Construct a new bar.
    pub fn new(probability: f64, theme: &'a Theme) -> Self {
        Self {
            probability,
            theme,
            config: BarConfig::default(),
        }
    }

    /// Render the bar as a [`Line`] suitable for embedding in a table cell.
    pub fn to_line(&self) -> Line<'a> {
        let clamped = self.probability.clamp(0.0, 1.0);
        let filled = (clamped * self.config.width as f64).round() as u16;
        let empty = self.config.width.saturating_sub(filled);

        let bar_style = self.theme.risk_style(self.probability);

        let filled_str: String =
            std::iter::repeat_n(self.config.filled_char, filled as usize).collect();
        let empty_str: String =
            std::iter::repeat_n(self.config.empty_char, empty as usize).collect();

        let label = format!(" {:>6}", formatting::format_probability(self.probability));

        Line::from(vec![
            Span::styled(filled_str, bar_style),
            Span::styled(empty_str, self.theme.progress_empty),
            Span::styled(label, self.theme.progress_label),
        ])
    }
}

// ── RatioBar ─────────────────────────────────────────────────────────────────

/// Horizontal bar showing one category's count relative to the largest
/// category in its chart (age groups, provider fraud counts).
pub struct RatioBar<'a> {
    /// Category label shown before the bar.
    pub label: String,
    /// This category's value.
    pub value: f64,
    /// The largest value in the chart; zero renders an empty bar.
    pub max: f64,
    /// Fill style for the bar segment.
    pub style: ratatui::style::Style,
    /// Theme for the empty portion and labels.
    pub theme: &'a Theme,
    /// Visual configuration.
    pub config: BarConfig,
}

impl<'a> RatioBar<'a> {
    /// Construct a new bar.
    pub fn new(
        label: impl Into<String>,
        value: f64,
        max: f64,
        style: ratatui::style::Style,
        theme: &'a Theme,
    ) -> Self {
        Self {
            label: label.into(),
            value,
            max,
            style,
            theme,
            config: BarConfig::default(),
        }
    }

    /// Render the bar as a [`Line`].
    pub fn to_line(&self) -> Line<'a> {
        let ratio = if self.max > 0.0 {
            (self.value / self.max).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let filled = (ratio * self.config.width as f64).round() as u16;
        let empty = self.config.width.saturating_sub(filled);

        let filled_str: String =
            std::iter::repeat_n(self.config.filled_char, filled as usize).collect();
        let empty_str: String =
            std::iter::repeat_n(self.config.empty_char, empty as usize).collect();

        Line::from(vec![
            Span::styled(format!("{:<10}", self.label), self.theme.label),
            Span::styled(filled_str, self.style),
            Span::styled(empty_str, self.theme.progress_empty),
            Span::styled(
                format!(" {}", formatting::format_number(self.value, 0)),
                self.theme.value,
            ),
        ])
    }
}

// ── DistributionBar ──────────────────────────────────────────────────────────

/// A proportional two-segment bar for the fraud distribution chart.
///
/// Each `(label, value)` pair is rendered as a contiguous coloured segment
/// whose width is proportional to its share of the total, followed by text
/// labels with the raw values.
pub struct DistributionBar<'a> {
    /// Ordered `(label, value)` pairs; in practice Legitimate then Fraudulent.
    pub segments: Vec<(&'static str, f64)>,
    /// Theme from which segment colours are taken.
    pub theme: &'a Theme,
    /// Total width of the bar in terminal columns.
    pub width: u16,
}

impl<'a> DistributionBar<'a> {
    /// Construct a new distribution bar.
    pub fn new(segments: Vec<(&'static str, f64)>, theme: &'a Theme) -> Self {
        Self {
            segments,
            theme,
            width: 40,
        }
    }

    fn segment_style(&self, label: &str) -> ratatui::style::Style {
        if label == "Fraudulent" {
            self.theme.chart_fraudulent
        } else {
            self.theme.chart_legitimate
        }
    }

    /// Render the bar as a [`Line`].
    pub fn to_line(&self) -> Line<'a> {
        let total: f64 = self.segments.iter().map(|(_, v)| v.max(0.0)).sum();
        let mut spans: Vec<Span<'a>> = Vec::new();

        if total > 0.0 {
            for (label, value) in &self.segments {
                let chars = ((value.max(0.0) / total) * self.width as f64).round() as usize;
                if chars > 0 {
                    let segment = "█".repeat(chars);
                    spans.push(Span::styled(segment, self.segment_style(label)));
                }
            }
        } else {
            spans.push(Span::styled(
                "░".repeat(self.width as usize),
                self.theme.progress_empty,
            ));
        }

        // Space between bar and labels.
        spans.push(Span::raw(" "));

        // Textual labels after the bar.
        for (label, value) in &self.segments {
            spans.push(Span::styled(
                format!("{}: {} ", label, formatting::format_number(*value, 0)),
                self.segment_style(label),
            ));
        }

        Line::from(spans)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::themes::Theme;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    // ── ProbabilityBar ───────────────────────────────────────────────────────

    #[test]
    fn test_probability_bar_spans_and_fill() {
        let theme = Theme::dark();
        let bar = ProbabilityBar::new(0.5, &theme);
        let line = bar.to_line();

        assert_eq!(line.spans.len(), 3, "expected filled, empty, label spans");
        // 50 % of 20 columns = 10 filled chars.
        assert_eq!(line.spans[0].content.chars().count(), 10);
        assert_eq!(line.spans[1].content.chars().count(), 10);
        assert!(line.spans[2].content.contains("50.0%"));
    }

    #[test]
    fn test_probability_bar_full() {
        let theme = Theme::dark();
        let bar = ProbabilityBar::new(1.0, &theme);
        let line = bar.to_line();
        assert_eq!(line.spans[0].content.chars().count(), 20);
        assert_eq!(line.spans[1].content.len(), 0);
        assert!(line.spans[2].content.contains("100.0%"));
    }

    #[test]
    fn test_probability_bar_zero() {
        let theme = Theme::dark();
        let bar = ProbabilityBar::new(0.0, &theme);
        let line = bar.to_line();
        assert_eq!(line.spans[0].content.len(), 0);
        assert_eq!(line.spans[1].content.chars().count(), 20);
    }

    #[test]
    fn test_probability_bar_uses_tier_colour() {
        let theme = Theme::dark();
        let high = ProbabilityBar::new(0.9, &theme).to_line();
        let low = ProbabilityBar::new(0.2, &theme).to_line();
        assert_eq!(high.spans[0].style, theme.risk_high);
        assert_eq!(low.spans[0].style, theme.risk_low);
    }

    // ── RatioBar ─────────────────────────────────────────────────────────────

    #[test]
    fn test_ratio_bar_half_fill() {
        let theme = Theme::dark();
        let bar = RatioBar::new("30-45", 5.0, 10.0, theme.chart_age, &theme);
        let line = bar.to_line();
        // label, filled, empty, count.
        assert_eq!(line.spans.len(), 4);
        assert_eq!(line.spans[1].content.chars().count(), 10);
        assert!(line.spans[3].content.contains('5'));
    }

    #[test]
    fn test_ratio_bar_zero_max() {
        let theme = Theme::dark();
        let bar = RatioBar::new("60+", 0.0, 0.0, theme.chart_age, &theme);
        let line = bar.to_line();
        // Must not divide by zero; bar stays empty.
        assert_eq!(line.spans[1].content.len(), 0);
        assert_eq!(line.spans[2].content.chars().count(), 20);
    }

    // ── DistributionBar ──────────────────────────────────────────────────────

    #[test]
    fn test_distribution_bar_proportions() {
        let theme = Theme::dark();
        let bar = DistributionBar::new(vec![("Legitimate", 30.0), ("Fraudulent", 10.0)], &theme);
        let line = bar.to_line();

        // First segment three times the second (30 vs 10 of width 40).
        assert_eq!(line.spans[0].content.chars().count(), 30);
        assert_eq!(line.spans[1].content.chars().count(), 10);

        let text = line_text(&line);
        assert!(text.contains("Legitimate: 30"));
        assert!(text.contains("Fraudulent: 10"));
    }

    #[test]
    fn test_distribution_bar_zero_total() {
        let theme = Theme::dark();
        let bar = DistributionBar::new(vec![("Legitimate", 0.0), ("Fraudulent", 0.0)], &theme);
        let line = bar.to_line();
        // Placeholder track instead of divide-by-zero.
        assert_eq!(line.spans[0].content.chars().count(), 40);
    }

    #[test]
    fn test_distribution_bar_segment_styles() {
        let theme = Theme::dark();
        let bar = DistributionBar::new(vec![("Legitimate", 1.0), ("Fraudulent", 1.0)], &theme);
        let line = bar.to_line();
        assert_eq!(line.spans[0].style, theme.chart_legitimate);
        assert_eq!(line.spans[1].style, theme.chart_fraudulent);
    }
}
