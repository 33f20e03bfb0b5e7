//! Fixed-size pagination and the compressed page-number sequence.

use claims_core::models::ClaimResult;

// ── PageLabel ─────────────────────────────────────────────────────────────────

/// One entry of the navigation control: a selectable page number or a
/// non-selectable ellipsis placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLabel {
    Number(u64),
    Ellipsis,
}

impl PageLabel {
    /// Text shown on the navigation control.
    pub fn display(&self) -> String {
        match self {
            PageLabel::Number(n) => n.to_string(),
            PageLabel::Ellipsis => "…".to_string(),
        }
    }
}

// ── Page ──────────────────────────────────────────────────────────────────────

/// One visible page of the high-risk queue.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// The rows on this page, in queue order.
    pub slice: Vec<ClaimResult>,
    /// The requested page after clamping into `[1, max(total_pages, 1)]`.
    pub effective_page: u64,
    /// Total number of pages; zero for an empty queue.
    pub total_pages: u64,
}

// ── Paginator ─────────────────────────────────────────────────────────────────

/// Maximum page count rendered without ellipsis compression.
const MAX_UNCOMPRESSED_PAGES: u64 = 7;

/// Stateless page slicing and navigation-sequence computation.
pub struct Paginator;

impl Paginator {
    /// Slice `queue` into the requested page.
    ///
    /// Out-of-range pages clamp rather than fail: an empty queue yields an
    /// empty slice with `total_pages = 0`, and a page past the end lands on
    /// the last page.
    pub fn paginate(queue: &[ClaimResult], page_size: usize, current_page: u64) -> Page {
        let page_size = page_size.max(1);
        let total_pages = queue.len().div_ceil(page_size) as u64;
        let effective_page = current_page.clamp(1, total_pages.max(1));

        let start = (effective_page - 1) as usize * page_size;
        let end = (start + page_size).min(queue.len());
        let slice = if start < queue.len() {
            queue[start..end].to_vec()
        } else {
            Vec::new()
        };

        Page {
            slice,
            effective_page,
            total_pages,
        }
    }

    /// Compute the compressed page-number sequence for the navigation row.
    ///
    /// Up to [`MAX_UNCOMPRESSED_PAGES`] pages are listed verbatim. Beyond
    /// that, the first and last page always appear around a window of up to
    /// three interior pages centred on `current_page`, with ellipsis markers
    /// covering the gaps.
    pub fn page_numbers(total_pages: u64, current_page: u64) -> Vec<PageLabel> {
        if total_pages <= MAX_UNCOMPRESSED_PAGES {
            return (1..=total_pages).map(PageLabel::Number).collect();
        }

        let current = current_page.clamp(1, total_pages);
        let (start, end) = if current <= 3 {
            (2, 4)
        } else if current >= total_pages - 2 {
            (total_pages - 3, total_pages - 1)
        } else {
            (current - 1, current + 1)
        };

        let mut labels = Vec::with_capacity(7);
        labels.push(PageLabel::Number(1));
        if start > 2 {
            labels.push(PageLabel::Ellipsis);
        }
        for page in start..=end {
            labels.push(PageLabel::Number(page));
        }
        if end < total_pages - 1 {
            labels.push(PageLabel::Ellipsis);
        }
        labels.push(PageLabel::Number(total_pages));
        labels
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
