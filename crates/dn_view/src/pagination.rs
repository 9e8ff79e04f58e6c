/// Pages shown on each side of the current one.
pub const WINDOW_RADIUS: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// 1-based
    pub current: u32,
    pub total_pages: u32,
    pub per_page: u32,
}

impl Pagination {
    /// Before the first load the total is unknown and only page 1 is valid.
    pub fn new(per_page: u32) -> Self {
        Self {
            current: 1,
            total_pages: 1,
            per_page,
        }
    }

    /// A backend reporting zero pages still lets page 1 be requested.
    pub fn accepts(&self, page: u32) -> bool {
        page >= 1 && page <= self.total_pages.max(1)
    }

    pub fn update(&mut self, page: u32, total_pages: u32) {
        self.total_pages = total_pages;
        self.current = page.clamp(1, total_pages.max(1));
    }

    pub fn has_previous(&self) -> bool {
        self.current > 1
    }

    pub fn has_next(&self) -> bool {
        self.current < self.total_pages
    }

    pub fn controls(&self) -> Vec<PageItem> {
        page_window(self.current, self.total_pages)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    Previous { target: u32, disabled: bool },
    Page { number: u32, active: bool },
    Ellipsis,
    Next { target: u32, disabled: bool },
}

/// Pagination controls for `current` of `total` pages.
///
/// Previous/next are always present and disabled at the boundaries. The
/// window spans [`WINDOW_RADIUS`] pages either side of `current`; the first
/// and last pages are always listed, separated from the window by an
/// ellipsis when pages are skipped. Nothing is rendered for a single page.
pub fn page_window(current: u32, total: u32) -> Vec<PageItem> {
    if total <= 1 {
        return Vec::new();
    }
    let current = current.clamp(1, total);
    let start = current.saturating_sub(WINDOW_RADIUS).max(1);
    let end = current.saturating_add(WINDOW_RADIUS).min(total);

    let mut items = vec![PageItem::Previous {
        target: current.saturating_sub(1).max(1),
        disabled: current == 1,
    }];

    if start > 1 {
        items.push(PageItem::Page { number: 1, active: false });
        if start > 2 {
            items.push(PageItem::Ellipsis);
        }
    }

    items.extend((start..=end).map(|number| PageItem::Page {
        number,
        active: number == current,
    }));

    if end < total {
        if end < total - 1 {
            items.push(PageItem::Ellipsis);
        }
        items.push(PageItem::Page { number: total, active: false });
    }

    items.push(PageItem::Next {
        target: current.saturating_add(1).min(total),
        disabled: current == total,
    });
    items
}
