//! Page-index window for the navigation widget.
//!
//! The window reaches five pages back and up to ten pages forward, so the
//! current page sits near the left while the user is close to the start and
//! the window slides along once they page further.

/// Pages to expose in the navigation widget
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PagePlan {
    /// 1-based page indices, ascending
    pub pages: Vec<usize>,
    /// Page 1 is shown separately because the window no longer starts there
    pub show_first_pinned: bool,
    /// There are results after the current page
    pub show_next: bool,
    pub current_page: usize,
}

impl PagePlan {
    /// Every page index the widget can jump to, pinned first page included
    pub fn targets(&self) -> Vec<usize> {
        let mut targets = Vec::with_capacity(self.pages.len() + 1);
        if self.show_first_pinned {
            targets.push(1);
        }
        targets.extend(self.pages.iter().copied());
        targets
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty() && !self.show_first_pinned
    }
}

/// Compute the navigation window for `current_page`
pub fn plan(current_page: usize, total_count: usize, page_size: usize) -> PagePlan {
    let page_size = page_size.max(1);
    let total_pages = total_count.div_ceil(page_size);

    let start = current_page.saturating_sub(5).max(1);
    let end = total_pages.min(10 + current_page.saturating_sub(6));

    let pages: Vec<usize> = if start <= end {
        (start..=end).collect()
    } else {
        Vec::new()
    };

    PagePlan {
        show_first_pinned: start > 1,
        show_next: current_page * page_size < total_count,
        pages,
        current_page,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_results_yields_empty_window() {
        let plan = plan(1, 0, 10);
        assert!(plan.pages.is_empty());
        assert!(!plan.show_next);
        assert!(!plan.show_first_pinned);
        assert!(plan.is_empty());
    }

    #[test]
    fn test_first_page_of_large_result_set() {
        let plan = plan(1, 1000, 10);
        assert_eq!(plan.pages, (1..=10).collect::<Vec<_>>());
        assert!(!plan.show_first_pinned);
        assert!(plan.show_next);
    }

    #[test]
    fn test_window_slides_forward() {
        let plan = plan(7, 1000, 10);
        assert_eq!(plan.pages, (2..=11).collect::<Vec<_>>());
        assert!(plan.show_first_pinned);
        assert!(plan.show_next);
        assert_eq!(plan.targets()[0], 1);
        assert_eq!(plan.targets().len(), 11);

        let plan = super::plan(20, 1000, 10);
        assert_eq!(plan.pages, (15..=24).collect::<Vec<_>>());
    }

    #[test]
    fn test_window_near_start_is_not_pinned() {
        let plan = plan(6, 1000, 10);
        assert_eq!(plan.pages, (1..=10).collect::<Vec<_>>());
        assert!(!plan.show_first_pinned);
    }

    #[test]
    fn test_short_final_page() {
        let plan = plan(3, 23, 10);
        assert_eq!(plan.pages, vec![1, 2, 3]);
        assert!(!plan.show_next);

        let plan = super::plan(2, 23, 10);
        assert!(plan.show_next);
    }

    #[test]
    fn test_window_clamped_to_last_page() {
        let plan = plan(9, 95, 10);
        assert_eq!(plan.pages, (4..=10).collect::<Vec<_>>());
        assert!(plan.show_next);

        let plan = super::plan(10, 95, 10);
        assert!(!plan.show_next);
    }

    #[test]
    fn test_current_page_past_the_end_clamps_to_empty() {
        let plan = plan(40, 50, 10);
        assert!(plan.pages.is_empty());
        assert!(!plan.show_next);
        assert_eq!(plan.targets(), vec![1]);
    }
}
