//! Render surface contract
//!
//! A render surface draws the visible page with per-row checked state and
//! reports user intents back as [`SurfaceEvent`]s. How it draws is up to the
//! implementation.

use crate::error::FetchFailure;
use crate::model::Entity;
use crate::model::SelectionTarget;

/// A user intent reported by the render surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEvent {
    /// The user navigated to the page with this 1-based index.
    PageChangeRequested(usize),
    /// The user's checked set for the visible page after an edit.
    SelectionEdited(Vec<Entity>),
    /// The user asked for this many selected rows. Negative values count as zero.
    TargetCountChanged(i64),
    /// The user cleared the whole selection.
    ClearSelection,
}

/// One visible row.
#[derive(Debug, Clone, Copy)]
pub struct RowView<'a> {
    /// The row's entity.
    pub entity: &'a Entity,
    /// Whether the row is selected.
    pub checked: bool,
    /// 1-based position in the full dataset.
    pub position: usize,
}

/// Everything needed to draw the visible page.
#[derive(Debug, Clone)]
pub struct PageView<'a> {
    /// Visible rows in page order.
    pub rows: Vec<RowView<'a>>,
    /// 1-based index of the visible page.
    pub index: usize,
    /// Number of pages reported by the source.
    pub page_count: usize,
    /// Page size of the visible page.
    pub page_size: usize,
    /// Total rows reported by the source.
    pub total_count: usize,
    /// Selected rows across all pages.
    pub selected: usize,
    /// Current selection target.
    pub target: SelectionTarget,
    /// Index of the page being fetched, if a fetch is outstanding.
    pub loading: Option<usize>,
    /// Most recent fetch failure, if the last fetch failed.
    pub failure: Option<&'a FetchFailure>,
}

impl<'a> PageView<'a> {
    /// Returns the checked rows of the visible page, in page order.
    pub fn checked(&self) -> impl Iterator<Item = &'a Entity> {
        self.rows.iter().filter(|r| r.checked).map(|r| r.entity)
    }

    /// Returns the number of checked visible rows.
    pub fn checked_count(&self) -> usize {
        self.rows.iter().filter(|r| r.checked).count()
    }

    /// Returns `true` if every visible row is checked.
    pub fn all_checked(&self) -> bool {
        !self.rows.is_empty() && self.rows.iter().all(|r| r.checked)
    }

    /// Selection status, e.g. `Selected: 12 / 20`.
    pub fn status_line(&self) -> String {
        let mut line = format!("Selected: {} / {}", self.selected, self.target.count);
        if self.target.auto_fill_pending {
            line.push_str(" (filling)");
        }
        line
    }

    /// Pagination status, e.g. `Page 2 of 5 (rows 13-24 of 50)`.
    pub fn page_line(&self) -> String {
        match (self.rows.first(), self.rows.last()) {
            (Some(first), Some(last)) => format!(
                "Page {} of {} (rows {}-{} of {})",
                self.index, self.page_count, first.position, last.position, self.total_count
            ),
            _ => format!("Page {} of {} (no rows)", self.index, self.page_count),
        }
    }
}

/// Something that can draw the visible page.
pub trait RenderSurface {
    /// Draws the visible page.
    fn render(&mut self, view: &PageView<'_>);

    /// Draws the state before any page has been loaded.
    fn render_unloaded(&mut self, failure: Option<&FetchFailure>);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_lines() {
        let a = Entity::new("a");
        let b = Entity::new("b");
        let view = PageView {
            rows: vec![
                RowView {
                    entity: &a,
                    checked: true,
                    position: 13,
                },
                RowView {
                    entity: &b,
                    checked: false,
                    position: 14,
                },
            ],
            index: 2,
            page_count: 5,
            page_size: 12,
            total_count: 50,
            selected: 12,
            target: SelectionTarget {
                count: 20,
                auto_fill_pending: true,
            },
            loading: None,
            failure: None,
        };

        assert_eq!(view.status_line(), "Selected: 12 / 20 (filling)");
        assert_eq!(view.page_line(), "Page 2 of 5 (rows 13-14 of 50)");
        assert_eq!(view.checked_count(), 1);
        assert!(!view.all_checked());
        assert_eq!(view.checked().next(), Some(&a));
    }
}
