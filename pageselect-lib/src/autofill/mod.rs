//! Auto-fill controller
//!
//! Decides which rows to select to reach a target selection size, first from
//! the visible page and then from pages fetched afterwards. The controller
//! only plans; the pipeline applies the plan to the selection store.

use log::debug;

use crate::model::Entity;
use crate::model::Page;
use crate::model::SelectionTarget;
use crate::selection::SelectionStore;

/// What the sweep needs after a page has been evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoFillStep {
    /// No sweep is running.
    Idle,
    /// The target is not met yet; the page with this index must be fetched.
    FetchNext(usize),
    /// The sweep ended with the target met.
    Satisfied,
    /// The sweep ended because the source has no further pages.
    Exhausted,
}

/// Rows to append to the selection and what to do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoFillPlan {
    /// Rows of the evaluated page to select, in page order.
    pub picks: Vec<Entity>,
    /// Next step of the sweep.
    pub step: AutoFillStep,
}

impl AutoFillPlan {
    /// A plan that selects nothing and fetches nothing.
    pub fn idle() -> Self {
        Self {
            picks: Vec::new(),
            step: AutoFillStep::Idle,
        }
    }
}

/// Tracks the selection target and plans auto-fill sweeps.
///
/// Plans only ever append rows that are not selected yet, and never more than
/// `target − |selection|`, so a sweep never pushes the selection past the
/// target and never removes anything.
#[derive(Debug, Clone, Default)]
pub struct AutoFillController {
    target: SelectionTarget,
}

impl AutoFillController {
    /// Creates a controller with a zero target.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current target.
    pub fn target(&self) -> SelectionTarget {
        self.target
    }

    /// Returns `true` while a sweep is waiting for another page.
    pub fn is_pending(&self) -> bool {
        self.target.auto_fill_pending
    }

    /// Ends the running sweep. The target count is kept.
    pub fn cancel(&mut self) {
        self.target.auto_fill_pending = false;
    }

    /// Sets a new target and plans the first step of a fresh sweep.
    ///
    /// Any previous sweep is abandoned. Negative targets are treated as zero
    /// and a zero target selects nothing. Rows are taken from `page` (the
    /// visible page) only; if that is not enough and the source has more
    /// pages, the plan asks for the next one. With no page loaded yet the
    /// sweep starts by asking for page 1.
    pub fn set_target(&mut self, n: i64, page: Option<&Page>, store: &SelectionStore) -> AutoFillPlan {
        self.target = SelectionTarget::from_input(n);
        if self.target.count == 0 {
            return AutoFillPlan::idle();
        }

        let Some(page) = page else {
            self.target.auto_fill_pending = true;
            return AutoFillPlan {
                picks: Vec::new(),
                step: AutoFillStep::FetchNext(1),
            };
        };

        self.fill_from(page, store)
    }

    /// Plans the selection for a newly arrived page.
    ///
    /// Returns an idle plan when no sweep is pending. The remaining count is
    /// computed against the selection as it is now, so manual edits made
    /// while the fetch was in flight are honoured.
    pub fn on_page_arrival(&mut self, page: &Page, store: &SelectionStore) -> AutoFillPlan {
        if !self.target.auto_fill_pending {
            return AutoFillPlan::idle();
        }

        if self.target.is_met(store.len()) {
            self.target.auto_fill_pending = false;
            return AutoFillPlan {
                picks: Vec::new(),
                step: AutoFillStep::Satisfied,
            };
        }

        self.fill_from(page, store)
    }

    fn fill_from(&mut self, page: &Page, store: &SelectionStore) -> AutoFillPlan {
        let remaining = self.target.remaining(store.len());
        let picks: Vec<Entity> = page
            .entities()
            .iter()
            .filter(|e| !store.contains(e.identity_key()))
            .take(remaining)
            .cloned()
            .collect();

        let selected = store.len() + picks.len();
        let step = if self.target.is_met(selected) {
            AutoFillStep::Satisfied
        } else if page.has_next() {
            AutoFillStep::FetchNext(page.index() + 1)
        } else {
            AutoFillStep::Exhausted
        };
        self.target.auto_fill_pending = matches!(step, AutoFillStep::FetchNext(_));

        debug!(
            "auto-fill on page {}: picked {} of {} needed ({:?})",
            page.index(),
            picks.len(),
            remaining,
            step
        );

        AutoFillPlan { picks, step }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(index: usize, size: usize, total: usize) -> Page {
        let start = (index - 1) * size + 1;
        let end = (index * size).min(total);
        let rows = (start..=end).map(|n| Entity::new(format!("R{n}"))).collect();
        Page::new(index, size, total, rows)
    }

    #[test]
    fn test_zero_and_negative_targets_select_nothing() {
        let mut controller = AutoFillController::new();
        let store = SelectionStore::new();
        let first = page(1, 12, 50);

        let plan = controller.set_target(0, Some(&first), &store);
        assert_eq!(plan, AutoFillPlan::idle());

        let plan = controller.set_target(-3, Some(&first), &store);
        assert_eq!(plan, AutoFillPlan::idle());
        assert_eq!(controller.target().count, 0);
        assert!(!controller.is_pending());
    }

    #[test]
    fn test_target_within_visible_page() {
        let mut controller = AutoFillController::new();
        let plan = controller.set_target(5, Some(&page(1, 12, 50)), &SelectionStore::new());
        assert_eq!(plan.picks.len(), 5);
        assert_eq!(plan.picks[0].identity_key(), "R1");
        assert_eq!(plan.step, AutoFillStep::Satisfied);
        assert!(!controller.is_pending());
    }

    #[test]
    fn test_target_beyond_visible_page_requests_next() {
        let mut controller = AutoFillController::new();
        let plan = controller.set_target(20, Some(&page(1, 12, 50)), &SelectionStore::new());
        assert_eq!(plan.picks.len(), 12);
        assert_eq!(plan.step, AutoFillStep::FetchNext(2));
        assert!(controller.is_pending());
    }

    #[test]
    fn test_target_on_last_page_exhausts() {
        let mut controller = AutoFillController::new();
        let plan = controller.set_target(20, Some(&page(5, 12, 50)), &SelectionStore::new());
        assert_eq!(plan.picks.len(), 2);
        assert_eq!(plan.step, AutoFillStep::Exhausted);
        assert!(!controller.is_pending());
    }

    #[test]
    fn test_without_page_starts_at_first_page() {
        let mut controller = AutoFillController::new();
        let plan = controller.set_target(3, None, &SelectionStore::new());
        assert!(plan.picks.is_empty());
        assert_eq!(plan.step, AutoFillStep::FetchNext(1));
        assert!(controller.is_pending());
    }

    #[test]
    fn test_already_selected_rows_are_not_counted_twice() {
        let mut store = SelectionStore::new();
        store.add([Entity::new("R13"), Entity::new("R14")]);

        let mut controller = AutoFillController::new();
        let plan = controller.set_target(16, Some(&page(1, 12, 50)), &store);
        assert_eq!(plan.step, AutoFillStep::FetchNext(2));
        store.add(plan.picks);
        assert_eq!(store.len(), 14);

        let plan = controller.on_page_arrival(&page(2, 12, 50), &store);
        let keys: Vec<&str> = plan.picks.iter().map(Entity::identity_key).collect();
        assert_eq!(keys, vec!["R15", "R16"]);
        assert_eq!(plan.step, AutoFillStep::Satisfied);
    }

    #[test]
    fn test_arrival_skips_selected_rows() {
        let mut store = SelectionStore::new();
        let mut controller = AutoFillController::new();
        store.add(controller.set_target(16, Some(&page(1, 12, 50)), &store).picks);
        store.add([Entity::new("R13")]);

        let plan = controller.on_page_arrival(&page(2, 12, 50), &store);
        let keys: Vec<&str> = plan.picks.iter().map(Entity::identity_key).collect();
        assert_eq!(keys, vec!["R14", "R15", "R16"]);
        assert_eq!(plan.step, AutoFillStep::Satisfied);
    }

    #[test]
    fn test_arrival_when_met_in_the_meantime() {
        let mut store = SelectionStore::new();
        let mut controller = AutoFillController::new();
        store.add(controller.set_target(13, Some(&page(1, 12, 50)), &store).picks);
        store.add([Entity::new("elsewhere")]);

        let plan = controller.on_page_arrival(&page(2, 12, 50), &store);
        assert_eq!(plan.step, AutoFillStep::Satisfied);
        assert!(plan.picks.is_empty());
        assert!(!controller.is_pending());
    }

    #[test]
    fn test_arrival_without_pending_is_idle() {
        let mut controller = AutoFillController::new();
        let plan = controller.on_page_arrival(&page(2, 12, 50), &SelectionStore::new());
        assert_eq!(plan.step, AutoFillStep::Idle);
    }

    #[test]
    fn test_cancel_keeps_target() {
        let mut controller = AutoFillController::new();
        controller.set_target(30, Some(&page(1, 12, 50)), &SelectionStore::new());
        controller.cancel();
        assert!(!controller.is_pending());
        assert_eq!(controller.target().count, 30);

        let plan = controller.on_page_arrival(&page(2, 12, 50), &SelectionStore::new());
        assert_eq!(plan.step, AutoFillStep::Idle);
        assert!(plan.picks.is_empty());
    }

    #[test]
    fn test_zero_page_size_exhausts() {
        let mut controller = AutoFillController::new();
        let plan = controller.set_target(3, Some(&Page::new(1, 0, 5, Vec::new())), &SelectionStore::new());
        assert_eq!(plan.step, AutoFillStep::Exhausted);
        assert!(!controller.is_pending());
    }

    #[test]
    fn test_lowering_target_cancels_sweep() {
        let mut store = SelectionStore::new();
        let mut controller = AutoFillController::new();
        store.add(controller.set_target(30, Some(&page(1, 12, 50)), &store).picks);
        assert!(controller.is_pending());

        let plan = controller.set_target(10, Some(&page(1, 12, 50)), &store);
        assert!(plan.picks.is_empty());
        assert_eq!(plan.step, AutoFillStep::Satisfied);
        assert!(!controller.is_pending());
        // Nothing is removed: 12 stays above the new target of 10.
        assert_eq!(store.len(), 12);
    }
}
