//! Reconciliation pipeline
//!
//! The single place through which page loads, manual row edits and target
//! changes reach the selection. The pipeline performs no I/O: it hands out
//! [`PageRequest`]s and the driver feeds responses back with the request's
//! ticket, so out-of-order and superseded responses can be discarded.

mod request;

pub use request::*;

use log::debug;
use log::info;
use log::warn;

use crate::SessionConfig;
use crate::autofill::AutoFillController;
use crate::autofill::AutoFillPlan;
use crate::autofill::AutoFillStep;
use crate::cache::PageCache;
use crate::error::Error;
use crate::error::FetchError;
use crate::error::FetchFailure;
use crate::model::Entity;
use crate::model::Page;
use crate::model::SelectionTarget;
use crate::selection::SelectionStore;
use crate::surface::PageView;
use crate::surface::RowView;

/// Result of feeding a response into the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The response was applied. `next` is the follow-up fetch, if any.
    Applied {
        /// Request the driver must perform next.
        next: Option<PageRequest>,
    },
    /// The response did not belong to the outstanding request and was dropped.
    Stale,
}

impl Outcome {
    /// Returns the follow-up request, if any.
    pub fn next(&self) -> Option<PageRequest> {
        match self {
            Self::Applied { next } => *next,
            Self::Stale => None,
        }
    }
}

/// Owns the page cache, the selection and the auto-fill state.
///
/// # Example
///
/// ```
/// use pageselect_lib::SessionConfig;
/// use pageselect_lib::model::{Entity, Page};
/// use pageselect_lib::pipeline::ReconciliationPipeline;
///
/// let mut pipeline = ReconciliationPipeline::new(SessionConfig::default().with_page_size(2));
/// let request = pipeline.request_page(1).unwrap();
/// let page = Page::new(1, 2, 3, vec![Entity::new("a"), Entity::new("b")]);
/// pipeline.on_page_loaded(request.ticket, page);
///
/// let next = pipeline.on_target_count_changed(3).unwrap();
/// assert_eq!(next.index, 2);
/// assert_eq!(pipeline.selection().len(), 2);
/// ```
#[derive(Debug)]
pub struct ReconciliationPipeline {
    config: SessionConfig,
    /// Page size for new requests; follows what the source honours.
    page_size: usize,
    cache: PageCache,
    store: SelectionStore,
    autofill: AutoFillController,
    requests: RequestTracker,
    /// Ticket of the user fetch a pending sweep continues on.
    sweep_follows: Option<u64>,
    last_failure: Option<FetchFailure>,
}

impl ReconciliationPipeline {
    /// Creates a pipeline with nothing loaded and nothing selected.
    pub fn new(config: SessionConfig) -> Self {
        Self {
            page_size: config.page_size.max(1),
            config,
            cache: PageCache::new(),
            store: SelectionStore::new(),
            autofill: AutoFillController::new(),
            requests: RequestTracker::new(),
            sweep_follows: None,
            last_failure: None,
        }
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Issues a request for the page with the given 1-based index.
    ///
    /// Once a page is loaded, indices past the last page are rejected.
    /// Navigating ends a running auto-fill sweep.
    pub fn request_page(&mut self, index: usize) -> Result<PageRequest, Error> {
        let page_count = self.cache.current().ok().map(Page::page_count);
        let out_of_range = page_count.is_some_and(|count| count > 0 && index > count);
        if index == 0 || out_of_range {
            return Err(Error::InvalidPage {
                index,
                page_count: page_count.unwrap_or(0),
            });
        }
        if self.autofill.is_pending() {
            info!("navigation to page {} ends the auto-fill sweep", index);
            self.end_sweep();
        }
        Ok(self.requests.issue(index, self.page_size, RequestOrigin::Navigation))
    }

    /// Issues a request for the page after the visible one.
    pub fn next_page(&mut self) -> Result<PageRequest, Error> {
        let index = self.cache.current()?.index() + 1;
        self.request_page(index)
    }

    /// Issues a request for the page before the visible one.
    pub fn previous_page(&mut self) -> Result<PageRequest, Error> {
        let index = self.cache.current()?.index().saturating_sub(1);
        self.request_page(index)
    }

    // =========================================================================
    // Responses
    // =========================================================================

    /// Applies a fetched page.
    ///
    /// Responses whose ticket is not the outstanding one, or whose index does
    /// not match the request, are discarded. Otherwise, if the page belongs to
    /// the running auto-fill sweep, the sweep picks rows from it first; then
    /// the visible rows' selection state is replaced and the page becomes the
    /// resident page.
    pub fn on_page_loaded(&mut self, ticket: u64, page: Page) -> Outcome {
        let Some(request) = self.requests.settle(ticket, Some(page.index())) else {
            debug!("discarding stale response for page {} (ticket #{})", page.index(), ticket);
            return Outcome::Stale;
        };
        debug!(
            "loaded page {} ({} rows, {:?} request #{})",
            page.index(),
            page.len(),
            request.origin,
            request.ticket
        );

        self.last_failure = None;
        if page.page_size() > 0 && page.page_size() != self.page_size {
            info!("source honoured page size {} instead of {}", page.page_size(), self.page_size);
            self.page_size = page.page_size();
        }

        let feeds_sweep =
            request.origin == RequestOrigin::AutoFill || self.sweep_follows == Some(request.ticket);
        self.sweep_follows = None;
        let plan = if feeds_sweep {
            self.autofill.on_page_arrival(&page, &self.store)
        } else {
            AutoFillPlan::idle()
        };
        let mut visible_selection = self.store.selected_in(&page);
        visible_selection.extend(plan.picks);
        self.store.replace_visible(&page.visible_keys(), visible_selection);
        self.cache.load(page);

        Outcome::Applied {
            next: self.follow_up(plan.step),
        }
    }

    /// Records a failed fetch.
    ///
    /// The resident page and the selection are left untouched and nothing is
    /// retried. A running sweep ends here; setting a target again starts a
    /// new one. Failures for superseded requests are discarded like stale
    /// pages.
    pub fn on_fetch_failed(&mut self, ticket: u64, error: &FetchError) -> Outcome {
        let Some(request) = self.requests.settle(ticket, None) else {
            debug!("discarding stale failure (ticket #{}): {}", ticket, error);
            return Outcome::Stale;
        };
        warn!("fetching page {} failed: {}", request.index, error);
        if self.autofill.is_pending() {
            info!("auto-fill sweep ended by the failed fetch of page {}", request.index);
            self.end_sweep();
        }
        self.last_failure = Some(FetchFailure::new(request.index, error));
        Outcome::Applied { next: None }
    }

    // =========================================================================
    // User edits
    // =========================================================================

    /// Replaces the selection state of the visible page with the user's checked set.
    ///
    /// Manual edits are not capped by the target. Entities that are not on
    /// the visible page are ignored.
    pub fn on_manual_selection_change(&mut self, new_visible_selection: Vec<Entity>) -> Result<(), Error> {
        let page = self.cache.current()?;
        let visible = page.visible_keys();

        let (on_page, off_page): (Vec<Entity>, Vec<Entity>) = new_visible_selection
            .into_iter()
            .partition(|e| visible.contains(e.identity_key()));
        if !off_page.is_empty() {
            debug!("ignoring {} edited rows not on page {}", off_page.len(), page.index());
        }

        self.store.replace_visible(&visible, on_page);
        Ok(())
    }

    /// Flips the checked state of one visible row. Returns the new state.
    pub fn toggle_row(&mut self, key: &str) -> Result<bool, Error> {
        let page = self.cache.current()?;
        let Some(entity) = page.entities().iter().find(|e| e.identity_key() == key) else {
            return Err(Error::NotVisible { key: key.to_string() });
        };

        let checked = !self.store.contains(key);
        let mut selection = self.store.selected_in(page);
        if checked {
            selection.push(entity.clone());
        } else {
            selection.retain(|e| e.identity_key() != key);
        }

        self.on_manual_selection_change(selection)?;
        Ok(checked)
    }

    /// Checks or unchecks every visible row.
    pub fn set_visible_checked(&mut self, checked: bool) -> Result<(), Error> {
        let selection = if checked {
            self.cache.current()?.entities().to_vec()
        } else {
            Vec::new()
        };
        self.on_manual_selection_change(selection)
    }

    /// Sets a new selection target and starts a sweep toward it.
    ///
    /// An outstanding auto-fill fetch from a previous target is invalidated.
    /// A user fetch that is still outstanding is kept, and the sweep continues
    /// on its page when it arrives. Returns the fetch the driver must perform
    /// next, if any.
    pub fn on_target_count_changed(&mut self, n: i64) -> Option<PageRequest> {
        self.requests.invalidate(RequestOrigin::AutoFill);
        self.sweep_follows = None;

        let page = self.cache.current().ok();
        let plan = self.autofill.set_target(n, page, &self.store);
        info!(
            "target set to {} ({} selected, {} picked from visible page)",
            self.autofill.target().count,
            self.store.len(),
            plan.picks.len()
        );

        if let Some(page) = page {
            if !plan.picks.is_empty() {
                let mut visible_selection = self.store.selected_in(page);
                visible_selection.extend(plan.picks);
                self.store.replace_visible(&page.visible_keys(), visible_selection);
            }
        }

        match self.requests.outstanding().copied() {
            Some(outstanding) => {
                if matches!(plan.step, AutoFillStep::FetchNext(_)) {
                    debug!(
                        "auto-fill continues on page {} (request #{})",
                        outstanding.index, outstanding.ticket
                    );
                    self.sweep_follows = Some(outstanding.ticket);
                }
                None
            }
            None => self.follow_up(plan.step),
        }
    }

    /// Empties the selection. The target and any running sweep are kept.
    pub fn clear_selection(&mut self) {
        info!("clearing {} selected rows", self.store.len());
        self.store.clear();
    }

    fn end_sweep(&mut self) {
        self.autofill.cancel();
        self.sweep_follows = None;
    }

    fn follow_up(&mut self, step: AutoFillStep) -> Option<PageRequest> {
        match step {
            AutoFillStep::Idle => None,
            AutoFillStep::FetchNext(index) => {
                Some(self.requests.issue(index, self.page_size, RequestOrigin::AutoFill))
            }
            AutoFillStep::Satisfied | AutoFillStep::Exhausted => {
                info!(
                    "auto-fill finished ({:?}): {} of {} selected",
                    step,
                    self.store.len(),
                    self.autofill.target().count
                );
                let off_first_page = self.cache.index().is_some_and(|index| index != 1);
                if self.config.rewind_after_sweep && off_first_page {
                    Some(self.requests.issue(1, self.page_size, RequestOrigin::Rewind))
                } else {
                    None
                }
            }
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Returns the selection.
    pub fn selection(&self) -> &SelectionStore {
        &self.store
    }

    /// Returns the selection target.
    pub fn target(&self) -> SelectionTarget {
        self.autofill.target()
    }

    /// Returns the resident page.
    pub fn current_page(&self) -> Result<&Page, Error> {
        self.cache.current()
    }

    /// Returns the outstanding request, if any.
    pub fn outstanding(&self) -> Option<&PageRequest> {
        self.requests.outstanding()
    }

    /// Returns the most recent fetch failure, cleared by the next successful load.
    pub fn last_failure(&self) -> Option<&FetchFailure> {
        self.last_failure.as_ref()
    }

    /// Returns the page size used for new requests.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Builds what a render surface needs to draw the visible page.
    pub fn view(&self) -> Result<PageView<'_>, Error> {
        let page = self.cache.current()?;
        let first_row = page.first_row();
        let rows = page
            .entities()
            .iter()
            .enumerate()
            .map(|(offset, entity)| RowView {
                entity,
                checked: self.store.contains(entity.identity_key()),
                position: first_row + offset,
            })
            .collect();

        Ok(PageView {
            rows,
            index: page.index(),
            page_count: page.page_count(),
            page_size: page.page_size(),
            total_count: page.total_count(),
            selected: self.store.len(),
            target: self.autofill.target(),
            loading: self.requests.outstanding().map(|r| r.index),
            failure: self.last_failure.as_ref(),
        })
    }
}
