//! Request tagging for page fetches.

use log::debug;

/// Why a page was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOrigin {
    /// The user asked for this page.
    Navigation,
    /// An auto-fill sweep needs this page.
    AutoFill,
    /// A finished sweep returns the view to the first page.
    Rewind,
}

/// A page fetch the driver must perform.
///
/// The ticket identifies the request; a response is only applied while its
/// ticket is the most recently issued one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page index to fetch.
    pub index: usize,
    /// Page size to request.
    pub page_size: usize,
    /// Monotonic request tag.
    pub ticket: u64,
    /// Why the page was requested.
    pub origin: RequestOrigin,
}

/// Hands out tickets and remembers the single outstanding request.
#[derive(Debug, Default)]
pub struct RequestTracker {
    next_ticket: u64,
    outstanding: Option<PageRequest>,
}

impl RequestTracker {
    /// Creates a tracker with nothing outstanding.
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a new request, superseding any outstanding one.
    pub fn issue(&mut self, index: usize, page_size: usize, origin: RequestOrigin) -> PageRequest {
        self.next_ticket += 1;
        let request = PageRequest {
            index,
            page_size,
            ticket: self.next_ticket,
            origin,
        };
        if let Some(previous) = self.outstanding.replace(request) {
            debug!(
                "request #{} for page {} superseded by #{} for page {}",
                previous.ticket, previous.index, request.ticket, request.index
            );
        }
        request
    }

    /// Returns the outstanding request, if any.
    pub fn outstanding(&self) -> Option<&PageRequest> {
        self.outstanding.as_ref()
    }

    /// Settles the outstanding request if `ticket` matches it.
    ///
    /// When `index` is given it must match the requested page as well.
    /// Returns `None` for stale or mismatched responses, which leaves the
    /// outstanding request in place.
    pub fn settle(&mut self, ticket: u64, index: Option<usize>) -> Option<PageRequest> {
        let request = self.outstanding?;
        if request.ticket != ticket {
            return None;
        }
        if index.is_some_and(|index| index != request.index) {
            return None;
        }
        self.outstanding = None;
        Some(request)
    }

    /// Drops the outstanding request if it has the given origin.
    ///
    /// Returns `true` if a request was dropped; its response will be treated
    /// as stale.
    pub fn invalidate(&mut self, origin: RequestOrigin) -> bool {
        match self.outstanding {
            Some(request) if request.origin == origin => {
                debug!("invalidating request #{} for page {}", request.ticket, request.index);
                self.outstanding = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tickets_increase() {
        let mut tracker = RequestTracker::new();
        let a = tracker.issue(1, 12, RequestOrigin::Navigation);
        let b = tracker.issue(2, 12, RequestOrigin::Navigation);
        assert!(b.ticket > a.ticket);
        assert_eq!(tracker.outstanding(), Some(&b));
    }

    #[test]
    fn test_superseded_response_is_rejected() {
        let mut tracker = RequestTracker::new();
        let old = tracker.issue(2, 12, RequestOrigin::Navigation);
        let new = tracker.issue(3, 12, RequestOrigin::Navigation);

        assert_eq!(tracker.settle(old.ticket, Some(2)), None);
        assert_eq!(tracker.settle(new.ticket, Some(3)), Some(new));
        assert_eq!(tracker.outstanding(), None);
    }

    #[test]
    fn test_mismatched_index_is_rejected() {
        let mut tracker = RequestTracker::new();
        let request = tracker.issue(2, 12, RequestOrigin::AutoFill);
        assert_eq!(tracker.settle(request.ticket, Some(7)), None);
        assert_eq!(tracker.outstanding(), Some(&request));
        assert_eq!(tracker.settle(request.ticket, None), Some(request));
    }

    #[test]
    fn test_invalidate_by_origin() {
        let mut tracker = RequestTracker::new();
        tracker.issue(2, 12, RequestOrigin::Navigation);
        assert!(!tracker.invalidate(RequestOrigin::AutoFill));

        let fill = tracker.issue(3, 12, RequestOrigin::AutoFill);
        assert!(tracker.invalidate(RequestOrigin::AutoFill));
        assert_eq!(tracker.settle(fill.ticket, Some(3)), None);
    }
}
