//! Property tests for auto-fill sweeps, driving the pipeline without I/O.

use pageselect_lib::SessionConfig;
use pageselect_lib::model::{Entity, Page};
use pageselect_lib::pipeline::{Outcome, PageRequest, ReconciliationPipeline, RequestOrigin};
use proptest::prelude::*;

fn page(index: usize, size: usize, total: usize) -> Page {
    let start = ((index - 1) * size).min(total);
    let end = (index * size).min(total);
    let rows = (start + 1..=end).map(|n| Entity::new(format!("R{n}"))).collect();
    Page::new(index, size, total, rows)
}

fn serve(pipeline: &mut ReconciliationPipeline, request: PageRequest, total: usize) -> Outcome {
    pipeline.on_page_loaded(request.ticket, page(request.index, request.page_size, total))
}

/// Loads page `start`, sets `target`, then serves auto-fill requests until the
/// sweep stops. Returns the selection size after each served page.
fn sweep(total: usize, size: usize, start: usize, target: i64) -> (ReconciliationPipeline, Vec<usize>) {
    let config = SessionConfig::default()
        .with_page_size(size)
        .with_rewind_after_sweep(false);
    let mut pipeline = ReconciliationPipeline::new(config);
    let request = pipeline.request_page(start).unwrap();
    serve(&mut pipeline, request, total);

    let mut sizes = vec![pipeline.selection().len()];
    let mut next = pipeline.on_target_count_changed(target);
    sizes.push(pipeline.selection().len());

    while let Some(request) = next {
        assert_eq!(request.origin, RequestOrigin::AutoFill);
        next = serve(&mut pipeline, request, total).next();
        sizes.push(pipeline.selection().len());
    }
    (pipeline, sizes)
}

proptest! {
    #[test]
    fn sweep_is_monotonic_and_capped(
        total in 0usize..120,
        size in 1usize..20,
        target in 0i64..150,
    ) {
        let (pipeline, sizes) = sweep(total, size, 1, target);

        for pair in sizes.windows(2) {
            prop_assert!(pair[0] <= pair[1]);
        }
        let target = target as usize;
        prop_assert!(pipeline.selection().len() <= target);
        prop_assert_eq!(pipeline.selection().len(), target.min(total));
        prop_assert!(!pipeline.target().auto_fill_pending);
    }

    #[test]
    fn sweep_exhausts_when_target_exceeds_total(total in 1usize..100, size in 1usize..20, extra in 1i64..50) {
        let target = total as i64 + extra;
        let (pipeline, _) = sweep(total, size, 1, target);
        prop_assert_eq!(pipeline.selection().len(), total);
        prop_assert!(!pipeline.target().auto_fill_pending);
    }

    #[test]
    fn sweep_never_duplicates(total in 1usize..80, size in 1usize..15, target in 1i64..100, manual in prop::collection::vec(0usize..15, 0..5)) {
        let config = SessionConfig::default().with_page_size(size).with_rewind_after_sweep(false);
        let mut pipeline = ReconciliationPipeline::new(config);
        let request = pipeline.request_page(1).unwrap();
        serve(&mut pipeline, request, total);

        // Pre-select a few rows of page 1 by hand.
        let visible: Vec<Entity> = pipeline.current_page().unwrap().entities().to_vec();
        let picked: Vec<Entity> = manual.iter().filter_map(|i| visible.get(*i).cloned()).collect();
        pipeline.on_manual_selection_change(picked).unwrap();
        let before = pipeline.selection().len();

        let mut next = pipeline.on_target_count_changed(target);
        while let Some(request) = next {
            next = serve(&mut pipeline, request, total).next();
        }

        let keys: std::collections::HashSet<&str> = pipeline.selection().keys().collect();
        prop_assert_eq!(keys.len(), pipeline.selection().len());
        prop_assert!(pipeline.selection().len() <= (target as usize).max(before));
    }
}

#[test]
fn scenario_pages_consumed_for_large_target() {
    let (pipeline, sizes) = sweep(50, 12, 1, 100);
    // Page 1 load, target set on page 1, then pages 2 to 5.
    assert_eq!(sizes, vec![0, 12, 24, 36, 48, 50]);
    assert_eq!(pipeline.current_page().unwrap().index(), 5);
}

#[test]
fn scenario_two_pages_for_target_twenty() {
    let (pipeline, sizes) = sweep(50, 12, 1, 20);
    assert_eq!(sizes, vec![0, 12, 20]);
    assert!(pipeline.outstanding().is_none());
}
