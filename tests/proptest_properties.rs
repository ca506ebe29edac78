//! Property-based tests for the list engine using proptest.

use listing::prelude::*;
use proptest::prelude::*;

// ============================================================================
// Test helpers
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
struct Row {
    id: u32,
    name: String,
    level: Option<i64>,
    active: bool,
}

impl_record!(Row, ["name"], { id, name, level, active });

const WORDS: [&str; 6] = ["alpha", "beta", "gamma", "delta", "lab", "science"];

fn row_strategy() -> impl Strategy<Value = (String, Option<i64>, bool)> {
    (
        prop::collection::vec(prop::sample::select(WORDS.to_vec()), 1..4)
            .prop_map(|words| words.join(" ")),
        prop::option::of(-5i64..5),
        any::<bool>(),
    )
}

fn rows_strategy(max: usize) -> impl Strategy<Value = Vec<Row>> {
    prop::collection::vec(row_strategy(), 0..max).prop_map(|raw| {
        raw.into_iter()
            .enumerate()
            .map(|(i, (name, level, active))| Row {
                id: i as u32,
                name,
                level,
                active,
            })
            .collect()
    })
}

fn op_strategy() -> impl Strategy<Value = FilterOp> {
    prop::sample::select(vec![
        FilterOp::Eq,
        FilterOp::Ne,
        FilterOp::Lt,
        FilterOp::Lte,
        FilterOp::Gt,
        FilterOp::Gte,
    ])
}

/// Reference semantics of a level condition: a null level only satisfies `ne`.
fn level_holds(level: Option<i64>, op: FilterOp, threshold: i64) -> bool {
    match level {
        None => op == FilterOp::Ne,
        Some(v) => match op {
            FilterOp::Eq => v == threshold,
            FilterOp::Ne => v != threshold,
            FilterOp::Lt => v < threshold,
            FilterOp::Lte => v <= threshold,
            FilterOp::Gt => v > threshold,
            FilterOp::Gte => v >= threshold,
            _ => unreachable!("strategy only yields comparison operators"),
        },
    }
}

fn everything(len: usize) -> PaginationRequest {
    PaginationRequest::offset(1, len.max(1) as i64)
}

fn ids(rows: &[Row]) -> Vec<u32> {
    rows.iter().map(|r| r.id).collect()
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    /// A record survives iff every condition holds for it.
    #[test]
    fn filter_keeps_exactly_matching_records(
        rows in rows_strategy(40),
        op in op_strategy(),
        threshold in -5i64..5,
        active in any::<bool>(),
    ) {
        let filter = FilterRequest::new()
            .and("level", op, threshold)
            .and("active", FilterOp::Eq, active);
        let result = ListProcessor::new()
            .process(&rows, &everything(rows.len()), Some(&filter), None, None)
            .unwrap();

        let expected: Vec<u32> = rows
            .iter()
            .filter(|r| level_holds(r.level, op, threshold) && r.active == active)
            .map(|r| r.id)
            .collect();
        prop_assert_eq!(ids(&result.items), expected);
    }

    /// Records tied on every sort key keep their input order.
    #[test]
    fn sort_is_stable(rows in rows_strategy(40), descending in any::<bool>()) {
        let sort = if descending {
            SortRequest::new().desc("active")
        } else {
            SortRequest::new().asc("active")
        };
        let result = ListProcessor::new()
            .process(&rows, &everything(rows.len()), None, Some(&sort), None)
            .unwrap();

        let mut expected = rows.clone();
        if descending {
            expected.sort_by(|a, b| b.active.cmp(&a.active));
        } else {
            expected.sort_by(|a, b| a.active.cmp(&b.active));
        }
        prop_assert_eq!(ids(&result.items), ids(&expected));
    }

    /// Null sort values come after all present values in both directions.
    #[test]
    fn nulls_sort_last(rows in rows_strategy(40), descending in any::<bool>()) {
        let sort = if descending {
            SortRequest::new().desc("level")
        } else {
            SortRequest::new().asc("level")
        };
        let result = ListProcessor::new()
            .process(&rows, &everything(rows.len()), None, Some(&sort), None)
            .unwrap();

        let levels: Vec<Option<i64>> = result.items.iter().map(|r| r.level).collect();
        let present = levels.iter().filter(|l| l.is_some()).count();
        prop_assert!(levels[..present].iter().all(Option::is_some));
        prop_assert!(levels[present..].iter().all(Option::is_none));
    }

    /// Concatenating every offset page reproduces the full ordered sequence.
    #[test]
    fn offset_pages_cover_everything_once(
        rows in rows_strategy(60),
        page_size in 1i64..12,
    ) {
        let processor = ListProcessor::new();
        let sort = SortRequest::new().asc("name").desc("level");
        let full = processor
            .process(&rows, &everything(rows.len()), None, Some(&sort), None)
            .unwrap();

        let first = processor
            .process(&rows, &PaginationRequest::offset(1, page_size), None, Some(&sort), None)
            .unwrap();
        let total_pages = first.pagination.total_pages().unwrap();

        let mut walked = Vec::new();
        for page in 1..=total_pages {
            let result = processor
                .process(
                    &rows,
                    &PaginationRequest::offset(page as i64, page_size),
                    None,
                    Some(&sort),
                    None,
                )
                .unwrap();
            prop_assert_eq!(result.pagination.has_more, page < total_pages);
            walked.extend(ids(&result.items));
        }
        prop_assert_eq!(walked, ids(&full.items));
    }

    /// Following next-cursor tokens reproduces the full ordered sequence.
    #[test]
    fn cursor_pages_cover_everything_once(rows in rows_strategy(60), limit in 1i64..12) {
        let processor = ListProcessor::new();
        let filter = FilterRequest::new().and("level", FilterOp::Ne, 0i64);
        let full = processor
            .process(&rows, &everything(rows.len()), Some(&filter), None, None)
            .unwrap();

        let mut walked = Vec::new();
        let mut token = String::new();
        loop {
            let page = processor
                .process(
                    &rows,
                    &PaginationRequest::cursor(token.clone(), limit),
                    Some(&filter),
                    None,
                    None,
                )
                .unwrap();
            walked.extend(ids(&page.items));
            match page.pagination.next_cursor() {
                Some(next) => token = next.to_string(),
                None => break,
            }
        }
        prop_assert_eq!(walked, ids(&full.items));
    }

    /// Adding a token never adds records that match every token.
    #[test]
    fn more_tokens_never_add_full_matches(
        rows in rows_strategy(40),
        first in prop::sample::select(WORDS.to_vec()),
        second in prop::sample::select(WORDS.to_vec()),
    ) {
        let processor = ListProcessor::new();
        let full_matches = |query: String| -> Vec<u32> {
            let search = SearchRequest::new(query);
            let result = processor
                .process(&rows, &everything(rows.len()), None, None, Some(&search))
                .unwrap();
            let mut matched: Vec<u32> = result
                .items
                .iter()
                .zip(&result.search_results)
                .filter(|(_, r)| r.score >= 1.0)
                .map(|(row, _)| row.id)
                .collect();
            matched.sort_unstable();
            matched
        };

        let broad = full_matches(first.to_string());
        let narrow = full_matches(format!("{} {}", first, second));
        prop_assert!(narrow.len() <= broad.len());
        prop_assert!(narrow.iter().all(|id| broad.contains(id)));
    }

    /// Identical inputs give identical results.
    #[test]
    fn processing_is_idempotent(
        rows in rows_strategy(40),
        query in prop::sample::select(WORDS.to_vec()),
        page_size in 0i64..8,
    ) {
        let processor = ListProcessor::new();
        let request = ListRequest::new()
            .filter(FilterRequest::new().and("level", FilterOp::Gte, -3i64))
            .search(SearchRequest::new(query))
            .paginate(PaginationRequest::offset(1, page_size));

        let once = processor.process_request(&rows, &request).unwrap();
        let twice = processor.process_request(&rows, &request).unwrap();
        prop_assert_eq!(once, twice);
    }
}
