//! Requested-interval merging and renderable coverage discovery.

use inkfont_codec::CodepointInterval;

/// An inclusive requested code point range; may overlap or touch others.
pub type RequestedInterval = (u32, u32);

/// Merge unordered requests into a minimal set of disjoint ascending ranges.
///
/// A request starting at or before `previous.end + 1` extends the previous
/// range, so touching ranges collapse as well as overlapping ones.
pub fn merge_requests(requested: &[RequestedInterval]) -> Vec<RequestedInterval> {
    let mut sorted = requested.to_vec();
    sorted.sort_unstable();

    let mut merged: Vec<RequestedInterval> = Vec::with_capacity(sorted.len());
    for (start, end) in sorted {
        match merged.last_mut() {
            Some(previous) if start <= previous.1.saturating_add(1) => {
                previous.1 = previous.1.max(end);
            }
            _ => merged.push((start, end)),
        }
    }
    merged
}

/// Split merged requests into maximal runs of renderable code points.
///
/// `probe` reports whether the font stack defines a code point. Every
/// returned interval carries the running glyph count of the intervals before
/// it. A request with no renderable code points contributes nothing.
pub fn build_coverage(
    requested: &[RequestedInterval],
    mut probe: impl FnMut(u32) -> bool,
) -> Vec<CodepointInterval> {
    let mut runs: Vec<(u32, u32)> = Vec::new();
    for (start, end) in merge_requests(requested) {
        let mut run_start = start;
        for code_point in start..=end {
            if !probe(code_point) {
                if run_start < code_point {
                    runs.push((run_start, code_point - 1));
                }
                run_start = code_point + 1;
            }
        }
        if run_start <= end {
            runs.push((run_start, end));
        }
    }

    let mut glyph_offset = 0u32;
    runs.into_iter()
        .map(|(first, last)| {
            let interval = CodepointInterval { first, last, glyph_offset };
            glyph_offset += interval.count();
            interval
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::DEFAULT_INTERVALS;

    #[test]
    fn merges_unsorted_overlapping_and_touching_requests() {
        let requested = [(10, 20), (0, 5), (6, 9), (15, 30), (40, 50)];
        assert_eq!(merge_requests(&requested), vec![(0, 30), (40, 50)]);
    }

    #[test]
    fn default_intervals_collapse_to_disjoint_ranges() {
        assert_eq!(
            merge_requests(DEFAULT_INTERVALS),
            vec![
                (0x0000, 0x017F),
                (0x0300, 0x036F),
                (0x0400, 0x04FF),
                (0x2000, 0x20CF),
                (0x2190, 0x22FF),
                (0xFFFD, 0xFFFD),
            ]
        );
    }

    #[test]
    fn splits_around_missing_code_points() {
        // "A".."C" where "B" is undefined.
        let intervals = build_coverage(&[(0x41, 0x43)], |cp| cp != 0x42);
        assert_eq!(
            intervals,
            vec![
                CodepointInterval { first: 0x41, last: 0x41, glyph_offset: 0 },
                CodepointInterval { first: 0x43, last: 0x43, glyph_offset: 1 },
            ]
        );
    }

    #[test]
    fn unrenderable_request_contributes_nothing() {
        let intervals = build_coverage(&[(0x100, 0x1FF), (0x41, 0x41)], |cp| cp == 0x41);
        assert_eq!(
            intervals,
            vec![CodepointInterval { first: 0x41, last: 0x41, glyph_offset: 0 }]
        );
    }

    #[test]
    fn gap_at_request_start_is_skipped() {
        let intervals = build_coverage(&[(0, 4)], |cp| cp >= 2);
        assert_eq!(intervals, vec![CodepointInterval { first: 2, last: 4, glyph_offset: 0 }]);
    }

    #[test]
    fn glyph_offsets_are_running_totals() {
        let intervals = build_coverage(&[(0, 9), (20, 29)], |_| true);
        assert_eq!(intervals[0].glyph_offset, 0);
        assert_eq!(intervals[1].glyph_offset, 10);
        let total: u32 = intervals.iter().map(CodepointInterval::count).sum();
        assert_eq!(total, 20);
    }

    #[test]
    fn fully_covered_request_stays_whole() {
        let intervals = build_coverage(&[(0x20, 0x7E)], |_| true);
        assert_eq!(
            intervals,
            vec![CodepointInterval { first: 0x20, last: 0x7E, glyph_offset: 0 }]
        );
    }
}
