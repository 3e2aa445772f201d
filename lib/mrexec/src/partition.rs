use std::ops::Range;

/// Splits `0..len` into `workers` contiguous ranges of `ceil(len / workers)`
/// elements. The last non-empty range takes the remainder; when
/// `workers > len` the trailing ranges are empty.
pub fn chunk_ranges(len: usize, workers: usize) -> Vec<Range<usize>> {
    if workers == 0 {
        return Vec::new();
    }
    let chunk = len.div_ceil(workers);
    (0..workers)
        .map(|w| {
            let start = w.saturating_mul(chunk).min(len);
            let end = (w + 1).saturating_mul(chunk).min(len);
            start..end
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_covers(ranges: &[Range<usize>], len: usize) {
        let mut next = 0;
        for r in ranges {
            assert_eq!(r.start, next, "gap or overlap at {:?}", r);
            assert!(r.end >= r.start);
            next = r.end;
        }
        assert_eq!(next, len);
    }

    #[test]
    fn even_split() {
        let r = chunk_ranges(1024, 4);
        assert_eq!(r, vec![0..256, 256..512, 512..768, 768..1024]);
    }

    #[test]
    fn remainder_goes_last() {
        assert_eq!(chunk_ranges(10, 3), vec![0..4, 4..8, 8..10]);
    }

    #[test]
    fn more_workers_than_items() {
        let r = chunk_ranges(3, 8);
        assert_eq!(r.len(), 8);
        assert_eq!(r.iter().filter(|r| !r.is_empty()).count(), 3);
        assert_covers(&r, 3);
    }

    #[test]
    fn empty_input() {
        let r = chunk_ranges(0, 4);
        assert_eq!(r, vec![0..0; 4]);
    }

    #[test]
    fn always_covers_without_overlap() {
        for len in 0..70 {
            for workers in 1..20 {
                let r = chunk_ranges(len, workers);
                assert_eq!(r.len(), workers);
                assert_covers(&r, len);
            }
        }
    }

    #[test]
    fn zero_workers_yields_nothing() {
        assert!(chunk_ranges(5, 0).is_empty());
    }
}
