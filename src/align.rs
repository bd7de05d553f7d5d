//! Resolution of requested report times against available output times.

use log::debug;
use serde::Serialize;

/// Default absolute tolerance when comparing times.
pub const DEFAULT_TOLERANCE: f64 = 1.0e-8;

/// A requested time resolved to a row of the available times.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Station {
    /// Index into the available times.
    pub index: usize,
    /// Available time at `index`.
    pub time: f64,
}

/// A [`Station`] numbered by its position in the output sequence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CountedStation {
    /// 0-based position among the emitted stations.
    pub ordinal: usize,
    pub index: usize,
    pub time: f64,
}

/// Finds, for each requested time, the matching entry of `available`.
///
/// Both slices must be sorted ascending. A single forward cursor walks
/// `available`, so earlier entries are never re-scanned. A negative request
/// stands for the final available time. A request with no entry within
/// `tolerance` produces no station; callers detect misses by comparing
/// lengths.
///
/// # Examples
///
/// ```
/// use restab::align::{Station, align_stations};
///
/// let available = [0.0, 0.1, 0.2, 0.3, 0.4];
/// let stations = align_stations(&available, &[0.1, 0.4], 1e-8);
/// assert_eq!(
///     stations,
///     vec![Station { index: 1, time: 0.1 }, Station { index: 4, time: 0.4 }]
/// );
/// ```
pub fn align_stations(available: &[f64], requested: &[f64], tolerance: f64) -> Vec<Station> {
    let mut out = Vec::with_capacity(requested.len());
    let mut lower = 0;

    for &t in requested {
        if t < 0.0 {
            if let Some(&time) = available.last() {
                out.push(Station {
                    index: available.len() - 1,
                    time,
                });
            }
            continue;
        }

        let mut found = false;
        for (k, &a) in available.iter().enumerate().skip(lower) {
            let diff = (t - a).abs();
            if diff < tolerance || diff == 0.0 {
                out.push(Station { index: k, time: a });
                lower = k + 1;
                found = true;
                break;
            }
            if a > t {
                lower = k;
                break;
            }
        }
        if !found {
            debug!("no available time within {tolerance:e} of {t}");
        }
    }
    out
}

/// Like [`align_stations`], numbering each emitted station.
pub fn align_stations_counted(
    available: &[f64],
    requested: &[f64],
    tolerance: f64,
) -> Vec<CountedStation> {
    align_stations(available, requested, tolerance)
        .into_iter()
        .enumerate()
        .map(|(ordinal, s)| CountedStation {
            ordinal,
            index: s.index,
            time: s.time,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(stations: &[Station]) -> Vec<(usize, f64)> {
        stations.iter().map(|s| (s.index, s.time)).collect()
    }

    #[test]
    fn identity_alignment_with_zero_tolerance() {
        let r = [0.0, 0.1, 0.2, 0.30000000000000004, 0.7];
        let out = align_stations(&r, &r, 0.0);
        let expected: Vec<(usize, f64)> = r.iter().copied().enumerate().collect();
        assert_eq!(pairs(&out), expected);
    }

    #[test]
    fn forward_cursor_skips_unrequested() {
        let a = [0.0, 0.1, 0.2, 0.3, 0.4];
        let out = align_stations(&a, &[0.1, 0.4], DEFAULT_TOLERANCE);
        assert_eq!(pairs(&out), vec![(1, 0.1), (4, 0.4)]);
    }

    #[test]
    fn negative_request_means_final_time() {
        let a = [0.0, 0.5, 1.25];
        assert_eq!(pairs(&align_stations(&a, &[-1.0], DEFAULT_TOLERANCE)), vec![(2, 1.25)]);
        assert_eq!(pairs(&align_stations(&a, &[-0.001], DEFAULT_TOLERANCE)), vec![(2, 1.25)]);
    }

    #[test]
    fn sentinel_does_not_move_cursor() {
        let a = [0.0, 0.5, 1.0];
        let out = align_stations(&a, &[-1.0, 0.5], DEFAULT_TOLERANCE);
        assert_eq!(pairs(&out), vec![(2, 1.0), (1, 0.5)]);
    }

    #[test]
    fn miss_emits_nothing() {
        let a = [0.0, 0.2, 0.4];
        assert!(align_stations(&a, &[0.1], DEFAULT_TOLERANCE).is_empty());
    }

    #[test]
    fn miss_resumes_from_first_larger_time() {
        let a = [0.0, 0.2, 0.4];
        let out = align_stations(&a, &[0.1, 0.2, 0.4], DEFAULT_TOLERANCE);
        assert_eq!(pairs(&out), vec![(1, 0.2), (2, 0.4)]);
    }

    #[test]
    fn float_noise_within_tolerance() {
        let a = [
            0.0,
            0.1,
            0.2,
            0.30000000000000004,
            0.4,
            0.5,
            0.6,
            0.7,
            0.7999999999999999,
            0.8999999999999999,
            0.9999999999999999,
        ];
        let out = align_stations(&a, &[0.1, 0.1, 0.2, 0.5, 1.0], DEFAULT_TOLERANCE);
        // the repeated 0.1 finds nothing once the cursor has passed it
        assert_eq!(
            pairs(&out),
            vec![(1, 0.1), (2, 0.2), (5, 0.5), (10, 0.9999999999999999)]
        );
    }

    #[test]
    fn repeated_available_times_match_in_order() {
        let a = [0.0, 0.1, 0.15, 0.2, 0.23, 0.23, 0.23, 0.3, 0.8, 0.99];
        let r = [0.0, 0.1, 0.2, 0.3, 0.4, 0.6, 0.7, 0.8, 0.9, 1.0];
        let out = align_stations(&a, &r, DEFAULT_TOLERANCE);
        assert_eq!(pairs(&out), vec![(0, 0.0), (1, 0.1), (3, 0.2), (7, 0.3), (8, 0.8)]);
    }

    #[test]
    fn requests_past_the_end() {
        let a = [0.0, 0.5];
        let out = align_stations(&a, &[0.5, 2.0, 3.0], DEFAULT_TOLERANCE);
        assert_eq!(pairs(&out), vec![(1, 0.5)]);
    }

    #[test]
    fn empty_available() {
        assert!(align_stations(&[], &[0.0, -1.0], DEFAULT_TOLERANCE).is_empty());
    }

    #[test]
    fn counted_ordinals_are_output_positions() {
        let a = [0.0, 0.2, 0.4];
        let out = align_stations_counted(&a, &[0.0, 0.1, 0.4], DEFAULT_TOLERANCE);
        assert_eq!(
            out,
            vec![
                CountedStation {
                    ordinal: 0,
                    index: 0,
                    time: 0.0
                },
                CountedStation {
                    ordinal: 1,
                    index: 2,
                    time: 0.4
                },
            ]
        );
    }
}
