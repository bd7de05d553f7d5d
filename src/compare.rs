//! Element-wise comparison of two float sequences.

use std::fmt;

/// Default tolerance for [`DiffReport::within`] checks.
pub const DEFAULT_COMPARE_TOLERANCE: f64 = 1.0e-12;

/// One compared position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowDiff {
    pub index: usize,
    pub a: f64,
    pub b: f64,
    /// Absolute difference `|a - b|`.
    pub diff: f64,
}

/// Absolute differences between two sequences over their common length.
///
/// Built with [`DiffReport::between`]; rendered by `Display` as a fixed-width
/// table followed by the maximum difference.
#[derive(Debug, Clone, PartialEq)]
pub struct DiffReport {
    /// Per-position differences.
    pub rows: Vec<RowDiff>,
    /// Largest absolute difference (0 when nothing was compared, NaN once any
    /// difference is NaN).
    pub max_diff: f64,
    /// Position of `max_diff`, if anything was compared.
    pub max_index: Option<usize>,
    /// Lengths of the two inputs.
    pub len_a: usize,
    pub len_b: usize,
    /// Labels used in the rendered header.
    pub name_a: String,
    pub name_b: String,
}

impl DiffReport {
    /// Compares `a` and `b` position by position.
    pub fn between(a: &[f64], b: &[f64]) -> Self {
        Self::named(a, b, "a", "b")
    }

    /// Like [`DiffReport::between`] with custom column labels.
    pub fn named(a: &[f64], b: &[f64], name_a: &str, name_b: &str) -> Self {
        let rows: Vec<RowDiff> = a
            .iter()
            .zip(b)
            .enumerate()
            .map(|(index, (&a, &b))| RowDiff {
                index,
                a,
                b,
                diff: (a - b).abs(),
            })
            .collect();

        let mut max_diff = 0.0_f64;
        let mut max_index = None;
        for r in &rows {
            let first_nan = r.diff.is_nan() && !max_diff.is_nan();
            if max_index.is_none() || first_nan || r.diff > max_diff {
                max_diff = r.diff;
                max_index = Some(r.index);
            }
        }

        Self {
            rows,
            max_diff,
            max_index,
            len_a: a.len(),
            len_b: b.len(),
            name_a: name_a.to_string(),
            name_b: name_b.to_string(),
        }
    }

    /// True if the inputs have equal length and every difference is below
    /// `tolerance`. A NaN difference is never within tolerance.
    pub fn within(&self, tolerance: f64) -> bool {
        self.len_a == self.len_b && self.failures(tolerance).next().is_none()
    }

    /// Positions whose difference is not below `tolerance`.
    pub fn failures(&self, tolerance: f64) -> impl Iterator<Item = &RowDiff> {
        self.rows.iter().filter(move |r| !(r.diff < tolerance))
    }
}

impl fmt::Display for DiffReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const W: usize = 17;
        let rule = "=".repeat(W * 3 + 7);
        writeln!(f, "{rule}")?;
        writeln!(
            f,
            "{:>4} {:>W$} {:>W$} {:>W$}",
            "", self.name_a, self.name_b, "diff"
        )?;
        writeln!(f, "{}", "-".repeat(W * 3 + 7))?;
        for r in &self.rows {
            writeln!(
                f,
                "{:>4} {:>W$.10e} {:>W$.10e} {:>W$.10e}",
                r.index, r.a, r.b, r.diff
            )?;
        }
        writeln!(f, "{rule}")?;
        if self.len_a != self.len_b {
            writeln!(
                f,
                "length mismatch: {} has {}, {} has {}",
                self.name_a, self.len_a, self.name_b, self.len_b
            )?;
        }
        write!(f, "max difference = {:20.15e}", self.max_diff)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_difference_and_position() {
        let r = DiffReport::between(&[1.0, 2.0, 3.0], &[1.0, 2.5, 2.9]);
        assert!((r.max_diff - 0.5).abs() < 1e-15);
        assert_eq!(r.max_index, Some(1));
        assert!(!r.within(0.1));
        assert!(r.within(1.0));
        assert_eq!(r.failures(0.2).map(|d| d.index).collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn nan_difference_fails_comparison() {
        let r = DiffReport::between(&[1.0, f64::NAN, 3.0], &[1.0, 2.0, 100.0]);
        assert!(r.max_diff.is_nan());
        assert_eq!(r.max_index, Some(1));
        assert!(!r.within(DEFAULT_COMPARE_TOLERANCE));
        assert!(!r.within(f64::INFINITY));
        assert_eq!(r.failures(1.0).map(|d| d.index).collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn identical_inputs() {
        let v = [0.1, 0.2, 0.3];
        let r = DiffReport::between(&v, &v);
        assert_eq!(r.max_diff, 0.0);
        assert!(r.within(DEFAULT_COMPARE_TOLERANCE));
    }

    #[test]
    fn length_mismatch_never_within() {
        let r = DiffReport::between(&[1.0, 2.0], &[1.0]);
        assert_eq!(r.rows.len(), 1);
        assert!(!r.within(1.0));
        assert!(r.to_string().contains("length mismatch"));
    }

    #[test]
    fn empty_inputs() {
        let r = DiffReport::between(&[], &[]);
        assert_eq!(r.max_index, None);
        assert!(r.within(DEFAULT_COMPARE_TOLERANCE));
    }

    #[test]
    fn rendering_lists_every_row() {
        let r = DiffReport::named(&[1.0, 2.0], &[1.0, 2.0], "sim", "ref");
        let text = r.to_string();
        assert!(text.contains("sim"));
        assert!(text.contains("ref"));
        assert!(text.lines().last().is_some_and(|l| l.starts_with("max difference")));
        // rule, header, rule, 2 rows, rule, max line
        assert_eq!(text.lines().count(), 7);
    }
}
