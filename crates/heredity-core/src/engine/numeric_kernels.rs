//! Numeric kernels for probability accumulation.
//!
//! Marginal buckets receive one addend per hypothesis, often millions of tiny
//! products of very different magnitudes. [`ProbabilitySum`] supports plain
//! left-to-right summation, Neumaier compensated summation, and a log-domain
//! mode that keeps sums of joints far below `f64::MIN_POSITIVE` representable,
//! selected by [`Summation`].

/// Equivalence epsilon for compensated-vs-naive and parallel-vs-sequential checks.
pub const KERNEL_EQUIVALENCE_EPSILON: f64 = 1e-12;

/// Summation strategy for marginal buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Summation {
    /// Plain floating-point addition in enumeration order.
    Naive,
    /// Neumaier compensated summation.
    #[default]
    Compensated,
    /// Compensated log-sum-exp over natural-log probabilities.
    LogDomain,
}

/// Running sum of probabilities with an optional error-compensation term.
///
/// The represented value is `(sum + compensation) * exp(ln_scale)`. Linear
/// strategies keep `ln_scale` at zero; [`Summation::LogDomain`] moves it to
/// the largest log-addend seen so far.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ProbabilitySum {
    sum: f64,
    compensation: f64,
    ln_scale: f64,
}

impl ProbabilitySum {
    pub const ZERO: ProbabilitySum = ProbabilitySum {
        sum: 0.0,
        compensation: 0.0,
        ln_scale: 0.0,
    };

    #[inline]
    pub fn add(&mut self, value: f64, summation: Summation) {
        match summation {
            Summation::Naive => self.sum += value,
            Summation::Compensated => self.add_compensated(value),
            Summation::LogDomain => self.add_ln(value.ln()),
        }
    }

    /// Adds a probability given as its natural log. `-inf` adds nothing.
    #[inline]
    pub fn add_ln(&mut self, ln_value: f64) {
        if ln_value == f64::NEG_INFINITY {
            return;
        }
        if self.sum == 0.0 && self.compensation == 0.0 {
            self.sum = 1.0;
            self.ln_scale = ln_value;
            return;
        }
        if ln_value > self.ln_scale {
            let factor = (self.ln_scale - ln_value).exp();
            self.sum *= factor;
            self.compensation *= factor;
            self.ln_scale = ln_value;
        }
        self.add_compensated((ln_value - self.ln_scale).exp());
    }

    #[inline]
    fn add_compensated(&mut self, value: f64) {
        let total = self.sum + value;
        if self.sum.abs() >= value.abs() {
            self.compensation += (self.sum - total) + value;
        } else {
            self.compensation += (value - total) + self.sum;
        }
        self.sum = total;
    }

    /// Folds another partial sum into this one.
    #[inline]
    pub fn merge(&mut self, other: &ProbabilitySum, summation: Summation) {
        match summation {
            Summation::LogDomain => self.add_ln(other.ln_value()),
            _ => {
                self.add(other.sum, summation);
                if other.compensation != 0.0 {
                    self.add(other.compensation, summation);
                }
            }
        }
    }

    /// Current total. Underflows to zero for log-domain totals below the
    /// smallest subnormal; use [`Self::ln_value`] there.
    #[inline]
    pub fn value(&self) -> f64 {
        (self.sum + self.compensation) * self.ln_scale.exp()
    }

    /// Natural log of the current total, `-inf` when empty.
    #[inline]
    pub fn ln_value(&self) -> f64 {
        self.ln_scale + (self.sum + self.compensation).ln()
    }
}

/// Sums `values` with the given strategy.
pub fn sum_probabilities(values: impl IntoIterator<Item = f64>, summation: Summation) -> f64 {
    let mut acc = ProbabilitySum::ZERO;
    for value in values {
        acc.add(value, summation);
    }
    acc.value()
}

/// Scales `values` to sum to one. Returns `None` when the total is exactly zero.
pub fn normalized<const N: usize>(values: [f64; N]) -> Option<[f64; N]> {
    let total: f64 = values.iter().sum();
    if total == 0.0 {
        return None;
    }
    Some(values.map(|v| v / total))
}

/// Scales probabilities given as natural logs to sum to one. Returns `None`
/// when every entry is `-inf`.
pub fn normalized_ln<const N: usize>(ln_values: [f64; N]) -> Option<[f64; N]> {
    let max = ln_values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max == f64::NEG_INFINITY {
        return None;
    }
    normalized(ln_values.map(|v| (v - max).exp()))
}
