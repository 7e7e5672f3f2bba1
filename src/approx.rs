//! Approximate values with explicit error rates
//!
//! Every probabilistic answer in this crate is an [`Approx`]: the realized
//! value together with the false-positive and false-negative rates of the
//! process that produced it. Callers decide what to do with the error; the
//! library never rounds a probabilistic answer down to a plain `bool`.
//!
//! Rates compose under the independence law
//! `compose_rates(e1, e2) = e1 + e2 - e1 * e2`, applied componentwise to
//! `fpr` and `fnr`. Negation swaps the two rates, so double negation is an
//! involution in both the value and the rates. `compose_rates` maps
//! `[0,1] x [0,1]` into `[0,1]`, so no clamping is ever needed.

/// Combine two error rates assuming independent error events.
pub fn compose_rates(e1: f64, e2: f64) -> f64 {
    e1 + e2 - e1 * e2
}

/// A value together with the error rates of the process that produced it.
///
/// `Approx<T>` for non-boolean `T` only carries the rates; it does not
/// combine them on arithmetic. Callers that need to combine estimates use
/// [`compose_rates`] themselves. The boolean specialization gets the logical
/// connectives [`Approx::and`], [`Approx::or`] and [`Approx::not`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Approx<T> {
    value: T,
    fpr: f64,
    fnr: f64,
}

/// Approximate boolean, the result type of every predicate in this crate.
pub type ApproxBool = Approx<bool>;

impl<T> Approx<T> {
    /// Wrap a value with its false-positive and false-negative rates.
    pub fn new(value: T, fpr: f64, fnr: f64) -> Self {
        debug_assert!((0.0..=1.0).contains(&fpr), "fpr out of range: {}", fpr);
        debug_assert!((0.0..=1.0).contains(&fnr), "fnr out of range: {}", fnr);
        Approx { value, fpr, fnr }
    }

    /// Wrap a value that carries no approximation error.
    pub fn exact(value: T) -> Self {
        Approx {
            value,
            fpr: 0.0,
            fnr: 0.0,
        }
    }

    /// The realized value. Reading it is an acknowledgement that it may be
    /// wrong with the reported rates.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Consume self and return the realized value.
    pub fn into_value(self) -> T {
        self.value
    }

    /// False-positive rate of the producing process.
    pub fn fpr(&self) -> f64 {
        self.fpr
    }

    /// False-negative rate of the producing process.
    pub fn fnr(&self) -> f64 {
        self.fnr
    }

    /// Total error probability, `max(fpr, fnr)`.
    pub fn error_rate(&self) -> f64 {
        self.fpr.max(self.fnr)
    }

    /// True when both rates are exactly zero.
    pub fn is_exact(&self) -> bool {
        self.fpr == 0.0 && self.fnr == 0.0
    }

    /// Map the value, keeping the rates.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Approx<U> {
        Approx {
            value: f(self.value),
            fpr: self.fpr,
            fnr: self.fnr,
        }
    }
}

impl Approx<bool> {
    /// Logical AND with componentwise rate composition.
    pub fn and(&self, other: &Self) -> Self {
        Approx {
            value: self.value && other.value,
            fpr: compose_rates(self.fpr, other.fpr),
            fnr: compose_rates(self.fnr, other.fnr),
        }
    }

    /// Logical OR with componentwise rate composition.
    pub fn or(&self, other: &Self) -> Self {
        Approx {
            value: self.value || other.value,
            fpr: compose_rates(self.fpr, other.fpr),
            fnr: compose_rates(self.fnr, other.fnr),
        }
    }

    /// Logical negation. A false positive on the original is a false
    /// negative on the negation, so the rates swap.
    pub fn not(&self) -> Self {
        Approx {
            value: !self.value,
            fpr: self.fnr,
            fnr: self.fpr,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_rates_matches_independence_law() {
        assert_eq!(compose_rates(0.0, 0.0), 0.0);
        assert_eq!(compose_rates(1.0, 0.5), 1.0);
        let e = compose_rates(0.1, 0.2);
        assert!((e - 0.28).abs() < 1e-12);
    }

    #[test]
    fn test_and_composes_componentwise() {
        let a = Approx::new(true, 0.1, 0.01);
        let b = Approx::new(false, 0.2, 0.02);
        let c = a.and(&b);
        assert!(!c.value());
        assert!((c.fpr() - compose_rates(0.1, 0.2)).abs() < 1e-12);
        assert!((c.fnr() - compose_rates(0.01, 0.02)).abs() < 1e-12);
    }

    #[test]
    fn test_or_value() {
        let a = Approx::new(true, 0.0, 0.0);
        let b = Approx::new(false, 0.0, 0.0);
        assert!(*a.or(&b).value());
    }

    #[test]
    fn test_double_negation_is_involution() {
        let a = Approx::new(true, 0.25, 0.5);
        let back = a.not().not();
        assert_eq!(back.value(), a.value());
        assert_eq!(back.fpr(), a.fpr());
        assert_eq!(back.fnr(), a.fnr());
    }

    #[test]
    fn test_negation_swaps_rates() {
        let a = Approx::new(true, 0.25, 0.5);
        let n = a.not();
        assert_eq!(n.fpr(), 0.5);
        assert_eq!(n.fnr(), 0.25);
    }

    #[test]
    fn test_exactness() {
        assert!(Approx::exact(42u32).is_exact());
        assert!(!Approx::new(42u32, 0.1, 0.0).is_exact());
        assert_eq!(Approx::new(0u8, 0.1, 0.3).error_rate(), 0.3);
    }
}
