//! Exact rational arithmetic for generated fraction exercises

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Mul, Sub};

/// A rational number kept in lowest terms with a positive denominator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fraction {
    num: i64,
    den: i64,
}

pub fn gcd(a: i64, b: i64) -> i64 {
    let (mut a, mut b) = (a.abs(), b.abs());
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

pub fn lcm(a: i64, b: i64) -> i64 {
    if a == 0 || b == 0 {
        return 0;
    }
    (a / gcd(a, b) * b).abs()
}

impl Fraction {
    /// `None` when the denominator is zero
    pub fn new(num: i64, den: i64) -> Option<Self> {
        (den != 0).then(|| Self::reduced(num, den))
    }

    /// Reduce to lowest terms; `den` must be non-zero
    pub(crate) fn reduced(num: i64, den: i64) -> Self {
        debug_assert!(den != 0, "zero denominator");
        let sign = if den < 0 { -1 } else { 1 };
        let g = gcd(num, den).max(1);
        Self {
            num: sign * num / g,
            den: sign * den / g,
        }
    }

    pub fn numer(self) -> i64 {
        self.num
    }

    pub fn denom(self) -> i64 {
        self.den
    }

    pub fn is_negative(self) -> bool {
        self.num < 0
    }

    /// `None` when dividing by zero
    pub fn checked_div(self, rhs: Fraction) -> Option<Fraction> {
        Fraction::new(self.num * rhs.den, self.den * rhs.num)
    }
}

impl Add for Fraction {
    type Output = Fraction;

    fn add(self, rhs: Fraction) -> Fraction {
        Fraction::reduced(self.num * rhs.den + rhs.num * self.den, self.den * rhs.den)
    }
}

impl Sub for Fraction {
    type Output = Fraction;

    fn sub(self, rhs: Fraction) -> Fraction {
        self + Fraction { num: -rhs.num, den: rhs.den }
    }
}

impl Mul for Fraction {
    type Output = Fraction;

    fn mul(self, rhs: Fraction) -> Fraction {
        Fraction::reduced(self.num * rhs.num, self.den * rhs.den)
    }
}

impl PartialOrd for Fraction {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Fraction {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.num * other.den).cmp(&(other.num * self.den))
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frac(n: i64, d: i64) -> Fraction {
        Fraction::new(n, d).unwrap()
    }

    #[test]
    fn test_normalizes_on_construction() {
        assert_eq!(frac(2, 4), frac(1, 2));
        assert_eq!(frac(3, -6).to_string(), "-1/2");
        assert_eq!(frac(0, 5).to_string(), "0/1");
    }

    #[test]
    fn test_zero_denominator_rejected() {
        assert!(Fraction::new(1, 0).is_none());
        assert!(frac(1, 2).checked_div(frac(0, 3)).is_none());
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(frac(1, 2) + frac(1, 3), frac(5, 6));
        assert_eq!(frac(1, 4) - frac(1, 2), frac(-1, 4));
        assert_eq!(frac(2, 3) * frac(3, 4), frac(1, 2));
        assert_eq!(frac(1, 2).checked_div(frac(1, 4)), Some(frac(2, 1)));
    }

    #[test]
    fn test_ordering_and_lcm() {
        assert!(frac(1, 3) < frac(1, 2));
        assert_eq!(lcm(4, 6), 12);
        assert_eq!(gcd(12, 18), 6);
    }
}
