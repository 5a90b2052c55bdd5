//! Three ways to compute `1 + 2 + ... + n`.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SumError {
    #[error("Input n must be a non-negative integer")]
    Negative(i64),
    #[error("sum of the first {0} integers overflows i64")]
    Overflow(i64),
    #[error("recursion depth {0} exceeds the limit of {max}", max = MAX_RECURSION_DEPTH)]
    TooDeep(i64),
}

/// Largest `n` accepted by [`sum_to_n_b`]; one stack frame per step.
pub const MAX_RECURSION_DEPTH: i64 = 5_000;

fn check(n: i64) -> Result<(), SumError> {
    if n < 0 {
        return Err(SumError::Negative(n));
    }
    Ok(())
}

/// Closed form `n(n+1)/2`. O(1).
pub fn sum_to_n_a(n: i64) -> Result<i64, SumError> {
    check(n)?;
    let wide = i128::from(n) * (i128::from(n) + 1) / 2;
    i64::try_from(wide).map_err(|_| SumError::Overflow(n))
}

/// Recursion. O(n) time and O(n) stack depth, capped at [`MAX_RECURSION_DEPTH`].
pub fn sum_to_n_b(n: i64) -> Result<i64, SumError> {
    check(n)?;
    if n > MAX_RECURSION_DEPTH {
        return Err(SumError::TooDeep(n));
    }
    fn go(k: i64, n: i64) -> Result<i64, SumError> {
        if k == 0 {
            return Ok(0);
        }
        go(k - 1, n)?.checked_add(k).ok_or(SumError::Overflow(n))
    }
    go(n, n)
}

/// Lazy iteration over `1..=n`. O(n) time, O(1) memory.
pub fn sum_to_n_c(n: i64) -> Result<i64, SumError> {
    check(n)?;
    (1..=n).try_fold(0i64, |acc, k| acc.checked_add(k).ok_or(SumError::Overflow(n)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CASES: &[(i64, i64)] = &[(0, 0), (1, 1), (5, 15), (10, 55), (100, 5050)];

    #[test]
    fn formula() {
        for &(n, expected) in CASES {
            assert_eq!(sum_to_n_a(n), Ok(expected));
        }
    }

    #[test]
    fn recursion() {
        for &(n, expected) in CASES {
            assert_eq!(sum_to_n_b(n), Ok(expected));
        }
    }

    #[test]
    fn iteration() {
        for &(n, expected) in CASES {
            assert_eq!(sum_to_n_c(n), Ok(expected));
        }
    }

    #[test]
    fn rejects_negative_input() {
        assert_eq!(sum_to_n_a(-1), Err(SumError::Negative(-1)));
        assert_eq!(sum_to_n_b(-1), Err(SumError::Negative(-1)));
        assert_eq!(sum_to_n_c(-7), Err(SumError::Negative(-7)));
        assert_eq!(
            SumError::Negative(-1).to_string(),
            "Input n must be a non-negative integer"
        );
    }

    #[test]
    fn reports_overflow() {
        assert_eq!(sum_to_n_a(i64::MAX), Err(SumError::Overflow(i64::MAX)));
        // Largest n whose sum still fits in i64.
        assert_eq!(sum_to_n_a(4_294_967_295), Ok(9_223_372_034_707_292_160));
        assert_eq!(sum_to_n_a(4_294_967_296), Err(SumError::Overflow(4_294_967_296)));
    }

    #[test]
    fn recursion_stops_at_depth_limit() {
        let n = MAX_RECURSION_DEPTH;
        assert_eq!(sum_to_n_b(n), Ok(n * (n + 1) / 2));
        assert_eq!(sum_to_n_b(n + 1), Err(SumError::TooDeep(n + 1)));
        assert_eq!(sum_to_n_b(1_000_000), Err(SumError::TooDeep(1_000_000)));
        // The other two have no depth limit.
        assert_eq!(sum_to_n_a(n + 1), sum_to_n_c(n + 1));
    }
}
