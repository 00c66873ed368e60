use crate::HemoError;

/// Floating point type used throughout system
pub type Real = f64;

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, HemoError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(HemoError::NonFinite { what, value: v })
    }
}

/// Running cumulative sum of `values`, normalized by the grand total.
///
/// The last entry is 1.0 for any input with a positive total. Used for the
/// cumulative volume-fraction ordering downstream consumers rely on.
pub fn normalized_cumsum(values: &[Real]) -> Result<Vec<Real>, HemoError> {
    let total: Real = values.iter().sum();
    if total <= 0.0 {
        return Err(HemoError::InvalidArg {
            what: "normalized_cumsum requires a positive total",
        });
    }
    let mut running = 0.0;
    Ok(values
        .iter()
        .map(|v| {
            running += v;
            running / total
        })
        .collect())
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn cumsum_is_monotone_and_ends_at_one(
            values in proptest::collection::vec(0.01f64..100.0, 1..20)
        ) {
            let cum = normalized_cumsum(&values).unwrap();
            for pair in cum.windows(2) {
                prop_assert!(pair[1] >= pair[0]);
            }
            let last = *cum.last().unwrap();
            prop_assert!((last - 1.0).abs() < 1e-9);
        }
    }
}
