//! Daily statistics over an inflammation table.
//!
//! Each reduction collapses the patient axis (rows) and leaves one value per
//! day (column). No validation is done here: `NaN` propagates and a table
//! without patients yields a series of `NaN`.

use ndarray::{Array1, ArrayView2, Axis};

/// Mean inflammation per day.
pub fn daily_mean(table: ArrayView2<f64>) -> Array1<f64> {
    table
        .mean_axis(Axis(0))
        .unwrap_or_else(|| undefined_series(table))
}

/// Maximum inflammation per day.
pub fn daily_max(table: ArrayView2<f64>) -> Array1<f64> {
    reduce_days(table, f64::max)
}

/// Minimum inflammation per day.
pub fn daily_min(table: ArrayView2<f64>) -> Array1<f64> {
    reduce_days(table, f64::min)
}

/// Standard deviation per day with `ddof` delta degrees of freedom
/// (`0.0` gives the population standard deviation).
///
/// A `ddof` outside `0.0..n_patients` gives a series of `NaN`.
pub fn daily_std_dev(table: ArrayView2<f64>, ddof: f64) -> Array1<f64> {
    if !(0.0..table.nrows() as f64).contains(&ddof) {
        return undefined_series(table);
    }
    table.std_axis(Axis(0), ddof)
}

fn reduce_days(table: ArrayView2<f64>, op: fn(f64, f64) -> f64) -> Array1<f64> {
    if table.nrows() == 0 {
        return undefined_series(table);
    }
    // f64::max and f64::min skip NaN, so it has to be propagated by hand.
    table.map_axis(Axis(0), |day| {
        day.iter()
            .copied()
            .reduce(|acc, val| {
                if acc.is_nan() || val.is_nan() {
                    f64::NAN
                } else {
                    op(acc, val)
                }
            })
            .unwrap_or(f64::NAN)
    })
}

fn undefined_series(table: ArrayView2<f64>) -> Array1<f64> {
    Array1::from_elem(table.ncols(), f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{Array2, array};

    #[test]
    fn zeros_give_zeros() {
        let table = Array2::<f64>::zeros((3, 2));
        let zeros = Array1::<f64>::zeros(2);
        assert_eq!(daily_mean(table.view()), zeros);
        assert_eq!(daily_max(table.view()), zeros);
        assert_eq!(daily_min(table.view()), zeros);
    }

    #[test]
    fn mean_of_integers() {
        let table = array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]];
        assert_eq!(daily_mean(table.view()), array![3.0, 4.0]);
    }

    #[test]
    fn max_and_min_per_day() {
        let table = array![[4.0, 2.0, 5.0], [1.0, 6.0, 2.0], [4.0, 1.0, 9.0]];
        assert_eq!(daily_max(table.view()), array![4.0, 6.0, 9.0]);
        assert_eq!(daily_min(table.view()), array![1.0, 1.0, 2.0]);
    }

    #[test]
    fn nan_propagates() {
        let table = array![[1.0, f64::NAN], [3.0, 4.0]];
        for series in [
            daily_mean(table.view()),
            daily_max(table.view()),
            daily_min(table.view()),
        ] {
            assert!(!series[0].is_nan());
            assert!(series[1].is_nan());
        }
    }

    #[test]
    fn no_patients_is_undefined() {
        let table = Array2::<f64>::zeros((0, 4));
        assert_eq!(daily_mean(table.view()).len(), 4);
        assert!(daily_mean(table.view()).iter().all(|val| val.is_nan()));
        assert!(daily_max(table.view()).iter().all(|val| val.is_nan()));
        assert!(daily_std_dev(table.view(), 0.0).iter().all(|val| val.is_nan()));
    }

    #[test]
    fn population_and_sample_std_dev() {
        let table = array![[1.0, 2.0], [3.0, 6.0]];
        assert_abs_diff_eq!(
            daily_std_dev(table.view(), 0.0),
            array![1.0, 2.0],
            epsilon = 1e-12
        );
        let sample = daily_std_dev(table.view(), 1.0);
        assert_abs_diff_eq!(sample, array![2f64.sqrt(), 8f64.sqrt()], epsilon = 1e-12);
        assert!(daily_std_dev(array![[1.0, 2.0]].view(), 1.0)[0].is_nan());
    }

    #[test]
    fn std_dev_with_invalid_ddof_is_undefined() {
        let table = array![[1.0, 2.0], [3.0, 4.0]];
        for ddof in [-1.0, 2.0, 5.0, f64::NAN] {
            let res = daily_std_dev(table.view(), ddof);
            assert_eq!(res.len(), 2);
            assert!(res.iter().all(|val| val.is_nan()), "ddof {ddof} gave {res}");
        }
    }
}
