//! Patient-wise normalisation of inflammation tables.

use crate::error::Error;
use ndarray::{Array2, ArrayBase, ArrayD, Axis, Data, Dimension, Ix2, IxDyn};
use serde_json::Value;

/// Normalise every patient (row) of a table by that patient's maximum value.
///
/// `NaN` entries are ignored when looking for the row maximum. The division
/// is done permissively and every `NaN` it produces is replaced with `0`
/// afterwards, so rows whose maximum is `0` or `NaN` come out as zeros.
///
/// # Errors
/// Returns [`Error::Shape`] if the table is not 2-dimensional and
/// [`Error::Domain`] if it contains negative values.
pub fn patient_normalise<S, D>(table: &ArrayBase<S, D>) -> Result<Array2<f64>, Error>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    let n_dims = table.ndim();
    let table = table.view().into_dimensionality::<Ix2>().map_err(|_| {
        Error::Shape(format!(
            "inflammation array should be 2-dimensional, but has {n_dims} dimensions"
        ))
    })?;

    if table.iter().any(|&val| val < 0.0) {
        return Err(Error::Domain(
            "inflammation values should not be negative".to_string(),
        ));
    }

    let row_max = table.map_axis(Axis(1), |row| {
        row.iter()
            .copied()
            .filter(|val| !val.is_nan())
            .reduce(f64::max)
            .unwrap_or(f64::NAN)
    });

    let mut normalised = &table / &row_max.insert_axis(Axis(1));
    normalised.mapv_inplace(|val| if val.is_nan() { 0.0 } else { val });

    Ok(normalised)
}

/// Convert nested JSON arrays of numbers into an n-dimensional array.
///
/// `null` is read as `NaN`. Anything that is not an array of numbers is a
/// [`Error::Type`]; this is checked before the nesting is required to be
/// rectangular ([`Error::Shape`]).
pub fn numeric_array(value: &Value) -> Result<ArrayD<f64>, Error> {
    if !value.is_array() || !is_numeric(value) {
        return Err(Error::Type("input data should be a numeric array".to_string()));
    }

    let mut shape = Vec::new();
    let mut probe = value;
    while let Value::Array(items) = probe {
        shape.push(items.len());
        match items.first() {
            Some(first) => probe = first,
            None => break,
        }
    }

    let mut flat = Vec::with_capacity(shape.iter().product());
    flatten(value, &shape, &mut flat)?;

    Ok(ArrayD::from_shape_vec(IxDyn(&shape), flat)?)
}

fn is_numeric(value: &Value) -> bool {
    match value {
        Value::Array(items) => items.iter().all(is_numeric),
        Value::Number(_) | Value::Null => true,
        _ => false,
    }
}

fn flatten(value: &Value, shape: &[usize], flat: &mut Vec<f64>) -> Result<(), Error> {
    match (value, shape.split_first()) {
        (Value::Array(items), Some((&len, rest))) => {
            if items.len() != len {
                return Err(Error::Shape(format!(
                    "nested arrays must be rectangular, expected length {len} but found {}",
                    items.len()
                )));
            }
            items.iter().try_for_each(|item| flatten(item, rest, flat))
        }
        (Value::Number(num), None) => {
            flat.push(num.as_f64().unwrap_or(f64::NAN));
            Ok(())
        }
        (Value::Null, None) => {
            flat.push(f64::NAN);
            Ok(())
        }
        _ => Err(Error::Shape(
            "nested arrays must all have the same depth".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{Array1, Array3, array};
    use serde_json::json;

    fn normalise_json(value: &Value) -> Result<Array2<f64>, Error> {
        patient_normalise(&numeric_array(value)?)
    }

    #[test]
    fn zeros_stay_zeros() {
        let table = Array2::<f64>::zeros((3, 3));
        assert_eq!(patient_normalise(&table).unwrap(), table);
        assert_eq!(
            patient_normalise(&array![[0.0, 0.0, 0.0]]).unwrap(),
            array![[0.0, 0.0, 0.0]]
        );
    }

    #[test]
    fn ones_stay_ones() {
        let table = Array2::<f64>::ones((3, 3));
        assert_eq!(patient_normalise(&table).unwrap(), table);
    }

    #[test]
    fn rows_scaled_by_their_max() {
        let table = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]];
        let expected = array![[0.33, 0.67, 1.0], [0.67, 0.83, 1.0], [0.78, 0.89, 1.0]];
        assert_abs_diff_eq!(patient_normalise(&table).unwrap(), expected, epsilon = 1e-2);
    }

    #[test]
    fn renormalising_is_a_no_op() {
        let table = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]];
        let once = patient_normalise(&table).unwrap();
        let twice = patient_normalise(&once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn nan_ignored_for_max_and_zeroed() {
        let table = array![[f64::NAN, 2.0, 4.0], [f64::NAN, f64::NAN, f64::NAN]];
        let expected = array![[0.0, 0.5, 1.0], [0.0, 0.0, 0.0]];
        assert_eq!(patient_normalise(&table).unwrap(), expected);
    }

    #[test]
    fn negative_values_rejected() {
        let table = array![[-1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]];
        let err = patient_normalise(&table).unwrap_err();
        assert!(err.is_domain());
        assert!(err.to_string().contains("should not be negative"));
    }

    #[test]
    fn wrong_dimensions_rejected() {
        let flat = array![4.0, 5.0, 6.0];
        assert!(patient_normalise(&flat).unwrap_err().is_shape());

        let cube = Array3::<f64>::ones((2, 2, 2));
        assert!(patient_normalise(&cube).unwrap_err().is_shape());

        let dynamic = Array1::<f64>::ones(3).into_dyn();
        assert!(patient_normalise(&dynamic).unwrap_err().is_shape());
    }

    #[test]
    fn non_arrays_rejected_as_type_errors() {
        assert!(normalise_json(&json!("hello")).unwrap_err().is_type());
        assert!(normalise_json(&json!(3)).unwrap_err().is_type());
        assert!(normalise_json(&json!([[1, "x"], [2, 3]])).unwrap_err().is_type());
        assert!(normalise_json(&json!({ "observations": [1] })).unwrap_err().is_type());
    }

    #[test]
    fn json_shape_checked_after_type() {
        assert!(normalise_json(&json!([4, 5, 6])).unwrap_err().is_shape());
        assert!(normalise_json(&json!([[1, 2], [3]])).unwrap_err().is_shape());
        assert!(normalise_json(&json!([[1, 2], 3])).unwrap_err().is_shape());
        assert!(normalise_json(&json!([[-1, 2]])).unwrap_err().is_domain());
    }

    #[test]
    fn json_table_normalised() {
        let res = normalise_json(&json!([[1, 2, 4], [0, null, 5]])).unwrap();
        assert_eq!(res, array![[0.25, 0.5, 1.0], [0.0, 0.0, 1.0]]);
    }

    #[test]
    fn numeric_array_keeps_nesting() {
        let arr = numeric_array(&json!([[[1, 2]], [[3, 4]]])).unwrap();
        assert_eq!(arr.shape(), &[2, 1, 2]);
        assert_eq!(numeric_array(&json!([])).unwrap().shape(), &[0]);
    }
}
