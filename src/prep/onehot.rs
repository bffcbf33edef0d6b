use ndarray::Array2;

use crate::error::{PrepError, Result};

/// One row per id, `classes` columns, a single 1.0 at the id's position.
pub fn one_hot(ids: &[usize], classes: usize) -> Result<Array2<f64>> {
    let mut out = Array2::zeros((ids.len(), classes));
    for (row, &id) in ids.iter().enumerate() {
        if id >= classes {
            return Err(PrepError::UnknownClass { id, classes });
        }
        out[(row, id)] = 1.0;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use ndarray::{array, Axis};

    use super::*;

    #[test]
    fn each_row_has_a_single_one() {
        let m = one_hot(&[2, 0, 1, 2], 3).unwrap();
        assert_eq!(
            m,
            array![[0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]
        );
        assert!(m.sum_axis(Axis(1)).iter().all(|&s| s == 1.0));
    }

    #[test]
    fn ids_beyond_width_are_rejected() {
        assert!(matches!(
            one_hot(&[0, 3], 3),
            Err(PrepError::UnknownClass { id: 3, classes: 3 })
        ));
    }
}
