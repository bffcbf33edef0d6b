use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

use crate::error::{PrepError, Result};

/// Per-column standardization: `(x - mean) / std`, population std.
/// Constant columns get a scale of 1.0 so they map to zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Array1<f64>,
    pub scale: Array1<f64>,
}

impl StandardScaler {
    pub fn fit(x: &Array2<f64>) -> Result<Self> {
        let mean = x
            .mean_axis(Axis(0))
            .ok_or_else(|| PrepError::EmptyDataset("cannot fit scaler on zero rows".to_string()))?;
        let std = x.std_axis(Axis(0), 0.0);
        let scale = ndarray::Zip::from(&std)
            .and(&mean)
            .map_collect(|&s, &m| if s < 10.0 * f64::EPSILON * m.abs().max(1.0) { 1.0 } else { s });
        Ok(Self { mean, scale })
    }

    pub fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        if x.ncols() != self.mean.len() {
            return Err(PrepError::ShapeMismatch(format!(
                "scaler fitted on {} columns, got {}",
                self.mean.len(),
                x.ncols()
            )));
        }
        let mut out = x.to_owned();
        out -= &self.mean;
        out /= &self.scale;
        Ok(out)
    }

    pub fn fit_transform(x: &Array2<f64>) -> Result<(Self, Array2<f64>)> {
        let scaler = Self::fit(x)?;
        let scaled = scaler.transform(x)?;
        Ok((scaler, scaled))
    }
}
