use std::collections::BTreeMap;

use ndarray::{Array2, ArrayView1, Axis};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{PrepError, Result};

// ---------------------------------------------------------------------------
// SMOTE – synthetic minority oversampling
// ---------------------------------------------------------------------------

/// Oversamples every minority class up to the majority class count by
/// interpolating between a class member and one of its `k_neighbors`
/// nearest same-class neighbours.
#[derive(Debug, Clone, Copy)]
pub struct Smote {
    pub k_neighbors: usize,
    pub seed: u64,
}

impl Default for Smote {
    fn default() -> Self {
        Self {
            k_neighbors: 5,
            seed: 42,
        }
    }
}

impl Smote {
    /// Returns the original rows unchanged followed by the synthetic rows,
    /// grouped by ascending class id.
    ///
    /// Fails when a class that needs new samples has fewer than
    /// `k_neighbors + 1` members.
    pub fn fit_resample(&self, x: &Array2<f64>, y: &[usize]) -> Result<(Array2<f64>, Vec<usize>)> {
        if x.nrows() != y.len() {
            return Err(PrepError::ShapeMismatch(format!(
                "{} feature rows but {} labels",
                x.nrows(),
                y.len()
            )));
        }
        if x.nrows() == 0 {
            return Err(PrepError::EmptyDataset("nothing to balance".to_string()));
        }
        if self.k_neighbors == 0 {
            return Err(PrepError::InvalidParameter(
                "k_neighbors must be at least 1".to_string(),
            ));
        }

        let mut members: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for (row, &class) in y.iter().enumerate() {
            members.entry(class).or_default().push(row);
        }
        if members.len() < 2 {
            return Err(PrepError::SingleClass(members.len()));
        }
        let majority = members.values().map(Vec::len).max().unwrap_or(0);

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut synthetic: Vec<f64> = Vec::new();
        let mut synthetic_labels = Vec::new();

        for (&class, rows) in &members {
            let needed = majority - rows.len();
            if needed == 0 {
                continue;
            }
            let required = self.k_neighbors + 1;
            if rows.len() < required {
                return Err(PrepError::InsufficientNeighbors {
                    class,
                    count: rows.len(),
                    required,
                });
            }

            let neighbours = nearest_neighbours(x, rows, self.k_neighbors);
            let k = self.k_neighbors;
            for _ in 0..needed {
                let draw = rng.gen_range(0..rows.len() * k);
                let (member, nn) = (draw / k, neighbours[draw / k][draw % k]);
                let step: f64 = rng.gen();

                let base = x.row(rows[member]);
                let other = x.row(nn);
                synthetic.extend(base.iter().zip(other.iter()).map(|(b, o)| b + step * (o - b)));
                synthetic_labels.push(class);
            }
            log::debug!("class {class}: {} samples synthesized", needed);
        }

        let extra = Array2::from_shape_vec((synthetic_labels.len(), x.ncols()), synthetic)
            .map_err(|e| PrepError::ShapeMismatch(e.to_string()))?;
        let resampled = ndarray::concatenate(Axis(0), &[x.view(), extra.view()])
            .map_err(|e| PrepError::ShapeMismatch(e.to_string()))?;

        let mut labels = y.to_vec();
        labels.extend(synthetic_labels);
        Ok((resampled, labels))
    }
}

/// For each class member, the rows of its `k` nearest other members by
/// Euclidean distance (ties broken by row order).
fn nearest_neighbours(x: &Array2<f64>, rows: &[usize], k: usize) -> Vec<Vec<usize>> {
    rows.iter()
        .map(|&row| {
            let mut others: Vec<(f64, usize)> = rows
                .iter()
                .filter(|&&other| other != row)
                .map(|&other| (squared_distance(x.row(row), x.row(other)), other))
                .collect();
            others.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
            others.into_iter().take(k).map(|(_, other)| other).collect()
        })
        .collect()
}

fn squared_distance(a: ArrayView1<f64>, b: ArrayView1<f64>) -> f64 {
    a.iter().zip(b.iter()).map(|(p, q)| (p - q).powi(2)).sum()
}
