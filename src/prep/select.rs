use std::collections::BTreeMap;

use ndarray::{Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};

use crate::error::{PrepError, Result};

/// Keeps the `k` columns with the highest one-way ANOVA F score against the
/// class labels. Selected columns keep their original order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectKBest {
    #[serde(with = "non_finite_as_null")]
    pub scores: Vec<f64>,
    pub selected: Vec<usize>,
}

impl SelectKBest {
    /// `k` is clamped to the number of columns.
    pub fn fit(x: &Array2<f64>, y: &[usize], k: usize) -> Result<Self> {
        if x.nrows() != y.len() {
            return Err(PrepError::ShapeMismatch(format!(
                "{} feature rows but {} labels",
                x.nrows(),
                y.len()
            )));
        }
        let scores: Vec<f64> = x.columns().into_iter().map(|col| f_score(col, y)).collect();
        let k = k.min(scores.len());

        // NaN scores rank lowest; a stable ascending sort lets later columns
        // win ties when the top k are taken from the end.
        let mut order: Vec<usize> = (0..scores.len()).collect();
        order.sort_by(|&a, &b| rank_key(scores[a]).total_cmp(&rank_key(scores[b])));
        let mut selected = order.split_off(order.len() - k);
        selected.sort_unstable();

        log::debug!("selected {} of {} columns", selected.len(), scores.len());
        Ok(Self { scores, selected })
    }

    pub fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        if x.ncols() != self.scores.len() {
            return Err(PrepError::ShapeMismatch(format!(
                "selector fitted on {} columns, got {}",
                self.scores.len(),
                x.ncols()
            )));
        }
        Ok(x.select(Axis(1), &self.selected))
    }
}

/// JSON has no NaN or infinity; store them as null and read null back as NaN.
mod non_finite_as_null {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(scores: &[f64], s: S) -> Result<S::Ok, S::Error> {
        let values: Vec<Option<f64>> = scores.iter().map(|v| v.is_finite().then_some(*v)).collect();
        values.serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<f64>, D::Error> {
        let values = Vec::<Option<f64>>::deserialize(d)?;
        Ok(values.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect())
    }
}

fn rank_key(score: f64) -> f64 {
    if score.is_nan() {
        f64::MIN
    } else {
        score
    }
}

/// One-way ANOVA F statistic of a single column grouped by class.
/// Degenerate groupings (zero within- and between-class variance) give NaN.
pub fn f_score(col: ArrayView1<f64>, y: &[usize]) -> f64 {
    let mut groups: BTreeMap<usize, (usize, f64)> = BTreeMap::new();
    for (&v, &class) in col.iter().zip(y) {
        let g = groups.entry(class).or_insert((0, 0.0));
        g.0 += 1;
        g.1 += v;
    }
    let n = col.len() as f64;
    let c = groups.len() as f64;
    let grand_mean = col.sum() / n;

    let group_means: BTreeMap<usize, f64> =
        groups.iter().map(|(&cls, &(cnt, sum))| (cls, sum / cnt as f64)).collect();

    let ss_between: f64 = groups
        .iter()
        .map(|(cls, &(cnt, _))| cnt as f64 * (group_means[cls] - grand_mean).powi(2))
        .sum();
    let ss_within: f64 = col
        .iter()
        .zip(y)
        .map(|(&v, cls)| (v - group_means[cls]).powi(2))
        .sum();

    (ss_between / (c - 1.0)) / (ss_within / (n - c))
}
