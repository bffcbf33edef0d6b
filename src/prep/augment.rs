use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::data::model::LabeledSample;

/// Emit every sample followed by one twin carrying the same label, with
/// independent N(0, `noise_std`) noise added to each feature.
pub fn augment(samples: &[LabeledSample], noise_std: f64, seed: u64) -> Vec<LabeledSample> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut out = Vec::with_capacity(samples.len() * 2);

    for sample in samples {
        let jittered = sample
            .features
            .iter()
            .map(|&v| v + gauss(&mut rng, 0.0, noise_std))
            .collect();
        out.push(sample.clone());
        out.push(LabeledSample {
            features: jittered,
            ..sample.clone()
        });
    }
    out
}

/// Box-Muller transform for a normal draw.
pub fn gauss<R: Rng>(rng: &mut R, mean: f64, std_dev: f64) -> f64 {
    let u1: f64 = rng.gen::<f64>().max(1e-15);
    let u2: f64 = rng.gen();
    let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    mean + std_dev * z
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(source: &str, label: &str, features: Vec<f64>) -> LabeledSample {
        LabeledSample {
            source: source.to_string(),
            features,
            label: label.to_string(),
        }
    }

    #[test]
    fn one_twin_per_sample_with_same_label() {
        let input = vec![
            sample("a", "rock", vec![1.0, 2.0, 3.0]),
            sample("b", "jazz", vec![0.0, 0.0, 0.0]),
        ];
        let out = augment(&input, 0.05, 7);

        assert_eq!(out.len(), 4);
        for (i, original) in input.iter().enumerate() {
            assert_eq!(&out[2 * i], original);
            let twin = &out[2 * i + 1];
            assert_eq!(twin.label, original.label);
            assert_eq!(twin.source, original.source);
            assert_eq!(twin.features.len(), original.features.len());
            assert_ne!(twin.features, original.features);
            for (t, o) in twin.features.iter().zip(&original.features) {
                assert!((t - o).abs() < 0.5, "noise too large: {t} vs {o}");
            }
        }
    }

    #[test]
    fn same_seed_same_noise() {
        let input = vec![sample("a", "rock", vec![1.0; 8])];
        assert_eq!(augment(&input, 0.05, 3), augment(&input, 0.05, 3));
        assert_ne!(augment(&input, 0.05, 3), augment(&input, 0.05, 4));
    }

    #[test]
    fn noise_has_roughly_the_requested_spread() {
        let mut rng = StdRng::seed_from_u64(11);
        let draws: Vec<f64> = (0..20_000).map(|_| gauss(&mut rng, 0.0, 0.05)).collect();
        let n = draws.len() as f64;
        let mean = draws.iter().sum::<f64>() / n;
        let std = (draws.iter().map(|d| (d - mean).powi(2)).sum::<f64>() / n).sqrt();
        assert!(mean.abs() < 0.005, "mean {mean}");
        assert!((std - 0.05).abs() < 0.005, "std {std}");
    }
}
