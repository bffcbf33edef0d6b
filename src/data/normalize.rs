use super::model::Features;

/// Flatten an extraction result to plain numbers.
///
/// Mappings keep only numeric-valued entries, in insertion order.
pub fn flatten(features: Features) -> Vec<f64> {
    match features {
        Features::Vector(v) => v,
        Features::Mapping(entries) => entries.iter().filter_map(|(_, v)| v.as_f64()).collect(),
    }
}

/// Right-pad with zeros or truncate so the result has exactly `len` entries.
pub fn fit_length(mut values: Vec<f64>, len: usize) -> Vec<f64> {
    values.resize(len, 0.0);
    values
}
