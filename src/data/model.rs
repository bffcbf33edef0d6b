// ---------------------------------------------------------------------------
// FeatureValue – a single named scalar returned by an extractor
// ---------------------------------------------------------------------------

/// A dynamically-typed scalar, as found in mapping-shaped extraction results.
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl FeatureValue {
    /// Numeric interpretation, if any. Booleans count as 1.0 / 0.0.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FeatureValue::Float(v) => Some(*v),
            FeatureValue::Integer(i) => Some(*i as f64),
            FeatureValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Features – what an extractor hands back for one sample
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum Features {
    /// Plain numeric sequence.
    Vector(Vec<f64>),
    /// Named scalars in insertion order.
    Mapping(Vec<(String, FeatureValue)>),
}

impl From<Vec<f64>> for Features {
    fn from(v: Vec<f64>) -> Self {
        Features::Vector(v)
    }
}

// ---------------------------------------------------------------------------
// LabeledSample – one accepted sample after normalization
// ---------------------------------------------------------------------------

/// A normalized feature vector and its class label.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledSample {
    /// Source file name; augmented twins share it.
    pub source: String,
    pub features: Vec<f64>,
    pub label: String,
}

/// Why a sample was left out of the dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedSample {
    pub file_name: String,
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_interpretation() {
        assert_eq!(FeatureValue::Integer(3).as_f64(), Some(3.0));
        assert_eq!(FeatureValue::Float(0.5).as_f64(), Some(0.5));
        assert_eq!(FeatureValue::Bool(true).as_f64(), Some(1.0));
        assert_eq!(FeatureValue::String("7".into()).as_f64(), None);
        assert_eq!(FeatureValue::Null.as_f64(), None);
    }
}
