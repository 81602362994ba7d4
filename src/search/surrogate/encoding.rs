//! Unit-cube encoding of mixed parameter spaces

use ndarray::{Array1, Array2};

use crate::params::{ParameterAssignment, ParameterDomain, ParameterSpace, ParameterValue};

#[derive(Debug, Clone, PartialEq)]
enum Dimension {
    /// Enumerated index scaled to [0, 1]
    Categorical { name: String, choices: Vec<String> },
    Continuous { name: String, low: f64, high: f64 },
}

/// Maps assignments to points in `[0, 1]^d` and back
///
/// Categorical dimensions become `index / (n - 1)`; decoding rounds to the
/// nearest valid index.
#[derive(Debug, Clone, PartialEq)]
pub struct SpaceEncoder {
    dims: Vec<Dimension>,
}

impl SpaceEncoder {
    pub fn new(space: &ParameterSpace) -> Self {
        let dims = space
            .iter()
            .map(|(name, domain)| match domain {
                ParameterDomain::Categorical { choices } => {
                    Dimension::Categorical { name: name.clone(), choices: choices.clone() }
                }
                ParameterDomain::Continuous { low, high } => {
                    Dimension::Continuous { name: name.clone(), low: *low, high: *high }
                }
            })
            .collect();
        Self { dims }
    }

    pub fn n_dims(&self) -> usize {
        self.dims.len()
    }

    /// Encode one assignment; missing or foreign values encode as 0
    pub fn encode(&self, assignment: &ParameterAssignment) -> Array1<f64> {
        self.dims
            .iter()
            .map(|dim| match dim {
                Dimension::Categorical { name, choices } => {
                    let idx = assignment
                        .get(name)
                        .and_then(ParameterValue::as_str)
                        .and_then(|s| choices.iter().position(|c| c == s))
                        .unwrap_or(0);
                    scale_index(idx, choices.len())
                }
                Dimension::Continuous { name, low, high } => {
                    let v = assignment.get(name).and_then(ParameterValue::as_float).unwrap_or(*low);
                    if high > low {
                        ((v - low) / (high - low)).clamp(0.0, 1.0)
                    } else {
                        0.0
                    }
                }
            })
            .collect()
    }

    /// Encode a history into an `n × d` design matrix
    pub fn encode_all<'a>(
        &self,
        assignments: impl ExactSizeIterator<Item = &'a ParameterAssignment>,
    ) -> Array2<f64> {
        let n = assignments.len();
        let mut x = Array2::zeros((n, self.n_dims()));
        for (i, a) in assignments.enumerate() {
            x.row_mut(i).assign(&self.encode(a));
        }
        x
    }

    /// Decode a point back into native values, clamping to the cube
    pub fn decode(&self, point: &[f64]) -> ParameterAssignment {
        self.dims
            .iter()
            .zip(point)
            .map(|(dim, &x)| {
                let x = x.clamp(0.0, 1.0);
                match dim {
                    Dimension::Categorical { name, choices } => {
                        let idx = nearest_index(x, choices.len());
                        (name.clone(), ParameterValue::Categorical(choices[idx].clone()))
                    }
                    Dimension::Continuous { name, low, high } => {
                        let v = (low + x * (high - low)).clamp(*low, *high);
                        (name.clone(), ParameterValue::Float(v))
                    }
                }
            })
            .collect()
    }

    /// Round categorical coordinates to the position of a valid index
    pub fn snap(&self, point: &[f64]) -> Vec<f64> {
        self.dims
            .iter()
            .zip(point)
            .map(|(dim, &x)| match dim {
                Dimension::Categorical { choices, .. } => {
                    scale_index(nearest_index(x.clamp(0.0, 1.0), choices.len()), choices.len())
                }
                Dimension::Continuous { .. } => x.clamp(0.0, 1.0),
            })
            .collect()
    }
}

fn scale_index(idx: usize, n: usize) -> f64 {
    if n <= 1 {
        0.0
    } else {
        idx as f64 / (n - 1) as f64
    }
}

fn nearest_index(x: f64, n: usize) -> usize {
    if n <= 1 {
        return 0;
    }
    ((x * (n - 1) as f64).round() as usize).min(n - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn space() -> ParameterSpace {
        ParameterSpace::new()
            .with(
                "fixpoint",
                ParameterDomain::Categorical { choices: vec!["A".into(), "B".into(), "C".into()] },
            )
            .unwrap()
            .with("alpha", ParameterDomain::Continuous { low: 2.0, high: 4.0 })
            .unwrap()
    }

    #[test]
    fn test_encode_decode() {
        let encoder = SpaceEncoder::new(&space());
        let mut a = ParameterAssignment::new();
        a.insert("fixpoint".to_string(), ParameterValue::Categorical("C".to_string()));
        a.insert("alpha".to_string(), ParameterValue::Float(3.0));

        let x = encoder.encode(&a);
        assert_eq!(x.to_vec(), vec![1.0, 0.5]);
        assert_eq!(encoder.decode(x.as_slice().unwrap()), a);
    }

    #[test]
    fn test_decode_rounds_and_clamps() {
        let encoder = SpaceEncoder::new(&space());
        let a = encoder.decode(&[0.3, 1.7]);
        assert_eq!(a["fixpoint"], ParameterValue::Categorical("B".to_string()));
        assert_eq!(a["alpha"], ParameterValue::Float(4.0));

        let a = encoder.decode(&[-0.2, 0.0]);
        assert_eq!(a["fixpoint"], ParameterValue::Categorical("A".to_string()));
    }

    #[test]
    fn test_snap() {
        let encoder = SpaceEncoder::new(&space());
        assert_eq!(encoder.snap(&[0.74, 0.33]), vec![0.5, 0.33]);
        assert_eq!(encoder.snap(&[0.76, 0.33]), vec![1.0, 0.33]);
    }

    #[test]
    fn test_single_choice_dimension() {
        let space = ParameterSpace::new()
            .with("only", ParameterDomain::Categorical { choices: vec!["x".into()] })
            .unwrap();
        let encoder = SpaceEncoder::new(&space);
        assert_eq!(encoder.decode(&[0.9])["only"], ParameterValue::Categorical("x".to_string()));
    }
}
