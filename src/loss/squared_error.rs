pub struct SquaredError;

impl SquaredError {
    /// Scalar loss for one example: sum((predicted - expected)²).
    ///
    /// The backward pass derives its own error signal from the target
    /// vector; this exists so drivers and tests can watch the trajectory.
    pub fn loss(predicted: &[f64], expected: &[f64]) -> f64 {
        predicted
            .iter()
            .zip(expected.iter())
            .map(|(a, b)| (a - b).powi(2))
            .sum::<f64>()
    }

    /// Per-output gradient: predicted - expected
    pub fn derivative(predicted: &[f64], expected: &[f64]) -> Vec<f64> {
        predicted
            .iter()
            .zip(expected.iter())
            .map(|(a, b)| a - b)
            .collect()
    }
}
