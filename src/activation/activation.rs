use serde::{Serialize, Deserialize};

/// Clamp for the sigmoid exponent argument. Beyond ±36.7 the f64 quotient
/// rounds to exactly 0 or 1; clamping keeps extreme accumulators saturating
/// strictly inside (0, 1) with a nonzero derivative.
const SIGMOID_EXP_CLAMP: f64 = 36.0;

/// Per-node activation applied to the accumulated weighted input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivationFunction {
    Linear,
    Sigmoid,
    ReLU,
}

impl ActivationFunction {
    /// Element-wise activation of a raw accumulator value.
    pub fn function(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::Linear => x,
            ActivationFunction::Sigmoid => sigmoid(x),
            ActivationFunction::ReLU => if x > 0.0 { x } else { 0.0 },
        }
    }

    /// Element-wise derivative of the activation, evaluated at `x`.
    ///
    /// The caller decides which value to evaluate at: nodes pass the raw
    /// accumulator for `Sigmoid` but the *activated* output for `ReLU`.
    /// The two kinds deliberately differ in their evaluation point; see
    /// `Node::output_derivative`.
    pub fn derivative(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::Linear => 1.0,
            ActivationFunction::Sigmoid => {
                let fx = sigmoid(x);
                fx * (1.0 - fx)
            }
            ActivationFunction::ReLU => if x > 0.0 { 1.0 } else { 0.0 },
        }
    }
}

/// Logistic sigmoid with the exponent argument clamped so extreme
/// accumulators still yield a finite output in (0, 1).
fn sigmoid(x: f64) -> f64 {
    let x = x.clamp(-SIGMOID_EXP_CLAMP, SIGMOID_EXP_CLAMP);
    1.0 / (1.0 + (-x).exp())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_is_identity() {
        for x in [-1e6, -2.5, 0.0, 0.25, 1e6] {
            assert_eq!(ActivationFunction::Linear.function(x), x);
            assert_eq!(ActivationFunction::Linear.derivative(x), 1.0);
        }
    }

    #[test]
    fn relu_is_max_zero_x() {
        assert_eq!(ActivationFunction::ReLU.function(-3.0), 0.0);
        assert_eq!(ActivationFunction::ReLU.function(0.0), 0.0);
        assert_eq!(ActivationFunction::ReLU.function(2.5), 2.5);
        assert_eq!(ActivationFunction::ReLU.function(1e6), 1e6);
    }

    #[test]
    fn relu_derivative_is_zero_at_or_below_zero() {
        assert_eq!(ActivationFunction::ReLU.derivative(-1.0), 0.0);
        assert_eq!(ActivationFunction::ReLU.derivative(0.0), 0.0);
        assert_eq!(ActivationFunction::ReLU.derivative(0.5), 1.0);
    }

    #[test]
    fn sigmoid_stays_in_open_unit_interval() {
        for x in [-1e6, -750.0, -10.0, 0.0, 10.0, 750.0, 1e6] {
            let y = ActivationFunction::Sigmoid.function(x);
            assert!(y.is_finite(), "sigmoid({x}) is not finite");
            assert!(y > 0.0 && y < 1.0, "sigmoid({x}) = {y} out of (0, 1)");
        }
        assert_eq!(ActivationFunction::Sigmoid.function(0.0), 0.5);
    }

    #[test]
    fn sigmoid_derivative_matches_closed_form() {
        for x in [-3.0, -0.5, 0.0, 0.5, 3.0] {
            let s = ActivationFunction::Sigmoid.function(x);
            let d = ActivationFunction::Sigmoid.derivative(x);
            assert!((d - s * (1.0 - s)).abs() < 1e-12);
        }
        // peak value 0.25 at x = 0
        assert!((ActivationFunction::Sigmoid.derivative(0.0) - 0.25).abs() < 1e-12);
    }
}
