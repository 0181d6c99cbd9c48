//! Activation functions for NEAT neurons.
//!
//! Every node carries an [`Activation`] tag. The tag is a closed set mapped to
//! pure functions by [`Activation::apply`]; there is no per-node state.
//! Unknown tag names (for example from a hand-written config or an older
//! serialized genome) fall back to [`Activation::Sigmoid`] instead of failing.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Activation function tags supported by NEAT nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum Activation {
    /// Derivative of the logistic curve: `s(x) * (1 - s(x))` with `s(x) = 1 / (1 + e^-x)`
    Logistic,
    /// Hyperbolic tangent
    Tanh,
    /// f(x) = x
    Identity,
    /// 1 if x > 0 else 0
    Step,
    /// max(0, x)
    Relu,
    /// x / (1 + |x|)
    Softsign,
    /// sin(x)
    Sinusoid,
    /// e^(-x^2)
    Gaussian,
    /// (sqrt(x^2 + 1) - 1) / 2 + x
    BentIdentity,
    /// 1 if x > 0 else -1
    Bipolar,
    /// 2 / (1 + e^-x) - 1
    BipolarSigmoid,
    /// clamp(x, -1, 1)
    HardTanh,
    /// |x|
    Absolute,
    /// 1 - x
    Inverse,
    /// Scaled exponential linear unit
    Selu,
    /// Steepened sigmoid: 1 / (1 + e^(-4.9x))
    #[default]
    Sigmoid,
}

const SELU_ALPHA: f64 = 1.673_263_242_354_377_3;
const SELU_SCALE: f64 = 1.050_700_987_355_480_5;

impl Activation {
    /// All available activation functions, in tag order.
    pub const ALL: [Self; 16] = [
        Self::Logistic,
        Self::Tanh,
        Self::Identity,
        Self::Step,
        Self::Relu,
        Self::Softsign,
        Self::Sinusoid,
        Self::Gaussian,
        Self::BentIdentity,
        Self::Bipolar,
        Self::BipolarSigmoid,
        Self::HardTanh,
        Self::Absolute,
        Self::Inverse,
        Self::Selu,
        Self::Sigmoid,
    ];

    /// Draw a tag uniformly from [`Activation::ALL`].
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    /// Canonical name of the tag.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Logistic => "logistic",
            Self::Tanh => "tanh",
            Self::Identity => "identity",
            Self::Step => "step",
            Self::Relu => "relu",
            Self::Softsign => "softsign",
            Self::Sinusoid => "sinusoid",
            Self::Gaussian => "gaussian",
            Self::BentIdentity => "bent_identity",
            Self::Bipolar => "bipolar",
            Self::BipolarSigmoid => "bipolar_sigmoid",
            Self::HardTanh => "hard_tanh",
            Self::Absolute => "absolute",
            Self::Inverse => "inverse",
            Self::Selu => "selu",
            Self::Sigmoid => "sigmoid",
        }
    }

    /// Resolve a tag by name (case-insensitive), falling back to the default
    /// [`Activation::Sigmoid`] for anything unrecognised.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        let wanted = name.trim().to_ascii_lowercase();
        match Self::ALL.iter().find(|a| a.name() == wanted) {
            Some(&activation) => activation,
            None => {
                log::warn!("unknown activation `{name}`, using {}", Self::default());
                Self::default()
            }
        }
    }

    /// Apply this activation function to a summed input.
    #[inline]
    #[must_use]
    pub fn apply(self, x: f64) -> f64 {
        match self {
            Self::Logistic => {
                let fx = 1.0 / (1.0 + (-x).exp());
                fx * (1.0 - fx)
            }
            Self::Tanh => x.tanh(),
            Self::Identity => x,
            Self::Step => {
                if x > 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
            Self::Relu => {
                if x > 0.0 {
                    x
                } else {
                    0.0
                }
            }
            Self::Softsign => x / (1.0 + x.abs()),
            Self::Sinusoid => x.sin(),
            Self::Gaussian => (-(x * x)).exp(),
            Self::BentIdentity => ((x * x + 1.0).sqrt() - 1.0) / 2.0 + x,
            Self::Bipolar => {
                if x > 0.0 {
                    1.0
                } else {
                    -1.0
                }
            }
            Self::BipolarSigmoid => 2.0 / (1.0 + (-x).exp()) - 1.0,
            Self::HardTanh => x.clamp(-1.0, 1.0),
            Self::Absolute => x.abs(),
            Self::Inverse => 1.0 - x,
            Self::Selu => {
                let fx = if x > 0.0 {
                    x
                } else {
                    SELU_ALPHA * x.exp() - SELU_ALPHA
                };
                fx * SELU_SCALE
            }
            Self::Sigmoid => 1.0 / (1.0 + (-4.9 * x).exp()),
        }
    }
}

impl fmt::Display for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Activation {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_name(s))
    }
}

impl From<String> for Activation {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

impl From<Activation> for String {
    fn from(activation: Activation) -> Self {
        activation.name().to_owned()
    }
}
