//! Working numeric precision.
//!
//! Every evaluator computes in exactly one floating-point precision. At compile
//! time that is the [`Precision`] type parameter (`f32` or `f64`); at run time,
//! for configuration-driven callers, it is the [`Dtype`] tag.

use nalgebra::RealField;
use num_traits::NumCast;
use serde::{Deserialize, Serialize};

/// Runtime precision tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dtype {
    /// IEEE-754 single precision.
    #[serde(alias = "f32")]
    Float32,
    /// IEEE-754 double precision (default).
    #[default]
    #[serde(alias = "f64")]
    Float64,
}

impl Dtype {
    /// Canonical lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Dtype::Float32 => "float32",
            Dtype::Float64 => "float64",
        }
    }

    /// Storage width in bits.
    pub fn bits(self) -> u32 {
        match self {
            Dtype::Float32 => 32,
            Dtype::Float64 => 64,
        }
    }
}

impl std::str::FromStr for Dtype {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "float32" | "f32" | "single" => Ok(Dtype::Float32),
            "float64" | "f64" | "double" => Ok(Dtype::Float64),
            _ => Err(format!("unknown dtype: {}", s)),
        }
    }
}

impl std::fmt::Display for Dtype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Floating-point types an evaluator can compute in.
pub trait Precision: RealField + Copy + NumCast {
    /// Runtime tag for this precision.
    const DTYPE: Dtype;
}

impl Precision for f32 {
    const DTYPE: Dtype = Dtype::Float32;
}

impl Precision for f64 {
    const DTYPE: Dtype = Dtype::Float64;
}
