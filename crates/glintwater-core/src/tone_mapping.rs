//! Tone mapping configuration.

use serde::{Deserialize, Serialize};

use crate::error::{GlintwaterError, Result};

/// Operator compressing unbounded linear radiance into [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ToneMappingOperator {
    /// Radiance passes through unchanged (clamped at quantization).
    None,
    /// Exposure scale only.
    Linear,
    /// `x / (1 + x)` per channel.
    Reinhard,
    /// Fitted ACES filmic curve.
    #[default]
    AcesFilmic,
}

/// Transfer function applied after tone mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputEncoding {
    /// No transfer function.
    Linear,
    /// Piecewise sRGB transfer function.
    #[default]
    Srgb,
}

/// Tone mapping configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToneMappingConfig {
    /// Tone mapping operator (default ACES filmic).
    pub operator: ToneMappingOperator,
    /// Exposure multiplier (default 1.0).
    pub exposure: f32,
    /// Output encoding (default sRGB).
    pub encoding: OutputEncoding,
}

impl Default for ToneMappingConfig {
    fn default() -> Self {
        Self {
            operator: ToneMappingOperator::AcesFilmic,
            exposure: 1.0,
            encoding: OutputEncoding::Srgb,
        }
    }
}

impl ToneMappingConfig {
    /// Creates a new tone mapping configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the operator.
    pub fn with_operator(mut self, operator: ToneMappingOperator) -> Self {
        self.operator = operator;
        self
    }

    /// Sets the exposure value.
    pub fn with_exposure(mut self, exposure: f32) -> Self {
        self.exposure = exposure;
        self
    }

    /// Sets the output encoding.
    pub fn with_encoding(mut self, encoding: OutputEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Rejects a negative or non-finite exposure.
    pub fn validate(&self) -> Result<()> {
        if !self.exposure.is_finite() || self.exposure < 0.0 {
            return Err(GlintwaterError::InvalidConfig(format!(
                "exposure {} must be finite and non-negative",
                self.exposure
            )));
        }
        Ok(())
    }
}
