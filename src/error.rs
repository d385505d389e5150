//! Planning errors.

use alloc::string::String;

use crate::format::SocialPreset;

/// Why a request could not be turned into a plan.
///
/// Every variant carries the offending input so the message can be shown to
/// a user as-is.
#[non_exhaustive]
#[derive(thiserror::Error, Clone, Debug, PartialEq)]
pub enum PlanError {
    /// No sizing mode was provided.
    #[error("provide either a preset, width & height, or an aspect ratio")]
    MissingTargetSpec,

    /// More than one sizing mode was provided under strict resolution.
    #[error("provide only one of preset, width & height, or aspect ratio (got {0})")]
    AmbiguousTargetSpec(String),

    /// Preset key is not in the table.
    #[error("unknown preset '{0}'; valid presets: {keys}", keys = SocialPreset::KEYS.join(", "))]
    UnknownPreset(String),

    /// Explicit width/height missing, non-finite, or not positive.
    #[error("invalid dimensions ({0}): width and height must both be positive finite numbers")]
    InvalidDimensions(String),

    /// Aspect ratio string does not look like `W:H` with positive integers.
    #[error("invalid aspect ratio \"{0}\": expected \"W:H\" with positive integers (e.g. 4:5)")]
    InvalidAspectRatio(String),

    /// Base width for aspect-ratio sizing is non-finite, not positive, or
    /// produces a zero or overflowing canvas.
    #[error("invalid base width {0}: must be a positive finite number yielding a non-empty canvas")]
    InvalidBaseWidth(String),

    /// Generative fill requested for a canvas below the minimum size.
    #[error(
        "AI background fill is not supported for very small dimensions ({width}x{height}, minimum {min}px per side)"
    )]
    UnsupportedFillSize { width: f64, height: f64, min: u32 },

    /// A delivery URL was requested without a required field.
    #[error("missing required '{0}'")]
    MissingAssetField(&'static str),
}
