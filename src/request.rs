//! Build requests.
//!
//! [`BuildRequest`] is what the planner consumes. Its [`TargetSpec`] holds
//! exactly one sizing mode, so a request can never match two branches.
//!
//! [`RawRequest`] is the loose shape callers send over the wire, with every
//! field optional. [`RawRequest::resolve`] turns it into a `BuildRequest`
//! under a [`ResolvePolicy`].
//!
//! # Example
//!
//! ```
//! use sharelayout::{BuildRequest, RawRequest, ResolvePolicy, SocialPreset, TargetSpec};
//!
//! let raw = RawRequest {
//!     preset: Some("instagramPortrait".into()),
//!     ai_background_fill: Some(true),
//!     ..RawRequest::default()
//! };
//! let request = raw.resolve(ResolvePolicy::Strict).unwrap();
//! assert_eq!(request.target, TargetSpec::Preset(SocialPreset::InstagramPortrait));
//! assert!(request.ai_background_fill);
//! ```

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

use crate::error::PlanError;
use crate::format::SocialPreset;

/// Which of the three sizing modes a request uses.
///
/// Declared in priority order: preset, then dimensions, then aspect ratio.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SizingMode {
    Preset,
    Dimensions,
    AspectRatio,
}

impl SizingMode {
    /// Caller-facing name, as used in error messages.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Preset => "preset",
            Self::Dimensions => "width & height",
            Self::AspectRatio => "aspect ratio",
        }
    }
}

/// How the target canvas is chosen.
#[derive(Clone, Debug, PartialEq)]
pub enum TargetSpec {
    /// A named entry from the preset table.
    Preset(SocialPreset),
    /// Explicit canvas size. Both values must be finite and positive.
    Dimensions { width: f64, height: f64 },
    /// `"W:H"` ratio at `base_width` (planner default when `None`).
    AspectRatio {
        ratio: String,
        base_width: Option<f64>,
    },
}

impl TargetSpec {
    pub fn mode(&self) -> SizingMode {
        match self {
            Self::Preset(_) => SizingMode::Preset,
            Self::Dimensions { .. } => SizingMode::Dimensions,
            Self::AspectRatio { .. } => SizingMode::AspectRatio,
        }
    }
}

/// A validated-shape planning request.
///
/// Values inside the target are checked by the planner, not here.
#[derive(Clone, Debug, PartialEq)]
pub struct BuildRequest {
    /// Canvas selection.
    pub target: TargetSpec,
    /// Use generative fill for padded areas instead of the predominant color.
    pub ai_background_fill: bool,
    /// Output format override for both pipelines.
    pub format: Option<String>,
    /// Quality override for both pipelines.
    pub quality: Option<String>,
}

impl BuildRequest {
    /// Request for `target` with no fill or encoding overrides.
    pub fn new(target: TargetSpec) -> Self {
        Self {
            target,
            ai_background_fill: false,
            format: None,
            quality: None,
        }
    }

    /// Size from the preset table.
    pub fn preset(preset: SocialPreset) -> Self {
        Self::new(TargetSpec::Preset(preset))
    }

    /// Explicit canvas size.
    pub fn dimensions(width: f64, height: f64) -> Self {
        Self::new(TargetSpec::Dimensions { width, height })
    }

    /// Ratio at the planner's default base width.
    pub fn aspect_ratio(ratio: impl Into<String>) -> Self {
        Self::new(TargetSpec::AspectRatio {
            ratio: ratio.into(),
            base_width: None,
        })
    }

    /// Ratio at an explicit base width.
    pub fn aspect_ratio_at(ratio: impl Into<String>, base_width: f64) -> Self {
        Self::new(TargetSpec::AspectRatio {
            ratio: ratio.into(),
            base_width: Some(base_width),
        })
    }

    /// Enable or disable generative background fill.
    pub fn ai_background_fill(mut self, enabled: bool) -> Self {
        self.ai_background_fill = enabled;
        self
    }

    /// Override the output format of both pipelines.
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Override the quality of both pipelines.
    pub fn quality(mut self, quality: impl Into<String>) -> Self {
        self.quality = Some(quality.into());
        self
    }
}

impl From<SocialPreset> for BuildRequest {
    fn from(preset: SocialPreset) -> Self {
        Self::preset(preset)
    }
}

/// What to do when a [`RawRequest`] carries more than one sizing mode.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ResolvePolicy {
    /// Reject with [`PlanError::AmbiguousTargetSpec`].
    #[default]
    Strict,
    /// Take the first mode in preset > dimensions > aspect ratio order.
    Priority,
}

/// Caller-facing request with every field optional.
///
/// Deserializes from camelCase JSON such as
/// `{"aspectRatio": "4:5", "baseWidth": 1200, "aiBackgroundFill": true}`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawRequest {
    pub preset: Option<String>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub aspect_ratio: Option<String>,
    pub base_width: Option<f64>,
    pub ai_background_fill: Option<bool>,
    pub format: Option<String>,
    pub quality: Option<String>,
}

impl RawRequest {
    /// Empty request. Resolving it fails with
    /// [`PlanError::MissingTargetSpec`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Sizing modes with at least one field set, in priority order.
    ///
    /// Empty `preset` and `aspectRatio` strings count as absent. A lone
    /// `width` or `height` counts as the dimensions mode, so it is reported
    /// as incomplete rather than silently skipped.
    pub fn provided_modes(&self) -> Vec<SizingMode> {
        let mut modes = Vec::with_capacity(3);
        if non_empty(&self.preset).is_some() {
            modes.push(SizingMode::Preset);
        }
        if self.width.is_some() || self.height.is_some() {
            modes.push(SizingMode::Dimensions);
        }
        if non_empty(&self.aspect_ratio).is_some() {
            modes.push(SizingMode::AspectRatio);
        }
        modes
    }

    fn has_both_dimensions(&self) -> bool {
        self.width.is_some() && self.height.is_some()
    }

    /// Pick the sizing mode and build a typed request.
    pub fn resolve(&self, policy: ResolvePolicy) -> Result<BuildRequest, PlanError> {
        let modes = self.provided_modes();
        let mode = match (policy, modes.as_slice()) {
            (_, []) => return Err(PlanError::MissingTargetSpec),
            (ResolvePolicy::Strict, [mode]) => *mode,
            // A half-specified pair only wins when nothing else was given.
            (ResolvePolicy::Priority, _) => modes
                .iter()
                .copied()
                .find(|&m| m != SizingMode::Dimensions || self.has_both_dimensions())
                .unwrap_or(SizingMode::Dimensions),
            (ResolvePolicy::Strict, _) => {
                let names: Vec<&str> = modes.iter().map(|m| m.as_str()).collect();
                tracing::debug!(modes = ?modes, "rejecting ambiguous request");
                return Err(PlanError::AmbiguousTargetSpec(names.join(", ")));
            }
        };

        Ok(BuildRequest {
            target: self.target_for(mode)?,
            ai_background_fill: self.ai_background_fill.unwrap_or(false),
            format: self.format.clone(),
            quality: self.quality.clone(),
        })
    }

    fn target_for(&self, mode: SizingMode) -> Result<TargetSpec, PlanError> {
        match mode {
            SizingMode::Preset => match non_empty(&self.preset) {
                Some(key) => Ok(TargetSpec::Preset(key.parse()?)),
                None => Err(PlanError::MissingTargetSpec),
            },
            SizingMode::Dimensions => match (self.width, self.height) {
                (Some(width), Some(height)) => Ok(TargetSpec::Dimensions { width, height }),
                (width, height) => Err(PlanError::InvalidDimensions(format!(
                    "width={}, height={}",
                    describe(width),
                    describe(height)
                ))),
            },
            SizingMode::AspectRatio => match non_empty(&self.aspect_ratio) {
                Some(ratio) => Ok(TargetSpec::AspectRatio {
                    ratio: ratio.into(),
                    base_width: self.base_width,
                }),
                None => Err(PlanError::MissingTargetSpec),
            },
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn describe(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v}"),
        None => String::from("missing"),
    }
}
