//! Transform planning: dimensions, fill strategy, and the two step pipelines.
//!
//! Every plan has the same shape. The first step fixes the canvas
//! geometry and fill, the second picks the output encoding:
//!
//! ```text
//!     preview: [ geometry ] -> [ fetch_format=auto, quality=auto      ]
//!     export:  [ geometry ] -> [ fetch_format=png,  quality=auto:best ]
//! ```
//!
//! The geometry step is identical in both pipelines, so a preview always
//! shows exactly the canvas the export will produce.
//!
//! # Example
//!
//! ```
//! use sharelayout::{BuildRequest, Background, Step, build_plan};
//!
//! let plan = build_plan(&BuildRequest::aspect_ratio("4:5")).unwrap();
//! assert_eq!((plan.width, plan.height), (1080, 1350));
//!
//! let Step::Geometry(base) = &plan.export_steps[0] else { panic!() };
//! assert_eq!(base.background, Background::PredominantColor);
//! ```

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::PlanError;
use crate::format::{FormatSpec, SocialPreset};
use crate::request::{BuildRequest, RawRequest, ResolvePolicy, TargetSpec};

/// Base width for aspect-ratio requests that don't name one.
pub const DEFAULT_BASE_WIDTH: f64 = 1080.0;

/// Smallest canvas side for which generative fill is allowed.
pub const MIN_FILL_DIMENSION: u32 = 10;

// ============================================================================
// Steps
// ============================================================================

/// Resize strategy. Only padding is used: the whole source always stays
/// visible inside the canvas.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum CropMode {
    /// Fit inside the canvas and fill the remainder.
    #[default]
    Pad,
}

impl CropMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pad => "pad",
        }
    }
}

/// Framing of the source inside the canvas.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Gravity {
    /// Content-aware placement chosen by the host.
    #[default]
    Auto,
}

impl Gravity {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
        }
    }
}

/// How padded areas are filled.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Background {
    /// Flat fill with the image's predominant color.
    #[default]
    PredominantColor,
    /// AI-generated extension of the image content.
    GenerativeFill,
}

impl Background {
    /// Host parameter value.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PredominantColor => "auto:predominant",
            Self::GenerativeFill => "gen_fill",
        }
    }
}

/// Canvas size, crop, gravity, and fill.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct GeometryStep {
    pub width: u32,
    pub height: u32,
    pub crop: CropMode,
    pub gravity: Gravity,
    pub background: Background,
}

/// Output format and quality.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EncodingStep {
    pub format: String,
    pub quality: String,
}

/// One processing instruction for the image host.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Step {
    Geometry(GeometryStep),
    Encoding(EncodingStep),
}

/// Parameter value inside a [`StepMap`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum StepValue {
    Int(u32),
    Text(String),
}

impl fmt::Display for StepValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Text(v) => f.write_str(v),
        }
    }
}

impl From<u32> for StepValue {
    fn from(v: u32) -> Self {
        Self::Int(v)
    }
}

impl From<&str> for StepValue {
    fn from(v: &str) -> Self {
        Self::Text(v.into())
    }
}

/// Key → value view of a step, keyed by host parameter name.
pub type StepMap = BTreeMap<&'static str, StepValue>;

impl Step {
    /// Flatten into host parameters.
    pub fn to_map(&self) -> StepMap {
        let mut map = StepMap::new();
        match self {
            Self::Geometry(g) => {
                map.insert("width", g.width.into());
                map.insert("height", g.height.into());
                map.insert("crop", g.crop.as_str().into());
                map.insert("gravity", g.gravity.as_str().into());
                map.insert("background", g.background.as_str().into());
            }
            Self::Encoding(e) => {
                map.insert("fetch_format", e.format.as_str().into());
                map.insert("quality", e.quality.as_str().into());
            }
        }
        map
    }
}

impl Serialize for Step {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let map = self.to_map();
        let mut out = serializer.serialize_map(Some(map.len()))?;
        for (key, value) in &map {
            out.serialize_entry(key, value)?;
        }
        out.end()
    }
}

/// Planner output: the canvas and both pipelines.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformPlan {
    pub width: u32,
    pub height: u32,
    pub aspect_ratio: String,
    /// Fast pipeline; encoding deferred to the viewer by default.
    pub preview_steps: Vec<Step>,
    /// High-fidelity pipeline.
    pub export_steps: Vec<Step>,
}

impl TransformPlan {
    /// Canvas as a [`FormatSpec`].
    pub fn format_spec(&self) -> FormatSpec {
        FormatSpec::new(self.width, self.height, self.aspect_ratio.clone())
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Default output encoding for one pipeline.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EncodingDefaults {
    pub format: String,
    pub quality: String,
}

impl EncodingDefaults {
    /// Host-negotiated format and quality.
    pub fn preview() -> Self {
        Self {
            format: "auto".into(),
            quality: "auto".into(),
        }
    }

    /// PNG at the highest automatic quality tier.
    pub fn export() -> Self {
        Self {
            format: "png".into(),
            quality: "auto:best".into(),
        }
    }
}

/// Planner tunables.
///
/// Deserializes from camelCase JSON; missing fields take their defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlannerConfig {
    /// Base width for aspect-ratio requests without one.
    pub default_base_width: f64,
    /// Smallest canvas side allowed with generative fill.
    pub min_fill_dimension: u32,
    pub preview: EncodingDefaults,
    pub export: EncodingDefaults,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            default_base_width: DEFAULT_BASE_WIDTH,
            min_fill_dimension: MIN_FILL_DIMENSION,
            preview: EncodingDefaults::preview(),
            export: EncodingDefaults::export(),
        }
    }
}

// ============================================================================
// Planner
// ============================================================================

/// Builds [`TransformPlan`]s from requests under a fixed configuration.
///
/// Holds no mutable state; share it freely.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Planner {
    config: PlannerConfig,
}

impl Planner {
    pub fn new(config: PlannerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Resolve the target canvas.
    pub fn compute_dimensions(&self, request: &BuildRequest) -> Result<FormatSpec, PlanError> {
        match &request.target {
            TargetSpec::Preset(preset) => Ok(SocialPreset::spec(*preset)),
            TargetSpec::Dimensions { width, height } => FormatSpec::from_dimensions(*width, *height),
            TargetSpec::AspectRatio { ratio, base_width } => FormatSpec::from_aspect_ratio(
                ratio,
                base_width.unwrap_or(self.config.default_base_width),
            ),
        }
    }

    /// Resolve the canvas and assemble both pipelines.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(mode = ?request.target.mode(), ai_fill = request.ai_background_fill)
    )]
    pub fn build_plan(&self, request: &BuildRequest) -> Result<TransformPlan, PlanError> {
        let FormatSpec {
            width,
            height,
            aspect_ratio,
        } = self.compute_dimensions(request)?;
        tracing::debug!(width, height, aspect_ratio = %aspect_ratio, "resolved canvas");

        // Explicit sizes are checked before rounding: 9.6 is still below 10.
        let (fill_w, fill_h) = match &request.target {
            TargetSpec::Dimensions { width, height } => (*width, *height),
            _ => (f64::from(width), f64::from(height)),
        };
        let min = self.config.min_fill_dimension;
        if request.ai_background_fill && (fill_w < f64::from(min) || fill_h < f64::from(min)) {
            tracing::debug!(width = fill_w, height = fill_h, min, "canvas too small for generative fill");
            return Err(PlanError::UnsupportedFillSize {
                width: fill_w,
                height: fill_h,
                min,
            });
        }

        let base = Step::Geometry(GeometryStep {
            width,
            height,
            crop: CropMode::Pad,
            gravity: Gravity::Auto,
            background: if request.ai_background_fill {
                Background::GenerativeFill
            } else {
                Background::PredominantColor
            },
        });

        let preview = self.encoding(request, &self.config.preview);
        let export = self.encoding(request, &self.config.export);

        Ok(TransformPlan {
            width,
            height,
            aspect_ratio,
            preview_steps: vec![base.clone(), preview],
            export_steps: vec![base, export],
        })
    }

    /// Resolve a loose request under `policy`, then plan it.
    pub fn plan_raw(
        &self,
        request: &RawRequest,
        policy: ResolvePolicy,
    ) -> Result<TransformPlan, PlanError> {
        self.build_plan(&request.resolve(policy)?)
    }

    fn encoding(&self, request: &BuildRequest, defaults: &EncodingDefaults) -> Step {
        Step::Encoding(EncodingStep {
            format: request
                .format
                .clone()
                .unwrap_or_else(|| defaults.format.clone()),
            quality: request
                .quality
                .clone()
                .unwrap_or_else(|| defaults.quality.clone()),
        })
    }
}

/// [`Planner::compute_dimensions`] with the default configuration.
pub fn compute_dimensions(request: &BuildRequest) -> Result<FormatSpec, PlanError> {
    Planner::default().compute_dimensions(request)
}

/// [`Planner::build_plan`] with the default configuration.
pub fn build_plan(request: &BuildRequest) -> Result<TransformPlan, PlanError> {
    Planner::default().build_plan(request)
}
