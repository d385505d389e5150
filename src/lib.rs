//! Social-share transform planning.
//!
//! Maps a sizing intent (named preset, explicit dimensions, or aspect ratio)
//! to a padded canvas and two ordered step pipelines for a remote image host:
//! a fast preview and a high-fidelity export.
//!
//! Pure computation: no pixel operations, no I/O, no global state.
//! `no_std` compatible with `alloc`.
//!
//! # Modules
//!
//! - [`format`] — Preset table, aspect ratios, dimension math
//! - [`request`] — Typed and loose requests, ambiguity policy
//! - [`plan`] — Steps, planner configuration, plan assembly
//! - [`url`] — Host transformation syntax and delivery URLs (feature `url`)

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

pub mod error;
pub mod format;
pub mod plan;
pub mod request;
#[cfg(feature = "url")]
pub mod url;

pub use error::PlanError;
pub use format::{AspectRatio, FormatSpec, SocialPreset};
pub use plan::{
    Background, CropMode, EncodingDefaults, EncodingStep, GeometryStep, Gravity, Planner,
    PlannerConfig, Step, StepMap, StepValue, TransformPlan, build_plan, compute_dimensions,
};
pub use request::{BuildRequest, RawRequest, ResolvePolicy, SizingMode, TargetSpec};
