//! Target formats: the social preset table, aspect ratios, and dimension math.
//!
//! Pure arithmetic on caller-supplied numbers. Nothing here knows about
//! pipelines or encodings; see [`crate::plan`] for that.
//!
//! # Example
//!
//! ```
//! use sharelayout::{AspectRatio, FormatSpec, SocialPreset};
//!
//! let spec = SocialPreset::TwitterPost.spec();
//! assert_eq!(spec, FormatSpec::new(1200, 675, "16:9"));
//!
//! // 1200×675 reduces to the same ratio.
//! assert_eq!(AspectRatio::reduced(1200, 675).to_string(), "16:9");
//! ```

use alloc::format;
use alloc::string::{String, ToString};
use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::PlanError;

/// Resolved canvas size and its aspect ratio.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatSpec {
    /// Canvas width in pixels. Always > 0.
    pub width: u32,
    /// Canvas height in pixels. Always > 0.
    pub height: u32,
    /// Ratio rendered as `"W:H"`.
    pub aspect_ratio: String,
}

impl FormatSpec {
    /// Create a spec from already-validated parts.
    pub fn new(width: u32, height: u32, aspect_ratio: impl Into<String>) -> Self {
        Self {
            width,
            height,
            aspect_ratio: aspect_ratio.into(),
        }
    }

    /// Explicit width and height. The ratio is the GCD-reduced fraction of
    /// the rounded dimensions.
    pub fn from_dimensions(width: f64, height: f64) -> Result<Self, PlanError> {
        let invalid = || PlanError::InvalidDimensions(format!("width={width}, height={height}"));
        let w = to_dimension(width).ok_or_else(invalid)?;
        let h = to_dimension(height).ok_or_else(invalid)?;
        Ok(Self::new(w, h, AspectRatio::reduced(w.into(), h.into()).to_string()))
    }

    /// Width taken from `base_width`, height derived from `ratio`.
    ///
    /// The ratio string is kept as parsed, not reduced: `"8:10"` stays
    /// `"8:10"`.
    pub fn from_aspect_ratio(ratio: &str, base_width: f64) -> Result<Self, PlanError> {
        let ratio: AspectRatio = ratio.parse()?;
        let invalid = || PlanError::InvalidBaseWidth(format!("{base_width} (aspect ratio {ratio})"));
        if !base_width.is_finite() || base_width <= 0.0 {
            return Err(invalid());
        }
        let w = to_dimension(base_width).ok_or_else(invalid)?;
        let h = to_dimension(ratio.height_for(base_width)).ok_or_else(invalid)?;
        Ok(Self::new(w, h, ratio.to_string()))
    }
}

// ============================================================================
// Presets
// ============================================================================

/// Named social-platform formats.
///
/// The table is closed: parsing any other key fails with
/// [`PlanError::UnknownPreset`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SocialPreset {
    /// 1080×1080, 1:1.
    InstagramSquare,
    /// 1080×1350, 4:5.
    InstagramPortrait,
    /// 1200×675, 16:9.
    TwitterPost,
    /// 1500×500, 3:1.
    TwitterHeader,
    /// 820×312, 205:78.
    FacebookCover,
}

impl SocialPreset {
    /// Every preset, in table order.
    pub const ALL: [Self; 5] = [
        Self::InstagramSquare,
        Self::InstagramPortrait,
        Self::TwitterPost,
        Self::TwitterHeader,
        Self::FacebookCover,
    ];

    /// Canonical keys, in table order.
    pub const KEYS: &'static [&'static str] = &[
        "instagramSquare",
        "instagramPortrait",
        "twitterPost",
        "twitterHeader",
        "facebookCover",
    ];

    /// Canonical key.
    pub const fn key(self) -> &'static str {
        match self {
            Self::InstagramSquare => "instagramSquare",
            Self::InstagramPortrait => "instagramPortrait",
            Self::TwitterPost => "twitterPost",
            Self::TwitterHeader => "twitterHeader",
            Self::FacebookCover => "facebookCover",
        }
    }

    /// Canvas `(width, height)` in pixels.
    pub const fn dimensions(self) -> (u32, u32) {
        match self {
            Self::InstagramSquare => (1080, 1080),
            Self::InstagramPortrait => (1080, 1350),
            Self::TwitterPost => (1200, 675),
            Self::TwitterHeader => (1500, 500),
            Self::FacebookCover => (820, 312),
        }
    }

    /// Aspect ratio as listed in the table.
    pub const fn aspect_ratio(self) -> AspectRatio {
        let (width, height) = match self {
            Self::InstagramSquare => (1, 1),
            Self::InstagramPortrait => (4, 5),
            Self::TwitterPost => (16, 9),
            Self::TwitterHeader => (3, 1),
            Self::FacebookCover => (205, 78),
        };
        AspectRatio { width, height }
    }

    /// The table entry.
    pub fn spec(self) -> FormatSpec {
        let (w, h) = self.dimensions();
        FormatSpec::new(w, h, self.aspect_ratio().to_string())
    }

    /// Look up a canonical key or one of its short aliases.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "instagramSquare" | "square" => Some(Self::InstagramSquare),
            "instagramPortrait" | "portrait" => Some(Self::InstagramPortrait),
            "twitterPost" | "wide" | "wide16x9" => Some(Self::TwitterPost),
            "twitterHeader" | "header" => Some(Self::TwitterHeader),
            "facebookCover" | "cover" => Some(Self::FacebookCover),
            _ => None,
        }
    }
}

impl FromStr for SocialPreset {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_key(s).ok_or_else(|| PlanError::UnknownPreset(s.into()))
    }
}

impl fmt::Display for SocialPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl Serialize for SocialPreset {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.key())
    }
}

impl<'de> Deserialize<'de> for SocialPreset {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let key = String::deserialize(deserializer)?;
        key.parse().map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Aspect ratio
// ============================================================================

/// Integer aspect ratio `width:height`. Both components are > 0.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct AspectRatio {
    pub width: u64,
    pub height: u64,
}

impl AspectRatio {
    /// Parse `"W:H"`. Whitespace around either component is ignored.
    pub fn parse(input: &str) -> Result<Self, PlanError> {
        let invalid = || PlanError::InvalidAspectRatio(input.into());
        let (w, h) = input.split_once(':').ok_or_else(invalid)?;
        let width = parse_component(w).ok_or_else(invalid)?;
        let height = parse_component(h).ok_or_else(invalid)?;
        Ok(Self { width, height })
    }

    /// Reduce `width:height` by their greatest common divisor.
    ///
    /// Both arguments must be > 0.
    pub fn reduced(width: u64, height: u64) -> Self {
        let g = gcd(width, height).max(1);
        Self {
            width: width / g,
            height: height / g,
        }
    }

    /// Height matching `width` at this ratio, unrounded.
    pub fn height_for(self, width: f64) -> f64 {
        width * self.height as f64 / self.width as f64
    }
}

impl FromStr for AspectRatio {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.width, self.height)
    }
}

/// Digits only, surrounded by optional whitespace, value > 0.
fn parse_component(s: &str) -> Option<u64> {
    let s = s.trim();
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse::<u64>().ok().filter(|&v| v > 0)
}

// ============================================================================
// Internal arithmetic
// ============================================================================

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Half-away-from-zero rounding that also works without `std`.
pub(crate) fn round(x: f64) -> f64 {
    num_traits::Float::round(x)
}

/// Round to a pixel count. `None` for non-finite values and anything that
/// does not land in `1..=u32::MAX`.
pub(crate) fn to_dimension(x: f64) -> Option<u32> {
    if !x.is_finite() {
        return None;
    }
    let r = round(x);
    if r >= 1.0 && r <= u32::MAX as f64 {
        Some(r as u32)
    } else {
        None
    }
}
