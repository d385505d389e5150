//! Delivery URL rendering for the media host.
//!
//! Turns step sequences into the host's transformation syntax, where each
//! step becomes one `/`-separated component of comma-joined `code_value`
//! parameters:
//!
//! ```text
//!     b_auto:predominant,c_pad,g_auto,h_1080,w_1080/f_auto,q_auto
//! ```
//!
//! Step order is preserved; parameters within a step are sorted.
//!
//! # Example
//!
//! ```
//! use sharelayout::{BuildRequest, SocialPreset, build_plan};
//! use sharelayout::url::DeliveryUrl;
//!
//! let plan = build_plan(&BuildRequest::preset(SocialPreset::InstagramSquare)).unwrap();
//! let url = plan.preview_url(&DeliveryUrl::new("demo"), "sample").unwrap();
//! assert_eq!(
//!     url,
//!     "https://res.cloudinary.com/demo/image/upload/\
//!      b_auto:predominant,c_pad,g_auto,h_1080,w_1080/f_auto,q_auto/sample"
//! );
//! ```

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use crate::error::PlanError;
use crate::plan::{Step, TransformPlan};

const HOST: &str = "res.cloudinary.com";

/// Short parameter code used in URLs.
fn param_code(key: &str) -> &str {
    match key {
        "width" => "w",
        "height" => "h",
        "crop" => "c",
        "gravity" => "g",
        "background" => "b",
        "fetch_format" => "f",
        "quality" => "q",
        other => other,
    }
}

impl Step {
    /// This step as one transformation component.
    pub fn to_transformation(&self) -> String {
        let mut params: Vec<String> = self
            .to_map()
            .iter()
            .map(|(key, value)| format!("{}_{}", param_code(key), value))
            .collect();
        params.sort();
        params.join(",")
    }
}

/// Join steps into a full transformation, in order.
pub fn transformation_string(steps: &[Step]) -> String {
    steps
        .iter()
        .map(Step::to_transformation)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// URL builder for one cloud account.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DeliveryUrl {
    pub cloud_name: String,
    pub secure: bool,
}

impl DeliveryUrl {
    /// HTTPS URLs for `cloud_name`.
    pub fn new(cloud_name: impl Into<String>) -> Self {
        Self {
            cloud_name: cloud_name.into(),
            secure: true,
        }
    }

    /// Switch between `https` and `http`.
    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Image delivery URL for `public_id` with `steps` applied.
    pub fn url(&self, public_id: &str, steps: &[Step]) -> Result<String, PlanError> {
        if self.cloud_name.trim().is_empty() {
            return Err(PlanError::MissingAssetField("cloudName"));
        }
        if public_id.trim().is_empty() {
            return Err(PlanError::MissingAssetField("publicId"));
        }

        let scheme = if self.secure { "https" } else { "http" };
        let mut url = format!("{scheme}://{HOST}/{}/image/upload/", self.cloud_name);

        let transformation = transformation_string(steps);
        if !transformation.is_empty() {
            url.push_str(&transformation);
            url.push('/');
        }
        if public_id.contains('/') && !has_version(public_id) {
            url.push_str("v1/");
        }
        escape_into(&mut url, public_id);
        Ok(url)
    }
}

impl TransformPlan {
    /// Delivery URL for the preview pipeline.
    pub fn preview_url(&self, delivery: &DeliveryUrl, public_id: &str) -> Result<String, PlanError> {
        delivery.url(public_id, &self.preview_steps)
    }

    /// Delivery URL for the export pipeline.
    pub fn export_url(&self, delivery: &DeliveryUrl, public_id: &str) -> Result<String, PlanError> {
        delivery.url(public_id, &self.export_steps)
    }
}

/// Whether the id already starts with a `v<digits>/` version segment.
fn has_version(public_id: &str) -> bool {
    let Some(rest) = public_id.strip_prefix('v') else {
        return false;
    };
    match rest.split_once('/') {
        Some((digits, _)) => !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()),
        None => false,
    }
}

/// Percent-encode everything outside `[A-Za-z0-9_.\-/:]`.
fn escape_into(out: &mut String, s: &str) {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";
    for b in s.bytes() {
        if b.is_ascii_alphanumeric() || matches!(b, b'_' | b'.' | b'-' | b'/' | b':') {
            out.push(b as char);
        } else {
            out.push('%');
            out.push(HEX[(b >> 4) as usize] as char);
            out.push(HEX[(b & 0x0f) as usize] as char);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_detection() {
        assert!(has_version("v123/folder/id"));
        assert!(!has_version("v/folder"));
        assert!(!has_version("video/clip"));
        assert!(!has_version("v12"));
    }

    #[test]
    fn escape_keeps_safe_chars() {
        let mut s = String::new();
        escape_into(&mut s, "folder/my_img-1.v2:x");
        assert_eq!(s, "folder/my_img-1.v2:x");
    }

    #[test]
    fn escape_encodes_spaces_and_unicode() {
        let mut s = String::new();
        escape_into(&mut s, "a b/é");
        assert_eq!(s, "a%20b/%C3%A9");
    }

    #[test]
    fn unknown_keys_pass_through() {
        assert_eq!(param_code("effect"), "effect");
        assert_eq!(param_code("fetch_format"), "f");
    }

    #[test]
    fn empty_steps_skip_segment() {
        let url = DeliveryUrl::new("demo").url("id", &[]).unwrap();
        assert_eq!(url, "https://res.cloudinary.com/demo/image/upload/id");
    }
}
