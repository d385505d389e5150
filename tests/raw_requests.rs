//! Loose JSON requests → typed requests → plans, and plan serialization.

use serde_json::json;
use sharelayout::*;

fn raw(value: serde_json::Value) -> RawRequest {
    serde_json::from_value(value).expect("valid raw request")
}

#[test]
fn camel_case_fields_deserialize() {
    let r = raw(json!({
        "aspectRatio": "4:5",
        "baseWidth": 1200,
        "aiBackgroundFill": true,
        "format": "webp",
    }));
    assert_eq!(r.aspect_ratio.as_deref(), Some("4:5"));
    assert_eq!(r.base_width, Some(1200.0));
    assert_eq!(r.ai_background_fill, Some(true));
    assert_eq!(r.format.as_deref(), Some("webp"));
    assert_eq!(r.quality, None);
}

#[test]
fn strict_plan_from_json() {
    let r = raw(json!({ "aspectRatio": "4:5", "baseWidth": 1200 }));
    let plan = Planner::default()
        .plan_raw(&r, ResolvePolicy::Strict)
        .unwrap();
    assert_eq!(plan.format_spec(), FormatSpec::new(1200, 1500, "4:5"));
}

#[test]
fn missing_mode() {
    let r = raw(json!({ "format": "png" }));
    assert_eq!(
        r.resolve(ResolvePolicy::default()),
        Err(PlanError::MissingTargetSpec)
    );
}

#[test]
fn ambiguous_mode_names_every_signal() {
    let r = raw(json!({
        "preset": "twitterPost",
        "width": 100,
        "height": 100,
        "aspectRatio": "1:1",
    }));
    let err = r.resolve(ResolvePolicy::Strict).unwrap_err();
    assert_eq!(
        err,
        PlanError::AmbiguousTargetSpec("preset, width & height, aspect ratio".into())
    );
    assert!(err.to_string().starts_with("provide only one of"));
}

#[test]
fn priority_falls_back_to_aspect_ratio_last() {
    let r = raw(json!({ "width": 300, "height": 200, "aspectRatio": "1:1" }));
    let plan = Planner::default()
        .plan_raw(&r, ResolvePolicy::Priority)
        .unwrap();
    assert_eq!(plan.format_spec(), FormatSpec::new(300, 200, "3:2"));
}

#[test]
fn unknown_preset_message_lists_choices() {
    let r = raw(json!({ "preset": "tiktok" }));
    let msg = r.resolve(ResolvePolicy::Strict).unwrap_err().to_string();
    assert!(msg.contains("'tiktok'"), "{msg}");
    assert!(msg.contains("instagramPortrait"), "{msg}");
}

#[test]
fn preset_deserializes_directly() {
    let preset: SocialPreset = serde_json::from_value(json!("cover")).unwrap();
    assert_eq!(preset, SocialPreset::FacebookCover);
    assert_eq!(serde_json::to_value(preset).unwrap(), json!("facebookCover"));
    assert!(serde_json::from_value::<SocialPreset>(json!("banner")).is_err());
}

#[test]
fn config_from_partial_json() {
    let config: PlannerConfig = serde_json::from_value(json!({
        "defaultBaseWidth": 720,
        "export": { "format": "jpg", "quality": "auto:good" },
    }))
    .unwrap();
    assert_eq!(config.default_base_width, 720.0);
    assert_eq!(config.min_fill_dimension, 10);
    assert_eq!(config.preview, EncodingDefaults::preview());

    let plan = Planner::new(config)
        .build_plan(&BuildRequest::aspect_ratio("16:9"))
        .unwrap();
    assert_eq!((plan.width, plan.height), (720, 405));
    assert_eq!(
        plan.export_steps[1],
        Step::Encoding(EncodingStep {
            format: "jpg".into(),
            quality: "auto:good".into()
        })
    );
}

#[test]
fn plan_serializes_as_step_maps() {
    let plan = build_plan(&BuildRequest::preset(SocialPreset::InstagramSquare)).unwrap();
    assert_eq!(
        serde_json::to_value(&plan).unwrap(),
        json!({
            "width": 1080,
            "height": 1080,
            "aspectRatio": "1:1",
            "previewSteps": [
                {
                    "width": 1080,
                    "height": 1080,
                    "crop": "pad",
                    "gravity": "auto",
                    "background": "auto:predominant",
                },
                { "fetch_format": "auto", "quality": "auto" },
            ],
            "exportSteps": [
                {
                    "width": 1080,
                    "height": 1080,
                    "crop": "pad",
                    "gravity": "auto",
                    "background": "auto:predominant",
                },
                { "fetch_format": "png", "quality": "auto:best" },
            ],
        })
    );
}

#[test]
fn priority_ignores_lone_width_next_to_aspect_ratio() {
    let r = raw(json!({ "width": 100, "aspectRatio": "4:5" }));
    let plan = Planner::default()
        .plan_raw(&r, ResolvePolicy::Priority)
        .unwrap();
    assert_eq!(plan.format_spec(), FormatSpec::new(1080, 1350, "4:5"));
}

#[test]
fn empty_preset_does_not_make_request_ambiguous() {
    let r = raw(json!({ "preset": "", "aspectRatio": "4:5" }));
    let plan = Planner::default()
        .plan_raw(&r, ResolvePolicy::Strict)
        .unwrap();
    assert_eq!(plan.format_spec(), FormatSpec::new(1080, 1350, "4:5"));
}
