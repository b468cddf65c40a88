use std::path::Path;

use pressroom_export::options::{OptionValue, PageLayout, RendererOptions, keys};

#[test]
fn default_layout_keeps_the_tall_top_margin() {
    let layout = PageLayout::default();
    assert_eq!(layout.page_width, "21cm");
    assert_eq!(layout.page_height, "29.7cm");
    assert_eq!(layout.margin_top, "2in");
    assert_eq!(layout.margin_right, "0.75in");
    assert_eq!(layout.margin_bottom, "0.75in");
    assert_eq!(layout.margin_left, "0.75in");
}

#[test]
fn layout_options_carry_fixed_defaults() {
    let options = RendererOptions::for_layout(&PageLayout::default());

    assert_eq!(options.len(), 12);
    assert_eq!(options.get(keys::ENCODING), Some(&OptionValue::from("UTF-8")));
    assert_eq!(options.get(keys::ORIENTATION), Some(&OptionValue::from("Portrait")));
    assert_eq!(options.get(keys::DPI), Some(&OptionValue::Number(300)));
    assert_eq!(options.get(keys::NO_OUTLINE), Some(&OptionValue::Flag));
    assert_eq!(options.get(keys::NO_STOP_SLOW_SCRIPTS), Some(&OptionValue::Switch(true)));
    assert_eq!(
        options.get(keys::ENABLE_LOCAL_FILE_ACCESS),
        Some(&OptionValue::Switch(true))
    );
    assert!(!options.contains_key(keys::HEADER_HTML));
    assert!(!options.contains_key(keys::FOOTER_HTML));
}

#[test]
fn caller_geometry_overrides_defaults() {
    let layout = PageLayout {
        page_width: "8.5in".to_string(),
        page_height: "11in".to_string(),
        margin_top: "1in".to_string(),
        ..PageLayout::default()
    }
    .with_horizontal_margin("0.5in");
    let options = RendererOptions::for_layout(&layout);

    assert_eq!(options.get(keys::PAGE_WIDTH), Some(&OptionValue::from("8.5in")));
    assert_eq!(options.get(keys::MARGIN_TOP), Some(&OptionValue::from("1in")));
    assert_eq!(options.get(keys::MARGIN_LEFT), Some(&OptionValue::from("0.5in")));
    assert_eq!(options.get(keys::MARGIN_RIGHT), Some(&OptionValue::from("0.5in")));
    assert_eq!(options.get(keys::MARGIN_BOTTOM), Some(&OptionValue::from("0.75in")));
}

#[test]
fn setting_an_existing_key_replaces_in_place() {
    let options = RendererOptions::new()
        .with("dpi", 300)
        .with("encoding", "UTF-8")
        .with("dpi", 96);

    let names: Vec<&str> = options.iter().map(|(key, _)| key).collect();
    assert_eq!(names, ["dpi", "encoding"]);
    assert_eq!(options.get("dpi"), Some(&OptionValue::Number(96)));
}

#[test]
fn args_follow_value_kinds() {
    let options = RendererOptions::new()
        .with("page-width", "21cm")
        .with("dpi", 300)
        .with("no-outline", OptionValue::Flag)
        .with("enable-local-file-access", true)
        .with("grayscale", false)
        .with(keys::HEADER_HTML, Path::new("/tmp/header-x.html"));

    assert_eq!(
        options.to_args(),
        [
            "--page-width",
            "21cm",
            "--dpi",
            "300",
            "--no-outline",
            "--enable-local-file-access",
            "--header-html",
            "/tmp/header-x.html",
        ]
    );
}

#[test]
fn layout_deserializes_partially() {
    let layout: PageLayout = serde_json::from_str(r#"{"margin_top":"1cm"}"#).unwrap();
    assert_eq!(layout.margin_top, "1cm");
    assert_eq!(layout.page_width, "21cm");
}
