use muhurat_trade_map::application::config::{AdvanceKind, RadiusMode, VisualizationConfig};
use muhurat_trade_map::domain::errors::AppError;
use muhurat_trade_map::domain::playback::AdvanceMode;
use std::str::FromStr;

#[test]
fn empty_json_gives_defaults() {
    let config = VisualizationConfig::from_json("{}").unwrap();
    assert_eq!(config, VisualizationConfig::default());
    assert_eq!(config.renderer.fade_duration_ms, 12_000.0);
    assert_eq!(config.playback.tick_interval_ms, 1_000);
    assert_eq!(config.scrub.debounce_ms, 150.0);
    assert_eq!(config.timeline.utc_offset_minutes, 330);
    assert_eq!(config.renderer.colors.buy, "#FAB726");
    assert_eq!(config.renderer.colors.sell, "#5D43E6");
}

#[test]
fn partial_sections_keep_other_defaults() {
    let config = VisualizationConfig::from_json(
        r#"{"playback": {"advance": "fixed-step", "step_ms": 500}, "renderer": {"halo": null}}"#,
    )
    .unwrap();
    assert_eq!(config.playback.advance_mode(), AdvanceMode::FixedStep(500));
    assert!(config.playback.autoplay);
    assert_eq!(config.renderer.halo, None);
    assert_eq!(config.renderer.marker_radius, 3.0);
}

#[test]
fn radius_mode_is_tagged_by_kind() {
    let config =
        VisualizationConfig::from_json(r#"{"renderer": {"radius_mode": {"kind": "amount-log", "max_radius": 20}}}"#)
            .unwrap();
    match config.renderer.radius_mode {
        RadiusMode::AmountLog { max_radius, min_radius, .. } => {
            assert_eq!(max_radius, 20.0);
            assert_eq!(min_radius, 1.0);
        }
        RadiusMode::Fixed => panic!("expected amount-log"),
    }
}

#[test]
fn invalid_values_are_validation_errors() {
    let error = VisualizationConfig::from_json(r#"{"renderer": {"fade_duration_ms": 0}}"#).unwrap_err();
    assert!(matches!(error, AppError::ValidationError(_)));

    let error = VisualizationConfig::from_json(r#"{"layout": {"padding": 1.5}}"#).unwrap_err();
    assert!(matches!(error, AppError::ValidationError(_)));

    assert!(VisualizationConfig::from_json("not json").is_err());
}

#[test]
fn advance_kind_round_trips_through_strum() {
    assert_eq!(AdvanceKind::from_str("next-key").unwrap(), AdvanceKind::NextKey);
    assert_eq!(AdvanceKind::FixedStep.to_string(), "fixed-step");
}

#[test]
fn region_flash_is_opt_in() {
    assert_eq!(VisualizationConfig::default().renderer.region_flash, None);

    let config = VisualizationConfig::from_json(r#"{"renderer": {"region_flash": {"fade_ms": 800}}}"#).unwrap();
    let flash = config.renderer.region_flash.unwrap();
    assert_eq!(flash.fade_ms, 800.0);
    assert_eq!(flash.flash_ms, 500.0);
    assert_eq!(flash.max_intensity, 5);

    let error =
        VisualizationConfig::from_json(r#"{"renderer": {"region_flash": {"flash_ms": 0}}}"#).unwrap_err();
    assert!(matches!(error, AppError::ValidationError(_)));
}
