use crate::error::{AppError, ConfigError};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub behavior: BehaviorConfig,
    pub movement: MovementConfig,
    pub pointer: PointerConfig,
    pub arbitration: ArbitrationConfig,
    pub display: DisplayConfig,
}

/// 행동 결정 루프 설정
#[derive(Debug, Deserialize, Clone)]
pub struct BehaviorConfig {
    pub tick_ms: u64,
    pub close_radius: f64,
    pub follow_radius: f64,
    pub follow_run_distance: f64,
    /// 가까이 있을 때 특수 모션을 고를 확률
    pub close_special_chance: f64,
    pub wander_idle_band: f64,
    pub wander_special_band: f64,
    pub wander_walk_band: f64,
    pub manual_override_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MovementConfig {
    pub frame_ms: u64,
    pub walk_speed: f64,
    pub run_speed: f64,
    pub max_delta_scale: f64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PointerConfig {
    pub poll_interval_ms: u64,
    pub stale_threshold_ms: u64,
    pub permission_threshold_ms: u64,
    pub health_check_interval_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ArbitrationConfig {
    pub interact_margin_px: f64,
    pub control_panel_width: f64,
    pub control_panel_height: f64,
    pub control_panel_margin_top: f64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DisplayConfig {
    pub base_frame_size: f64,
    pub ground_mode: bool,
    pub ground_offset: f64,
    pub edge_margin: f64,
    pub default_scale: f64,
    pub min_scale: f64,
    pub max_scale: f64,
    pub scale_step: f64,
    pub max_pets: usize,
}

impl AppConfig {
    /// config.toml 파일에서 설정을 로드한다.
    /// 파일이 없거나 파싱 실패 시 에러를 반환한다 (기본값 폴백 없음).
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::NotFound {
            path: path.display().to_string(),
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, AppError> {
        let config: AppConfig = toml::from_str(content).map_err(ConfigError::from)?;
        config.validate()?;
        Ok(config)
    }

    /// 설정값 검증. 잘못된 값이 있으면 에러 반환.
    fn validate(&self) -> Result<(), AppError> {
        let periods = [
            ("behavior.tick_ms", self.behavior.tick_ms),
            ("movement.frame_ms", self.movement.frame_ms),
            ("pointer.poll_interval_ms", self.pointer.poll_interval_ms),
            (
                "pointer.health_check_interval_ms",
                self.pointer.health_check_interval_ms,
            ),
        ];
        for (field, value) in periods {
            if value == 0 {
                return Err(invalid(field, "period must be > 0"));
            }
        }

        let m = &self.movement;
        let d = &self.display;
        let a = &self.arbitration;
        let positive = [
            ("behavior.close_radius", self.behavior.close_radius),
            ("behavior.follow_radius", self.behavior.follow_radius),
            ("behavior.follow_run_distance", self.behavior.follow_run_distance),
            ("movement.walk_speed", m.walk_speed),
            ("movement.run_speed", m.run_speed),
            ("movement.max_delta_scale", m.max_delta_scale),
            ("display.base_frame_size", d.base_frame_size),
            ("display.max_scale", d.max_scale),
            ("display.scale_step", d.scale_step),
            ("arbitration.control_panel_width", a.control_panel_width),
            ("arbitration.control_panel_height", a.control_panel_height),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(invalid(field, "must be a finite number > 0"));
            }
        }

        let non_negative = [
            ("display.edge_margin", d.edge_margin),
            ("display.ground_offset", d.ground_offset),
            ("arbitration.interact_margin_px", a.interact_margin_px),
            ("arbitration.control_panel_margin_top", a.control_panel_margin_top),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(invalid(field, "must be a finite number >= 0"));
            }
        }

        if m.run_speed <= m.walk_speed {
            return Err(invalid("movement.run_speed", "must be greater than walk_speed"));
        }

        if self.behavior.close_radius >= self.behavior.follow_radius {
            return Err(invalid(
                "behavior.close_radius",
                "must be less than follow_radius",
            ));
        }

        let b = &self.behavior;
        let bands_ascending = 0.0 <= b.wander_idle_band
            && b.wander_idle_band <= b.wander_special_band
            && b.wander_special_band <= b.wander_walk_band
            && b.wander_walk_band <= 1.0;
        if !bands_ascending {
            return Err(invalid(
                "behavior.wander_*_band",
                "bands must ascend within [0, 1]",
            ));
        }

        if !(0.0..=1.0).contains(&b.close_special_chance) {
            return Err(invalid(
                "behavior.close_special_chance",
                "must be within [0, 1]",
            ));
        }

        if self.pointer.stale_threshold_ms >= self.pointer.permission_threshold_ms {
            return Err(invalid(
                "pointer.stale_threshold_ms",
                "must be less than permission_threshold_ms",
            ));
        }

        if !(d.min_scale > 0.0 && d.min_scale <= d.default_scale && d.default_scale <= d.max_scale) {
            return Err(invalid(
                "display.scale",
                "expected 0 < min_scale <= default_scale <= max_scale",
            ));
        }

        if d.max_pets == 0 {
            return Err(invalid("display.max_pets", "must be > 0"));
        }

        Ok(())
    }
}

fn invalid(field: &str, reason: &str) -> AppError {
    ConfigError::Validation {
        field: field.into(),
        reason: reason.into(),
    }
    .into()
}

#[cfg(test)]
pub(crate) fn test_config() -> AppConfig {
    AppConfig::from_toml(include_str!("../config.toml")).expect("bundled config must be valid")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp_config(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().expect("failed to create temp file");
        f.write_all(content.as_bytes())
            .expect("failed to write temp file");
        f
    }

    #[test]
    fn test_load_valid_config() {
        let f = write_temp_config(include_str!("../config.toml"));
        let config = AppConfig::load(f.path()).expect("should parse valid config");
        assert_eq!(config.behavior.tick_ms, 2500);
        assert_eq!(config.behavior.close_radius, 90.0);
        assert_eq!(config.pointer.poll_interval_ms, 80);
        assert_eq!(config.pointer.permission_threshold_ms, 2000);
        assert_eq!(config.display.max_pets, 2);
        assert!(config.display.ground_mode);
    }

    #[test]
    fn test_load_missing_file() {
        let result = AppConfig::load(Path::new("/nonexistent/config.toml"));
        assert!(matches!(
            result,
            Err(AppError::Config(ConfigError::NotFound { .. }))
        ));
    }

    #[test]
    fn test_load_invalid_toml() {
        let f = write_temp_config("this is not valid toml [[[");
        let result = AppConfig::load(f.path());
        assert!(matches!(
            result,
            Err(AppError::Config(ConfigError::Parse(_)))
        ));
    }

    #[test]
    fn test_validation_thresholds_inverted() {
        let content = include_str!("../config.toml")
            .replace("stale_threshold_ms = 800", "stale_threshold_ms = 5000");
        let result = AppConfig::from_toml(&content);
        assert!(matches!(
            result,
            Err(AppError::Config(ConfigError::Validation { .. }))
        ));
    }

    #[test]
    fn test_validation_zero_period() {
        let content =
            include_str!("../config.toml").replace("poll_interval_ms = 80", "poll_interval_ms = 0");
        assert!(AppConfig::from_toml(&content).is_err());
    }

    #[test]
    fn test_validation_bands_out_of_order() {
        let content = include_str!("../config.toml")
            .replace("wander_walk_band = 0.8", "wander_walk_band = 0.2");
        assert!(AppConfig::from_toml(&content).is_err());
    }

    fn assert_rejected(from: &str, to: &str, field: &str) {
        let content = include_str!("../config.toml").replace(from, to);
        assert_ne!(content, include_str!("../config.toml"), "{from} not found");
        match AppConfig::from_toml(&content) {
            Err(AppError::Config(ConfigError::Validation { field: f, .. })) => assert_eq!(f, field),
            other => panic!("expected validation error for {field}, got {other:?}"),
        }
    }

    #[test]
    fn test_validation_nan_edge_margin() {
        assert_rejected("edge_margin = 20.0", "edge_margin = nan", "display.edge_margin");
    }

    #[test]
    fn test_validation_negative_margins() {
        assert_rejected("edge_margin = 20.0", "edge_margin = -1.0", "display.edge_margin");
        assert_rejected("ground_offset = 0.0", "ground_offset = -5.0", "display.ground_offset");
        assert_rejected(
            "interact_margin_px = 24.0",
            "interact_margin_px = inf",
            "arbitration.interact_margin_px",
        );
    }

    #[test]
    fn test_validation_non_positive_frame_size() {
        assert_rejected("base_frame_size = 256.0", "base_frame_size = 0.0", "display.base_frame_size");
    }

    #[test]
    fn test_validation_non_positive_speeds() {
        assert_rejected("walk_speed = 3.0", "walk_speed = -3.0", "movement.walk_speed");
        assert_rejected("max_delta_scale = 3.0", "max_delta_scale = 0.0", "movement.max_delta_scale");
    }

    #[test]
    fn test_validation_run_not_faster_than_walk() {
        assert_rejected("run_speed = 7.0", "run_speed = 1.0", "movement.run_speed");
        assert_rejected("run_speed = 7.0", "run_speed = 3.0", "movement.run_speed");
    }

    #[test]
    fn test_validation_radius_order() {
        let content =
            include_str!("../config.toml").replace("close_radius = 90.0", "close_radius = 900.0");
        assert!(AppConfig::from_toml(&content).is_err());
    }
}
