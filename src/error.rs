/// config.toml 파싱/검증 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    NotFound { path: String },

    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("config validation error: {field} - {reason}")]
    Validation { field: String, reason: String },
}

/// 윈도우/플랫폼 협력자 호출 실패.
/// 정상 루프에서는 로그만 남기고 삼킨다 (치명적이지 않음).
#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("platform operation not supported: {0}")]
    Unsupported(&'static str),

    #[error("platform command failed: {0}")]
    CommandFailed(String),

    #[error("pointer position unavailable")]
    PointerUnavailable,
}

/// 앱 전역 에러 타입. 모든 모듈에서 공유.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("config load failed: {0}")]
    Config(#[from] ConfigError),

    #[error("platform error: {0}")]
    Platform(#[from] PlatformError),

    #[error("pet limit reached: at most {max} pets")]
    PetLimit { max: usize },

    #[error("unknown pet: {0}")]
    UnknownPet(String),

    #[error("unknown agent: {0}")]
    UnknownAgent(u32),

    #[error("cannot remove the last pet")]
    LastPet,

    #[error("event decode failed: {0}")]
    Event(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
