mod commands;
mod config;
mod error;
mod models;
mod overlay;
mod platform;
mod services;
mod state;
mod tray;

pub use commands::dispatch;
pub use config::AppConfig;
pub use error::{AppError, ConfigError, PlatformError};
pub use models::agent::{Agent, AgentId};
pub use models::animation::AnimationState;
pub use models::event::OverlayEvent;
pub use models::geometry::{Position, Rect, ScreenBounds, ScreenInfo};
pub use models::pet::{PetCatalog, PetConfig};
pub use overlay::Overlay;
pub use platform::headless::HeadlessPlatform;
pub use platform::Platform;
pub use services::arbitration::{ArbitrationMode, PassThroughReason};
pub use services::pointer_monitor::PointerHealth;
pub use state::{AgentStatus, AppState, InteractionSurfaces, OverlayState, OverlayStatus};

use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// 설정 파일 위치: DESKTOP_PET_CONFIG 환경 변수, 없으면 크레이트 루트의 config.toml
fn config_path() -> PathBuf {
    std::env::var_os("DESKTOP_PET_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("config.toml"))
}

/// 헤드리스 플랫폼으로 오버레이 코어를 띄우고 Ctrl-C 까지 실행한다.
pub fn run() -> Result<(), AppError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let path = config_path();
    tracing::info!("loading config from {}", path.display());
    let config = AppConfig::load(&path)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async move {
        let platform: Arc<dyn Platform> = Arc::new(HeadlessPlatform::default());
        let overlay = Overlay::start(config, platform)?;

        tokio::signal::ctrl_c().await?;
        overlay.shutdown();
        Ok::<(), AppError>(())
    })
}
