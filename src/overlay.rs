use crate::commands::{self, pets};
use crate::config::AppConfig;
use crate::error::AppError;
use crate::models::event::OverlayEvent;
use crate::models::geometry::ScreenBounds;
use crate::models::pet::PetCatalog;
use crate::platform::Platform;
use crate::services::arbitration::ClickThroughController;
use crate::services::geometry::{self, Arena};
use crate::services::pointer_monitor::{self, PointerMonitor};
use crate::state::{AppState, InteractionSurfaces, OverlayState, OverlayStatus};
use crate::tray::{self, TrayAction};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// 모니터 정보를 얻지 못했을 때의 화면 크기
const FALLBACK_BOUNDS: ScreenBounds = ScreenBounds {
    origin_x: 0.0,
    origin_y: 0.0,
    width: 1920.0,
    height: 1080.0,
};

/// 실행 중인 오버레이 코어.
/// drop 되면 모든 주기 작업이 취소된다.
pub struct Overlay {
    app: AppState,
    events: mpsc::UnboundedSender<OverlayEvent>,
    tasks: Vec<JoinHandle<()>>,
}

impl Overlay {
    /// 창 크기 설정 → 초기 클릭 통과 조회 → 첫 펫 추가 → 주기 작업 시작.
    /// tokio 런타임 안에서 호출해야 한다.
    pub fn start(config: AppConfig, platform: Arc<dyn Platform>) -> Result<Self, AppError> {
        let config = Arc::new(config);

        let bounds = resolve_bounds(platform.as_ref());
        if let Err(e) = platform.set_window_bounds(&bounds) {
            tracing::warn!("set_window_bounds failed: {e}");
        }

        let initial_click_through = platform.get_click_through().unwrap_or_else(|e| {
            tracing::warn!("get_click_through failed ({e}), assuming enabled");
            true
        });

        let overlay = OverlayState {
            catalog: PetCatalog::builtin(config.display.default_scale),
            arena: Arena::new(bounds, &config.display),
            agents: Vec::new(),
            next_agent_id: 1,
            pointer: PointerMonitor::new(0),
            arbitration: ClickThroughController::new(initial_click_through),
            surfaces: InteractionSurfaces::default(),
        };
        let app = AppState::new(config, overlay, platform);

        pets::add_pet(&app, None)?;

        let (events, rx) = mpsc::unbounded_channel();
        let tasks = vec![
            tokio::spawn(pointer_monitor::run_pointer_poll(app.clone())),
            tokio::spawn(pointer_monitor::run_health_check(app.clone())),
            tokio::spawn(run_event_loop(app.clone(), rx)),
        ];

        tracing::info!(
            "overlay started: bounds {}x{} at ({}, {}), click-through={}",
            bounds.width,
            bounds.height,
            bounds.origin_x,
            bounds.origin_y,
            initial_click_through
        );

        Ok(Self { app, events, tasks })
    }

    pub fn app(&self) -> &AppState {
        &self.app
    }

    pub fn send(&self, event: OverlayEvent) {
        if self.events.send(event).is_err() {
            tracing::warn!("event loop is gone, event dropped");
        }
    }

    pub fn send_json(&self, payload: &str) -> Result<(), AppError> {
        self.send(OverlayEvent::from_json(payload)?);
        Ok(())
    }

    /// 트레이 메뉴 클릭. 종료 요청이면 true.
    pub fn handle_tray(&self, id: &str) -> bool {
        match tray::on_menu_event(id) {
            Some(TrayAction::Quit) => true,
            Some(action) => {
                if let Some(event) = action.into_event() {
                    self.send(event);
                }
                false
            }
            None => {
                tracing::debug!("unhandled tray item '{id}'");
                false
            }
        }
    }

    pub fn status(&self) -> OverlayStatus {
        self.app.status()
    }

    pub fn shutdown(self) {
        tracing::info!("overlay shutting down");
    }
}

impl Drop for Overlay {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
        self.app.lock_tasks().clear();
    }
}

/// 모든 모니터 합집합 → 주 모니터 → 기본값 순으로 화면 경계를 정한다
fn resolve_bounds(platform: &dyn Platform) -> ScreenBounds {
    match platform.monitors() {
        Ok(monitors) => {
            if let Some(bounds) = geometry::union_bounds(&monitors) {
                return bounds;
            }
        }
        Err(e) => tracing::warn!("monitor query failed: {e}"),
    }

    match platform.primary_monitor() {
        Ok(Some(m)) => ScreenBounds {
            origin_x: m.x as f64,
            origin_y: m.y as f64,
            width: m.width as f64,
            height: m.height as f64,
        },
        Ok(None) => FALLBACK_BOUNDS,
        Err(e) => {
            tracing::warn!("primary monitor query failed: {e}");
            FALLBACK_BOUNDS
        }
    }
}

async fn run_event_loop(app: AppState, mut rx: mpsc::UnboundedReceiver<OverlayEvent>) {
    while let Some(event) = rx.recv().await {
        tracing::debug!("event: {event:?}");
        if let Err(e) = commands::dispatch(&app, event) {
            tracing::warn!("event rejected: {e}");
        }
    }
}
