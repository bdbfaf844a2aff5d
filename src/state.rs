use crate::config::AppConfig;
use crate::models::agent::{Agent, AgentId};
use crate::models::animation::AnimationState;
use crate::models::geometry::{Position, Rect};
use crate::models::pet::PetCatalog;
use crate::platform::Platform;
use crate::services::arbitration::{
    ArbitrationMode, ClickThroughController, InteractionSignals, PassThroughReason,
};
use crate::services::geometry::{self, Arena};
use crate::services::pointer_monitor::{PointerHealth, PointerMonitor};
use crate::services::scheduler::AgentTasks;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::time::Instant;

/// 펫 외의 상호작용 표면
#[derive(Debug, Clone, Copy, Default)]
pub struct InteractionSurfaces {
    pub menu_open: bool,
    pub control_hover: bool,
    pub control_panel_visible: bool,
}

/// 오버레이 프로세스 하나의 가변 상태.
/// 모든 주기 작업이 같은 인스턴스를 락으로 공유한다.
#[derive(Debug)]
pub struct OverlayState {
    pub catalog: PetCatalog,
    pub arena: Arena,
    pub agents: Vec<Agent>,
    pub next_agent_id: AgentId,
    pub pointer: PointerMonitor,
    pub arbitration: ClickThroughController,
    pub surfaces: InteractionSurfaces,
}

impl OverlayState {
    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.iter().find(|a| a.id == id)
    }

    pub fn agent_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        self.agents.iter_mut().find(|a| a.id == id)
    }

    pub fn control_panel_rect(&self, config: &AppConfig) -> Rect {
        let arb = &config.arbitration;
        geometry::control_panel_rect(
            self.arena.bounds.width,
            arb.control_panel_width,
            arb.control_panel_height,
            arb.control_panel_margin_top,
        )
    }

    /// 현재 상태에서 클릭 통과 판정 입력을 만든다
    pub fn interaction_signals(&self, config: &AppConfig) -> InteractionSignals {
        let health = self.pointer.health();
        let pointer = self.pointer.known_position();
        let frame = config.display.base_frame_size;

        let over_panel = self.surfaces.control_panel_visible
            && pointer.is_some_and(|p| geometry::is_inside_rect(p, &self.control_panel_rect(config)));
        let dragging = self.agents.iter().any(|a| a.is_dragging);

        let over_agent = pointer.is_some_and(|p| {
            self.agents.iter().any(|a| {
                let hit_box = a
                    .bounding_box(frame)
                    .expand(config.arbitration.interact_margin_px);
                geometry::is_inside_rect(p, &hit_box)
            })
        });

        InteractionSignals {
            permission_required: health.permission_required,
            interacting: self.surfaces.menu_open
                || self.surfaces.control_hover
                || over_panel
                || dragging,
            pointer_healthy: health.is_healthy,
            pointer_over_agent: over_agent,
        }
    }
}

/// 상태 표시용 펫 요약
#[derive(Debug, Clone, Serialize)]
pub struct AgentStatus {
    pub id: AgentId,
    pub pet_id: String,
    pub animation: AnimationState,
    pub position: Position,
    pub scale: f64,
    pub flipped: bool,
    pub is_dragging: bool,
}

/// 상태 알림 UI에 넘기는 스냅샷
#[derive(Debug, Clone, Serialize)]
pub struct OverlayStatus {
    pub click_through: bool,
    pub mode: ArbitrationMode,
    /// 마지막 판정 근거. 아직 판정 전이면 None.
    pub reason: Option<PassThroughReason>,
    pub pointer: PointerHealth,
    pub agents: Vec<AgentStatus>,
}

/// 앱 전역 공유 상태.
/// 주기 작업과 이벤트 핸들러 양쪽에서 clone 해서 사용한다.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub overlay: Arc<Mutex<OverlayState>>,
    pub platform: Arc<dyn Platform>,
    pub tasks: Arc<Mutex<HashMap<AgentId, AgentTasks>>>,
    started: Instant,
}

impl AppState {
    pub fn new(config: Arc<AppConfig>, overlay: OverlayState, platform: Arc<dyn Platform>) -> Self {
        Self {
            config,
            overlay: Arc::new(Mutex::new(overlay)),
            platform,
            tasks: Arc::new(Mutex::new(HashMap::new())),
            started: Instant::now(),
        }
    }

    /// 프로세스 시작 후 경과 시간 (ms). 모든 잠금/건강 타임스탬프의 기준.
    pub fn now_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    pub fn lock(&self) -> MutexGuard<'_, OverlayState> {
        self.overlay.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn lock_tasks(&self) -> MutexGuard<'_, HashMap<AgentId, AgentTasks>> {
        self.tasks.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// 입력 신호가 바뀐 뒤 호출. 값이 바뀔 때만 플랫폼에 토글을 보낸다.
    pub fn reconcile(&self, overlay: &mut OverlayState) {
        let signals = overlay.interaction_signals(&self.config);
        overlay
            .arbitration
            .reconcile(&signals, self.platform.as_ref());
    }

    pub fn status(&self) -> OverlayStatus {
        let overlay = self.lock();
        OverlayStatus {
            click_through: overlay.arbitration.is_pass_through(),
            mode: overlay.arbitration.mode(),
            reason: overlay.arbitration.last_reason(),
            pointer: overlay.pointer.health().clone(),
            agents: overlay
                .agents
                .iter()
                .map(|a| AgentStatus {
                    id: a.id,
                    pet_id: a.pet.id.clone(),
                    animation: a.animation,
                    position: a.position,
                    scale: a.scale,
                    flipped: a.flipped,
                    is_dragging: a.is_dragging,
                })
                .collect(),
        }
    }
}
