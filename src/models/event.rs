use crate::error::AppError;
use crate::models::agent::AgentId;
use crate::models::geometry::Position;
use crate::services::arbitration::ArbitrationMode;
use serde::{Deserialize, Serialize};

/// 오버레이 코어로 들어오는 사용자/플랫폼 이벤트.
/// 모든 핸들러는 상태를 다시 적용할 뿐이므로 중복 수신해도 안전하다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OverlayEvent {
    /// 외부(트레이 등)에서 클릭 통과 값이 바뀜
    ClickThroughChanged { enabled: bool },
    ClickThroughModeChanged { mode: ArbitrationMode },
    /// 전역 마우스 훅 실패 (권한 문제)
    MouseHookError { message: String },

    AddPet { pet_id: Option<String> },
    RemovePet,
    ChangeCharacter { agent_id: AgentId, pet_id: String },
    ScaleChanged { agent_id: AgentId, scale: f64 },
    ScaleStep { agent_id: AgentId, grow: bool },

    Attack { agent_id: AgentId },
    Run { agent_id: AgentId },

    MenuOpened,
    MenuClosed,
    DragStarted { agent_id: AgentId, pointer: Position },
    DragMoved { agent_id: AgentId, pointer: Position },
    DragStopped { agent_id: AgentId },
    ControlHover { active: bool },
    ControlPanelToggled { visible: bool },

    PermissionDismissed,
    OpenAccessibilitySettings,
}

impl OverlayEvent {
    /// WebView/트레이에서 전달된 JSON 페이로드를 해석한다.
    pub fn from_json(payload: &str) -> Result<Self, AppError> {
        Ok(serde_json::from_str(payload)?)
    }
}
