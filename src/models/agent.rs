use crate::models::animation::AnimationState;
use crate::models::geometry::{Position, Rect};
use crate::models::pet::PetConfig;
use serde::{Deserialize, Serialize};

pub type AgentId = u32;

/// 화면 위 펫 한 마리의 상태
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    pub pet: PetConfig,
    pub scale: f64,
    pub position: Position,
    pub animation: AnimationState,
    pub flipped: bool,
    pub target: Option<Position>,
    pub is_dragging: bool,
    /// 드래그 시작 시 포인터와 펫 좌상단의 차이
    pub drag_offset: Position,
    /// 이 시각 전까지 자율 행동이 목표를 바꾸지 않는다 (ms)
    pub manual_override_until: u64,
    /// 특수 모션 재생이 끝나는 시각 (ms)
    pub special_motion_lock_until: u64,
}

impl Agent {
    pub fn new(id: AgentId, pet: PetConfig, position: Position) -> Self {
        let scale = pet.scale;
        Self {
            id,
            pet,
            scale,
            position,
            animation: AnimationState::Idle,
            flipped: false,
            target: None,
            is_dragging: false,
            drag_offset: Position::default(),
            manual_override_until: 0,
            special_motion_lock_until: 0,
        }
    }

    /// 화면에 그려지는 한 변의 길이
    pub fn size(&self, base_frame_size: f64) -> f64 {
        base_frame_size * self.scale
    }

    pub fn bounding_box(&self, base_frame_size: f64) -> Rect {
        let size = self.size(base_frame_size);
        Rect {
            x: self.position.x,
            y: self.position.y,
            width: size,
            height: size,
        }
    }

    /// 펫 설정에 없는 애니메이션은 대체 규칙을 거쳐 적용한다.
    pub fn set_animation(&mut self, state: AnimationState) {
        self.animation = self.pet.resolve(state);
    }

    /// 새 목표를 향해 방향을 맞춘다
    pub fn face_towards(&mut self, target: Position) {
        self.flipped = target.x < self.position.x;
    }
}
