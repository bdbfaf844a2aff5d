use serde::{Deserialize, Serialize};

/// 스프라이트 시트 한 장의 프레임 수 (4x4 그리드)
pub const TOTAL_FRAMES: u64 = 16;

/// 애니메이션 상태.
/// idle / walk / attack 은 모든 펫 공통, 나머지는 펫별 선택.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationState {
    Idle,
    Walk,
    Run,
    Attack,
    Jump,
    Skill,
    Hit,
    Die,
    ClawAttack,
}

/// 행동 루프가 무작위로 고를 수 있는 특수 모션 후보
pub const SPECIAL_MOTIONS: [AnimationState; 4] = [
    AnimationState::Attack,
    AnimationState::Skill,
    AnimationState::Jump,
    AnimationState::ClawAttack,
];

impl AnimationState {
    pub const BASELINE: [AnimationState; 3] = [
        AnimationState::Idle,
        AnimationState::Walk,
        AnimationState::Attack,
    ];

    /// 프레임 간격 (ms)
    pub fn frame_ms(self) -> u64 {
        match self {
            AnimationState::Idle => 120,
            AnimationState::Walk => 80,
            AnimationState::Run => 60,
            AnimationState::Attack => 70,
            AnimationState::Jump => 80,
            AnimationState::Die => 100,
            AnimationState::Hit => 60,
            AnimationState::Skill => 70,
            AnimationState::ClawAttack => 60,
        }
    }

    /// 한 번 재생되고 끝나는 모션의 길이. 반복 모션은 None.
    pub fn motion_duration_ms(self) -> Option<u64> {
        self.is_special()
            .then(|| self.frame_ms() * TOTAL_FRAMES)
    }

    pub fn is_special(self) -> bool {
        matches!(
            self,
            AnimationState::Attack
                | AnimationState::Skill
                | AnimationState::Jump
                | AnimationState::Hit
                | AnimationState::ClawAttack
        )
    }

    pub fn is_locomotion(self) -> bool {
        matches!(self, AnimationState::Walk | AnimationState::Run)
    }
}
