use crate::models::animation::{AnimationState, SPECIAL_MOTIONS};
use serde::{Deserialize, Serialize};

/// 펫 종류별 설정. 지원 애니메이션 목록으로 스프라이트 보유 여부를 표현한다.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PetConfig {
    pub id: String,
    pub name: String,
    pub animations: Vec<AnimationState>,
    pub scale: f64,
}

impl PetConfig {
    pub fn has_animation(&self, state: AnimationState) -> bool {
        self.animations.contains(&state)
    }

    /// 없는 애니메이션은 대체 상태로 바꾼다.
    /// run → walk, 그 외 → idle.
    pub fn resolve(&self, state: AnimationState) -> AnimationState {
        if self.has_animation(state) {
            return state;
        }
        if state == AnimationState::Run && self.has_animation(AnimationState::Walk) {
            return AnimationState::Walk;
        }
        AnimationState::Idle
    }

    /// 이 펫이 실제로 재생할 수 있는 특수 모션 후보
    pub fn special_motions(&self) -> Vec<AnimationState> {
        SPECIAL_MOTIONS
            .iter()
            .copied()
            .filter(|m| self.has_animation(*m))
            .collect()
    }
}

/// 내장 펫 목록
#[derive(Debug, Clone)]
pub struct PetCatalog {
    pets: Vec<PetConfig>,
}

impl PetCatalog {
    pub fn builtin(default_scale: f64) -> Self {
        use AnimationState::*;

        Self {
            pets: vec![
                PetConfig {
                    id: "stone-guardian".into(),
                    name: "Stone Guardian".into(),
                    animations: vec![Idle, Walk, Run, Attack, Jump, Die, Hit, Skill],
                    scale: default_scale,
                },
                PetConfig {
                    id: "iron-fist-master".into(),
                    name: "Iron Fist Master".into(),
                    animations: vec![Idle, Walk, Attack, Die, Hit, Skill, ClawAttack],
                    scale: default_scale,
                },
            ],
        }
    }

    pub fn get(&self, id: &str) -> Option<&PetConfig> {
        self.pets.iter().find(|p| p.id == id)
    }

    pub fn default_pet(&self) -> &PetConfig {
        &self.pets[0]
    }

    /// 아직 화면에 없는 첫 번째 펫. 모두 사용 중이면 기본 펫.
    pub fn next_unused<'a>(&self, in_use: impl Iterator<Item = &'a str> + Clone) -> &PetConfig {
        self.pets
            .iter()
            .find(|p| !in_use.clone().any(|id| id == p.id))
            .unwrap_or_else(|| self.default_pet())
    }
}
