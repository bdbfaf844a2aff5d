use crate::error::AppError;
use crate::models::agent::{Agent, AgentId};
use crate::models::animation::AnimationState;
use crate::services::scheduler;
use crate::state::AppState;

/// 펫 추가. pet_id가 없으면 아직 화면에 없는 펫을 고른다.
pub fn add_pet(app: &AppState, pet_id: Option<&str>) -> Result<AgentId, AppError> {
    let display = &app.config.display;
    let agent_id = {
        let mut overlay = app.lock();
        if overlay.agents.len() >= display.max_pets {
            return Err(AppError::PetLimit {
                max: display.max_pets,
            });
        }

        let pet = match pet_id {
            Some(id) => overlay
                .catalog
                .get(id)
                .ok_or_else(|| AppError::UnknownPet(id.to_string()))?
                .clone(),
            None => {
                let in_use = overlay.agents.iter().map(|a| a.pet.id.as_str());
                overlay.catalog.next_unused(in_use).clone()
            }
        };

        let id = overlay.next_agent_id;
        overlay.next_agent_id += 1;

        let size = display.base_frame_size * pet.scale;
        let position = overlay.arena.spawn_point(size, overlay.agents.len());
        tracing::info!("agent {id} added ({}) at {:?}", pet.id, position);
        overlay.agents.push(Agent::new(id, pet, position));
        app.reconcile(&mut overlay);
        id
    };

    scheduler::spawn_agent_tasks(app, agent_id);
    Ok(agent_id)
}

/// 마지막으로 추가된 펫 제거. 최소 한 마리는 남긴다.
pub fn remove_last_pet(app: &AppState) -> Result<AgentId, AppError> {
    let removed = {
        let mut overlay = app.lock();
        if overlay.agents.len() <= 1 {
            return Err(AppError::LastPet);
        }
        let agent = overlay.agents.pop().ok_or(AppError::LastPet)?;
        app.reconcile(&mut overlay);
        agent.id
    };

    scheduler::cancel_agent_tasks(app, removed);
    tracing::info!("agent {removed} removed");
    Ok(removed)
}

/// 캐릭터 교체. 현재 애니메이션은 새 펫 기준으로 다시 해석한다.
pub fn change_character(app: &AppState, agent_id: AgentId, pet_id: &str) -> Result<(), AppError> {
    let mut overlay = app.lock();
    let pet = overlay
        .catalog
        .get(pet_id)
        .ok_or_else(|| AppError::UnknownPet(pet_id.to_string()))?
        .clone();
    let agent = overlay
        .agent_mut(agent_id)
        .ok_or(AppError::UnknownAgent(agent_id))?;

    let current = agent.animation;
    agent.pet = pet;
    agent.set_animation(current);
    tracing::info!(
        "agent {agent_id} changed to {} (animation {:?})",
        agent.pet.id,
        agent.animation
    );
    Ok(())
}

/// 크기 변경. 범위로 제한한 뒤 위치와 목표를 다시 경계 안으로 넣는다.
pub fn set_scale(app: &AppState, agent_id: AgentId, scale: f64) -> Result<f64, AppError> {
    let display = &app.config.display;
    let mut overlay = app.lock();
    let arena = overlay.arena;
    let agent = overlay
        .agent_mut(agent_id)
        .ok_or(AppError::UnknownAgent(agent_id))?;

    agent.scale = scale.clamp(display.min_scale, display.max_scale);
    let size = agent.size(display.base_frame_size);
    agent.position = arena.constrain(agent.position, size);
    agent.target = agent.target.map(|t| arena.constrain(t, size));
    let applied = agent.scale;

    app.reconcile(&mut overlay);
    Ok(applied)
}

/// 휠 한 칸만큼 크기 조절
pub fn step_scale(app: &AppState, agent_id: AgentId, grow: bool) -> Result<f64, AppError> {
    let current = app
        .lock()
        .agent(agent_id)
        .map(|a| a.scale)
        .ok_or(AppError::UnknownAgent(agent_id))?;
    let step = app.config.display.scale_step;
    set_scale(app, agent_id, if grow { current + step } else { current - step })
}

/// 사용자 지시 공격. 모션이 끝날 때까지 자율 행동을 막는다.
pub fn trigger_attack(app: &AppState, agent_id: AgentId) -> Result<(), AppError> {
    let now = app.now_ms();
    let mut overlay = app.lock();
    let agent = overlay
        .agent_mut(agent_id)
        .ok_or(AppError::UnknownAgent(agent_id))?;
    if agent.is_dragging {
        return Ok(());
    }

    agent.set_animation(AnimationState::Attack);
    let duration = agent.animation.motion_duration_ms().unwrap_or_default();
    agent.target = None;
    agent.special_motion_lock_until = now + duration;
    agent.manual_override_until = now + duration;
    Ok(())
}

/// 사용자 지시 달리기. 무작위 목표로 달리고 잠시 자율 목표 변경을 막는다.
pub fn trigger_run(app: &AppState, agent_id: AgentId) -> Result<(), AppError> {
    let now = app.now_ms();
    let frame = app.config.display.base_frame_size;
    let mut overlay = app.lock();
    let arena = overlay.arena;
    let agent = overlay
        .agent_mut(agent_id)
        .ok_or(AppError::UnknownAgent(agent_id))?;
    if agent.is_dragging {
        return Ok(());
    }

    let target = arena.random_target(agent.size(frame), &mut rand::rng());
    agent.set_animation(AnimationState::Run);
    agent.face_towards(target);
    agent.target = Some(target);
    agent.special_motion_lock_until = 0;
    agent.manual_override_until = now + app.config.behavior.manual_override_ms;
    Ok(())
}
