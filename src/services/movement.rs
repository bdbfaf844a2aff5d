use crate::config::MovementConfig;
use crate::models::agent::{Agent, AgentId};
use crate::models::animation::AnimationState;
use crate::state::AppState;
use tokio::time::{Duration, Instant, MissedTickBehavior};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovementOutcome {
    /// 목표 없음, 드래그 중, 또는 이동 애니메이션이 아님
    Inactive,
    Moved,
    /// 목표 도착 → idle 전환, 목표 해제
    Arrived,
}

/// 이동 애니메이션별 속도 (60fps 기준 픽셀/프레임)
pub fn speed_for(animation: AnimationState, config: &MovementConfig) -> Option<f64> {
    match animation {
        AnimationState::Walk => Some(config.walk_speed),
        AnimationState::Run => Some(config.run_speed),
        _ => None,
    }
}

/// 실제 경과 시간을 기준 프레임 단위로 환산한다. 멈춤 뒤 순간이동 방지를 위해 상한을 둔다.
pub fn delta_scale(elapsed: Duration, config: &MovementConfig) -> f64 {
    let frames = elapsed.as_micros() as f64 / (config.frame_ms * 1000) as f64;
    frames.clamp(0.0, config.max_delta_scale)
}

/// 한 프레임만큼 목표를 향해 이동한다.
/// 남은 거리가 이번 걸음 이하이면 idle로 돌아가고 목표를 해제한다.
pub fn step(
    agent: &mut Agent,
    config: &MovementConfig,
    ground_mode: bool,
    delta_scale: f64,
) -> MovementOutcome {
    if agent.is_dragging {
        return MovementOutcome::Inactive;
    }
    let Some(target) = agent.target else {
        return MovementOutcome::Inactive;
    };
    let Some(speed) = speed_for(agent.animation, config) else {
        return MovementOutcome::Inactive;
    };

    let step_size = speed * delta_scale;
    let dx = target.x - agent.position.x;
    // 바닥 모드에서는 수직 이동 없음
    let dy = if ground_mode {
        0.0
    } else {
        target.y - agent.position.y
    };
    let remaining = dx.hypot(dy);

    if remaining <= step_size {
        agent.target = None;
        agent.animation = AnimationState::Idle;
        return MovementOutcome::Arrived;
    }

    agent.position.x += dx / remaining * step_size;
    agent.position.y += dy / remaining * step_size;
    MovementOutcome::Moved
}

/// 에이전트별 이동 루프 (렌더 주기)
pub async fn run_movement_loop(app: AppState, agent_id: AgentId) {
    let mut ticker = tokio::time::interval(Duration::from_millis(app.config.movement.frame_ms));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut last = Instant::now();

    loop {
        ticker.tick().await;
        let now = Instant::now();
        let scale = delta_scale(now - last, &app.config.movement);
        last = now;

        if !movement_tick(&app, agent_id, scale) {
            tracing::debug!("movement loop for agent {agent_id} stopped");
            return;
        }
    }
}

pub(crate) fn movement_tick(app: &AppState, agent_id: AgentId, scale: f64) -> bool {
    let mut overlay = app.lock();
    let ground_mode = overlay.arena.ground_mode;
    let Some(agent) = overlay.agent_mut(agent_id) else {
        return false;
    };

    match step(agent, &app.config.movement, ground_mode, scale) {
        MovementOutcome::Inactive => {}
        MovementOutcome::Arrived => {
            tracing::debug!("agent {agent_id} arrived at target");
        }
        // 펫 박스가 움직였으니 히트 테스트 다시
        MovementOutcome::Moved => app.reconcile(&mut overlay),
    }
    true
}
