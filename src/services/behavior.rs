use crate::config::BehaviorConfig;
use crate::models::agent::{Agent, AgentId};
use crate::models::animation::AnimationState;
use crate::models::geometry::Position;
use crate::services::geometry::{self, Arena};
use crate::state::AppState;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use tokio::time::{Duration, MissedTickBehavior};

/// 이번 틱에 결정을 건너뛴 이유
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldReason {
    ManualOverride,
    SpecialMotion,
    Dragging,
}

/// 행동 결정 결과. 계산과 적용을 분리해 한 번에 반영한다.
#[derive(Debug, Clone, PartialEq)]
pub enum BehaviorDecision {
    Hold(HoldReason),
    Idle,
    Special {
        motion: AnimationState,
        lock_until: u64,
    },
    Move {
        animation: AnimationState,
        target: Position,
    },
}

/// 행동 결정 (behavior tick 한 번).
/// 포인터가 가까우면 반응하고, 적당히 멀면 따라가고, 그 외에는 배회한다.
pub fn decide<R: Rng + ?Sized>(
    agent: &Agent,
    pointer: Option<Position>,
    arena: &Arena,
    config: &BehaviorConfig,
    base_frame_size: f64,
    now: u64,
    rng: &mut R,
) -> BehaviorDecision {
    if now < agent.manual_override_until {
        return BehaviorDecision::Hold(HoldReason::ManualOverride);
    }
    if now < agent.special_motion_lock_until {
        return BehaviorDecision::Hold(HoldReason::SpecialMotion);
    }
    if agent.is_dragging {
        return BehaviorDecision::Hold(HoldReason::Dragging);
    }

    let size = agent.size(base_frame_size);
    let pet_center = geometry::center(agent.position, size);

    if let Some(pointer) = pointer {
        let dist = geometry::distance(pet_center, pointer);

        if dist <= config.close_radius {
            if rng.random::<f64>() < config.close_special_chance {
                if let Some(decision) = pick_special(agent, now, rng) {
                    return decision;
                }
            }
            return BehaviorDecision::Idle;
        }

        if dist <= config.follow_radius {
            let animation = if dist > config.follow_run_distance {
                agent.pet.resolve(AnimationState::Run)
            } else {
                AnimationState::Walk
            };
            // 펫 중심이 포인터에 오도록
            let desired = Position::new(pointer.x - size / 2.0, pointer.y - size / 2.0);
            return BehaviorDecision::Move {
                animation,
                target: arena.constrain(desired, size),
            };
        }
    }

    wander(agent, arena, config, size, now, rng)
}

fn wander<R: Rng + ?Sized>(
    agent: &Agent,
    arena: &Arena,
    config: &BehaviorConfig,
    size: f64,
    now: u64,
    rng: &mut R,
) -> BehaviorDecision {
    let roll = rng.random::<f64>();

    if roll < config.wander_idle_band {
        return BehaviorDecision::Idle;
    }
    if roll < config.wander_special_band {
        return pick_special(agent, now, rng).unwrap_or(BehaviorDecision::Idle);
    }

    let animation = if roll < config.wander_walk_band {
        AnimationState::Walk
    } else {
        agent.pet.resolve(AnimationState::Run)
    };
    BehaviorDecision::Move {
        animation,
        target: arena.random_target(size, rng),
    }
}

/// 펫이 가진 특수 모션 중 하나. 하나도 없으면 None.
fn pick_special<R: Rng + ?Sized>(agent: &Agent, now: u64, rng: &mut R) -> Option<BehaviorDecision> {
    let motions = agent.pet.special_motions();
    let motion = *motions.choose(rng)?;
    let duration = motion.motion_duration_ms()?;
    Some(BehaviorDecision::Special {
        motion,
        lock_until: now + duration,
    })
}

/// 결정을 에이전트 상태에 반영한다
pub fn apply(agent: &mut Agent, decision: &BehaviorDecision) {
    match *decision {
        BehaviorDecision::Hold(_) => {}
        BehaviorDecision::Idle => {
            agent.animation = AnimationState::Idle;
            agent.target = None;
        }
        BehaviorDecision::Special { motion, lock_until } => {
            agent.set_animation(motion);
            agent.special_motion_lock_until = lock_until;
            agent.target = None;
        }
        BehaviorDecision::Move { animation, target } => {
            agent.set_animation(animation);
            agent.face_towards(target);
            agent.target = Some(target);
        }
    }
}

/// 에이전트별 행동 결정 루프. 에이전트가 사라지면 종료한다.
pub async fn run_behavior_loop(app: AppState, agent_id: AgentId) {
    let mut ticker = tokio::time::interval(Duration::from_millis(app.config.behavior.tick_ms));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut rng = StdRng::from_os_rng();

    loop {
        ticker.tick().await;
        if !behavior_tick(&app, agent_id, &mut rng) {
            tracing::debug!("behavior loop for agent {agent_id} stopped");
            return;
        }
    }
}

/// false면 에이전트가 더 이상 없음
pub(crate) fn behavior_tick<R: Rng + ?Sized>(app: &AppState, agent_id: AgentId, rng: &mut R) -> bool {
    let now = app.now_ms();
    let mut overlay = app.lock();
    let pointer = overlay.pointer.known_position();
    let arena = overlay.arena;

    let Some(agent) = overlay.agent_mut(agent_id) else {
        return false;
    };

    let decision = decide(
        agent,
        pointer,
        &arena,
        &app.config.behavior,
        app.config.display.base_frame_size,
        now,
        rng,
    );
    tracing::debug!("agent {agent_id} decision: {decision:?}");
    apply(agent, &decision);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;
    use crate::models::geometry::ScreenBounds;
    use crate::models::pet::PetCatalog;

    const FRAME: f64 = 256.0;

    fn arena() -> Arena {
        Arena {
            bounds: ScreenBounds {
                origin_x: 0.0,
                origin_y: 0.0,
                width: 1920.0,
                height: 1080.0,
            },
            edge_margin: 20.0,
            ground_mode: true,
            ground_offset: 0.0,
        }
    }

    fn make_agent(pet_id: &str) -> Agent {
        let catalog = PetCatalog::builtin(0.8);
        let pet = catalog.get(pet_id).unwrap().clone();
        Agent::new(1, pet, Position::new(800.0, 1080.0 - FRAME * 0.8))
    }

    fn center_of(agent: &Agent) -> Position {
        geometry::center(agent.position, agent.size(FRAME))
    }

    fn rng(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    #[test]
    fn test_manual_override_holds_everything() {
        let config = test_config();
        let mut agent = make_agent("stone-guardian");
        agent.manual_override_until = 5000;
        agent.animation = AnimationState::Run;
        agent.target = Some(Position::new(100.0, 100.0));
        let before = agent.clone();

        for seed in 0..20 {
            let pointer = Some(center_of(&agent));
            let decision = decide(&agent, pointer, &arena(), &config.behavior, FRAME, 4999, &mut rng(seed));
            assert_eq!(decision, BehaviorDecision::Hold(HoldReason::ManualOverride));
            apply(&mut agent, &decision);
            assert_eq!(agent.animation, before.animation);
            assert_eq!(agent.target, before.target);
        }
    }

    #[test]
    fn test_special_motion_lock_holds() {
        let config = test_config();
        let mut agent = make_agent("stone-guardian");
        agent.special_motion_lock_until = 1000;
        let decision = decide(&agent, None, &arena(), &config.behavior, FRAME, 999, &mut rng(1));
        assert_eq!(decision, BehaviorDecision::Hold(HoldReason::SpecialMotion));
    }

    #[test]
    fn test_dragging_holds() {
        let config = test_config();
        let mut agent = make_agent("stone-guardian");
        agent.is_dragging = true;
        let decision = decide(&agent, None, &arena(), &config.behavior, FRAME, 0, &mut rng(1));
        assert_eq!(decision, BehaviorDecision::Hold(HoldReason::Dragging));
    }

    #[test]
    fn test_close_pointer_never_runs() {
        let config = test_config();
        let agent = make_agent("stone-guardian");
        let c = center_of(&agent);
        let pointer = Some(Position::new(c.x + 30.0, c.y + 40.0)); // 거리 50

        for seed in 0..200 {
            let decision = decide(&agent, pointer, &arena(), &config.behavior, FRAME, 0, &mut rng(seed));
            match decision {
                BehaviorDecision::Idle => {}
                BehaviorDecision::Special { motion, .. } => assert!(motion.is_special()),
                other => panic!("unexpected decision near pointer: {other:?}"),
            }
        }
    }

    #[test]
    fn test_special_lock_matches_motion_duration() {
        let config = test_config();
        let mut found = false;
        for seed in 0..200 {
            let mut agent = make_agent("iron-fist-master");
            let pointer = Some(center_of(&agent));
            let now = 10_000;
            let decision = decide(&agent, pointer, &arena(), &config.behavior, FRAME, now, &mut rng(seed));
            if let BehaviorDecision::Special { motion, .. } = decision {
                apply(&mut agent, &decision);
                assert_eq!(agent.animation, motion);
                assert_eq!(
                    agent.special_motion_lock_until - now,
                    motion.motion_duration_ms().unwrap()
                );
                assert!(agent.target.is_none());
                assert_ne!(motion, AnimationState::Jump, "iron fist has no jump");
                found = true;
            }
        }
        assert!(found, "expected at least one special motion in 200 seeds");
    }

    #[test]
    fn test_follow_walks_then_runs() {
        let config = test_config();
        let agent = make_agent("stone-guardian");
        let c = center_of(&agent);

        let near = Some(Position::new(c.x + 200.0, c.y));
        match decide(&agent, near, &arena(), &config.behavior, FRAME, 0, &mut rng(3)) {
            BehaviorDecision::Move { animation, .. } => assert_eq!(animation, AnimationState::Walk),
            other => panic!("expected walk, got {other:?}"),
        }

        let far = Some(Position::new(c.x - 400.0, c.y));
        match decide(&agent, far, &arena(), &config.behavior, FRAME, 0, &mut rng(3)) {
            BehaviorDecision::Move { animation, target } => {
                assert_eq!(animation, AnimationState::Run);
                // 바닥 모드: y는 바닥에 고정
                assert_eq!(target.y, 1080.0 - agent.size(FRAME));
            }
            other => panic!("expected run, got {other:?}"),
        }
    }

    #[test]
    fn test_follow_run_falls_back_to_walk() {
        let config = test_config();
        let agent = make_agent("iron-fist-master");
        let c = center_of(&agent);
        let far = Some(Position::new(c.x + 450.0, c.y));
        match decide(&agent, far, &arena(), &config.behavior, FRAME, 0, &mut rng(9)) {
            BehaviorDecision::Move { animation, .. } => assert_eq!(animation, AnimationState::Walk),
            other => panic!("expected walk, got {other:?}"),
        }
    }

    #[test]
    fn test_move_sets_facing_and_target() {
        let mut agent = make_agent("stone-guardian");
        let target = Position::new(100.0, agent.position.y);
        apply(
            &mut agent,
            &BehaviorDecision::Move {
                animation: AnimationState::Run,
                target,
            },
        );
        assert!(agent.flipped);
        assert_eq!(agent.target, Some(target));
        assert_eq!(agent.animation, AnimationState::Run);
    }

    #[test]
    fn test_wander_targets_stay_in_arena() {
        let config = test_config();
        let agent = make_agent("stone-guardian");
        let size = agent.size(FRAME);
        for seed in 0..200 {
            let decision = decide(&agent, None, &arena(), &config.behavior, FRAME, 0, &mut rng(seed));
            if let BehaviorDecision::Move { animation, target } = decision {
                assert!(animation.is_locomotion());
                assert!(target.x >= 20.0 && target.x <= 1920.0 - size - 20.0);
                assert_eq!(target.y, 1080.0 - size);
            }
        }
    }

    #[test]
    fn test_far_pointer_wanders() {
        let config = test_config();
        let agent = make_agent("stone-guardian");
        let c = center_of(&agent);
        let far = Some(Position::new(c.x + 900.0, c.y));
        let mut saw_idle = false;
        let mut saw_move = false;
        for seed in 0..100 {
            match decide(&agent, far, &arena(), &config.behavior, FRAME, 0, &mut rng(seed)) {
                BehaviorDecision::Idle => saw_idle = true,
                BehaviorDecision::Move { .. } => saw_move = true,
                _ => {}
            }
        }
        assert!(saw_idle && saw_move);
    }
}
