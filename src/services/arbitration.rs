use crate::platform::Platform;
use serde::{Deserialize, Serialize};

/// 클릭 통과 결정 정책. 트레이/상태 패널에서만 바뀐다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArbitrationMode {
    #[default]
    Auto,
    LockedOn,
    LockedOff,
}

/// 모드를 제외한 판정 입력
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InteractionSignals {
    pub permission_required: bool,
    /// 메뉴 열림, 컨트롤 패널 hover/drag, 펫 드래그 중 하나라도 활성
    pub interacting: bool,
    pub pointer_healthy: bool,
    /// 포인터가 (여유 영역을 포함한) 펫 박스 안에 있음
    pub pointer_over_agent: bool,
}

/// 클릭 통과 값이 결정된 이유 (로그/상태 표시용)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PassThroughReason {
    PermissionRequired,
    Interacting,
    PointerUnhealthy,
    LockedOn,
    LockedOff,
    PointerOverAgent,
    PointerAway,
}

struct Rule {
    applies: fn(ArbitrationMode, &InteractionSignals) -> bool,
    pass_through: bool,
    reason: PassThroughReason,
}

fn permission_required(_: ArbitrationMode, s: &InteractionSignals) -> bool {
    s.permission_required
}

fn interacting(_: ArbitrationMode, s: &InteractionSignals) -> bool {
    s.interacting
}

fn pointer_unhealthy(_: ArbitrationMode, s: &InteractionSignals) -> bool {
    !s.pointer_healthy
}

fn locked_on(mode: ArbitrationMode, _: &InteractionSignals) -> bool {
    mode == ArbitrationMode::LockedOn
}

fn locked_off(mode: ArbitrationMode, _: &InteractionSignals) -> bool {
    mode == ArbitrationMode::LockedOff
}

fn pointer_over_agent(_: ArbitrationMode, s: &InteractionSignals) -> bool {
    s.pointer_over_agent
}

/// 우선순위 순서. 처음 일치하는 규칙이 이긴다.
const RULES: &[Rule] = &[
    Rule {
        applies: permission_required,
        pass_through: true,
        reason: PassThroughReason::PermissionRequired,
    },
    Rule {
        applies: interacting,
        pass_through: false,
        reason: PassThroughReason::Interacting,
    },
    // 히트 테스트를 믿을 수 없으므로 fail-open
    Rule {
        applies: pointer_unhealthy,
        pass_through: true,
        reason: PassThroughReason::PointerUnhealthy,
    },
    Rule {
        applies: locked_on,
        pass_through: true,
        reason: PassThroughReason::LockedOn,
    },
    Rule {
        applies: locked_off,
        pass_through: false,
        reason: PassThroughReason::LockedOff,
    },
    Rule {
        applies: pointer_over_agent,
        pass_through: false,
        reason: PassThroughReason::PointerOverAgent,
    },
];

/// 규칙 표를 위에서부터 평가한다
pub fn decide(mode: ArbitrationMode, signals: &InteractionSignals) -> (bool, PassThroughReason) {
    RULES
        .iter()
        .find(|rule| (rule.applies)(mode, signals))
        .map(|rule| (rule.pass_through, rule.reason))
        .unwrap_or((true, PassThroughReason::PointerAway))
}

/// 클릭 통과 값의 단일 권한자.
/// 값이 실제로 바뀔 때만 플랫폼 토글 명령을 보낸다.
#[derive(Debug)]
pub struct ClickThroughController {
    mode: ArbitrationMode,
    applied: bool,
    last_reason: Option<PassThroughReason>,
}

impl ClickThroughController {
    pub fn new(initial: bool) -> Self {
        Self {
            mode: ArbitrationMode::Auto,
            applied: initial,
            last_reason: None,
        }
    }

    pub fn mode(&self) -> ArbitrationMode {
        self.mode
    }

    pub fn is_pass_through(&self) -> bool {
        self.applied
    }

    pub fn last_reason(&self) -> Option<PassThroughReason> {
        self.last_reason
    }

    pub fn set_mode(&mut self, mode: ArbitrationMode) -> bool {
        if self.mode == mode {
            return false;
        }
        tracing::info!("click-through mode: {:?} -> {:?}", self.mode, mode);
        self.mode = mode;
        true
    }

    /// 멱등 setter. 토글 실패 시에도 캐시는 시도한 값으로 남긴다 (다음 상태 변화 때 재시도).
    pub fn apply(&mut self, enabled: bool, platform: &dyn Platform) -> bool {
        if self.applied == enabled {
            return false;
        }
        self.applied = enabled;
        if let Err(e) = platform.set_click_through(enabled) {
            tracing::warn!("set_click_through({enabled}) failed: {e}");
        }
        true
    }

    /// 현재 신호로 판정하고 적용한다
    pub fn reconcile(&mut self, signals: &InteractionSignals, platform: &dyn Platform) -> bool {
        let (pass_through, reason) = decide(self.mode, signals);
        if self.last_reason != Some(reason) {
            tracing::debug!(
                "click-through decision: pass_through={} reason={:?}",
                pass_through,
                reason
            );
            self.last_reason = Some(reason);
        }
        self.apply(pass_through, platform)
    }

    /// 외부(트레이 등)에서 온 클릭 통과 변경 알림.
    /// 자기 자신이 보낸 값의 메아리면 무시하고, 아니면 대응하는 고정 모드로 전환한다.
    pub fn on_external_change(&mut self, enabled: bool) -> bool {
        if self.applied == enabled {
            return false;
        }
        self.applied = enabled;
        let mode = if enabled {
            ArbitrationMode::LockedOn
        } else {
            ArbitrationMode::LockedOff
        };
        self.set_mode(mode);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::headless::HeadlessPlatform;

    fn healthy() -> InteractionSignals {
        InteractionSignals {
            pointer_healthy: true,
            ..Default::default()
        }
    }

    const MODES: [ArbitrationMode; 3] = [
        ArbitrationMode::Auto,
        ArbitrationMode::LockedOn,
        ArbitrationMode::LockedOff,
    ];

    #[test]
    fn test_permission_required_dominates() {
        let signals = InteractionSignals {
            permission_required: true,
            interacting: true,
            pointer_healthy: true,
            pointer_over_agent: true,
        };
        for mode in MODES {
            assert_eq!(
                decide(mode, &signals),
                (true, PassThroughReason::PermissionRequired)
            );
        }
    }

    #[test]
    fn test_interacting_forces_off_in_every_mode() {
        for pointer_healthy in [true, false] {
            let signals = InteractionSignals {
                interacting: true,
                pointer_healthy,
                ..Default::default()
            };
            for mode in MODES {
                assert_eq!(decide(mode, &signals).0, false, "{mode:?}");
            }
        }
    }

    #[test]
    fn test_unhealthy_feed_fails_open_in_every_mode() {
        let signals = InteractionSignals {
            pointer_healthy: false,
            pointer_over_agent: true,
            ..Default::default()
        };
        for mode in MODES {
            assert_eq!(
                decide(mode, &signals),
                (true, PassThroughReason::PointerUnhealthy)
            );
        }
    }

    #[test]
    fn test_locked_off_ignores_pointer_position() {
        let signals = healthy();
        assert_eq!(
            decide(ArbitrationMode::LockedOff, &signals),
            (false, PassThroughReason::LockedOff)
        );
    }

    #[test]
    fn test_auto_hit_test() {
        let mut signals = healthy();
        assert_eq!(decide(ArbitrationMode::Auto, &signals).0, true);
        signals.pointer_over_agent = true;
        assert_eq!(decide(ArbitrationMode::Auto, &signals).0, false);
        assert_eq!(decide(ArbitrationMode::LockedOn, &signals).0, true);
    }

    #[test]
    fn test_apply_is_idempotent() {
        let platform = HeadlessPlatform::default();
        let mut controller = ClickThroughController::new(true);

        assert!(!controller.apply(true, &platform));
        assert!(controller.apply(false, &platform));
        assert!(!controller.apply(false, &platform));
        assert_eq!(platform.toggle_calls(), vec![false]);
    }

    #[test]
    fn test_failed_toggle_keeps_attempted_value() {
        let platform = HeadlessPlatform::default();
        platform.fail_toggles(true);
        let mut controller = ClickThroughController::new(true);

        controller.apply(false, &platform);
        assert!(!controller.is_pass_through());
        // 같은 값으로는 재시도하지 않는다
        assert!(!controller.apply(false, &platform));

        platform.fail_toggles(false);
        assert!(controller.apply(true, &platform));
        assert!(platform.click_through());
    }

    #[test]
    fn test_mode_round_trip_restores_rule_evaluation() {
        let platform = HeadlessPlatform::default();
        let mut controller = ClickThroughController::new(true);
        let mut signals = healthy();
        signals.pointer_over_agent = true;

        controller.set_mode(ArbitrationMode::LockedOn);
        controller.reconcile(&signals, &platform);
        assert!(controller.is_pass_through());

        controller.set_mode(ArbitrationMode::Auto);
        controller.reconcile(&signals, &platform);
        assert!(!controller.is_pass_through());
        assert_eq!(
            controller.last_reason(),
            Some(PassThroughReason::PointerOverAgent)
        );
    }

    #[test]
    fn test_external_change_switches_to_locked_mode() {
        let mut controller = ClickThroughController::new(true);

        // 메아리
        assert!(!controller.on_external_change(true));
        assert_eq!(controller.mode(), ArbitrationMode::Auto);

        assert!(controller.on_external_change(false));
        assert_eq!(controller.mode(), ArbitrationMode::LockedOff);
        assert!(!controller.is_pass_through());
    }
}
