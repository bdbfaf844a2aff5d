use crate::config::PointerConfig;
use crate::models::geometry::Position;
use crate::state::AppState;
use serde::Serialize;
use tokio::time::{Duration, MissedTickBehavior};

/// 포인터 피드 건강 상태
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PointerHealth {
    pub last_update_ms: u64,
    pub is_healthy: bool,
    pub permission_required: bool,
    /// 마우스 훅 실패 메시지 (권한 안내용)
    pub hook_error: Option<String>,
}

/// health check 한 번의 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthTransition {
    Unchanged,
    BecameStale,
    PermissionRaised,
}

/// 폴링 결과와 경과 시간으로 피드 상태를 추적한다
#[derive(Debug, Clone)]
pub struct PointerMonitor {
    health: PointerHealth,
    position: Option<Position>,
    /// 권한 요청을 이미 한 번 올렸는지. 성공 샘플이 오면 풀린다.
    permission_latched: bool,
}

impl PointerMonitor {
    pub fn new(now: u64) -> Self {
        Self {
            health: PointerHealth {
                last_update_ms: now,
                is_healthy: true,
                permission_required: false,
                hook_error: None,
            },
            position: None,
            permission_latched: false,
        }
    }

    pub fn health(&self) -> &PointerHealth {
        &self.health
    }

    /// 피드가 건강할 때만 마지막 위치를 신뢰한다
    pub fn known_position(&self) -> Option<Position> {
        self.position.filter(|_| self.health.is_healthy)
    }

    /// 성공 샘플 (이미 로컬 좌표로 변환된 값). 비건강 → 건강 전환이면 true.
    /// permission_required 는 명시적 해제 전까지 유지한다.
    pub fn record_sample(&mut self, now: u64, local: Position) -> bool {
        let recovered = !self.health.is_healthy;
        self.health.last_update_ms = now;
        self.health.is_healthy = true;
        self.permission_latched = false;
        self.position = Some(local);
        if recovered {
            tracing::info!("pointer feed recovered");
        }
        recovered
    }

    /// 조회 실패 또는 값 없음. 즉시 비건강 처리하지만 권한 요청은 아직 하지 않는다.
    pub fn record_miss(&mut self) -> bool {
        let changed = self.health.is_healthy;
        self.health.is_healthy = false;
        changed
    }

    /// 마지막 성공 샘플의 나이를 두 임계값과 비교한다
    pub fn check_health(&mut self, now: u64, config: &PointerConfig) -> HealthTransition {
        let age = now.saturating_sub(self.health.last_update_ms);
        let mut transition = HealthTransition::Unchanged;

        if age > config.stale_threshold_ms && self.health.is_healthy {
            self.health.is_healthy = false;
            transition = HealthTransition::BecameStale;
        }

        if age > config.permission_threshold_ms && !self.permission_latched {
            self.health.is_healthy = false;
            self.permission_latched = true;
            self.health.permission_required = true;
            transition = HealthTransition::PermissionRaised;
        }

        transition
    }

    /// 마우스 훅 에러 이벤트. 권한 요청 경로로 보낸다.
    pub fn raise_hook_error(&mut self, message: String) {
        self.health.hook_error = Some(message);
        self.health.permission_required = true;
        self.permission_latched = true;
    }

    /// 사용자가 권한 안내를 닫음
    pub fn dismiss(&mut self) {
        self.health.permission_required = false;
        self.health.hook_error = None;
    }
}

/// 포인터 폴링 루프.
/// poll_interval_ms 간격으로 전역 포인터를 읽어 공유 상태에 반영하고 클릭 통과를 재판정한다.
pub async fn run_pointer_poll(app: AppState) {
    let mut ticker =
        tokio::time::interval(Duration::from_millis(app.config.pointer.poll_interval_ms));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    tracing::info!(
        "pointer poll started (interval={}ms)",
        app.config.pointer.poll_interval_ms
    );

    loop {
        ticker.tick().await;
        poll_once(&app);
    }
}

pub(crate) fn poll_once(app: &AppState) {
    // 플랫폼 조회는 락 밖에서
    let sample = match app.platform.pointer_position() {
        Ok(Some(pos)) => Some(pos),
        Ok(None) => None,
        Err(e) => {
            tracing::trace!("pointer query failed: {e}");
            None
        }
    };

    let now = app.now_ms();
    let mut overlay = app.lock();
    match sample {
        Some(desktop) => {
            let local = overlay.arena.bounds.to_local(desktop);
            overlay.pointer.record_sample(now, local);
        }
        None => {
            if overlay.pointer.record_miss() {
                tracing::debug!("pointer feed miss");
            }
        }
    }
    app.reconcile(&mut overlay);
}

/// 느린 health check 루프
pub async fn run_health_check(app: AppState) {
    let mut ticker = tokio::time::interval(Duration::from_millis(
        app.config.pointer.health_check_interval_ms,
    ));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;
        check_once(&app);
    }
}

pub(crate) fn check_once(app: &AppState) {
    let now = app.now_ms();
    let mut overlay = app.lock();
    match overlay.pointer.check_health(now, &app.config.pointer) {
        HealthTransition::Unchanged => return,
        HealthTransition::BecameStale => {
            tracing::info!(
                "pointer feed stale (last update {}ms ago)",
                now.saturating_sub(overlay.pointer.health().last_update_ms)
            );
        }
        HealthTransition::PermissionRaised => {
            tracing::warn!("pointer feed absent too long, accessibility permission required");
        }
    }
    app.reconcile(&mut overlay);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> PointerConfig {
        PointerConfig {
            poll_interval_ms: 80,
            stale_threshold_ms: 800,
            permission_threshold_ms: 2000,
            health_check_interval_ms: 400,
        }
    }

    #[test]
    fn test_fresh_monitor_is_healthy() {
        let mut monitor = PointerMonitor::new(0);
        assert_eq!(monitor.check_health(500, &config()), HealthTransition::Unchanged);
        assert!(monitor.health().is_healthy);
    }

    #[test]
    fn test_stale_after_first_threshold() {
        let mut monitor = PointerMonitor::new(0);
        monitor.record_sample(100, Position::new(1.0, 1.0));
        assert_eq!(monitor.check_health(1000, &config()), HealthTransition::BecameStale);
        assert!(!monitor.health().is_healthy);
        assert!(!monitor.health().permission_required);
        assert_eq!(monitor.known_position(), None);
    }

    #[test]
    fn test_both_thresholds_exceeded() {
        let mut monitor = PointerMonitor::new(0);
        monitor.record_sample(1000, Position::new(1.0, 1.0));
        monitor.check_health(3100, &config());
        assert!(!monitor.health().is_healthy);
        assert!(monitor.health().permission_required);
    }

    #[test]
    fn test_permission_raised_once() {
        let mut monitor = PointerMonitor::new(0);
        assert_eq!(monitor.check_health(2100, &config()), HealthTransition::PermissionRaised);
        monitor.dismiss();
        assert_eq!(monitor.check_health(2500, &config()), HealthTransition::Unchanged);
        assert!(!monitor.health().permission_required);
    }

    #[test]
    fn test_recovery_keeps_permission_until_dismissed() {
        let mut monitor = PointerMonitor::new(0);
        monitor.check_health(2100, &config());

        assert!(monitor.record_sample(2200, Position::new(5.0, 5.0)));
        assert!(monitor.health().is_healthy);
        assert!(monitor.health().permission_required);

        monitor.dismiss();
        assert!(!monitor.health().permission_required);

        // 래치가 풀렸으므로 다시 끊기면 다시 요청한다
        assert_eq!(monitor.check_health(4300, &config()), HealthTransition::PermissionRaised);
    }

    #[test]
    fn test_miss_marks_unhealthy_without_permission() {
        let mut monitor = PointerMonitor::new(0);
        monitor.record_sample(10, Position::new(1.0, 2.0));
        assert!(monitor.record_miss());
        assert!(!monitor.record_miss());
        assert!(!monitor.health().is_healthy);
        assert!(!monitor.health().permission_required);
    }

    #[test]
    fn test_hook_error_requires_permission() {
        let mut monitor = PointerMonitor::new(0);
        monitor.raise_hook_error("accessibility denied".into());
        assert!(monitor.health().permission_required);
        assert_eq!(monitor.health().hook_error.as_deref(), Some("accessibility denied"));
        monitor.dismiss();
        assert!(monitor.health().hook_error.is_none());
    }
}
