use crate::error::PlatformError;
use crate::models::geometry::{Position, ScreenBounds, ScreenInfo};
use crate::platform::Platform;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug)]
struct Inner {
    click_through: bool,
    toggle_calls: Vec<bool>,
    fail_toggles: bool,
    pointer: Option<Position>,
    pointer_error: bool,
    monitors: Vec<ScreenInfo>,
    window_bounds: Option<ScreenBounds>,
    settings_opened: usize,
}

/// 창 없이 동작하는 플랫폼 구현.
/// 발행된 명령을 기록하고, 포인터 위치는 외부에서 주입한다.
#[derive(Debug)]
pub struct HeadlessPlatform {
    inner: Mutex<Inner>,
}

impl Default for HeadlessPlatform {
    fn default() -> Self {
        Self::with_monitors(vec![ScreenInfo {
            x: 0,
            y: 0,
            width: 1920,
            height: 1080,
        }])
    }
}

impl HeadlessPlatform {
    pub fn with_monitors(monitors: Vec<ScreenInfo>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                click_through: true,
                toggle_calls: Vec::new(),
                fail_toggles: false,
                pointer: None,
                pointer_error: false,
                monitors,
                window_bounds: None,
                settings_opened: 0,
            }),
        }
    }

    fn inner(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn set_pointer(&self, pointer: Option<Position>) {
        self.inner().pointer = pointer;
    }

    /// true면 포인터 조회가 에러를 반환한다 (훅 권한 없음 등)
    pub fn set_pointer_error(&self, failing: bool) {
        self.inner().pointer_error = failing;
    }

    pub fn fail_toggles(&self, failing: bool) {
        self.inner().fail_toggles = failing;
    }

    pub fn click_through(&self) -> bool {
        self.inner().click_through
    }

    /// 지금까지 발행된 set_click_through 인자 목록
    pub fn toggle_calls(&self) -> Vec<bool> {
        self.inner().toggle_calls.clone()
    }

    pub fn window_bounds(&self) -> Option<ScreenBounds> {
        self.inner().window_bounds
    }

    pub fn settings_opened(&self) -> usize {
        self.inner().settings_opened
    }
}

impl Platform for HeadlessPlatform {
    fn set_click_through(&self, enabled: bool) -> Result<(), PlatformError> {
        let mut inner = self.inner();
        inner.toggle_calls.push(enabled);
        if inner.fail_toggles {
            return Err(PlatformError::CommandFailed(
                "set_ignore_cursor_events rejected".into(),
            ));
        }
        inner.click_through = enabled;
        tracing::debug!("headless: click-through = {enabled}");
        Ok(())
    }

    fn get_click_through(&self) -> Result<bool, PlatformError> {
        Ok(self.inner().click_through)
    }

    fn pointer_position(&self) -> Result<Option<Position>, PlatformError> {
        let inner = self.inner();
        if inner.pointer_error {
            return Err(PlatformError::PointerUnavailable);
        }
        Ok(inner.pointer)
    }

    fn primary_monitor(&self) -> Result<Option<ScreenInfo>, PlatformError> {
        Ok(self.inner().monitors.first().copied())
    }

    fn monitors(&self) -> Result<Vec<ScreenInfo>, PlatformError> {
        Ok(self.inner().monitors.clone())
    }

    fn set_window_bounds(&self, bounds: &ScreenBounds) -> Result<(), PlatformError> {
        self.inner().window_bounds = Some(*bounds);
        Ok(())
    }

    fn open_accessibility_settings(&self) -> Result<(), PlatformError> {
        self.inner().settings_opened += 1;
        Err(PlatformError::Unsupported(
            "accessibility settings have no headless equivalent",
        ))
    }
}
