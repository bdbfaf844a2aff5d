pub mod headless;

use crate::error::PlatformError;
use crate::models::geometry::{Position, ScreenBounds, ScreenInfo};

/// 윈도우/플랫폼 협력자.
/// 코어는 이 트레이트를 통해서만 창 상태를 바꾸고 전역 포인터를 읽는다.
pub trait Platform: Send + Sync {
    /// 마우스 입력을 아래 창으로 통과시킬지 설정한다
    fn set_click_through(&self, enabled: bool) -> Result<(), PlatformError>;

    fn get_click_through(&self) -> Result<bool, PlatformError>;

    /// 전역 포인터 위치 (데스크톱 좌표). None은 읽기 실패와 같게 취급한다.
    fn pointer_position(&self) -> Result<Option<Position>, PlatformError>;

    fn primary_monitor(&self) -> Result<Option<ScreenInfo>, PlatformError>;

    fn monitors(&self) -> Result<Vec<ScreenInfo>, PlatformError>;

    fn set_window_bounds(&self, bounds: &ScreenBounds) -> Result<(), PlatformError>;

    fn open_accessibility_settings(&self) -> Result<(), PlatformError>;
}
