use crate::models::event::OverlayEvent;
use crate::services::arbitration::ArbitrationMode;

/// 트레이 메뉴 (id, 라벨)
///   자동 모드
///   클릭 통과 ON
///   클릭 통과 OFF
///   종료
pub const MENU_ITEMS: [(&str, &str); 4] = [
    ("mode_auto", "자동 모드"),
    ("mode_on", "클릭 통과 ON"),
    ("mode_off", "클릭 통과 OFF"),
    ("quit", "종료"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayAction {
    SetMode(ArbitrationMode),
    Quit,
}

impl TrayAction {
    /// 코어로 보낼 이벤트. 종료는 이벤트가 아니라 런타임이 처리한다.
    pub fn into_event(self) -> Option<OverlayEvent> {
        match self {
            TrayAction::SetMode(mode) => Some(OverlayEvent::ClickThroughModeChanged { mode }),
            TrayAction::Quit => None,
        }
    }
}

/// 메뉴에 없는 id 는 None
pub fn on_menu_event(id: &str) -> Option<TrayAction> {
    let (_, label) = MENU_ITEMS.iter().find(|(item, _)| *item == id)?;
    tracing::debug!("tray menu '{label}' selected");
    match id {
        "mode_auto" => Some(TrayAction::SetMode(ArbitrationMode::Auto)),
        "mode_on" => Some(TrayAction::SetMode(ArbitrationMode::LockedOn)),
        "mode_off" => Some(TrayAction::SetMode(ArbitrationMode::LockedOff)),
        "quit" => Some(TrayAction::Quit),
        _ => None,
    }
}
