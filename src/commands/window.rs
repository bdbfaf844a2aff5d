use crate::error::AppError;
use crate::models::agent::AgentId;
use crate::models::animation::AnimationState;
use crate::models::geometry::Position;
use crate::services::arbitration::ArbitrationMode;
use crate::state::AppState;

/// 트레이/상태 패널에서 모드 선택
pub fn set_click_through_mode(app: &AppState, mode: ArbitrationMode) {
    let mut overlay = app.lock();
    overlay.arbitration.set_mode(mode);
    app.reconcile(&mut overlay);
}

/// 외부에서 클릭 통과 값이 바뀌었다는 알림
pub fn on_click_through_changed(app: &AppState, enabled: bool) {
    let mut overlay = app.lock();
    if overlay.arbitration.on_external_change(enabled) {
        tracing::info!("click-through changed externally to {enabled}");
        app.reconcile(&mut overlay);
    }
}

pub fn on_mouse_hook_error(app: &AppState, message: String) {
    tracing::warn!("mouse hook error: {message}");
    let mut overlay = app.lock();
    overlay.pointer.raise_hook_error(message);
    app.reconcile(&mut overlay);
}

pub fn dismiss_permission(app: &AppState) {
    let mut overlay = app.lock();
    overlay.pointer.dismiss();
    app.reconcile(&mut overlay);
}

pub fn open_accessibility_settings(app: &AppState) {
    if let Err(e) = app.platform.open_accessibility_settings() {
        tracing::warn!("failed to open accessibility settings: {e}");
    }
}

pub fn set_menu_open(app: &AppState, open: bool) {
    let mut overlay = app.lock();
    overlay.surfaces.menu_open = open;
    app.reconcile(&mut overlay);
}

pub fn set_control_hover(app: &AppState, active: bool) {
    let mut overlay = app.lock();
    overlay.surfaces.control_hover = active;
    app.reconcile(&mut overlay);
}

pub fn set_control_panel_visible(app: &AppState, visible: bool) {
    let mut overlay = app.lock();
    overlay.surfaces.control_panel_visible = visible;
    app.reconcile(&mut overlay);
}

/// 드래그 시작: idle 로 멈추고 목표를 버린다. 메뉴는 닫는다.
pub fn drag_start(app: &AppState, agent_id: AgentId, pointer: Position) -> Result<(), AppError> {
    let mut overlay = app.lock();
    let agent = overlay
        .agent_mut(agent_id)
        .ok_or(AppError::UnknownAgent(agent_id))?;

    agent.is_dragging = true;
    agent.animation = AnimationState::Idle;
    agent.target = None;
    agent.drag_offset = Position::new(pointer.x - agent.position.x, pointer.y - agent.position.y);

    overlay.surfaces.menu_open = false;
    app.reconcile(&mut overlay);
    Ok(())
}

pub fn drag_move(app: &AppState, agent_id: AgentId, pointer: Position) -> Result<(), AppError> {
    let frame = app.config.display.base_frame_size;
    let mut overlay = app.lock();
    let arena = overlay.arena;
    let agent = overlay
        .agent_mut(agent_id)
        .ok_or(AppError::UnknownAgent(agent_id))?;
    if !agent.is_dragging {
        return Ok(());
    }

    let desired = Position::new(
        pointer.x - agent.drag_offset.x,
        pointer.y - agent.drag_offset.y,
    );
    agent.position = arena.constrain(desired, agent.size(frame));
    Ok(())
}

pub fn drag_stop(app: &AppState, agent_id: AgentId) -> Result<(), AppError> {
    let mut overlay = app.lock();
    let agent = overlay
        .agent_mut(agent_id)
        .ok_or(AppError::UnknownAgent(agent_id))?;
    agent.is_dragging = false;
    app.reconcile(&mut overlay);
    Ok(())
}
