pub mod pets;
pub mod window;

use crate::error::AppError;
use crate::models::event::OverlayEvent;
use crate::state::AppState;

/// 이벤트 하나를 해당 커맨드로 보낸다
pub fn dispatch(app: &AppState, event: OverlayEvent) -> Result<(), AppError> {
    match event {
        OverlayEvent::ClickThroughChanged { enabled } => {
            window::on_click_through_changed(app, enabled)
        }
        OverlayEvent::ClickThroughModeChanged { mode } => window::set_click_through_mode(app, mode),
        OverlayEvent::MouseHookError { message } => window::on_mouse_hook_error(app, message),

        OverlayEvent::AddPet { pet_id } => {
            pets::add_pet(app, pet_id.as_deref())?;
        }
        OverlayEvent::RemovePet => {
            pets::remove_last_pet(app)?;
        }
        OverlayEvent::ChangeCharacter { agent_id, pet_id } => {
            pets::change_character(app, agent_id, &pet_id)?
        }
        OverlayEvent::ScaleChanged { agent_id, scale } => {
            pets::set_scale(app, agent_id, scale)?;
        }
        OverlayEvent::ScaleStep { agent_id, grow } => {
            pets::step_scale(app, agent_id, grow)?;
        }
        OverlayEvent::Attack { agent_id } => pets::trigger_attack(app, agent_id)?,
        OverlayEvent::Run { agent_id } => pets::trigger_run(app, agent_id)?,

        OverlayEvent::MenuOpened => window::set_menu_open(app, true),
        OverlayEvent::MenuClosed => window::set_menu_open(app, false),
        OverlayEvent::DragStarted { agent_id, pointer } => {
            window::drag_start(app, agent_id, pointer)?
        }
        OverlayEvent::DragMoved { agent_id, pointer } => window::drag_move(app, agent_id, pointer)?,
        OverlayEvent::DragStopped { agent_id } => window::drag_stop(app, agent_id)?,
        OverlayEvent::ControlHover { active } => window::set_control_hover(app, active),
        OverlayEvent::ControlPanelToggled { visible } => {
            window::set_control_panel_visible(app, visible)
        }

        OverlayEvent::PermissionDismissed => window::dismiss_permission(app),
        OverlayEvent::OpenAccessibilitySettings => window::open_accessibility_settings(app),
    }
    Ok(())
}
