use crate::models::agent::AgentId;
use crate::services::{behavior, movement};
use crate::state::AppState;
use tokio::task::JoinHandle;

/// 에이전트 하나에 딸린 주기 작업. drop 되면 함께 취소된다.
#[derive(Debug)]
pub struct AgentTasks {
    behavior: JoinHandle<()>,
    movement: JoinHandle<()>,
}

impl Drop for AgentTasks {
    fn drop(&mut self) {
        self.behavior.abort();
        self.movement.abort();
    }
}

/// 행동 결정 루프와 이동 루프를 띄우고 레지스트리에 등록한다.
/// tokio 런타임 안에서 호출해야 한다.
pub fn spawn_agent_tasks(app: &AppState, agent_id: AgentId) {
    let tasks = AgentTasks {
        behavior: tokio::spawn(behavior::run_behavior_loop(app.clone(), agent_id)),
        movement: tokio::spawn(movement::run_movement_loop(app.clone(), agent_id)),
    };
    app.lock_tasks().insert(agent_id, tasks);
    tracing::debug!("agent {agent_id} tasks started");
}

/// 에이전트 작업 취소
pub fn cancel_agent_tasks(app: &AppState, agent_id: AgentId) {
    if app.lock_tasks().remove(&agent_id).is_some() {
        tracing::debug!("agent {agent_id} tasks cancelled");
    }
}
