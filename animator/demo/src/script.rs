//! Simulated agent activity
//!
//! A fixed loop of the event names a coding agent would emit. Names are
//! passed to the controller unchanged so alias resolution does the work.

use animator_core::queue::after_loops;
use animator_core::StateController;

/// What to do with an event besides switching to it
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// Switch immediately
    Set,
    /// Switch and run faster until the next event
    Burst(u32),
    /// Switch, then drift back to idle after `n` loops
    ThenRest(usize),
}

/// One scripted agent event
#[derive(Clone, Copy, Debug)]
pub struct AgentEvent {
    /// External event name
    pub name: &'static str,
    /// How to apply it
    pub action: Action,
}

const fn event(name: &'static str, action: Action) -> AgentEvent {
    AgentEvent { name, action }
}

/// The demo's event loop, replayed forever
pub const SCRIPT: &[AgentEvent] = &[
    event("startup", Action::ThenRest(1)),
    event("thinking", Action::Set),
    event("grep", Action::Set),
    event("reading", Action::Set),
    event("editing", Action::Burst(10)),
    event("bash", Action::Set),
    event("search", Action::Set),
    event("failed", Action::Set),
    event("editing", Action::Set),
    event("done", Action::ThenRest(2)),
];

/// Feed one event to the controller
pub fn apply(controller: &StateController, event: &AgentEvent) {
    match event.action {
        Action::Set => controller.set_state(event.name),
        Action::Burst(fps) => controller.set_state_with_fps(event.name, fps),
        Action::ThenRest(loops) => {
            controller.set_state(event.name);
            let idle = controller.idle_state();
            controller.queue_state(&idle, after_loops(loops));
        }
    }
    tracing::debug!(event = event.name, state = %controller.state(), "Agent event applied");
}
