#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Scripted controller that drives the agent on a fixed cadence.
//!
//! The controller is a pure system: it consumes world events and an agent
//! snapshot, accumulates simulated time, and emits at most one step command
//! per invocation once the configured delay has elapsed. It never inspects
//! world internals and never decides where the agent goes; it simply asks
//! the agent to continue in whichever direction it currently faces, leaving
//! collision reactions to the world.

use std::time::Duration;

use blockade_core::{AgentMode, AgentSnapshot, Command, Event};

const DEFAULT_COMMAND_DELAY: Duration = Duration::from_millis(500);

/// Configuration parameters required to construct the controller.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    command_delay: Duration,
}

impl Config {
    /// Creates a new configuration using the provided step cadence.
    #[must_use]
    pub const fn new(command_delay: Duration) -> Self {
        Self { command_delay }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_COMMAND_DELAY)
    }
}

/// Pure system that emits step commands on a fixed cadence while running.
#[derive(Debug)]
pub struct Controller {
    command_delay: Duration,
    elapsed: Duration,
    running: bool,
}

impl Controller {
    /// Creates a new controller using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            command_delay: config.command_delay,
            elapsed: Duration::ZERO,
            running: false,
        }
    }

    /// Reports whether the controller is currently driving the agent.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Arms the controller and switches the agent into its moving mode.
    pub fn start(&mut self, out: &mut Vec<Command>) {
        self.running = true;
        self.elapsed = Duration::ZERO;
        out.push(Command::SetAgentMode {
            mode: AgentMode::Moving,
        });
    }

    /// Disarms the controller and switches the agent back to idle.
    pub fn stop(&mut self, out: &mut Vec<Command>) {
        self.running = false;
        self.elapsed = Duration::ZERO;
        out.push(Command::SetAgentMode {
            mode: AgentMode::Idle,
        });
    }

    /// Disarms the controller and requests a fresh run from the world.
    pub fn reset(&mut self, out: &mut Vec<Command>) {
        self.running = false;
        self.elapsed = Duration::ZERO;
        out.push(Command::SetAgentMode {
            mode: AgentMode::Idle,
        });
        out.push(Command::ResetRun);
    }

    /// Consumes events and the agent snapshot to emit step commands.
    ///
    /// Emits at most one step per invocation: when the accumulated time
    /// reaches the configured delay the accumulator rewinds to zero and any
    /// surplus is discarded, so a long tick never causes a burst of steps.
    pub fn handle(&mut self, events: &[Event], agent: AgentSnapshot, out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::RunWon { .. } | Event::RunLost { .. } => {
                    self.running = false;
                    self.elapsed = Duration::ZERO;
                    return;
                }
                Event::TimeAdvanced { dt } if self.running => {
                    self.elapsed = self.elapsed.saturating_add(*dt);
                }
                _ => {}
            }
        }

        if !self.running || self.elapsed < self.command_delay {
            return;
        }

        self.elapsed = Duration::ZERO;
        out.push(Command::StepAgent {
            direction: agent.facing,
        });
    }
}

impl Default for Controller {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::{Config, Controller};
    use blockade_core::{
        AgentMode, AgentSnapshot, CellCoord, Command, Direction, Event, LossReason,
    };
    use std::time::Duration;

    fn idle_agent() -> AgentSnapshot {
        AgentSnapshot {
            cell: CellCoord::new(4, 4),
            facing: Direction::Right,
            mode: AgentMode::Moving,
        }
    }

    fn time_advanced(millis: u64) -> Event {
        Event::TimeAdvanced {
            dt: Duration::from_millis(millis),
        }
    }

    #[test]
    fn start_switches_the_agent_into_moving_mode() {
        let mut controller = Controller::default();
        let mut commands = Vec::new();
        controller.start(&mut commands);
        assert_eq!(commands, vec![Command::SetAgentMode {
            mode: AgentMode::Moving,
        }]);
        assert!(controller.is_running());
    }

    #[test]
    fn no_step_is_emitted_before_the_delay_elapses() {
        let mut controller = Controller::default();
        let mut commands = Vec::new();
        controller.start(&mut commands);
        commands.clear();

        controller.handle(&[time_advanced(499)], idle_agent(), &mut commands);
        assert!(commands.is_empty());
    }

    #[test]
    fn one_step_is_emitted_in_the_facing_direction() {
        let mut controller = Controller::default();
        let mut commands = Vec::new();
        controller.start(&mut commands);
        commands.clear();

        controller.handle(&[time_advanced(500)], idle_agent(), &mut commands);
        assert_eq!(commands, vec![Command::StepAgent {
            direction: Direction::Right,
        }]);
    }

    #[test]
    fn surplus_time_is_discarded_after_a_step() {
        let mut controller = Controller::default();
        let mut commands = Vec::new();
        controller.start(&mut commands);
        commands.clear();

        // 0.9s elapses in one tick: one step, the extra 0.4s is dropped.
        controller.handle(&[time_advanced(900)], idle_agent(), &mut commands);
        assert_eq!(commands.len(), 1);

        commands.clear();
        controller.handle(&[time_advanced(400)], idle_agent(), &mut commands);
        assert!(commands.is_empty());

        controller.handle(&[time_advanced(100)], idle_agent(), &mut commands);
        assert_eq!(commands.len(), 1);
    }

    #[test]
    fn a_long_tick_never_emits_a_burst() {
        let mut controller = Controller::default();
        let mut commands = Vec::new();
        controller.start(&mut commands);
        commands.clear();

        controller.handle(&[time_advanced(5_000)], idle_agent(), &mut commands);
        assert_eq!(commands.len(), 1);
    }

    #[test]
    fn idle_controller_ignores_time() {
        let mut controller = Controller::default();
        let mut commands = Vec::new();
        controller.handle(&[time_advanced(10_000)], idle_agent(), &mut commands);
        assert!(commands.is_empty());
    }

    #[test]
    fn a_won_run_disarms_the_controller() {
        let mut controller = Controller::default();
        let mut commands = Vec::new();
        controller.start(&mut commands);
        commands.clear();

        controller.handle(
            &[Event::RunWon {
                cell: CellCoord::new(2, 2),
            }],
            idle_agent(),
            &mut commands,
        );
        assert!(!controller.is_running());

        controller.handle(&[time_advanced(1_000)], idle_agent(), &mut commands);
        assert!(commands.is_empty());
    }

    #[test]
    fn a_lost_run_disarms_the_controller() {
        let mut controller = Controller::default();
        let mut commands = Vec::new();
        controller.start(&mut commands);
        commands.clear();

        controller.handle(
            &[Event::RunLost {
                reason: LossReason::LeftWorld,
            }],
            idle_agent(),
            &mut commands,
        );
        assert!(!controller.is_running());
    }

    #[test]
    fn reset_requests_a_fresh_run() {
        let mut controller = Controller::new(Config::new(Duration::from_millis(250)));
        let mut commands = Vec::new();
        controller.start(&mut commands);
        commands.clear();

        controller.reset(&mut commands);
        assert_eq!(
            commands,
            vec![
                Command::SetAgentMode {
                    mode: AgentMode::Idle,
                },
                Command::ResetRun,
            ]
        );
        assert!(!controller.is_running());
    }
}
