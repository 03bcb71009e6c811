#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Frame driver that routes input through the systems into the world.

use snow_day_core::{Command, Event, FrameInput, GamePhase, RenderSnapshot, Tuning};
use snow_day_system_encounter::Encounter;
use snow_day_system_movement::Movement;
use snow_day_world::{self as world, query, SetupError, World};

/// Outcome of a single simulated frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepStatus {
    /// The game keeps running.
    Running,
    /// A quit request stopped the game; further frames are ignored.
    Halted,
}

/// Owns the world and every system, advancing them one frame at a time.
#[derive(Debug)]
pub struct Simulation {
    world: World,
    movement: Movement,
    encounter: Encounter,
    events: Vec<Event>,
    commands: Vec<Command>,
    halted: bool,
}

impl Simulation {
    /// Creates a simulation of the house on the title screen.
    pub fn new(tuning: Tuning, seed: u64) -> Result<Self, SetupError> {
        World::new(tuning, seed).map(Self::from_world)
    }

    /// Wraps an already assembled world.
    #[must_use]
    pub fn from_world(world: World) -> Self {
        let encounter = Encounter::new(query::tuning(&world));
        Self {
            world,
            movement: Movement::default(),
            encounter,
            events: Vec::new(),
            commands: Vec::new(),
            halted: false,
        }
    }

    /// Simulates one frame with the provided input.
    ///
    /// Confirmation is handled before the playing update, so the frame that
    /// starts a session also runs its first update.
    pub fn step(&mut self, input: &FrameInput) -> StepStatus {
        if self.halted {
            return StepStatus::Halted;
        }

        self.events.clear();
        if input.quit {
            log::info!("quit requested after {} ticks", query::tick(&self.world));
            self.halted = true;
            return StepStatus::Halted;
        }

        if input.confirm {
            match query::phase(&self.world) {
                GamePhase::Title => self.apply(Command::StartSession),
                GamePhase::Win => self.apply(Command::ReturnToTitle),
                GamePhase::Playing => {}
            }
        }

        if query::phase(&self.world) == GamePhase::Playing {
            self.play_frame(input);
        }

        StepStatus::Running
    }

    fn play_frame(&mut self, input: &FrameInput) {
        self.apply(Command::Tick);

        self.movement.handle(
            &self.events,
            input,
            &query::actor_view(&self.world),
            &mut self.commands,
        );
        self.flush_commands();

        self.encounter.handle(
            &self.events,
            input,
            &query::actor_view(&self.world),
            &query::target_view(&self.world),
            &mut self.commands,
        );
        self.flush_commands();

        self.apply(Command::Settle);
    }

    fn flush_commands(&mut self) {
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, &mut self.events);
        }
    }

    fn apply(&mut self, command: Command) {
        world::apply(&mut self.world, command, &mut self.events);
    }

    /// Authoritative world driven by the simulation.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Active phase of the game.
    #[must_use]
    pub fn phase(&self) -> GamePhase {
        query::phase(&self.world)
    }

    /// Events produced by the most recent frame.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Reports whether a quit request stopped the simulation.
    #[must_use]
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Everything presentation needs to draw the current frame.
    #[must_use]
    pub fn snapshot(&self) -> RenderSnapshot {
        query::render_snapshot(&self.world)
    }
}
