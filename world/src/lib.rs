#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Snow Day.

mod combat;
mod effects;
mod grid;
mod hud;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use snow_day_core::{
    ActorId, ActorSnapshot, CellCoord, Command, Direction, Event, GamePhase, SpeechSnapshot,
    TargetId, TargetSnapshot, Tuning, TuningError,
};
use thiserror::Error;

pub use grid::{GridWorld, LayoutError, HOUSE_LAYOUT};

use effects::EffectTimeline;
use hud::MessageBus;

const OPENING_PROMPT: &str = "Find Mom and Dad in the house!";
const VICTORY_ANNOUNCEMENT: &str = "BOTH PARENTS DEFEATED! SNOW DAY WINS!";

/// Cells where actors and targets begin every session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Spawns {
    /// Starting cell of each actor, indexed by [`ActorId::index`].
    pub actors: [CellCoord; 2],
    /// Working cell of each target, indexed by [`TargetId::index`].
    pub targets: [CellCoord; 2],
}

impl Spawns {
    /// Spawn points matching [`HOUSE_LAYOUT`].
    pub const HOUSE: Self = Self {
        actors: [CellCoord::new(2, 8), CellCoord::new(3, 8)],
        targets: [CellCoord::new(22, 9), CellCoord::new(5, 16)],
    };
}

impl Default for Spawns {
    fn default() -> Self {
        Self::HOUSE
    }
}

/// Reasons a world cannot be assembled.
#[derive(Debug, Error)]
pub enum SetupError {
    /// The layout or the spawn points are unusable.
    #[error(transparent)]
    Layout(#[from] LayoutError),
    /// The tuning values contradict each other.
    #[error(transparent)]
    Tuning(#[from] TuningError),
}

/// Represents the authoritative Snow Day world state.
#[derive(Debug)]
pub struct World {
    grid: GridWorld,
    tuning: Tuning,
    phase: GamePhase,
    actors: [Actor; 2],
    targets: [Target; 2],
    effects: EffectTimeline,
    hud: MessageBus,
    defeated_count: u32,
    victory_countdown: Option<u32>,
    tick_index: u64,
    rng: ChaCha8Rng,
}

impl World {
    /// Creates the house world on the title screen.
    ///
    /// `seed` drives every random roll made during the session.
    pub fn new(tuning: Tuning, seed: u64) -> Result<Self, SetupError> {
        Self::with_layout(GridWorld::house(), Spawns::HOUSE, tuning, seed)
    }

    /// Creates a world from a custom grid and spawn points.
    pub fn with_layout(
        grid: GridWorld,
        spawns: Spawns,
        tuning: Tuning,
        seed: u64,
    ) -> Result<Self, SetupError> {
        tuning.validate()?;
        for actor in ActorId::ALL {
            ensure_open(&grid, actor.name(), spawns.actors[actor.index()])?;
        }
        for target in TargetId::ALL {
            ensure_open(&grid, target.name(), spawns.targets[target.index()])?;
        }

        let actors = ActorId::ALL.map(|id| Actor::new(id, spawns.actors[id.index()]));
        let targets =
            TargetId::ALL.map(|id| Target::new(id, spawns.targets[id.index()], tuning.max_health));
        Ok(Self {
            grid,
            tuning,
            phase: GamePhase::Title,
            actors,
            targets,
            effects: EffectTimeline::default(),
            hud: MessageBus::default(),
            defeated_count: 0,
            victory_countdown: None,
            tick_index: 0,
            rng: ChaCha8Rng::seed_from_u64(seed),
        })
    }

    fn target_mut(&mut self, target: TargetId) -> &mut Target {
        &mut self.targets[target.index()]
    }

    fn enter_phase(&mut self, phase: GamePhase, out_events: &mut Vec<Event>) {
        log::info!("phase {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
        out_events.push(Event::PhaseChanged { phase });
    }

    fn reset_session(&mut self) {
        for actor in &mut self.actors {
            actor.respawn();
        }
        let max_health = self.tuning.max_health;
        for target in &mut self.targets {
            target.reset(max_health);
        }
        self.effects.clear();
        self.hud.set(OPENING_PROMPT, self.tuning.announcement_duration);
        self.defeated_count = 0;
        self.victory_countdown = None;
        self.tick_index = 0;
    }

    fn step_actor(&mut self, actor: ActorId, direction: Direction, out_events: &mut Vec<Event>) {
        let move_delay = self.tuning.move_delay;
        let grid = &self.grid;
        let state = &mut self.actors[actor.index()];
        if state.move_cooldown > 0 {
            log::debug!("{} is still cooling down", actor.name());
            return;
        }

        let from = state.cell;
        let (column_delta, row_delta) = direction.delta();
        if state.try_move(grid, column_delta, row_delta) {
            state.move_cooldown = move_delay;
            out_events.push(Event::ActorMoved {
                actor,
                from,
                to: state.cell,
            });
        } else {
            out_events.push(Event::ActorBlocked { actor, direction });
        }
    }

    fn reveal_target(&mut self, target: TargetId, by: ActorId, out_events: &mut Vec<Event>) {
        let actor_cell = self.actors[by.index()].cell;
        let reveal_radius = self.tuning.reveal_radius;
        let state = self.target_mut(target);
        if state.revealed {
            return;
        }
        if actor_cell.chebyshev_distance(state.cell) > reveal_radius {
            log::debug!("{} is too far away to find {}", by.name(), target.name());
            return;
        }

        state.revealed = true;
        log::info!("{} found {}", by.name(), target.name());
        self.hud.set(
            format!("Found {}! Get close and press TWERK!", target.name()),
            self.tuning.announcement_duration,
        );
        out_events.push(Event::TargetRevealed { target, by });
    }

    fn resolve_action(&mut self, actor: ActorId, target: TargetId, out_events: &mut Vec<Event>) {
        let Self {
            tuning,
            actors,
            targets,
            effects,
            rng,
            ..
        } = self;
        let attacker = &mut actors[actor.index()];
        let victim = &mut targets[target.index()];
        if attacker.action_active && attacker.action_frame > 0 {
            log::debug!("{} is still mid-action", actor.name());
            return;
        }
        if !victim.revealed || victim.defeated {
            log::debug!("{} cannot be engaged", target.name());
            return;
        }
        if attacker.cell.chebyshev_distance(victim.cell) > tuning.engage_radius {
            log::debug!("{} is out of reach of {}", target.name(), actor.name());
            return;
        }

        let strike = combat::resolve_action(attacker, victim, tuning, rng, effects);
        out_events.push(Event::TargetStruck {
            actor,
            target,
            damage: strike.damage,
            health: strike.health,
        });
        if !strike.defeated {
            return;
        }

        self.defeated_count = self.defeated_count.saturating_add(1);
        log::info!(
            "{} defeated {} ({} down)",
            actor.name(),
            target.name(),
            self.defeated_count
        );
        out_events.push(Event::TargetDefeated {
            target,
            defeated_count: self.defeated_count,
        });

        if self.defeated_count as usize >= TargetId::ALL.len() {
            let ticks = self.tuning.victory_countdown;
            self.hud
                .set(VICTORY_ANNOUNCEMENT, self.tuning.victory_message_duration);
            self.victory_countdown = Some(ticks);
            out_events.push(Event::VictoryCountdownStarted { ticks });
        }
    }

    fn settle(&mut self, out_events: &mut Vec<Event>) {
        for actor in &mut self.actors {
            if actor.age_action() {
                out_events.push(Event::ActionFinished { actor: actor.id });
            }
        }
        self.effects.age();
        self.hud.age();
        for target in &mut self.targets {
            target.age();
        }

        if let Some(remaining) = self.victory_countdown {
            let remaining = remaining.saturating_sub(1);
            if remaining == 0 {
                self.victory_countdown = None;
                self.enter_phase(GamePhase::Win, out_events);
            } else {
                self.victory_countdown = Some(remaining);
            }
        }
    }
}

fn ensure_open(grid: &GridWorld, name: &'static str, cell: CellCoord) -> Result<(), LayoutError> {
    if grid.is_blocked(cell) {
        return Err(LayoutError::BlockedSpawn {
            name,
            column: cell.column(),
            row: cell.row(),
        });
    }
    Ok(())
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Gameplay commands are ignored outside [`GamePhase::Playing`].
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::StartSession => {
            if world.phase != GamePhase::Title {
                log::debug!("ignoring session start during {:?}", world.phase);
                return;
            }
            world.reset_session();
            out_events.push(Event::SessionReset);
            world.enter_phase(GamePhase::Playing, out_events);
        }
        Command::ReturnToTitle => {
            if world.phase != GamePhase::Win {
                log::debug!("ignoring return to title during {:?}", world.phase);
                return;
            }
            world.enter_phase(GamePhase::Title, out_events);
        }
        command if world.phase != GamePhase::Playing => {
            log::debug!("ignoring {:?} during {:?}", command, world.phase);
        }
        Command::Tick => {
            world.tick_index = world.tick_index.saturating_add(1);
            for actor in &mut world.actors {
                actor.move_cooldown = actor.move_cooldown.saturating_sub(1);
            }
            out_events.push(Event::TimeAdvanced {
                tick: world.tick_index,
            });
        }
        Command::StepActor { actor, direction } => world.step_actor(actor, direction, out_events),
        Command::RevealTarget { target, by } => world.reveal_target(target, by, out_events),
        Command::ResolveAction { actor, target } => {
            world.resolve_action(actor, target, out_events);
        }
        Command::Settle => world.settle(out_events),
    }
}

/// Player-controlled actor state.
#[derive(Clone, Debug)]
pub(crate) struct Actor {
    pub(crate) id: ActorId,
    spawn: CellCoord,
    pub(crate) cell: CellCoord,
    facing: Direction,
    move_cooldown: u32,
    pub(crate) action_active: bool,
    pub(crate) action_timer: u32,
    pub(crate) action_frame: u32,
}

impl Actor {
    pub(crate) fn new(id: ActorId, spawn: CellCoord) -> Self {
        Self {
            id,
            spawn,
            cell: spawn,
            facing: Direction::Down,
            move_cooldown: 0,
            action_active: false,
            action_timer: 0,
            action_frame: 0,
        }
    }

    /// Moves one cell along a single axis unless the destination is blocked.
    ///
    /// Facing follows the attempted direction only when the move succeeds.
    fn try_move(&mut self, grid: &GridWorld, column_delta: i32, row_delta: i32) -> bool {
        let Some(direction) = Direction::from_delta(column_delta, row_delta) else {
            debug_assert!(false, "moves are a single orthogonal step");
            return false;
        };
        let destination = self.cell.step(direction);
        if grid.is_blocked(destination) {
            return false;
        }
        self.cell = destination;
        self.facing = direction;
        true
    }

    pub(crate) fn begin_action(&mut self, duration: u32) {
        self.action_active = true;
        self.action_timer = duration;
        self.action_frame = 0;
    }

    /// Advances the action pose, reporting whether it ended this tick.
    fn age_action(&mut self) -> bool {
        if !self.action_active {
            return false;
        }
        self.action_frame = self.action_frame.saturating_add(1);
        self.action_timer = self.action_timer.saturating_sub(1);
        if self.action_timer == 0 {
            self.action_active = false;
            return true;
        }
        false
    }

    fn respawn(&mut self) {
        self.cell = self.spawn;
        self.facing = Direction::Down;
        self.move_cooldown = 0;
        self.action_active = false;
        self.action_timer = 0;
        self.action_frame = 0;
    }

    fn snapshot(&self) -> ActorSnapshot {
        ActorSnapshot {
            id: self.id,
            cell: self.cell,
            facing: self.facing,
            move_cooldown: self.move_cooldown,
            action_active: self.action_active,
            action_timer: self.action_timer,
            action_frame: self.action_frame,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Speech {
    pub(crate) text: &'static str,
    pub(crate) remaining: u32,
}

/// Non-player target state.
#[derive(Clone, Debug)]
pub(crate) struct Target {
    id: TargetId,
    pub(crate) cell: CellCoord,
    pub(crate) health: u32,
    pub(crate) revealed: bool,
    pub(crate) defeated: bool,
    pub(crate) shake_timer: u32,
    pub(crate) speech: Option<Speech>,
}

impl Target {
    pub(crate) fn new(id: TargetId, cell: CellCoord, max_health: u32) -> Self {
        Self {
            id,
            cell,
            health: max_health,
            revealed: false,
            defeated: false,
            shake_timer: 0,
            speech: None,
        }
    }

    /// Subtracts damage, clamping at zero, and returns the remaining health.
    pub(crate) fn take_damage(&mut self, damage: u32) -> u32 {
        self.health = self.health.saturating_sub(damage);
        self.health
    }

    pub(crate) fn say(&mut self, text: &'static str, duration: u32) {
        self.speech = (duration > 0).then_some(Speech {
            text,
            remaining: duration,
        });
    }

    fn age(&mut self) {
        self.shake_timer = self.shake_timer.saturating_sub(1);
        if let Some(speech) = self.speech.as_mut() {
            speech.remaining = speech.remaining.saturating_sub(1);
            if speech.remaining == 0 {
                self.speech = None;
            }
        }
    }

    fn reset(&mut self, max_health: u32) {
        self.health = max_health;
        self.revealed = false;
        self.defeated = false;
        self.shake_timer = 0;
        self.speech = None;
    }

    fn snapshot(&self) -> TargetSnapshot {
        TargetSnapshot {
            id: self.id,
            cell: self.cell,
            health: self.health,
            revealed: self.revealed,
            defeated: self.defeated,
            shake_timer: self.shake_timer,
            speech: self.speech.map(|speech| SpeechSnapshot {
                text: speech.text.to_owned(),
                remaining: speech.remaining,
            }),
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use snow_day_core::{
        ActorView, EffectSnapshot, GamePhase, HudMessage, RenderSnapshot, TargetView, Tuning,
    };

    use super::{Actor, GridWorld, Target, World};

    /// Active phase of the game.
    #[must_use]
    pub fn phase(world: &World) -> GamePhase {
        world.phase
    }

    /// Static tile layout of the house.
    #[must_use]
    pub fn grid(world: &World) -> &GridWorld {
        &world.grid
    }

    /// Tuning values the world was created with.
    #[must_use]
    pub fn tuning(world: &World) -> &Tuning {
        &world.tuning
    }

    /// Number of playing frames simulated since the session started.
    #[must_use]
    pub fn tick(world: &World) -> u64 {
        world.tick_index
    }

    /// Captures a read-only view of both actors.
    #[must_use]
    pub fn actor_view(world: &World) -> ActorView {
        ActorView::from_snapshots(world.actors.iter().map(Actor::snapshot).collect())
    }

    /// Captures a read-only view of both targets.
    #[must_use]
    pub fn target_view(world: &World) -> TargetView {
        TargetView::from_snapshots(world.targets.iter().map(Target::snapshot).collect())
    }

    /// Live floating labels.
    #[must_use]
    pub fn effects(world: &World) -> Vec<EffectSnapshot> {
        world.effects.snapshots()
    }

    /// Number of live floating labels.
    #[must_use]
    pub fn effect_count(world: &World) -> usize {
        world.effects.len()
    }

    /// Message currently shown in the HUD, if any.
    #[must_use]
    pub fn hud(world: &World) -> Option<&HudMessage> {
        world.hud.current()
    }

    /// Number of targets defeated this session.
    #[must_use]
    pub fn defeated_count(world: &World) -> u32 {
        world.defeated_count
    }

    /// Ticks until the victory screen, when the countdown is running.
    #[must_use]
    pub fn victory_countdown(world: &World) -> Option<u32> {
        world.victory_countdown
    }

    /// Everything presentation needs to draw the current frame.
    #[must_use]
    pub fn render_snapshot(world: &World) -> RenderSnapshot {
        RenderSnapshot {
            tick: world.tick_index,
            phase: world.phase,
            actors: actor_view(world).into_vec(),
            targets: target_view(world).into_vec(),
            effects: effects(world),
            hud: hud(world).cloned(),
            defeated_count: world.defeated_count,
            victory_countdown: world.victory_countdown,
        }
    }
}
