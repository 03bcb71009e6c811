#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Snow Day simulation.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Systems read immutable views such
//! as [`ActorView`] and [`TargetView`] and respond with [`Command`] values.
//! The world executes those commands through its `apply` entry point and
//! reports what happened through [`Event`] values. Presentation consumes a
//! [`RenderSnapshot`] captured after every mutation of a frame has completed.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical title shown when the experience boots.
pub const TITLE_BANNER: &str = "Rho & Rhaki's Crazy Adventure!";

/// Static tile kinds that compose the house layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tile {
    /// Solid wall. Blocks movement.
    Wall,
    /// Open floor.
    Floor,
    /// Doorway between rooms. Walkable.
    Door,
    /// Window pane set into the floor plan. Walkable.
    Window,
    /// Furniture such as desks and sofas. Blocks movement.
    Furniture,
}

impl Tile {
    /// Decodes a layout glyph into a tile.
    #[must_use]
    pub const fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            '#' => Some(Self::Wall),
            '.' => Some(Self::Floor),
            'D' => Some(Self::Door),
            'W' => Some(Self::Window),
            'F' => Some(Self::Furniture),
            _ => None,
        }
    }

    /// Glyph used for the tile in layout tables.
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            Self::Wall => '#',
            Self::Floor => '.',
            Self::Door => 'D',
            Self::Window => 'W',
            Self::Furniture => 'F',
        }
    }

    /// Reports whether the tile is a wall.
    #[must_use]
    pub const fn is_wall(self) -> bool {
        matches!(self, Self::Wall)
    }

    /// Reports whether the tile prevents entities from entering it.
    #[must_use]
    pub const fn blocks_movement(self) -> bool {
        matches!(self, Self::Wall | Self::Furniture)
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
///
/// Coordinates are signed so that candidate moves off the edge of the grid
/// remain representable; such cells are simply treated as blocked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: i32,
    row: i32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: i32, row: i32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Returns the neighbouring cell one step in the provided direction.
    #[must_use]
    pub const fn step(self, direction: Direction) -> Self {
        let (column_delta, row_delta) = direction.delta();
        Self::new(self.column + column_delta, self.row + row_delta)
    }

    /// Computes the Chebyshev (king-move) distance between two cells.
    #[must_use]
    pub fn chebyshev_distance(self, other: CellCoord) -> u32 {
        self.column
            .abs_diff(other.column)
            .max(self.row.abs_diff(other.row))
    }
}

/// Cardinal directions used for movement and facing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Toward decreasing row indices.
    Up,
    /// Toward increasing row indices.
    Down,
    /// Toward decreasing column indices.
    Left,
    /// Toward increasing column indices.
    Right,
}

impl Direction {
    /// Precedence applied when several directions are asserted in one frame.
    pub const PRIORITY: [Direction; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Column and row delta of a single step in this direction.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }

    /// Derives the direction implied by a single-axis delta.
    ///
    /// Returns `None` unless exactly one axis is nonzero.
    #[must_use]
    pub const fn from_delta(column_delta: i32, row_delta: i32) -> Option<Self> {
        match (column_delta, row_delta) {
            (0, 0) => None,
            (0, row) if row < 0 => Some(Self::Up),
            (0, _) => Some(Self::Down),
            (column, 0) if column < 0 => Some(Self::Left),
            (_, 0) => Some(Self::Right),
            _ => None,
        }
    }

    /// Lowercase name used in scripts and logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

/// Identifies one of the two player-controlled actors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ActorId {
    /// First player, blue hoodie.
    Rho,
    /// Second player, red hoodie.
    Rhaki,
}

impl ActorId {
    /// Every actor in evaluation order.
    pub const ALL: [ActorId; 2] = [Self::Rho, Self::Rhaki];

    /// Display name of the actor.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Rho => "Rho",
            Self::Rhaki => "Rhaki",
        }
    }

    /// Position of the actor within [`ActorId::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Rho => 0,
            Self::Rhaki => 1,
        }
    }
}

/// Identifies one of the two non-player targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TargetId {
    /// Primary target, working in the study.
    Dad,
    /// Secondary target, working in the bedroom.
    Mom,
}

impl TargetId {
    /// Every target in the fixed evaluation order: primary first.
    pub const ALL: [TargetId; 2] = [Self::Dad, Self::Mom];

    /// Display name of the target.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Dad => "Dad",
            Self::Mom => "Mom",
        }
    }

    /// Position of the target within [`TargetId::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Dad => 0,
            Self::Mom => 1,
        }
    }
}

/// Top-level phase of the game.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen awaiting confirmation.
    #[default]
    Title,
    /// Active play inside the house.
    Playing,
    /// Victory screen after both targets were defeated.
    Win,
}

/// Decides how many targets a single action input may strike.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngagementPolicy {
    /// Every eligible target is struck, in evaluation order.
    #[default]
    AllInRange,
    /// Only the first eligible target in evaluation order is struck.
    FirstInRange,
}

/// Adjustable constants that drive the simulation rules.
///
/// Every duration is measured in simulation ticks.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Ticks an actor waits after a successful move before moving again.
    pub move_delay: u32,
    /// Chebyshev distance at which an actor reveals a hidden target.
    pub reveal_radius: u32,
    /// Chebyshev distance at which an actor may strike a target.
    pub engage_radius: u32,
    /// Ticks an actor stays locked in its action pose.
    pub action_duration: u32,
    /// Smallest damage a single strike may deal.
    pub damage_min: u32,
    /// Largest damage a single strike may deal.
    pub damage_max: u32,
    /// Ticks a struck target keeps shaking.
    pub shake_duration: u32,
    /// Ticks a target's speech bubble stays visible.
    pub speech_duration: u32,
    /// Ticks a floating effect label lives.
    pub effect_lifetime: u32,
    /// Ticks HUD announcements such as reveals stay visible.
    pub announcement_duration: u32,
    /// Ticks between the final defeat and the victory screen.
    pub victory_countdown: u32,
    /// Ticks the victory announcement stays visible.
    pub victory_message_duration: u32,
    /// Health every target starts a session with.
    pub max_health: u32,
    /// Whether one action input may strike several targets.
    pub engagement: EngagementPolicy,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            move_delay: 8,
            reveal_radius: 3,
            engage_radius: 1,
            action_duration: 45,
            damage_min: 8,
            damage_max: 15,
            shake_duration: 20,
            speech_duration: 180,
            effect_lifetime: 60,
            announcement_duration: 180,
            victory_countdown: 180,
            victory_message_duration: 240,
            max_health: 100,
            engagement: EngagementPolicy::AllInRange,
        }
    }
}

impl Tuning {
    /// Checks that the tuning describes a playable game.
    pub fn validate(&self) -> Result<(), TuningError> {
        if self.damage_min > self.damage_max {
            return Err(TuningError::InvertedDamageRange {
                min: self.damage_min,
                max: self.damage_max,
            });
        }
        if self.damage_max == 0 {
            return Err(TuningError::HarmlessDamage);
        }
        if self.max_health == 0 {
            return Err(TuningError::ZeroHealth);
        }
        if self.engage_radius > self.reveal_radius {
            return Err(TuningError::EngageBeyondReveal {
                engage: self.engage_radius,
                reveal: self.reveal_radius,
            });
        }
        Ok(())
    }
}

/// Reasons a [`Tuning`] may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum TuningError {
    /// The damage range is empty.
    #[error("damage_min ({min}) exceeds damage_max ({max})")]
    InvertedDamageRange {
        /// Configured lower bound.
        min: u32,
        /// Configured upper bound.
        max: u32,
    },
    /// No strike could ever reduce health.
    #[error("damage_max must be positive")]
    HarmlessDamage,
    /// Targets would start the session already defeated.
    #[error("max_health must be positive")]
    ZeroHealth,
    /// Targets could be struck before they are revealed.
    #[error("engage_radius ({engage}) exceeds reveal_radius ({reveal})")]
    EngageBeyondReveal {
        /// Configured engagement radius.
        engage: u32,
        /// Configured reveal radius.
        reveal: u32,
    },
}

/// Logical controls asserted for a single actor during one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorControls {
    /// Move toward decreasing rows.
    pub up: bool,
    /// Move toward increasing rows.
    pub down: bool,
    /// Move toward decreasing columns.
    pub left: bool,
    /// Move toward increasing columns.
    pub right: bool,
    /// Perform the action at adjacent targets.
    pub act: bool,
}

impl ActorControls {
    /// Reports whether the provided direction is asserted.
    #[must_use]
    pub const fn is_pressed(&self, direction: Direction) -> bool {
        match direction {
            Direction::Up => self.up,
            Direction::Down => self.down,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    /// Asserts the provided direction.
    pub fn press(&mut self, direction: Direction) {
        match direction {
            Direction::Up => self.up = true,
            Direction::Down => self.down = true,
            Direction::Left => self.left = true,
            Direction::Right => self.right = true,
        }
    }

    /// First asserted direction according to [`Direction::PRIORITY`].
    #[must_use]
    pub fn first_direction(&self) -> Option<Direction> {
        Direction::PRIORITY
            .into_iter()
            .find(|direction| self.is_pressed(*direction))
    }
}

/// Input snapshot gathered by adapters before a frame is simulated.
///
/// Movement and action flags are level-triggered: they stay asserted for as
/// long as the key is held. `confirm` and `quit` are edge-triggered and must
/// only be set on the frame in which the key went down.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameInput {
    /// Controls bound to each actor, indexed by [`ActorId::index`].
    pub actors: [ActorControls; 2],
    /// Confirmation pressed on this frame.
    pub confirm: bool,
    /// Quit requested on this frame.
    pub quit: bool,
}

impl FrameInput {
    /// Controls bound to the provided actor.
    #[must_use]
    pub const fn controls(&self, actor: ActorId) -> &ActorControls {
        &self.actors[actor.index()]
    }

    /// Mutable controls bound to the provided actor.
    pub fn controls_mut(&mut self, actor: ActorId) -> &mut ActorControls {
        &mut self.actors[actor.index()]
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Resets the session and enters [`GamePhase::Playing`]. Only honoured on the title screen.
    StartSession,
    /// Leaves the victory screen for the title screen. Only honoured on the victory screen.
    ReturnToTitle,
    /// Opens a new playing frame, counting down movement cooldowns.
    Tick,
    /// Requests that an actor attempt a single step.
    StepActor {
        /// Actor attempting to move.
        actor: ActorId,
        /// Direction of the attempted step.
        direction: Direction,
    },
    /// Requests that a target become revealed after an actor came close.
    RevealTarget {
        /// Target to reveal.
        target: TargetId,
        /// Actor whose proximity triggered the reveal.
        by: ActorId,
    },
    /// Requests that an actor perform its action against a target.
    ResolveAction {
        /// Actor performing the action.
        actor: ActorId,
        /// Target receiving the action.
        target: TargetId,
    },
    /// Closes a playing frame: ages timers, effects and messages, and checks for victory.
    Settle,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// The world entered a new phase.
    PhaseChanged {
        /// Phase that became active.
        phase: GamePhase,
    },
    /// All actors, targets, effects and counters returned to their starting state.
    SessionReset,
    /// A playing frame began.
    TimeAdvanced {
        /// Index of the frame within the session.
        tick: u64,
    },
    /// An actor moved between two cells.
    ActorMoved {
        /// Actor that moved.
        actor: ActorId,
        /// Cell occupied before the move.
        from: CellCoord,
        /// Cell occupied after the move.
        to: CellCoord,
    },
    /// An actor's move was rejected because the destination is blocked.
    ActorBlocked {
        /// Actor whose move failed.
        actor: ActorId,
        /// Direction of the rejected move.
        direction: Direction,
    },
    /// A target was found by an actor.
    TargetRevealed {
        /// Target that became visible.
        target: TargetId,
        /// Actor that found it.
        by: ActorId,
    },
    /// A target took damage from an actor's action.
    TargetStruck {
        /// Actor that performed the action.
        actor: ActorId,
        /// Target that was struck.
        target: TargetId,
        /// Damage rolled for the strike.
        damage: u32,
        /// Health remaining after the strike.
        health: u32,
    },
    /// A target's health reached zero for the first time this session.
    TargetDefeated {
        /// Target that gave up.
        target: TargetId,
        /// Number of defeated targets including this one.
        defeated_count: u32,
    },
    /// Every target is defeated; the victory screen follows after the countdown.
    VictoryCountdownStarted {
        /// Ticks remaining before the phase changes.
        ticks: u32,
    },
    /// An actor finished its action pose and may act again.
    ActionFinished {
        /// Actor that became idle.
        actor: ActorId,
    },
}

/// Immutable representation of a single actor's state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ActorSnapshot {
    /// Identifier of the actor.
    pub id: ActorId,
    /// Cell currently occupied.
    pub cell: CellCoord,
    /// Direction the actor faces.
    pub facing: Direction,
    /// Ticks remaining before another move is allowed.
    pub move_cooldown: u32,
    /// Whether the actor is locked in its action pose.
    pub action_active: bool,
    /// Ticks remaining in the current action pose.
    pub action_timer: u32,
    /// Ticks elapsed since the current action began.
    pub action_frame: u32,
}

/// Read-only snapshot describing both actors.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ActorView {
    snapshots: Vec<ActorSnapshot>,
}

impl ActorView {
    /// Creates a new actor view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<ActorSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in evaluation order.
    pub fn iter(&self) -> impl Iterator<Item = &ActorSnapshot> {
        self.snapshots.iter()
    }

    /// Snapshot of the provided actor, if captured.
    #[must_use]
    pub fn get(&self, actor: ActorId) -> Option<&ActorSnapshot> {
        self.snapshots.iter().find(|snapshot| snapshot.id == actor)
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<ActorSnapshot> {
        self.snapshots
    }
}

/// Speech bubble text attached to a target.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SpeechSnapshot {
    /// Words spoken by the target.
    pub text: String,
    /// Ticks the bubble remains visible.
    pub remaining: u32,
}

/// Immutable representation of a single target's state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TargetSnapshot {
    /// Identifier of the target.
    pub id: TargetId,
    /// Cell the target works in.
    pub cell: CellCoord,
    /// Remaining health.
    pub health: u32,
    /// Whether an actor has found the target.
    pub revealed: bool,
    /// Whether the target gave up.
    pub defeated: bool,
    /// Ticks of shaking left after the last strike.
    pub shake_timer: u32,
    /// Active speech bubble, if any.
    pub speech: Option<SpeechSnapshot>,
}

/// Read-only snapshot describing both targets.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TargetView {
    snapshots: Vec<TargetSnapshot>,
}

impl TargetView {
    /// Creates a new target view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TargetSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in evaluation order.
    pub fn iter(&self) -> impl Iterator<Item = &TargetSnapshot> {
        self.snapshots.iter()
    }

    /// Snapshot of the provided target, if captured.
    #[must_use]
    pub fn get(&self, target: TargetId) -> Option<&TargetSnapshot> {
        self.snapshots.iter().find(|snapshot| snapshot.id == target)
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TargetSnapshot> {
        self.snapshots
    }
}

/// Floating label produced by an action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EffectSnapshot {
    /// Cell the label originated from.
    pub origin: CellCoord,
    /// Height above the cell centre in presentation units; grows every tick.
    pub elevation: u32,
    /// Text displayed by the label.
    pub label: String,
    /// Ticks the label remains alive.
    pub remaining: u32,
}

/// Single-slot message displayed in the HUD.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HudMessage {
    /// Text of the message.
    pub text: String,
    /// Ticks the message remains visible.
    pub remaining: u32,
}

/// Read-only projection of everything presentation needs for one frame.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RenderSnapshot {
    /// Frames simulated in the current session.
    pub tick: u64,
    /// Active game phase.
    pub phase: GamePhase,
    /// Both actors in evaluation order.
    pub actors: Vec<ActorSnapshot>,
    /// Both targets in evaluation order.
    pub targets: Vec<TargetSnapshot>,
    /// Live floating labels.
    pub effects: Vec<EffectSnapshot>,
    /// Current HUD message, if any.
    pub hud: Option<HudMessage>,
    /// Number of targets defeated this session.
    pub defeated_count: u32,
    /// Ticks until the victory screen, when the countdown is running.
    pub victory_countdown: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::{
        ActorControls, CellCoord, Direction, EngagementPolicy, Tile, Tuning, TuningError,
    };

    #[test]
    fn chebyshev_distance_counts_diagonals_as_one() {
        let origin = CellCoord::new(5, 5);
        assert_eq!(origin.chebyshev_distance(CellCoord::new(6, 6)), 1);
        assert_eq!(origin.chebyshev_distance(CellCoord::new(2, 8)), 3);
        assert_eq!(origin.chebyshev_distance(CellCoord::new(9, 6)), 4);
        assert_eq!(CellCoord::new(-1, 0).chebyshev_distance(origin), 6);
    }

    #[test]
    fn direction_from_delta_requires_a_single_axis() {
        assert_eq!(Direction::from_delta(0, -1), Some(Direction::Up));
        assert_eq!(Direction::from_delta(0, 3), Some(Direction::Down));
        assert_eq!(Direction::from_delta(-2, 0), Some(Direction::Left));
        assert_eq!(Direction::from_delta(1, 0), Some(Direction::Right));
        assert_eq!(Direction::from_delta(0, 0), None);
        assert_eq!(Direction::from_delta(1, 1), None);
    }

    #[test]
    fn first_direction_follows_priority() {
        let controls = ActorControls {
            up: false,
            down: true,
            left: true,
            right: true,
            act: false,
        };
        assert_eq!(controls.first_direction(), Some(Direction::Down));

        let mut all = ActorControls::default();
        for direction in Direction::PRIORITY.into_iter().rev() {
            all.press(direction);
        }
        assert_eq!(all.first_direction(), Some(Direction::Up));
        assert_eq!(ActorControls::default().first_direction(), None);
    }

    #[test]
    fn only_walls_and_furniture_block_movement() {
        let blocking: Vec<Tile> = "#.DWF"
            .chars()
            .filter_map(Tile::from_glyph)
            .filter(|tile| tile.blocks_movement())
            .collect();
        assert_eq!(blocking, vec![Tile::Wall, Tile::Furniture]);
        assert_eq!(Tile::from_glyph('x'), None);
    }

    #[test]
    fn default_tuning_is_valid() {
        assert_eq!(Tuning::default().validate(), Ok(()));
    }

    #[test]
    fn inverted_damage_range_is_rejected() {
        let tuning = Tuning {
            damage_min: 20,
            damage_max: 10,
            ..Tuning::default()
        };
        assert_eq!(
            tuning.validate(),
            Err(TuningError::InvertedDamageRange { min: 20, max: 10 })
        );
    }

    #[test]
    fn tuning_round_trips_through_bincode() {
        let tuning = Tuning {
            engagement: EngagementPolicy::FirstInRange,
            move_delay: 4,
            ..Tuning::default()
        };
        let bytes = bincode::serialize(&tuning).expect("serialize");
        let restored: Tuning = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(restored, tuning);
    }
}
