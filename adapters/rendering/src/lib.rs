#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Snow Day adapters.

use std::fmt;

use anyhow::Result as AnyResult;
use snow_day_core::{
    ActorId, ActorSnapshot, CellCoord, FrameInput, GamePhase, RenderSnapshot, TargetId,
    TargetSnapshot, Tile, TITLE_BANNER,
};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }
}

/// Colors of the house, its inhabitants and the HUD.
pub mod palette {
    use super::Color;

    /// Window panes.
    pub const WINDOW: Color = Color::from_rgb_u8(180, 210, 240);
    /// Rho's blue hoodie.
    pub const RHO: Color = Color::from_rgb_u8(50, 140, 255);
    /// Rhaki's red hoodie.
    pub const RHAKI: Color = Color::from_rgb_u8(255, 80, 80);
    /// Dad's sweater.
    pub const DAD: Color = Color::from_rgb_u8(50, 160, 80);
    /// Mom's sweater.
    pub const MOM: Color = Color::from_rgb_u8(180, 50, 180);
    /// Depleted health and defeated status.
    pub const HP_RED: Color = Color::from_rgb_u8(220, 40, 40);
    /// Remaining health.
    pub const HP_GREEN: Color = Color::from_rgb_u8(40, 200, 40);
    /// Targets nobody has found yet.
    pub const HIDDEN: Color = Color::from_rgb_u8(150, 150, 150);
    /// Announcements and prompts.
    pub const YELLOW: Color = Color::from_rgb_u8(255, 220, 0);
    /// Floating action labels.
    pub const TWERK: Color = Color::from_rgb_u8(255, 180, 50);
    /// Body text on the title and victory screens.
    pub const TEXT: Color = Color::from_rgb_u8(200, 210, 230);
    /// Work chatter above busy targets.
    pub const MUTED: Color = Color::from_rgb_u8(100, 100, 100);
}

/// Map glyph and color of an actor.
#[must_use]
pub const fn actor_marker(actor: ActorId) -> (char, Color) {
    match actor {
        ActorId::Rho => ('r', palette::RHO),
        ActorId::Rhaki => ('k', palette::RHAKI),
    }
}

/// Map glyph and color of a target; defeated targets are drawn as `x`.
#[must_use]
pub fn target_marker(target: &TargetSnapshot) -> (char, Color) {
    if target.defeated {
        return ('x', palette::HP_RED);
    }
    match target.id {
        TargetId::Dad => ('d', palette::DAD),
        TargetId::Mom => ('m', palette::MOM),
    }
}

/// Name of the house region containing the cell.
#[must_use]
pub const fn room_name(cell: CellCoord) -> &'static str {
    let (column, row) = (cell.column(), cell.row());
    if row < 6 {
        if column < 7 {
            "Kitchen"
        } else if column < 14 {
            "Dining Room"
        } else {
            "Living Room"
        }
    } else if row < 13 {
        if column < 15 {
            "Hallway"
        } else {
            "Study"
        }
    } else if column < 15 {
        "Bedroom"
    } else {
        "Playroom"
    }
}

/// Noise a busy target makes while working.
#[must_use]
pub const fn work_text(target: TargetId) -> &'static str {
    match target {
        TargetId::Dad => "TAP TAP TAP...",
        TargetId::Mom => "TYPE TYPE TYPE...",
    }
}

/// HUD status of a target: hidden, health, or defeated.
#[must_use]
pub fn target_status(target: &TargetSnapshot, max_health: u32) -> String {
    if target.defeated {
        "DEFEATED!".to_owned()
    } else if target.revealed {
        format!("HP: {}/{max_health}", target.health)
    } else {
        "???".to_owned()
    }
}

/// Single line of text drawn in one color.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneLine {
    /// Text of the line.
    pub text: String,
    /// Color of the text.
    pub color: Color,
}

impl SceneLine {
    fn new(text: impl Into<String>, color: Color) -> Self {
        Self {
            text: text.into(),
            color,
        }
    }
}

/// Scene description combining the house map and the text overlay.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Phase the scene was composed for.
    pub phase: GamePhase,
    /// House rows with actors and revealed targets drawn over the tiles.
    ///
    /// Empty outside [`GamePhase::Playing`].
    pub map: Vec<String>,
    /// HUD, title or victory text drawn after the map.
    pub overlay: Vec<SceneLine>,
}

impl Scene {
    /// Composes the scene for the provided snapshot.
    ///
    /// `tiles` yields the rows of the house in order.
    #[must_use]
    pub fn compose<'a, I>(tiles: I, snapshot: &RenderSnapshot, max_health: u32) -> Self
    where
        I: IntoIterator<Item = &'a [Tile]>,
    {
        match snapshot.phase {
            GamePhase::Title => Self {
                phase: GamePhase::Title,
                map: Vec::new(),
                overlay: title_lines(),
            },
            GamePhase::Win => Self {
                phase: GamePhase::Win,
                map: Vec::new(),
                overlay: victory_lines(),
            },
            GamePhase::Playing => Self {
                phase: GamePhase::Playing,
                map: map_rows(tiles, snapshot),
                overlay: hud_lines(snapshot, max_health),
            },
        }
    }
}

impl fmt::Display for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.map {
            writeln!(f, "{row}")?;
        }
        for line in &self.overlay {
            writeln!(f, "{}", line.text)?;
        }
        Ok(())
    }
}

fn title_lines() -> Vec<SceneLine> {
    let mut lines = vec![
        SceneLine::new(TITLE_BANNER, palette::YELLOW),
        SceneLine::new("~ A Snow Day Twerk-a-thon ~", palette::WINDOW),
        SceneLine::new("", palette::TEXT),
    ];
    let story = [
        "It's a SNOW DAY! But Mom and Dad are trying to work...",
        "Find them in the house and TWERK until they give up!",
        "",
        "Rho:   WASD to move,  Q to TWERK",
        "Rhaki: Arrow keys to move,  SPACE to TWERK",
        "",
        "Get next to a parent and twerk to deal damage!",
        "Defeat both parents to win the snow day!",
    ];
    lines.extend(story.iter().enumerate().map(|(index, text)| {
        let color = if index == 1 {
            palette::TWERK
        } else {
            palette::TEXT
        };
        SceneLine::new(*text, color)
    }));
    lines.push(SceneLine::new("", palette::TEXT));
    lines.push(SceneLine::new("Press ENTER to start!", palette::YELLOW));
    lines
}

fn victory_lines() -> Vec<SceneLine> {
    let mut lines = vec![SceneLine::new("SNOW DAY VICTORY!", palette::YELLOW)];
    let story = [
        "",
        "Rho and Rhaki's twerking was too powerful!",
        "Mom and Dad gave up on work.",
        "Everyone went outside to play in the snow!",
        "",
        "The family had hot chocolate afterwards.",
        "",
    ];
    lines.extend(story.iter().map(|text| SceneLine::new(*text, palette::TEXT)));
    lines.push(SceneLine::new("Press ENTER to play again!", palette::WINDOW));
    lines
}

fn map_rows<'a, I>(tiles: I, snapshot: &RenderSnapshot) -> Vec<String>
where
    I: IntoIterator<Item = &'a [Tile]>,
{
    let mut rows: Vec<Vec<char>> = tiles
        .into_iter()
        .map(|row| row.iter().map(|tile| tile.glyph()).collect())
        .collect();

    let mut draw = |cell: CellCoord, glyph: char| {
        let column = usize::try_from(cell.column()).ok();
        let row = usize::try_from(cell.row()).ok();
        if let (Some(column), Some(row)) = (column, row) {
            if let Some(slot) = rows.get_mut(row).and_then(|line| line.get_mut(column)) {
                *slot = glyph;
            }
        }
    };

    for target in snapshot.targets.iter().filter(|target| target.revealed) {
        draw(target.cell, target_marker(target).0);
    }
    for actor in &snapshot.actors {
        draw(actor.cell, actor_marker(actor.id).0);
    }

    rows.into_iter().map(String::from_iter).collect()
}

fn hud_lines(snapshot: &RenderSnapshot, max_health: u32) -> Vec<SceneLine> {
    let mut lines = Vec::new();

    if let Some(lead) = snapshot.actors.iter().find(|actor| actor.id == ActorId::Rho) {
        lines.push(SceneLine::new(
            format!("Room: {}", room_name(lead.cell)),
            palette::TEXT,
        ));
    }

    for target in &snapshot.targets {
        let color = if target.defeated {
            palette::HP_RED
        } else if target.revealed {
            palette::HP_GREEN
        } else {
            palette::HIDDEN
        };
        lines.push(SceneLine::new(
            format!("{}: {}", target.id.name(), target_status(target, max_health)),
            color,
        ));
    }

    for target in snapshot.targets.iter().filter(|target| target.revealed) {
        if target.health > 0 {
            lines.push(SceneLine::new(
                format!("  {} ... {}", target.id.name(), work_text(target.id)),
                palette::MUTED,
            ));
        }
        if let Some(speech) = &target.speech {
            let shaking = if target.shake_timer > 0 { " *shakes*" } else { "" };
            lines.push(SceneLine::new(
                format!("  {}{shaking}: \"{}\"", target.id.name(), speech.text),
                target_marker(target).1,
            ));
        }
    }

    for actor in snapshot.actors.iter().filter(|actor| actor.action_active) {
        lines.push(SceneLine::new(
            format!("  {} is twerking! ({})", actor.id.name(), pose(actor)),
            actor_marker(actor.id).1,
        ));
    }

    for effect in &snapshot.effects {
        lines.push(SceneLine::new(
            format!(
                "  {} at ({}, {}) +{}",
                effect.label,
                effect.origin.column(),
                effect.origin.row(),
                effect.elevation
            ),
            palette::TWERK,
        ));
    }

    if let Some(message) = &snapshot.hud {
        lines.push(SceneLine::new(format!(">> {}", message.text), palette::YELLOW));
    }

    lines
}

fn pose(actor: &ActorSnapshot) -> &'static str {
    const POSES: [&str; 4] = ["<", "^", ">", "v"];
    POSES[actor.action_frame as usize % POSES.len()]
}

/// Signals whether a backend should keep presenting frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Present another frame.
    Continue,
    /// Stop presenting and return from [`RenderingBackend::run`].
    Exit,
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title shown by the backend.
    pub window_title: String,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            scene,
        }
    }
}

/// Rendering backend capable of presenting Snow Day scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the input captured by the
    /// adapter for one frame and may mutate the scene before it is presented.
    /// Returning [`FrameOutcome::Exit`] stops the backend.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(FrameInput, &mut Scene) -> FrameOutcome;
}

#[cfg(test)]
mod tests {
    use super::*;
    use snow_day_core::{Direction, EffectSnapshot, HudMessage, SpeechSnapshot};

    const PLAN: [&str; 5] = ["######", "#....#", "#.F..#", "#....#", "######"];

    fn tiles() -> Vec<Vec<Tile>> {
        PLAN.iter()
            .map(|row| row.chars().filter_map(Tile::from_glyph).collect())
            .collect()
    }

    fn actor(id: ActorId, column: i32, row: i32) -> ActorSnapshot {
        ActorSnapshot {
            id,
            cell: CellCoord::new(column, row),
            facing: Direction::Down,
            move_cooldown: 0,
            action_active: false,
            action_timer: 0,
            action_frame: 0,
        }
    }

    fn target(id: TargetId, column: i32, row: i32) -> TargetSnapshot {
        TargetSnapshot {
            id,
            cell: CellCoord::new(column, row),
            health: 100,
            revealed: false,
            defeated: false,
            shake_timer: 0,
            speech: None,
        }
    }

    fn playing() -> RenderSnapshot {
        RenderSnapshot {
            tick: 1,
            phase: GamePhase::Playing,
            actors: vec![actor(ActorId::Rho, 1, 1), actor(ActorId::Rhaki, 4, 3)],
            targets: vec![target(TargetId::Dad, 4, 1), target(TargetId::Mom, 1, 3)],
            effects: Vec::new(),
            hud: None,
            defeated_count: 0,
            victory_countdown: None,
        }
    }

    fn compose(snapshot: &RenderSnapshot) -> Scene {
        let tiles = tiles();
        Scene::compose(tiles.iter().map(Vec::as_slice), snapshot, 100)
    }

    #[test]
    fn room_names_follow_house_regions() {
        assert_eq!(room_name(CellCoord::new(6, 5)), "Kitchen");
        assert_eq!(room_name(CellCoord::new(7, 5)), "Dining Room");
        assert_eq!(room_name(CellCoord::new(14, 0)), "Living Room");
        assert_eq!(room_name(CellCoord::new(2, 8)), "Hallway");
        assert_eq!(room_name(CellCoord::new(22, 9)), "Study");
        assert_eq!(room_name(CellCoord::new(5, 16)), "Bedroom");
        assert_eq!(room_name(CellCoord::new(15, 13)), "Playroom");
    }

    #[test]
    fn target_status_tracks_discovery() {
        let mut mom = target(TargetId::Mom, 5, 16);
        assert_eq!(target_status(&mom, 100), "???");
        mom.revealed = true;
        mom.health = 64;
        assert_eq!(target_status(&mom, 100), "HP: 64/100");
        mom.health = 0;
        mom.defeated = true;
        assert_eq!(target_status(&mom, 100), "DEFEATED!");
    }

    #[test]
    fn hidden_targets_stay_off_the_map() {
        let scene = compose(&playing());
        assert_eq!(scene.map, ["######", "#r...#", "#.F..#", "#...k#", "######"]);
        assert!(scene
            .overlay
            .iter()
            .any(|line| line.text == "Dad: ???" && line.color == palette::HIDDEN));
    }

    #[test]
    fn revealed_targets_show_work_speech_and_effects() {
        let mut snapshot = playing();
        snapshot.targets[0].revealed = true;
        snapshot.targets[0].health = 88;
        snapshot.targets[0].shake_timer = 4;
        snapshot.targets[0].speech = Some(SpeechSnapshot {
            text: "HR is watching!".to_owned(),
            remaining: 100,
        });
        snapshot.effects.push(EffectSnapshot {
            origin: CellCoord::new(4, 1),
            elevation: 41,
            label: "-12 TWERK!".to_owned(),
            remaining: 59,
        });
        snapshot.hud = Some(HudMessage {
            text: "Found Dad! Get close and press TWERK!".to_owned(),
            remaining: 170,
        });

        let scene = compose(&snapshot);

        assert_eq!(scene.map[1], "#r..d#");
        let text = scene.to_string();
        assert!(text.contains("Room: Kitchen"));
        assert!(text.contains("Dad: HP: 88/100"));
        assert!(text.contains("Dad ... TAP TAP TAP..."));
        assert!(text.contains("Dad *shakes*: \"HR is watching!\""));
        assert!(text.contains("-12 TWERK! at (4, 1) +41"));
        assert!(text.contains(">> Found Dad! Get close and press TWERK!"));
        assert!(!text.contains("TYPE TYPE TYPE"));
    }

    #[test]
    fn defeated_targets_are_crossed_out() {
        let mut snapshot = playing();
        snapshot.targets[1].revealed = true;
        snapshot.targets[1].defeated = true;
        snapshot.targets[1].health = 0;
        let scene = compose(&snapshot);
        assert_eq!(scene.map[3], "#x..k#");
        assert!(!scene.to_string().contains("TYPE TYPE TYPE"));
    }

    #[test]
    fn title_and_victory_screens_have_no_map() {
        let mut snapshot = playing();
        snapshot.phase = GamePhase::Title;
        let title = compose(&snapshot);
        assert!(title.map.is_empty());
        assert_eq!(title.overlay[0].text, TITLE_BANNER);
        assert!(title.to_string().contains("Press ENTER to start!"));

        snapshot.phase = GamePhase::Win;
        let victory = compose(&snapshot);
        assert!(victory.map.is_empty());
        assert_eq!(victory.overlay[0].text, "SNOW DAY VICTORY!");
    }
}
