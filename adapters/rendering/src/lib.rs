#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Crown Arena adapters.

use anyhow::Result as AnyResult;
use crown_arena_core::{
    ArenaSnapshot, BannerMessage, CardId, Crowns, EntityId, EntityKind, EntitySnapshot,
    HealthSnapshot, MatchPhase, MatchStatus, Position, Side, Visual, ARENA_HEIGHT, ARENA_WIDTH,
    CENTERLINE_X, HAND_SIZE, RIVER_HALF_WIDTH,
};
use glam::Vec2;
use std::{error::Error, fmt, time::Duration};

/// Ticks in one deploy flicker cycle.
pub const FLICKER_PERIOD: u64 = 10;

/// Ticks of each flicker cycle during which deploying entities are drawn.
pub const FLICKER_VISIBLE_TICKS: u64 = 5;

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
    /// Grass covering both halves of the arena.
    pub const GRASS: Self = Self::from_rgb_u8(136, 204, 136);
    /// River separating the halves.
    pub const RIVER: Self = Self::from_rgb_u8(102, 102, 255);
    /// Bridge planks.
    pub const BRIDGE: Self = Self::from_rgb_u8(160, 82, 45);
    /// Health bar fill above half health.
    pub const HEALTH_HIGH: Self = Self::from_rgb_u8(0, 128, 0);
    /// Health bar fill between a fifth and half health.
    pub const HEALTH_MEDIUM: Self = Self::from_rgb_u8(255, 165, 0);
    /// Health bar fill at or below a fifth of health.
    pub const HEALTH_LOW: Self = Self::from_rgb_u8(255, 0, 0);
    /// Shield bar fill.
    pub const SHIELD: Self = Self::from_rgb_u8(192, 192, 192);
    /// Blast markers left by spells and bombs.
    pub const BLAST: Self = Self::from_rgb_u8(255, 255, 0);
    /// Lingering earthquake areas.
    pub const QUAKE: Self = Self::from_rgb_u8(139, 69, 19);

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

    /// Team color of the provided side.
    #[must_use]
    pub const fn team(side: Side) -> Self {
        match side {
            Side::Player => Self::from_rgb_u8(0, 0, 255),
            Side::Enemy => Self::from_rgb_u8(255, 0, 0),
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }

    /// Returns the same color with its alpha channel replaced.
    #[must_use]
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            alpha: alpha.clamp(0.0, 1.0),
            ..self
        }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Health bar fill color for the provided hit point ratio.
#[must_use]
pub fn health_color(ratio: f32) -> Color {
    if ratio > 0.5 {
        Color::HEALTH_HIGH
    } else if ratio > 0.2 {
        Color::HEALTH_MEDIUM
    } else {
        Color::HEALTH_LOW
    }
}

/// Reports whether an entity in its deploy delay is drawn on `tick`.
#[must_use]
pub const fn deploy_flicker_visible(tick: u64) -> bool {
    tick % FLICKER_PERIOD >= FLICKER_VISIBLE_TICKS
}

/// Converts a world position into a presentation vector.
#[must_use]
pub fn to_vec2(position: Position) -> Vec2 {
    Vec2::new(position.x, position.y)
}

/// Health and shield bars drawn above a combatant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HealthBar {
    /// Filled fraction of the hit point bar.
    pub ratio: f32,
    /// Fill color derived from the ratio.
    pub color: Color,
    /// Filled fraction of the shield bar, when the entity carries one.
    pub shield: Option<f32>,
    /// Remaining hit points rounded for the label.
    pub label: u32,
}

impl HealthBar {
    /// Builds the bar for a health readout.
    #[must_use]
    pub fn from_snapshot(health: HealthSnapshot) -> Self {
        let ratio = health.hitpoint_ratio.clamp(0.0, 1.0);
        Self {
            ratio,
            color: health_color(ratio),
            shield: health.shield_ratio.map(|shield| shield.clamp(0.0, 1.0)),
            label: health.hitpoints.max(0.0).ceil() as u32,
        }
    }
}

/// Status badge rendered next to an entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StatusBadge {
    /// Frozen or stunned.
    Frozen,
    /// Slowed.
    Slowed,
    /// King tower that has not been activated yet.
    Asleep,
}

impl StatusBadge {
    /// Glyph used by text backends.
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            Self::Frozen => '*',
            Self::Slowed => '~',
            Self::Asleep => 'z',
        }
    }
}

/// Drawable description of one entity or effect.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneEntity {
    /// Identifier allocated by the world.
    pub id: EntityId,
    /// Category of the entity.
    pub kind: EntityKind,
    /// Artwork identifier.
    pub visual: Visual,
    /// Owning side.
    pub side: Side,
    /// Centre in world units.
    pub center: Vec2,
    /// Footprint or effect radius in world units.
    pub radius: f32,
    /// Fill color.
    pub color: Color,
    /// Health bar for combatants.
    pub health_bar: Option<HealthBar>,
    /// Status badges in display order.
    pub badges: Vec<StatusBadge>,
}

impl SceneEntity {
    /// Builds the drawable for an entity snapshot.
    #[must_use]
    pub fn from_snapshot(entity: &EntitySnapshot) -> Self {
        let mut badges = Vec::new();
        if entity.frozen {
            badges.push(StatusBadge::Frozen);
        }
        if entity.slowed {
            badges.push(StatusBadge::Slowed);
        }
        if !entity.active {
            badges.push(StatusBadge::Asleep);
        }

        Self {
            id: entity.id,
            kind: entity.kind,
            visual: entity.visual,
            side: entity.side,
            center: to_vec2(entity.position),
            radius: entity.radius,
            color: entity_color(entity),
            health_bar: entity.health.map(HealthBar::from_snapshot),
            badges,
        }
    }
}

fn entity_color(entity: &EntitySnapshot) -> Color {
    let fade = entity.fade.unwrap_or(1.0);
    match entity.kind {
        EntityKind::SpellVisual => Color::BLAST.with_alpha(fade * 0.5),
        EntityKind::LingeringSpell => Color::QUAKE.with_alpha(0.3 + fade * 0.3),
        EntityKind::DeathBomb => Color::from_rgb_u8(64, 64, 64),
        EntityKind::Projectile | EntityKind::SpellProjectile => Color::team(entity.side).lighten(0.3),
        EntityKind::Tower | EntityKind::Building => Color::team(entity.side).lighten(0.15),
        EntityKind::Troop if entity.concealed => Color::team(entity.side).with_alpha(0.35),
        EntityKind::Troop => Color::team(entity.side),
    }
}

/// Static layout of the battlefield.
#[derive(Clone, Debug, PartialEq)]
pub struct ArenaPresentation {
    /// Width of the playable field in world units.
    pub width: f32,
    /// Height of the playable field in world units.
    pub height: f32,
    /// Left and right edges of the river.
    pub river: (f32, f32),
    /// Centres of the bridges spanning the river.
    pub bridges: Vec<Vec2>,
}

impl ArenaPresentation {
    /// Layout of the standard arena with the provided bridge centres.
    #[must_use]
    pub fn standard(bridges: impl IntoIterator<Item = Position>) -> Self {
        Self {
            width: ARENA_WIDTH,
            height: ARENA_HEIGHT,
            river: (CENTERLINE_X - RIVER_HALF_WIDTH, CENTERLINE_X + RIVER_HALF_WIDTH),
            bridges: bridges.into_iter().map(to_vec2).collect(),
        }
    }

    /// Reports whether a point lies inside the river bed.
    #[must_use]
    pub fn in_river(&self, point: Vec2) -> bool {
        point.x >= self.river.0 && point.x <= self.river.1
    }
}

/// Overlay showing the match clock, elixir and hand.
#[derive(Clone, Debug, PartialEq)]
pub struct HudPresentation {
    /// Current phase.
    pub phase: MatchPhase,
    /// Clock formatted as `m:ss`.
    pub clock: String,
    /// Player elixir.
    pub elixir: f32,
    /// Multiplier applied to elixir accrual.
    pub elixir_multiplier: u8,
    /// Crown tally.
    pub crowns: Crowns,
    /// Cards in the player's hand.
    pub hand: [Option<CardId>; HAND_SIZE],
    /// Card drawn next.
    pub next_card: Option<CardId>,
    /// Banner text, when one is visible.
    pub banner: Option<&'static str>,
    /// Winner once the match ended.
    pub winner: Option<Side>,
}

impl HudPresentation {
    /// Builds the overlay from the match status.
    #[must_use]
    pub fn from_status(status: &MatchStatus) -> Self {
        Self {
            phase: status.phase,
            clock: format_clock(status.seconds_remaining),
            elixir: status.elixir,
            elixir_multiplier: status.elixir_multiplier,
            crowns: status.crowns,
            hand: status.hand,
            next_card: status.next_card,
            banner: status.banner.map(|banner| BannerMessage::text(banner.message)),
            winner: status.winner,
        }
    }
}

/// Formats whole seconds as `m:ss`.
#[must_use]
pub fn format_clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Scene description combining the arena layout, its inhabitants and the HUD.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Tick the scene was captured at.
    pub tick: u64,
    /// Static battlefield layout.
    pub arena: ArenaPresentation,
    /// Entities to draw, in identifier order.
    pub entities: Vec<SceneEntity>,
    /// Match overlay.
    pub hud: HudPresentation,
}

impl Scene {
    /// Creates a new scene descriptor.
    #[must_use]
    pub fn new(
        tick: u64,
        arena: ArenaPresentation,
        entities: Vec<SceneEntity>,
        hud: HudPresentation,
    ) -> Self {
        Self {
            tick,
            arena,
            entities,
            hud,
        }
    }

    /// Builds a scene from world views. Deploying entities are omitted on
    /// the hidden half of each flicker cycle.
    #[must_use]
    pub fn capture(arena: ArenaPresentation, snapshot: &ArenaSnapshot, status: &MatchStatus) -> Self {
        let tick = snapshot.tick();
        let show_deploying = deploy_flicker_visible(tick);
        let entities = snapshot
            .iter()
            .filter(|entity| show_deploying || !entity.deploying)
            .map(SceneEntity::from_snapshot)
            .collect();
        Self::new(tick, arena, entities, HudPresentation::from_status(status))
    }

    /// Entities belonging to the provided side.
    pub fn entities_of(&self, side: Side) -> impl Iterator<Item = &SceneEntity> {
        self.entities.iter().filter(move |entity| entity.side == side)
    }
}

/// Fixed-resolution character grid a text backend draws onto.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    /// Number of character columns.
    pub columns: u32,
    /// Number of character rows.
    pub rows: u32,
}

impl Viewport {
    /// Creates a viewport; both dimensions must be positive.
    pub fn new(columns: u32, rows: u32) -> Result<Self, RenderingError> {
        if columns == 0 || rows == 0 {
            return Err(RenderingError::EmptyViewport { columns, rows });
        }
        Ok(Self { columns, rows })
    }

    /// Cell containing a world point, or `None` outside the arena.
    #[must_use]
    pub fn cell_of(&self, point: Vec2) -> Option<(u32, u32)> {
        if point.x < 0.0 || point.y < 0.0 || point.x >= ARENA_WIDTH || point.y >= ARENA_HEIGHT {
            return None;
        }
        let column = (point.x / ARENA_WIDTH * self.columns as f32) as u32;
        let row = (point.y / ARENA_HEIGHT * self.rows as f32) as u32;
        Some((column.min(self.columns - 1), row.min(self.rows - 1)))
    }

    /// World point at the centre of a cell.
    #[must_use]
    pub fn cell_center(&self, column: u32, row: u32) -> Vec2 {
        Vec2::new(
            (column as f32 + 0.5) * ARENA_WIDTH / self.columns as f32,
            (row as f32 + 0.5) * ARENA_HEIGHT / self.rows as f32,
        )
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title shown by the backend.
    pub title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            title: title.into(),
            clear_color,
            scene,
        }
    }
}

/// Answer of the scene update callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameControl {
    /// Present the updated scene and keep running.
    Continue,
    /// Present the updated scene one last time and stop.
    Exit,
}

/// Rendering backend capable of presenting Crown Arena scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until the update callback asks it to stop.
    ///
    /// The provided `update_scene` closure receives the frame delta and may
    /// mutate the scene before it is presented.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, &mut Scene) -> FrameControl;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq, Eq)]
pub enum RenderingError {
    /// A viewport needs at least one column and one row.
    EmptyViewport {
        /// Requested column count.
        columns: u32,
        /// Requested row count.
        rows: u32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyViewport { columns, rows } => {
                write!(f, "viewport must not be empty (received {columns}x{rows})")
            }
        }
    }
}

impl Error for RenderingError {}
