use std::{fmt::Write as _, io::Write, time::Duration};

use anyhow::{Context, Result as AnyResult};
use crown_arena_core::{CardId, EntityKind, Side, TowerKind, Visual, TILE_SIZE};
use crown_arena_rendering::{
    FrameControl, Presentation, RenderingBackend, Scene, SceneEntity, Viewport,
};

/// Simulated time covered by one frame.
const FRAME_DELTA: Duration = Duration::from_nanos(16_666_667);

/// Rendering backend that prints scenes as character grids.
#[derive(Debug)]
pub(crate) struct TextBackend<W> {
    viewport: Viewport,
    frame_interval: u64,
    out: W,
}

impl<W: Write> TextBackend<W> {
    /// `frame_interval` of zero prints only the first and last frames.
    pub(crate) fn new(viewport: Viewport, frame_interval: u64, out: W) -> Self {
        Self {
            viewport,
            frame_interval,
            out,
        }
    }

    fn present(&mut self, scene: &Scene) -> AnyResult<()> {
        self.out
            .write_all(render_frame(scene, self.viewport).as_bytes())
            .context("failed to write frame")
    }
}

impl<W: Write> RenderingBackend for TextBackend<W> {
    fn run<F>(mut self, presentation: Presentation, mut update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, &mut Scene) -> FrameControl,
    {
        let mut scene = presentation.scene;
        writeln!(self.out, "== {} ==", presentation.title).context("failed to write title")?;
        self.present(&scene)?;

        loop {
            let control = update_scene(FRAME_DELTA, &mut scene);
            let due = self.frame_interval > 0 && scene.tick % self.frame_interval == 0;
            if due || control == FrameControl::Exit {
                self.present(&scene)?;
            }
            if control == FrameControl::Exit {
                break;
            }
        }

        self.out.flush().context("failed to flush frames")
    }
}

/// Draws the scene onto a character grid followed by a HUD line.
pub(crate) fn render_frame(scene: &Scene, viewport: Viewport) -> String {
    let mut grid = vec![vec!['.'; viewport.columns as usize]; viewport.rows as usize];
    for (row, cells) in grid.iter_mut().enumerate() {
        for (column, cell) in cells.iter_mut().enumerate() {
            let center = viewport.cell_center(column as u32, row as u32);
            if scene.arena.in_river(center) {
                let on_bridge = scene
                    .arena
                    .bridges
                    .iter()
                    .any(|bridge| (bridge.y - center.y).abs() <= TILE_SIZE);
                *cell = if on_bridge { '=' } else { '~' };
            }
        }
    }

    // Later entities overwrite earlier ones; combatants are drawn last.
    let (effects, combatants): (Vec<&SceneEntity>, Vec<&SceneEntity>) = scene
        .entities
        .iter()
        .partition(|entity| entity.health_bar.is_none());
    for entity in effects.into_iter().chain(combatants) {
        if let Some((column, row)) = viewport.cell_of(entity.center) {
            grid[row as usize][column as usize] = glyph(entity);
        }
    }

    let mut frame = String::new();
    for cells in grid {
        frame.extend(cells);
        frame.push('\n');
    }
    frame.push_str(&hud_line(scene));
    frame.push('\n');
    frame
}

fn glyph(entity: &SceneEntity) -> char {
    let symbol = match (entity.kind, entity.visual) {
        (_, Visual::Tower(TowerKind::King)) => 'K',
        (_, Visual::Tower(TowerKind::Princess)) => 'P',
        (EntityKind::Projectile, _) => return '+',
        (EntityKind::SpellProjectile, _) => return 'o',
        (EntityKind::SpellVisual, _) => return '#',
        (EntityKind::DeathBomb, _) => return '@',
        (EntityKind::LingeringSpell, _) => return '%',
        (_, Visual::Card(card)) => card_initial(card),
        _ => '?',
    };
    match entity.side {
        Side::Player => symbol.to_ascii_uppercase(),
        Side::Enemy => symbol.to_ascii_lowercase(),
    }
}

fn card_initial(card: CardId) -> char {
    format!("{card:?}").chars().next().unwrap_or('?')
}

fn hud_line(scene: &Scene) -> String {
    let hud = &scene.hud;
    let mut line = format!(
        "t={} {} {:?} elixir {:.1} x{} crowns {}-{} hand",
        scene.tick,
        hud.clock,
        hud.phase,
        hud.elixir,
        hud.elixir_multiplier,
        hud.crowns.player,
        hud.crowns.enemy,
    );
    for card in hud.hand {
        match card {
            Some(card) => {
                let _ = write!(line, " {card:?}");
            }
            None => line.push_str(" -"),
        }
    }
    if let Some(next) = hud.next_card {
        let _ = write!(line, " next {next:?}");
    }
    if let Some(banner) = hud.banner {
        let _ = write!(line, " [{banner}]");
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crown_arena_core::Position;
    use crown_arena_rendering::ArenaPresentation;
    use crown_arena_world::{query, World};

    fn scene() -> Scene {
        let world = World::default();
        Scene::capture(
            ArenaPresentation::standard([Position::new(300.0, 85.0), Position::new(300.0, 235.0)]),
            &query::arena_snapshot(&world),
            &query::match_status(&world),
        )
    }

    #[test]
    fn frames_show_all_six_towers() {
        let viewport = Viewport::new(60, 15).expect("positive dimensions");
        let frame = render_frame(&scene(), viewport);
        assert_eq!(frame.lines().count(), 16);
        let grid: String = frame.lines().take(15).collect();
        assert_eq!(grid.matches('K').count(), 1);
        assert_eq!(grid.matches('k').count(), 1);
        assert_eq!(grid.matches('P').count(), 2);
        assert_eq!(grid.matches('p').count(), 2);
        assert!(grid.contains('='));
        assert!(grid.contains('~'));
        assert!(frame.contains("crowns 0-0"));
    }

    #[test]
    fn backend_prints_every_interval_and_the_final_frame() {
        let viewport = Viewport::new(30, 5).expect("positive dimensions");
        let mut out = Vec::new();
        let backend = TextBackend::new(viewport, 4, &mut out);
        let presentation = Presentation::new("test", crown_arena_rendering::Color::GRASS, scene());

        backend
            .run(presentation, |_, scene| {
                scene.tick += 1;
                if scene.tick == 10 {
                    FrameControl::Exit
                } else {
                    FrameControl::Continue
                }
            })
            .expect("writing to memory succeeds");

        let text = String::from_utf8(out).expect("utf-8 frames");
        let frames = text.matches("t=").count();
        // Initial frame, ticks 4 and 8, and the final frame at tick 10.
        assert_eq!(frames, 4);
        assert!(text.starts_with("== test =="));
    }
}
