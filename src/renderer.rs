/*
 * Renderer Module
 *
 * The simulation never draws directly. It talks to a `Renderer`, called once
 * per agent per simulated frame plus once per quadtree node when the debug
 * overlay is on.
 *
 * `DisplayList` is the renderer used by the app: it records the frame's draw
 * commands during `update` and `paint` replays them onto a nannou `Draw` in
 * `view`. A paused simulation records nothing, so the last frame stays on
 * screen.
 */

use nannou::geom::Rect as WindowRect;
use nannou::prelude::*;

use crate::agent::Agent;
use crate::bounds::Rect;
use crate::species::Species;
use crate::vector::Vector;

pub trait Renderer {
    // Called once before the frame's draw calls with the arena being drawn
    fn begin_frame(&mut self, _arena: Rect) {}

    fn draw_agent(&mut self, agent: &Agent);

    fn draw_region(&mut self, rect: Rect);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCommand {
    Agent {
        position: Vector,
        heading: f32,
        species: Species,
    },
    Region(Rect),
}

#[derive(Debug, Clone, Default)]
pub struct DisplayList {
    arena: Rect,
    commands: Vec<DrawCommand>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arena(&self) -> Rect {
        self.arena
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn agent_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|command| matches!(command, DrawCommand::Agent { .. }))
            .count()
    }

    pub fn region_count(&self) -> usize {
        self.commands.len() - self.agent_count()
    }
}

impl Renderer for DisplayList {
    fn begin_frame(&mut self, arena: Rect) {
        self.arena = arena;
        self.commands.clear();
    }

    fn draw_agent(&mut self, agent: &Agent) {
        self.commands.push(DrawCommand::Agent {
            position: agent.position,
            heading: agent.heading,
            species: agent.species,
        });
    }

    fn draw_region(&mut self, rect: Rect) {
        self.commands.push(DrawCommand::Region(rect));
    }
}

// Arena space (origin top-left, y down) to nannou space (origin centre, y up)
#[inline]
fn to_screen(point: Vector, window_rect: WindowRect) -> Point2 {
    pt2(
        window_rect.left() + point.x,
        window_rect.top() - point.y,
    )
}

// Replay a display list onto a nannou draw context
pub fn paint(list: &DisplayList, draw: &Draw, window_rect: WindowRect) {
    for command in list.commands() {
        match *command {
            DrawCommand::Agent { position, heading, species } => {
                let shape = species.shape();
                let (r, g, b) = species.color();
                let points = [
                    pt2(0.0, 0.0),
                    pt2(-shape.length, shape.half_width),
                    pt2(-shape.length, -shape.half_width),
                ];
                // Flipping y mirrors the rotation direction as well
                draw.polygon()
                    .color(rgb(r, g, b))
                    .points(points)
                    .xy(to_screen(position, window_rect))
                    .rotate(-heading);
            }
            DrawCommand::Region(rect) => {
                let centre = to_screen(rect.center(), window_rect);
                draw.rect()
                    .xy(centre)
                    .w_h(rect.width, rect.height)
                    .no_fill()
                    .stroke_weight(1.0)
                    .stroke(rgba(1.0, 1.0, 1.0, 0.35));
            }
        }
    }
}
