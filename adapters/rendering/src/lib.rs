#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Edge Runner adapters.

use anyhow::Result as AnyResult;
use edge_runner_core::{AgentRole, AgentSnapshot, CoverageSummary, EdgeSnapshot, ViewDefinition};
use glam::{Mat3, Vec2};
use std::time::Duration;
use thiserror::Error;

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
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Colors used to draw a scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    /// Unpainted edge color.
    pub edge: Color,
    /// Color of painted edge spans.
    pub paint: Color,
    /// Runner marker color.
    pub runner: Color,
    /// Chaser marker color.
    pub chaser: Color,
    /// Overlay text color.
    pub text: Color,
}

impl Default for Palette {
    fn default() -> Self {
        let paint = Color::from_rgb_u8(0x3d, 0xa5, 0xd9);
        Self {
            edge: Color::from_rgb_u8(0x4a, 0x4e, 0x5a),
            paint,
            runner: paint.lighten(0.35),
            chaser: Color::from_rgb_u8(0xe0, 0x4f, 0x3f),
            text: Color::from_rgb_u8(0xee, 0xee, 0xee),
        }
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct FrameInput {
    /// Whether an "up" key is held.
    pub up: bool,
    /// Whether a "down" key is held.
    pub down: bool,
    /// Whether a "left" key is held.
    pub left: bool,
    /// Whether a "right" key is held.
    pub right: bool,
}

/// Maps level coordinates into clip space, where both axes span `-1..=1`
/// and `y` points up.
///
/// Points are translated first and scaled second; the result is then squeezed
/// along the longer viewport axis so the level keeps its aspect ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
    translation: Vec2,
    scale: f32,
}

impl ViewTransform {
    /// Builds the transform requested by a level.
    pub fn from_view(view: ViewDefinition) -> Result<Self, RenderingError> {
        let [x, y] = view.translation;
        if !(x.is_finite() && y.is_finite()) {
            return Err(RenderingError::InvalidTranslation { x, y });
        }
        if !(view.scale.is_finite() && view.scale > 0.0) {
            return Err(RenderingError::InvalidScale { scale: view.scale });
        }

        Ok(Self {
            translation: Vec2::new(x as f32, y as f32),
            scale: view.scale as f32,
        })
    }

    /// Translation applied before scaling.
    #[must_use]
    pub const fn translation(&self) -> Vec2 {
        self.translation
    }

    /// Uniform scale applied after translating.
    #[must_use]
    pub const fn scale(&self) -> f32 {
        self.scale
    }

    /// Level-to-clip matrix for a viewport of the provided pixel size.
    #[must_use]
    pub fn clip_matrix(&self, viewport: Vec2) -> Mat3 {
        let shorter = viewport.x.min(viewport.y);
        let aspect = if shorter > 0.0 {
            Vec2::splat(shorter) / viewport
        } else {
            Vec2::ONE
        };

        Mat3::from_scale(aspect * self.scale) * Mat3::from_translation(self.translation)
    }

    /// Projects a level point into pixel coordinates with `y` pointing down.
    #[must_use]
    pub fn to_screen(&self, point: Vec2, viewport: Vec2) -> Vec2 {
        let clip = self.clip_matrix(viewport).transform_point2(point);
        Vec2::new(
            (clip.x + 1.0) * 0.5 * viewport.x,
            (1.0 - clip.y) * 0.5 * viewport.y,
        )
    }

    /// Converts a level distance into pixels.
    #[must_use]
    pub fn to_screen_length(&self, length: f32, viewport: Vec2) -> f32 {
        length * self.scale * 0.5 * viewport.x.min(viewport.y)
    }
}

/// Edge drawn as a strip, together with the portions covered by paint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeStrip {
    /// First endpoint in level coordinates.
    pub start: Vec2,
    /// Second endpoint in level coordinates.
    pub end: Vec2,
    /// Paint crept in from `start` and from `end`, as fractions of the edge.
    pub coverage: [f32; 2],
}

impl EdgeStrip {
    /// Reports whether paint covers the whole strip.
    #[must_use]
    pub fn is_covered(&self) -> bool {
        self.coverage[0] + self.coverage[1] >= 1.0
    }

    /// Painted segments: `[0, cov0]` from the start and `[1 - cov1, 1]` from
    /// the end, merged into the whole strip once they meet.
    #[must_use]
    pub fn covered_spans(&self) -> Vec<[Vec2; 2]> {
        if self.is_covered() {
            return vec![[self.start, self.end]];
        }

        let [from_start, from_end] = self.coverage;
        let mut spans = Vec::with_capacity(2);
        if from_start > 0.0 {
            spans.push([self.start, self.start.lerp(self.end, from_start)]);
        }
        if from_end > 0.0 {
            spans.push([self.start.lerp(self.end, 1.0 - from_end), self.end]);
        }
        spans
    }
}

impl From<&EdgeSnapshot> for EdgeStrip {
    fn from(snapshot: &EdgeSnapshot) -> Self {
        let [start, end] = snapshot.endpoints;
        Self {
            start: start.as_vec2(),
            end: end.as_vec2(),
            coverage: [snapshot.coverage[0] as f32, snapshot.coverage[1] as f32],
        }
    }
}

/// Circle marking an agent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AgentMarker {
    /// Agent represented by the marker.
    pub role: AgentRole,
    /// Centre in level coordinates.
    pub position: Vec2,
    /// Radius in level units.
    pub radius: f32,
}

impl From<&AgentSnapshot> for AgentMarker {
    fn from(snapshot: &AgentSnapshot) -> Self {
        Self {
            role: snapshot.role,
            position: snapshot.point.as_vec2(),
            radius: snapshot.radius as f32,
        }
    }
}

/// Scene description combining the level graph, its paint and both agents.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Name of the level on display.
    pub level_name: String,
    /// Camera placement for the level.
    pub view: ViewTransform,
    /// Every edge of the level in identifier order.
    pub edges: Vec<EdgeStrip>,
    /// Player-steered agent.
    pub runner: AgentMarker,
    /// Pursuing agent.
    pub chaser: AgentMarker,
    /// Share of the graph covered by paint, in `0.0..=1.0`.
    pub coverage_fraction: f32,
    /// Optional message shown over the scene.
    pub banner: Option<String>,
    /// Colors used to draw the scene.
    pub palette: Palette,
}

impl Scene {
    /// Assembles a scene from world snapshots.
    pub fn from_snapshots(
        level_name: impl Into<String>,
        view: ViewDefinition,
        edges: &[EdgeSnapshot],
        runner: &AgentSnapshot,
        chaser: &AgentSnapshot,
        coverage: CoverageSummary,
    ) -> Result<Self, RenderingError> {
        Ok(Self {
            level_name: level_name.into(),
            view: ViewTransform::from_view(view)?,
            edges: edges.iter().map(EdgeStrip::from).collect(),
            runner: AgentMarker::from(runner),
            chaser: AgentMarker::from(chaser),
            coverage_fraction: coverage.fraction() as f32,
            banner: None,
            palette: Palette::default(),
        })
    }

    /// Markers for both agents, runner first.
    #[must_use]
    pub fn agents(&self) -> [AgentMarker; 2] {
        [self.runner, self.chaser]
    }

    /// Marker color for the agent.
    #[must_use]
    pub fn agent_color(&self, role: AgentRole) -> Color {
        match role {
            AgentRole::Runner => self.palette.runner,
            AgentRole::Chaser => self.palette.chaser,
        }
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Edge Runner scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the simulated frame delta
    /// and the keys held during the frame, and rewrites the scene before it is
    /// drawn.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum RenderingError {
    /// The view scale must be positive and finite.
    #[error("view scale must be positive and finite (received {scale})")]
    InvalidScale {
        /// Provided scale that failed validation.
        scale: f64,
    },
    /// The view translation must be finite.
    #[error("view translation must be finite (received [{x}, {y}])")]
    InvalidTranslation {
        /// Provided horizontal offset.
        x: f64,
        /// Provided vertical offset.
        y: f64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use edge_runner_core::{EdgeId, Position, VertexId};
    use glam::DVec2;

    fn view(translation: [f64; 2], scale: f64) -> ViewDefinition {
        ViewDefinition { translation, scale }
    }

    fn strip(coverage: [f32; 2]) -> EdgeStrip {
        EdgeStrip {
            start: Vec2::ZERO,
            end: Vec2::new(10.0, 0.0),
            coverage,
        }
    }

    #[test]
    fn view_transform_rejects_invalid_scale_without_panicking() {
        let error = ViewTransform::from_view(view([0.0, 0.0], 0.0))
            .expect_err("zero scale must be rejected");

        assert!(matches!(error, RenderingError::InvalidScale { scale } if scale == 0.0));
        assert!(ViewTransform::from_view(view([f64::NAN, 0.0], 1.0)).is_err());
    }

    #[test]
    fn view_transform_translates_then_scales() {
        let transform =
            ViewTransform::from_view(view([-7.0, -7.0], 0.1)).expect("valid view");
        let viewport = Vec2::new(800.0, 800.0);

        let centre = transform.to_screen(Vec2::new(7.0, 7.0), viewport);
        let top = transform.to_screen(Vec2::new(7.0, 14.0), viewport);

        assert!((centre - Vec2::new(400.0, 400.0)).length() < 1e-3);
        assert!((top - Vec2::new(400.0, 120.0)).length() < 1e-3);
    }

    #[test]
    fn view_transform_letterboxes_the_longer_axis() {
        let transform = ViewTransform::from_view(view([0.0, 0.0], 1.0)).expect("valid view");
        let viewport = Vec2::new(1600.0, 800.0);

        let right = transform.to_screen(Vec2::new(1.0, 0.0), viewport);
        let up = transform.to_screen(Vec2::new(0.0, 1.0), viewport);

        assert!((right - Vec2::new(1200.0, 400.0)).length() < 1e-3);
        assert!((up - Vec2::new(800.0, 0.0)).length() < 1e-3);
        assert!((transform.to_screen_length(1.0, viewport) - 400.0).abs() < 1e-3);
    }

    #[test]
    fn covered_spans_grow_from_both_ends() {
        assert!(strip([0.0, 0.0]).covered_spans().is_empty());

        let spans = strip([0.2, 0.3]).covered_spans();

        assert_eq!(spans.len(), 2);
        assert!((spans[0][1] - Vec2::new(2.0, 0.0)).length() < 1e-5);
        assert!((spans[1][0] - Vec2::new(7.0, 0.0)).length() < 1e-5);
        assert_eq!(spans[1][1], Vec2::new(10.0, 0.0));
    }

    #[test]
    fn covered_spans_merge_once_the_sides_meet() {
        let edge = strip([1.0, 1.0]);

        assert!(edge.is_covered());
        assert_eq!(edge.covered_spans(), vec![[Vec2::ZERO, Vec2::new(10.0, 0.0)]]);
    }

    #[test]
    fn scene_is_built_from_snapshots() {
        let agent = |role, point: DVec2, radius| AgentSnapshot {
            role,
            position: Position::AtVertex {
                anchor: VertexId::new(0),
            },
            point,
            clock_ms: 0.0,
            speed: 0.01,
            radius,
        };
        let edges = [EdgeSnapshot {
            id: EdgeId::new(0),
            endpoints: [DVec2::ZERO, DVec2::new(4.0, 0.0)],
            coverage: [0.25, 0.0],
            length: 4.0,
        }];

        let scene = Scene::from_snapshots(
            "strip",
            view([0.0, 0.0], 0.25),
            &edges,
            &agent(AgentRole::Runner, DVec2::ZERO, 0.4),
            &agent(AgentRole::Chaser, DVec2::new(4.0, 0.0), 0.3),
            CoverageSummary {
                covered_length: 1.0,
                total_length: 4.0,
            },
        )
        .expect("valid scene");

        assert_eq!(scene.level_name, "strip");
        assert_eq!(scene.edges[0].coverage, [0.25, 0.0]);
        assert_eq!(scene.agents()[1].position, Vec2::new(4.0, 0.0));
        assert_eq!(scene.agent_color(AgentRole::Chaser), scene.palette.chaser);
        assert!((scene.coverage_fraction - 0.25).abs() < 1e-6);
        assert!(scene.banner.is_none());
    }
}
