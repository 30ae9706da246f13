//! Stock levels shipped with the game.

use std::f64::consts::TAU;

use edge_runner_core::{AgentDefinition, LevelDefinition, VertexId, ViewDefinition};

const AGENT_SPEED: f64 = 0.01;
const RUNNER_RADIUS: f64 = 0.4;
const CHASER_RADIUS: f64 = 0.3;
const RING_SEGMENTS: u32 = 256;

/// Returns the built-in levels in play order.
#[must_use]
pub fn builtin_levels() -> Vec<LevelDefinition> {
    vec![ring(), house(), pinwheel(), finale()]
}

fn ring() -> LevelDefinition {
    let vertices = (0..RING_SEGMENTS)
        .map(|index| {
            let angle = TAU * f64::from(index) / f64::from(RING_SEGMENTS);
            [7.0 + 7.0 * angle.cos(), 7.0 + 7.0 * angle.sin()]
        })
        .collect();
    let edges = (0..RING_SEGMENTS)
        .map(|index| [index, (index + 1) % RING_SEGMENTS])
        .collect::<Vec<_>>();

    level(
        "level-00",
        vertices,
        &edges,
        ([-7.0, -7.0], 1.0 / 10.0),
        (7, 39),
    )
}

fn house() -> LevelDefinition {
    level(
        "level-01",
        vec![
            [0.0, 3.0],
            [4.0, 3.0],
            [9.0, 3.0],
            [9.0, 9.0],
            [8.0, 14.0],
            [0.0, 14.0],
            [4.0, 9.0],
            [4.0, 0.0],
            [15.0, 0.0],
            [15.0, 9.0],
        ],
        &[
            [0, 1],
            [1, 2],
            [2, 3],
            [3, 4],
            [4, 5],
            [5, 0],
            [6, 1],
            [1, 7],
            [7, 8],
            [8, 9],
            [9, 3],
            [3, 6],
        ],
        ([-7.5, -7.0], 0.1),
        (0, 9),
    )
}

fn pinwheel() -> LevelDefinition {
    level(
        "level-02-prime",
        vec![
            [2.0, 2.0],
            [5.0, 0.0],
            [8.0, 2.0],
            [10.0, 5.0],
            [8.0, 8.0],
            [5.0, 10.0],
            [2.0, 8.0],
            [0.0, 5.0],
            [5.0, 5.0],
        ],
        &[
            [0, 1],
            [1, 2],
            [2, 3],
            [3, 4],
            [4, 5],
            [5, 6],
            [6, 7],
            [7, 0],
            [0, 2],
            [2, 4],
            [4, 6],
            [6, 0],
            [0, 8],
            [2, 8],
            [4, 8],
            [6, 8],
        ],
        ([-5.0, -5.0], 1.0 / 7.0),
        (8, 1),
    )
}

/// Closing screen spelling out the end of the campaign. The chaser waits on
/// an isolated vertex.
fn finale() -> LevelDefinition {
    level(
        "das Ende.",
        vec![
            [0.0, 0.0],
            [2.0, 0.0],
            [2.0, 2.0],
            [0.0, 2.0],
            [2.0, 5.0],
            [3.0, 0.0],
            [5.0, 0.0],
            [5.0, 2.0],
            [3.0, 2.0],
            [5.0, 3.0],
            [3.0, 3.0],
            [6.0, 0.0],
            [8.0, 0.0],
            [8.0, 2.0],
            [6.0, 2.0],
            [6.0, 3.0],
            [8.0, 3.0],
            [10.0, 0.0],
            [13.0, 0.0],
            [10.0, 3.0],
            [12.0, 3.0],
            [10.0, 5.0],
            [13.0, 5.0],
            [14.0, 0.0],
            [14.0, 3.0],
            [16.0, 3.0],
            [16.0, 0.0],
            [17.0, 0.0],
            [19.0, 0.0],
            [19.0, 2.0],
            [17.0, 2.0],
            [19.0, 5.0],
            [20.0, 0.0],
            [22.0, 0.0],
            [20.0, 1.0],
            [22.0, 1.0],
            [22.0, 2.0],
            [21.0, 3.0],
            [20.0, 3.0],
            [23.0, 0.0],
        ],
        &[
            [0, 1],
            [1, 2],
            [2, 3],
            [3, 0],
            [2, 4],
            [5, 6],
            [6, 7],
            [7, 8],
            [8, 5],
            [7, 9],
            [9, 10],
            [11, 12],
            [12, 13],
            [13, 14],
            [14, 15],
            [15, 16],
            [17, 18],
            [17, 19],
            [19, 20],
            [19, 21],
            [21, 22],
            [23, 24],
            [24, 25],
            [25, 26],
            [27, 28],
            [28, 29],
            [29, 30],
            [30, 27],
            [29, 31],
            [32, 33],
            [32, 34],
            [34, 35],
            [35, 36],
            [36, 37],
            [37, 38],
            [38, 34],
        ],
        ([-11.0, -2.0], 0.1),
        (18, 39),
    )
}

fn level(
    name: &str,
    vertices: Vec<[f64; 2]>,
    edges: &[[u32; 2]],
    (translation, scale): ([f64; 2], f64),
    (runner, chaser): (u32, u32),
) -> LevelDefinition {
    LevelDefinition {
        name: name.to_owned(),
        vertices,
        edges: edges
            .iter()
            .map(|&[first, second]| [VertexId::new(first), VertexId::new(second)])
            .collect(),
        view: ViewDefinition { translation, scale },
        runner: AgentDefinition {
            vertex: VertexId::new(runner),
            speed: AGENT_SPEED,
            radius: RUNNER_RADIUS,
        },
        chaser: AgentDefinition {
            vertex: VertexId::new(chaser),
            speed: AGENT_SPEED,
            radius: CHASER_RADIUS,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalogue_is_in_play_order() {
        let names: Vec<_> = builtin_levels()
            .into_iter()
            .map(|level| level.name)
            .collect();

        assert_eq!(names, ["level-00", "level-01", "level-02-prime", "das Ende."]);
    }

    #[test]
    fn ring_is_closed() {
        let ring = ring();

        assert_eq!(ring.vertices.len(), 256);
        assert_eq!(ring.edges.len(), 256);
        assert_eq!(ring.edges[255], [VertexId::new(255), VertexId::new(0)]);
        let [x, y] = ring.vertices[64];
        assert!((x - 7.0).abs() < 1e-12);
        assert!((y - 14.0).abs() < 1e-12);
    }
}
