#![allow(dead_code)]
use mesh_splitter::prelude::*;

/// 2x2 quad grid with edges at level -1 and corner vertices at level -2.
///
/// ```text
/// 6---7---8
/// | 2 | 3 |
/// 3---4---5
/// | 0 | 1 |
/// 0---1---2
/// ```
///
/// Edges 0..8 run around the boundary counter-clockwise from `[0,1]`;
/// edges 8..12 are the interior ones `[1,4] [4,7] [3,4] [4,5]`.
pub fn two_by_two() -> Mesh {
    let mut coords = Vec::new();
    for j in 0..3 {
        for i in 0..3 {
            coords.extend([i as f64, j as f64]);
        }
    }
    let mut mesh = Mesh::new("grid", 2, coords).unwrap();
    mesh.set_level(
        0,
        LevelMesh::new(
            vec![CellType::Quadrilateral; 4],
            Connectivity::from_entities([
                [0usize, 1, 4, 3],
                [1, 2, 5, 4],
                [3, 4, 7, 6],
                [4, 5, 8, 7],
            ]),
        )
        .with_families(vec![1, 2, 1, 2]),
    )
    .unwrap();
    mesh.set_level(
        -1,
        LevelMesh::new(
            vec![CellType::Segment; 12],
            Connectivity::from_entities([
                [0usize, 1],
                [1, 2],
                [2, 5],
                [5, 8],
                [8, 7],
                [7, 6],
                [6, 3],
                [3, 0],
                [1, 4],
                [4, 7],
                [3, 4],
                [4, 5],
            ]),
        )
        .with_families(vec![-1, -1, -1, -1, -1, -1, -1, -1, 0, 0, 0, 0]),
    )
    .unwrap();
    mesh.set_level(
        -2,
        LevelMesh::new(
            vec![CellType::Vertex; 4],
            Connectivity::from_entities([[0usize], [2], [6], [8]]),
        ),
    )
    .unwrap();
    mesh.set_node_families(Some(vec![0, 0, 0, 0, -5, 0, 0, 0, 0]));

    let fams = mesh.families_mut();
    fams.add_family("left", 1);
    fams.add_family("right", 2);
    fams.add_family("wall", -1);
    fams.add_family("center", -5);
    fams.add_family_to_group("g_left", "left");
    fams.add_family_to_group("g_right", "right");
    fams.add_family_to_group("g_wall", "wall");
    fams.add_family_to_group("g_center", "center");
    mesh
}

/// `nx` by `ny` quad grid: nodes row by row, every distinct edge at level -1
/// (horizontal edges first, then vertical ones), corner vertices at level -2.
pub fn quad_grid(nx: usize, ny: usize) -> Mesh {
    let node = |i: usize, j: usize| j * (nx + 1) + i;
    let mut coords = Vec::with_capacity((nx + 1) * (ny + 1) * 2);
    for j in 0..=ny {
        for i in 0..=nx {
            coords.extend([i as f64, j as f64]);
        }
    }
    let mut mesh = Mesh::new("quad_grid", 2, coords).unwrap();

    let mut cells = Vec::with_capacity(nx * ny);
    for j in 0..ny {
        for i in 0..nx {
            cells.push([node(i, j), node(i + 1, j), node(i + 1, j + 1), node(i, j + 1)]);
        }
    }
    let families = (0..nx * ny).map(|c| (c % nx % 2) as i32 + 1).collect();
    mesh.set_level(
        0,
        LevelMesh::new(vec![CellType::Quadrilateral; nx * ny], Connectivity::from_entities(cells))
            .with_families(families),
    )
    .unwrap();

    let mut edges = Vec::new();
    for j in 0..=ny {
        for i in 0..nx {
            edges.push([node(i, j), node(i + 1, j)]);
        }
    }
    for j in 0..ny {
        for i in 0..=nx {
            edges.push([node(i, j), node(i, j + 1)]);
        }
    }
    mesh.set_level(
        -1,
        LevelMesh::new(vec![CellType::Segment; edges.len()], Connectivity::from_entities(edges)),
    )
    .unwrap();

    let corners = [node(0, 0), node(nx, 0), node(0, ny), node(nx, ny)];
    mesh.set_level(
        -2,
        LevelMesh::new(
            vec![CellType::Vertex; 4],
            Connectivity::from_entities(corners.iter().map(std::slice::from_ref)),
        ),
    )
    .unwrap();
    mesh
}

/// Strip of `pattern.len()` columns; column `k` is one quad when
/// `pattern[k]` is true and two triangles otherwise.
pub fn mixed_strip(pattern: &[bool]) -> Mesh {
    let n = pattern.len();
    let mut coords = Vec::with_capacity((n + 1) * 4);
    for j in 0..2 {
        for i in 0..=n {
            coords.extend([i as f64, j as f64]);
        }
    }
    let mut mesh = Mesh::new("strip", 2, coords).unwrap();
    let mut types = Vec::new();
    let mut cells: Vec<Vec<usize>> = Vec::new();
    for (k, &quad) in pattern.iter().enumerate() {
        let (a, b, c, d) = (k, k + 1, n + 2 + k, n + 1 + k);
        if quad {
            types.push(CellType::Quadrilateral);
            cells.push(vec![a, b, c, d]);
        } else {
            types.extend([CellType::Triangle; 2]);
            cells.push(vec![a, b, c]);
            cells.push(vec![a, c, d]);
        }
    }
    mesh.set_level(0, LevelMesh::new(types, Connectivity::from_entities(cells)))
        .unwrap();
    mesh
}

/// One-component series with one step per entry of `steps`.
pub fn series(name: &str, steps: Vec<FieldStep>) -> FieldSeries {
    let mut s = FieldSeries::new(name);
    for step in steps {
        s.push_step(step);
    }
    s
}

/// Node step whose value at node `n` is `n + offset`.
pub fn node_step(n_nodes: usize, iteration: i32, offset: f64) -> FieldStep {
    FieldStep::on_nodes(
        StepTime::new(iteration, -1, iteration as f64),
        FieldValues::scalar((0..n_nodes).map(|n| n as f64 + offset).collect()),
    )
}

/// Cell step on `level` whose value at entity `e` is `e + offset`.
pub fn cell_step(level: i32, n_entities: usize, iteration: i32, offset: f64) -> FieldStep {
    FieldStep::on_cells(
        StepTime::new(iteration, -1, iteration as f64),
        Discretization::Cells,
        level,
        FieldValues::scalar((0..n_entities).map(|e| e as f64 + offset).collect()),
    )
}

/// Profiled node step whose value at profile node `n` is `n + offset`.
pub fn profiled_node_step(profile: &Profile, iteration: i32, offset: f64) -> FieldStep {
    FieldStep::on_nodes(
        StepTime::new(iteration, -1, iteration as f64),
        FieldValues::scalar(profile.ids().iter().map(|&n| n as f64 + offset).collect()),
    )
    .with_profile(profile.clone())
}
