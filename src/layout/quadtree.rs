const QUADTREE_LEAF_CAPACITY: usize = 12;
const QUADTREE_MAX_DEPTH: usize = 10;

pub(super) type Point = [f64; 2];

#[derive(Clone, Copy, Debug)]
pub(super) struct QuadBounds {
    pub(super) center: Point,
    pub(super) half_extent: f64,
}

impl QuadBounds {
    fn from_points(points: &[Point]) -> Option<Self> {
        let mut min = [f64::INFINITY; 2];
        let mut max = [f64::NEG_INFINITY; 2];

        for point in points {
            min[0] = min[0].min(point[0]);
            min[1] = min[1].min(point[1]);
            max[0] = max[0].max(point[0]);
            max[1] = max[1].max(point[1]);
        }

        if !min.iter().chain(&max).all(|value| value.is_finite()) {
            return None;
        }

        let center = [(min[0] + max[0]) * 0.5, (min[1] + max[1]) * 0.5];
        let span = (max[0] - min[0]).max(max[1] - min[1]).max(1.0);

        Some(Self {
            center,
            half_extent: (span * 0.5) + 1.0,
        })
    }

    pub(super) fn contains(self, point: Point) -> bool {
        (point[0] - self.center[0]).abs() <= self.half_extent
            && (point[1] - self.center[1]).abs() <= self.half_extent
    }

    fn child(self, quadrant: usize) -> Self {
        let quarter = self.half_extent * 0.5;
        let (dx, dy) = match quadrant {
            0 => (-quarter, -quarter),
            1 => (quarter, -quarter),
            2 => (-quarter, quarter),
            _ => (quarter, quarter),
        };

        Self {
            center: [self.center[0] + dx, self.center[1] + dy],
            half_extent: quarter,
        }
    }

    fn quadrant_for(self, point: Point) -> usize {
        let right = point[0] >= self.center[0];
        let lower = point[1] >= self.center[1];
        match (right, lower) {
            (false, false) => 0,
            (true, false) => 1,
            (false, true) => 2,
            (true, true) => 3,
        }
    }

    pub(super) fn side_length(self) -> f64 {
        self.half_extent * 2.0
    }
}

/// Barnes-Hut cell. Every node carries the same charge, so the center of
/// mass is the plain mean of the contained points.
pub(super) struct QuadNode {
    pub(super) bounds: QuadBounds,
    pub(super) center_of_mass: Point,
    pub(super) mass: f64,
    pub(super) indices: Vec<usize>,
    pub(super) children: [Option<Box<QuadNode>>; 4],
}

/// Cell outline for the debug overlay, in layout coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuadtreeCell {
    pub center: (f64, f64),
    pub half_extent: f64,
    pub depth: usize,
    pub is_leaf: bool,
}

impl QuadNode {
    pub(super) fn build(positions: &[Point]) -> Option<Self> {
        let bounds = QuadBounds::from_points(positions)?;
        let indices = (0..positions.len()).collect::<Vec<_>>();
        Some(Self::build_node(bounds, indices, positions, 0))
    }

    fn build_node(
        bounds: QuadBounds,
        indices: Vec<usize>,
        positions: &[Point],
        depth: usize,
    ) -> Self {
        let mut center_of_mass = [0.0; 2];
        for &index in &indices {
            center_of_mass[0] += positions[index][0];
            center_of_mass[1] += positions[index][1];
        }

        let mass = indices.len() as f64;
        if mass > 0.0 {
            center_of_mass[0] /= mass;
            center_of_mass[1] /= mass;
        }

        let mut node = Self {
            bounds,
            center_of_mass,
            mass,
            indices,
            children: std::array::from_fn(|_| None),
        };

        if depth >= QUADTREE_MAX_DEPTH || node.indices.len() <= QUADTREE_LEAF_CAPACITY {
            return node;
        }

        let mut buckets = std::array::from_fn::<_, 4, _>(|_| Vec::new());
        for &index in &node.indices {
            buckets[bounds.quadrant_for(positions[index])].push(index);
        }

        // Coincident points would split forever.
        if buckets.iter().filter(|bucket| !bucket.is_empty()).count() <= 1 {
            return node;
        }

        for (quadrant, bucket) in buckets.into_iter().enumerate() {
            if bucket.is_empty() {
                continue;
            }
            node.children[quadrant] = Some(Box::new(Self::build_node(
                bounds.child(quadrant),
                bucket,
                positions,
                depth + 1,
            )));
        }
        node.indices.clear();
        node
    }

    pub(super) fn is_leaf(&self) -> bool {
        self.children.iter().all(Option::is_none)
    }
}

pub(super) fn collect_quadtree_cells(node: &QuadNode, depth: usize, cells: &mut Vec<QuadtreeCell>) {
    cells.push(QuadtreeCell {
        center: (node.bounds.center[0], node.bounds.center[1]),
        half_extent: node.bounds.half_extent,
        depth,
        is_leaf: node.is_leaf(),
    });

    for child in node.children.iter().flatten() {
        collect_quadtree_cells(child, depth + 1, cells);
    }
}
