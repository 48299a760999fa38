use super::NodePosition;
use super::quadtree::{Point, QuadNode};

/// Charge never divides by less than this squared distance.
const DISTANCE_MIN2: f64 = 1.0;

/// Deterministic source for the tiny offsets that separate coincident nodes.
#[derive(Clone, Debug)]
pub(super) struct Lcg(u32);

impl Lcg {
    pub(super) fn new() -> Self {
        Self(1)
    }

    fn next_unit(&mut self) -> f64 {
        self.0 = self.0.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        f64::from(self.0) / 4_294_967_296.0
    }

    pub(super) fn jiggle(&mut self) -> f64 {
        (self.next_unit() - 0.5) * 1e-6
    }
}

#[derive(Clone, Copy, Debug)]
pub(super) struct Link {
    pub(super) source: usize,
    pub(super) target: usize,
    pub(super) strength: f64,
    /// Share of the correction applied to the target.
    pub(super) bias: f64,
}

impl Link {
    /// Weak links between hubs, strong links to leaves; the lighter endpoint
    /// moves more.
    pub(super) fn weighted(pairs: &[(usize, usize)], node_count: usize) -> Vec<Self> {
        let mut degree = vec![0usize; node_count];
        for &(source, target) in pairs {
            degree[source] += 1;
            degree[target] += 1;
        }

        pairs
            .iter()
            .map(|&(source, target)| {
                let (ds, dt) = (degree[source] as f64, degree[target] as f64);
                Self {
                    source,
                    target,
                    strength: 1.0 / ds.min(dt),
                    bias: ds / (ds + dt),
                }
            })
            .collect()
    }
}

fn nonzero(value: f64, rng: &mut Lcg) -> f64 {
    if value == 0.0 { rng.jiggle() } else { value }
}

pub(super) fn apply_links(
    nodes: &mut [NodePosition],
    links: &[Link],
    distance: f64,
    alpha: f64,
    rng: &mut Lcg,
) {
    for link in links {
        let (source, target) = (&nodes[link.source], &nodes[link.target]);
        let mut x = nonzero(target.x + target.vx - source.x - source.vx, rng);
        let mut y = nonzero(target.y + target.vy - source.y - source.vy, rng);

        let length = (x * x + y * y).sqrt();
        let scale = (length - distance) / length * alpha * link.strength;
        x *= scale;
        y *= scale;

        let target = &mut nodes[link.target];
        target.vx -= x * link.bias;
        target.vy -= y * link.bias;
        let source = &mut nodes[link.source];
        source.vx += x * (1.0 - link.bias);
        source.vy += y * (1.0 - link.bias);
    }
}

#[derive(Clone, Copy)]
pub(super) struct ChargeParams {
    pub(super) strength: f64,
    pub(super) theta2: f64,
    pub(super) alpha: f64,
}

fn charge_between(dx: f64, dy: f64, weight: f64, alpha: f64, rng: &mut Lcg, velocity: &mut Point) {
    let x = nonzero(dx, rng);
    let y = nonzero(dy, rng);
    let mut distance_sq = x * x + y * y;
    if distance_sq < DISTANCE_MIN2 {
        distance_sq = (DISTANCE_MIN2 * distance_sq).sqrt();
    }

    let scale = weight * alpha / distance_sq;
    velocity[0] += x * scale;
    velocity[1] += y * scale;
}

fn accumulate_charge(
    node: &QuadNode,
    index: usize,
    positions: &[Point],
    params: ChargeParams,
    rng: &mut Lcg,
    velocity: &mut Point,
) {
    if node.mass <= 0.0 {
        return;
    }

    let point = positions[index];

    if node.is_leaf() {
        for &other in &node.indices {
            if other == index {
                continue;
            }
            charge_between(
                positions[other][0] - point[0],
                positions[other][1] - point[1],
                params.strength,
                params.alpha,
                rng,
                velocity,
            );
        }
        return;
    }

    let dx = node.center_of_mass[0] - point[0];
    let dy = node.center_of_mass[1] - point[1];
    let side = node.bounds.side_length();
    let far_enough =
        !node.bounds.contains(point) && side * side / params.theta2 < dx * dx + dy * dy;

    if far_enough {
        charge_between(dx, dy, params.strength * node.mass, params.alpha, rng, velocity);
        return;
    }

    for child in node.children.iter().flatten() {
        accumulate_charge(child, index, positions, params, rng, velocity);
    }
}

/// Many-body repulsion (negative strength) approximated through the quadtree.
pub(super) fn apply_charge(
    nodes: &mut [NodePosition],
    positions: &mut Vec<Point>,
    params: ChargeParams,
    rng: &mut Lcg,
) {
    positions.clear();
    positions.extend(nodes.iter().map(|node| [node.x, node.y]));

    let Some(tree) = QuadNode::build(positions) else {
        return;
    };
    for (index, node) in nodes.iter_mut().enumerate() {
        let mut velocity = [0.0; 2];
        accumulate_charge(&tree, index, positions, params, rng, &mut velocity);
        node.vx += velocity[0];
        node.vy += velocity[1];
    }
}

/// Shifts every node so the centroid lands on `center`.
pub(super) fn apply_center(nodes: &mut [NodePosition], center: Point) {
    if nodes.is_empty() {
        return;
    }

    let count = nodes.len() as f64;
    let shift_x = nodes.iter().map(|node| node.x).sum::<f64>() / count - center[0];
    let shift_y = nodes.iter().map(|node| node.y).sum::<f64>() / count - center[1];
    for node in nodes {
        node.x -= shift_x;
        node.y -= shift_y;
    }
}

/// Pushes overlapping circles apart using positions predicted from the
/// current velocities.
pub(super) fn apply_collision(
    nodes: &mut [NodePosition],
    radius: f64,
    strength: f64,
    rng: &mut Lcg,
) {
    if radius <= 0.0 {
        return;
    }

    let reach = radius * 2.0;
    let radius_sq = radius * radius;
    let weight = radius_sq / (radius_sq + radius_sq);

    for i in 0..nodes.len() {
        let xi = nodes[i].x + nodes[i].vx;
        let yi = nodes[i].y + nodes[i].vy;

        for j in (i + 1)..nodes.len() {
            let mut x = xi - nodes[j].x - nodes[j].vx;
            let mut y = yi - nodes[j].y - nodes[j].vy;
            let mut distance_sq = x * x + y * y;
            if distance_sq >= reach * reach {
                continue;
            }

            if x == 0.0 {
                x = rng.jiggle();
                distance_sq += x * x;
            }
            if y == 0.0 {
                y = rng.jiggle();
                distance_sq += y * y;
            }

            let distance = distance_sq.sqrt();
            if distance == 0.0 {
                continue;
            }
            let scale = (reach - distance) / distance * strength;
            x *= scale;
            y *= scale;

            nodes[i].vx += x * weight;
            nodes[i].vy += y * weight;
            nodes[j].vx -= x * (1.0 - weight);
            nodes[j].vy -= y * (1.0 - weight);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(x: f64, y: f64) -> NodePosition {
        NodePosition {
            x,
            y,
            ..NodePosition::default()
        }
    }

    #[test]
    fn lcg_is_reproducible_and_tiny() {
        let mut a = Lcg::new();
        let mut b = Lcg::new();
        for _ in 0..100 {
            let value = a.jiggle();
            assert_eq!(value, b.jiggle());
            assert!(value.abs() <= 0.5e-6);
        }
    }

    #[test]
    fn link_weights_follow_degree() {
        // 0 is a hub with three leaves.
        let links = Link::weighted(&[(0, 1), (0, 2), (0, 3)], 4);

        for link in &links {
            assert_eq!(link.strength, 1.0);
            assert!((link.bias - 0.75).abs() < 1e-12);
        }
    }

    #[test]
    fn stretched_link_pulls_endpoints_together() {
        let mut nodes = vec![at(0.0, 0.0), at(300.0, 0.0)];
        let links = Link::weighted(&[(0, 1)], 2);

        apply_links(&mut nodes, &links, 120.0, 1.0, &mut Lcg::new());

        assert!(nodes[0].vx > 0.0);
        assert!(nodes[1].vx < 0.0);
        assert!((nodes[0].vx + nodes[1].vx).abs() < 1e-9);
    }

    #[test]
    fn charge_pushes_nodes_apart() {
        let mut nodes = vec![at(0.0, 0.0), at(10.0, 0.0)];
        let params = ChargeParams {
            strength: -500.0,
            theta2: 0.81,
            alpha: 1.0,
        };

        apply_charge(&mut nodes, &mut Vec::new(), params, &mut Lcg::new());

        assert!(nodes[0].vx < 0.0);
        assert!(nodes[1].vx > 0.0);
    }

    #[test]
    fn center_moves_centroid() {
        let mut nodes = vec![at(0.0, 0.0), at(10.0, 20.0)];

        apply_center(&mut nodes, [100.0, 100.0]);

        let cx = (nodes[0].x + nodes[1].x) / 2.0;
        let cy = (nodes[0].y + nodes[1].y) / 2.0;
        assert!((cx - 100.0).abs() < 1e-9);
        assert!((cy - 100.0).abs() < 1e-9);
    }

    #[test]
    fn collision_separates_overlapping_nodes() {
        let mut nodes = vec![at(0.0, 0.0), at(30.0, 0.0), at(500.0, 0.0)];

        apply_collision(&mut nodes, 50.0, 1.0, &mut Lcg::new());

        assert!(nodes[0].vx < 0.0);
        assert!(nodes[1].vx > 0.0);
        assert_eq!(nodes[2].vx, 0.0);
    }
}
