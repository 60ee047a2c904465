//! Barnes–Hut quadtree for the many-body force.
//!
//! A cell far enough from a node, relative to its side length, acts as one
//! body at its center of mass. Leaves fall back to exact pairwise terms.

use super::layout::Jiggle;

const LEAF_CAPACITY: usize = 12;
const MAX_DEPTH: usize = 10;
/// Squared distance below which the force stops growing.
const DISTANCE_MIN_SQ: f64 = 1.0;

#[derive(Clone, Copy, Debug)]
struct Cell {
	cx: f64,
	cy: f64,
	half: f64,
}

impl Cell {
	fn around(points: &[(f64, f64)]) -> Option<Self> {
		let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
		let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
		for &(x, y) in points {
			min_x = min_x.min(x);
			min_y = min_y.min(y);
			max_x = max_x.max(x);
			max_y = max_y.max(y);
		}
		if ![min_x, min_y, max_x, max_y].iter().all(|v| v.is_finite()) {
			return None;
		}
		let span = (max_x - min_x).max(max_y - min_y).max(1.0);
		Some(Self {
			cx: (min_x + max_x) / 2.0,
			cy: (min_y + max_y) / 2.0,
			half: span / 2.0 + 1.0,
		})
	}

	fn contains(self, (x, y): (f64, f64)) -> bool {
		(x - self.cx).abs() <= self.half && (y - self.cy).abs() <= self.half
	}

	fn quadrant(self, (x, y): (f64, f64)) -> usize {
		usize::from(x >= self.cx) + 2 * usize::from(y >= self.cy)
	}

	fn child(self, quadrant: usize) -> Self {
		let quarter = self.half / 2.0;
		let sx = if quadrant & 1 == 1 { quarter } else { -quarter };
		let sy = if quadrant & 2 == 2 { quarter } else { -quarter };
		Self {
			cx: self.cx + sx,
			cy: self.cy + sy,
			half: quarter,
		}
	}
}

pub struct QuadTree {
	cell: Cell,
	mass: f64,
	com: (f64, f64),
	/// Non-empty only for leaves.
	indices: Vec<usize>,
	children: [Option<Box<QuadTree>>; 4],
}

impl QuadTree {
	/// `None` for an empty set or non-finite positions.
	pub fn build(points: &[(f64, f64)]) -> Option<Self> {
		let cell = Cell::around(points)?;
		Some(Self::node(cell, (0..points.len()).collect(), points, 0))
	}

	fn node(cell: Cell, indices: Vec<usize>, points: &[(f64, f64)], depth: usize) -> Self {
		let mass = indices.len() as f64;
		let (sx, sy) = indices
			.iter()
			.fold((0.0, 0.0), |(sx, sy), &i| (sx + points[i].0, sy + points[i].1));
		let com = if mass > 0.0 {
			(sx / mass, sy / mass)
		} else {
			(cell.cx, cell.cy)
		};

		let mut tree = Self {
			cell,
			mass,
			com,
			indices,
			children: std::array::from_fn(|_| None),
		};
		if depth >= MAX_DEPTH || tree.indices.len() <= LEAF_CAPACITY {
			return tree;
		}

		let mut buckets: [Vec<usize>; 4] = std::array::from_fn(|_| Vec::new());
		for &i in &tree.indices {
			buckets[cell.quadrant(points[i])].push(i);
		}
		for (quadrant, bucket) in buckets.into_iter().enumerate() {
			if bucket.is_empty() {
				continue;
			}
			tree.children[quadrant] = Some(Box::new(Self::node(
				cell.child(quadrant),
				bucket,
				points,
				depth + 1,
			)));
		}
		tree.indices.clear();
		tree
	}

	fn is_leaf(&self) -> bool {
		self.children.iter().all(Option::is_none)
	}

	/// Sum of `mass * d / |d|²` over every other point, `d` pointing from
	/// `points[index]` toward the other body. Scale by strength and alpha to
	/// get the velocity change.
	pub fn pull_on(
		&self,
		index: usize,
		points: &[(f64, f64)],
		theta: f64,
		jiggle: &mut Jiggle,
	) -> (f64, f64) {
		let mut total = (0.0, 0.0);
		self.accumulate(index, points, theta * theta, jiggle, &mut total);
		total
	}

	fn accumulate(
		&self,
		index: usize,
		points: &[(f64, f64)],
		theta_sq: f64,
		jiggle: &mut Jiggle,
		total: &mut (f64, f64),
	) {
		let here = points[index];
		if self.is_leaf() {
			for &other in &self.indices {
				if other == index {
					continue;
				}
				let (x, y) = points[other];
				add_pull(total, x - here.0, y - here.1, 1.0, jiggle);
			}
			return;
		}

		let (dx, dy) = (self.com.0 - here.0, self.com.1 - here.1);
		let side = self.cell.half * 2.0;
		if !self.cell.contains(here) && side * side < theta_sq * (dx * dx + dy * dy) {
			add_pull(total, dx, dy, self.mass, jiggle);
			return;
		}
		for child in self.children.iter().flatten() {
			child.accumulate(index, points, theta_sq, jiggle, total);
		}
	}
}

fn add_pull(total: &mut (f64, f64), mut x: f64, mut y: f64, mass: f64, jiggle: &mut Jiggle) {
	if x == 0.0 {
		x = jiggle.next();
	}
	if y == 0.0 {
		y = jiggle.next();
	}
	let mut l = x * x + y * y;
	if l < DISTANCE_MIN_SQ {
		l = (DISTANCE_MIN_SQ * l).sqrt();
	}
	total.0 += x * mass / l;
	total.1 += y * mass / l;
}

#[cfg(test)]
mod tests {
	use super::*;

	/// Skewed grid: no two points share an x or a y coordinate.
	fn grid(side: usize, spacing: f64) -> Vec<(f64, f64)> {
		(0..side * side)
			.map(|i| {
				let (col, row) = ((i % side) as f64, (i / side) as f64);
				(col * spacing + row * 0.37, row * spacing + col * 0.53)
			})
			.collect()
	}

	fn exact(index: usize, points: &[(f64, f64)]) -> (f64, f64) {
		let mut jiggle = Jiggle::default();
		let mut total = (0.0, 0.0);
		let here = points[index];
		for (other, &(x, y)) in points.iter().enumerate() {
			if other != index {
				add_pull(&mut total, x - here.0, y - here.1, 1.0, &mut jiggle);
			}
		}
		total
	}

	#[test]
	fn zero_theta_matches_pairwise_sum() {
		let points = grid(20, 20.0);
		let tree = QuadTree::build(&points).unwrap();
		for index in [0, 57, 210, 399] {
			let (ax, ay) = tree.pull_on(index, &points, 0.0, &mut Jiggle::default());
			let (ex, ey) = exact(index, &points);
			assert!((ax - ex).abs() < 1e-9 * ex.abs().max(1.0), "x at {index}");
			assert!((ay - ey).abs() < 1e-9 * ey.abs().max(1.0), "y at {index}");
		}
	}

	#[test]
	fn distant_cluster_is_approximated_closely() {
		let mut points = grid(20, 20.0);
		points.push((4000.0, 4000.0));
		let far = points.len() - 1;
		let tree = QuadTree::build(&points).unwrap();

		let (ax, ay) = tree.pull_on(far, &points, 0.9, &mut Jiggle::default());
		let (ex, ey) = exact(far, &points);
		let error = ((ax - ex).powi(2) + (ay - ey).powi(2)).sqrt();
		let magnitude = (ex * ex + ey * ey).sqrt();
		assert!(error / magnitude < 0.05, "relative error {}", error / magnitude);
		// Toward the cluster.
		assert!(ax < 0.0 && ay < 0.0);
	}

	#[test]
	fn coincident_points_stay_finite() {
		let points = vec![(5.0, 5.0); 40];
		let tree = QuadTree::build(&points).unwrap();
		let (x, y) = tree.pull_on(3, &points, 0.9, &mut Jiggle::default());
		assert!(x.is_finite() && y.is_finite());
	}

	#[test]
	fn empty_or_broken_input_builds_nothing() {
		assert!(QuadTree::build(&[]).is_none());
		assert!(QuadTree::build(&[(f64::NAN, 0.0)]).is_none());
	}
}
