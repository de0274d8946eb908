//! Closest point of a 1-4 vertex simplex to the origin.
//!
//! [`VoronoiSimplexSolver`] maintains the working simplex of a GJK iteration in Minkowski
//! difference space. Each vertex stores the difference point `w` together with the two points
//! `p` and `q` it was built from (`w = p - q`), so that the closest point on the simplex can be
//! mapped back onto witness points on the source shapes.
//!
//! The closest point is found by Voronoi region case analysis on segments, triangles and
//! tetrahedra rather than by Johnson's distance subalgorithm. Vertices that do not contribute to
//! the closest point are evicted after every update, keeping the simplex minimal.

use bitflags::bitflags;
use glam::DVec3;

/// Maximum number of vertices the simplex can hold.
pub const MAX_VERTICES: usize = 4;

/// Magnitude of the signed volume below which a tetrahedron face test is considered inconclusive.
pub const DEGENERATE_VOLUME_EPSILON: f64 = 1e-4;

const VERTEX_A: usize = 0;
const VERTEX_B: usize = 1;
const VERTEX_C: usize = 2;
const VERTEX_D: usize = 3;

bitflags! {
    /// Set of simplex vertex slots that contribute to the closest point.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct UsedVertices: u8 {
        const A = 0b0001;
        const B = 0b0010;
        const C = 0b0100;
        const D = 0b1000;
    }
}

impl UsedVertices {
    /// Gets the flag for a vertex slot index.
    #[inline(always)]
    pub fn slot(index: usize) -> Self {
        debug_assert!(index < MAX_VERTICES, "Simplex only has four vertex slots.");
        Self::from_bits_truncate(1 << index)
    }
}

/// Closest point on a sub-simplex, expressed over the four vertex slots of the full simplex.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SubSimplexClosestResult {
    /// The closest point to the query point on the sub-simplex.
    pub closest_point_on_simplex: DVec3,
    /// Which vertex slots the closest point depends on.
    pub used_vertices: UsedVertices,
    /// Barycentric weights of the closest point, one per vertex slot.
    pub barycentric_coords: [f64; 4],
    /// Set when a tetrahedron face test was inconclusive because the tetrahedron is nearly flat.
    pub degenerate: bool,
}

impl SubSimplexClosestResult {
    /// Clears the result back to no used vertices and zero weights.
    #[inline(always)]
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Returns true if every barycentric weight is non-negative.
    ///
    /// NaN weights, produced by collapsed triangles, count as invalid.
    #[inline(always)]
    pub fn is_valid(&self) -> bool {
        self.barycentric_coords.iter().all(|&c| c >= 0.0)
    }

    #[inline(always)]
    fn with_point(point: DVec3, used_vertices: UsedVertices, barycentric_coords: [f64; 4]) -> Self {
        Self {
            closest_point_on_simplex: point,
            used_vertices,
            barycentric_coords,
            degenerate: false,
        }
    }

    /// Re-expresses a triangle result over tetrahedron slots. `slots[i]` is the tetrahedron slot of
    /// the triangle's i-th vertex.
    #[inline(always)]
    fn remap_face(&self, slots: [usize; 3]) -> Self {
        let mut remapped = Self {
            closest_point_on_simplex: self.closest_point_on_simplex,
            ..Self::default()
        };
        for (triangle_slot, &tetrahedron_slot) in slots.iter().enumerate() {
            if self.used_vertices.contains(UsedVertices::slot(triangle_slot)) {
                remapped.used_vertices |= UsedVertices::slot(tetrahedron_slot);
            }
            remapped.barycentric_coords[tetrahedron_slot] = self.barycentric_coords[triangle_slot];
        }
        remapped
    }
}

/// Outcome of projecting a point onto a tetrahedron.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TetrahedronProjection {
    /// The point lies outside at least one face; the result holds the closest point on the surface.
    Outside(SubSimplexClosestResult),
    /// The point lies inside all four face half-spaces.
    Inside,
    /// At least one face test was inconclusive because the tetrahedron has near-zero volume.
    Degenerate,
}

/// Closest-point solver for a simplex of up to four Minkowski difference vertices.
///
/// A solver instance carries the state of a single query. Reset it at the start of every query;
/// [`SimplexPool`](super::simplex_pool::SimplexPool) does this on acquisition.
#[derive(Debug, Clone)]
pub struct VoronoiSimplexSolver {
    num_vertices: usize,

    simplex_vectors_w: [DVec3; MAX_VERTICES],
    simplex_points_p: [DVec3; MAX_VERTICES],
    simplex_points_q: [DVec3; MAX_VERTICES],

    cached_p_a: DVec3,
    cached_p_b: DVec3,
    cached_v: DVec3,
    last_w: DVec3,
    cached_valid_closest: bool,
    cached_bc: SubSimplexClosestResult,
    encloses_origin: bool,

    needs_update: bool,
}

impl Default for VoronoiSimplexSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl VoronoiSimplexSolver {
    /// Value `last_w` takes after a reset. Far enough away that no real support point matches it.
    const LAST_W_SENTINEL: DVec3 = DVec3::splat(1e30);

    /// Creates an empty solver.
    pub fn new() -> Self {
        Self {
            num_vertices: 0,
            simplex_vectors_w: [DVec3::ZERO; MAX_VERTICES],
            simplex_points_p: [DVec3::ZERO; MAX_VERTICES],
            simplex_points_q: [DVec3::ZERO; MAX_VERTICES],
            cached_p_a: DVec3::ZERO,
            cached_p_b: DVec3::ZERO,
            cached_v: DVec3::ZERO,
            last_w: Self::LAST_W_SENTINEL,
            cached_valid_closest: false,
            cached_bc: SubSimplexClosestResult::default(),
            encloses_origin: false,
            needs_update: true,
        }
    }

    /// Empties the simplex and invalidates every cached value.
    pub fn reset(&mut self) {
        self.num_vertices = 0;
        self.cached_valid_closest = false;
        self.needs_update = true;
        self.last_w = Self::LAST_W_SENTINEL;
        self.cached_p_a = DVec3::ZERO;
        self.cached_p_b = DVec3::ZERO;
        self.cached_v = DVec3::ZERO;
        self.encloses_origin = false;
        self.cached_bc.reset();
    }

    /// Gets the number of resident vertices.
    #[inline(always)]
    pub fn num_vertices(&self) -> usize {
        self.num_vertices
    }

    /// Returns true if the simplex is a tetrahedron.
    #[inline(always)]
    pub fn is_full(&self) -> bool {
        self.num_vertices == MAX_VERTICES
    }

    /// Returns true if the simplex holds no vertices.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.num_vertices == 0
    }

    /// Returns true if the last tetrahedron update was inconclusive because of near-zero volume.
    #[inline(always)]
    pub fn is_degenerate(&self) -> bool {
        self.cached_bc.degenerate
    }

    /// Returns true if the last update found the origin inside the tetrahedron.
    #[inline(always)]
    pub fn encloses_origin(&self) -> bool {
        self.encloses_origin
    }

    /// Gets the vertex slots used by the last closest point computation.
    #[inline(always)]
    pub fn used_vertices(&self) -> UsedVertices {
        self.cached_bc.used_vertices
    }

    /// Gets the barycentric weights of the last closest point computation.
    #[inline(always)]
    pub fn barycentric_coords(&self) -> [f64; 4] {
        self.cached_bc.barycentric_coords
    }

    /// Adds a vertex with difference point `w = p - q`.
    ///
    /// Ignored when the simplex is already full; GJK always reduces the simplex before it grows
    /// past a tetrahedron, so this only happens on misuse.
    pub fn add_vertex(&mut self, w: DVec3, p: DVec3, q: DVec3) {
        if self.is_full() {
            tracing::trace!(?w, "simplex full, vertex rejected");
            return;
        }
        self.last_w = w;
        self.needs_update = true;

        self.simplex_vectors_w[self.num_vertices] = w;
        self.simplex_points_p[self.num_vertices] = p;
        self.simplex_points_q[self.num_vertices] = q;

        self.num_vertices += 1;
    }

    /// Returns true if `w` is the most recently added vertex or is still resident in the simplex.
    ///
    /// Comparison is exact. Refusing to re-add a vertex that has already been tried is what keeps
    /// GJK from cycling.
    pub fn in_simplex(&self, w: DVec3) -> bool {
        // The last vertex may already have been reduced away.
        if w == self.last_w {
            return true;
        }
        self.simplex_vectors_w[..self.num_vertices].contains(&w)
    }

    /// Computes the point on the simplex closest to the origin.
    ///
    /// Returns `None` if no valid closest point exists: the simplex is empty, the weights became
    /// invalid, or a tetrahedron turned out degenerate. When the origin is enclosed by a
    /// tetrahedron the zero vector is returned.
    pub fn closest(&mut self) -> Option<DVec3> {
        if self.update_closest_vector_and_points() {
            Some(self.cached_v)
        } else {
            None
        }
    }

    /// Gets the cached closest point without recomputing it.
    #[inline(always)]
    pub fn backup_closest(&self) -> DVec3 {
        self.cached_v
    }

    /// Computes the witness points on the two source shapes corresponding to the closest point.
    ///
    /// The first point is the barycentric combination of the `p` points, the second of the `q` points.
    pub fn compute_points(&mut self) -> (DVec3, DVec3) {
        self.update_closest_vector_and_points();
        (self.cached_p_a, self.cached_p_b)
    }

    /// Gets the largest squared length among the resident difference points.
    pub fn max_vertex(&self) -> f64 {
        self.simplex_vectors_w[..self.num_vertices]
            .iter()
            .map(|w| w.length_squared())
            .fold(0.0, f64::max)
    }

    /// Gets copies of the resident vertices as `(p, q, w)` slices.
    pub fn simplex(&self) -> (&[DVec3], &[DVec3], &[DVec3]) {
        let count = self.num_vertices;
        (
            &self.simplex_points_p[..count],
            &self.simplex_points_q[..count],
            &self.simplex_vectors_w[..count],
        )
    }

    /// Removes the vertex at `index` by moving the last vertex into its slot.
    pub fn remove_vertex(&mut self, index: usize) {
        debug_assert!(index < self.num_vertices, "Vertex index out of range.");
        self.num_vertices -= 1;
        let last = self.num_vertices;
        self.simplex_vectors_w[index] = self.simplex_vectors_w[last];
        self.simplex_points_p[index] = self.simplex_points_p[last];
        self.simplex_points_q[index] = self.simplex_points_q[last];
    }

    /// Evicts every vertex not flagged in `used_vertices`.
    ///
    /// Slots are visited from last to first so that swapping the tail into a freed slot never
    /// moves an unvisited vertex.
    pub fn reduce_vertices(&mut self, used_vertices: UsedVertices) {
        if self.num_vertices >= 4 && !used_vertices.contains(UsedVertices::D) {
            self.remove_vertex(VERTEX_D);
        }
        if self.num_vertices >= 3 && !used_vertices.contains(UsedVertices::C) {
            self.remove_vertex(VERTEX_C);
        }
        if self.num_vertices >= 2 && !used_vertices.contains(UsedVertices::B) {
            self.remove_vertex(VERTEX_B);
        }
        if self.num_vertices >= 1 && !used_vertices.contains(UsedVertices::A) {
            self.remove_vertex(VERTEX_A);
        }
    }

    /// Combines the `p` and `q` points with the cached barycentric weights.
    #[inline(always)]
    fn combine_witness_points(&mut self) {
        let weights = self.cached_bc.barycentric_coords;
        self.cached_p_a = DVec3::ZERO;
        self.cached_p_b = DVec3::ZERO;
        for slot in 0..MAX_VERTICES {
            self.cached_p_a += self.simplex_points_p[slot] * weights[slot];
            self.cached_p_b += self.simplex_points_q[slot] * weights[slot];
        }
        self.cached_v = self.cached_p_a - self.cached_p_b;
    }

    /// Recomputes the cached closest point if a vertex was added since the last computation.
    ///
    /// Returns whether the cached closest point is valid.
    pub fn update_closest_vector_and_points(&mut self) -> bool {
        if !self.needs_update {
            return self.cached_valid_closest;
        }
        self.cached_bc.reset();
        self.encloses_origin = false;
        self.needs_update = false;

        match self.num_vertices {
            0 => {
                self.cached_valid_closest = false;
            }
            1 => {
                self.cached_p_a = self.simplex_points_p[VERTEX_A];
                self.cached_p_b = self.simplex_points_q[VERTEX_A];
                self.cached_v = self.cached_p_a - self.cached_p_b;
                self.cached_bc.used_vertices = UsedVertices::A;
                self.cached_bc.barycentric_coords = [1.0, 0.0, 0.0, 0.0];
                self.cached_valid_closest = self.cached_bc.is_valid();
            }
            2 => {
                // Closest point of the origin on the segment.
                let from = self.simplex_vectors_w[VERTEX_A];
                let to = self.simplex_vectors_w[VERTEX_B];
                let diff = -from;
                let v = to - from;
                let mut t = v.dot(diff);

                if t > 0.0 {
                    let dot_vv = v.length_squared();
                    if t < dot_vv {
                        t /= dot_vv;
                        self.cached_bc.used_vertices = UsedVertices::A | UsedVertices::B;
                    } else {
                        t = 1.0;
                        self.cached_bc.used_vertices = UsedVertices::B;
                    }
                } else {
                    t = 0.0;
                    self.cached_bc.used_vertices = UsedVertices::A;
                }
                self.cached_bc.barycentric_coords = [1.0 - t, t, 0.0, 0.0];

                let p = &self.simplex_points_p;
                let q = &self.simplex_points_q;
                self.cached_p_a = p[VERTEX_A] + (p[VERTEX_B] - p[VERTEX_A]) * t;
                self.cached_p_b = q[VERTEX_A] + (q[VERTEX_B] - q[VERTEX_A]) * t;
                self.cached_v = self.cached_p_a - self.cached_p_b;

                self.reduce_vertices(self.cached_bc.used_vertices);
                self.cached_valid_closest = self.cached_bc.is_valid();
            }
            3 => {
                let w = &self.simplex_vectors_w;
                self.cached_bc = closest_point_on_triangle(
                    DVec3::ZERO,
                    w[VERTEX_A],
                    w[VERTEX_B],
                    w[VERTEX_C],
                );
                self.combine_witness_points();

                self.reduce_vertices(self.cached_bc.used_vertices);
                self.cached_valid_closest = self.cached_bc.is_valid();
            }
            4 => {
                let w = &self.simplex_vectors_w;
                match closest_point_on_tetrahedron(
                    DVec3::ZERO,
                    w[VERTEX_A],
                    w[VERTEX_B],
                    w[VERTEX_C],
                    w[VERTEX_D],
                ) {
                    TetrahedronProjection::Outside(result) => {
                        self.cached_bc = result;
                        self.combine_witness_points();
                        self.reduce_vertices(self.cached_bc.used_vertices);
                        self.cached_valid_closest = self.cached_bc.is_valid();
                    }
                    TetrahedronProjection::Inside => {
                        // Penetration: the origin is enclosed, so the separating vector is zero.
                        // Witness points keep their values from the previous update.
                        self.cached_bc.used_vertices = UsedVertices::all();
                        self.cached_v = DVec3::ZERO;
                        self.encloses_origin = true;
                        self.cached_valid_closest = true;
                    }
                    TetrahedronProjection::Degenerate => {
                        tracing::debug!("degenerate tetrahedron in simplex, no closest point");
                        self.cached_bc.degenerate = true;
                        self.cached_valid_closest = false;
                    }
                }
            }
            _ => {
                self.cached_valid_closest = false;
            }
        }

        self.cached_valid_closest
    }
}

/// Computes the point on triangle `abc` closest to `p` by Voronoi region case analysis.
///
/// Vertex regions are tested first, then edge regions, falling through to the face interior.
pub fn closest_point_on_triangle(p: DVec3, a: DVec3, b: DVec3, c: DVec3) -> SubSimplexClosestResult {
    // Vertex region outside A.
    let ab = b - a;
    let ac = c - a;
    let ap = p - a;
    let d1 = ab.dot(ap);
    let d2 = ac.dot(ap);
    if d1 <= 0.0 && d2 <= 0.0 {
        return SubSimplexClosestResult::with_point(a, UsedVertices::A, [1.0, 0.0, 0.0, 0.0]);
    }

    // Vertex region outside B.
    let bp = p - b;
    let d3 = ab.dot(bp);
    let d4 = ac.dot(bp);
    if d3 >= 0.0 && d4 <= d3 {
        return SubSimplexClosestResult::with_point(b, UsedVertices::B, [0.0, 1.0, 0.0, 0.0]);
    }

    // Edge region of AB.
    let vc = d1 * d4 - d3 * d2;
    if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
        let v = d1 / (d1 - d3);
        return SubSimplexClosestResult::with_point(
            a + ab * v,
            UsedVertices::A | UsedVertices::B,
            [1.0 - v, v, 0.0, 0.0],
        );
    }

    // Vertex region outside C.
    let cp = p - c;
    let d5 = ab.dot(cp);
    let d6 = ac.dot(cp);
    if d6 >= 0.0 && d5 <= d6 {
        return SubSimplexClosestResult::with_point(c, UsedVertices::C, [0.0, 0.0, 1.0, 0.0]);
    }

    // Edge region of AC.
    let vb = d5 * d2 - d1 * d6;
    if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
        let w = d2 / (d2 - d6);
        return SubSimplexClosestResult::with_point(
            a + ac * w,
            UsedVertices::A | UsedVertices::C,
            [1.0 - w, 0.0, w, 0.0],
        );
    }

    // Edge region of BC.
    let va = d3 * d6 - d5 * d4;
    if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
        let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
        return SubSimplexClosestResult::with_point(
            b + (c - b) * w,
            UsedVertices::B | UsedVertices::C,
            [0.0, 1.0 - w, w, 0.0],
        );
    }

    // Face region.
    let denom = 1.0 / (va + vb + vc);
    let v = vb * denom;
    let w = vc * denom;
    SubSimplexClosestResult::with_point(
        a + ab * v + ac * w,
        UsedVertices::A | UsedVertices::B | UsedVertices::C,
        [1.0 - v - w, v, w, 0.0],
    )
}

/// Tests whether `p` and `d` lie on opposite sides of the plane through `a`, `b` and `c`.
///
/// Returns `None` when `d` is too close to the plane for the sign comparison to mean anything.
pub fn point_outside_of_plane(p: DVec3, a: DVec3, b: DVec3, c: DVec3, d: DVec3) -> Option<bool> {
    let normal = (b - a).cross(c - a);
    let sign_p = (p - a).dot(normal);
    let sign_d = (d - a).dot(normal);

    if sign_d * sign_d < DEGENERATE_VOLUME_EPSILON * DEGENERATE_VOLUME_EPSILON {
        return None;
    }
    Some(sign_p * sign_d < 0.0)
}

/// Computes the point on tetrahedron `abcd` closest to `p`.
///
/// Every face that `p` lies outside of is projected onto with [`closest_point_on_triangle`], and
/// the nearest of those projections wins. Each face test produces its own result value.
pub fn closest_point_on_tetrahedron(
    p: DVec3,
    a: DVec3,
    b: DVec3,
    c: DVec3,
    d: DVec3,
) -> TetrahedronProjection {
    // Faces paired with the vertex opposite them, and each face vertex's tetrahedron slot.
    let faces: [([DVec3; 3], DVec3, [usize; 3]); 4] = [
        ([a, b, c], d, [VERTEX_A, VERTEX_B, VERTEX_C]),
        ([a, c, d], b, [VERTEX_A, VERTEX_C, VERTEX_D]),
        ([a, d, b], c, [VERTEX_A, VERTEX_D, VERTEX_B]),
        ([b, d, c], a, [VERTEX_B, VERTEX_D, VERTEX_C]),
    ];

    let mut outside = [false; 4];
    for (i, ([fa, fb, fc], opposite, _)) in faces.iter().enumerate() {
        match point_outside_of_plane(p, *fa, *fb, *fc, *opposite) {
            Some(is_outside) => outside[i] = is_outside,
            None => return TetrahedronProjection::Degenerate,
        }
    }

    if !outside.iter().any(|&o| o) {
        return TetrahedronProjection::Inside;
    }

    let mut best: Option<(f64, SubSimplexClosestResult)> = None;
    for (([fa, fb, fc], _, slots), _) in faces.iter().zip(outside).filter(|(_, o)| *o) {
        let face_result = closest_point_on_triangle(p, *fa, *fb, *fc);
        let distance_squared = (face_result.closest_point_on_simplex - p).length_squared();
        if best.map_or(true, |(best_distance, _)| distance_squared < best_distance) {
            best = Some((distance_squared, face_result.remap_face(*slots)));
        }
    }

    match best {
        Some((_, result)) => TetrahedronProjection::Outside(result),
        // Every outside face produced a NaN distance; treat the tetrahedron as unusable.
        None => TetrahedronProjection::Degenerate,
    }
}
