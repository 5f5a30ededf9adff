//! Swept collision detection: particles against moving edges (2D) and
//! face triangles (3D).
//!
//! Detection is continuous within one step: the particle's motion segment
//! (`last_pos -> pos`) is tested against where the geometry was and where
//! it is now, so a particle cannot tunnel through an edge that either of
//! them crossed during the step.

use crate::contact::{Contact, GeometryRef};
use crate::float::Float;
use crate::particle::Particle;
use crate::vec::{Vec, Vec2, Vec3};
use crate::world::{ParticleRef, World};
use alloc::vec::Vec as AllocVec;

fn epsilon<F: Float>() -> F {
    F::from_f32(1e-8)
}

/// Per-dimension collision capability, in the same dispatch style as the
/// constraint endpoints: 2D vectors collide particles against constraint
/// edges, 3D vectors against face triangles.
pub trait CollideDispatch: Vec + Sized {
    /// Scan every body's collision geometry against the particles of
    /// `body`, appending all detected contacts in discovery order.
    ///
    /// Self-touching pairs (geometry containing the particle) and broken
    /// geometry are skipped. Exhaustive O(n^2): no broad phase.
    fn collect_contacts(world: &World<Self>, body: usize, out: &mut AllocVec<Contact<Self>>);
}

impl<F: Float> CollideDispatch for Vec2<F> {
    fn collect_contacts(world: &World<Self>, body: usize, out: &mut AllocVec<Contact<Self>>) {
        for (pi, particle) in world.bodies[body].particles.iter().enumerate() {
            for (bi, target) in world.bodies.iter().enumerate() {
                for (ci, constraint) in target.constraints.iter().enumerate() {
                    if constraint.broken {
                        continue;
                    }
                    if bi == body && (constraint.a == pi || constraint.b == pi) {
                        continue;
                    }
                    let a = &target.particles[constraint.a];
                    let b = &target.particles[constraint.b];
                    if let Some((normal, depth)) = particle_edge_contact(particle, a, b) {
                        out.push(Contact {
                            normal,
                            depth,
                            particle: ParticleRef::new(body, pi),
                            geometry: GeometryRef::Edge { body: bi, index: ci },
                        });
                    }
                }
            }
        }
    }
}

impl<F: Float> CollideDispatch for Vec3<F> {
    fn collect_contacts(world: &World<Self>, body: usize, out: &mut AllocVec<Contact<Self>>) {
        for (pi, particle) in world.bodies[body].particles.iter().enumerate() {
            for (bi, target) in world.bodies.iter().enumerate() {
                for (fi, face) in target.faces.iter().enumerate() {
                    if target.face_is_broken(face) {
                        continue;
                    }
                    if bi == body && face.particles.contains(&pi) {
                        continue;
                    }
                    let v0 = &target.particles[face.particles[0]];
                    let v1 = &target.particles[face.particles[1]];
                    let v2 = &target.particles[face.particles[2]];
                    if let Some((normal, depth)) = particle_face_contact(particle, v0, v1, v2) {
                        out.push(Contact {
                            normal,
                            depth,
                            particle: ParticleRef::new(body, pi),
                            geometry: GeometryRef::Face { body: bi, index: fi },
                        });
                    }
                }
            }
        }
    }
}

// --------------------------------------------------------------------------
// 2D: particle vs. swept constraint edge
// --------------------------------------------------------------------------

/// Intersection point of the infinite lines AB and CD. `None` when they
/// are parallel (or either segment is degenerate).
pub fn line_intersection<F: Float>(
    a: Vec2<F>,
    b: Vec2<F>,
    c: Vec2<F>,
    d: Vec2<F>,
) -> Option<Vec2<F>> {
    // Lines as a1*x + b1*y = c1.
    let a1 = b.y - a.y;
    let b1 = a.x - b.x;
    let c1 = a1 * a.x + b1 * a.y;

    let a2 = d.y - c.y;
    let b2 = c.x - d.x;
    let c2 = a2 * c.x + b2 * c.y;

    let determinant = a1 * b2 - a2 * b1;
    if determinant.is_near_zero(F::from_f32(1e-12)) {
        return None;
    }
    Some(Vec2::new(
        (b2 * c1 - b1 * c2) / determinant,
        (a1 * c2 - a2 * c1) / determinant,
    ))
}

/// Whether `point` lies on the segment AB (within a small tolerance),
/// tested via the triangle-inequality degeneracy.
pub fn on_segment<F: Float>(point: Vec2<F>, a: Vec2<F>, b: Vec2<F>) -> bool {
    point.distance(a) + point.distance(b) - a.distance(b) <= epsilon()
}

/// Orthogonal projection of `point` onto the line through AB (unclamped).
pub fn nearest_point_on_line<F: Float>(point: Vec2<F>, a: Vec2<F>, b: Vec2<F>) -> Vec2<F> {
    let v = b - a;
    let len_sq = v.dot(v);
    if len_sq.is_near_zero(F::from_f32(1e-12)) {
        return a;
    }
    a + v.scale((point - a).dot(v) / len_sq)
}

/// Whether the particle's motion segment and the edge's swept positions
/// crossed during this step.
///
/// `p_cur`/`p_prev` are where the particle's path line pierces the edge's
/// current and previous positions. If both land on their segments, either
/// the edge swept across one of the particle's endpoints (the particle
/// ends up between the two pierce points) or the particle's own motion
/// covered both pierce points. Failing that, a single edge endpoint may
/// still have swept across the particle's path.
pub fn segment_sweep_crosses<F: Float>(
    pos: Vec2<F>,
    last_pos: Vec2<F>,
    edge_a: Vec2<F>,
    edge_b: Vec2<F>,
    last_a: Vec2<F>,
    last_b: Vec2<F>,
) -> bool {
    let pierce_cur = line_intersection(last_pos, pos, edge_a, edge_b);
    let pierce_prev = line_intersection(last_pos, pos, last_a, last_b);

    if let (Some(p_cur), Some(p_prev)) = (pierce_cur, pierce_prev) {
        if on_segment(p_cur, edge_a, edge_b) && on_segment(p_prev, last_a, last_b) {
            if on_segment(pos, p_cur, p_prev) || on_segment(last_pos, p_cur, p_prev) {
                return true;
            }
            return on_segment(p_cur, pos, last_pos) && on_segment(p_prev, pos, last_pos);
        }
    }

    // Edge cases: only one endpoint swept across the particle's path.
    if let Some(hit) = line_intersection(last_pos, pos, edge_a, last_a) {
        if on_segment(hit, pos, last_pos) && on_segment(hit, edge_a, last_a) {
            return true;
        }
    }
    if let Some(hit) = line_intersection(last_pos, pos, edge_b, last_b) {
        if on_segment(hit, pos, last_pos) && on_segment(hit, edge_b, last_b) {
            return true;
        }
    }
    false
}

/// Full 2D narrow test: swept crossing, then contact point, depth and
/// normal against the edge's current position.
pub fn particle_edge_contact<F: Float>(
    particle: &Particle<Vec2<F>>,
    a: &Particle<Vec2<F>>,
    b: &Particle<Vec2<F>>,
) -> Option<(Vec2<F>, F)> {
    if !segment_sweep_crosses(
        particle.pos,
        particle.last_pos,
        a.pos,
        b.pos,
        a.last_pos,
        b.last_pos,
    ) {
        return None;
    }

    let point = nearest_point_on_line(particle.pos, a.pos, b.pos);
    let depth = particle.pos.distance(point);
    if depth.is_near_zero(epsilon()) {
        return None;
    }

    // Nearly-parallel sweeps can report absurd depths; nothing penetrates
    // further than the particle and the edge moved this step.
    let travel = particle.motion().length();
    let sweep = a.motion().length().max(b.motion().length());
    if depth > travel + sweep {
        return None;
    }

    let normal = (point - particle.pos).scale(F::one() / depth);
    Some((normal, depth))
}

// --------------------------------------------------------------------------
// 3D: particle vs. face triangle
// --------------------------------------------------------------------------

/// Ray-cast the particle's motion against a triangle.
///
/// The motion segment is treated as a ray from `last_pos`; hits behind the
/// origin or beyond the motion length are rejected, as are rays parallel
/// to the plane. The inside test requires all three edge cross-products to
/// agree in sign with the plane normal.
pub fn particle_face_contact<F: Float>(
    particle: &Particle<Vec3<F>>,
    v0: &Particle<Vec3<F>>,
    v1: &Particle<Vec3<F>>,
    v2: &Particle<Vec3<F>>,
) -> Option<(Vec3<F>, F)> {
    let motion = particle.motion();
    let travel = motion.length();
    if travel.is_near_zero(epsilon()) {
        return None;
    }
    let dir = motion.scale(F::one() / travel);

    let edge1 = v1.pos - v0.pos;
    let edge2 = v2.pos - v0.pos;
    let plane_normal = edge1.cross(edge2);

    let denom = dir.dot(plane_normal);
    if denom.is_near_zero(epsilon()) {
        return None;
    }
    let t = (v0.pos - particle.last_pos).dot(plane_normal) / denom;
    if t < F::zero() || t > travel {
        return None;
    }
    let point = particle.last_pos + dir.scale(t);

    // Inside-outside test against each triangle edge.
    if (v1.pos - v0.pos).cross(point - v0.pos).dot(plane_normal) < F::zero() {
        return None;
    }
    if (v2.pos - v1.pos).cross(point - v1.pos).dot(plane_normal) < F::zero() {
        return None;
    }
    if (v0.pos - v2.pos).cross(point - v2.pos).dot(plane_normal) < F::zero() {
        return None;
    }

    let depth = particle.pos.distance(point);
    if depth.is_near_zero(epsilon()) {
        return None;
    }
    let normal = (point - particle.pos).scale(F::one() / depth);
    Some((normal, depth))
}
