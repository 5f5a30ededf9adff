//! Soft bodies: owners of particles, constraints and collision faces.

use crate::constraint::Constraint;
use crate::error::PhysicsError;
use crate::float::Float;
use crate::listener::{ApproveAllListener, ContactListener};
use crate::material::Material;
use crate::particle::Particle;
use crate::vec::Vec;
use alloc::boxed::Box;
use alloc::vec::Vec as AllocVec;

/// A triangular collision face derived from three constraints.
///
/// The three constraints must pairwise share endpoints so that exactly
/// three distinct particles remain; those are cached at construction. A
/// face stops colliding as soon as any of its constraints breaks.
#[derive(Clone, Copy, Debug)]
pub struct Face {
    pub constraints: [usize; 3],
    pub particles: [usize; 3],
}

/// A simulated soft body: particles linked by constraints, plus the
/// collision faces (3D) and a local contact listener.
///
/// Particles, constraints and faces are created up front and then mutated
/// in place for the body's lifetime; indices stay stable.
pub struct Body<V: Vec> {
    pub(crate) particles: AllocVec<Particle<V>>,
    pub(crate) constraints: AllocVec<Constraint<V::Scalar>>,
    pub(crate) faces: AllocVec<Face>,
    pub(crate) contact_listener: Box<dyn ContactListener<V>>,
}

impl<V: Vec> Body<V> {
    pub fn new() -> Self {
        Body {
            particles: AllocVec::new(),
            constraints: AllocVec::new(),
            faces: AllocVec::new(),
            contact_listener: Box::new(ApproveAllListener),
        }
    }

    pub fn add_particle(&mut self, particle: Particle<V>) -> usize {
        let index = self.particles.len();
        self.particles.push(particle);
        index
    }

    /// Add a pre-built constraint; its endpoints must already exist.
    pub fn add_constraint(&mut self, constraint: Constraint<V::Scalar>) -> Result<usize, PhysicsError> {
        let count = self.particles.len();
        for endpoint in [constraint.a, constraint.b] {
            if endpoint >= count {
                return Err(PhysicsError::ParticleOutOfBounds { index: endpoint, count });
            }
        }
        let index = self.constraints.len();
        self.constraints.push(constraint);
        Ok(index)
    }

    /// Link two particles with a constraint whose rest length is their
    /// current distance.
    pub fn link(&mut self, a: usize, b: usize, material: Material<V::Scalar>) -> Result<usize, PhysicsError> {
        let count = self.particles.len();
        for endpoint in [a, b] {
            if endpoint >= count {
                return Err(PhysicsError::ParticleOutOfBounds { index: endpoint, count });
            }
        }
        let constraint = Constraint::between(a, b, &self.particles, material);
        self.constraints.push(constraint);
        Ok(self.constraints.len() - 1)
    }

    /// Derive a collision face from three existing constraints.
    pub fn add_face(&mut self, ca: usize, cb: usize, cc: usize) -> Result<usize, PhysicsError> {
        let count = self.constraints.len();
        for index in [ca, cb, cc] {
            if index >= count {
                return Err(PhysicsError::ConstraintOutOfBounds { index, count });
            }
        }
        let particles = derive_face_particles(
            &self.constraints[ca],
            &self.constraints[cb],
            &self.constraints[cc],
        )?;
        let index = self.faces.len();
        self.faces.push(Face { constraints: [ca, cb, cc], particles });
        Ok(index)
    }

    /// A face collides only while all three of its constraints are intact.
    pub fn face_is_broken(&self, face: &Face) -> bool {
        face.constraints.iter().any(|&c| self.constraints[c].broken)
    }

    /// Rewrite the material of every constraint and the mass of every
    /// particle.
    pub fn change_material(&mut self, material: Material<V::Scalar>) {
        for constraint in self.constraints.iter_mut() {
            constraint.change_material(&material);
        }
        for particle in self.particles.iter_mut() {
            particle.mass = material.mass;
        }
    }

    pub fn particles(&self) -> &[Particle<V>] {
        &self.particles
    }

    pub fn constraints(&self) -> &[Constraint<V::Scalar>] {
        &self.constraints
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn particle(&self, index: usize) -> &Particle<V> {
        &self.particles[index]
    }

    pub fn particle_mut(&mut self, index: usize) -> &mut Particle<V> {
        &mut self.particles[index]
    }

    pub fn constraint(&self, index: usize) -> &Constraint<V::Scalar> {
        &self.constraints[index]
    }

    pub fn constraint_mut(&mut self, index: usize) -> &mut Constraint<V::Scalar> {
        &mut self.constraints[index]
    }

    /// Install a local contact listener consulted for contacts involving
    /// this body.
    pub fn set_contact_listener(&mut self, listener: Box<dyn ContactListener<V>>) {
        self.contact_listener = listener;
    }

    /// Restore the stock approve-all listener.
    pub fn clear_contact_listener(&mut self) {
        self.contact_listener = Box::new(ApproveAllListener);
    }
}

impl<V: Vec> Default for Body<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve the three distinct particles spanned by three constraints.
///
/// Mirrors the construction order of the face: the first constraint
/// contributes its `a` endpoint, the others contribute whichever endpoint
/// is not already taken.
fn derive_face_particles<F: Float>(
    ca: &Constraint<F>,
    cb: &Constraint<F>,
    cc: &Constraint<F>,
) -> Result<[usize; 3], PhysicsError> {
    let pa = ca.a;
    let pb = if cb.a == pa { cb.b } else { cb.a };
    let pc = if cc.a == pa || cc.a == pb { cc.b } else { cc.a };

    // Exactly three distinct particles, each shared by two constraints.
    let mut endpoints = [ca.a, ca.b, cb.a, cb.b, cc.a, cc.b];
    endpoints.sort_unstable();
    let spans_triangle = endpoints[0] == endpoints[1]
        && endpoints[2] == endpoints[3]
        && endpoints[4] == endpoints[5]
        && endpoints[1] != endpoints[2]
        && endpoints[3] != endpoints[4];
    if !spans_triangle || pa == pb || pb == pc || pa == pc {
        return Err(PhysicsError::DegenerateFace);
    }
    Ok([pa, pb, pc])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vec::Vec3;

    fn triangle_body() -> Body<Vec3<f64>> {
        let mut body = Body::new();
        body.add_particle(Particle::new(Vec3::new(0.0, 0.0, 0.0), 1.0));
        body.add_particle(Particle::new(Vec3::new(1.0, 0.0, 0.0), 1.0));
        body.add_particle(Particle::new(Vec3::new(0.0, 1.0, 0.0), 1.0));
        body
    }

    #[test]
    fn face_derives_three_distinct_particles() {
        let mut body = triangle_body();
        let material = Material::elastic(1.0, 1.0);
        let ca = body.link(0, 1, material).unwrap();
        let cb = body.link(1, 2, material).unwrap();
        let cc = body.link(2, 0, material).unwrap();
        let face = body.add_face(ca, cb, cc).unwrap();
        let mut particles = body.faces()[face].particles;
        particles.sort_unstable();
        assert_eq!(particles, [0, 1, 2]);
    }

    #[test]
    fn face_rejects_non_triangle() {
        let mut body = triangle_body();
        body.add_particle(Particle::new(Vec3::new(1.0, 1.0, 0.0), 1.0));
        let material = Material::elastic(1.0, 1.0);
        let ca = body.link(0, 1, material).unwrap();
        let cb = body.link(1, 2, material).unwrap();
        let cc = body.link(2, 3, material).unwrap(); // open chain, 4 particles
        assert_eq!(body.add_face(ca, cb, cc), Err(PhysicsError::DegenerateFace));
    }

    #[test]
    fn face_breaks_with_any_constraint() {
        let mut body = triangle_body();
        let material = Material::elastic(1.0, 1.0);
        let ca = body.link(0, 1, material).unwrap();
        let cb = body.link(1, 2, material).unwrap();
        let cc = body.link(2, 0, material).unwrap();
        let face = body.add_face(ca, cb, cc).unwrap();
        assert!(!body.face_is_broken(&body.faces()[face].clone()));
        body.constraint_mut(cb).broken = true;
        assert!(body.face_is_broken(&body.faces()[face].clone()));
    }

    #[test]
    fn constraint_bounds_are_checked() {
        let mut body = triangle_body();
        let material = Material::elastic(1.0, 1.0);
        assert_eq!(
            body.link(0, 7, material),
            Err(PhysicsError::ParticleOutOfBounds { index: 7, count: 3 })
        );
        assert_eq!(
            body.add_face(0, 1, 2),
            Err(PhysicsError::ConstraintOutOfBounds { index: 0, count: 0 })
        );
    }
}
