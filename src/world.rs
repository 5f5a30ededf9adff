//! The physics world: all bodies, world-level joints, the global force.

use crate::body::Body;
use crate::constraint::Joint;
use crate::error::PhysicsError;
use crate::listener::{ApproveAllListener, ContactListener};
use crate::material::Material;
use crate::particle::Particle;
use crate::vec::Vec;
use alloc::boxed::Box;
use alloc::vec::Vec as AllocVec;

/// Address of a particle across bodies: `index` into the particle list of
/// body `body`. Used by joints and contacts; indices stay stable because
/// bodies never reallocate their particle lists after construction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct ParticleRef {
    pub body: usize,
    pub index: usize,
}

impl ParticleRef {
    pub fn new(body: usize, index: usize) -> Self {
        ParticleRef { body, index }
    }
}

/// Container for everything one solver steps: bodies, joints, the global
/// force (gravity) and the world-level contact listener.
pub struct World<V: Vec> {
    pub(crate) bodies: AllocVec<Body<V>>,
    pub(crate) joints: AllocVec<Joint<V::Scalar>>,
    pub(crate) global_force: V,
    pub(crate) contact_listener: Box<dyn ContactListener<V>>,
}

impl<V: Vec> World<V> {
    pub fn new() -> Self {
        World {
            bodies: AllocVec::new(),
            joints: AllocVec::new(),
            global_force: V::zero(),
            contact_listener: Box::new(ApproveAllListener),
        }
    }

    /// Add a body to the simulation, returning its index.
    pub fn add_body(&mut self, body: Body<V>) -> usize {
        let index = self.bodies.len();
        self.bodies.push(body);
        index
    }

    pub fn bodies(&self) -> &[Body<V>] {
        &self.bodies
    }

    pub fn body(&self, index: usize) -> &Body<V> {
        &self.bodies[index]
    }

    pub fn body_mut(&mut self, index: usize) -> &mut Body<V> {
        &mut self.bodies[index]
    }

    /// Register a joint: relaxed with the body constraints but never
    /// checked for collisions.
    pub fn add_joint(&mut self, joint: Joint<V::Scalar>) -> Result<usize, PhysicsError> {
        for endpoint in [joint.a, joint.b] {
            self.check_ref(endpoint)?;
        }
        let index = self.joints.len();
        self.joints.push(joint);
        Ok(index)
    }

    /// Join two particles across bodies with a rest length equal to their
    /// current distance.
    pub fn joint_between(
        &mut self,
        a: ParticleRef,
        b: ParticleRef,
        material: Material<V::Scalar>,
    ) -> Result<usize, PhysicsError> {
        self.check_ref(a)?;
        self.check_ref(b)?;
        let rest_length = self.particle(a).pos.distance(self.particle(b).pos);
        self.add_joint(Joint::new(a, b, rest_length, material))
    }

    pub fn joints(&self) -> &[Joint<V::Scalar>] {
        &self.joints
    }

    pub fn set_global_force(&mut self, force: V) {
        self.global_force = force;
    }

    pub fn global_force(&self) -> V {
        self.global_force
    }

    /// Install the world-level contact listener, consulted before any body
    /// listener.
    pub fn set_contact_listener(&mut self, listener: Box<dyn ContactListener<V>>) {
        self.contact_listener = listener;
    }

    /// Restore the stock approve-all listener.
    pub fn clear_contact_listener(&mut self) {
        self.contact_listener = Box::new(ApproveAllListener);
    }

    pub fn particle(&self, at: ParticleRef) -> &Particle<V> {
        &self.bodies[at.body].particles[at.index]
    }

    pub fn particle_mut(&mut self, at: ParticleRef) -> &mut Particle<V> {
        &mut self.bodies[at.body].particles[at.index]
    }

    fn check_ref(&self, at: ParticleRef) -> Result<(), PhysicsError> {
        let body_count = self.bodies.len();
        if at.body >= body_count {
            return Err(PhysicsError::ParticleOutOfBounds { index: at.body, count: body_count });
        }
        let count = self.bodies[at.body].particles.len();
        if at.index >= count {
            return Err(PhysicsError::ParticleOutOfBounds { index: at.index, count });
        }
        Ok(())
    }
}

impl<V: Vec> Default for World<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Mutable references to two distinct elements of one slice.
pub(crate) fn pair_mut<T>(slice: &mut [T], i: usize, j: usize) -> (&mut T, &mut T) {
    debug_assert!(i != j);
    if i < j {
        let (left, right) = slice.split_at_mut(j);
        (&mut left[i], &mut right[0])
    } else {
        let (left, right) = slice.split_at_mut(i);
        (&mut right[0], &mut left[j])
    }
}

/// Mutable references to a joint's two endpoint particles, which may live
/// in the same body or in two different ones. `None` when the endpoints
/// alias the same particle.
pub(crate) fn joint_endpoints_mut<V: Vec>(
    bodies: &mut [Body<V>],
    a: ParticleRef,
    b: ParticleRef,
) -> Option<(&mut Particle<V>, &mut Particle<V>)> {
    if a == b {
        return None;
    }
    if a.body == b.body {
        let body = &mut bodies[a.body];
        Some(pair_mut(&mut body.particles, a.index, b.index))
    } else {
        let (first, second) = pair_mut(bodies, a.body, b.body);
        Some((&mut first.particles[a.index], &mut second.particles[b.index]))
    }
}
