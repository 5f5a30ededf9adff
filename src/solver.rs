//! The solver: steps a bound world through integration, relaxation,
//! collision and the listener protocol.

use crate::collision::CollideDispatch;
use crate::contact::{Contact, GeometryRef};
use crate::error::PhysicsError;
use crate::float::Float;
use crate::vec::Vec;
use crate::world::{joint_endpoints_mut, pair_mut, ParticleRef, World};
use alloc::collections::BTreeSet;
use alloc::vec::Vec as AllocVec;

/// Relaxation passes per step when none are configured explicitly.
pub const DEFAULT_ITERATIONS: usize = 20;

/// Steps the simulation. A solver owns at most one world at a time; it
/// can be constructed unbound and have worlds bound and taken back, which
/// lets callers swap scenes without rebuilding the solver.
///
/// One `solve` call runs three phases:
///
/// 1. world joints are relaxed for the configured iteration count,
/// 2. each body is integrated, then per iteration its own constraints are
///    relaxed and its particles collided against all geometry, and
/// 3. every particle's acceleration is reset to the global force, to be
///    picked up by the next step's integration.
pub struct Solver<V: Vec> {
    iterations: usize,
    world: Option<World<V>>,
}

impl<V: Vec> Solver<V> {
    /// An unbound solver with the default iteration count.
    pub fn new() -> Self {
        Solver { iterations: DEFAULT_ITERATIONS, world: None }
    }

    pub fn with_world(mut self, world: World<V>) -> Self {
        self.world = Some(world);
        self
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Bind a world, returning the previously bound one if any.
    pub fn bind_world(&mut self, world: World<V>) -> Option<World<V>> {
        self.world.replace(world)
    }

    /// Unbind and return the current world.
    pub fn take_world(&mut self) -> Option<World<V>> {
        self.world.take()
    }

    pub fn world(&self) -> Option<&World<V>> {
        self.world.as_ref()
    }

    pub fn world_mut(&mut self) -> Option<&mut World<V>> {
        self.world.as_mut()
    }

    pub fn set_iterations(&mut self, iterations: usize) {
        self.iterations = iterations;
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Advance the bound world by `dt`.
    pub fn solve(&mut self, dt: V::Scalar) -> Result<(), PhysicsError>
    where
        V: CollideDispatch,
    {
        let iterations = self.iterations.max(1);
        let world = self.world.as_mut().ok_or(PhysicsError::WorldNotBound)?;

        // World joints first, so cross-body links settle before the
        // bodies themselves move and collide.
        for iteration in 1..=iterations {
            let World { bodies, joints, .. } = world;
            for joint in joints.iter_mut() {
                if joint.broken {
                    continue;
                }
                if let Some((a, b)) = joint_endpoints_mut(bodies, joint.a, joint.b) {
                    joint.relax(iteration, a, b);
                }
            }
        }

        let body_count = world.bodies.len();
        for body_index in 0..body_count {
            for particle in world.bodies[body_index].particles.iter_mut() {
                particle.integrate(dt);
            }

            for iteration in 1..=iterations {
                {
                    let body = &mut world.bodies[body_index];
                    let (constraints, particles) = (&mut body.constraints, &mut body.particles);
                    for constraint in constraints.iter_mut() {
                        if constraint.broken || constraint.a == constraint.b {
                            continue;
                        }
                        let (a, b) = pair_mut(particles, constraint.a, constraint.b);
                        constraint.relax(iteration, a, b);
                    }
                }

                let mut contacts = AllocVec::new();
                V::collect_contacts(world, body_index, &mut contacts);
                // The same particle/geometry pair can be reported through
                // several overlapping scans; resolve it once, in discovery
                // order.
                let mut seen = BTreeSet::new();
                contacts.retain(|contact| seen.insert(contact.key()));
                for contact in &contacts {
                    Self::process_contact(world, contact);
                }
            }
        }

        // Queue the global force for the next integration.
        let global_force = world.global_force;
        for body in world.bodies.iter_mut() {
            for particle in body.particles.iter_mut() {
                particle.acceleration = global_force;
            }
        }
        Ok(())
    }

    /// Run one contact through the two-level listener protocol, resolving
    /// it unless vetoed.
    ///
    /// The world listener can veto outright. For a same-body contact the
    /// body's own listener must approve; for a cross-body contact either
    /// body's approval suffices (the second listener is only consulted if
    /// the first declines). `end_contact` fires only when the contact was
    /// actually resolved, bodies first, world last.
    fn process_contact(world: &mut World<V>, contact: &Contact<V>) {
        if !world.contact_listener.begin_contact(contact) {
            return;
        }
        let striker = contact.particle.body;
        let target = contact.geometry.body();
        let approved = if striker == target {
            world.bodies[striker].contact_listener.begin_contact(contact)
        } else {
            world.bodies[striker].contact_listener.begin_contact(contact)
                || world.bodies[target].contact_listener.begin_contact(contact)
        };
        if !approved {
            return;
        }

        Self::resolve(world, contact);

        world.bodies[striker].contact_listener.end_contact(contact);
        if target != striker {
            world.bodies[target].contact_listener.end_contact(contact);
        }
        world.contact_listener.end_contact(contact);
    }

    /// Separate a contact's participants positionally.
    ///
    /// The struck particle is pushed along the normal through the contact
    /// point; the geometry's vertices take the counter-displacement split
    /// by their distance to the struck particle. With a static participant
    /// the moving side has to absorb the whole separation, so the factor
    /// doubles. Static particles themselves never move.
    pub fn resolve(world: &mut World<V>, contact: &Contact<V>) {
        let eps = V::Scalar::from_f32(1e-10);

        let mut vertices: AllocVec<ParticleRef> = AllocVec::new();
        match contact.geometry {
            GeometryRef::Edge { body, index } => {
                let constraint = &world.bodies[body].constraints[index];
                vertices.push(ParticleRef::new(body, constraint.a));
                vertices.push(ParticleRef::new(body, constraint.b));
            }
            GeometryRef::Face { body, index } => {
                let face = &world.bodies[body].faces[index];
                for &particle in face.particles.iter() {
                    vertices.push(ParticleRef::new(body, particle));
                }
            }
        }

        let any_static = world.particle(contact.particle).is_static
            || vertices.iter().any(|&at| world.particle(at).is_static);
        let factor = if any_static {
            V::Scalar::from_f32(2.0)
        } else {
            V::Scalar::from_f32(1.5)
        };
        let push = contact.normal.scale(contact.depth * factor);

        {
            let particle = world.particle_mut(contact.particle);
            if !particle.is_static {
                particle.pos = particle.pos + push;
            }
        }

        let struck_pos = world.particle(contact.particle).pos;
        let total = vertices.iter().fold(V::Scalar::zero(), |sum, &at| {
            sum + world.particle(at).pos.distance(struck_pos)
        });
        let even_share = V::Scalar::one() / V::Scalar::from_f32(vertices.len() as f32);
        for &at in vertices.iter() {
            let weight = if total.is_near_zero(eps) {
                even_share
            } else {
                world.particle(at).pos.distance(struck_pos) / total
            };
            let particle = world.particle_mut(at);
            if !particle.is_static {
                particle.pos = particle.pos - push.scale(weight);
            }
        }
    }
}

impl<V: Vec> Default for Solver<V> {
    fn default() -> Self {
        Self::new()
    }
}
