//! Reusable shape definitions: describe a body once, stamp out instances.
//!
//! A `ShapeDef` records particles, constraints and faces symbolically (by
//! the indices its `particle`/`constraint` calls return); `build` turns it
//! into a fresh `Body`, validating every reference. The same definition
//! can be built any number of times.

use crate::body::Body;
use crate::error::PhysicsError;
use crate::float::Float;
use crate::material::Material;
use crate::particle::Particle;
use crate::vec::Vec;
use alloc::vec::Vec as AllocVec;

#[derive(Clone, Copy, Debug)]
struct ParticleDef<V: Vec> {
    pos: V,
    mass: V::Scalar,
    is_static: bool,
}

#[derive(Clone, Copy, Debug)]
struct ConstraintDef<F: Float> {
    a: usize,
    b: usize,
    material: Material<F>,
}

pub struct ShapeDef<V: Vec> {
    particles: AllocVec<ParticleDef<V>>,
    constraints: AllocVec<ConstraintDef<V::Scalar>>,
    faces: AllocVec<[usize; 3]>,
}

impl<V: Vec> ShapeDef<V> {
    pub fn new() -> Self {
        ShapeDef {
            particles: AllocVec::new(),
            constraints: AllocVec::new(),
            faces: AllocVec::new(),
        }
    }

    /// Declare a particle, returning its index within the built body.
    pub fn particle(&mut self, pos: V, mass: V::Scalar) -> usize {
        self.particles.push(ParticleDef { pos, mass, is_static: false });
        self.particles.len() - 1
    }

    /// Declare an immovable particle.
    pub fn static_particle(&mut self, pos: V, mass: V::Scalar) -> usize {
        self.particles.push(ParticleDef { pos, mass, is_static: true });
        self.particles.len() - 1
    }

    /// Declare a constraint between two declared particles; the rest
    /// length is taken from their positions at build time.
    pub fn constraint(&mut self, a: usize, b: usize, material: Material<V::Scalar>) -> usize {
        self.constraints.push(ConstraintDef { a, b, material });
        self.constraints.len() - 1
    }

    /// Declare a collision face spanning three declared constraints.
    pub fn face(&mut self, ca: usize, cb: usize, cc: usize) -> usize {
        self.faces.push([ca, cb, cc]);
        self.faces.len() - 1
    }

    /// Build a body from this definition. All references are validated
    /// here, so a definition that builds once builds every time.
    pub fn build(&self) -> Result<Body<V>, PhysicsError> {
        let mut body = Body::new();
        for def in self.particles.iter() {
            let particle = if def.is_static {
                Particle::fixed(def.pos, def.mass)
            } else {
                Particle::new(def.pos, def.mass)
            };
            body.add_particle(particle);
        }
        for def in self.constraints.iter() {
            body.link(def.a, def.b, def.material)?;
        }
        for &[ca, cb, cc] in self.faces.iter() {
            body.add_face(ca, cb, cc)?;
        }
        Ok(body)
    }
}

impl<V: Vec> Default for ShapeDef<V> {
    fn default() -> Self {
        Self::new()
    }
}
