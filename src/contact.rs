//! Contact records: a detected penetration between a particle and geometry.

use crate::vec::Vec;
use crate::world::ParticleRef;

/// The struck collision geometry: a constraint edge (2D) or a face
/// triangle (3D) of some body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum GeometryRef {
    Edge { body: usize, index: usize },
    Face { body: usize, index: usize },
}

impl GeometryRef {
    /// The body owning the struck geometry.
    pub fn body(&self) -> usize {
        match *self {
            GeometryRef::Edge { body, .. } => body,
            GeometryRef::Face { body, .. } => body,
        }
    }
}

/// A detected collision, ready for the listener protocol and resolution.
///
/// `normal` is the unit vector from the struck particle's current position
/// toward the contact point on the geometry; `depth` is the distance to
/// it. Detection only ever produces real collisions — "no contact" is
/// `None` at the detection boundary.
#[derive(Clone, Copy, Debug)]
pub struct Contact<V: Vec> {
    pub normal: V,
    pub depth: V::Scalar,
    pub particle: ParticleRef,
    pub geometry: GeometryRef,
}

impl<V: Vec> Contact<V> {
    /// Identity key used to deduplicate contacts within one iteration.
    pub fn key(&self) -> (ParticleRef, GeometryRef) {
        (self.particle, self.geometry)
    }
}
