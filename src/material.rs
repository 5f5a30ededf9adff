//! Material bundles: the per-constraint spring parameters plus node mass.

use crate::float::Float;

/// Spring and mass parameters applied when building constraints.
///
/// `deform_force` is the plastic-yield threshold: axial force above it
/// permanently grows the rest length. `max_bending` is the rupture ratio:
/// a rest length beyond `original_length * max_bending` breaks the
/// constraint. `None` disables the respective mechanism.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material<F: Float> {
    pub mass: F,
    pub stiffness: F,
    pub deform_force: Option<F>,
    pub max_bending: Option<F>,
}

impl<F: Float> Material<F> {
    pub fn new(mass: F, stiffness: F, deform_force: Option<F>, max_bending: Option<F>) -> Self {
        Material { mass, stiffness, deform_force, max_bending }
    }

    /// Soft default material: low stiffness, yields easily, tears at 1.4x.
    pub fn soft() -> Self {
        Material {
            mass: F::one(),
            stiffness: F::from_f32(0.01),
            deform_force: Some(F::one()),
            max_bending: Some(F::from_f32(1.4)),
        }
    }

    /// Metal-like material: stiff and heavy, yields late, tears at 1.1x.
    pub fn metal() -> Self {
        Material {
            mass: F::from_f32(2.0),
            stiffness: F::from_f32(0.9),
            deform_force: Some(F::from_f32(3.0)),
            max_bending: Some(F::from_f32(1.1)),
        }
    }

    /// Purely elastic material: never yields, never breaks.
    pub fn elastic(mass: F, stiffness: F) -> Self {
        Material { mass, stiffness, deform_force: None, max_bending: None }
    }
}

impl<F: Float> Default for Material<F> {
    fn default() -> Self {
        Self::soft()
    }
}
