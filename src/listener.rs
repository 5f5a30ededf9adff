//! Contact listeners: veto and observe collision resolution.

use crate::contact::Contact;
use crate::vec::Vec;

/// Receives collision events for the object it is bound to (a body or the
/// whole world) and decides whether each contact is resolved.
///
/// The world listener is consulted first; returning `false` skips the
/// contact outright. Body listeners are consulted next: a same-body
/// contact needs that body's approval, a cross-body contact is resolved
/// when either body approves. `end_contact` fires only for contacts that
/// were actually resolved, body listeners first, world listener last.
pub trait ContactListener<V: Vec> {
    /// Called before a contact is resolved; `false` vetoes it.
    fn begin_contact(&mut self, contact: &Contact<V>) -> bool {
        let _ = contact;
        true
    }

    /// Called after a contact has been resolved.
    fn end_contact(&mut self, contact: &Contact<V>) {
        let _ = contact;
    }
}

/// The stock listener: approves everything, observes nothing. Installed
/// wherever no listener has been set.
pub struct ApproveAllListener;

impl<V: Vec> ContactListener<V> for ApproveAllListener {}
