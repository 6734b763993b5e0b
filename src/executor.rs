//! External collaborators consumed by the scheduler (§6): the VM
//! interpreter that actually runs a callback, and the object table that
//! resolves an owning-object index to a live object. Both are implemented
//! by the host; the scheduler only ever calls through these traits.

/// A live object resolved from an `oindex`. Opaque to the scheduler beyond
/// being a handle the host can hand back to the `Executor`.
pub trait Object {}

/// Resolves an owning-object index to a live object. Per §6, this never
/// fails for a live index -- the scheduler treats a resolution failure
/// here as evidence of arena corruption, not a recoverable condition.
pub trait ObjectStore {
    type Obj: Object;

    fn resolve(&self, oindex: u32) -> Self::Obj;
}

/// Invokes the user-visible callback bound to a callout. May fail, in
/// which case the scheduler logs the error and continues with the next
/// running item (§7) -- one buggy callback never starves the others.
pub trait Executor<O: Object> {
    type Error;

    fn run(&mut self, object: &O, handle: u32) -> Result<(), Self::Error>;
}
