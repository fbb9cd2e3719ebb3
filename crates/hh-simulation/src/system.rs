use std::any::Any;
use std::fmt::Debug;

use crate::context::SimContext;
use crate::error::SimResult;

/// One stage of the per-tick update.
///
/// A [`Simulation`](crate::Simulation) runs its systems one after another
/// in the order they were added, so a later system sees everything an
/// earlier one changed during the same tick. Cleanup relies on this to
/// find the characters combat has just killed.
pub trait System: Debug {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Advance this system by one tick.
    fn tick(&mut self, ctx: &mut SimContext<'_>) -> SimResult<()>;

    /// Runs once, right before the first tick.
    fn init(&mut self, _ctx: &mut SimContext<'_>) -> SimResult<()> {
        Ok(())
    }

    /// Lets callers get the concrete system back out of the simulation.
    fn as_any(&self) -> &dyn Any;

    /// Mutable counterpart of [`System::as_any`].
    fn as_any_mut(&mut self) -> &mut dyn Any;
}
