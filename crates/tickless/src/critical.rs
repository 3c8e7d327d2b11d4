//! Scoped interrupt-mask critical sections.
//!
//! The suppression algorithm needs a critical section coarser than the
//! kernel's own: it must also mask the interrupts that could legitimately
//! cancel the sleep, so the eligibility re-check is atomic with the sleep
//! transition. Masking is expressed as a scoped acquisition released on
//! every exit path, rather than paired mask/unmask calls.

/// Processor interrupt mask.
///
/// `raise`/`lower` must support nesting; only the outermost `lower`
/// re-enables interrupt delivery. On Cortex-M this maps to
/// `cpsid i`/`cpsie i` with a nesting count; hosted implementations model
/// deferred interrupt delivery at the point the mask drops.
pub trait InterruptMask: Send + Sync {
    fn raise(&self);
    fn lower(&self);
}

/// RAII guard holding the interrupt mask raised.
///
/// Dropping the guard lowers the mask, including on early returns out of
/// the abort path.
pub struct MaskGuard<'a> {
    mask: &'a dyn InterruptMask,
}

impl<'a> MaskGuard<'a> {
    pub fn acquire(mask: &'a dyn InterruptMask) -> Self {
        mask.raise();
        Self { mask }
    }
}

impl Drop for MaskGuard<'_> {
    fn drop(&mut self) {
        self.mask.lower();
    }
}

/// No-op mask for hosted single-threaded use.
pub struct NullMask;

impl InterruptMask for NullMask {
    fn raise(&self) {}
    fn lower(&self) {}
}
