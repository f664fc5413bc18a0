//! Native stack growth for the recursive evaluator.
//!
//! Brisk programs nest constructs arbitrarily deep (long binary chains, nested
//! blocks, recursive user functions). Every step of the tree walk recurses on
//! the host stack, so the evaluator wraps each construct in
//! [`ensure_sufficient_stack`], which grows the stack before it runs out.
//!
//! The call-depth limit configured on the interpreter is what bounds runaway
//! recursion in user code; this crate only keeps the host process from
//! crashing before that limit is reached.
//!
//! On `wasm32` the guard is a plain call.

/// Remaining stack below which a new segment is allocated.
const RED_ZONE: usize = 100 * 1024;

/// Size of each newly allocated stack segment.
const GROWTH: usize = 1024 * 1024;

/// Run `f`, first growing the stack if less than [`RED_ZONE`] bytes remain.
///
/// ```text
/// fn eval(&mut self, c: &Construct, scope: &ScopeRef) -> EvalResult {
///     ensure_sufficient_stack(|| self.eval_inner(c, scope))
/// }
/// ```
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, GROWTH, f)
}

/// Passthrough on targets that manage their own stack.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
