//! Ordered fallback chains.
//!
//! Both the catalog extraction methods and the heuristic discovery stages are
//! a fixed sequence of steps sharing one signature. The driver runs them in
//! order and stops at the first step that finds something; every other
//! outcome (tool missing, no output, probe miss) is a skip.

/// Outcome of a single step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attempt<T> {
    Found(T),
    /// Nothing usable; the reason is only logged.
    Skip(String),
}

impl<T> Attempt<T> {
    pub fn skip(reason: impl Into<String>) -> Self {
        Attempt::Skip(reason.into())
    }
}

/// One step in a fallback chain.
pub trait Step<I: ?Sized, O> {
    fn name(&self) -> &'static str;
    fn attempt(&self, input: &I) -> Attempt<O>;
}

/// Runs `steps` in order against `input`, returning the first found value
/// together with the name of the step that produced it.
pub fn first_found<I, O, S>(steps: &[S], input: &I) -> Option<(&'static str, O)>
where
    I: ?Sized,
    S: Step<I, O>,
{
    for step in steps {
        match step.attempt(input) {
            Attempt::Found(value) => {
                tracing::debug!(step = step.name(), "fallback step succeeded");
                return Some((step.name(), value));
            }
            Attempt::Skip(reason) => {
                tracing::debug!(step = step.name(), %reason, "fallback step skipped");
            }
        }
    }
    None
}
