//! The boundary through which a running search reports progress. Searches never know how (or
//! whether) the frontier is displayed; the default [NoopObserver] ignores every snapshot.
use crate::frontier::{Frontier, Side};
use std::thread;
use std::time::Duration;

pub trait FrontierObserver {
    /// Called once after every expansion step with the current open and closed sets.
    fn observe(&mut self, frontier: &Frontier<'_>);
}

impl<O: FrontierObserver + ?Sized> FrontierObserver for &mut O {
    fn observe(&mut self, frontier: &Frontier<'_>) {
        (**self).observe(frontier)
    }
}

/// Discards every snapshot.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl FrontierObserver for NoopObserver {
    fn observe(&mut self, _: &Frontier<'_>) {}
}

/// Adapts a closure into an observer.
pub struct FnObserver<F>(pub F);

impl<F> FrontierObserver for FnObserver<F>
where
    F: FnMut(&Frontier<'_>),
{
    fn observe(&mut self, frontier: &Frontier<'_>) {
        (self.0)(frontier)
    }
}

/// Sleeps for a fixed delay after forwarding each snapshot, for animated display.
pub struct Throttle<O> {
    inner: O,
    delay: Duration,
}

impl<O: FrontierObserver> Throttle<O> {
    pub fn new(inner: O, delay: Duration) -> Throttle<O> {
        Throttle { inner, delay }
    }

    pub fn into_inner(self) -> O {
        self.inner
    }
}

impl<O: FrontierObserver> FrontierObserver for Throttle<O> {
    fn observe(&mut self, frontier: &Frontier<'_>) {
        self.inner.observe(frontier);
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
    }
}

/// Sizes of one recorded snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrontierSize {
    pub expansion: usize,
    pub side: Side,
    pub open: usize,
    pub closed: usize,
}

/// Records the size of every snapshot it sees.
#[derive(Clone, Debug, Default)]
pub struct FrontierRecorder {
    pub sizes: Vec<FrontierSize>,
}

impl FrontierRecorder {
    pub fn new() -> FrontierRecorder {
        FrontierRecorder::default()
    }

    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }
}

impl FrontierObserver for FrontierRecorder {
    fn observe(&mut self, frontier: &Frontier<'_>) {
        self.sizes.push(FrontierSize {
            expansion: frontier.expansion,
            side: frontier.side,
            open: frontier.open_len(),
            closed: frontier.closed_len(),
        });
    }
}
