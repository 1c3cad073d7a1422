//! Observable state holder built on a `tokio::sync::watch` channel.

use tokio::sync::watch;

/// Single value that subscribers can observe.
///
/// Every update notifies current receivers; receivers created later start
/// from the latest value.
#[derive(Debug)]
pub struct StateCell<S> {
    sender: watch::Sender<S>,
}

impl<S> StateCell<S> {
    /// Cell holding `initial`.
    #[must_use]
    pub fn new(initial: S) -> Self {
        Self {
            sender: watch::Sender::new(initial),
        }
    }

    /// Apply `read` to the current value.
    pub fn read<R>(&self, read: impl FnOnce(&S) -> R) -> R {
        read(&self.sender.borrow())
    }

    /// Mutate the value in place and notify subscribers.
    pub fn update(&self, modify: impl FnOnce(&mut S)) {
        self.sender.send_modify(modify);
    }

    /// Receiver that observes every later update.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<S> {
        self.sender.subscribe()
    }
}

impl<S: Clone> StateCell<S> {
    /// Copy of the current value.
    #[must_use]
    pub fn snapshot(&self) -> S {
        self.sender.borrow().clone()
    }
}

impl<S: Default> Default for StateCell<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}
