//! Depth-1 blocking channel connecting stage threads

use std::sync::Arc;

use parking_lot::{Condvar, Mutex};

struct State<T> {
    slot: Option<T>,
    senders: usize,
    receiver_alive: bool,
}

struct Shared<T> {
    state: Mutex<State<T>>,
    changed: Condvar,
}

/// Sending half of a depth-1 channel
pub struct Sender<T> {
    shared: Arc<Shared<T>>,
}

/// Receiving half of a depth-1 channel
pub struct Receiver<T> {
    shared: Arc<Shared<T>>,
}

/// Creates a channel that holds at most one value in flight.
///
/// `send` blocks until the previous value has been received, which gives threaded stages the same
/// back-pressure as a `Port` stepped by a single scheduler.
pub fn channel<T>() -> (Sender<T>, Receiver<T>) {
    let shared = Arc::new(Shared {
        state: Mutex::new(State { slot: None, senders: 1, receiver_alive: true }),
        changed: Condvar::new(),
    });

    (Sender { shared: shared.clone() }, Receiver { shared })
}

impl<T> Sender<T> {
    /// Blocks until the slot is free, then stores `value`.
    ///
    /// Fails, handing the value back, once the receiver has been dropped.
    pub fn send(&self, value: T) -> Result<(), T> {
        let mut state = self.shared.state.lock();

        loop {
            if !state.receiver_alive {
                return Err(value);
            }

            if state.slot.is_none() {
                state.slot = Some(value);
                self.shared.changed.notify_all();

                return Ok(());
            }

            self.shared.changed.wait(&mut state);
        }
    }
}

impl<T> Clone for Sender<T> {
    fn clone(&self) -> Sender<T> {
        self.shared.state.lock().senders += 1;

        Sender { shared: self.shared.clone() }
    }
}

impl<T> Drop for Sender<T> {
    fn drop(&mut self) {
        let mut state = self.shared.state.lock();

        state.senders -= 1;

        self.shared.changed.notify_all();
    }
}

impl<T> Receiver<T> {
    /// Blocks until a value arrives. Returns `None` once every sender is gone and the slot is empty.
    pub fn recv(&self) -> Option<T> {
        let mut state = self.shared.state.lock();

        loop {
            if let Some(value) = state.slot.take() {
                self.shared.changed.notify_all();

                return Some(value);
            }

            if state.senders == 0 {
                return None;
            }

            self.shared.changed.wait(&mut state);
        }
    }

    /// Takes a value if one is waiting, without blocking
    pub fn try_recv(&self) -> Option<T> {
        let mut state = self.shared.state.lock();

        let value = state.slot.take();

        if value.is_some() {
            self.shared.changed.notify_all();
        }

        value
    }

    /// True once every sender has been dropped, even if a last value is still waiting
    pub fn is_closed(&self) -> bool {
        self.shared.state.lock().senders == 0
    }
}

impl<T> Drop for Receiver<T> {
    fn drop(&mut self) {
        self.shared.state.lock().receiver_alive = false;

        self.shared.changed.notify_all();
    }
}
