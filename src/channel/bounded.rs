//! Bounded MPMC channel with blocking operations and cooperative shutdown.
//!
//! All channel state lives in a single [`Monitor`]-protected block; two
//! [`Condition`]s derived from that one lock express the logical wait
//! states "space available to send" and "item available to receive".
//! Every blocking operation is a predicate-recheck loop, so notifications
//! are only ever a hint and can never be lost between check and wait.
//!
//! # Shutdown
//!
//! `close` flips a sticky flag and wakes every waiter on both conditions.
//! Senders observe the flag before enqueuing and fail with the item handed
//! back; receivers keep draining buffered items and only fail once the
//! channel is both closed and empty.
//!
//! # Rendezvous (capacity 0)
//!
//! An unbuffered channel has no queue; instead it has a one-item hand-off
//! slot. A receiver commits by registering as a waiter before blocking; a
//! sender deposits into the slot only when the slot is free and a committed
//! receiver exists, then returns. The receiver wakes and takes the item.
//! A sender that arrives first parks on the space condition until a
//! receiver commits.

use std::collections::VecDeque;
use std::sync::Arc;

use crate::error::{RecvError, SendError};
use crate::sync::{Condition, Monitor, MonitorGuard};

/// Lock-protected channel state.
#[derive(Debug)]
struct State<T> {
    /// Buffered items, oldest at the front. Unused in rendezvous mode.
    queue: VecDeque<T>,
    /// Rendezvous hand-off slot. Unused in buffered mode.
    slot: Option<T>,
    /// Maximum number of buffered items; 0 denotes rendezvous mode.
    capacity: usize,
    /// Sticky shutdown flag; never reverts to false.
    closed: bool,
    /// Threads currently blocked in `send`.
    send_waiters: usize,
    /// Threads currently blocked in `recv`.
    recv_waiters: usize,
}

impl<T> State<T> {
    fn new(capacity: usize) -> Self {
        Self {
            queue: VecDeque::with_capacity(capacity),
            slot: None,
            capacity,
            closed: false,
            send_waiters: 0,
            recv_waiters: 0,
        }
    }

    /// Whether a send can complete right now.
    ///
    /// Buffered mode: the queue has a free slot. Rendezvous mode: the
    /// hand-off slot is free and a committed receiver is waiting.
    fn can_send(&self) -> bool {
        if self.capacity == 0 {
            self.slot.is_none() && self.recv_waiters > 0
        } else {
            self.queue.len() < self.capacity
        }
    }

    /// Enqueues an item. Caller must have checked [`can_send`](Self::can_send).
    fn push(&mut self, item: T) {
        if self.capacity == 0 {
            debug_assert!(self.slot.is_none());
            self.slot = Some(item);
        } else {
            debug_assert!(self.queue.len() < self.capacity);
            self.queue.push_back(item);
        }
    }

    /// Takes the next deliverable item, if any.
    fn take(&mut self) -> Option<T> {
        if self.capacity == 0 {
            self.slot.take()
        } else {
            self.queue.pop_front()
        }
    }
}

/// Shared state wrapper with the two wait conditions derived from its lock.
#[derive(Debug)]
struct Shared<T> {
    state: Monitor<State<T>>,
    /// Senders wait here for a free slot (or a committed receiver).
    space: Condition,
    /// Receivers wait here for a deliverable item.
    items: Condition,
}

/// A bounded FIFO channel, safe for any number of concurrent producers and
/// consumers.
///
/// Cloning the handle is cheap and yields another reference to the same
/// channel. The channel is destroyed when the last handle is dropped; the
/// caller guarantees no thread is blocked inside an operation at that
/// point.
pub struct Channel<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Channel<T> {
    /// Creates a channel holding at most `capacity` buffered items.
    ///
    /// A capacity of 0 creates a rendezvous channel: sends and receives
    /// must meet, and no item is ever buffered.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Monitor::new(State::new(capacity)),
                space: Condition::new(),
                items: Condition::new(),
            }),
        }
    }

    /// Creates an unbuffered rendezvous channel.
    ///
    /// Equivalent to `Channel::new(0)`.
    #[must_use]
    pub fn rendezvous() -> Self {
        Self::new(0)
    }

    /// Sends an item, blocking while the channel is full (or, in
    /// rendezvous mode, until a receiver is committed to take it).
    ///
    /// # Errors
    ///
    /// Returns `SendError::Closed(item)` if the channel is closed before
    /// the item is enqueued, handing the item back. A send never partially
    /// completes: the item is either delivered in FIFO order or returned.
    pub fn send(&self, item: T) -> Result<(), SendError<T>> {
        let mut state = self.shared.state.lock();
        loop {
            if state.closed {
                return Err(SendError::Closed(item));
            }
            if state.can_send() {
                state.push(item);
                if state.recv_waiters > 0 {
                    self.shared.items.notify_one();
                }
                return Ok(());
            }

            tracing::trace!(
                capacity = state.capacity,
                buffered = state.queue.len(),
                "send blocked, waiting for space"
            );
            state.send_waiters += 1;
            state = self.shared.space.wait(state);
            state.send_waiters -= 1;
        }
    }

    /// Receives the next item in FIFO order, blocking while the channel is
    /// empty and still open.
    ///
    /// # Errors
    ///
    /// Returns `RecvError::Closed` once the channel is closed **and**
    /// drained. Items buffered before `close` are still delivered.
    pub fn recv(&self) -> Result<T, RecvError> {
        let mut state = self.shared.state.lock();
        loop {
            if let Some(item) = state.take() {
                if state.send_waiters > 0 {
                    self.shared.space.notify_one();
                }
                return Ok(item);
            }
            if state.closed {
                return Err(RecvError::Closed);
            }

            tracing::trace!(capacity = state.capacity, "recv blocked, waiting for item");
            state.recv_waiters += 1;
            if state.capacity == 0 && state.send_waiters > 0 {
                // A receiver just committed; a parked sender can now deposit.
                self.shared.space.notify_one();
            }
            state = self.shared.items.wait(state);
            state.recv_waiters -= 1;
        }
    }

    /// Attempts to send without blocking.
    ///
    /// # Errors
    ///
    /// - `SendError::Closed(item)` if the channel is closed
    /// - `SendError::Full(item)` if the buffer is full, or, in rendezvous
    ///   mode, if no receiver is currently committed to take the item
    pub fn try_send(&self, item: T) -> Result<(), SendError<T>> {
        let mut state = self.shared.state.lock();
        if state.closed {
            return Err(SendError::Closed(item));
        }
        if !state.can_send() {
            return Err(SendError::Full(item));
        }
        state.push(item);
        if state.recv_waiters > 0 {
            self.shared.items.notify_one();
        }
        Ok(())
    }

    /// Attempts to receive without blocking.
    ///
    /// # Errors
    ///
    /// - `RecvError::Closed` if the channel is closed and drained
    /// - `RecvError::Empty` if no item is deliverable right now
    pub fn try_recv(&self) -> Result<T, RecvError> {
        let mut state = self.shared.state.lock();
        if let Some(item) = state.take() {
            if state.send_waiters > 0 {
                self.shared.space.notify_one();
            }
            return Ok(item);
        }
        if state.closed {
            Err(RecvError::Closed)
        } else {
            Err(RecvError::Empty)
        }
    }

    /// Closes the channel. Idempotent and never blocking.
    ///
    /// Every blocked sender and receiver is woken: senders fail with their
    /// item handed back, receivers drain remaining buffered items and then
    /// fail. No new send succeeds after this returns.
    pub fn close(&self) {
        let mut state = self.shared.state.lock();
        if state.closed {
            return;
        }
        state.closed = true;
        tracing::debug!(
            buffered = state.queue.len(),
            send_waiters = state.send_waiters,
            recv_waiters = state.recv_waiters,
            "channel closed"
        );
        self.shared.items.notify_all();
        self.shared.space.notify_all();
    }

    /// Returns true if the channel has been closed.
    ///
    /// A closed channel may still hold deliverable items; see
    /// [`recv`](Self::recv).
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.shared.state.lock().closed
    }

    /// Returns the number of buffered items.
    ///
    /// Always 0 for a rendezvous channel: an item mid-hand-off belongs to
    /// its matched receiver, not to a buffer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shared.state.lock().queue.len()
    }

    /// Returns true if no items are buffered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shared.state.lock().queue.is_empty()
    }

    /// Returns the configured capacity (0 for a rendezvous channel).
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.shared.state.lock().capacity
    }
}

impl<T> Clone for Channel<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T> std::fmt::Debug for Channel<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state: MonitorGuard<'_, State<T>> = self.shared.state.lock();
        f.debug_struct("Channel")
            .field("capacity", &state.capacity)
            .field("len", &state.queue.len())
            .field("closed", &state.closed)
            .finish_non_exhaustive()
    }
}
