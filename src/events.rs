//! Debounced input events and a fixed-capacity event queue
//!
//! The input layer (buttons, tap sensor) runs from an ISR or a fast poll
//! and must not share mutable state with the main loop. It appends
//! debounced edge events here; the engine drains the queue exactly once
//! per tick. Fixed capacity, no heap, single producer / single consumer on
//! a single core, so no locking is required.

/// Debounced input edge produced by the (external) input driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Short button press: toggles focus pause/resume
    ButtonShort,
    /// Long button press
    ButtonLong,
    /// Single knock on the tap sensor
    Tap,
    /// Two knocks inside the double-tap window: starts a focus session
    DoubleTap,
}

/// Fixed-capacity FIFO ring of input events
///
/// `push` returns false and drops the event when full; the producer must
/// never block.
pub struct EventQueue<const N: usize> {
    buf: [Option<InputEvent>; N],
    head: usize,
    len: usize,
}

impl<const N: usize> EventQueue<N> {
    pub fn new() -> Self {
        Self {
            buf: [None; N],
            head: 0,
            len: 0,
        }
    }

    /// Append an event; false (event dropped) when the queue is full
    pub fn push(&mut self, event: InputEvent) -> bool {
        if self.len == N {
            return false;
        }
        self.buf[(self.head + self.len) % N] = Some(event);
        self.len += 1;
        true
    }

    /// Remove and return the oldest event
    pub fn pop(&mut self) -> Option<InputEvent> {
        if self.len == 0 {
            return None;
        }
        let event = self.buf[self.head].take();
        self.head = (self.head + 1) % N;
        self.len -= 1;
        event
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<const N: usize> Default for EventQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}
