//! Lock-free intent queue between the chrome and the tick loop
//!
//! Key handlers and the voice capture layer submit intents without blocking;
//! the tick loop drains everything pending at the start of each tick, which
//! gives message application a single deterministic point in the frame.

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};

use crate::game::systems::kinematics::SteerDirection;

/// A discrete control intent from the player
#[derive(Debug, Clone, PartialEq)]
pub enum InputIntent {
    /// Throttle held or released
    Throttle(bool),
    /// Brake held or released
    Brake(bool),
    /// One steering key press
    Steer(SteerDirection),
    /// Strike at the nearest rival
    Strike,
    /// A finished speech-to-text transcript
    Voice(String),
}

/// Bounded intent queue.
///
/// Capacity only needs to cover the key events that can arrive between two
/// ticks; overflow drops the intent rather than stalling the input handler.
pub struct InputBuffer {
    sender: Sender<InputIntent>,
    receiver: Receiver<InputIntent>,
    capacity: usize,
}

impl InputBuffer {
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self {
            sender,
            receiver,
            capacity,
        }
    }

    /// Create a sender handle for an input source
    pub fn sender(&self) -> IntentSender {
        IntentSender {
            sender: self.sender.clone(),
        }
    }

    /// Drain all pending intents in arrival order
    pub fn drain(&self) -> Vec<InputIntent> {
        self.receiver.try_iter().collect()
    }

    #[inline]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for InputBuffer {
    fn default() -> Self {
        // A handful of key events per frame is the realistic ceiling; 64
        // leaves room for a worst-case key-repeat burst.
        Self::new(64)
    }
}

/// Clonable submit handle for input sources
#[derive(Clone)]
pub struct IntentSender {
    sender: Sender<InputIntent>,
}

impl IntentSender {
    /// Submit an intent (non-blocking). Returns false when the buffer is
    /// full or the loop is gone; the intent is dropped either way.
    #[inline]
    pub fn send(&self, intent: InputIntent) -> bool {
        match self.sender.try_send(intent) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) | Err(TrySendError::Disconnected(_)) => false,
        }
    }
}
