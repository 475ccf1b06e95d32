// Per-player input queue

use super::action::InputEvent;
use std::collections::VecDeque;

/// Maximum number of queued events between two ticks
const MAX_QUEUED_EVENTS: usize = 30;

/// Ordered queue of input events for one player.
///
/// The host pushes events as they happen; the controller drains them at the
/// start of the next tick. Events are delivered in arrival order and are not
/// retried: an event that is illegal when processed is simply dropped.
#[derive(Debug, Default)]
pub struct InputStream {
    queue: VecDeque<InputEvent>,
}

impl InputStream {
    pub fn new() -> Self {
        Self {
            queue: VecDeque::with_capacity(MAX_QUEUED_EVENTS),
        }
    }

    /// Queue an event
    pub fn push(&mut self, event: InputEvent) {
        // Consecutive axis updates collapse into the latest value
        if let InputEvent::Move(axis) = event {
            if let Some(InputEvent::Move(last)) = self.queue.back_mut() {
                *last = axis;
                return;
            }
        }

        self.queue.push_back(event);

        // Keep the queue size under control
        if self.queue.len() > MAX_QUEUED_EVENTS {
            log::warn!("Input stream overflow, dropping oldest event");
            self.queue.pop_front();
        }
    }

    /// Take every queued event in arrival order
    pub fn drain(&mut self) -> Vec<InputEvent> {
        self.queue.drain(..).collect()
    }

    /// Drop all queued events
    pub fn clear(&mut self) {
        self.queue.clear();
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
