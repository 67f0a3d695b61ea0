//! Debounced re-entry: a single-slot, replace-on-reschedule frame task.
//!
//! Every trigger that fires before the next frame replaces the pending ticket, so a burst of
//! events collapses into one cycle. Slots are shared between the host's listener table and the
//! scaler that owns them; both live on the same (single) event-loop thread.

use std::cell::Cell;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    /// The document became ready.
    Ready,
    /// Web fonts finished loading.
    FontsLoaded,
    /// The viewport was resized.
    Resize,
}

impl Trigger {
    pub const ALL: [Trigger; 3] = [Trigger::Ready, Trigger::FontsLoaded, Trigger::Resize];
}

/// Handle of a listener registered with a host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BindingId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub id: u64,
    pub due_frame: u64,
    pub trigger: Trigger,
}

#[derive(Debug, Clone, Copy, Default)]
struct SlotState {
    pending: Option<Ticket>,
    next_id: u64,
    requests: u64,
}

#[derive(Debug, Clone, Default)]
pub struct FrameSlot {
    state: Rc<Cell<SlotState>>,
}

impl FrameSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules a run for the frame after `current_frame`, cancelling any pending ticket.
    pub fn schedule(&self, trigger: Trigger, current_frame: u64) -> Ticket {
        let mut st = self.state.get();
        let ticket = Ticket {
            id: st.next_id,
            due_frame: current_frame.saturating_add(1),
            trigger,
        };
        if let Some(prev) = st.pending {
            tracing::trace!(cancelled = prev.id, replacement = ticket.id, "fontscaler: debounce");
        }
        st.next_id += 1;
        st.requests += 1;
        st.pending = Some(ticket);
        self.state.set(st);
        ticket
    }

    pub fn cancel(&self) -> Option<Ticket> {
        let mut st = self.state.get();
        let prev = st.pending.take();
        self.state.set(st);
        prev
    }

    pub fn pending(&self) -> Option<Ticket> {
        self.state.get().pending
    }

    pub fn is_scheduled(&self) -> bool {
        self.pending().is_some()
    }

    /// Total number of schedule requests seen, including replaced ones.
    pub fn request_count(&self) -> u64 {
        self.state.get().requests
    }

    /// Consumes the pending ticket if it is due at `frame`.
    pub fn take_due(&self, frame: u64) -> Option<Ticket> {
        let mut st = self.state.get();
        let ticket = st.pending.filter(|t| t.due_frame <= frame)?;
        st.pending = None;
        self.state.set(st);
        Some(ticket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reschedule_replaces_pending_ticket() {
        let slot = FrameSlot::new();
        let first = slot.schedule(Trigger::Ready, 0);
        let second = slot.schedule(Trigger::Resize, 0);
        assert_ne!(first.id, second.id);
        assert_eq!(slot.pending(), Some(second));
        assert_eq!(slot.request_count(), 2);
    }

    #[test]
    fn ticket_is_not_due_in_the_scheduling_frame() {
        let slot = FrameSlot::new();
        slot.schedule(Trigger::Resize, 4);
        assert_eq!(slot.take_due(4), None);
        assert!(slot.is_scheduled());

        let ticket = slot.take_due(5).unwrap();
        assert_eq!(ticket.due_frame, 5);
        assert_eq!(ticket.trigger, Trigger::Resize);
        assert!(!slot.is_scheduled());
        assert_eq!(slot.take_due(6), None);
    }

    #[test]
    fn clones_share_one_slot() {
        let slot = FrameSlot::new();
        let listener = slot.clone();
        for _ in 0..10 {
            listener.schedule(Trigger::Resize, 0);
        }
        assert!(slot.take_due(1).is_some());
        assert!(slot.take_due(1).is_none());
        assert_eq!(slot.request_count(), 10);
    }

    #[test]
    fn cancel_drops_pending_ticket() {
        let slot = FrameSlot::new();
        let ticket = slot.schedule(Trigger::FontsLoaded, 0);
        assert_eq!(slot.cancel(), Some(ticket));
        assert_eq!(slot.take_due(10), None);
    }
}
