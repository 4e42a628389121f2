//! Event channel implementation using crossbeam-channel.

use crossbeam_channel::{unbounded, Receiver, Sender};

use super::Event;

/// Handed to the copier loop and the verifier.
///
/// Cloneable, so the CLI can keep one end while the pipeline holds another.
#[derive(Clone)]
pub struct EventSender {
    inner: Sender<Event>,
}

impl EventSender {
    /// Report an event. Nobody listening is not an error.
    pub fn send(&self, event: Event) {
        let _ = self.inner.send(event);
    }
}

/// Listening end, usually drained on a progress thread.
pub struct EventReceiver {
    inner: Receiver<Event>,
}

impl EventReceiver {
    /// Blocks until every sender is dropped
    pub fn iter(&self) -> impl Iterator<Item = Event> + '_ {
        self.inner.iter()
    }

    /// Everything queued so far, without waiting
    pub fn drain(&self) -> Vec<Event> {
        self.inner.try_iter().collect()
    }
}

pub struct EventChannel;

impl EventChannel {
    /// Unbounded, so a slow progress bar never stalls a copy.
    pub fn new() -> (EventSender, EventReceiver) {
        let (sender, receiver) = unbounded();
        (
            EventSender { inner: sender },
            EventReceiver { inner: receiver },
        )
    }
}

/// Sender whose receiver is already gone, for runs nobody watches.
pub fn null_sender() -> EventSender {
    let (sender, _receiver) = EventChannel::new();
    sender
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{CopyEvent, PipelineEvent, PipelinePhase};
    use std::thread;

    #[test]
    fn iter_ends_when_the_pipeline_side_is_dropped() {
        let (sender, receiver) = EventChannel::new();

        let handle = thread::spawn(move || {
            sender.send(Event::Copy(CopyEvent::Started { total_files: 3 }));
            sender.send(Event::Copy(CopyEvent::Completed { total_copied: 3 }));
        });
        handle.join().unwrap();

        let events: Vec<Event> = receiver.iter().collect();
        assert_eq!(events.len(), 2);
        assert!(matches!(
            events[0],
            Event::Copy(CopyEvent::Started { total_files: 3 })
        ));
    }

    #[test]
    fn null_sender_does_not_panic() {
        let sender = null_sender();
        sender.send(Event::Pipeline(PipelineEvent::Started));
    }

    #[test]
    fn drain_returns_queued_events_in_order() {
        let (sender, receiver) = EventChannel::new();
        sender.send(Event::Pipeline(PipelineEvent::Started));
        sender.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Verifying,
        }));

        let events = receiver.drain();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], Event::Pipeline(PipelineEvent::Started)));
        assert!(receiver.drain().is_empty());
    }
}
