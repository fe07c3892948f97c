use std::sync::mpsc::{self, Receiver, Sender};

/// Fan-out of state change events to any number of channel subscribers.
///
/// Each subscriber owns the receiving end of its own channel. Subscribers
/// that dropped their receiver are pruned on the next publish.
#[derive(Debug)]
pub struct Subscribers<E> {
    senders: Vec<Sender<E>>,
}

impl<E> Default for Subscribers<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Subscribers<E> {
    pub fn new() -> Self {
        Self { senders: Vec::new() }
    }

    /// Register a new subscriber and return its event receiver
    pub fn subscribe(&mut self) -> Receiver<E> {
        let (sender, receiver) = mpsc::channel();
        self.senders.push(sender);
        receiver
    }

    pub fn len(&self) -> usize {
        self.senders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.senders.is_empty()
    }
}

impl<E: Clone> Subscribers<E> {
    /// Send an event to every live subscriber
    pub fn publish(&mut self, event: E) {
        self.senders.retain(|sender| sender.send(event.clone()).is_ok());
    }
}
