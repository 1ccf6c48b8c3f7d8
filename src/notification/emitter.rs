//! Broadcast of notifications to subscribed listeners.

use std::fmt;

use tokio::sync::mpsc;
use tracing::debug;

use super::Notification;

/// Handle returned by a subscription, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// A notification consumer.
pub enum Listener {
    /// Invoked synchronously for every notification.
    Callback(Box<dyn FnMut(&Notification)>),
    /// Receives a clone of every notification; dropped once the receiver closes.
    Channel(mpsc::UnboundedSender<Notification>),
}

impl Listener {
    /// Delivers a notification. Returns false if the listener is gone.
    fn deliver(&mut self, notification: &Notification) -> bool {
        match self {
            Listener::Callback(callback) => {
                callback(notification);
                true
            }
            Listener::Channel(sender) => sender.send(notification.clone()).is_ok(),
        }
    }
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Listener::Callback(_) => f.write_str("Listener::Callback"),
            Listener::Channel(_) => f.write_str("Listener::Channel"),
        }
    }
}

/// Broadcasts each notification once to every current listener.
///
/// There is no queueing or deduplication: a burst of failures yields the same
/// burst of notifications, delivered in emit order and, within one emit, in
/// subscription order.
#[derive(Debug, Default)]
pub struct NotificationEmitter {
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: u64,
}

impl NotificationEmitter {
    /// Creates an emitter with no listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a callback listener.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&Notification) + 'static,
    {
        self.add(Listener::Callback(Box::new(callback)))
    }

    /// Adds a channel listener and returns its receiving end.
    pub fn subscribe_channel(&mut self) -> (SubscriptionId, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (self.add(Listener::Channel(tx)), rx)
    }

    /// Adds an arbitrary listener.
    pub fn add(&mut self, listener: Listener) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, listener));
        id
    }

    /// Removes a listener. Returns false if it was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    /// Returns the number of subscribed listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Broadcasts one notification carrying `message`.
    ///
    /// Always succeeds; returns how many listeners received it (possibly zero).
    pub fn emit(&mut self, message: impl Into<String>) -> usize {
        let notification = Notification::new(message);
        let before = self.listeners.len();
        self.listeners
            .retain_mut(|(_, listener)| listener.deliver(&notification));
        let delivered = self.listeners.len();

        debug!(
            event = notification.event_name(),
            delivered,
            pruned = before - delivered,
            "notification broadcast"
        );
        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_emit_without_listeners() {
        let mut emitter = NotificationEmitter::new();
        assert_eq!(emitter.emit("nobody listens"), 0);
    }

    #[test]
    fn test_emit_reaches_every_listener_once() {
        let mut emitter = NotificationEmitter::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        for tag in ["a", "b"] {
            let seen = Rc::clone(&seen);
            emitter.subscribe(move |n| seen.borrow_mut().push(format!("{}:{}", tag, n.message)));
        }

        assert_eq!(emitter.emit("boom"), 2);
        assert_eq!(*seen.borrow(), vec!["a:boom", "b:boom"]);
    }

    #[test]
    fn test_burst_is_not_deduplicated() {
        let mut emitter = NotificationEmitter::new();
        let (_, mut rx) = emitter.subscribe_channel();

        emitter.emit("same");
        emitter.emit("same");
        emitter.emit("other");

        assert_eq!(rx.try_recv().unwrap().message, "same");
        assert_eq!(rx.try_recv().unwrap().message, "same");
        assert_eq!(rx.try_recv().unwrap().message, "other");
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_unsubscribe() {
        let mut emitter = NotificationEmitter::new();
        let count = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&count);
        let id = emitter.subscribe(move |_| *counter.borrow_mut() += 1);

        emitter.emit("one");
        assert!(emitter.unsubscribe(id));
        assert!(!emitter.unsubscribe(id));
        emitter.emit("two");

        assert_eq!(*count.borrow(), 1);
        assert_eq!(emitter.listener_count(), 0);
    }

    #[test]
    fn test_closed_channel_is_pruned() {
        let mut emitter = NotificationEmitter::new();
        let (_, rx) = emitter.subscribe_channel();
        emitter.subscribe(|_| {});
        drop(rx);

        assert_eq!(emitter.emit("after close"), 1);
        assert_eq!(emitter.listener_count(), 1);
    }
}
