use crate::failure::Notice;

use super::{MessageCatalog, NotificationEmitter};

/// Resolves a notice to its localized text and broadcasts it.
///
/// This is the one sink every detector and classifier reports through.
#[derive(Debug, Default)]
pub struct Notifier {
    emitter: NotificationEmitter,
    catalog: MessageCatalog,
}

impl Notifier {
    /// Creates a notifier with no listeners.
    pub fn new(catalog: MessageCatalog) -> Self {
        Self {
            emitter: NotificationEmitter::new(),
            catalog,
        }
    }

    /// Broadcasts the localized message for `notice`.
    pub fn notify(&mut self, notice: Notice) -> usize {
        let message = self.catalog.message(notice).to_string();
        self.emitter.emit(message)
    }

    /// Returns the emitter, for subscribing.
    pub fn emitter_mut(&mut self) -> &mut NotificationEmitter {
        &mut self.emitter
    }

    /// Returns the message catalog.
    pub fn catalog(&self) -> &MessageCatalog {
        &self.catalog
    }
}
