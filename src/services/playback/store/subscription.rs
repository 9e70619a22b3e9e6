use std::{
    pin::Pin,
    sync::Weak,
    task::{Context, Poll},
};

use futures::Stream;
use tokio::sync::mpsc::{UnboundedReceiver, error::TryRecvError};

use super::{IntentChange, intent_store::StoreInner};

/// A subscription handle that unsubscribes when dropped.
///
/// Holds only a weak reference to the store, so an outstanding
/// subscription never keeps the store alive. Also a `Stream` of changes.
pub struct Subscription {
    id: usize,
    store: Weak<StoreInner>,
    receiver: UnboundedReceiver<IntentChange>,
    active: bool,
}

impl Subscription {
    pub(super) fn new(
        id: usize,
        store: Weak<StoreInner>,
        receiver: UnboundedReceiver<IntentChange>,
    ) -> Self {
        Self {
            id,
            store,
            receiver,
            active: true,
        }
    }

    /// Wait for the next change.
    ///
    /// Returns `None` once unsubscribed (after draining queued changes)
    /// or when the store is gone.
    pub async fn recv(&mut self) -> Option<IntentChange> {
        self.receiver.recv().await
    }

    /// Take the next queued change without waiting.
    pub fn try_recv(&mut self) -> Option<IntentChange> {
        match self.receiver.try_recv() {
            Ok(change) => Some(change),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Drain every queued change.
    pub fn drain(&mut self) -> Vec<IntentChange> {
        std::iter::from_fn(|| self.try_recv()).collect()
    }

    /// Whether this handle is still registered with the store.
    pub fn is_active(&self) -> bool {
        self.active && self.store.strong_count() > 0
    }

    /// Stop receiving changes. Safe to call any number of times.
    pub fn unsubscribe(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;

        if let Some(store) = self.store.upgrade() {
            store.remove_subscriber(self.id);
        }
        self.receiver.close();
    }
}

impl Stream for Subscription {
    type Item = IntentChange;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().receiver.poll_recv(cx)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}
