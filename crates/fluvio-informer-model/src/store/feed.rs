use std::sync::Arc;

use async_channel::{Receiver, Sender, TryRecvError, unbounded};
use futures_util::Stream;

use crate::object::ResourceObject;

/// Change delivered to subscribers of a store
#[derive(Debug, Clone)]
pub enum Notification {
    Added(Arc<ResourceObject>),
    /// resync is reported as an update where old and new are the same object
    Updated {
        old: Arc<ResourceObject>,
        new: Arc<ResourceObject>,
    },
    Deleted(Arc<ResourceObject>),
}

impl Notification {
    /// latest known state of the object
    pub fn object(&self) -> &Arc<ResourceObject> {
        match self {
            Self::Added(obj) | Self::Deleted(obj) => obj,
            Self::Updated { new, .. } => new,
        }
    }

    pub fn is_resync(&self) -> bool {
        matches!(self, Self::Updated { old, new } if Arc::ptr_eq(old, new))
    }
}

/// Receiving end of a store subscription.
/// Dropping the feed unsubscribes it on the next publish.
#[derive(Debug)]
pub struct EventFeed {
    receiver: Receiver<Notification>,
}

impl EventFeed {
    pub(crate) fn channel() -> (Sender<Notification>, Self) {
        let (sender, receiver) = unbounded();
        (sender, Self { receiver })
    }

    /// wait for next change, None if the store is gone
    pub async fn next(&mut self) -> Option<Notification> {
        self.receiver.recv().await.ok()
    }

    /// next change if one is already queued
    pub fn try_next(&mut self) -> Option<Notification> {
        match self.receiver.try_recv() {
            Ok(notification) => Some(notification),
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => None,
        }
    }

    /// number of queued changes
    pub fn pending(&self) -> usize {
        self.receiver.len()
    }

    pub fn into_stream(self) -> impl Stream<Item = Notification> {
        self.receiver
    }
}
