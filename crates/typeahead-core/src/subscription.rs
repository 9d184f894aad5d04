use futures::stream::BoxStream;
use futures::StreamExt;
use std::any::TypeId;
use std::collections::HashMap;
use tokio::sync::mpsc;
use tokio::task::AbortHandle;

/// A long-lived event source managed by the runtime.
///
/// Subscriptions are declared in [`Model::subscriptions`](crate::Model::subscriptions)
/// and reconciled after every update: new ids are started, missing ids are
/// aborted, unchanged ids keep running untouched.
pub struct Subscription<Msg: Send + 'static> {
    pub(crate) id: SubscriptionId,
    pub(crate) spawn: Box<dyn FnOnce(mpsc::UnboundedSender<Msg>) -> AbortHandle + Send>,
}

/// Identity for diffing subscriptions between update cycles.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId {
    type_id: TypeId,
}

impl SubscriptionId {
    /// The id of the single subscription of kind `T`.
    pub fn of<T: 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
        }
    }
}

pub(crate) async fn forward<Msg: Send + 'static>(
    mut stream: BoxStream<'static, Msg>,
    tx: mpsc::UnboundedSender<Msg>,
) {
    while let Some(msg) = stream.next().await {
        if tx.send(msg).is_err() {
            break;
        }
    }
}

/// Manages active subscriptions, performing diffing between cycles.
pub(crate) struct SubscriptionManager<Msg: Send + 'static> {
    active: HashMap<SubscriptionId, AbortHandle>,
    msg_tx: mpsc::UnboundedSender<Msg>,
}

impl<Msg: Send + 'static> SubscriptionManager<Msg> {
    pub fn new(msg_tx: mpsc::UnboundedSender<Msg>) -> Self {
        Self {
            active: HashMap::new(),
            msg_tx,
        }
    }

    /// Start new subscriptions, stop removed ones, keep unchanged ones.
    pub fn reconcile(&mut self, subs: Vec<Subscription<Msg>>) {
        let mut incoming: HashMap<SubscriptionId, Subscription<Msg>> =
            subs.into_iter().map(|sub| (sub.id.clone(), sub)).collect();

        self.active.retain(|id, handle| {
            let keep = incoming.contains_key(id);
            if !keep {
                tracing::trace!(?id, "subscription stopped");
                handle.abort();
            }
            keep
        });

        for (id, sub) in incoming.drain() {
            if !self.active.contains_key(&id) {
                tracing::trace!(?id, "subscription started");
                let handle = (sub.spawn)(self.msg_tx.clone());
                self.active.insert(id, handle);
            }
        }
    }

    /// Abort all active subscriptions.
    pub fn shutdown(&mut self) {
        for (_, handle) in self.active.drain() {
            handle.abort();
        }
    }

    #[cfg(test)]
    pub fn active_count(&self) -> usize {
        self.active.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Runs `stream` until aborted.
    fn sub<K: 'static>(stream: BoxStream<'static, i32>) -> Subscription<i32> {
        Subscription {
            id: SubscriptionId::of::<K>(),
            spawn: Box::new(move |tx| tokio::spawn(forward(stream, tx)).abort_handle()),
        }
    }

    #[tokio::test]
    async fn reconcile_starts_keeps_and_stops() {
        let (tx, _rx) = mpsc::unbounded_channel::<i32>();
        let mut manager = SubscriptionManager::new(tx);

        manager.reconcile(vec![sub::<String>(futures::stream::pending().boxed())]);
        assert_eq!(manager.active_count(), 1);

        manager.reconcile(vec![
            sub::<String>(futures::stream::pending().boxed()),
            sub::<u8>(futures::stream::pending().boxed()),
        ]);
        assert_eq!(manager.active_count(), 2);

        manager.reconcile(vec![]);
        assert_eq!(manager.active_count(), 0);
    }

    #[tokio::test]
    async fn kept_subscription_is_not_restarted() {
        let (tx, mut rx) = mpsc::unbounded_channel::<i32>();
        let mut manager = SubscriptionManager::new(tx);
        manager.reconcile(vec![sub::<String>(futures::stream::iter(vec![1]).boxed())]);
        assert_eq!(rx.recv().await, Some(1));

        // Same id again: the second stream never runs.
        manager.reconcile(vec![sub::<String>(futures::stream::iter(vec![2]).boxed())]);
        tokio::task::yield_now().await;
        manager.shutdown();
        assert!(rx.try_recv().is_err());
    }
}
