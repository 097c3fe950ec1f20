//! Live "new contact" feed for staff.
//!
//! [`Groups`] is a registry of open connections keyed by group name. Each
//! member owns a bounded queue; publishing never waits on a member, so a
//! slow or vanished socket only loses its own copy of a message.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::mpsc;
use tracing::{debug, info};
use uuid::Uuid;

use enquire_shared::constants::ADMIN_GROUP;
use enquire_shared::protocol::{InquiryCounts, NotificationPayload, ServerMessage};
use enquire_store::Inquiry;

use crate::auth::Actor;

type Members = HashMap<Uuid, mpsc::Sender<ServerMessage>>;

#[derive(Clone)]
pub struct Groups {
    inner: Arc<Mutex<HashMap<String, Members>>>,
    buffer: usize,
}

impl Groups {
    pub fn new(buffer: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
            buffer: buffer.max(1),
        }
    }

    // A panic while holding the lock cannot leave the map half-updated,
    // so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, Members>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a new connection. Membership ends when the returned
    /// [`Subscription`] is dropped.
    pub fn join(&self, group: &str) -> Subscription {
        let (tx, rx) = mpsc::channel(self.buffer);
        let id = Uuid::new_v4();

        let mut groups = self.lock();
        let members = groups.entry(group.to_string()).or_default();
        members.insert(id, tx);

        info!(group, connection = %id, members = members.len(), "connection joined group");

        Subscription {
            id,
            group: group.to_string(),
            groups: self.clone(),
            rx,
        }
    }

    fn leave(&self, group: &str, id: &Uuid) {
        let mut groups = self.lock();
        let Some(members) = groups.get_mut(group) else {
            return;
        };
        members.remove(id);
        let remaining = members.len();
        if remaining == 0 {
            groups.remove(group);
        }

        info!(group, connection = %id, members = remaining, "connection left group");
    }

    /// Queue `message` for every member of `group`. Returns how many
    /// members accepted it.
    pub fn broadcast(&self, group: &str, message: &ServerMessage) -> usize {
        let groups = self.lock();
        let Some(members) = groups.get(group) else {
            return 0;
        };

        let mut delivered = 0;
        for (id, tx) in members {
            if tx.try_send(message.clone()).is_ok() {
                delivered += 1;
            } else {
                debug!(group, connection = %id, "dropping message for slow or closed connection");
            }
        }
        delivered
    }

    pub fn member_count(&self, group: &str) -> usize {
        self.lock().get(group).map_or(0, HashMap::len)
    }
}

/// A live group membership with its inbound queue.
pub struct Subscription {
    id: Uuid,
    group: String,
    groups: Groups,
    rx: mpsc::Receiver<ServerMessage>,
}

impl Subscription {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub async fn recv(&mut self) -> Option<ServerMessage> {
        self.rx.recv().await
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.groups.leave(&self.group, &self.id);
    }
}

/// Staff-facing fan-out over the admin group.
#[derive(Clone)]
pub struct NotificationHub {
    groups: Groups,
}

impl NotificationHub {
    pub fn new(buffer: usize) -> Self {
        Self {
            groups: Groups::new(buffer),
        }
    }

    /// Admit `actor` to the live feed. Non-privileged callers get nothing.
    pub fn subscribe(&self, actor: &Actor) -> Option<Subscription> {
        actor
            .is_privileged()
            .then(|| self.groups.join(ADMIN_GROUP))
    }

    /// Announce a freshly stored inquiry, followed by the refreshed counts.
    /// Returns the number of `new_contact` deliveries.
    pub fn publish_new_inquiry(&self, inquiry: &Inquiry, counts: InquiryCounts) -> usize {
        let payload = NotificationPayload::new(
            inquiry.id,
            &inquiry.name,
            &inquiry.email,
            &inquiry.subject,
            inquiry.category,
            inquiry.created_at,
            &inquiry.message,
            counts,
        );

        let delivered = self
            .groups
            .broadcast(ADMIN_GROUP, &ServerMessage::NewContact { data: payload });
        self.publish_counts(counts);

        debug!(inquiry_id = inquiry.id, delivered, "new contact published");
        delivered
    }

    pub fn publish_counts(&self, counts: InquiryCounts) -> usize {
        self.groups
            .broadcast(ADMIN_GROUP, &ServerMessage::CountUpdate { data: counts })
    }

    pub fn listeners(&self) -> usize {
        self.groups.member_count(ADMIN_GROUP)
    }
}
