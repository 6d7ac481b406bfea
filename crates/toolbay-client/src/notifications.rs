//! Notification feed: grouping and bulk acknowledgement.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use toolbay_gateway::Gateway;
use toolbay_shared::types::NotificationEvent;

use crate::error::Result;

/// Event type whose reference is a conversation id.
pub const KIND_CONVERSATION: &str = "CONVERSATION";

/// A display row folding a run of equal events.
///
/// Derived client-side, never persisted. A group is a maximal run of
/// consecutive events (in the descending-by-`createdAt` sorted feed)
/// sharing `(message, reference, acknowledged)`. Changing the sort order
/// changes the group boundaries.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationGroup {
    pub message: String,
    pub reference: String,
    pub acknowledged: bool,
    pub kind: String,
    /// Most recent timestamp among the members.
    pub created_at: DateTime<Utc>,
    pub count: usize,
    /// Ids of every member, in run order. Acknowledging the group means
    /// acknowledging all of them.
    pub all_ids: Vec<i64>,
}

impl NotificationGroup {
    fn seed(event: &NotificationEvent) -> Self {
        Self {
            message: event.message.clone(),
            reference: event.reference.clone(),
            acknowledged: event.acknowledged,
            kind: event.kind.clone(),
            created_at: event.created_at,
            count: 1,
            all_ids: vec![event.id],
        }
    }

    fn absorbs(&self, event: &NotificationEvent) -> bool {
        self.message == event.message
            && self.reference == event.reference
            && self.acknowledged == event.acknowledged
    }

    /// The conversation id this group links to, when it is a
    /// conversation event with a numeric reference.
    pub fn conversation_reference(&self) -> Option<i64> {
        if self.kind != KIND_CONVERSATION {
            return None;
        }
        self.reference.trim().parse().ok()
    }
}

/// Fold events into display groups.
///
/// Pure and deterministic. The fold only merges neighbours, so the input
/// order decides everything; callers sort before grouping.
pub fn group_events(events: &[NotificationEvent]) -> Vec<NotificationGroup> {
    let mut groups: Vec<NotificationGroup> = Vec::new();

    for event in events {
        match groups.last_mut() {
            Some(last) if last.absorbs(event) => {
                last.count += 1;
                last.all_ids.push(event.id);
                if event.created_at > last.created_at {
                    last.created_at = event.created_at;
                }
            }
            _ => groups.push(NotificationGroup::seed(event)),
        }
    }

    groups
}

/// Loads the notification feed and folds it into groups.
#[derive(Clone)]
pub struct NotificationGroupingModel {
    gateway: Arc<dyn Gateway>,
    groups: Arc<RwLock<Vec<NotificationGroup>>>,
}

impl NotificationGroupingModel {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self {
            gateway,
            groups: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Fetch all events, sort newest first and fold into groups. A failed
    /// fetch logs and leaves an empty feed.
    pub async fn load(&self) -> Vec<NotificationGroup> {
        self.refresh(None).await
    }

    /// Same as [`load`](Self::load) but narrowed to one acknowledgement
    /// state.
    pub async fn load_filtered(&self, acknowledged: bool) -> Vec<NotificationGroup> {
        self.refresh(Some(acknowledged)).await
    }

    async fn refresh(&self, acknowledged: Option<bool>) -> Vec<NotificationGroup> {
        let mut events = match self.gateway.fetch_notifications(acknowledged).await {
            Ok(list) => list,
            Err(error) => {
                warn!(%error, "Failed to load notifications");
                Vec::new()
            }
        };

        // Stable sort: events with equal timestamps keep their fetch
        // order, so the grouping below stays deterministic.
        events.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let groups = group_events(&events);

        let mut held = self.groups.write().await;
        *held = groups.clone();
        groups
    }

    /// Snapshot of the held groups.
    pub async fn groups(&self) -> Vec<NotificationGroup> {
        self.groups.read().await.clone()
    }

    /// Acknowledge every event in a group.
    ///
    /// Already-acknowledged groups are a no-op, so following the
    /// notification's link never re-issues calls. The per-id calls run
    /// concurrently and independently: if one of N fails the others still
    /// commit, and the first error is reported after all have settled.
    /// Callers re-run [`load`](Self::load) afterwards so the feed shows
    /// whatever partial state actually persisted.
    pub async fn acknowledge_group(&self, group: &NotificationGroup) -> Result<()> {
        if group.acknowledged {
            return Ok(());
        }

        let results = join_all(
            group
                .all_ids
                .iter()
                .map(|id| self.gateway.acknowledge_notification(*id)),
        )
        .await;

        let failures = results.iter().filter(|r| r.is_err()).count();
        if failures > 0 {
            warn!(
                failures,
                total = group.all_ids.len(),
                "Bulk acknowledge partially failed"
            );
        } else {
            debug!(count = group.all_ids.len(), "Notification group acknowledged");
        }

        match results.into_iter().find(|r| r.is_err()) {
            Some(Err(error)) => Err(error.into()),
            _ => Ok(()),
        }
    }
}
