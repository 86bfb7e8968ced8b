use std::collections::VecDeque;
use std::sync::Mutex;

use chrono::Utc;
use serde::Serialize;

pub const DEFAULT_EVENT_CAPACITY: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EventKind {
    Fetched,
    Created,
    Scheduled,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EventResource {
    Pod,
    Node,
}

impl EventResource {
    pub fn plural(&self) -> &'static str {
        match self {
            Self::Pod => "Pods",
            Self::Node => "Nodes",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Success,
    Error,
    Pending,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub resource: EventResource,
    pub name: String,
    pub time: String,
    pub status: EventStatus,
}

impl Event {
    pub fn fetch_success(resource: EventResource) -> Self {
        Self::fetched(resource, EventStatus::Success, "fetch success")
    }

    pub fn fetch_failure(resource: EventResource) -> Self {
        Self::fetched(resource, EventStatus::Error, "fetch failed")
    }

    fn fetched(resource: EventResource, status: EventStatus, what: &str) -> Self {
        Self {
            kind: EventKind::Fetched,
            resource,
            name: format!("{} {}", resource.plural(), what),
            time: Utc::now().format("%H:%M:%S").to_string(),
            status,
        }
    }
}

/// Bounded activity log, most-recent-first. Repeats of the latest entry for
/// a resource are dropped so a poller failing every tick produces one entry,
/// not one per tick.
pub struct EventLog {
    entries: Mutex<VecDeque<Event>>,
    capacity: usize,
}

impl EventLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(VecDeque::new()),
            capacity,
        }
    }

    /// No-op when the most recent entry for the same resource matches on
    /// kind, status, and name; otherwise prepends, truncating the oldest
    /// entries past capacity.
    pub fn append(&self, event: Event) {
        let mut entries = self.entries.lock().unwrap();

        if let Some(latest) = entries.iter().find(|e| e.resource == event.resource) {
            if latest.kind == event.kind
                && latest.status == event.status
                && latest.name == event.name
            {
                return;
            }
        }

        entries.push_front(event);
        entries.truncate(self.capacity);
    }

    pub fn snapshot(&self) -> Vec<Event> {
        self.entries.lock().unwrap().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}
