use std::io;
use std::path::Path;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::model::Event;
use crate::wal::Wal;

/// Durable event store injected into the engine.
///
/// `commit` is all-or-nothing for a single event: if it returns an error the
/// event must not reappear on a later `replay`. Since one `MeetingBooked`
/// event carries the meeting and all its attendance rows, this is the atomic
/// multi-row commit the scheduler relies on.
#[async_trait]
pub trait Store: Send + Sync {
    /// Event history at open, in commit order.
    async fn replay(&self) -> io::Result<Vec<Event>>;

    /// Durably append one event.
    async fn commit(&self, event: &Event) -> io::Result<()>;
}

/// WAL-backed store. Opened at process start by the driver, closed on drop.
pub struct WalStore {
    wal: Mutex<Wal>,
}

impl WalStore {
    pub fn open(path: &Path) -> io::Result<Self> {
        Ok(Self {
            wal: Mutex::new(Wal::open(path)?),
        })
    }
}

#[async_trait]
impl Store for WalStore {
    async fn replay(&self) -> io::Result<Vec<Event>> {
        let wal = self.wal.lock().await;
        Wal::replay(wal.path())
    }

    async fn commit(&self, event: &Event) -> io::Result<()> {
        self.wal.lock().await.append(event)
    }
}

/// In-memory store for tests and ephemeral runs. Same contract, no disk.
#[derive(Default)]
pub struct MemStore {
    events: Mutex<Vec<Event>>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemStore {
    async fn replay(&self) -> io::Result<Vec<Event>> {
        Ok(self.events.lock().await.clone())
    }

    async fn commit(&self, event: &Event) -> io::Result<()> {
        self.events.lock().await.push(event.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Window;

    #[tokio::test]
    async fn mem_store_replays_commits_in_order() {
        let store = MemStore::new();
        let a = Event::RoomAdded { id: 1, name: "A".into() };
        let b = Event::MeetingBooked {
            id: 1,
            name: "m".into(),
            window: Window::new(0, 10),
            room_id: 1,
            attendees: vec![],
        };
        store.commit(&a).await.unwrap();
        store.commit(&b).await.unwrap();
        assert_eq!(store.replay().await.unwrap(), vec![a, b]);
    }

    #[tokio::test]
    async fn wal_store_survives_reopen() {
        let dir = std::env::temp_dir().join("quorum_test_store");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("reopen.wal");
        let _ = std::fs::remove_file(&path);

        let event = Event::PersonAdded { id: 3, name: "Grace".into() };
        {
            let store = WalStore::open(&path).unwrap();
            store.commit(&event).await.unwrap();
        }
        let store = WalStore::open(&path).unwrap();
        assert_eq!(store.replay().await.unwrap(), vec![event]);

        let _ = std::fs::remove_file(&path);
    }
}
