use crate::models::VideoRecord;
use crate::naming::Clock;
use std::sync::{Arc, Mutex};
use tokio::sync::RwLock;

/// Process-lifetime, append-only list of uploaded videos. Records are
/// immutable once appended and iteration order is insertion order. Nothing
/// survives a restart; files on disk become orphans.
#[derive(Clone, Default)]
pub struct Catalog {
    records: Arc<RwLock<Vec<VideoRecord>>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn append(&self, record: VideoRecord) {
        self.records.write().await.push(record);
    }

    /// Snapshot of all records in insertion order.
    pub async fn list_all(&self) -> Vec<VideoRecord> {
        self.records.read().await.clone()
    }

    pub async fn find_by_id(&self, id: &str) -> Option<VideoRecord> {
        self.records.read().await.iter().find(|r| r.id == id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }
}

/// Mints catalog ids from the clock's millisecond reading. Two uploads
/// landing in the same millisecond would otherwise share an id, so the
/// sequence bumps past the last value it handed out.
pub struct IdSequence {
    clock: Arc<dyn Clock>,
    last: Mutex<u64>,
}

impl IdSequence {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            last: Mutex::new(0),
        }
    }

    pub fn next(&self) -> String {
        let mut last = self.last.lock().unwrap();
        let now = self.clock.now_millis();
        let id = if now > *last { now } else { *last + 1 };
        *last = id;
        id.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn record(id: &str, title: &str) -> VideoRecord {
        VideoRecord {
            id: id.to_string(),
            title: title.to_string(),
            stored_filename: format!("{}-1-1.mp4", title),
            relative_path: format!("/uploads/{}-1-1.mp4", title),
            size_bytes: 10,
            uploaded_at: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    #[tokio::test]
    async fn listing_preserves_insertion_order() {
        let catalog = Catalog::new();
        catalog.append(record("1", "first")).await;
        catalog.append(record("2", "second")).await;
        catalog.append(record("3", "third")).await;

        let all = catalog.list_all().await;
        let titles: Vec<&str> = all.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn find_by_id_matches_exactly() {
        let catalog = Catalog::new();
        catalog.append(record("1700000000123", "clip")).await;

        assert_eq!(
            catalog.find_by_id("1700000000123").await.unwrap().title,
            "clip"
        );
        assert!(catalog.find_by_id("999").await.is_none());
    }

    #[tokio::test]
    async fn listing_is_a_snapshot_not_a_live_view() {
        let catalog = Catalog::new();
        catalog.append(record("1", "first")).await;

        let snapshot = catalog.list_all().await;
        catalog.append(record("2", "second")).await;

        assert_eq!(snapshot.len(), 1);
        assert_eq!(catalog.len().await, 2);
    }

    struct FrozenClock(u64);

    impl Clock for FrozenClock {
        fn now_millis(&self) -> u64 {
            self.0
        }
    }

    #[test]
    fn ids_stay_unique_when_the_clock_does_not_advance() {
        let ids = IdSequence::new(Arc::new(FrozenClock(1700000000123)));
        assert_eq!(ids.next(), "1700000000123");
        assert_eq!(ids.next(), "1700000000124");
        assert_eq!(ids.next(), "1700000000125");
    }

    #[test]
    fn ids_follow_an_advancing_clock() {
        let ids = IdSequence::new(Arc::new(FrozenClock(500)));
        assert_eq!(ids.next(), "500");

        let later = IdSequence::new(Arc::new(FrozenClock(900)));
        assert_eq!(later.next(), "900");
    }
}
