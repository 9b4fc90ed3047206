use std::sync::Arc;

use tokio::sync::watch;

use crate::state::live_match::MatchSnapshot;

/// Value held by the store: `None` until the first accepted push.
pub type CurrentSnapshot = Option<Arc<MatchSnapshot>>;

/// Holds the single canonical snapshot of the tracked match.
///
/// Every replace swaps in a fully built, immutable [`MatchSnapshot`], so a reader always
/// observes one complete push. Subscribers are notified after each swap.
pub struct SnapshotStore {
    current: watch::Sender<CurrentSnapshot>,
}

impl SnapshotStore {
    /// Create an empty store.
    pub fn new() -> Self {
        let (current, _rx) = watch::channel(None);
        Self { current }
    }

    /// Install `snapshot` as the current value and return the one it replaced.
    pub fn replace(&self, snapshot: MatchSnapshot) -> CurrentSnapshot {
        self.current.send_replace(Some(Arc::new(snapshot)))
    }

    /// Current snapshot, or `None` when nothing has been ingested yet.
    pub fn read(&self) -> CurrentSnapshot {
        self.current.borrow().clone()
    }

    /// Receive a notification after every replace.
    pub fn subscribe(&self) -> watch::Receiver<CurrentSnapshot> {
        self.current.subscribe()
    }
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, SystemTime};

    use super::*;
    use crate::state::live_match::{PlayerState, Reported};

    fn snapshot(arena: &str, aliases: &[&str], last_updated: SystemTime) -> MatchSnapshot {
        MatchSnapshot {
            arena_name: Reported::Known(arena.into()),
            players: aliases
                .iter()
                .map(|alias| PlayerState {
                    alias: (*alias).into(),
                    ..PlayerState::default()
                })
                .collect(),
            ..MatchSnapshot::empty(last_updated)
        }
    }

    #[test]
    fn read_before_any_replace_is_none() {
        let store = SnapshotStore::new();
        assert!(store.read().is_none());
    }

    #[test]
    fn replace_discards_previous_roster() {
        let store = SnapshotStore::new();
        let now = SystemTime::now();
        store.replace(snapshot("Twin Peaks", &["p1", "p2"], now));
        let previous = store.replace(snapshot("Twin Peaks", &["p3"], now));

        assert_eq!(previous.map(|snap| snap.players.len()), Some(2));
        let current = store.read().expect("snapshot stored");
        let aliases: Vec<&str> = current.players.iter().map(|p| p.alias.as_str()).collect();
        assert_eq!(aliases, vec!["p3"]);
    }

    #[test]
    fn independent_stores_do_not_share_state() {
        let first = SnapshotStore::new();
        let second = SnapshotStore::new();
        first.replace(snapshot("A", &["a"], SystemTime::now()));
        assert!(second.read().is_none());
    }

    #[tokio::test]
    async fn subscribers_are_notified_on_replace() {
        let store = SnapshotStore::new();
        let mut rx = store.subscribe();
        store.replace(snapshot("A", &["a"], SystemTime::now()));
        rx.changed().await.expect("sender alive");
        assert!(rx.borrow_and_update().is_some());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_reads_never_observe_a_mixed_snapshot() {
        let store = Arc::new(SnapshotStore::new());
        let epoch = SystemTime::UNIX_EPOCH;
        let a_time = epoch + Duration::from_secs(1_000);
        let b_time = epoch + Duration::from_secs(2_000);
        let a_players: Vec<String> = (0..64).map(|i| format!("a{i}")).collect();
        let b_players: Vec<String> = (0..3).map(|i| format!("b{i}")).collect();

        let build = |arena: &str, players: &[String], at: SystemTime| {
            let aliases: Vec<&str> = players.iter().map(String::as_str).collect();
            snapshot(arena, &aliases, at)
        };
        let a = build("A", &a_players, a_time);
        let b = build("B", &b_players, b_time);

        let mut readers = Vec::new();
        for _ in 0..4 {
            let store = Arc::clone(&store);
            readers.push(tokio::spawn(async move {
                for _ in 0..2_000 {
                    if let Some(snap) = store.read() {
                        let arena = snap.arena_name.as_deref().unwrap_or_default();
                        let prefix = arena.to_lowercase();
                        let expected_time = if arena == "A" { a_time } else { b_time };
                        assert_eq!(snap.last_updated, expected_time);
                        assert!(snap.players.iter().all(|p| p.alias.starts_with(&prefix)));
                    }
                    tokio::task::yield_now().await;
                }
            }));
        }

        let writer = {
            let store = Arc::clone(&store);
            tokio::spawn(async move {
                for i in 0..500 {
                    let next = if i % 2 == 0 { a.clone() } else { b.clone() };
                    store.replace(next);
                    tokio::task::yield_now().await;
                }
            })
        };

        writer.await.expect("writer task");
        for reader in readers {
            reader.await.expect("reader task");
        }
    }
}
