//! QueueStore - the provider queues and every operation that mutates them.
//!
//! Concurrency patterns:
//! - `RwLock<BoardState>` so snapshots can be taken while no mutation runs
//! - `mpsc` channels to tell subscribers that the board changed

use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use queueboard_models::{
    Entry, EntryId, Priority, Provider, ProviderId, ProviderStatus, TransferRecord,
};
use tracing::{debug, info, trace};

use crate::change::BoardChange;
use crate::error::{QueueError, Result};
use crate::snapshot::BoardSnapshot;

/// Internal state of the board.
#[derive(Default)]
struct BoardState {
    /// Providers in registration order.
    providers: Vec<Provider>,
    /// Ordered queue per provider. Every provider has an entry here.
    queues: HashMap<ProviderId, Vec<Entry>>,
    /// Consultations started since the store was created.
    completed_today: u32,
}

impl BoardState {
    fn queue_mut(&mut self, provider_id: &ProviderId) -> Result<&mut Vec<Entry>> {
        self.queues
            .get_mut(provider_id)
            .ok_or_else(|| QueueError::ProviderNotFound(provider_id.clone()))
    }

    fn position(&self, entry_id: &EntryId, provider_id: &ProviderId) -> Result<usize> {
        let queue = self
            .queues
            .get(provider_id)
            .ok_or_else(|| QueueError::ProviderNotFound(provider_id.clone()))?;

        queue
            .iter()
            .position(|e| &e.id == entry_id)
            .ok_or_else(|| QueueError::EntryNotFound {
                entry_id: entry_id.clone(),
                provider_id: provider_id.clone(),
            })
    }

    fn contains(&self, entry_id: &EntryId) -> bool {
        self.queues
            .values()
            .any(|q| q.iter().any(|e| &e.id == entry_id))
    }

    /// Removes an entry from `from` and appends it to the tail of `to`.
    ///
    /// All checks happen before anything is removed.
    fn move_entry(
        &mut self,
        entry_id: &EntryId,
        from: &ProviderId,
        to: &ProviderId,
        priority: Option<Priority>,
    ) -> Result<Priority> {
        if from == to {
            return Err(QueueError::SameProvider(from.clone()));
        }
        if !self.queues.contains_key(to) {
            return Err(QueueError::ProviderNotFound(to.clone()));
        }

        let idx = self.position(entry_id, from)?;
        let mut entry = self.queue_mut(from)?.remove(idx);
        if let Some(priority) = priority {
            entry.priority = priority;
        }
        let priority = entry.priority;

        self.queues.entry(to.clone()).or_default().push(entry);

        Ok(priority)
    }
}

/// Shared store of provider queues.
///
/// The store is the only way to change the board: every operation checks
/// its preconditions first and returns an error without touching anything
/// when they do not hold. This keeps the invariant that an entry id is on
/// at most one queue, once.
///
/// Wrap it in an `Arc` to share it between the console and the aging task.
///
/// # Example
///
/// ```
/// use queueboard_models::{Entry, Provider};
/// use queueboard_queue::QueueStore;
///
/// let store = QueueStore::new();
/// store.add_provider(Provider::new("dr-a", "Dr. A", "General")).unwrap();
/// store.add_provider(Provider::new("dr-b", "Dr. B", "General")).unwrap();
///
/// let entry = Entry::builder("Ana", "Cleaning").id("p-1").build();
/// store.enqueue(&"dr-a".into(), entry).unwrap();
///
/// store
///     .transfer_direct(&"p-1".into(), &"dr-a".into(), &"dr-b".into())
///     .unwrap();
/// assert_eq!(store.queue(&"dr-b".into()).unwrap().len(), 1);
/// ```
#[derive(Default)]
pub struct QueueStore {
    /// Board state, protected by a read-write lock.
    state: RwLock<BoardState>,
    /// List of subscriber channels.
    subscribers: RwLock<Vec<Sender<BoardChange>>>,
}

impl QueueStore {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, BoardState>> {
        self.state
            .read()
            .map_err(|e| QueueError::LockPoisoned(e.to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, BoardState>> {
        self.state
            .write()
            .map_err(|e| QueueError::LockPoisoned(e.to_string()))
    }

    /// Subscribes to board changes.
    ///
    /// Returns a receiver that gets one `BoardChange` per applied mutation.
    /// Failed operations are not broadcast.
    pub fn subscribe(&self) -> Receiver<BoardChange> {
        let (tx, rx) = mpsc::channel();

        if let Ok(mut subs) = self.subscribers.write() {
            subs.push(tx);
        }

        rx
    }

    /// Broadcasts a change to all subscribers, dropping closed receivers.
    fn broadcast(&self, change: BoardChange) {
        if let Ok(mut subs) = self.subscribers.write() {
            subs.retain(|tx| tx.send(change.clone()).is_ok());
        }
    }

    /// Registers a provider with an empty queue.
    pub fn add_provider(&self, provider: Provider) -> Result<()> {
        let provider_id = provider.id.clone();
        {
            let mut state = self.write()?;
            if state.queues.contains_key(&provider_id) {
                return Err(QueueError::InvalidState(format!(
                    "provider already registered: {}",
                    provider_id
                )));
            }
            state.queues.insert(provider_id.clone(), Vec::new());
            state.providers.push(provider);
        }

        debug!(provider_id = %provider_id, "provider added");
        self.broadcast(BoardChange::ProviderAdded { provider_id });
        Ok(())
    }

    /// Changes a provider's availability.
    pub fn set_provider_status(
        &self,
        provider_id: &ProviderId,
        status: ProviderStatus,
    ) -> Result<()> {
        {
            let mut state = self.write()?;
            let provider = state
                .providers
                .iter_mut()
                .find(|p| &p.id == provider_id)
                .ok_or_else(|| QueueError::ProviderNotFound(provider_id.clone()))?;
            provider.status = status;
        }

        info!(provider_id = %provider_id, status = %status, "provider status changed");
        self.broadcast(BoardChange::ProviderStatusChanged {
            provider_id: provider_id.clone(),
            status,
        });
        Ok(())
    }

    /// Appends a registered entry to the tail of a provider's queue.
    ///
    /// Rejects ids that are already anywhere on the board.
    pub fn enqueue(&self, provider_id: &ProviderId, entry: Entry) -> Result<EntryId> {
        let entry_id = entry.id.clone();
        {
            let mut state = self.write()?;
            if state.contains(&entry_id) {
                return Err(QueueError::DuplicateEntry(entry_id));
            }
            state.queue_mut(provider_id)?.push(entry);
        }

        info!(entry_id = %entry_id, provider_id = %provider_id, "entry enqueued");
        self.broadcast(BoardChange::Enqueued {
            entry_id: entry_id.clone(),
            provider_id: provider_id.clone(),
        });
        Ok(entry_id)
    }

    /// Moves an entry to the tail of another provider's queue, unchanged.
    ///
    /// This is the drag-and-drop path; it skips the confirmation step.
    pub fn transfer_direct(
        &self,
        entry_id: &EntryId,
        from: &ProviderId,
        to: &ProviderId,
    ) -> Result<()> {
        let priority = self.write()?.move_entry(entry_id, from, to, None)?;

        info!(entry_id = %entry_id, from = %from, to = %to, "entry transferred");
        self.broadcast(BoardChange::Transferred {
            entry_id: entry_id.clone(),
            from: from.clone(),
            to: to.clone(),
            priority,
            reviewed: false,
        });
        Ok(())
    }

    /// Applies a reviewed transfer: moves the entry and sets its new priority.
    pub fn transfer_with_details(&self, record: &TransferRecord) -> Result<()> {
        let priority = self.write()?.move_entry(
            &record.entry_id,
            &record.from_provider_id,
            &record.to_provider_id,
            Some(record.priority),
        )?;

        info!(
            entry_id = %record.entry_id,
            from = %record.from_provider_id,
            to = %record.to_provider_id,
            priority = %priority,
            justification = %record.justification,
            "entry transferred after review"
        );
        self.broadcast(BoardChange::Transferred {
            entry_id: record.entry_id.clone(),
            from: record.from_provider_id.clone(),
            to: record.to_provider_id.clone(),
            priority,
            reviewed: true,
        });
        Ok(())
    }

    /// Advances an entry's priority one step; queue order is untouched.
    ///
    /// # Returns
    ///
    /// The new priority.
    pub fn cycle_priority(
        &self,
        entry_id: &EntryId,
        provider_id: &ProviderId,
    ) -> Result<Priority> {
        let priority = {
            let mut state = self.write()?;
            let idx = state.position(entry_id, provider_id)?;
            let entry = &mut state.queue_mut(provider_id)?[idx];
            entry.priority = entry.priority.cycle();
            entry.priority
        };

        debug!(entry_id = %entry_id, priority = %priority, "priority cycled");
        self.broadcast(BoardChange::PriorityCycled {
            entry_id: entry_id.clone(),
            provider_id: provider_id.clone(),
            priority,
        });
        Ok(priority)
    }

    /// Moves the entry at `from_index` to `to_index` within one queue.
    pub fn reorder(
        &self,
        provider_id: &ProviderId,
        from_index: usize,
        to_index: usize,
    ) -> Result<()> {
        {
            let mut state = self.write()?;
            let queue = state.queue_mut(provider_id)?;
            let len = queue.len();

            for index in [from_index, to_index] {
                if index >= len {
                    return Err(QueueError::IndexOutOfBounds {
                        provider_id: provider_id.clone(),
                        index,
                        len,
                    });
                }
            }

            let entry = queue.remove(from_index);
            queue.insert(to_index, entry);
        }

        debug!(provider_id = %provider_id, from_index, to_index, "queue reordered");
        self.broadcast(BoardChange::Reordered {
            provider_id: provider_id.clone(),
            from_index,
            to_index,
        });
        Ok(())
    }

    /// Adds one minute to every queued entry's wait time.
    pub fn tick(&self) -> Result<()> {
        self.tick_by(1)
    }

    /// Adds `minutes` to every queued entry's wait time in one step.
    ///
    /// Takes the write lock once and broadcasts a single change. Zero is a
    /// no-op.
    pub fn tick_by(&self, minutes: u32) -> Result<()> {
        if minutes == 0 {
            return Ok(());
        }

        let aged = {
            let mut state = self.write()?;
            let mut aged = 0usize;
            for entry in state.queues.values_mut().flat_map(|q| q.iter_mut()) {
                entry.wait_time_minutes = entry.wait_time_minutes.saturating_add(minutes);
                aged += 1;
            }
            aged
        };

        trace!(entries = aged, minutes, "wait times aged");
        self.broadcast(BoardChange::Ticked { minutes });
        Ok(())
    }

    /// Removes an entry because their consultation is starting.
    ///
    /// Counts toward `completed_today`.
    pub fn start_consultation(
        &self,
        entry_id: &EntryId,
        provider_id: &ProviderId,
    ) -> Result<Entry> {
        let entry = {
            let mut state = self.write()?;
            let idx = state.position(entry_id, provider_id)?;
            let entry = state.queue_mut(provider_id)?.remove(idx);
            state.completed_today = state.completed_today.saturating_add(1);
            entry
        };

        info!(entry_id = %entry_id, provider_id = %provider_id, "consultation started");
        self.broadcast(BoardChange::ConsultationStarted {
            entry_id: entry_id.clone(),
            provider_id: provider_id.clone(),
        });
        Ok(entry)
    }

    /// Returns a copy of the whole board.
    pub fn snapshot(&self) -> Result<BoardSnapshot> {
        let state = self.read()?;
        Ok(BoardSnapshot {
            providers: state.providers.clone(),
            queues: state.queues.clone(),
            completed_today: state.completed_today,
        })
    }

    /// Returns a copy of one provider's queue.
    pub fn queue(&self, provider_id: &ProviderId) -> Result<Vec<Entry>> {
        let state = self.read()?;
        state
            .queues
            .get(provider_id)
            .cloned()
            .ok_or_else(|| QueueError::ProviderNotFound(provider_id.clone()))
    }

    /// Finds an entry and the provider whose queue holds it.
    pub fn find(&self, entry_id: &EntryId) -> Result<Option<(ProviderId, Entry)>> {
        let state = self.read()?;
        Ok(state.providers.iter().find_map(|p| {
            state
                .queues
                .get(&p.id)?
                .iter()
                .find(|e| &e.id == entry_id)
                .map(|e| (p.id.clone(), e.clone()))
        }))
    }

    /// Returns the providers in registration order.
    pub fn providers(&self) -> Result<Vec<Provider>> {
        Ok(self.read()?.providers.clone())
    }

    /// Returns the number of queued entries across all providers.
    pub fn len(&self) -> usize {
        self.read()
            .map(|s| s.queues.values().map(Vec::len).sum())
            .unwrap_or(0)
    }

    /// Returns true if no entry is queued.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of consultations started.
    pub fn completed_today(&self) -> Result<u32> {
        Ok(self.read()?.completed_today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    fn pid(s: &str) -> ProviderId {
        ProviderId::from(s)
    }

    fn eid(s: &str) -> EntryId {
        EntryId::from(s)
    }

    fn make_entry(id: &str, wait: u32, priority: Priority) -> Entry {
        Entry::builder(format!("Patient {}", id), "Checkup")
            .id(id)
            .waited(wait)
            .priority(priority)
            .build()
    }

    /// Provider A holds [X(10, normal), Y(70, urgent)], provider B is empty.
    fn make_store() -> QueueStore {
        let store = QueueStore::new();
        store.add_provider(Provider::new("a", "Dr. A", "General")).unwrap();
        store.add_provider(Provider::new("b", "Dr. B", "General")).unwrap();
        store.enqueue(&pid("a"), make_entry("x", 10, Priority::Normal)).unwrap();
        store.enqueue(&pid("a"), make_entry("y", 70, Priority::Urgent)).unwrap();
        store
    }

    fn ids(store: &QueueStore, provider: &str) -> Vec<String> {
        store
            .queue(&pid(provider))
            .unwrap()
            .into_iter()
            .map(|e| e.id.to_string())
            .collect()
    }

    fn assert_unique_ids(store: &QueueStore) {
        let snapshot = store.snapshot().unwrap();
        let mut seen = HashSet::new();
        for entry in snapshot.entries() {
            assert!(seen.insert(entry.id.clone()), "duplicate id {}", entry.id);
        }
    }

    #[test]
    fn test_transfer_direct() {
        let store = make_store();

        store.transfer_direct(&eid("y"), &pid("a"), &pid("b")).unwrap();

        assert_eq!(ids(&store, "a"), vec!["x"]);
        assert_eq!(ids(&store, "b"), vec!["y"]);
        // Unchanged on the way over
        let (_, y) = store.find(&eid("y")).unwrap().unwrap();
        assert_eq!(y.priority, Priority::Urgent);
        assert_eq!(y.wait_time_minutes, 70);
        assert_unique_ids(&store);
    }

    #[test]
    fn test_transfer_appends_to_tail() {
        let store = make_store();
        store.enqueue(&pid("b"), make_entry("z", 0, Priority::Normal)).unwrap();

        store.transfer_direct(&eid("x"), &pid("a"), &pid("b")).unwrap();

        assert_eq!(ids(&store, "b"), vec!["z", "x"]);
    }

    #[test]
    fn test_transfer_round_trip_does_not_restore_position() {
        let store = make_store();

        store.transfer_direct(&eid("x"), &pid("a"), &pid("b")).unwrap();
        store.transfer_direct(&eid("x"), &pid("b"), &pid("a")).unwrap();

        // x was first, now it is last
        assert_eq!(ids(&store, "a"), vec!["y", "x"]);
        assert!(ids(&store, "b").is_empty());
    }

    #[test]
    fn test_transfer_missing_entry_leaves_board_unchanged() {
        let store = make_store();

        let result = store.transfer_direct(&eid("ghost"), &pid("a"), &pid("b"));

        assert!(matches!(result, Err(QueueError::EntryNotFound { .. })));
        assert_eq!(ids(&store, "a"), vec!["x", "y"]);
        assert!(ids(&store, "b").is_empty());
    }

    #[test]
    fn test_transfer_from_wrong_queue_fails() {
        let store = make_store();

        let result = store.transfer_direct(&eid("x"), &pid("b"), &pid("a"));

        assert!(matches!(result, Err(QueueError::EntryNotFound { .. })));
        assert_eq!(ids(&store, "a"), vec!["x", "y"]);
    }

    #[test]
    fn test_transfer_to_unknown_provider_keeps_entry() {
        let store = make_store();

        let result = store.transfer_direct(&eid("x"), &pid("a"), &pid("nobody"));

        assert_eq!(result, Err(QueueError::ProviderNotFound(pid("nobody"))));
        assert_eq!(ids(&store, "a"), vec!["x", "y"]);
    }

    #[test]
    fn test_transfer_same_provider_rejected() {
        let store = make_store();

        let result = store.transfer_direct(&eid("x"), &pid("a"), &pid("a"));

        assert_eq!(result, Err(QueueError::SameProvider(pid("a"))));
        assert_eq!(ids(&store, "a"), vec!["x", "y"]);
    }

    #[test]
    fn test_transfer_with_details_overwrites_priority() {
        let store = make_store();
        let record = TransferRecord::new("x", "a", "b", "needs a specialist", Priority::Urgent);

        store.transfer_with_details(&record).unwrap();

        let b = store.queue(&pid("b")).unwrap();
        assert_eq!(b.len(), 1);
        assert_eq!(b[0].id, eid("x"));
        assert_eq!(b[0].priority, Priority::Urgent);
        assert_eq!(b[0].wait_time_minutes, 10);
    }

    #[test]
    fn test_cycle_priority_in_place() {
        let store = make_store();

        assert_eq!(store.cycle_priority(&eid("x"), &pid("a")).unwrap(), Priority::High);
        assert_eq!(store.cycle_priority(&eid("x"), &pid("a")).unwrap(), Priority::Urgent);
        assert_eq!(store.cycle_priority(&eid("x"), &pid("a")).unwrap(), Priority::Normal);

        // Order unchanged
        assert_eq!(ids(&store, "a"), vec!["x", "y"]);
    }

    #[test]
    fn test_cycle_priority_not_found() {
        let store = make_store();
        let result = store.cycle_priority(&eid("x"), &pid("b"));
        assert!(matches!(result, Err(QueueError::EntryNotFound { .. })));
    }

    #[test]
    fn test_reorder() {
        let store = make_store();
        store.enqueue(&pid("a"), make_entry("z", 0, Priority::Normal)).unwrap();

        store.reorder(&pid("a"), 2, 0).unwrap();
        assert_eq!(ids(&store, "a"), vec!["z", "x", "y"]);

        store.reorder(&pid("a"), 0, 2).unwrap();
        assert_eq!(ids(&store, "a"), vec!["x", "y", "z"]);
    }

    #[test]
    fn test_reorder_out_of_bounds() {
        let store = make_store();

        let result = store.reorder(&pid("a"), 0, 2);
        assert_eq!(
            result,
            Err(QueueError::IndexOutOfBounds {
                provider_id: pid("a"),
                index: 2,
                len: 2,
            })
        );

        let result = store.reorder(&pid("b"), 0, 0);
        assert!(matches!(result, Err(QueueError::IndexOutOfBounds { len: 0, .. })));

        assert_eq!(ids(&store, "a"), vec!["x", "y"]);
    }

    #[test]
    fn test_tick_ages_every_entry() {
        let store = make_store();
        store.enqueue(&pid("b"), make_entry("z", 0, Priority::Normal)).unwrap();

        for _ in 0..5 {
            store.tick().unwrap();
        }

        let snapshot = store.snapshot().unwrap();
        let waits: Vec<u32> = snapshot.entries().map(|e| e.wait_time_minutes).collect();
        assert_eq!(waits, vec![15, 75, 5]);
    }

    #[test]
    fn test_tick_by_ages_once_and_broadcasts_once() {
        let store = make_store();
        let rx = store.subscribe();

        store.tick_by(1440).unwrap();
        store.tick_by(0).unwrap();

        let snapshot = store.snapshot().unwrap();
        let waits: Vec<u32> = snapshot.entries().map(|e| e.wait_time_minutes).collect();
        assert_eq!(waits, vec![10 + 1440, 70 + 1440]);

        let changes: Vec<BoardChange> = rx.try_iter().collect();
        assert_eq!(changes, vec![BoardChange::Ticked { minutes: 1440 }]);
    }

    #[test]
    fn test_tick_by_saturates() {
        let store = make_store();

        store.tick_by(u32::MAX).unwrap();

        let (_, x) = store.find(&eid("x")).unwrap().unwrap();
        assert_eq!(x.wait_time_minutes, u32::MAX);
    }

    #[test]
    fn test_tick_counts_across_transfers() {
        let store = make_store();

        store.tick().unwrap();
        store.transfer_direct(&eid("x"), &pid("a"), &pid("b")).unwrap();
        store.tick().unwrap();
        store.transfer_direct(&eid("x"), &pid("b"), &pid("a")).unwrap();
        store.tick().unwrap();

        let (_, x) = store.find(&eid("x")).unwrap().unwrap();
        assert_eq!(x.wait_time_minutes, 13);
    }

    #[test]
    fn test_enqueue_rejects_duplicate_anywhere() {
        let store = make_store();

        let result = store.enqueue(&pid("b"), make_entry("x", 0, Priority::Normal));

        assert_eq!(result, Err(QueueError::DuplicateEntry(eid("x"))));
        assert!(ids(&store, "b").is_empty());
        assert_unique_ids(&store);
    }

    #[test]
    fn test_enqueue_unknown_provider() {
        let store = make_store();
        let result = store.enqueue(&pid("c"), make_entry("z", 0, Priority::Normal));
        assert_eq!(result, Err(QueueError::ProviderNotFound(pid("c"))));
    }

    #[test]
    fn test_add_provider_twice_fails() {
        let store = make_store();
        let result = store.add_provider(Provider::new("a", "Dr. A again", "General"));
        assert!(matches!(result, Err(QueueError::InvalidState(_))));
        assert_eq!(store.providers().unwrap().len(), 2);
    }

    #[test]
    fn test_set_provider_status() {
        let store = make_store();

        store.set_provider_status(&pid("b"), ProviderStatus::Break).unwrap();

        let providers = store.providers().unwrap();
        assert_eq!(providers[1].status, ProviderStatus::Break);
        assert!(store
            .set_provider_status(&pid("zz"), ProviderStatus::Busy)
            .is_err());
    }

    #[test]
    fn test_start_consultation_counts_completed() {
        let store = make_store();

        let entry = store.start_consultation(&eid("y"), &pid("a")).unwrap();

        assert_eq!(entry.id, eid("y"));
        assert_eq!(ids(&store, "a"), vec!["x"]);
        assert_eq!(store.completed_today().unwrap(), 1);
        assert!(store.find(&eid("y")).unwrap().is_none());
    }

    #[test]
    fn test_poisoned_lock_is_reported_by_reads() {
        let store = Arc::new(make_store());

        let s = Arc::clone(&store);
        let _ = thread::spawn(move || {
            let _guard = s.state.write().unwrap();
            panic!("writer died holding the lock");
        })
        .join();

        assert!(matches!(store.find(&eid("x")), Err(QueueError::LockPoisoned(_))));
        assert!(matches!(store.providers(), Err(QueueError::LockPoisoned(_))));
        assert!(matches!(store.completed_today(), Err(QueueError::LockPoisoned(_))));
    }

    #[test]
    fn test_len_and_is_empty() {
        let store = QueueStore::new();
        assert!(store.is_empty());

        let store = make_store();
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_subscribers_see_each_mutation() {
        let store = make_store();
        let rx = store.subscribe();

        store.cycle_priority(&eid("x"), &pid("a")).unwrap();
        store.transfer_direct(&eid("x"), &pid("a"), &pid("b")).unwrap();
        store.tick().unwrap();
        // Failed operations are not broadcast
        let _ = store.reorder(&pid("a"), 5, 0);

        let changes: Vec<BoardChange> = rx.try_iter().collect();
        assert_eq!(changes.len(), 3);
        assert_eq!(
            changes[0],
            BoardChange::PriorityCycled {
                entry_id: eid("x"),
                provider_id: pid("a"),
                priority: Priority::High,
            }
        );
        assert!(matches!(
            changes[1],
            BoardChange::Transferred { reviewed: false, .. }
        ));
        assert!(changes[2].is_tick());
    }

    #[test]
    fn test_disconnected_subscriber_removed() {
        let store = make_store();

        let rx = store.subscribe();
        drop(rx);

        // Broadcast must not fail with a closed receiver
        store.tick().unwrap();
        assert_eq!(store.subscribers.read().unwrap().len(), 0);
    }

    #[test]
    fn test_thread_safe_transfers_keep_ids_unique() {
        let store = Arc::new(make_store());
        let mut handles = vec![];

        for i in 0..4 {
            let s = store.clone();
            handles.push(thread::spawn(move || {
                for _ in 0..25 {
                    // Both directions race; failures are expected and harmless
                    let (from, to) = if i % 2 == 0 { ("a", "b") } else { ("b", "a") };
                    let _ = s.transfer_direct(&eid("x"), &pid(from), &pid(to));
                    let _ = s.tick();
                    thread::sleep(Duration::from_micros(50));
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.len(), 2);
        assert_unique_ids(&store);
        let (_, y) = store.find(&eid("y")).unwrap().unwrap();
        assert_eq!(y.wait_time_minutes, 70 + 100);
    }
}
