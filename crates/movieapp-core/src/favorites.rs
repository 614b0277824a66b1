//! Durable, observable set of favorite movie IDs.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use anyhow::{Context, Result};
use movieapp_db::PreferenceStore;

/// Preference name under which the ID list is persisted.
pub const FAVORITES_KEY: &str = "FavoriteMovies";

/// A set of favorite movie IDs.
///
/// Holds bare IDs only; every display of a favorite needs a live detail fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FavoriteSet {
    ids: BTreeSet<u64>,
}

impl FavoriteSet {
    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ids: BTreeSet::new(),
        }
    }

    /// Whether `movie_id` is in the set.
    #[must_use]
    pub fn contains(&self, movie_id: u64) -> bool {
        self.ids.contains(&movie_id)
    }

    /// Number of favorites.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Iterates IDs in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u64> + '_ {
        self.ids.iter().copied()
    }

    /// Removes `movie_id` if present, inserts it otherwise.
    ///
    /// Returns whether the ID is present afterwards.
    pub fn toggle(&mut self, movie_id: u64) -> bool {
        if self.ids.remove(&movie_id) {
            false
        } else {
            self.ids.insert(movie_id);
            true
        }
    }
}

impl FromIterator<u64> for FavoriteSet {
    fn from_iter<I: IntoIterator<Item = u64>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

/// Handle returned by [`FavoritesStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Callback receiving the new snapshot after each mutation.
pub type Subscriber = Arc<dyn Fn(&FavoriteSet) + Send + Sync>;

/// Process-wide favorites store.
///
/// Mutations are serialized: each one is persisted before it becomes
/// visible and before subscribers hear about it. Subscribers run on the
/// mutating thread, in mutation order, and must not call `toggle` or
/// `load` themselves.
pub struct FavoritesStore<S> {
    storage: S,
    ids: RwLock<FavoriteSet>,
    write_lock: Mutex<()>,
    subscribers: Mutex<Vec<(SubscriptionId, Subscriber)>>,
    next_subscription: AtomicU64,
}

impl<S> std::fmt::Debug for FavoritesStore<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len();
        f.debug_struct("FavoritesStore")
            .field(
                "ids",
                &*self.ids.read().unwrap_or_else(PoisonError::into_inner),
            )
            .field("subscribers", &subscribers)
            .finish_non_exhaustive()
    }
}

impl<S: PreferenceStore> FavoritesStore<S> {
    /// Creates a store with an empty in-memory set. Call [`Self::load`]
    /// (or use [`Self::open`]) to pick up persisted state.
    #[must_use]
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            ids: RwLock::new(FavoriteSet::new()),
            write_lock: Mutex::new(()),
            subscribers: Mutex::new(Vec::new()),
            next_subscription: AtomicU64::new(0),
        }
    }

    /// Creates a store and loads the persisted set.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be read.
    pub fn open(storage: S) -> Result<Self> {
        let store = Self::new(storage);
        store.load()?;
        Ok(store)
    }

    /// Whether `movie_id` is a favorite.
    #[must_use]
    pub fn is_favorite(&self, movie_id: u64) -> bool {
        self.ids
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(movie_id)
    }

    /// Returns a copy of the current set.
    #[must_use]
    pub fn snapshot(&self) -> FavoriteSet {
        self.ids
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Adds `movie_id` if absent, removes it if present, persists the
    /// whole set, then notifies subscribers.
    ///
    /// Returns whether the movie is a favorite afterwards.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting fails; the set is left unchanged and
    /// no subscriber is notified.
    pub fn toggle(&self, movie_id: u64) -> Result<bool> {
        let _write = self
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let mut next = self.snapshot();
        let now_favorite = next.toggle(movie_id);
        self.persist(&next)
            .with_context(|| format!("failed to persist favorite toggle for {movie_id}"))?;

        self.replace(next.clone());
        tracing::debug!(movie_id, favorite = now_favorite, total = next.len(), "favorite toggled");
        self.notify(&next);
        Ok(now_favorite)
    }

    /// Replaces the in-memory set with the persisted one and notifies
    /// subscribers. Missing, empty or unreadable values load as the
    /// empty set.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage itself cannot be read.
    pub fn load(&self) -> Result<FavoriteSet> {
        let _write = self
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let raw = self
            .storage
            .get(FAVORITES_KEY)
            .context("failed to read persisted favorites")?;
        let loaded = raw.as_deref().map_or_else(FavoriteSet::new, parse_ids);

        self.replace(loaded.clone());
        self.notify(&loaded);
        Ok(loaded)
    }

    /// Registers a callback for every future mutation.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&FavoriteSet) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_subscription.fetch_add(1, Ordering::Relaxed));
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, Arc::new(callback)));
        id
    }

    /// Removes a subscription. Returns `false` if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let before = subscribers.len();
        subscribers.retain(|(sid, _)| *sid != id);
        subscribers.len() != before
    }

    fn persist(&self, set: &FavoriteSet) -> Result<()> {
        let ids: Vec<u64> = set.iter().collect();
        let value = serde_json::to_string(&ids).context("failed to encode favorites")?;
        self.storage.set(FAVORITES_KEY, &value)
    }

    fn replace(&self, set: FavoriteSet) {
        *self.ids.write().unwrap_or_else(PoisonError::into_inner) = set;
    }

    fn notify(&self, snapshot: &FavoriteSet) {
        // Copy the list so callbacks may subscribe/unsubscribe.
        let subscribers: Vec<Subscriber> = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, s)| Arc::clone(s))
            .collect();
        for subscriber in subscribers {
            subscriber(snapshot);
        }
    }
}

/// Decodes the persisted JSON array.
fn parse_ids(raw: &str) -> FavoriteSet {
    if raw.trim().is_empty() {
        return FavoriteSet::new();
    }
    match serde_json::from_str::<Vec<u64>>(raw) {
        Ok(ids) => ids.into_iter().collect(),
        Err(e) => {
            tracing::warn!(error = %e, "persisted favorites are unreadable, starting empty");
            FavoriteSet::new()
        }
    }
}
