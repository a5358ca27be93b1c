//! Nullable store: thread-safe in-memory storage for testing.
//!
//! Each record lives in its own `Arc<Mutex<Option<_>>>` cell. The map lock is
//! only held long enough to find or insert a cell, so mutations of different
//! keys run in parallel while mutations of the same key are serialized.
//! A removed record's cell is set to `None`, so a caller still holding the
//! cell observes `NotFound` instead of writing to a detached record.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use verity_store::{sort_newest_first, ArticleRecord, ArticleStore, MetaStore, StoreError};
use verity_store::{UserProfile, UserStore, VoteStore};
use verity_types::{normalize_identity, ContentRef};

type Cell<V> = Arc<Mutex<Option<V>>>;

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, StoreError> {
    mutex
        .lock()
        .map_err(|_| StoreError::Backend("in-memory store lock poisoned".to_string()))
}

struct CellMap<V> {
    cells: Mutex<HashMap<String, Cell<V>>>,
}

impl<V: Clone> CellMap<V> {
    fn new() -> Self {
        Self {
            cells: Mutex::new(HashMap::new()),
        }
    }

    fn cell(&self, key: &str) -> Result<Cell<V>, StoreError> {
        lock(&self.cells)?
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    fn lookup(&self, key: &str) -> Result<Option<Cell<V>>, StoreError> {
        Ok(lock(&self.cells)?.get(key).cloned())
    }

    fn insert_new(&self, key: String, value: V) -> Result<(), StoreError> {
        let mut cells = lock(&self.cells)?;
        if let Some(existing) = cells.get(&key) {
            if lock(existing)?.is_some() {
                return Err(StoreError::Duplicate(key));
            }
        }
        cells.insert(key, Arc::new(Mutex::new(Some(value))));
        Ok(())
    }

    fn get(&self, key: &str) -> Result<V, StoreError> {
        let cell = self.cell(key)?;
        let guard = lock(&cell)?;
        guard
            .clone()
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    fn mutate<T, E, F>(&self, key: &str, update: F) -> Result<(V, T), E>
    where
        F: FnOnce(&mut V) -> Result<T, E>,
        E: From<StoreError>,
    {
        let cell = self.cell(key)?;
        let mut guard = lock(&cell)?;
        let current = guard
            .as_mut()
            .ok_or_else(|| StoreError::NotFound(key.to_string()))?;
        // Work on a copy so an aborted update leaves the record untouched.
        let mut draft = current.clone();
        let out = update(&mut draft)?;
        *current = draft.clone();
        Ok((draft, out))
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut cells = lock(&self.cells)?;
        let cell = cells
            .remove(key)
            .ok_or_else(|| StoreError::NotFound(key.to_string()))?;
        let taken = lock(&cell)?.take();
        taken
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    fn values(&self) -> Result<Vec<V>, StoreError> {
        let cells: Vec<Cell<V>> = lock(&self.cells)?.values().cloned().collect();
        let mut out = Vec::with_capacity(cells.len());
        for cell in cells {
            if let Some(v) = lock(&cell)?.clone() {
                out.push(v);
            }
        }
        Ok(out)
    }

    fn len(&self) -> Result<u64, StoreError> {
        Ok(lock(&self.cells)?.len() as u64)
    }
}

/// An in-memory article + user + meta store for testing.
/// Thread-safe for use with tokio's multi-threaded runtime.
pub struct NullStore {
    articles: CellMap<ArticleRecord>,
    users: CellMap<UserProfile>,
    schema_version: Mutex<u32>,
}

impl NullStore {
    pub fn new() -> Self {
        Self {
            articles: CellMap::new(),
            users: CellMap::new(),
            schema_version: Mutex::new(0),
        }
    }
}

impl Default for NullStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ArticleStore for NullStore {
    fn create(&self, article: &ArticleRecord) -> Result<ContentRef, StoreError> {
        self.articles
            .insert_new(article.content_ref.to_string(), article.clone())?;
        Ok(article.content_ref.clone())
    }

    fn find(&self, content_ref: &ContentRef) -> Result<ArticleRecord, StoreError> {
        self.articles.get(content_ref.as_str())
    }

    fn mutate<T, E, F>(&self, content_ref: &ContentRef, update: F) -> Result<(ArticleRecord, T), E>
    where
        F: FnOnce(&mut ArticleRecord) -> Result<T, E>,
        E: From<StoreError>,
    {
        self.articles.mutate(content_ref.as_str(), update)
    }

    fn remove(&self, content_ref: &ContentRef) -> Result<(), StoreError> {
        self.articles.remove(content_ref.as_str())
    }

    fn list(&self) -> Result<Vec<ArticleRecord>, StoreError> {
        let mut all = self.articles.values()?;
        sort_newest_first(&mut all);
        Ok(all)
    }

    fn article_count(&self) -> Result<u64, StoreError> {
        self.articles.len()
    }
}

impl UserStore for NullStore {
    fn create_user(&self, profile: &UserProfile) -> Result<(), StoreError> {
        self.users.insert_new(profile.identity.key(), profile.clone())
    }

    fn find_user(&self, identity: &str) -> Result<UserProfile, StoreError> {
        self.users.get(&normalize_identity(identity))
    }

    fn mutate_user<T, E, F>(&self, identity: &str, update: F) -> Result<(UserProfile, T), E>
    where
        F: FnOnce(&mut UserProfile) -> Result<T, E>,
        E: From<StoreError>,
    {
        self.users.mutate(&normalize_identity(identity), update)
    }

    fn user_count(&self) -> Result<u64, StoreError> {
        self.users.len()
    }
}

impl VoteStore for NullStore {
    fn mutate_with_profile<T, E, F>(
        &self,
        content_ref: &ContentRef,
        identity: &str,
        update: F,
    ) -> Result<(ArticleRecord, T), E>
    where
        F: FnOnce(&mut ArticleRecord, Option<&mut UserProfile>) -> Result<T, E>,
        E: From<StoreError>,
    {
        // Article cell first, then user cell. Every caller takes them in this
        // order, so the two locks cannot deadlock.
        let article_cell = self.articles.cell(content_ref.as_str())?;
        let mut article_guard = lock(&article_cell)?;
        let current = article_guard
            .as_mut()
            .ok_or_else(|| StoreError::NotFound(content_ref.to_string()))?;

        let profile_cell = self.users.lookup(&normalize_identity(identity))?;
        let mut profile_guard = match &profile_cell {
            Some(cell) => Some(lock(cell)?),
            None => None,
        };

        let mut draft = current.clone();
        let mut profile_draft = profile_guard.as_deref().and_then(|p| p.clone());
        let out = update(&mut draft, profile_draft.as_mut())?;

        *current = draft.clone();
        if let (Some(guard), Some(profile)) = (profile_guard.as_mut(), profile_draft) {
            **guard = Some(profile);
        }
        Ok((draft, out))
    }
}

impl MetaStore for NullStore {
    fn get_schema_version(&self) -> Result<u32, StoreError> {
        Ok(*lock(&self.schema_version)?)
    }

    fn set_schema_version(&self, version: u32) -> Result<(), StoreError> {
        *lock(&self.schema_version)? = version;
        Ok(())
    }
}
