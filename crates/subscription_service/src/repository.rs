use std::fs;
use std::path::{Path, PathBuf};

use models::{Subscription, SubscriptionSnapshot};
use tracing::{debug, info};

use crate::error::{Result, ServiceError};

/// Storage for subscriptions.
/// This abstraction allows swapping between in-memory and file-backed implementations.
pub trait SubscriptionRepository {
    fn all(&self) -> &[Subscription];
    fn get(&self, id: u32) -> Option<&Subscription>;
    fn get_mut(&mut self, id: u32) -> Option<&mut Subscription>;
    /// Stores a new subscription and returns the id it was stored under.
    fn add(&mut self, subscription: Subscription) -> Result<u32>;
    fn update(&mut self, subscription: Subscription) -> Result<()>;
    fn remove(&mut self, id: u32) -> Result<Subscription>;
    fn save(&mut self) -> Result<()>;
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryRepository {
    subscriptions: Vec<Subscription>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a repository from a loaded snapshot. Records stored without an id (id 0)
    /// get the next free id so every record can be addressed.
    pub fn from_snapshot(snapshot: SubscriptionSnapshot) -> Result<Self> {
        let mut subscriptions = snapshot.subscriptions;
        let mut last = subscriptions.iter().map(|s| s.id).max().unwrap_or(0);
        for subscription in subscriptions.iter_mut().filter(|s| s.id == 0) {
            last = last.checked_add(1).ok_or(ServiceError::IdsExhausted)?;
            subscription.id = last;
        }
        Ok(Self { subscriptions })
    }

    pub fn to_snapshot(&self) -> SubscriptionSnapshot {
        SubscriptionSnapshot {
            subscriptions: self.subscriptions.clone(),
        }
    }

    fn next_id(&self) -> Result<u32> {
        self.subscriptions
            .iter()
            .map(|s| s.id)
            .max()
            .unwrap_or(0)
            .checked_add(1)
            .ok_or(ServiceError::IdsExhausted)
    }
}

impl SubscriptionRepository for InMemoryRepository {
    fn all(&self) -> &[Subscription] {
        &self.subscriptions
    }

    fn get(&self, id: u32) -> Option<&Subscription> {
        self.subscriptions.iter().find(|s| s.id == id)
    }

    fn get_mut(&mut self, id: u32) -> Option<&mut Subscription> {
        self.subscriptions.iter_mut().find(|s| s.id == id)
    }

    fn add(&mut self, mut subscription: Subscription) -> Result<u32> {
        // keep caller-chosen ids unless they collide
        if subscription.id == 0 || self.get(subscription.id).is_some() {
            subscription.id = self.next_id()?;
        }
        let id = subscription.id;
        self.subscriptions.push(subscription);
        Ok(id)
    }

    fn update(&mut self, subscription: Subscription) -> Result<()> {
        let slot = self
            .get_mut(subscription.id)
            .ok_or(ServiceError::NotFound(subscription.id))?;
        *slot = subscription;
        Ok(())
    }

    fn remove(&mut self, id: u32) -> Result<Subscription> {
        let pos = self
            .subscriptions
            .iter()
            .position(|s| s.id == id)
            .ok_or(ServiceError::NotFound(id))?;
        Ok(self.subscriptions.remove(pos))
    }

    fn save(&mut self) -> Result<()> {
        Ok(())
    }
}

/// File-based implementation that keeps the whole snapshot in memory and rewrites the
/// JSON file on `save`.
#[derive(Debug)]
pub struct JsonFileRepository {
    path: PathBuf,
    inner: InMemoryRepository,
}

impl JsonFileRepository {
    /// Opens the snapshot at `path`. A missing file starts an empty snapshot.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let snapshot = if path.exists() {
            load_snapshot(&path)?
        } else {
            debug!(path = %path.display(), "snapshot file missing, starting empty");
            SubscriptionSnapshot::default()
        };
        Ok(Self {
            path,
            inner: InMemoryRepository::from_snapshot(snapshot)?,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SubscriptionRepository for JsonFileRepository {
    fn all(&self) -> &[Subscription] {
        self.inner.all()
    }

    fn get(&self, id: u32) -> Option<&Subscription> {
        self.inner.get(id)
    }

    fn get_mut(&mut self, id: u32) -> Option<&mut Subscription> {
        self.inner.get_mut(id)
    }

    fn add(&mut self, subscription: Subscription) -> Result<u32> {
        self.inner.add(subscription)
    }

    fn update(&mut self, subscription: Subscription) -> Result<()> {
        self.inner.update(subscription)
    }

    fn remove(&mut self, id: u32) -> Result<Subscription> {
        self.inner.remove(id)
    }

    fn save(&mut self) -> Result<()> {
        write_snapshot(&self.path, &self.inner.to_snapshot())?;
        info!(
            path = %self.path.display(),
            count = self.inner.all().len(),
            "saved subscription snapshot"
        );
        Ok(())
    }
}

/// Reads and parses a snapshot file.
pub fn load_snapshot(path: &Path) -> Result<SubscriptionSnapshot> {
    let raw = fs::read_to_string(path)?;
    let snapshot: SubscriptionSnapshot = serde_json::from_str(&raw)?;
    debug!(
        path = %path.display(),
        count = snapshot.subscriptions.len(),
        "loaded subscription snapshot"
    );
    Ok(snapshot)
}

/// Writes a snapshot as pretty JSON, creating the parent directory if needed.
pub fn write_snapshot(path: &Path, snapshot: &SubscriptionSnapshot) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let formatted = serde_json::to_string_pretty(snapshot)?;
    fs::write(path, formatted)?;
    Ok(())
}
