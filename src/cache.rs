use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio::time::Interval;
use tokio::time::MissedTickBehavior;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::prelude::*;

/// How often [`CatalogCache::spawn_refresher`] is normally driven.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// A ticker for [`CatalogCache::spawn_refresher`] firing every `period`, starting one `period` from now.
///
/// The first tick is delayed because [`CatalogCache::initialize`] has just loaded the catalog.
pub fn refresh_interval(period: Duration) -> Interval {
    let mut interval = tokio::time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}

#[derive(Debug, Default)]
struct Snapshot {
    placements: Vec<AdPlacement>,
    creatives:  Vec<Creative>,
}

impl Snapshot {
    async fn load<S: CatalogStore>(store: &S) -> Result<Self> {
        let placements = store.load_all_placements().await?;
        let creatives = store.load_all_creatives().await?;
        Ok(Self { placements, creatives })
    }
}

/// In-memory copy of the whole catalog.
///
/// Reads are served from the snapshot under a shared lock and never touch the store. Inserts are written through to
/// the store first and become visible only once the store accepted them. The snapshot is replaced wholesale by
/// [`refresh()`](Self::refresh), either on demand or by the task started with
/// [`spawn_refresher()`](Self::spawn_refresher).
///
/// ```ignore
/// let store = Arc::new(DbStore::new(Arc::new(Sqlite::connect(path).await?)));
/// let cache = CatalogCache::initialize(store).await?;
/// let refresher = cache.spawn_refresher(refresh_interval(DEFAULT_REFRESH_INTERVAL));
///
/// cache.insert_placement(AdPlacement::new("adunit1", AdFormat::Banner, 300, 250)).await?;
/// let placement = cache.get_placement_by_id("adunit1")?;
/// ```
pub struct CatalogCache<S>
where
    S: CatalogStore,
{
    store:      Arc<S>,
    snapshot:   RwLock<Snapshot>,
    // Serializes writers across their store I/O. Without it a refresh that loaded before an insert committed could
    // swap in a snapshot missing that insert after the insert has already returned.
    write_gate: Mutex<()>,
}

impl<S> CatalogCache<S>
where
    S: CatalogStore,
{
    /// Create the schema and load the first snapshot. Any failure here is fatal for the caller.
    pub async fn initialize(store: Arc<S>) -> Result<Arc<Self>> {
        store.create_schema().await?;
        let snapshot = Snapshot::load(&*store).await?;

        info!(
            placements = snapshot.placements.len(),
            creatives = snapshot.creatives.len(),
            "Catalog loaded"
        );

        Ok(Arc::new(Self {
            store,
            snapshot: RwLock::new(snapshot),
            write_gate: Mutex::new(()),
        }))
    }

    pub fn store(&self) -> Arc<S> {
        Arc::clone(&self.store)
    }

    /// Reload the catalog from the store and swap it in. If loading fails the current snapshot stays untouched.
    pub async fn refresh(&self) -> Result<()> {
        let _gate = self.write_gate.lock().await;

        let fresh = Snapshot::load(&*self.store).await?;
        let (placements, creatives) = (fresh.placements.len(), fresh.creatives.len());

        *self.snapshot.write() = fresh;

        info!(placements, creatives, "Catalog refreshed");
        Ok(())
    }

    /// Start the background refresh task. It refreshes on every tick until the ticker gives up, which a
    /// [`refresh_interval`] never does. Failures are logged and the previous snapshot is kept.
    pub fn spawn_refresher<T>(self: &Arc<Self>, ticker: T) -> JoinHandle<()>
    where
        T: RefreshTicker,
    {
        let cache = Arc::clone(self);
        tokio::spawn(async move { cache.refresh_loop(ticker).await })
    }

    async fn refresh_loop<T>(&self, mut ticker: T)
    where
        T: RefreshTicker,
    {
        debug!("Starting catalog refresh task");
        while ticker.tick().await {
            if let Err(err) = self.refresh().await {
                warn!("Failed to refresh catalog, serving the previous snapshot: {err}");
            }
        }
        debug!("Catalog refresh task stopped");
    }

    pub async fn insert_placement(&self, placement: AdPlacement) -> Result<()> {
        let _gate = self.write_gate.lock().await;
        self.store.insert_placement(&placement).await?;
        debug!("Placement '{}' added to catalog", placement.id);
        self.snapshot.write().placements.push(placement);
        Ok(())
    }

    pub async fn insert_creative(&self, creative: Creative) -> Result<()> {
        let _gate = self.write_gate.lock().await;
        self.store.insert_creative(&creative).await?;
        debug!("Creative '{}' added to catalog", creative.id);
        self.snapshot.write().creatives.push(creative);
        Ok(())
    }

    pub fn get_placement_by_id(&self, id: &str) -> Result<AdPlacement> {
        self.snapshot
            .read()
            .placements
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(Lookup::Placement(id.to_string())))
    }

    pub fn get_creative_by_id(&self, id: &str) -> Result<Creative> {
        self.snapshot
            .read()
            .creatives
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(Lookup::Creative(id.to_string())))
    }

    /// A copy of every creative in the catalog. An empty catalog is reported as [`NotFound`](CatalogError::NotFound).
    pub fn get_all_creatives(&self) -> Result<Vec<Creative>> {
        let snapshot = self.snapshot.read();
        if snapshot.creatives.is_empty() {
            return Err(CatalogError::NotFound(Lookup::Creatives));
        }
        Ok(snapshot.creatives.clone())
    }

    pub fn placement_count(&self) -> usize {
        self.snapshot.read().placements.len()
    }

    pub fn creative_count(&self) -> usize {
        self.snapshot.read().creatives.len()
    }
}

impl<S> Debug for CatalogCache<S>
where
    S: CatalogStore,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let snapshot = self.snapshot.read();
        f.debug_struct("CatalogCache")
            .field("store", &self.store)
            .field("placements", &snapshot.placements.len())
            .field("creatives", &snapshot.creatives.len())
            .finish()
    }
}
