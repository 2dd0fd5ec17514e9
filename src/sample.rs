//! Sample catalog for demos and local runs.
use tracing::info;
use tracing::warn;

use crate::prelude::*;

pub fn placements() -> Vec<AdPlacement> {
    vec![
        AdPlacement::new("adunit1", AdFormat::Banner, 300, 250),
        AdPlacement::new("adunit2", AdFormat::Interstitial, 1024, 768),
        AdPlacement::new("adunit3", AdFormat::Video, 1000, 700),
    ]
}

pub fn creatives() -> Vec<Creative> {
    vec![
        Creative::new("creative1", AdFormat::Banner, 300, 250, "Sample Banner Ad", 1.5),
        Creative::new("creative2", AdFormat::Interstitial, 1024, 768, "Sample Interstitial Ad", 3.0),
    ]
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub inserted: usize,
    // Already present from an earlier run.
    pub skipped:  usize,
}

/// Insert the sample catalog through the cache. Entities that already exist are skipped, any other failure aborts.
pub async fn seed<S>(cache: &CatalogCache<S>) -> Result<SeedReport>
where
    S: CatalogStore,
{
    let mut report = SeedReport::default();

    for placement in placements() {
        tally(&mut report, cache.insert_placement(placement).await)?;
    }
    for creative in creatives() {
        tally(&mut report, cache.insert_creative(creative).await)?;
    }

    info!(inserted = report.inserted, skipped = report.skipped, "Sample catalog seeded");
    Ok(report)
}

fn tally(report: &mut SeedReport, outcome: Result<()>) -> Result<()> {
    match outcome {
        Ok(()) => report.inserted += 1,
        Err(err @ CatalogError::DuplicateKey { .. }) => {
            warn!("Skipping sample entity: {err}");
            report.skipped += 1;
        }
        Err(err) => return Err(err),
    }
    Ok(())
}
