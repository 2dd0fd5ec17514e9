use std::error::Error;
use std::sync::Arc;

use ad_catalog::driver::sqlite::Sqlite;
use ad_catalog::prelude::*;
use ad_catalog::sample;
use ad_catalog::serve::serve_ad;
use ad_catalog::serve::AdRequest;
use ad_catalog::serve::AdResponse;
use ad_catalog::serve::ServeOutcome;
use ad_catalog::store::DbStore;
use ad_catalog::test::TempStore;
use uuid::Uuid;

async fn sample_cache() -> Result<(TempStore, Arc<CatalogCache<DbStore<Sqlite>>>), Box<dyn Error>> {
    let temp = TempStore::new().await?;
    let cache = CatalogCache::initialize(temp.store.clone()).await?;
    sample::seed(&cache).await?;
    Ok((temp, cache))
}

#[tokio::test]
async fn serves_sample_banner() -> Result<(), Box<dyn Error>> {
    let (_temp, cache) = sample_cache().await?;

    let outcome = serve_ad(&cache, AdRequest::new("adunit1").with_user("user-42"))?;
    assert_eq!(
        outcome,
        ServeOutcome::Served(AdResponse {
            creative_id: "creative1".into(),
            content:     "Sample Banner Ad".into(),
            price:       1.5,
            user_id:     "user-42".into(),
        })
    );

    let ServeOutcome::Served(response) = serve_ad(&cache, AdRequest::new("adunit2").with_user("user-42"))?
    else {
        panic!("no creative served for adunit2");
    };
    assert_eq!(response.creative_id, "creative2");
    assert_eq!(response.price, 3.0);

    Ok(())
}

#[tokio::test]
async fn anonymous_requests_get_a_user_id() -> Result<(), Box<dyn Error>> {
    let (_temp, cache) = sample_cache().await?;

    let mut seen = Vec::new();
    for request in [AdRequest::new("adunit1"), AdRequest::new("adunit1").with_user("")] {
        let ServeOutcome::Served(response) = serve_ad(&cache, request)?
        else {
            panic!("no creative served for adunit1");
        };
        Uuid::parse_str(&response.user_id)?;
        seen.push(response.user_id);
    }
    assert_ne!(seen[0], seen[1]);

    Ok(())
}

#[tokio::test]
async fn placement_without_fitting_creative() -> Result<(), Box<dyn Error>> {
    let (_temp, cache) = sample_cache().await?;

    // adunit3 is a video slot and the sample catalog has no video creative.
    assert_eq!(
        serve_ad(&cache, AdRequest::new("adunit3"))?,
        ServeOutcome::NoApplicableCreative
    );

    cache
        .insert_creative(Creative::new("free-video", AdFormat::Video, 1000, 700, "free", 0.0))
        .await?;
    assert_eq!(
        serve_ad(&cache, AdRequest::new("adunit3"))?,
        ServeOutcome::NoApplicableCreative
    );

    Ok(())
}

#[tokio::test]
async fn unknown_placement_and_empty_catalog() -> Result<(), Box<dyn Error>> {
    let temp = TempStore::new().await?;
    let cache = CatalogCache::initialize(temp.store.clone()).await?;
    cache
        .insert_placement(AdPlacement::new("adunit1", AdFormat::Banner, 300, 250))
        .await?;

    let err = serve_ad(&cache, AdRequest::new("adunit1")).unwrap_err();
    assert!(matches!(err, CatalogError::NotFound(Lookup::Creatives)), "{err:?}");

    cache
        .insert_creative(Creative::new("creative1", AdFormat::Banner, 300, 250, "a", 1.0))
        .await?;
    let err = serve_ad(&cache, AdRequest::new("adunit7")).unwrap_err();
    assert!(
        matches!(err, CatalogError::NotFound(Lookup::Placement(ref id)) if id == "adunit7"),
        "{err:?}"
    );

    Ok(())
}

#[tokio::test]
async fn highest_priced_fitting_creative_wins() -> Result<(), Box<dyn Error>> {
    let temp = TempStore::new().await?;
    let cache = CatalogCache::initialize(temp.store.clone()).await?;
    cache
        .insert_placement(AdPlacement::new("P", AdFormat::Banner, 300, 250))
        .await?;
    for creative in [
        Creative::new("A", AdFormat::Banner, 300, 250, "a", 1.5),
        Creative::new("B", AdFormat::Banner, 300, 250, "b", 2.0),
        Creative::new("C", AdFormat::Banner, 728, 90, "c", 9.0),
    ] {
        cache.insert_creative(creative).await?;
    }

    let ServeOutcome::Served(response) = serve_ad(&cache, AdRequest::new("P").with_user("u"))?
    else {
        panic!("no creative served for P");
    };
    assert_eq!(response.creative_id, "B");
    assert_eq!(response.content, "b");

    Ok(())
}

#[tokio::test]
async fn seeding_twice_skips_existing_entities() -> Result<(), Box<dyn Error>> {
    let (temp, cache) = sample_cache().await?;
    assert_eq!(cache.placement_count(), 3);
    assert_eq!(cache.creative_count(), 2);

    let report = sample::seed(&cache).await?;
    assert_eq!(report, sample::SeedReport { inserted: 0, skipped: 5 });

    // A fresh process over the same database.
    let restarted = CatalogCache::initialize(temp.store.clone()).await?;
    assert_eq!(sample::seed(&restarted).await?.skipped, 5);
    assert_eq!(restarted.creative_count(), 2);

    Ok(())
}
