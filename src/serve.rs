//! The "serve ad" call: placement lookup, creative selection and response assembly.
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::prelude::*;
use crate::selection::select_creative;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdRequest {
    pub ad_unit_id: String,
    /// Anonymous requests get a freshly generated ID.
    #[serde(default)]
    pub user_id:    Option<String>,
}

impl AdRequest {
    pub fn new<S: Into<String>>(ad_unit_id: S) -> Self {
        Self {
            ad_unit_id: ad_unit_id.into(),
            user_id:    None,
        }
    }

    pub fn with_user<S: Into<String>>(mut self, user_id: S) -> Self {
        self.user_id = Some(user_id.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdResponse {
    pub creative_id: String,
    pub content:     String,
    pub price:       f64,
    pub user_id:     String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ServeOutcome {
    Served(AdResponse),
    NoApplicableCreative,
}

/// Serve the best creative for the requested placement.
///
/// An unknown placement or an empty catalog fails with [`NotFound`](CatalogError::NotFound), while a known placement
/// with nothing to fit it yields [`ServeOutcome::NoApplicableCreative`].
pub fn serve_ad<S>(cache: &CatalogCache<S>, request: AdRequest) -> Result<ServeOutcome>
where
    S: CatalogStore,
{
    let user_id = request
        .user_id
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let placement = cache.get_placement_by_id(&request.ad_unit_id)?;
    let creatives = cache.get_all_creatives()?;

    Ok(match select_creative(&placement, &creatives) {
        Some(creative) => ServeOutcome::Served(AdResponse {
            creative_id: creative.id.clone(),
            content: creative.content.clone(),
            price: creative.price,
            user_id,
        }),
        None => ServeOutcome::NoApplicableCreative,
    })
}
