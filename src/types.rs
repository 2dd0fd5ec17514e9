use std::fmt::Display;

use sea_orm::DbErr;
use sea_orm::DeriveActiveEnum;
use sea_orm::EnumIter;
use sea_orm::SqlErr;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

pub type Result<T, E = CatalogError> = std::result::Result<T, E>;

/// Ad format shared by placements and creatives. Stored as its lowercase name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum AdFormat {
    #[sea_orm(string_value = "banner")]
    Banner,
    #[sea_orm(string_value = "interstitial")]
    Interstitial,
    #[sea_orm(string_value = "video")]
    Video,
}

impl AdFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdFormat::Banner => "banner",
            AdFormat::Interstitial => "interstitial",
            AdFormat::Video => "video",
        }
    }
}

impl Display for AdFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Placement,
    Creative,
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Placement => write!(f, "placement"),
            EntityKind::Creative => write!(f, "creative"),
        }
    }
}

/// The store operation that failed. Carried by [`CatalogError::StoreUnavailable`] as context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOp {
    Connect,
    Configure,
    CreateSchema,
    Insert(EntityKind, String),
    Load(EntityKind),
    Close,
}

impl Display for StoreOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreOp::Connect => write!(f, "connect to the database"),
            StoreOp::Configure => write!(f, "configure the database connection"),
            StoreOp::CreateSchema => write!(f, "create the catalog schema"),
            StoreOp::Insert(kind, id) => write!(f, "insert {kind} '{id}'"),
            StoreOp::Load(kind) => write!(f, "load {kind}s"),
            StoreOp::Close => write!(f, "close the database connection"),
        }
    }
}

/// What a failed lookup was looking for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Placement(String),
    Creative(String),
    // The whole creative list; an empty catalog reports this too.
    Creatives,
}

impl Display for Lookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Lookup::Placement(id) => write!(f, "placement '{id}'"),
            Lookup::Creative(id) => write!(f, "creative '{id}'"),
            Lookup::Creatives => write!(f, "creatives"),
        }
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("a {entity} with ID '{id}' already exists")]
    DuplicateKey { entity: EntityKind, id: String },

    #[error("store unavailable: failed to {op}: {source}")]
    StoreUnavailable {
        op:     StoreOp,
        #[source]
        source: DbErr,
    },

    #[error("{0} not found")]
    NotFound(Lookup),
}

impl CatalogError {
    pub fn store(op: StoreOp, source: DbErr) -> Self {
        Self::StoreUnavailable { op, source }
    }

    // Uniqueness is decided by the store's constraint, never by a lookup beforehand.
    pub(crate) fn from_insert(entity: EntityKind, id: &str, source: DbErr) -> Self {
        match source.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => Self::DuplicateKey {
                entity,
                id: id.to_string(),
            },
            _ => Self::store(StoreOp::Insert(entity, id.to_string()), source),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    pub fn is_duplicate_key(&self) -> bool {
        matches!(self, Self::DuplicateKey { .. })
    }

    pub fn is_store_unavailable(&self) -> bool {
        matches!(self, Self::StoreUnavailable { .. })
    }
}
