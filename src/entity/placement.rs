use sea_orm::entity::prelude::*;
use serde::Deserialize;
use serde::Serialize;

use crate::types::AdFormat;

/// A named ad slot with a fixed format and size.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "AdUnits")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_name = "ID")]
    pub id:     String,
    #[sea_orm(column_name = "Format")]
    pub format: AdFormat,
    #[sea_orm(column_name = "Width")]
    pub width:  i32,
    #[sea_orm(column_name = "Height")]
    pub height: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn new<S: Into<String>>(id: S, format: AdFormat, width: i32, height: i32) -> Self {
        Self {
            id: id.into(),
            format,
            width,
            height,
        }
    }
}
