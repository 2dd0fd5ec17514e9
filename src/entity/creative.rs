use sea_orm::entity::prelude::*;
use serde::Deserialize;
use serde::Serialize;

use super::AdPlacement;
use crate::types::AdFormat;

/// A priced ad asset. `content` is opaque to the catalog.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "Creatives")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_name = "ID")]
    pub id:      String,
    #[sea_orm(column_name = "Format")]
    pub format:  AdFormat,
    #[sea_orm(column_name = "Width")]
    pub width:   i32,
    #[sea_orm(column_name = "Height")]
    pub height:  i32,
    #[sea_orm(column_name = "Content")]
    pub content: String,
    #[sea_orm(column_name = "Price")]
    pub price:   f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn new<I, C>(id: I, format: AdFormat, width: i32, height: i32, content: C, price: f64) -> Self
    where
        I: Into<String>,
        C: Into<String>,
    {
        Self {
            id: id.into(),
            format,
            width,
            height,
            content: content.into(),
            price,
        }
    }

    /// Exact match on format and both dimensions.
    pub fn fits(&self, placement: &AdPlacement) -> bool {
        self.format == placement.format && self.width == placement.width && self.height == placement.height
    }
}
