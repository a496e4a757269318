use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::floor;

/// Dine-in table placed on a floor plan.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tables")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub floor_id: i32,
    pub name: String,
    pub x_pos: f32,
    pub y_pos: f32,
    pub w_size: f32,
    pub h_size: f32,
    pub capacity: i32,
    #[sea_orm(column_name = "type")]
    pub kind: String,
    pub created_at: Option<i64>,
    pub updated_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Floor,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Floor => Entity::belongs_to(floor::Entity)
                .from(Column::FloorId)
                .to(floor::Column::Id)
                .into(),
        }
    }
}

impl Related<floor::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Floor.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
