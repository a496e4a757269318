use sea_orm::sea_query::Expr;
use sea_orm::{
    entity::prelude::*, Condition, DatabaseConnection, FromQueryResult, JoinType, QueryFilter,
    QueryOrder, QuerySelect,
};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "floors")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub created_at: Option<i64>,
    pub updated_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Table,
    Room,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Table => Entity::has_many(crate::table::Entity).into(),
            Relation::Room => Entity::has_many(crate::room::Entity).into(),
        }
    }
}

impl Related<crate::table::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Table.def()
    }
}

impl Related<crate::room::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Room.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Floor row plus how many tables and rooms are placed on it.
#[derive(Clone, Debug, PartialEq, FromQueryResult)]
pub struct WithTotals {
    pub id: i32,
    pub name: String,
    pub created_at: Option<i64>,
    pub updated_at: Option<i64>,
    pub total_tables: i64,
    pub total_rooms: i64,
}

/// Floors matching `filter` with their table and room counts.
///
/// Both children are joined at once, so the counts are `DISTINCT` to undo
/// the row fan-out.
pub async fn list_with_totals(
    db: &DatabaseConnection,
    filter: Condition,
) -> Result<Vec<WithTotals>, ModelError> {
    let rows = Entity::find()
        .column_as(Expr::cust(r#"COUNT(DISTINCT "tables"."id")"#), "total_tables")
        .column_as(Expr::cust(r#"COUNT(DISTINCT "rooms"."id")"#), "total_rooms")
        .join(JoinType::LeftJoin, Relation::Table.def())
        .join(JoinType::LeftJoin, Relation::Room.def())
        .filter(filter)
        .group_by(Column::Id)
        .order_by_asc(Column::Id)
        .into_model::<WithTotals>()
        .all(db)
        .await?;
    Ok(rows)
}
