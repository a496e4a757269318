use sea_orm::sea_query::{Expr, Func, SimpleExpr};
use sea_orm::{
    entity::prelude::*, Condition, DatabaseConnection, FromQueryResult, JoinType, QueryFilter,
    QueryOrder, QuerySelect,
};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::user;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "roles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub description: String,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    User,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::User => Entity::has_many(user::Entity).into(),
        }
    }
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Role row plus the number of users assigned to it.
#[derive(Clone, Debug, PartialEq, FromQueryResult)]
pub struct WithUsage {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub usage: i64,
}

/// Roles matching `filter` with their user counts, in one grouped query.
pub async fn list_with_usage(
    db: &DatabaseConnection,
    filter: Condition,
) -> Result<Vec<WithUsage>, ModelError> {
    let assigned = Func::count(Expr::col((user::Entity, user::Column::Id)));
    let rows = Entity::find()
        .column_as(SimpleExpr::from(assigned), "usage")
        .join(JoinType::LeftJoin, Relation::User.def())
        .filter(filter)
        .group_by(Column::Id)
        .order_by_asc(Column::Id)
        .into_model::<WithUsage>()
        .all(db)
        .await?;
    Ok(rows)
}
