pub use entity::prelude::*;
pub use entity::{email_analysis, mailbox};
pub use sea_orm::prelude::{DateTimeWithTimeZone, Json, Uuid};
pub use sea_orm::sea_query::{Expr, OnConflict};
pub use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    FromQueryResult, Order, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
