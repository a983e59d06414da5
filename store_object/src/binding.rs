//! Parameter binding
//!
//! Statement parameters are bound as the PostgreSQL type their [`Param`]
//! variant names, never spliced into the statement text.

use crate::param::{Param, ParamType};
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::postgres::{PgArguments, Postgres};
use sqlx::query::Query;
use sqlx::types::Json;
use uuid::Uuid;

/// Bind one parameter to a query
pub fn bind_value<'q>(
    query: Query<'q, Postgres, PgArguments>,
    param: &Param,
) -> Query<'q, Postgres, PgArguments> {
    match param {
        Param::Null(ty) => bind_null(query, *ty),
        Param::Bool(b) => query.bind(*b),
        Param::Int4(i) => query.bind(*i),
        Param::Int8(i) => query.bind(*i),
        Param::Float8(f) => query.bind(*f),
        Param::Text(s) => query.bind(s.clone()),
        Param::Uuid(u) => query.bind(*u),
        Param::Timestamptz(dt) => query.bind(*dt),
        Param::Jsonb(v) => query.bind(Json(v.clone())),
    }
}

/// A NULL sent with the column type it targets
fn bind_null<'q>(
    query: Query<'q, Postgres, PgArguments>,
    ty: ParamType,
) -> Query<'q, Postgres, PgArguments> {
    match ty {
        ParamType::Bool => query.bind(None::<bool>),
        ParamType::Int4 => query.bind(None::<i32>),
        ParamType::Int8 => query.bind(None::<i64>),
        ParamType::Float8 => query.bind(None::<f64>),
        ParamType::Text => query.bind(None::<String>),
        ParamType::Uuid => query.bind(None::<Uuid>),
        ParamType::Timestamptz => query.bind(None::<DateTime<Utc>>),
        ParamType::Jsonb => query.bind(None::<Json<Value>>),
    }
}

/// Bind every parameter in order
pub fn bind_all<'q>(
    mut query: Query<'q, Postgres, PgArguments>,
    params: &[Param],
) -> Query<'q, Postgres, PgArguments> {
    for param in params {
        query = bind_value(query, param);
    }
    query
}
