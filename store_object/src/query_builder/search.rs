//! Post search
//!
//! Turns a sparse [`QuerySpec`] into one parameterized statement. The clause is
//! folded from an ordered list of fragments: the approval check, then the text
//! match, then one `IN` list per non-empty filter. Each fragment contributes
//! its own bound values, and the result is ordered by a single sort column.
//!
//! Rows that tie on the sort column come back in whatever order PostgreSQL
//! produces; no secondary key is added.

use crate::errors::StoreError;
use crate::executor::StatementExecutor;
use crate::param::Param;
use crate::query_builder::builder::QueryBuilder;
use crate::query_builder::filter::QueryFilter;
use crate::query_builder::ordering::SortOrder;
use crate::row::RowSet;
use crate::statement::Statement;
use crate::validation::{ValidatedColumn, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Columns a search can be sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    Program,
    LocationType,
    UserStatus,
    Rating,
    CreateTime,
}

impl SortKey {
    pub const ALL: [SortKey; 5] = [
        SortKey::Program,
        SortKey::LocationType,
        SortKey::UserStatus,
        SortKey::Rating,
        SortKey::CreateTime,
    ];

    /// Parse the name a search form submits, in camelCase or snake_case
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "program" => Some(SortKey::Program),
            "locationType" | "location_type" => Some(SortKey::LocationType),
            "userStatus" | "user_status" => Some(SortKey::UserStatus),
            "rating" => Some(SortKey::Rating),
            "createTime" | "create_time" => Some(SortKey::CreateTime),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Program => "program",
            SortKey::LocationType => "locationType",
            SortKey::UserStatus => "userStatus",
            SortKey::Rating => "rating",
            SortKey::CreateTime => "createTime",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Multi-valued filters a search accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterField {
    Program,
    LocationType,
    UserStatus,
    Rating,
}

/// A sparse search request
///
/// Every field is optional. Deserializes from the camelCase names the search
/// form uses; `categoryIDs` is accepted for `programIDs`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuerySpec {
    pub search: Option<String>,
    #[serde(rename = "programIDs", alias = "categoryIDs")]
    pub program_ids: Vec<i64>,
    #[serde(rename = "locationTypeIDs")]
    pub location_type_ids: Vec<i64>,
    #[serde(rename = "statusIDs")]
    pub status_ids: Vec<i64>,
    pub ratings: Vec<i64>,
    pub sort_by: Option<String>,
    pub sort_ascending: Option<bool>,
}

impl QuerySpec {
    /// A spec with only a search term
    pub fn search(term: &str) -> Self {
        Self {
            search: Some(term.to_string()),
            ..Self::default()
        }
    }

    pub fn sort_by(mut self, key: SortKey, ascending: bool) -> Self {
        self.sort_by = Some(key.as_str().to_string());
        self.sort_ascending = Some(ascending);
        self
    }

    /// The trimmed search term, if there is a non-blank one
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
    }

    /// Filter lists in the order they are rendered
    pub fn filters(&self) -> [(FilterField, &[i64]); 4] {
        [
            (FilterField::Program, self.program_ids.as_slice()),
            (FilterField::LocationType, self.location_type_ids.as_slice()),
            (FilterField::UserStatus, self.status_ids.as_slice()),
            (FilterField::Rating, self.ratings.as_slice()),
        ]
    }

    pub fn has_filters(&self) -> bool {
        self.filters().iter().any(|(_, values)| !values.is_empty())
    }

    /// Only a search term, nothing else
    pub fn is_simple(&self) -> bool {
        self.search_term().is_some()
            && !self.has_filters()
            && self.sort_by.is_none()
            && self.sort_ascending.is_none()
    }
}

/// Where a search reads from and which columns its fragments refer to
#[derive(Debug, Clone)]
pub struct SearchSchema {
    /// `SELECT ... FROM ... JOIN ...` without a WHERE clause
    pub select: &'static str,
    /// Boolean column every result must have set
    pub approval_column: &'static str,
    /// Columns the search term is matched against
    pub text_columns: Vec<&'static str>,
    pub filter_columns: Vec<(FilterField, &'static str)>,
    pub sort_columns: Vec<(SortKey, &'static str)>,
    pub default_sort: SortKey,
    pub default_order: SortOrder,
}

impl SearchSchema {
    /// Approved posts joined with their program, location type, author status
    /// and rating
    pub fn posts() -> Self {
        Self {
            select: "SELECT post.*, rating.general AS rating, program.name AS program_name, \
                     location_type.name AS location_type_name, user_status.name AS user_status_name \
                     FROM post \
                     JOIN program ON post.program_id = program.id \
                     JOIN location_type ON post.location_type_id = location_type.id \
                     JOIN app_user ON post.user_id = app_user.id \
                     JOIN user_status ON app_user.status_id = user_status.id \
                     JOIN rating ON post.rating_id = rating.id",
            approval_column: "post.approved",
            text_columns: vec!["post.content", "post.location", "program.name"],
            filter_columns: vec![
                (FilterField::Program, "post.program_id"),
                (FilterField::LocationType, "post.location_type_id"),
                (FilterField::UserStatus, "app_user.status_id"),
                (FilterField::Rating, "rating.general"),
            ],
            sort_columns: vec![
                (SortKey::Program, "program.name"),
                (SortKey::LocationType, "location_type.name"),
                (SortKey::UserStatus, "user_status.name"),
                (SortKey::Rating, "rating.general"),
                (SortKey::CreateTime, "post.create_time"),
            ],
            default_sort: SortKey::CreateTime,
            default_order: SortOrder::Asc,
        }
    }

    fn filter_column(&self, field: FilterField) -> Option<&'static str> {
        self.filter_columns
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, column)| *column)
    }

    fn sort_column(&self, key: SortKey) -> Option<&'static str> {
        self.sort_columns
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, column)| *column)
    }

    /// Check every column reference that gets interpolated into statements
    pub fn validate(&self) -> Result<(), StoreError> {
        ValidatedColumn::new(self.approval_column)?;

        for column in &self.text_columns {
            ValidatedColumn::new(column)?;
        }
        for (_, column) in &self.filter_columns {
            ValidatedColumn::new(column)?;
        }
        for (_, column) in &self.sort_columns {
            ValidatedColumn::new(column)?;
        }
        if self.sort_column(self.default_sort).is_none() {
            return Err(StoreError::Validation(ValidationError::MissingSortColumn(
                self.default_sort.to_string(),
            )));
        }

        Ok(())
    }
}

/// Builds and runs search statements for one schema
#[derive(Debug, Clone)]
pub struct SearchComposer {
    schema: SearchSchema,
}

impl SearchComposer {
    pub fn new(schema: SearchSchema) -> Result<Self, StoreError> {
        schema.validate()?;
        Ok(Self { schema })
    }

    /// Composer over [`SearchSchema::posts`]
    pub fn posts() -> Self {
        Self {
            schema: SearchSchema::posts(),
        }
    }

    pub fn schema(&self) -> &SearchSchema {
        &self.schema
    }

    /// Approved rows whose text columns contain `term`, in default order
    pub fn simple_query(&self, term: &str) -> Statement {
        self.advanced_query(&QuerySpec::search(term))
    }

    /// Approved rows matching every supplied criterion
    pub fn advanced_query(&self, spec: &QuerySpec) -> Statement {
        let mut builder = QueryBuilder::new()
            .filter(QueryFilter::is_true(self.schema.approval_column))
            .filter_opt(spec.search_term().map(|term| self.text_match(term)));

        for (field, values) in spec.filters() {
            if values.is_empty() {
                continue;
            }
            if let Some(column) = self.schema.filter_column(field) {
                let values = values.iter().map(|v| Param::from(*v)).collect();
                builder = builder.filter(QueryFilter::in_values(column, values));
            }
        }

        let (column, order) = self.resolve_sort(spec);
        let (where_clause, order_clause, params) = builder.order_by(column, order).build();

        Statement::with_params(
            format!("{} {} {};", self.schema.select, where_clause, order_clause),
            params,
        )
    }

    /// Simple shape for a bare search term, advanced shape otherwise
    pub fn build_search(&self, spec: &QuerySpec) -> Statement {
        match spec.search_term() {
            Some(term) if spec.is_simple() => self.simple_query(term),
            _ => self.advanced_query(spec),
        }
    }

    pub async fn search<E>(&self, exec: &mut E, term: &str) -> Result<RowSet, StoreError>
    where
        E: StatementExecutor + ?Sized,
    {
        exec.execute(&self.simple_query(term)).await
    }

    pub async fn advanced_search<E>(&self, exec: &mut E, spec: &QuerySpec) -> Result<RowSet, StoreError>
    where
        E: StatementExecutor + ?Sized,
    {
        exec.execute(&self.advanced_query(spec)).await
    }

    pub async fn run<E>(&self, exec: &mut E, spec: &QuerySpec) -> Result<RowSet, StoreError>
    where
        E: StatementExecutor + ?Sized,
    {
        exec.execute(&self.build_search(spec)).await
    }

    fn text_match(&self, term: &str) -> QueryFilter {
        QueryFilter::or(
            self.schema
                .text_columns
                .iter()
                .map(|column| QueryFilter::contains_ignore_case(column, term))
                .collect(),
        )
    }

    /// Unknown or missing sort keys fall back to the schema default
    fn resolve_sort(&self, spec: &QuerySpec) -> (&'static str, SortOrder) {
        let order = spec
            .sort_ascending
            .map(SortOrder::from_ascending)
            .unwrap_or(self.schema.default_order);

        let key = match spec.sort_by.as_deref() {
            None => self.schema.default_sort,
            Some(name) => SortKey::parse(name).unwrap_or_else(|| {
                tracing::warn!(
                    sort_by = name,
                    fallback = %self.schema.default_sort,
                    "unknown sort key, using default"
                );
                self.schema.default_sort
            }),
        };

        let column = self
            .schema
            .sort_column(key)
            .or_else(|| self.schema.sort_column(self.schema.default_sort))
            .unwrap_or(self.schema.approval_column);

        (column, order)
    }
}
