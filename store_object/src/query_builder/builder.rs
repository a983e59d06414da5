use crate::param::Param;
use crate::query_builder::filter::QueryFilter;
use crate::query_builder::ordering::SortOrder;
use crate::query_builder::sql_generation::SqlGenerator;

/// Folds filters and sort keys into a `WHERE` / `ORDER BY` pair
#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    pub(crate) conditions: Vec<QueryFilter>,
    pub(crate) order_by: Vec<(String, SortOrder)>,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a filter condition
    pub fn filter(mut self, filter: QueryFilter) -> Self {
        self.conditions.push(filter);
        self
    }

    /// Add a filter only when there is one
    pub fn filter_opt(self, filter: Option<QueryFilter>) -> Self {
        match filter {
            Some(filter) => self.filter(filter),
            None => self,
        }
    }

    /// Add ordering
    pub fn order_by(mut self, field: &str, order: SortOrder) -> Self {
        self.order_by.push((field.to_string(), order));
        self
    }

    /// Build WHERE clause
    pub fn build_where_clause(&self) -> (String, Vec<Param>) {
        SqlGenerator::build_where_clause(&self.conditions)
    }

    /// Build ORDER BY clause
    pub fn build_order_clause(&self) -> String {
        SqlGenerator::build_order_clause(&self.order_by)
    }

    /// Build complete query parts (WHERE, ORDER BY, Values)
    pub fn build(&self) -> (String, String, Vec<Param>) {
        let (where_clause, values) = self.build_where_clause();
        let order_clause = self.build_order_clause();

        (where_clause, order_clause, values)
    }
}
