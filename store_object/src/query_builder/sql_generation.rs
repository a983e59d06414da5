//! SQL rendering for filters and ordering
//!
//! Every fragment that needs a value writes exactly one `?` for it and pushes
//! the value at the same moment, so placeholders and parameters cannot drift
//! apart however the filters nest.

use crate::param::Param;
use crate::query_builder::filter::{LogicalOperator, QueryCondition, QueryFilter, QueryOperator};
use crate::query_builder::ordering::SortOrder;

pub struct SqlGenerator;

impl SqlGenerator {
    /// Build WHERE clause from conditions
    pub fn build_where_clause(conditions: &[QueryFilter]) -> (String, Vec<Param>) {
        if conditions.is_empty() {
            return ("".to_string(), Vec::new());
        }

        let mut values = Vec::new();

        let conditions_sql = conditions
            .iter()
            .map(|condition| Self::build_condition_sql(condition, &mut values))
            .collect::<Vec<_>>()
            .join(" AND ");

        (format!("WHERE {}", conditions_sql), values)
    }

    fn build_condition_sql(filter: &QueryFilter, values: &mut Vec<Param>) -> String {
        match filter {
            QueryFilter::Condition(condition) => Self::build_single_condition_sql(condition, values),
            QueryFilter::Group { operator, filters } if filters.is_empty() => match operator {
                LogicalOperator::And => "1=1".to_string(),
                LogicalOperator::Or => "1=0".to_string(),
            },
            QueryFilter::Group { operator, filters } => {
                let operator_str = match operator {
                    LogicalOperator::And => " AND ",
                    LogicalOperator::Or => " OR ",
                };

                let group_conditions = filters
                    .iter()
                    .map(|f| Self::build_condition_sql(f, values))
                    .collect::<Vec<_>>()
                    .join(operator_str);

                format!("({})", group_conditions)
            }
        }
    }

    fn build_single_condition_sql(condition: &QueryCondition, values: &mut Vec<Param>) -> String {
        let field = &condition.field;

        match &condition.operator {
            QueryOperator::ILike => match condition.values.first() {
                Some(pattern) => {
                    values.push(pattern.clone());
                    format!("{} ILIKE ?", field)
                }
                None => "1=0".to_string(),
            },
            // Empty IN matches nothing
            QueryOperator::In if condition.values.is_empty() => "1=0".to_string(),
            QueryOperator::In => {
                let placeholders = vec!["?"; condition.values.len()].join(", ");
                values.extend(condition.values.iter().cloned());
                format!("{} IN ({})", field, placeholders)
            }
            QueryOperator::IsTrue => format!("{} IS TRUE", field),
        }
    }

    /// Build ORDER BY clause
    pub fn build_order_clause(order_by: &[(String, SortOrder)]) -> String {
        if order_by.is_empty() {
            return "".to_string();
        }

        let order_items: Vec<String> = order_by
            .iter()
            .map(|(field, order)| format!("{} {}", field, order.to_sql()))
            .collect();

        format!("ORDER BY {}", order_items.join(", "))
    }
}
