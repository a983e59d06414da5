//! Parameterized statements
//!
//! The template/parameter count contract belongs to the caller: the layer does
//! not compare [`Statement::placeholder_count`] with the bound values, and a
//! mismatch surfaces as a statement error from the store.

use crate::param::Param;
use crate::placeholder::count_placeholders;

/// A statement template with positional `?` placeholders and its bound values
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    template: String,
    params: Vec<Param>,
}

impl Statement {
    /// A statement with no bound values yet
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            params: Vec::new(),
        }
    }

    pub fn with_params(template: impl Into<String>, params: Vec<Param>) -> Self {
        Self {
            template: template.into(),
            params,
        }
    }

    /// Bind the next positional value
    pub fn bind(mut self, value: impl Into<Param>) -> Self {
        self.params.push(value.into());
        self
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    /// Number of `?` tokens in the template
    pub fn placeholder_count(&self) -> usize {
        count_placeholders(&self.template)
    }
}

impl From<&str> for Statement {
    fn from(template: &str) -> Self {
        Statement::new(template)
    }
}

impl From<String> for Statement {
    fn from(template: String) -> Self {
        Statement::new(template)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::param::ParamType;

    #[test]
    fn test_bind_keeps_order() {
        let stmt = Statement::new("INSERT INTO t (id, val, n, flag) VALUES (?, ?, ?, ?);")
            .bind("abcd")
            .bind("hello")
            .bind(3)
            .bind(None::<bool>);

        assert_eq!(
            stmt.params(),
            &[
                Param::Text("abcd".to_string()),
                Param::Text("hello".to_string()),
                Param::Int4(3),
                Param::Null(ParamType::Bool),
            ]
        );
        assert_eq!(stmt.placeholder_count(), 4);
    }

    #[test]
    fn test_from_str_has_no_params() {
        let stmt: Statement = "SELECT 1".into();
        assert!(stmt.params().is_empty());
        assert_eq!(stmt.template(), "SELECT 1");
    }
}
