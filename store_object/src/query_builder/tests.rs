//! Query builder and search composer tests

use crate::param::Param;
use crate::placeholder::{count_placeholders, NumberedPlaceholders, PlaceholderTranslator};
use crate::query_builder::{
    escape_like, LogicalOperator, QueryBuilder, QueryFilter, QueryOperator, QuerySpec,
    SearchComposer, SearchSchema, SortKey, SortOrder, SqlGenerator,
};
use serde_json::json;

fn where_part(template: &str) -> &str {
    let start = template.find("WHERE").expect("statement has a WHERE clause");
    let end = template.find(" ORDER BY").expect("statement has an ORDER BY clause");
    &template[start..end]
}

fn text(value: &str) -> Param {
    Param::from(value)
}

fn ints(values: &[i64]) -> Vec<Param> {
    values.iter().map(|v| Param::Int8(*v)).collect()
}

// ========================================
// SQL Generation
// ========================================

#[test]
fn test_sql_generation_empty_conditions() {
    let (where_clause, values) = SqlGenerator::build_where_clause(&[]);
    assert_eq!(where_clause, "");
    assert!(values.is_empty());
}

#[test]
fn test_sql_generation_in_list_has_one_placeholder_per_value() {
    let filter = QueryFilter::in_values("program_id", ints(&[1, 2, 3]));
    let (where_clause, values) = SqlGenerator::build_where_clause(&[filter]);

    assert_eq!(where_clause, "WHERE program_id IN (?, ?, ?)");
    assert_eq!(values, ints(&[1, 2, 3]));
}

#[test]
fn test_sql_generation_empty_in_matches_nothing() {
    let filter = QueryFilter::in_values("status", vec![]);
    let (where_clause, values) = SqlGenerator::build_where_clause(&[filter]);
    assert_eq!(where_clause, "WHERE 1=0");
    assert!(values.is_empty());
}

#[test]
fn test_sql_generation_ilike_without_pattern_matches_nothing() {
    let filter = QueryFilter::condition("content", QueryOperator::ILike, vec![]);
    let (where_clause, values) = SqlGenerator::build_where_clause(&[filter]);
    assert_eq!(where_clause, "WHERE 1=0");
    assert!(values.is_empty());
}

#[test]
fn test_sql_generation_is_true_binds_nothing() {
    let (where_clause, values) = SqlGenerator::build_where_clause(&[QueryFilter::is_true("approved")]);
    assert_eq!(where_clause, "WHERE approved IS TRUE");
    assert!(values.is_empty());
}

#[test]
fn test_sql_generation_or_group_keeps_precedence() {
    let filters = vec![
        QueryFilter::is_true("approved"),
        QueryFilter::or(vec![
            QueryFilter::ilike("content", "%a%"),
            QueryFilter::ilike("location", "%b%"),
        ]),
        QueryFilter::in_values("rating", ints(&[4])),
    ];

    let (where_clause, values) = SqlGenerator::build_where_clause(&filters);

    assert_eq!(
        where_clause,
        "WHERE approved IS TRUE AND (content ILIKE ? OR location ILIKE ?) AND rating IN (?)"
    );
    assert_eq!(values, vec![text("%a%"), text("%b%"), Param::Int8(4)]);
}

#[test]
fn test_sql_generation_empty_groups() {
    let (where_clause, _) = SqlGenerator::build_where_clause(&[QueryFilter::or(vec![])]);
    assert_eq!(where_clause, "WHERE 1=0");

    let all = QueryFilter::Group {
        operator: LogicalOperator::And,
        filters: vec![],
    };
    let (where_clause, _) = SqlGenerator::build_where_clause(&[all]);
    assert_eq!(where_clause, "WHERE 1=1");
}

#[test]
fn test_sql_injection_values_stay_out_of_template() {
    let payload = "'; DROP TABLE post; --";
    let filter = QueryFilter::contains_ignore_case("name", payload);
    let (where_clause, values) = SqlGenerator::build_where_clause(&[filter]);

    assert!(!where_clause.contains("DROP"));
    assert_eq!(values, vec![text(&format!("%{}%", payload))]);
}

#[test]
fn test_order_clause_generation() {
    assert_eq!(SqlGenerator::build_order_clause(&[]), "");

    let orders = vec![("name".to_string(), SortOrder::Asc)];
    assert_eq!(SqlGenerator::build_order_clause(&orders), "ORDER BY name ASC");
}

#[test]
fn test_sort_order_sql_conversion() {
    assert_eq!(SortOrder::Asc.to_sql(), "ASC");
    assert_eq!(SortOrder::Desc.to_sql(), "DESC");
    assert_eq!(SortOrder::from_ascending(false), SortOrder::Desc);
}

// ========================================
// QueryBuilder
// ========================================

#[test]
fn test_query_builder_empty_state() {
    let (where_clause, order_clause, values) = QueryBuilder::new().build();

    assert_eq!(where_clause, "");
    assert_eq!(order_clause, "");
    assert!(values.is_empty());
}

#[test]
fn test_query_builder_filter_opt() {
    let builder = QueryBuilder::new()
        .filter_opt(None)
        .filter_opt(Some(QueryFilter::is_true("approved")))
        .order_by("create_time", SortOrder::Desc);

    let (where_clause, order_clause, values) = builder.build();
    assert_eq!(where_clause, "WHERE approved IS TRUE");
    assert_eq!(order_clause, "ORDER BY create_time DESC");
    assert!(values.is_empty());
}

#[test]
fn test_query_builder_many_lists_stay_aligned() {
    let mut builder = QueryBuilder::new();
    for i in 0..100 {
        let values = (0..=i % 4).map(Param::Int8).collect();
        builder = builder.filter(QueryFilter::in_values(&format!("field_{}", i), values));
    }

    let (where_clause, _, values) = builder.build();

    assert_eq!(where_clause.matches(" AND ").count(), 99);
    assert_eq!(values.len(), 25 * (1 + 2 + 3 + 4));
    assert_eq!(count_placeholders(&where_clause), values.len());
}

// ========================================
// LIKE escaping
// ========================================

#[test]
fn test_escape_like() {
    assert_eq!(escape_like("pizza"), "pizza");
    assert_eq!(escape_like("100%"), "100\\%");
    assert_eq!(escape_like("a_b"), "a\\_b");
    assert_eq!(escape_like("back\\slash"), "back\\\\slash");
}

#[test]
fn test_contains_ignore_case_wraps_term() {
    let filter = QueryFilter::contains_ignore_case("post.location", "50% off");
    let (where_clause, values) = SqlGenerator::build_where_clause(&[filter]);

    assert_eq!(where_clause, "WHERE post.location ILIKE ?");
    assert_eq!(values, vec![text("%50\\% off%")]);
}

// ========================================
// QuerySpec
// ========================================

#[test]
fn test_query_spec_deserializes_form_names() {
    let spec: QuerySpec = serde_json::from_value(json!({
        "search": "pizza",
        "categoryIDs": [1, 2],
        "locationTypeIDs": [6],
        "statusIDs": [],
        "ratings": [4, 5],
        "sortBy": "rating",
        "sortAscending": false
    }))
    .unwrap();

    assert_eq!(spec.search_term(), Some("pizza"));
    assert_eq!(spec.program_ids, vec![1, 2]);
    assert_eq!(spec.location_type_ids, vec![6]);
    assert!(spec.status_ids.is_empty());
    assert_eq!(spec.ratings, vec![4, 5]);
    assert_eq!(spec.sort_by.as_deref(), Some("rating"));
    assert_eq!(spec.sort_ascending, Some(false));
}

#[test]
fn test_query_spec_missing_fields_default() {
    let spec: QuerySpec = serde_json::from_value(json!({})).unwrap();
    assert_eq!(spec, QuerySpec::default());
    assert!(!spec.has_filters());
    assert!(!spec.is_simple());
}

#[test]
fn test_query_spec_blank_search_is_absent() {
    assert_eq!(QuerySpec::search("   ").search_term(), None);
    assert_eq!(QuerySpec::search("  pizza ").search_term(), Some("pizza"));
}

#[test]
fn test_sort_key_parse() {
    for key in SortKey::ALL {
        assert_eq!(SortKey::parse(key.as_str()), Some(key));
    }
    assert_eq!(SortKey::parse("location_type"), Some(SortKey::LocationType));
    assert_eq!(SortKey::parse("Rating"), None);
    assert_eq!(SortKey::parse("rating; DROP TABLE post"), None);
}

// ========================================
// SearchComposer
// ========================================

#[test]
fn test_posts_schema_is_valid() {
    assert!(SearchSchema::posts().validate().is_ok());
    assert!(SearchComposer::new(SearchSchema::posts()).is_ok());
}

#[test]
fn test_schema_with_unsafe_column_is_rejected() {
    let mut schema = SearchSchema::posts();
    schema.text_columns.push("post.content) OR (1=1");
    assert!(SearchComposer::new(schema).is_err());
}

#[test]
fn test_schema_without_default_sort_column_is_rejected() {
    let mut schema = SearchSchema::posts();
    schema.sort_columns.retain(|(key, _)| *key != SortKey::CreateTime);
    assert!(SearchComposer::new(schema).is_err());
}

#[test]
fn test_empty_spec_has_only_approval_predicate() {
    let stmt = SearchComposer::posts().build_search(&QuerySpec::default());

    assert_eq!(where_part(stmt.template()), "WHERE post.approved IS TRUE");
    assert!(stmt.template().ends_with("ORDER BY post.create_time ASC;"));
    assert!(stmt.params().is_empty());
    assert_eq!(stmt.placeholder_count(), 0);
}

#[test]
fn test_simple_search_matches_text_columns() {
    let composer = SearchComposer::posts();
    let stmt = composer.build_search(&QuerySpec::search("Pizza"));

    assert_eq!(
        where_part(stmt.template()),
        "WHERE post.approved IS TRUE AND (post.content ILIKE ? OR post.location ILIKE ? OR program.name ILIKE ?)"
    );
    assert_eq!(stmt.params(), &[text("%Pizza%"), text("%Pizza%"), text("%Pizza%")]);
    assert_eq!(stmt, composer.simple_query("Pizza"));
}

#[test]
fn test_single_value_filter_binds_one_parameter() {
    let spec = QuerySpec {
        program_ids: vec![7],
        ..QuerySpec::default()
    };
    let stmt = SearchComposer::posts().build_search(&spec);

    assert_eq!(
        where_part(stmt.template()),
        "WHERE post.approved IS TRUE AND post.program_id IN (?)"
    );
    assert_eq!(stmt.params(), &[Param::Int8(7)]);
}

#[test]
fn test_empty_filter_list_is_omitted() {
    let spec = QuerySpec {
        program_ids: vec![],
        ratings: vec![5],
        ..QuerySpec::default()
    };
    let stmt = SearchComposer::posts().build_search(&spec);
    let where_clause = where_part(stmt.template());

    assert!(!where_clause.contains("post.program_id"));
    assert!(!stmt.template().contains("IN ()"));
    assert_eq!(where_clause, "WHERE post.approved IS TRUE AND rating.general IN (?)");
    assert_eq!(stmt.params(), &[Param::Int8(5)]);
}

#[test]
fn test_advanced_search_all_fragments_in_order() {
    let spec = QuerySpec {
        search: Some("beach".to_string()),
        program_ids: vec![1, 2],
        location_type_ids: vec![6],
        status_ids: vec![1, 3],
        ratings: vec![4, 5],
        sort_by: Some("rating".to_string()),
        sort_ascending: Some(false),
    };
    let stmt = SearchComposer::posts().build_search(&spec);

    assert_eq!(
        where_part(stmt.template()),
        "WHERE post.approved IS TRUE \
         AND (post.content ILIKE ? OR post.location ILIKE ? OR program.name ILIKE ?) \
         AND post.program_id IN (?, ?) \
         AND post.location_type_id IN (?) \
         AND app_user.status_id IN (?, ?) \
         AND rating.general IN (?, ?)"
    );
    assert!(stmt.template().ends_with("ORDER BY rating.general DESC;"));

    let mut expected = vec![text("%beach%"), text("%beach%"), text("%beach%")];
    expected.extend(ints(&[1, 2, 6, 1, 3, 4, 5]));
    assert_eq!(stmt.params(), expected.as_slice());
    assert_eq!(stmt.placeholder_count(), stmt.params().len());
}

#[test]
fn test_category_filter_sorted_by_rating_descending() {
    let spec = QuerySpec {
        program_ids: vec![1, 2],
        ..QuerySpec::default()
    }
    .sort_by(SortKey::Rating, false);
    let stmt = SearchComposer::posts().build_search(&spec);

    assert!(where_part(stmt.template()).contains("post.program_id IN (?, ?)"));
    assert!(stmt.template().ends_with("ORDER BY rating.general DESC;"));
    assert_eq!(stmt.params(), ints(&[1, 2]).as_slice());
}

#[test]
fn test_each_sort_key_has_a_column() {
    let composer = SearchComposer::posts();
    let expected = [
        (SortKey::Program, "program.name"),
        (SortKey::LocationType, "location_type.name"),
        (SortKey::UserStatus, "user_status.name"),
        (SortKey::Rating, "rating.general"),
        (SortKey::CreateTime, "post.create_time"),
    ];

    for (key, column) in expected {
        let stmt = composer.build_search(&QuerySpec::default().sort_by(key, true));
        assert!(
            stmt.template().ends_with(&format!("ORDER BY {} ASC;", column)),
            "{} should sort by {}",
            key,
            column
        );
    }
}

#[test]
fn test_unknown_sort_key_falls_back_to_default() {
    let spec = QuerySpec {
        sort_by: Some("popularity".to_string()),
        sort_ascending: Some(false),
        ..QuerySpec::default()
    };
    let stmt = SearchComposer::posts().build_search(&spec);

    assert!(stmt.template().ends_with("ORDER BY post.create_time DESC;"));
    assert!(!stmt.template().contains("popularity"));
}

#[test]
fn test_search_term_with_placeholder_character_is_bound() {
    let stmt = SearchComposer::posts().build_search(&QuerySpec::search("why?"));

    assert_eq!(stmt.placeholder_count(), 3);
    assert_eq!(stmt.params()[0], text("%why?%"));

    let translated = NumberedPlaceholders.translate(stmt.template());
    assert!(translated.contains("post.content ILIKE $1"));
    assert!(translated.contains("program.name ILIKE $3"));
    assert!(!translated.contains('?'));
}
