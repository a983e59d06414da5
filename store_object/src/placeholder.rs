//! Placeholder translation
//!
//! Statement templates are written with positional `?` tokens. The translator
//! rewrites them into whatever the underlying store expects before execution.
//!
//! Known limitation: the rewrite is purely lexical. A `?` inside a quoted
//! literal, a comment, or PostgreSQL's JSONB `?` operator is treated as a
//! placeholder like any other. Bind such text as a parameter instead of
//! writing it into the template.

use std::borrow::Cow;

/// The generic placeholder token callers write in templates
pub const PLACEHOLDER: char = '?';

/// Rewrites generic `?` placeholders into a store's native parameter syntax
pub trait PlaceholderTranslator: Send + Sync {
    /// Translate a template, preserving placeholder order and count
    fn translate<'a>(&self, template: &'a str) -> Cow<'a, str>;
}

/// PostgreSQL style: `?`, `?`, `?` become `$1`, `$2`, `$3`
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberedPlaceholders;

impl PlaceholderTranslator for NumberedPlaceholders {
    fn translate<'a>(&self, template: &'a str) -> Cow<'a, str> {
        if !template.contains(PLACEHOLDER) {
            return Cow::Borrowed(template);
        }

        let mut translated = String::with_capacity(template.len() + 8);
        let mut param_counter = 1;

        for c in template.chars() {
            if c == PLACEHOLDER {
                translated.push('$');
                translated.push_str(&param_counter.to_string());
                param_counter += 1;
            } else {
                translated.push(c);
            }
        }

        Cow::Owned(translated)
    }
}

/// For stores that accept `?` natively
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughPlaceholders;

impl PlaceholderTranslator for PassthroughPlaceholders {
    fn translate<'a>(&self, template: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(template)
    }
}

/// Count the generic placeholders in a template
pub fn count_placeholders(template: &str) -> usize {
    template.matches(PLACEHOLDER).count()
}
