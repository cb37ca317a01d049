//! Helpers for queries whose WHERE/HAVING clauses depend on caller-supplied
//! filters.
//!
//! Statements are assembled with [`sqlx::QueryBuilder`]; values only ever go
//! through `push_bind`, so nothing the caller passes is spliced into the SQL
//! text.

use sqlx::{Encode, Postgres, QueryBuilder, Type};

/// One predicate list (`WHERE` or `HAVING`) being written into a builder.
///
/// The first predicate is prefixed with the clause keyword, later ones
/// with `AND`.
#[derive(Debug, Clone, Copy)]
pub struct Clause {
    keyword: &'static str,
    open: bool,
}

impl Clause {
    pub fn where_clause() -> Self {
        Self {
            keyword: "WHERE",
            open: false,
        }
    }

    pub fn having_clause() -> Self {
        Self {
            keyword: "HAVING",
            open: false,
        }
    }

    /// Append `<lhs> $n`, binding `value` as `$n`.
    ///
    /// `lhs` is SQL written by this crate, e.g. `"properties.city LIKE"`.
    pub fn push<'args, T>(
        &mut self,
        builder: &mut QueryBuilder<'args, Postgres>,
        lhs: &str,
        value: T,
    ) where
        T: 'args + Encode<'args, Postgres> + Type<Postgres> + Send,
    {
        if self.open {
            builder.push(" AND ");
        } else {
            builder.push("\n").push(self.keyword).push(" ");
            self.open = true;
        }
        builder.push(lhs).push(" ").push_bind(value);
    }
}

/// Wrap `needle` for a substring `LIKE` match, escaping `%`, `_` and `\` so
/// they match literally.
pub fn like_contains(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
