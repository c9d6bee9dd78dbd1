//! Statement text for partition DDL.
//!
//! Schema and table names come from trusted configuration, but they are
//! still quoted whenever they are not plain lower-case identifiers.

/// Quotes an identifier the way PostgreSQL's `quote_ident` does, minus the
/// keyword check: bare when it is `[a-z_][a-z0-9_$]*`, double-quoted otherwise.
pub fn quote_ident(ident: &str) -> String {
    let mut chars = ident.chars();
    let plain = match chars.next() {
        Some(first) if first == '_' || first.is_ascii_lowercase() => {
            chars.all(|c| c == '_' || c == '$' || c.is_ascii_lowercase() || c.is_ascii_digit())
        }
        _ => false,
    };

    if plain {
        ident.to_string()
    } else {
        format!("\"{}\"", ident.replace('"', "\"\""))
    }
}

/// `schema.table` with both parts quoted as needed
pub fn qualified(schema: &str, table: &str) -> String {
    format!("{}.{}", quote_ident(schema), quote_ident(table))
}

/// Single-quoted string literal
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Escapes `LIKE` wildcards so `value` only matches itself
pub fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

pub fn create_partition(
    schema: &str,
    child: &str,
    parent: &str,
    lower: &str,
    upper: &str,
) -> String {
    format!(
        "create table if not exists {} partition of {} for values from ({}) to ({})",
        qualified(schema, child),
        qualified(schema, parent),
        quote_literal(lower),
        quote_literal(upper),
    )
}

pub fn drop_table(schema: &str, child: &str, cascade: bool) -> String {
    let mut sql = format!("drop table if exists {}", qualified(schema, child));
    if cascade {
        sql.push_str(" cascade");
    }
    sql
}

pub fn truncate_table(schema: &str, child: &str) -> String {
    format!("truncate table {} cascade", qualified(schema, child))
}
