//! SQL identifier handling.
//!
//! [`Ident`] represents a schema/table/column reference in dotted notation
//! (`schema.table.column`). Each segment is quoted independently by the
//! dialect and the segments are rejoined with `.`.
//!
//! Segments are taken verbatim: spaces and other punctuation are allowed
//! (`Order Details`), and an embedded closing delimiter is escaped by
//! doubling it.
//!
//! # Example
//! ```ignore
//! use sqlbridge::Ident;
//!
//! let ident = Ident::parse("Products.SupplierID");
//! assert_eq!(ident.to_sql('"', '"'), r#""Products"."SupplierID""#);
//! ```

/// A SQL identifier (column, table, or schema name), split on `.`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub parts: Vec<String>,
}

impl Ident {
    /// Split an identifier string into its dotted segments.
    pub fn parse(s: &str) -> Self {
        Self {
            parts: s.split('.').map(str::to_string).collect(),
        }
    }

    /// Render the identifier with each segment wrapped in `open`/`close`.
    pub fn to_sql(&self, open: char, close: char) -> String {
        let mut cap = self.parts.len().saturating_sub(1); // dots
        for part in &self.parts {
            cap += part.len() + 2; // surrounding quotes (escapes may add more)
        }
        let mut out = String::with_capacity(cap);
        self.write_sql(open, close, &mut out);
        out
    }

    pub(crate) fn write_sql(&self, open: char, close: char, out: &mut String) {
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                out.push('.');
            }
            out.push(open);
            for ch in part.chars() {
                if ch == close {
                    out.push(close);
                    out.push(close);
                } else {
                    out.push(ch);
                }
            }
            out.push(close);
        }
    }
}

/// Returns `true` when `s` reads like a function call or expression.
///
/// Such strings (`SUM("Quantity")`, `COUNT(*)`) are emitted unquoted.
pub(crate) fn is_expression(s: &str) -> bool {
    s.contains('(')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ident_simple() {
        assert_eq!(Ident::parse("users").to_sql('"', '"'), r#""users""#);
    }

    #[test]
    fn ident_dotted() {
        assert_eq!(
            Ident::parse("public.users").to_sql('"', '"'),
            r#""public"."users""#
        );
    }

    #[test]
    fn ident_with_space() {
        assert_eq!(
            Ident::parse("Order Details").to_sql('`', '`'),
            "`Order Details`"
        );
    }

    #[test]
    fn ident_escapes_closing_delimiter() {
        assert_eq!(Ident::parse(r#"has"quote"#).to_sql('"', '"'), r#""has""quote""#);
        assert_eq!(Ident::parse("odd]name").to_sql('[', ']'), "[odd]]name]");
    }

    #[test]
    fn expression_detection() {
        assert!(is_expression("SUM(\"Quantity\")"));
        assert!(!is_expression("Quantity"));
    }
}
