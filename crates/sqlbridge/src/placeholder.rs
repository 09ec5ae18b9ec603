//! Statement parameter binding.
//!
//! SQL handed to a [`Connection`](crate::Connection) may use either
//! positional `?` placeholders or named `:name` placeholders, never both.
//! [`bind_placeholders`] checks the supplied [`Params`] against the
//! placeholders found in the SQL and rewrites them into the style the backend
//! expects (`$1, $2, ...` for PostgreSQL, `?` elsewhere).

use crate::error::{DbalError, DbalResult};
use crate::value::Value;
use std::collections::HashMap;

/// Placeholder syntax understood by a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderStyle {
    /// `?`
    QuestionMark,
    /// `$1`, `$2`, ...
    Numbered,
}

/// Values bound to a statement.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Params {
    #[default]
    None,
    Positional(Vec<Value>),
    /// Names may be given with or without the leading `:`.
    Named(Vec<(String, Value)>),
}

impl Params {
    pub fn positional<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Params::Positional(values.into_iter().map(Into::into).collect())
    }

    pub fn named<I, K, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Params::Named(
            values
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        match self {
            Params::None => 0,
            Params::Positional(v) => v.len(),
            Params::Named(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Vec<Value>> for Params {
    fn from(values: Vec<Value>) -> Self {
        Params::Positional(values)
    }
}

/// SQL with placeholders rewritten and the values in binding order.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundSql {
    pub sql: String,
    pub values: Vec<Value>,
}

#[derive(Debug)]
enum Piece {
    Text(String),
    Positional,
    Named(String),
}

/// Split SQL into literal text and placeholders, skipping quoted regions.
fn scan(sql: &str) -> Vec<Piece> {
    let chars: Vec<char> = sql.chars().collect();
    let mut pieces = Vec::new();
    let mut text = String::new();
    let mut quote: Option<char> = None;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if let Some(q) = quote {
            text.push(c);
            if c == q {
                quote = None;
            }
            i += 1;
            continue;
        }
        match c {
            '\'' | '"' | '`' => {
                quote = Some(c);
                text.push(c);
                i += 1;
            }
            '?' => {
                pieces.push(Piece::Text(std::mem::take(&mut text)));
                pieces.push(Piece::Positional);
                i += 1;
            }
            ':' if i + 1 < chars.len()
                && (chars[i + 1].is_ascii_alphabetic() || chars[i + 1] == '_')
                && (i == 0 || chars[i - 1] != ':') =>
            {
                let start = i + 1;
                let mut end = start;
                while end < chars.len() && (chars[end].is_ascii_alphanumeric() || chars[end] == '_')
                {
                    end += 1;
                }
                pieces.push(Piece::Text(std::mem::take(&mut text)));
                pieces.push(Piece::Named(chars[start..end].iter().collect()));
                i = end;
            }
            c => {
                text.push(c);
                i += 1;
            }
        }
    }
    pieces.push(Piece::Text(text));
    pieces
}

/// Check `params` against the placeholders in `sql` and rewrite them for `style`.
pub fn bind_placeholders(sql: &str, params: &Params, style: PlaceholderStyle) -> DbalResult<BoundSql> {
    let pieces = scan(sql);
    let positional = pieces
        .iter()
        .filter(|p| matches!(p, Piece::Positional))
        .count();
    let named = pieces
        .iter()
        .filter(|p| matches!(p, Piece::Named(_)))
        .count();

    if positional > 0 && named > 0 {
        return Err(DbalError::invalid_spec(
            "statement mixes positional (?) and named (:name) placeholders",
        ));
    }

    let lookup: HashMap<String, &Value> = match params {
        Params::Named(pairs) => {
            if positional > 0 {
                return Err(DbalError::invalid_spec(
                    "the statement uses positional (?) placeholders but named parameters were passed",
                ));
            }
            let mut map = HashMap::with_capacity(pairs.len());
            for (name, value) in pairs {
                let key = name.strip_prefix(':').unwrap_or(name).to_string();
                if map.insert(key, value).is_some() {
                    return Err(DbalError::invalid_spec(format!(
                        "parameter ':{}' was bound more than once",
                        name.trim_start_matches(':')
                    )));
                }
            }
            map
        }
        Params::Positional(values) => {
            if named > 0 {
                return Err(DbalError::invalid_spec(
                    "the statement uses named (:name) placeholders but positional parameters were passed",
                ));
            }
            if values.len() != positional {
                return Err(DbalError::invalid_spec(format!(
                    "statement has {positional} placeholder(s) but {} value(s) were bound",
                    values.len()
                )));
            }
            HashMap::new()
        }
        Params::None => {
            if positional + named > 0 {
                return Err(DbalError::invalid_spec(format!(
                    "statement has {} placeholder(s) but no values were bound",
                    positional + named
                )));
            }
            HashMap::new()
        }
    };

    let mut out = String::with_capacity(sql.len());
    let mut values = Vec::new();
    let positional_slice: &[Value] = match params {
        Params::Positional(v) => v,
        _ => &[],
    };
    let mut positional_values = positional_slice.iter();
    let mut numbered_names: HashMap<&str, usize> = HashMap::new();
    let mut used_names = 0usize;

    for piece in &pieces {
        match piece {
            Piece::Text(text) => out.push_str(text),
            Piece::Positional => {
                if let Some(v) = positional_values.next() {
                    values.push(v.clone());
                }
                push_placeholder(&mut out, style, values.len());
            }
            Piece::Named(name) => {
                let value = lookup.get(name.as_str()).ok_or_else(|| {
                    DbalError::invalid_spec(format!("no value was bound for parameter ':{name}'"))
                })?;
                match style {
                    PlaceholderStyle::Numbered => {
                        let idx = match numbered_names.get(name.as_str()) {
                            Some(idx) => *idx,
                            None => {
                                values.push((*value).clone());
                                used_names += 1;
                                numbered_names.insert(name.as_str(), values.len());
                                values.len()
                            }
                        };
                        push_placeholder(&mut out, style, idx);
                    }
                    PlaceholderStyle::QuestionMark => {
                        if !numbered_names.contains_key(name.as_str()) {
                            used_names += 1;
                            numbered_names.insert(name.as_str(), 0);
                        }
                        values.push((*value).clone());
                        push_placeholder(&mut out, style, values.len());
                    }
                }
            }
        }
    }

    if used_names < lookup.len() {
        return Err(DbalError::invalid_spec(format!(
            "{} named parameter(s) do not appear in the statement",
            lookup.len() - used_names
        )));
    }

    Ok(BoundSql { sql: out, values })
}

fn push_placeholder(out: &mut String, style: PlaceholderStyle, index: usize) {
    match style {
        PlaceholderStyle::QuestionMark => out.push('?'),
        PlaceholderStyle::Numbered => {
            out.push('$');
            out.push_str(&index.to_string());
        }
    }
}
