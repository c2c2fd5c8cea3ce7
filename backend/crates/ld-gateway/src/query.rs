//! Row queries in the shape of the backend's REST filters.
//!
//! A [`Query`] renders to PostgREST query parameters for the HTTP gateway
//! and can also be evaluated directly against JSON rows, which is what the
//! in-memory gateway does.

use std::cmp::Ordering;

use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "asc",
            SortOrder::Descending => "desc",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    Eq { column: String, value: String },
    In { column: String, values: Vec<String> },
    /// Case-insensitive LIKE; `%` matches any run of characters, `_` one character
    ILike { column: String, pattern: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    table: String,
    columns: Option<String>,
    filters: Vec<Filter>,
    order: Vec<(String, SortOrder)>,
    limit: Option<usize>,
}

impl Query {
    pub fn table(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: None,
            filters: Vec::new(),
            order: Vec::new(),
            limit: None,
        }
    }

    /// Restrict the returned columns (defaults to all)
    pub fn select(mut self, columns: impl Into<String>) -> Self {
        self.columns = Some(columns.into());
        self
    }

    pub fn eq(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push(Filter::Eq {
            column: column.into(),
            value: value.into(),
        });
        self
    }

    pub fn in_list<I, S>(mut self, column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filters.push(Filter::In {
            column: column.into(),
            values: values.into_iter().map(Into::into).collect(),
        });
        self
    }

    pub fn ilike(mut self, column: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.filters.push(Filter::ILike {
            column: column.into(),
            pattern: pattern.into(),
        });
        self
    }

    pub fn order(mut self, column: impl Into<String>, order: SortOrder) -> Self {
        self.order.push((column.into(), order));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn table_name(&self) -> &str {
        &self.table
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    /// PostgREST query parameters, in a stable order.
    pub fn to_query_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();

        if let Some(ref columns) = self.columns {
            params.push((String::from("select"), columns.clone()));
        }

        for filter in &self.filters {
            let param = match filter {
                Filter::Eq { column, value } => (column.clone(), format!("eq.{}", value)),
                Filter::In { column, values } => {
                    let list: Vec<String> = values.iter().map(|v| quote_list_item(v)).collect();
                    (column.clone(), format!("in.({})", list.join(",")))
                }
                Filter::ILike { column, pattern } => {
                    (column.clone(), format!("ilike.{}", pattern.replace('%', "*")))
                }
            };
            params.push(param);
        }

        if !self.order.is_empty() {
            let order: Vec<String> = self
                .order
                .iter()
                .map(|(column, order)| format!("{}.{}.nullslast", column, order.as_str()))
                .collect();
            params.push((String::from("order"), order.join(",")));
        }

        if let Some(limit) = self.limit {
            params.push((String::from("limit"), limit.to_string()));
        }

        params
    }

    /// True when `row` passes every filter
    pub fn matches(&self, row: &Value) -> bool {
        self.filters.iter().all(|filter| match filter {
            Filter::Eq { column, value } => column_text(row, column).is_some_and(|t| t == *value),
            Filter::In { column, values } => {
                column_text(row, column).is_some_and(|t| values.contains(&t))
            }
            Filter::ILike { column, pattern } => column_text(row, column).is_some_and(|t| {
                like_match(&pattern.to_lowercase(), &t.to_lowercase())
            }),
        })
    }

    /// Filter, sort and limit `rows` the way the backend would.
    pub fn apply(&self, rows: &[Value]) -> Vec<Value> {
        let mut selected: Vec<Value> = rows.iter().filter(|row| self.matches(row)).cloned().collect();

        if !self.order.is_empty() {
            selected.sort_by(|a, b| self.compare_rows(a, b));
        }

        if let Some(limit) = self.limit {
            selected.truncate(limit);
        }

        selected
    }

    fn compare_rows(&self, a: &Value, b: &Value) -> Ordering {
        for (column, order) in &self.order {
            let left = a.get(column).filter(|v| !v.is_null());
            let right = b.get(column).filter(|v| !v.is_null());

            // Nulls sort last in both directions
            let ordering = match (left, right) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(x), Some(y)) => match order {
                    SortOrder::Ascending => compare_values(x, y),
                    SortOrder::Descending => compare_values(x, y).reverse(),
                },
            };

            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }
}

/// Scalar column value as the text the REST filters compare against.
pub(crate) fn value_as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn column_text(row: &Value, column: &str) -> Option<String> {
    row.get(column).and_then(value_as_text)
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or(0.0);
            let y = y.as_f64().unwrap_or(0.0);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => a.to_string().cmp(&b.to_string()),
    }
}

fn quote_list_item(value: &str) -> String {
    if value.contains([',', '(', ')', '"', ' ']) {
        format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
    } else {
        value.to_string()
    }
}

/// SQL LIKE over chars. Both sides are expected to be lowercased already.
fn like_match(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();

    // matches[j] == pattern[..i] matches text[..j]
    let mut matches = vec![false; text.len() + 1];
    matches[0] = true;

    for &p in &pattern {
        let mut next = vec![false; text.len() + 1];
        match p {
            '%' => {
                let mut seen = false;
                for j in 0..=text.len() {
                    seen = seen || matches[j];
                    next[j] = seen;
                }
            }
            '_' => {
                for j in 1..=text.len() {
                    next[j] = matches[j - 1];
                }
            }
            c => {
                for j in 1..=text.len() {
                    next[j] = matches[j - 1] && text[j - 1] == c;
                }
            }
        }
        matches = next;
    }

    matches[text.len()]
}
