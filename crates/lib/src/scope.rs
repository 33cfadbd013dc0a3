//! Query scopes.
//!
//! A [`Query`] is a backend-neutral description of a filtered, optionally
//! ordered slice of one table. Backends either evaluate it directly
//! (in-memory) or render it to SQL.
//!
//! [`GroupScope`] builds the filter selecting one group: every configured
//! group-by column must equal the given value. With no group-by columns the
//! scope selects the whole table.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::SortableConfig;
use crate::record::SortableRecord;
use crate::value::Value;

/// Comparison operator of a [`Condition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

impl Operator {
    /// SQL spelling of the operator.
    pub fn as_sql(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Ne => "<>",
            Operator::Gt => ">",
            Operator::Ge => ">=",
            Operator::Lt => "<",
            Operator::Le => "<=",
        }
    }

    /// Evaluate `left <op> right`.
    ///
    /// Null only ever equals null, matching `IS NULL` / `IS NOT NULL`
    /// semantics. Ordering comparisons between different variants never
    /// match.
    pub fn evaluate(&self, left: &Value, right: &Value) -> bool {
        match self {
            Operator::Eq => left == right,
            Operator::Ne => left != right,
            _ if left.is_null() || right.is_null() => false,
            Operator::Gt => left.compare(right) == Some(Ordering::Greater),
            Operator::Ge => matches!(
                left.compare(right),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            Operator::Lt => left.compare(right) == Some(Ordering::Less),
            Operator::Le => matches!(left.compare(right), Some(Ordering::Less | Ordering::Equal)),
        }
    }
}

/// One `column <op> value` filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub column: String,
    pub operator: Operator,
    pub value: Value,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    /// SQL spelling of the direction.
    pub fn as_sql(&self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }

    /// Apply this direction to an ascending comparison.
    pub fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            Direction::Asc => ordering,
            Direction::Desc => ordering.reverse(),
        }
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(Direction::Asc),
            "desc" => Ok(Direction::Desc),
            other => Err(format!("unknown sort direction: {other}")),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// A conjunction of conditions plus an ordering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    conditions: Vec<Condition>,
    order: Vec<(String, Direction)>,
}

impl Query {
    /// A query matching every row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a `column <op> value` condition.
    pub fn filter(
        mut self,
        column: impl Into<String>,
        operator: Operator,
        value: impl Into<Value>,
    ) -> Self {
        self.conditions.push(Condition {
            column: column.into(),
            operator,
            value: value.into(),
        });
        self
    }

    /// Shorthand for an equality filter.
    pub fn where_eq(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter(column, Operator::Eq, value)
    }

    /// Append a sort key. Earlier keys take precedence.
    pub fn order_by(mut self, column: impl Into<String>, direction: Direction) -> Self {
        self.order.push((column.into(), direction));
        self
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn order(&self) -> &[(String, Direction)] {
        &self.order
    }

    /// Whether `record` satisfies every condition.
    pub fn matches<R: SortableRecord + ?Sized>(&self, record: &R) -> bool {
        self.conditions
            .iter()
            .all(|c| c.operator.evaluate(&record.attribute(&c.column), &c.value))
    }

    /// Compare two records by this query's sort keys.
    pub fn compare<R: SortableRecord + ?Sized>(&self, a: &R, b: &R) -> Ordering {
        self.order
            .iter()
            .map(|(column, direction)| {
                direction.apply(a.attribute(column).sort_cmp(&b.attribute(column)))
            })
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

/// The identity of one group: `(column, value)` for every group-by column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupScope {
    pairs: Vec<(String, Value)>,
}

impl GroupScope {
    /// Scope from explicit pairs.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, Value)>,
        S: Into<String>,
    {
        Self {
            pairs: pairs
                .into_iter()
                .map(|(column, value)| (column.into(), value))
                .collect(),
        }
    }

    /// The group `record` currently belongs to.
    pub fn current<R: SortableRecord + ?Sized>(config: &SortableConfig, record: &R) -> Self {
        Self::from_pairs(
            config
                .group_columns()
                .iter()
                .map(|column| (column.as_str(), record.attribute(column))),
        )
    }

    /// The group `record` belonged to before its pending changes.
    pub fn original<R: SortableRecord + ?Sized>(config: &SortableConfig, record: &R) -> Self {
        Self::from_pairs(
            config
                .group_columns()
                .iter()
                .map(|column| (column.as_str(), record.original(column))),
        )
    }

    pub fn pairs(&self) -> &[(String, Value)] {
        &self.pairs
    }

    /// Whether this scope is the whole table.
    pub fn is_whole_table(&self) -> bool {
        self.pairs.is_empty()
    }

    /// A query selecting exactly this group.
    pub fn query(&self) -> Query {
        self.pairs
            .iter()
            .fold(Query::new(), |query, (column, value)| {
                query.where_eq(column.as_str(), value.clone())
            })
    }
}

impl fmt::Display for GroupScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.pairs.is_empty() {
            return f.write_str("*");
        }
        let parts: Vec<String> = self
            .pairs
            .iter()
            .map(|(column, value)| format!("{column}={value}"))
            .collect();
        f.write_str(&parts.join(","))
    }
}
