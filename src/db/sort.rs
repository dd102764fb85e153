//! Sort hints for list queries.
//!
//! Hints look like `number,desc` or `id`. Properties are resolved against a
//! per-repository whitelist, so only known column names reach the SQL.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    fn as_sql(self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SortError {
    #[error("unknown sort property: {0}")]
    UnknownProperty(String),
    #[error("unknown sort direction: {0}")]
    UnknownDirection(String),
}

/// A resolved ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    pub column: &'static str,
    pub direction: Direction,
}

impl Default for Sort {
    fn default() -> Self {
        Self {
            column: "id",
            direction: Direction::Asc,
        }
    }
}

impl Sort {
    /// Resolve an optional `property[,direction]` hint.
    ///
    /// `columns` maps JSON property names to column names.
    pub fn parse(
        hint: Option<&str>,
        columns: &[(&'static str, &'static str)],
    ) -> Result<Self, SortError> {
        let Some(hint) = hint.map(str::trim).filter(|h| !h.is_empty()) else {
            return Ok(Self::default());
        };

        let (property, direction) = match hint.split_once(',') {
            Some((property, direction)) => (property.trim(), Some(direction.trim())),
            None => (hint, None),
        };

        let column = columns
            .iter()
            .find(|(name, _)| *name == property)
            .map(|(_, column)| *column)
            .ok_or_else(|| SortError::UnknownProperty(property.to_string()))?;

        let direction = match direction.map(str::to_ascii_lowercase).as_deref() {
            None | Some("") | Some("asc") => Direction::Asc,
            Some("desc") => Direction::Desc,
            Some(other) => return Err(SortError::UnknownDirection(other.to_string())),
        };

        Ok(Self { column, direction })
    }

    /// `ORDER BY` clause for a query selecting from `table_alias`.
    ///
    /// Ties are broken by id so list order is stable.
    pub fn order_by(&self, table_alias: &str) -> String {
        if self.column == "id" {
            format!("ORDER BY {table_alias}.id {}", self.direction.as_sql())
        } else {
            format!(
                "ORDER BY {table_alias}.{} {}, {table_alias}.id ASC",
                self.column,
                self.direction.as_sql()
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLUMNS: &[(&str, &str)] = &[("id", "id"), ("number", "number")];

    #[test]
    fn missing_hint_sorts_by_id() {
        assert_eq!(Sort::parse(None, COLUMNS).unwrap(), Sort::default());
        assert_eq!(Sort::parse(Some("  "), COLUMNS).unwrap(), Sort::default());
    }

    #[test]
    fn parses_property_and_direction() {
        let sort = Sort::parse(Some("number,desc"), COLUMNS).unwrap();
        assert_eq!(sort.column, "number");
        assert_eq!(sort.direction, Direction::Desc);
        assert_eq!(sort.order_by("n"), "ORDER BY n.number DESC, n.id ASC");

        let sort = Sort::parse(Some("id,DESC"), COLUMNS).unwrap();
        assert_eq!(sort.order_by("e"), "ORDER BY e.id DESC");

        let sort = Sort::parse(Some("number"), COLUMNS).unwrap();
        assert_eq!(sort.direction, Direction::Asc);
    }

    #[test]
    fn rejects_unknown_input() {
        assert_eq!(
            Sort::parse(Some("id; DROP TABLE phone_number"), COLUMNS),
            Err(SortError::UnknownProperty("id; DROP TABLE phone_number".into()))
        );
        assert_eq!(
            Sort::parse(Some("id,sideways"), COLUMNS),
            Err(SortError::UnknownDirection("sideways".into()))
        );
    }
}
