//! Database repository shared by every resource store.
//!
//! Holds the pool plus the listing helpers that all paginated resources go through.

use serde::{de::DeserializeOwned, Serialize};
use sqlx::{sqlite::SqliteRow, QueryBuilder, Row, Sqlite, SqlitePool};

use crate::errors::AppError;
use crate::models::{Page, PageRequest, Priority};

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pub(super) pool: SqlitePool,
}

/// Exact-match conjunction over the provided fields only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListFilter {
    /// Canonical status name of the resource's own status enum
    pub status: Option<&'static str>,
    pub priority: Option<Priority>,
}

/// Listing order. Triage queues are served oldest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    NewestFirst,
    OldestFirst,
}

impl SortOrder {
    fn sql(&self) -> &'static str {
        match self {
            SortOrder::NewestFirst => " ORDER BY created_at DESC, rowid DESC",
            SortOrder::OldestFirst => " ORDER BY created_at ASC, rowid ASC",
        }
    }
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Fetch one page of `table`, newest first, plus the filtered total.
    pub(super) async fn fetch_page<T>(
        &self,
        table: &str,
        columns: &str,
        filter: &ListFilter,
        page: PageRequest,
        map: fn(&SqliteRow) -> T,
    ) -> Result<Page<T>, AppError> {
        let mut count_query = QueryBuilder::<Sqlite>::new(format!("SELECT COUNT(*) FROM {}", table));
        push_filter(&mut count_query, filter);
        let total: i64 = count_query.build().fetch_one(&self.pool).await?.get(0);

        let mut select = QueryBuilder::<Sqlite>::new(format!("SELECT {} FROM {}", columns, table));
        push_filter(&mut select, filter);
        select.push(SortOrder::NewestFirst.sql());
        select.push(" LIMIT ");
        select.push_bind(page.limit());
        select.push(" OFFSET ");
        select.push_bind(page.offset());

        let rows = select.build().fetch_all(&self.pool).await?;

        Ok(Page {
            items: rows.iter().map(map).collect(),
            total,
        })
    }

    /// Fetch every row matching `filter` in the given order.
    pub(super) async fn fetch_all_sorted<T>(
        &self,
        table: &str,
        columns: &str,
        filter: &ListFilter,
        order: SortOrder,
        map: fn(&SqliteRow) -> T,
    ) -> Result<Vec<T>, AppError> {
        let mut select = QueryBuilder::<Sqlite>::new(format!("SELECT {} FROM {}", columns, table));
        push_filter(&mut select, filter);
        select.push(order.sql());

        let rows = select.build().fetch_all(&self.pool).await?;
        Ok(rows.iter().map(map).collect())
    }

    /// Delete a row by id, failing with `NotFound` when nothing matched.
    pub(super) async fn delete_by_id(&self, table: &str, id: &str, kind: &str) -> Result<(), AppError> {
        let result = sqlx::query(&format!("DELETE FROM {} WHERE id = ?", table))
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("{} not found with id of {}", kind, id)));
        }
        Ok(())
    }
}

fn push_filter(builder: &mut QueryBuilder<'_, Sqlite>, filter: &ListFilter) {
    let mut separator = " WHERE ";
    if let Some(status) = filter.status {
        builder.push(separator).push("status = ").push_bind(status);
        separator = " AND ";
    }
    if let Some(priority) = filter.priority {
        builder.push(separator).push("priority = ").push_bind(priority.as_str());
    }
}

pub(super) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

pub(super) fn parse_json<T: DeserializeOwned + Default>(s: &str) -> T {
    serde_json::from_str(s).unwrap_or_default()
}

pub(super) fn to_json<T: Serialize>(value: &T) -> Result<String, AppError> {
    Ok(serde_json::to_string(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_filter_clauses() {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT * FROM contacts");
        push_filter(&mut qb, &ListFilter::default());
        assert_eq!(qb.sql(), "SELECT * FROM contacts");

        let mut qb = QueryBuilder::<Sqlite>::new("SELECT * FROM contacts");
        push_filter(
            &mut qb,
            &ListFilter {
                status: Some("new"),
                priority: Some(Priority::High),
            },
        );
        assert_eq!(
            qb.sql(),
            "SELECT * FROM contacts WHERE status = ? AND priority = ?"
        );

        let mut qb = QueryBuilder::<Sqlite>::new("SELECT * FROM contacts");
        push_filter(
            &mut qb,
            &ListFilter {
                status: None,
                priority: Some(Priority::Low),
            },
        );
        assert_eq!(qb.sql(), "SELECT * FROM contacts WHERE priority = ?");
    }

    #[test]
    fn test_parse_json_falls_back_to_default() {
        let v: Vec<String> = parse_json(r#"["a","b"]"#);
        assert_eq!(v, vec!["a", "b"]);
        let v: Vec<String> = parse_json("not json");
        assert!(v.is_empty());
    }
}
