//! List parameters: sorting, pagination and date bounds

use crate::core::entity::Data;
use crate::core::error::ValidationError;
use chrono::{DateTime, Days, NaiveDate, Utc};

/// Default upper bound for `limit`
pub const DEFAULT_MAX_PAGE_SIZE: usize = 100;

/// Sort field and direction
///
/// # Format
/// - `field` or `field:asc` (ascending)
/// - `field:desc` (descending)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub descending: bool,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            field: "id".to_string(),
            descending: false,
        }
    }
}

impl SortSpec {
    /// Parse a sort expression, accepting only the given fields
    pub fn parse(expr: &str, allowed: &[&str]) -> Result<Self, ValidationError> {
        let (field, direction) = match expr.split_once(':') {
            Some((field, direction)) => (field.trim(), Some(direction.trim())),
            None => (expr.trim(), None),
        };

        let descending = match direction {
            None | Some("asc") => false,
            Some("desc") => true,
            Some(_) => {
                return Err(ValidationError::UnknownSortField {
                    field: expr.to_string(),
                });
            }
        };

        if !allowed.contains(&field) {
            return Err(ValidationError::UnknownSortField {
                field: field.to_string(),
            });
        }

        Ok(Self {
            field: field.to_string(),
            descending,
        })
    }

    /// SQL direction keyword
    pub fn direction(&self) -> &'static str {
        if self.descending { "DESC" } else { "ASC" }
    }
}

/// Sorting and pagination for a list field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListParams {
    pub sort: SortSpec,

    /// Maximum number of rows; `None` returns every row
    pub limit: Option<usize>,

    /// Number of rows to skip
    pub offset: usize,
}

impl ListParams {
    /// Build list parameters for entity `T` from raw GraphQL arguments.
    ///
    /// `limit` is clamped to `1..=max_page_size` and `offset` to `>= 0`.
    pub fn for_entity<T: Data>(
        order_by: Option<&str>,
        limit: Option<i32>,
        offset: Option<i32>,
        max_page_size: usize,
    ) -> Result<Self, ValidationError> {
        let sort = match order_by {
            Some(expr) => SortSpec::parse(expr, T::sortable_fields())?,
            None => SortSpec::default(),
        };

        Ok(Self {
            sort,
            limit: limit.map(|l| (l.max(1) as usize).min(max_page_size.max(1))),
            offset: offset.unwrap_or(0).max(0) as usize,
        })
    }

    /// Sort then paginate an in-memory collection
    pub fn apply<T: Data>(&self, mut items: Vec<T>) -> Vec<T> {
        sort_entities(&mut items, &self.sort);
        let iter = items.into_iter().skip(self.offset);
        match self.limit {
            Some(limit) => iter.take(limit).collect(),
            None => iter.collect(),
        }
    }
}

/// Sort entities by a field; ties are broken by ascending id.
pub fn sort_entities<T: Data>(items: &mut [T], sort: &SortSpec) {
    items.sort_by(|a, b| {
        let va = a.field_value(&sort.field).unwrap_or(crate::core::FieldValue::Null);
        let vb = b.field_value(&sort.field).unwrap_or(crate::core::FieldValue::Null);
        let ordering = va.sort_cmp(&vb);
        let ordering = if sort.descending {
            ordering.reverse()
        } else {
            ordering
        };
        ordering.then_with(|| a.id().cmp(&b.id()))
    });
}

/// First instant of a UTC calendar day
pub fn day_start(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc())
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// First instant of the UTC day following `date` (exclusive upper bound).
///
/// A `*Lte` date filter keeps the whole named day, unlike comparing a
/// timestamp against that day's midnight.
pub fn day_end_exclusive(date: NaiveDate) -> DateTime<Utc> {
    date.checked_add_days(Days::new(1))
        .map(day_start)
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Case-insensitive substring match
pub fn icontains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
