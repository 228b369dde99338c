//! Payloads exchanged between services and the HTTP layer.

use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::types::TypeConstraintError;
use crate::state::filter::{ArchiveView, DateRange, ListFilter, StatusFilter};

pub mod pages;

/// Query string accepted by every collection listing and export.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ListQuery {
    /// A status label or `all`.
    pub status: Option<String>,
    pub search: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub category: Option<String>,
    /// Show archived items instead of active ones.
    #[serde(default)]
    pub archived: bool,
}

impl ListQuery {
    pub fn to_filter<S>(&self) -> Result<ListFilter<S>, TypeConstraintError>
    where
        S: FromStr<Err = TypeConstraintError>,
    {
        let mut filter = ListFilter::default()
            .archive(if self.archived {
                ArchiveView::Archived
            } else {
                ArchiveView::Active
            })
            .status(match &self.status {
                Some(raw) => StatusFilter::parse(raw)?,
                None => StatusFilter::All,
            });

        if let Some(search) = &self.search {
            filter = filter.search(search.as_str());
        }
        if self.from.is_some() || self.to.is_some() {
            filter = filter.date_range(DateRange::new(self.from, self.to));
        }
        if let Some(category) = &self.category {
            filter = filter.category(category.as_str());
        }
        Ok(filter)
    }
}

/// A rendered CSV attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    pub filename: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreferenceValue {
    pub key: String,
    pub value: Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::booking::BookingStatus;

    #[test]
    fn query_builds_matching_filter() {
        let query = ListQuery {
            status: Some("confirmed".into()),
            search: Some("jane".into()),
            from: NaiveDate::from_ymd_opt(2026, 3, 1),
            to: None,
            category: None,
            archived: true,
        };

        let filter: ListFilter<BookingStatus> = query.to_filter().unwrap();

        assert_eq!(filter.status, StatusFilter::Only(BookingStatus::Confirmed));
        assert_eq!(filter.archive, ArchiveView::Archived);
        assert_eq!(filter.search, "jane");
        assert_eq!(
            filter.date_range,
            Some(DateRange::new(NaiveDate::from_ymd_opt(2026, 3, 1), None))
        );
    }

    #[test]
    fn unknown_status_is_rejected() {
        let query = ListQuery {
            status: Some("lost".into()),
            ..ListQuery::default()
        };
        assert!(query.to_filter::<BookingStatus>().is_err());
    }
}
