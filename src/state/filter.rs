//! Pure filter/search projection over a [`ManagedItem`] slice.

use std::str::FromStr;

use chrono::NaiveDate;

use crate::domain::item::ManagedItem;
use crate::domain::types::TypeConstraintError;

/// Default number of rows a loader fetches for one collection.
pub const DEFAULT_LIST_LIMIT: usize = 100;

/// Which side of the soft-removal marker is visible.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ArchiveView {
    /// Non-archived items only.
    #[default]
    Active,
    /// Archived items only.
    Archived,
}

/// Status predicate. `All` is a sentinel and never a real status.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StatusFilter<S> {
    #[default]
    All,
    Only(S),
}

impl<S: FromStr<Err = TypeConstraintError>> StatusFilter<S> {
    /// Parses a query value; blank input and `all` (any case) mean no filter.
    pub fn parse(raw: &str) -> Result<Self, TypeConstraintError> {
        let raw = raw.trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        raw.parse().map(Self::Only)
    }
}

impl<S: PartialEq> StatusFilter<S> {
    pub fn matches(&self, status: &S) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == status,
        }
    }
}

/// Inclusive calendar date bounds; a missing side is open.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self { from, to }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.is_none_or(|from| date >= from) && self.to.is_none_or(|to| date <= to)
    }
}

/// Conjunction of predicates applied by [`project`].
#[derive(Clone, Debug, PartialEq)]
pub struct ListFilter<S> {
    pub archive: ArchiveView,
    pub status: StatusFilter<S>,
    pub search: String,
    pub date_range: Option<DateRange>,
    pub category: Option<String>,
}

impl<S> Default for ListFilter<S> {
    fn default() -> Self {
        Self {
            archive: ArchiveView::Active,
            status: StatusFilter::All,
            search: String::new(),
            date_range: None,
            category: None,
        }
    }
}

impl<S> ListFilter<S> {
    pub fn archive(mut self, archive: ArchiveView) -> Self {
        self.archive = archive;
        self
    }

    pub fn status(mut self, status: StatusFilter<S>) -> Self {
        self.status = status;
        self
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn date_range(mut self, range: DateRange) -> Self {
        self.date_range = Some(range);
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

impl<S: PartialEq> ListFilter<S> {
    /// Evaluates the predicates in order: archive, status, search, date,
    /// category.
    pub fn matches<T>(&self, item: &T) -> bool
    where
        T: ManagedItem<Status = S>,
    {
        self.matches_archive(item)
            && self.status.matches(&item.status())
            && self.matches_search(item)
            && self.matches_dates(item)
            && self.matches_category(item)
    }

    fn matches_archive<T: ManagedItem>(&self, item: &T) -> bool {
        match self.archive {
            ArchiveView::Active => !item.is_archived(),
            ArchiveView::Archived => item.is_archived(),
        }
    }

    fn matches_search<T: ManagedItem>(&self, item: &T) -> bool {
        let needle = self.search.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        item.search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }

    fn matches_dates<T: ManagedItem>(&self, item: &T) -> bool {
        self.date_range
            .is_none_or(|range| range.contains(item.occurs_at().date()))
    }

    fn matches_category<T: ManagedItem>(&self, item: &T) -> bool {
        match self.category.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(wanted) => item
                .category()
                .is_some_and(|category| category.eq_ignore_ascii_case(wanted)),
        }
    }
}

/// Returns the items visible through `filter`, preserving input order.
pub fn project<'a, T: ManagedItem>(items: &'a [T], filter: &ListFilter<T::Status>) -> Vec<&'a T> {
    items.iter().filter(|item| filter.matches(*item)).collect()
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::domain::support_ticket::tests::{opened_at, ticket};
    use crate::domain::support_ticket::{SupportTicket, TicketStatus};

    fn ids(items: Vec<&SupportTicket>) -> Vec<&str> {
        items.into_iter().map(|t| t.id.as_str()).collect()
    }

    fn sample() -> Vec<SupportTicket> {
        let mut archived = ticket("3", TicketStatus::Open);
        archived.archived = true;
        let mut billing = ticket("4", TicketStatus::Pending);
        billing.category = "Billing".to_string();
        billing.created_at = opened_at() + Duration::days(5);
        vec![
            ticket("1", TicketStatus::Open),
            ticket("2", TicketStatus::Closed),
            archived,
            billing,
        ]
    }

    #[test]
    fn all_sentinel_returns_non_archived_subset() {
        let items = sample();
        let filter = ListFilter::default().status(StatusFilter::parse("ALL").unwrap());
        assert_eq!(ids(project(&items, &filter)), vec!["1", "2", "4"]);
    }

    #[test]
    fn archived_view_shows_only_archived() {
        let items = sample();
        let filter = ListFilter::default().archive(ArchiveView::Archived);
        assert_eq!(ids(project(&items, &filter)), vec!["3"]);
    }

    #[test]
    fn status_parse_rejects_unknown_values() {
        assert_eq!(
            StatusFilter::<TicketStatus>::parse(" solved "),
            Ok(StatusFilter::Only(TicketStatus::Solved))
        );
        assert_eq!(StatusFilter::<TicketStatus>::parse(""), Ok(StatusFilter::All));
        assert!(StatusFilter::<TicketStatus>::parse("done").is_err());
    }

    #[test]
    fn search_is_trimmed_and_case_insensitive() {
        let items = sample();
        let filter = ListFilter::default().search("  tkt-2 ");
        assert_eq!(ids(project(&items, &filter)), vec!["2"]);

        let blank = ListFilter::default().search("   ");
        assert_eq!(project(&items, &blank).len(), 3);

        let customer = ListFilter::default().search("ACME");
        assert_eq!(project(&items, &customer).len(), 3);
    }

    #[test]
    fn date_range_is_inclusive() {
        let items = sample();
        let day = (opened_at() + Duration::days(5)).date();

        let exact = ListFilter::default().date_range(DateRange::new(Some(day), Some(day)));
        assert_eq!(ids(project(&items, &exact)), vec!["4"]);

        let until = ListFilter::default().date_range(DateRange::new(None, Some(opened_at().date())));
        assert_eq!(ids(project(&items, &until)), vec!["1", "2"]);
    }

    #[test]
    fn category_matches_ignoring_case() {
        let items = sample();
        let filter = ListFilter::default().category("billing");
        assert_eq!(ids(project(&items, &filter)), vec!["4"]);
    }

    #[test]
    fn predicates_are_combined() {
        let items = sample();
        let filter = ListFilter::default()
            .status(StatusFilter::Only(TicketStatus::Open))
            .search("ticket");
        assert_eq!(ids(project(&items, &filter)), vec!["1"]);
    }
}
