//! # Filter State
//!
//! Query and pagination parameters that drive a list fetch.
//!
//! Each entity declares its filter fields once with [`query_filters!`](crate::query_filters),
//! which generates the filter struct, a `<Name>Patch` struct whose fields are all `Option`,
//! and the [`QueryFilters`] implementation that merges patches and renders query pairs.
//!
//! ## Page reset rule
//!
//! A change that alters result membership (any filter field, or the page size) moves the
//! page back to 1. A call that only moves the page leaves everything else untouched.
//!
//! ```rust
//! use store_framework::{query_filters, FilterState, FilterUpdate};
//!
//! query_filters! {
//!     pub struct TicketFilters {
//!         status: String => "status",
//!         search: String => "search",
//!     }
//! }
//!
//! let mut state = FilterState::<TicketFilters>::new(10);
//! state.apply(FilterUpdate::page(4));
//! assert_eq!(state.page, 4);
//!
//! state.apply(FilterUpdate::filters(TicketFiltersPatch {
//!     status: Some("open".into()),
//!     ..Default::default()
//! }));
//! assert_eq!(state.page, 1);
//! ```

use std::fmt::Debug;

/// Page size used when none is configured.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// A typed set of filter fields.
pub trait QueryFilters: Default + Clone + Debug + PartialEq + Send + Sync + 'static {
    /// Partial update; `None` fields are left untouched.
    type Patch: Default + Clone + Debug + Send + Sync + 'static;

    /// Merges the patch. Returns `true` if any field actually changed value.
    fn merge(&mut self, patch: Self::Patch) -> bool;

    /// Query parameters for every field, in declaration order.
    fn query_pairs(&self) -> Vec<(&'static str, String)>;
}

/// Rendering of a filter value as a query parameter.
pub trait FilterValue {
    fn to_query(&self) -> String;
}

impl FilterValue for String {
    fn to_query(&self) -> String {
        self.clone()
    }
}

impl FilterValue for bool {
    fn to_query(&self) -> String {
        self.to_string()
    }
}

impl FilterValue for u32 {
    fn to_query(&self) -> String {
        self.to_string()
    }
}

impl<V: FilterValue> FilterValue for Option<V> {
    fn to_query(&self) -> String {
        self.as_ref().map(FilterValue::to_query).unwrap_or_default()
    }
}

/// Filters for resources that are only paginated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoFilters;

impl QueryFilters for NoFilters {
    type Patch = ();

    fn merge(&mut self, _patch: ()) -> bool {
        false
    }

    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }
}

/// Declares a filter struct and its patch type.
///
/// Each field names the query parameter it is sent as. Field types must implement
/// `Default`, `Clone`, `PartialEq`, `Debug` and [`FilterValue`].
#[macro_export]
macro_rules! query_filters {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field:ident : $ty:ty => $param:literal
            ),* $(,)?
        }
    ) => {
        $crate::__private::paste! {
            $(#[$meta])*
            #[derive(Debug, Clone, Default, PartialEq)]
            $vis struct $name {
                $(
                    $(#[$field_meta])*
                    pub $field: $ty,
                )*
            }

            #[doc = "Partial update for [`" $name "`]. `None` leaves a field untouched."]
            #[derive(Debug, Clone, Default, PartialEq)]
            $vis struct [<$name Patch>] {
                $(
                    pub $field: Option<$ty>,
                )*
            }

            impl $crate::QueryFilters for $name {
                type Patch = [<$name Patch>];

                fn merge(&mut self, patch: Self::Patch) -> bool {
                    let mut changed = false;
                    $(
                        if let Some(value) = patch.$field {
                            if self.$field != value {
                                self.$field = value;
                                changed = true;
                            }
                        }
                    )*
                    changed
                }

                fn query_pairs(&self) -> Vec<(&'static str, String)> {
                    vec![
                        $(
                            ($param, $crate::FilterValue::to_query(&self.$field)),
                        )*
                    ]
                }
            }
        }
    };
}

/// Filter fields plus pagination coordinates. Pages start at 1.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState<F> {
    pub filters: F,
    pub page: u32,
    pub limit: u32,
}

impl<F: QueryFilters> Default for FilterState<F> {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl<F: QueryFilters> FilterState<F> {
    pub fn new(limit: u32) -> Self {
        Self {
            filters: F::default(),
            page: 1,
            limit: limit.max(1),
        }
    }

    /// Applies a partial update following the page reset rule.
    ///
    /// Returns `true` if result membership changed.
    pub fn apply(&mut self, update: FilterUpdate<F>) -> bool {
        let mut membership_changed = self.filters.merge(update.filters);

        if let Some(limit) = update.limit {
            let limit = limit.max(1);
            if limit != self.limit {
                self.limit = limit;
                membership_changed = true;
            }
        }

        if membership_changed {
            self.page = 1;
        } else if let Some(page) = update.page {
            self.page = page.max(1);
        }
        membership_changed
    }

    /// Every filter field followed by `page` and `limit`.
    pub fn query(&self) -> Vec<(String, String)> {
        let mut query: Vec<(String, String)> = self
            .filters
            .query_pairs()
            .into_iter()
            .map(|(name, value)| (name.to_owned(), value))
            .collect();
        query.push(("page".to_owned(), self.page.to_string()));
        query.push(("limit".to_owned(), self.limit.to_string()));
        query
    }
}

/// Partial Filter State change.
#[derive(Debug, Clone, Default)]
pub struct FilterUpdate<F: QueryFilters> {
    pub filters: F::Patch,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl<F: QueryFilters> FilterUpdate<F> {
    pub fn filters(patch: F::Patch) -> Self {
        Self {
            filters: patch,
            page: None,
            limit: None,
        }
    }

    pub fn page(page: u32) -> Self {
        Self {
            filters: F::Patch::default(),
            page: Some(page),
            limit: None,
        }
    }

    pub fn limit(limit: u32) -> Self {
        Self {
            filters: F::Patch::default(),
            page: None,
            limit: Some(limit),
        }
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    crate::query_filters! {
        /// Filters used by the tests below.
        struct OrderFilters {
            status: String => "status",
            search: String => "search",
            partner_id: Option<String> => "partnerId",
        }
    }

    fn status(value: &str) -> FilterUpdate<OrderFilters> {
        FilterUpdate::filters(OrderFiltersPatch {
            status: Some(value.to_owned()),
            ..Default::default()
        })
    }

    fn pending_first_page() -> FilterState<OrderFilters> {
        let mut state = FilterState::<OrderFilters>::new(10);
        state.apply(status("pending"));
        state
    }

    #[test]
    fn membership_change_resets_page() {
        let mut state = pending_first_page();
        state.apply(FilterUpdate::page(3));
        assert_eq!(state.page, 3);

        let changed = state.apply(status("completed"));

        assert!(changed);
        assert_eq!(state.filters.status, "completed");
        assert_eq!(state.page, 1);
        assert_eq!(state.limit, 10);
    }

    #[test]
    fn page_only_change_keeps_filters() {
        let mut state = pending_first_page();
        let changed = state.apply(FilterUpdate::page(5));

        assert!(!changed);
        assert_eq!(state.page, 5);
        assert_eq!(state.filters.status, "pending");
        assert_eq!(state.limit, 10);
    }

    #[test]
    fn limit_change_resets_page() {
        let mut state = pending_first_page();
        state.apply(FilterUpdate::page(2));
        state.apply(FilterUpdate::limit(25));
        assert_eq!(state.page, 1);
        assert_eq!(state.limit, 25);
    }

    #[test]
    fn membership_change_overrides_explicit_page_in_same_call() {
        let mut state = pending_first_page();
        state.apply(status("cancelled").with_page(7));
        assert_eq!(state.page, 1);
    }

    #[test]
    fn reapplying_same_value_is_idempotent() {
        let mut state = pending_first_page();
        state.apply(FilterUpdate::page(4));

        let changed = state.apply(status("pending"));

        assert!(!changed);
        assert_eq!(state.page, 4);
    }

    #[test]
    fn empty_update_leaves_state_untouched() {
        let mut state = pending_first_page();
        state.apply(FilterUpdate::page(2));
        let before = state.clone();
        state.apply(FilterUpdate::default());
        assert_eq!(state, before);
    }

    #[test]
    fn zero_page_and_limit_are_clamped() {
        let mut state = FilterState::<OrderFilters>::new(0);
        assert_eq!(state.limit, 1);
        state.apply(FilterUpdate::page(0));
        assert_eq!(state.page, 1);
    }

    #[test]
    fn page_follows_most_recent_call_across_sequences() {
        let mut state = FilterState::<OrderFilters>::new(10);
        let steps: Vec<(FilterUpdate<OrderFilters>, u32)> = vec![
            (FilterUpdate::page(3), 3),
            (status("pending"), 1),
            (FilterUpdate::page(6), 6),
            (FilterUpdate::default(), 6),
            (
                FilterUpdate::filters(OrderFiltersPatch {
                    search: Some("panel".into()),
                    ..Default::default()
                }),
                1,
            ),
            (FilterUpdate::page(2).with_limit(10), 2),
            (FilterUpdate::limit(50).with_page(9), 1),
        ];
        for (update, expected_page) in steps {
            state.apply(update);
            assert_eq!(state.page, expected_page);
        }
    }

    #[test]
    fn query_lists_every_field_then_pagination() {
        let mut state = pending_first_page();
        state.apply(FilterUpdate::filters(OrderFiltersPatch {
            partner_id: Some(Some("P7".into())),
            ..Default::default()
        }));

        assert_eq!(
            state.query(),
            vec![
                ("status".to_owned(), "pending".to_owned()),
                ("search".to_owned(), String::new()),
                ("partnerId".to_owned(), "P7".to_owned()),
                ("page".to_owned(), "1".to_owned()),
                ("limit".to_owned(), "10".to_owned()),
            ]
        );
    }
}
