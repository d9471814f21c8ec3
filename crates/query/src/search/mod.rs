//! Search machinery: predicates, filtering and debounced search input.
//!
//! - [`predicate`] - Builds a [`Predicate`] from criteria and a search term
//! - [`filter`] - Stable filtering with a memoizing [`FilterCache`]
//! - [`debounce`] - [`SearchController`], the trailing-edge search debounce

pub mod debounce;
pub mod filter;
pub mod predicate;

pub use debounce::{DEFAULT_DEBOUNCE, SearchController, SearchState};
pub use filter::{FilterCache, filter_indices, filter_records};
pub use predicate::{Clause, Predicate, PredicateBuilder};
