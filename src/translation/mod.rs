/*!
 * Translation of catalog strings through a remote service.
 *
 * This module holds the two halves of the translation path:
 *
 * - `dispatcher`: sends planned batches to a backend, one at a time, and
 *   reassembles the results in input order
 * - `core`: the `TranslationService` gluing planner, dispatcher and backend
 *   together, plus the catalog-level translate-and-merge operation
 */

// Re-export main types for easier usage
pub use self::core::{CatalogOutcome, TranslationService};
pub use self::dispatcher::{dispatch, DispatchError, RequestContext};

// Submodules
pub mod core;
pub mod dispatcher;
