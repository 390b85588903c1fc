//! # Taxofacet Architecture
//!
//! Taxofacet is the faceted-search core of a classified-ads marketplace:
//! a three-level category taxonomy with per-node attribute schemas, a
//! draft/applied filter state that round-trips through shareable URLs, and
//! a compiler from filter state to backend-neutral queries.
//!
//! It is a library first. The `taxofacet` binary is one client of it.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI (main.rs, args.rs, print.rs)                           │
//! │  - Parses arguments, formats output, owns stdout/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API / Session (api.rs, session.rs)                         │
//! │  - Facade for one-shot calls                                │
//! │  - BrowseSession: generations, load more, error recovery    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Core (taxonomy/, attributes/, filter/, query/, presenter)  │
//! │  - Pure and synchronous                                     │
//! │  - No I/O apart from loading a taxonomy file                │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Repository (store/)                                        │
//! │  - Async ListingRepository trait                            │
//! │  - InMemoryRepository (CLI and tests)                       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Data Flow
//!
//! 1. The user edits the **draft** ([`filter::FilterStateController`]).
//! 2. Applying copies draft to **applied**, bumps the generation and
//!    rewrites the canonical URL ([`filter::url`]).
//! 3. [`query::compile`] turns the applied state into a data query and a
//!    count query sharing one predicate.
//! 4. A [`store::ListingRepository`] executes both concurrently.
//! 5. [`presenter`] decodes attribute blobs and computes paging.
//! 6. [`session::BrowseSession`] accepts the result only if its generation
//!    is still the latest.
//!
//! ## Key Principle: Degrade, Don't Fail
//!
//! URLs and listings outlive taxonomy edits. An unknown category segment
//! resolves to the longest known prefix, a malformed query parameter is
//! dropped, and a corrupt attribute blob empties that one row's attributes.
//! The only hard errors are a URL outside `/search`, an invalid taxonomy
//! file, configuration problems and repository failures.
//!
//! ## Module Overview
//!
//! - [`api`]: The facade used by UI clients
//! - [`session`]: Fetch lifecycle for one browsing user
//! - [`taxonomy`]: The category tree and the built-in catalog
//! - [`attributes`]: Field schemas, resolution and form validation
//! - [`filter`]: Reducer, URL codec and draft/applied controller
//! - [`query`]: Predicate and ordering AST, and the compiler
//! - [`presenter`]: Rows to listings, paging
//! - [`store`]: Repository trait and the in-memory implementation
//! - [`model`]: Shared data types
//! - [`config`]: Layered configuration
//! - [`error`]: Error types

pub mod api;
pub mod attributes;
pub mod config;
pub mod error;
pub mod filter;
pub mod model;
pub mod presenter;
pub mod query;
pub mod session;
pub mod store;
pub mod taxonomy;
