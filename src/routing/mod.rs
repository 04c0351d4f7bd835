//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Compilation (at startup):
//!     Registered handlers + path overrides (config)
//!     → path.rs (derive mount path from each registration name)
//!     → registry.rs (sort, reverse, resolve collisions)
//!     → Freeze as immutable RouteTable
//!
//! Incoming Request:
//!     path → RouteTable::lookup (exact match) → RouteDefinition
//! ```
//!
//! # Design Decisions
//! - Table compiled at startup, immutable at runtime
//! - No runtime code loading: handlers are compiled in and registered
//! - Exact-path matching only, no patterns in the hot path
//! - Collisions resolved by an explicit precedence rule, not iteration luck

pub mod path;
pub mod registry;

pub use path::{derive_route_path, is_route_source, strip_source_extension, IGNORE_PREFIX};
pub use registry::{RouteDefinition, RouteTable};
