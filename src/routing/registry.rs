//! Handler registration and the immutable route table.
//!
//! # Responsibilities
//! - Collect registered handlers into name/path/handler definitions
//! - Apply per-name mount path overrides
//! - Resolve path collisions with an explicit precedence rule
//! - Serve exact-path lookups at request time
//!
//! # Design Decisions
//! - Collision precedence: names are sorted, the list is reversed, and a
//!   later insertion overwrites the earlier one. Of two names claiming the
//!   same path, the alphabetically earliest therefore owns it.

use std::collections::HashMap;
use std::sync::Arc;

use crate::http::handler::RouteHandler;
use crate::routing::path::{derive_route_path, is_route_source, strip_source_extension};

/// One mounted route.
#[derive(Clone)]
pub struct RouteDefinition {
    /// Registration name the mount path was derived from.
    pub name: &'static str,
    /// URL path the handler answers at.
    pub path: String,
    /// The handler invoked for this path.
    pub handler: Arc<dyn RouteHandler>,
}

impl std::fmt::Debug for RouteDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteDefinition")
            .field("name", &self.name)
            .field("path", &self.path)
            .finish()
    }
}

/// Immutable path→handler table built once at startup.
pub struct RouteTable {
    routes: Vec<RouteDefinition>,
    by_path: HashMap<String, usize>,
}

impl RouteTable {
    /// Build the table from registered handlers and mount path overrides.
    ///
    /// Override keys may be written with or without a source extension.
    /// Unmountable names (ignore prefix, unrecognized extension) are
    /// skipped entirely.
    pub fn build(
        mut handlers: Vec<Arc<dyn RouteHandler>>,
        overrides: &HashMap<String, String>,
    ) -> Self {
        let overrides: HashMap<String, String> = overrides
            .iter()
            .map(|(name, path)| (strip_source_extension(name).to_string(), path.clone()))
            .collect();

        handlers.sort_by_key(|handler| handler.name());
        handlers.reverse();

        let mut routes: Vec<RouteDefinition> = Vec::with_capacity(handlers.len());
        let mut by_path: HashMap<String, usize> = HashMap::new();

        for handler in handlers {
            let name = handler.name();
            if !is_route_source(name) {
                tracing::debug!(name = name, "skipping unmountable registration");
                continue;
            }
            let path = derive_route_path(name, &overrides);
            match by_path.get(&path) {
                Some(&index) => {
                    tracing::warn!(
                        path = %path,
                        replaced = routes[index].name,
                        winner = name,
                        "mount path collision"
                    );
                    routes[index] = RouteDefinition { name, path, handler };
                }
                None => {
                    by_path.insert(path.clone(), routes.len());
                    routes.push(RouteDefinition { name, path, handler });
                }
            }
        }

        Self { routes, by_path }
    }

    /// Look up the route mounted at exactly `path`.
    pub fn lookup(&self, path: &str) -> Option<&RouteDefinition> {
        self.by_path.get(path).map(|&index| &self.routes[index])
    }

    /// All mounted routes.
    pub fn routes(&self) -> &[RouteDefinition] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
