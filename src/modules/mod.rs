//! Built-in route handlers.
//!
//! One handler per upstream operation, named after its mount path
//! (`album_new` → `/album/new`). Handlers are thin relays: default the
//! incoming parameters, apply whatever envelope the endpoint needs, and
//! hand the reshaped upstream response straight back.

pub mod album_new;
pub mod login_cellphone;
pub mod song_url;

use std::sync::Arc;

use crate::http::handler::RouteHandler;

/// Every built-in handler, ready for route table registration.
pub fn all() -> Vec<Arc<dyn RouteHandler>> {
    vec![
        Arc::new(album_new::AlbumNew),
        Arc::new(login_cellphone::LoginCellphone),
        Arc::new(song_url::SongUrl),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::RouteTable;
    use std::collections::HashMap;

    #[test]
    fn test_all_handlers_mount_at_derived_paths() {
        let table = RouteTable::build(all(), &HashMap::new());

        assert_eq!(table.len(), 3);
        assert!(table.lookup("/album/new").is_some());
        assert!(table.lookup("/login/cellphone").is_some());
        assert!(table.lookup("/song/url").is_some());
    }
}
