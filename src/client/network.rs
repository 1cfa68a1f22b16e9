// Connectivity flag
// Author: kelexine (https://github.com/kelexine)

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Whether the client believes it is online. Shared between whatever
/// watches the connection and the generator that checks it.
#[derive(Debug, Clone)]
pub struct NetworkStatus {
    online: Arc<AtomicBool>,
}

impl Default for NetworkStatus {
    fn default() -> Self {
        Self {
            online: Arc::new(AtomicBool::new(true)),
        }
    }
}

impl NetworkStatus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }

    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }
}
