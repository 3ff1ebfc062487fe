//! User-facing notification seam.
//!
//! Stores report outcome messages ("Folder created successfully!",
//! server error details) through this trait so that embedding UIs can
//! render them as toasts. The default implementation routes them into
//! the tracing stream, which is enough for headless use.

use tracing::{error, info};

/// Sink for one-line user-visible messages.
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
}

/// Default [`Notifier`] that logs instead of displaying.
#[derive(Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn success(&self, message: &str) {
        info!(target: "satchel::notify", "{message}");
    }

    fn error(&self, message: &str) {
        error!(target: "satchel::notify", "{message}");
    }
}
