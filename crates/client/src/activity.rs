//! Read-only client for the activity feed.

use std::sync::Arc;

use satchel_core::activity::{sort_newest_first, ActivityEntry, ActivityFilter};

use crate::error::ApiResult;
use crate::http::ApiTransport;
use crate::notify::Notifier;

/// Fetches audit entries; holds no cache since the feed is read-only
/// and every view starts fresh.
pub struct ActivityLog {
    transport: Arc<ApiTransport>,
    notifier: Arc<dyn Notifier>,
}

impl ActivityLog {
    pub(crate) fn new(transport: Arc<ApiTransport>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            transport,
            notifier,
        }
    }

    /// Fetch entries matching `filter`, newest first.
    ///
    /// The criteria are forwarded to the server as query parameters;
    /// ordering is re-applied locally so display order never depends on
    /// what the server chose.
    pub async fn fetch(&self, filter: &ActivityFilter) -> ApiResult<Vec<ActivityEntry>> {
        match self
            .transport
            .get_with_query::<Vec<ActivityEntry>>("/activity", &filter.query_pairs())
            .await
        {
            Ok(mut entries) => {
                sort_newest_first(&mut entries);
                Ok(entries)
            }
            Err(err) => {
                self.notifier
                    .error(&err.user_message("Failed to load activity"));
                Err(err)
            }
        }
    }
}
