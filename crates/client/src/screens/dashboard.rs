use chrono::{DateTime, Utc};
use shared_types::{DashboardSummary, DocumentQuery, MeetingQuery, MessageQuery};

use crate::api::PortalApi;
use crate::error::ClientError;
use crate::notify::Notifications;

/// Fetch the four dashboard collections together. Any failure fails the lot.
pub async fn load_dashboard<A: PortalApi>(
    api: &A,
    now: DateTime<Utc>,
) -> Result<DashboardSummary, ClientError> {
    let documents_query = DocumentQuery::default();
    let meetings_query = MeetingQuery::default();
    let messages_query = MessageQuery::default();

    let (families, documents, meetings, messages) = futures::try_join!(
        api.list_families(),
        api.list_documents(&documents_query),
        api.list_meetings(&meetings_query),
        api.list_messages(&messages_query),
    )?;

    Ok(DashboardSummary::build(
        &families, &documents, &meetings, &messages, now,
    ))
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardView {
    pub loading: bool,
    pub summary: Option<DashboardSummary>,
}

impl DashboardView {
    pub async fn load<A: PortalApi>(
        &mut self,
        api: &A,
        notices: &mut Notifications,
        now: DateTime<Utc>,
    ) -> Result<(), ClientError> {
        self.loading = true;
        let result = load_dashboard(api, now).await;
        self.loading = false;
        match result {
            Ok(summary) => {
                self.summary = Some(summary);
                Ok(())
            }
            Err(err) => {
                notices.failure("Failed to load dashboard", &err);
                Err(err)
            }
        }
    }
}
