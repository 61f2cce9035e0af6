use std::sync::Arc;

use rpdac_api::ReportPortalClient;
use rpdac_api::types as api;
use tracing::debug;

use super::ObjectService;
use crate::error::{CoreError, RemoteContext};
use crate::model::Filter;

/// Saved filters. No sub-resources: fields map one-to-one to the wire.
#[derive(Clone)]
pub struct FilterService {
    client: Arc<ReportPortalClient>,
}

impl FilterService {
    pub fn new(client: Arc<ReportPortalClient>) -> Self {
        Self { client }
    }
}

impl ObjectService for FilterService {
    type Object = Filter;

    async fn get(&self, project: &str, id: i64) -> Result<Filter, CoreError> {
        let record = self
            .client
            .get_filter(project, id)
            .await
            .context("get filter", id)?;
        Ok(Filter::from(record))
    }

    async fn get_by_name(&self, project: &str, name: &str) -> Result<Option<Filter>, CoreError> {
        match self.client.get_filter_by_name(project, name).await {
            Ok(record) => Ok(Some(Filter::from(record))),
            Err(e) if e.is_not_found() => {
                debug!(project, name, "filter not found");
                Ok(None)
            }
            Err(e) => Err(CoreError::remote("get filter by name", name, e)),
        }
    }

    async fn create(&self, project: &str, target: &Filter) -> Result<(), CoreError> {
        let id = self
            .client
            .create_filter(project, &api::NewFilter::from(target))
            .await
            .context("create filter", &target.name)?;
        debug!(project, name = %target.name, id, "filter created");
        Ok(())
    }

    async fn update(&self, project: &str, current: &Filter, target: &Filter) -> Result<(), CoreError> {
        let id = current.remote_id().ok_or_else(|| CoreError::MissingOrigin {
            kind: "filter",
            name: current.name.clone(),
        })?;

        self.client
            .update_filter(project, id, &api::UpdateFilter::from(target))
            .await
            .context("update filter", id)?;
        Ok(())
    }

    async fn delete(&self, project: &str, current: &Filter) -> Result<(), CoreError> {
        let id = current.remote_id().ok_or_else(|| CoreError::MissingOrigin {
            kind: "filter",
            name: current.name.clone(),
        })?;

        self.client
            .delete_filter(project, id)
            .await
            .context("delete filter", id)?;
        Ok(())
    }
}
