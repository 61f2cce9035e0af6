use std::collections::BTreeMap;
use std::sync::Arc;

use rpdac_api::ReportPortalClient;
use rpdac_api::types as api;
use tracing::debug;

use super::ObjectService;
use super::filter::FilterService;
use crate::codec::SubTypeMap;
use crate::convert::{dashboard_slot, new_widget, widget_from_remote};
use crate::error::{CoreError, RemoteContext};
use crate::model::{Dashboard, Widget};
use crate::naming::dashboard_hash;

/// Dashboards and the widgets placed on them.
///
/// The service has no call to replace the widgets of a dashboard, so an
/// update removes every current widget and recreates the target ones.
/// Nothing is rolled back when a step fails midway.
#[derive(Clone)]
pub struct DashboardService {
    client: Arc<ReportPortalClient>,
    filters: FilterService,
}

impl DashboardService {
    pub fn new(client: Arc<ReportPortalClient>, filters: FilterService) -> Self {
        Self { client, filters }
    }

    /// Current locator → short name table of the project.
    async fn sub_types(&self, project: &str) -> Result<SubTypeMap, CoreError> {
        let settings = self
            .client
            .get_project_settings(project)
            .await
            .context("get project settings", project)?;
        Ok(SubTypeMap::from_settings(&settings))
    }

    /// Fetch every widget on `record` and assemble the dashboard.
    async fn materialize(&self, project: &str, record: api::Dashboard) -> Result<Dashboard, CoreError> {
        let decode_map = self.sub_types(project).await?;
        let hash = dashboard_hash(&record.name);

        let mut widgets = Vec::with_capacity(record.widgets.len());
        for slot in &record.widgets {
            let widget = self
                .client
                .get_widget(project, slot.widget_id)
                .await
                .context("get widget", slot.widget_id)?;
            let widget = widget_from_remote(widget, slot, &hash, &decode_map).map_err(|e| {
                CoreError::WidgetFailed {
                    dashboard: record.name.clone(),
                    widget: slot.widget_name.clone(),
                    source: Box::new(e),
                }
            })?;
            widgets.push(widget);
        }

        Ok(Dashboard {
            name: record.name.clone(),
            description: record.description.clone(),
            widgets: Some(widgets),
            origin: Some(record),
        })
    }

    /// Resolve each distinct filter name used by `target` to its remote id.
    async fn resolve_filters(
        &self,
        project: &str,
        target: &Dashboard,
    ) -> Result<BTreeMap<String, i64>, CoreError> {
        let mut ids = BTreeMap::new();

        for widget in target.widgets() {
            for name in widget.filters() {
                if ids.contains_key(name) {
                    continue;
                }

                let filter = self.filters.get_by_name(project, name).await?;
                let id = filter.as_ref().and_then(|f| f.remote_id()).ok_or_else(|| {
                    CoreError::FilterNotResolved {
                        filter: name.clone(),
                        widget: widget.name.clone(),
                    }
                })?;
                ids.insert(name.clone(), id);
            }
        }

        Ok(ids)
    }

    /// Create every widget of `target` and attach it to `dashboard_id`, in
    /// list order.
    async fn create_widgets(
        &self,
        project: &str,
        dashboard_id: i64,
        target: &Dashboard,
        filter_ids: &BTreeMap<String, i64>,
        encode_map: &SubTypeMap,
    ) -> Result<(), CoreError> {
        let hash = dashboard_hash(&target.name);

        for widget in target.widgets() {
            self.create_widget(project, dashboard_id, widget, &hash, filter_ids, encode_map)
                .await
                .map_err(|e| CoreError::WidgetFailed {
                    dashboard: target.name.clone(),
                    widget: widget.name.clone(),
                    source: Box::new(e),
                })?;
        }

        Ok(())
    }

    async fn create_widget(
        &self,
        project: &str,
        dashboard_id: i64,
        widget: &Widget,
        hash: &str,
        filter_ids: &BTreeMap<String, i64>,
        encode_map: &SubTypeMap,
    ) -> Result<(), CoreError> {
        let payload = new_widget(widget, hash, filter_ids, encode_map)?;
        let widget_id = self
            .client
            .create_widget(project, &payload)
            .await
            .context("create widget", &payload.name)?;

        self.client
            .add_widget_to_dashboard(project, dashboard_id, &dashboard_slot(widget, widget_id))
            .await
            .context("add widget to dashboard", dashboard_id)?;

        debug!(project, dashboard_id, widget_id, name = %payload.name, "widget created");
        Ok(())
    }
}

fn missing_origin(name: &str) -> CoreError {
    CoreError::MissingOrigin {
        kind: "dashboard",
        name: name.to_owned(),
    }
}

impl ObjectService for DashboardService {
    type Object = Dashboard;

    async fn get(&self, project: &str, id: i64) -> Result<Dashboard, CoreError> {
        let record = self
            .client
            .get_dashboard(project, id)
            .await
            .context("get dashboard", id)?;
        self.materialize(project, record).await
    }

    async fn get_by_name(&self, project: &str, name: &str) -> Result<Option<Dashboard>, CoreError> {
        match self.client.get_dashboard_by_name(project, name).await {
            Ok(record) => self.materialize(project, record).await.map(Some),
            Err(e) if e.is_not_found() => {
                debug!(project, name, "dashboard not found");
                Ok(None)
            }
            Err(e) => Err(CoreError::remote("get dashboard by name", name, e)),
        }
    }

    async fn create(&self, project: &str, target: &Dashboard) -> Result<(), CoreError> {
        let filter_ids = self.resolve_filters(project, target).await?;
        let encode_map = self.sub_types(project).await?.inverse();

        let dashboard_id = self
            .client
            .create_dashboard(project, &api::NewDashboard::from(target))
            .await
            .context("create dashboard", &target.name)?;
        debug!(project, name = %target.name, dashboard_id, "dashboard created");

        self.create_widgets(project, dashboard_id, target, &filter_ids, &encode_map)
            .await
    }

    async fn update(
        &self,
        project: &str,
        current: &Dashboard,
        target: &Dashboard,
    ) -> Result<(), CoreError> {
        let dashboard_id = current
            .remote_id()
            .ok_or_else(|| missing_origin(&current.name))?;

        let filter_ids = self.resolve_filters(project, target).await?;
        let encode_map = self.sub_types(project).await?.inverse();

        for widget in current.widgets() {
            let widget_id = widget.remote_id().ok_or_else(|| CoreError::MissingOrigin {
                kind: "widget",
                name: widget.name.clone(),
            })?;
            self.client
                .remove_widget_from_dashboard(project, dashboard_id, widget_id)
                .await
                .context("remove widget from dashboard", widget_id)?;
        }

        self.client
            .update_dashboard(project, dashboard_id, &api::UpdateDashboard::from(target))
            .await
            .context("update dashboard", dashboard_id)?;

        self.create_widgets(project, dashboard_id, target, &filter_ids, &encode_map)
            .await
    }

    async fn delete(&self, project: &str, current: &Dashboard) -> Result<(), CoreError> {
        let dashboard_id = current
            .remote_id()
            .ok_or_else(|| missing_origin(&current.name))?;

        self.client
            .delete_dashboard(project, dashboard_id)
            .await
            .context("delete dashboard", dashboard_id)?;
        Ok(())
    }
}
