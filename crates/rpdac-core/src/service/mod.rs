// ── Object services ──
//
// One service per kind. Each translates between the object model and the
// wire model and issues its remote calls strictly one after the other.

use std::future::Future;

use crate::error::CoreError;
use crate::model::Object;

pub mod dashboard;
pub mod filter;

pub use dashboard::DashboardService;
pub use filter::FilterService;

/// Per-kind remote operations used by the reconciler.
pub trait ObjectService {
    type Object: Object + Send + Sync;

    /// Fetch by remote id.
    fn get(
        &self,
        project: &str,
        id: i64,
    ) -> impl Future<Output = Result<Self::Object, CoreError>> + Send;

    /// Fetch by name. `Ok(None)` when no such object exists.
    fn get_by_name(
        &self,
        project: &str,
        name: &str,
    ) -> impl Future<Output = Result<Option<Self::Object>, CoreError>> + Send;

    fn create(
        &self,
        project: &str,
        target: &Self::Object,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;

    /// Bring `current`, as fetched from the service, in line with `target`.
    fn update(
        &self,
        project: &str,
        current: &Self::Object,
        target: &Self::Object,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;

    /// Delete an object previously fetched from the service.
    fn delete(
        &self,
        project: &str,
        current: &Self::Object,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;
}
