// ── Reconciler ──
//
// Create-or-update-or-skip for one object, and the best-effort batch walk
// over a directory. Objects are reconciled one at a time.

use std::fmt;
use std::fs;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;

use rpdac_api::ReportPortalClient;
use serde::Serialize;
use strum::Display;
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::error::{CoreError, error_chain};
use crate::model::{AnyObject, DecodeError, Kind, Object};
use crate::service::{DashboardService, FilterService, ObjectService};

const OBJECT_EXTENSIONS: [&str; 2] = ["yml", "yaml"];

/// What `apply` did to one object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Outcome {
    Created,
    Updated,
    Skipped,
}

/// A successfully applied object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Applied {
    pub kind: Kind,
    pub name: String,
    pub outcome: Outcome,
}

/// Result of applying one file.
#[derive(Debug)]
pub struct FileResult {
    pub path: PathBuf,
    pub result: Result<Applied, CoreError>,
}

/// Per-file results of [`Reconciler::apply`], in walk order.
#[derive(Debug, Default)]
pub struct ApplyReport {
    pub files: Vec<FileResult>,
}

impl ApplyReport {
    fn single(path: &Path, applied: Applied) -> Self {
        Self {
            files: vec![FileResult {
                path: path.to_path_buf(),
                result: Ok(applied),
            }],
        }
    }

    pub fn total(&self) -> usize {
        self.files.len()
    }

    pub fn failed(&self) -> usize {
        self.files.iter().filter(|f| f.result.is_err()).count()
    }

    /// Number of files that ended with `outcome`.
    pub fn count(&self, outcome: Outcome) -> usize {
        self.files
            .iter()
            .filter(|f| matches!(&f.result, Ok(a) if a.outcome == outcome))
            .count()
    }
}

impl fmt::Display for ApplyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} created, {} updated, {} skipped, {} failed",
            self.count(Outcome::Created),
            self.count(Outcome::Updated),
            self.count(Outcome::Skipped),
            self.failed()
        )
    }
}

// ── Reconciler ──────────────────────────────────────────────────────

/// Brings the service in line with object definitions.
#[derive(Clone)]
pub struct Reconciler {
    dashboards: DashboardService,
    filters: FilterService,
}

impl Reconciler {
    pub fn new(client: Arc<ReportPortalClient>) -> Self {
        let filters = FilterService::new(Arc::clone(&client));
        let dashboards = DashboardService::new(client, filters.clone());
        Self {
            dashboards,
            filters,
        }
    }

    pub fn dashboards(&self) -> &DashboardService {
        &self.dashboards
    }

    pub fn filters(&self) -> &FilterService {
        &self.filters
    }

    /// The service that handles `kind`.
    fn service(&self, kind: Kind) -> &dyn KindService {
        match kind {
            Kind::Dashboard => &self.dashboards,
            Kind::Filter => &self.filters,
        }
    }

    /// Create, update or skip one object.
    pub async fn apply_object(
        &self,
        project: &str,
        object: &AnyObject,
    ) -> Result<Outcome, CoreError> {
        self.service(object.kind()).apply(project, object).await
    }

    /// Decode `path` and apply the object it holds.
    pub async fn apply_file(&self, project: &str, path: &Path) -> Result<Applied, CoreError> {
        let object = load_file(path)?;
        let outcome = self.apply_object(project, &object).await?;
        Ok(Applied {
            kind: object.kind(),
            name: object.name().to_owned(),
            outcome,
        })
    }

    /// Apply a single file, or every `.yml`/`.yaml` file below a directory.
    ///
    /// A directory needs `recursive`. In a directory a failing file does
    /// not stop the others; if any failed the whole call returns
    /// [`CoreError::BatchFailed`] carrying the full report.
    pub async fn apply(
        &self,
        project: &str,
        path: &Path,
        recursive: bool,
    ) -> Result<ApplyReport, CoreError> {
        let metadata = fs::metadata(path).map_err(|source| CoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        if !metadata.is_dir() {
            let applied = self.apply_file(project, path).await?;
            return Ok(ApplyReport::single(path, applied));
        }

        if !recursive {
            return Err(CoreError::NotRecursive {
                path: path.to_path_buf(),
            });
        }

        let mut report = ApplyReport::default();
        for file in object_files(path) {
            let result = self.apply_file(project, &file).await;
            if let Err(err) = &result {
                warn!(file = %file.display(), error = %error_chain(err), "failed to apply file");
            }
            report.files.push(FileResult { path: file, result });
        }

        let failed = report.failed();
        if failed > 0 {
            return Err(CoreError::BatchFailed {
                failed,
                total: report.total(),
                report: Box::new(report),
            });
        }

        Ok(report)
    }

    /// Create the object in `path` without looking for an existing one.
    pub async fn create_file(&self, project: &str, path: &Path) -> Result<AnyObject, CoreError> {
        let object = load_file(path)?;
        self.service(object.kind())
            .create_object(project, &object)
            .await?;
        info!(
            kind = %object.kind(),
            name = object.name(),
            project,
            file = %path.display(),
            "created"
        );
        Ok(object)
    }

    pub async fn get(&self, kind: Kind, project: &str, id: i64) -> Result<AnyObject, CoreError> {
        self.service(kind).fetch(project, id).await
    }

    pub async fn get_by_name(
        &self,
        kind: Kind,
        project: &str,
        name: &str,
    ) -> Result<Option<AnyObject>, CoreError> {
        self.service(kind).fetch_by_name(project, name).await
    }

    /// Fetch by id and write the object to `path`.
    pub async fn export(
        &self,
        kind: Kind,
        project: &str,
        id: i64,
        path: &Path,
    ) -> Result<AnyObject, CoreError> {
        let object = self.get(kind, project, id).await?;
        write_file(&object, path)?;
        info!(
            %kind,
            id,
            project,
            file = %path.display(),
            "exported"
        );
        Ok(object)
    }

    /// Delete the named object. Not finding it is an error.
    pub async fn delete(&self, kind: Kind, project: &str, name: &str) -> Result<(), CoreError> {
        if !self.service(kind).delete_by_name(project, name).await? {
            return Err(CoreError::NotFound {
                kind,
                project: project.to_owned(),
                name: name.to_owned(),
            });
        }

        info!(%kind, name, project, "deleted");
        Ok(())
    }
}

// ── Kind-erased services ────────────────────────────────────────────

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, CoreError>> + Send + 'a>>;

/// An [`ObjectService`] seen through [`AnyObject`], so the reconciler picks
/// a service by [`Kind`] once instead of matching in every operation.
trait KindService: Sync {
    fn apply<'a>(&'a self, project: &'a str, target: &'a AnyObject) -> BoxFuture<'a, Outcome>;

    fn create_object<'a>(&'a self, project: &'a str, target: &'a AnyObject) -> BoxFuture<'a, ()>;

    fn fetch<'a>(&'a self, project: &'a str, id: i64) -> BoxFuture<'a, AnyObject>;

    fn fetch_by_name<'a>(
        &'a self,
        project: &'a str,
        name: &'a str,
    ) -> BoxFuture<'a, Option<AnyObject>>;

    /// `Ok(false)` when no object has that name.
    fn delete_by_name<'a>(&'a self, project: &'a str, name: &'a str) -> BoxFuture<'a, bool>;
}

impl<S> KindService for S
where
    S: ObjectService + Sync,
    S::Object: Into<AnyObject>,
{
    fn apply<'a>(
        &'a self,
        project: &'a str,
        target: &'a AnyObject,
    ) -> BoxFuture<'a, Outcome> {
        Box::pin(async move { reconcile(self, project, downcast::<S::Object>(target)?).await })
    }

    fn create_object<'a>(&'a self, project: &'a str, target: &'a AnyObject) -> BoxFuture<'a, ()> {
        Box::pin(async move {
            ObjectService::create(self, project, downcast::<S::Object>(target)?).await
        })
    }

    fn fetch<'a>(&'a self, project: &'a str, id: i64) -> BoxFuture<'a, AnyObject> {
        Box::pin(async move { Ok(ObjectService::get(self, project, id).await?.into()) })
    }

    fn fetch_by_name<'a>(
        &'a self,
        project: &'a str,
        name: &'a str,
    ) -> BoxFuture<'a, Option<AnyObject>> {
        Box::pin(async move {
            Ok(ObjectService::get_by_name(self, project, name)
                .await?
                .map(Into::into))
        })
    }

    fn delete_by_name<'a>(&'a self, project: &'a str, name: &'a str) -> BoxFuture<'a, bool> {
        Box::pin(async move {
            let Some(current) = ObjectService::get_by_name(self, project, name).await? else {
                return Ok(false);
            };
            ObjectService::delete(self, project, &current).await?;
            Ok(true)
        })
    }
}

fn downcast<T: Object>(object: &AnyObject) -> Result<&T, CoreError> {
    T::from_any(object).ok_or_else(|| CoreError::KindMismatch {
        expected: T::KIND,
        found: object.kind(),
        name: object.name().to_owned(),
    })
}

async fn reconcile<S: ObjectService + Sync>(
    service: &S,
    project: &str,
    target: &S::Object,
) -> Result<Outcome, CoreError> {
    let kind = target.kind();
    let name = target.name();

    let outcome = match service.get_by_name(project, name).await? {
        None => {
            service.create(project, target).await?;
            Outcome::Created
        }
        Some(current) if current.equals(target) => Outcome::Skipped,
        Some(current) => {
            service.update(project, &current, target).await?;
            Outcome::Updated
        }
    };

    info!(%kind, name, project, %outcome, "applied");
    Ok(outcome)
}

// ── Files ───────────────────────────────────────────────────────────

/// Read and decode the single object held in `path`.
pub fn load_file(path: &Path) -> Result<AnyObject, CoreError> {
    let text = fs::read_to_string(path).map_err(|source| CoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    AnyObject::from_yaml(&text).map_err(|err| match err {
        DecodeError::UnsupportedKind { kind } => CoreError::UnsupportedKind {
            path: path.to_path_buf(),
            kind,
        },
        DecodeError::Yaml(e) => CoreError::Decode {
            path: path.to_path_buf(),
            message: e.to_string(),
        },
    })
}

/// Encode `object` and write it to `path`, replacing any existing file.
pub fn write_file(object: &AnyObject, path: &Path) -> Result<(), CoreError> {
    let text = object.to_yaml().map_err(|e| CoreError::Encode {
        kind: object.kind(),
        name: object.name().to_owned(),
        message: e.to_string(),
    })?;

    fs::write(path, text).map_err(|source| CoreError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Every `.yml`/`.yaml` file below `root`, sorted by path. Unreadable
/// entries and other files are logged and left out.
fn object_files(root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(error = %err, "skipping unreadable entry");
                continue;
            }
        };

        if entry.file_type().is_dir() {
            continue;
        }

        let supported = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| OBJECT_EXTENSIONS.contains(&ext));
        if !supported {
            info!(
                file = %entry.path().display(),
                "ignoring file, only .yml and .yaml are supported"
            );
            continue;
        }

        files.push(entry.into_path());
    }

    files
}
