//! Reconciliation engine between dashboards-as-code files and ReportPortal.
//!
//! This crate owns the object model and the create-or-update-or-skip logic:
//!
//! - **Object model** ([`model`]): [`Dashboard`] (with its [`Widget`]s) and
//!   [`Filter`], plus the [`AnyObject`] tagged union that the text format
//!   decodes into. Objects fetched from the service carry an origin
//!   back-reference that never takes part in equality or serialization.
//!
//! - **Equality** ([`equal`]): order-insensitive comparison of the
//!   collections an author may reorder freely. A missing collection and an
//!   empty one are different.
//!
//! - **Field codec** ([`codec`]): rewrites `statistics$defects$…` content
//!   fields between portable short names and project-local locators.
//!
//! - **Object services** ([`service`]): per-kind get / get-by-name / create /
//!   update / delete on top of `rpdac-api`.
//!
//! - **[`Reconciler`]**: single-object and batch apply, create, export,
//!   delete.

pub mod codec;
pub mod config;
pub mod convert;
pub mod equal;
pub mod error;
pub mod model;
pub mod naming;
pub mod reconcile;
pub mod service;

// ── Primary re-exports ──────────────────────────────────────────────
pub use codec::SubTypeMap;
pub use config::ServiceConfig;
pub use error::{CoreError, error_chain};
pub use rpdac_api::Error as ApiError;
pub use model::{
    AnyObject, ContentParameters, Dashboard, DecodeError, Filter, FilterCondition, FilterOrder,
    Kind, Object, Widget, WidgetPosition, WidgetSize,
};
pub use reconcile::{Applied, ApplyReport, FileResult, Outcome, Reconciler};
pub use service::{DashboardService, FilterService, ObjectService};
