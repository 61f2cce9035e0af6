// ── Domain model ──
//
// Value objects decoded from files or materialized from the service.
// Remote bookkeeping lives only in the skipped `origin` fields.

pub mod dashboard;
pub mod filter;
pub mod kind;
pub mod object;

pub use dashboard::{ContentParameters, Dashboard, Widget, WidgetPosition, WidgetSize};
pub use filter::{Filter, FilterCondition, FilterOrder};
pub use kind::Kind;
pub use object::{AnyObject, DecodeError, Object};
