// ── Polymorphic object + text format ──
//
// Files hold exactly one object. The `kind` tag is read first, then the
// whole document is decoded into the matching variant.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use super::{Dashboard, Filter, Kind};

/// Capabilities shared by every reconcilable object.
pub trait Object {
    const KIND: Kind;

    /// Identity key within a project.
    fn name(&self) -> &str;

    fn kind(&self) -> Kind {
        Self::KIND
    }

    /// Structural equality that ignores the remote origin.
    fn equals(&self, other: &Self) -> bool;

    /// Borrow the object out of an [`AnyObject`] holding this kind.
    fn from_any(object: &AnyObject) -> Option<&Self>
    where
        Self: Sized;
}

/// Any object the text format can hold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum AnyObject {
    Dashboard(Dashboard),
    Filter(Filter),
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error("object kind '{kind}' is not supported")]
    UnsupportedKind { kind: String },
}

#[derive(Deserialize)]
struct KindProbe {
    #[serde(default)]
    kind: Option<String>,
}

impl AnyObject {
    pub fn name(&self) -> &str {
        match self {
            Self::Dashboard(d) => d.name(),
            Self::Filter(f) => f.name(),
        }
    }

    pub fn kind(&self) -> Kind {
        match self {
            Self::Dashboard(_) => Kind::Dashboard,
            Self::Filter(_) => Kind::Filter,
        }
    }

    /// Decode one object from YAML.
    ///
    /// A missing or empty `kind` is read as a dashboard, for files written
    /// before the tag existed. Any other unknown tag is rejected.
    pub fn from_yaml(text: &str) -> Result<Self, DecodeError> {
        let probe: KindProbe = serde_yaml::from_str(text)?;

        let kind = match probe.kind.as_deref().map(str::trim) {
            None | Some("") => {
                warn!("kind not set, assuming '{}'", Kind::Dashboard);
                Kind::Dashboard
            }
            Some(tag) => tag
                .parse::<Kind>()
                .map_err(|_| DecodeError::UnsupportedKind {
                    kind: tag.to_owned(),
                })?,
        };

        Ok(match kind {
            Kind::Dashboard => Self::Dashboard(serde_yaml::from_str(text)?),
            Kind::Filter => Self::Filter(serde_yaml::from_str(text)?),
        })
    }

    /// Encode as YAML with the `kind` tag first. The origin is never written.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}

impl From<Dashboard> for AnyObject {
    fn from(d: Dashboard) -> Self {
        Self::Dashboard(d)
    }
}

impl From<Filter> for AnyObject {
    fn from(f: Filter) -> Self {
        Self::Filter(f)
    }
}
