// ── Object kind discriminator ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Which object variant a file or remote record represents.
///
/// Written as the `kind:` tag of the text format.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
pub enum Kind {
    Dashboard,
    Filter,
}
