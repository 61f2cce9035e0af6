// ── Widget name disambiguation ──
//
// The service wants widget names unique per project, files only per
// dashboard. Remote widget names get a ` #xxxx` suffix derived from the
// dashboard name.

use sha1::{Digest, Sha1};

/// First 4 hex characters of the SHA-1 of the dashboard name.
pub fn dashboard_hash(dashboard: &str) -> String {
    let digest = Sha1::digest(dashboard.as_bytes());
    hex::encode(&digest[..2])
}

/// `"{widget} #{hash}"`
pub fn remote_widget_name(widget: &str, hash: &str) -> String {
    format!("{widget} #{hash}")
}

/// Strip exactly the ` #{hash}` suffix. Names without it are kept as-is.
pub fn local_widget_name<'a>(remote: &'a str, hash: &str) -> &'a str {
    remote
        .strip_suffix(hash)
        .and_then(|rest| rest.strip_suffix(" #"))
        .unwrap_or(remote)
}
