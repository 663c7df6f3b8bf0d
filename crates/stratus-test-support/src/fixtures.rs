//! JSON builders mirroring control-plane responses.

use serde_json::{Value, json};
use url::form_urlencoded;

/// Response header carrying URL-encoded, comma-separated warnings.
pub const WARNINGS_HEADER: &str = "X-Cf-Warnings";

/// Encode warnings the way the API does for [`WARNINGS_HEADER`].
#[must_use]
pub fn encode_warnings(warnings: &[&str]) -> String {
    warnings
        .iter()
        .map(|warning| form_urlencoded::byte_serialize(warning.as_bytes()).collect::<String>())
        .collect::<Vec<_>>()
        .join(",")
}

/// List envelope with an optional absolute `next` link.
#[must_use]
pub fn page(resources: Vec<Value>, next: Option<&str>) -> Value {
    json!({
        "pagination": {
            "total_results": resources.len(),
            "total_pages": 1,
            "next": next.map(|href| json!({"href": href})),
        },
        "resources": resources,
    })
}

/// Structured error body built from `(code, title, detail)` triples.
#[must_use]
pub fn error_body(errors: &[(i64, &str, &str)]) -> Value {
    json!({
        "errors": errors
            .iter()
            .map(|(code, title, detail)| json!({"code": code, "title": title, "detail": detail}))
            .collect::<Vec<_>>(),
    })
}

/// Application resource owned by `space_guid`.
#[must_use]
pub fn application(guid: &str, name: &str, space_guid: &str) -> Value {
    json!({
        "guid": guid,
        "name": name,
        "state": "STARTED",
        "relationships": {"space": {"data": {"guid": space_guid}}},
    })
}

/// Revision resource with a generated description.
#[must_use]
pub fn revision(guid: &str, version: u64) -> Value {
    json!({
        "guid": guid,
        "version": version,
        "description": format!("Initial revision {version}"),
        "deployable": true,
        "created_at": format!("2024-03-0{}T10:00:00Z", version % 9 + 1),
    })
}

/// Deployment resource with the given status value and reason.
#[must_use]
pub fn deployment(guid: &str, value: &str, reason: &str) -> Value {
    json!({
        "guid": guid,
        "status": {"value": value, "reason": reason},
        "strategy": "rolling",
    })
}

/// Build resource; `droplet_guid` is attached when present.
#[must_use]
pub fn build(guid: &str, state: &str, error: Option<&str>, droplet_guid: Option<&str>) -> Value {
    json!({
        "guid": guid,
        "state": state,
        "error": error,
        "droplet": droplet_guid.map(|droplet| json!({"guid": droplet})),
    })
}

/// Organization quota with every limit unlimited except total memory.
#[must_use]
pub fn organization_quota(guid: &str, name: &str, total_memory_in_mb: Option<u64>) -> Value {
    json!({
        "guid": guid,
        "name": name,
        "apps": {
            "total_memory_in_mb": total_memory_in_mb,
            "per_process_memory_in_mb": null,
            "total_instances": null,
        },
        "services": {"paid_services_allowed": true, "total_service_instances": null},
        "routes": {"total_routes": null, "total_reserved_ports": null},
    })
}
