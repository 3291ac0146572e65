//! `package-lock.json` reader.
//!
//! Lockfile v2/v3 keep a flat `packages` map keyed by install path:
//!
//! ```json
//! {
//!   "lockfileVersion": 3,
//!   "packages": {
//!     "": { "name": "my-app", "version": "1.0.0" },
//!     "node_modules/@babel/code-frame": { "version": "7.10.4", "license": "MIT" }
//!   }
//! }
//! ```
//!
//! Lockfile v1 nests a `dependencies` tree keyed by package name. Both are
//! reduced to the same name + version extraction; when a file carries both,
//! `packages` wins.

use serde_json::{Map, Value};

use super::Manifest;
use crate::content_id::ContentId;

const NODE_MODULES: &str = "node_modules/";

pub fn read(input: &str) -> Manifest {
    if super::entry_lines(input).next().is_none() {
        return Manifest::default();
    }

    let json: Value = match serde_json::from_str(input) {
        Ok(json) => json,
        Err(e) => {
            tracing::warn!(error = %e, "package-lock.json is not valid JSON");
            return Manifest::from_ids(vec![ContentId::invalid(format!("package-lock.json: {e}"))]);
        }
    };

    let mut manifest = Manifest::default();

    if let Some(packages) = json.get("packages").and_then(Value::as_object) {
        for (path, entry) in packages {
            // The root project and workspace members are not third-party content.
            if !path.contains(NODE_MODULES) {
                continue;
            }
            if entry.get("link").and_then(Value::as_bool) == Some(true) {
                continue;
            }
            let name = entry
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or_else(|| name_from_path(path));
            push_entry(&mut manifest, name, entry);
        }
    } else if let Some(dependencies) = json.get("dependencies").and_then(Value::as_object) {
        collect_nested(dependencies, &mut manifest);
    }

    manifest
}

/// Walk a v1 `dependencies` tree depth-first.
fn collect_nested(dependencies: &Map<String, Value>, manifest: &mut Manifest) {
    for (name, entry) in dependencies {
        push_entry(manifest, name, entry);
        if let Some(nested) = entry.get("dependencies").and_then(Value::as_object) {
            collect_nested(nested, manifest);
        }
    }
}

fn push_entry(manifest: &mut Manifest, name: &str, entry: &Value) {
    let version = entry.get("version").and_then(Value::as_str);

    // v1 aliases: "string-width-cjs": { "version": "npm:string-width@4.2.3" }
    let (name, version) = match version
        .and_then(|v| v.strip_prefix("npm:"))
        .and_then(|alias| alias.rsplit_once('@'))
    {
        Some((real_name, real_version)) if !real_name.is_empty() => (real_name, Some(real_version)),
        _ => (name, version),
    };

    let id = npm_id(name, version);
    if let Some(license) = entry.get("license").and_then(Value::as_str) {
        if id.is_valid() {
            manifest.declared.insert(id.clone(), license.to_string());
        }
    }
    manifest.ids.push(id);
}

/// `node_modules/a/node_modules/@scope/b` → `@scope/b`
fn name_from_path(path: &str) -> &str {
    match path.rfind(NODE_MODULES) {
        Some(pos) => &path[pos + NODE_MODULES.len()..],
        None => path,
    }
}

/// Build an npm id; `@scope/name` puts `scope` (without `@`) in the namespace.
pub(crate) fn npm_id(name: &str, version: Option<&str>) -> ContentId {
    let (namespace, name) = match name.strip_prefix('@').and_then(|n| n.split_once('/')) {
        Some((scope, name)) => (scope, name),
        None => ("", name),
    };
    ContentId::new("npm", "npmjs", namespace, name, version)
}
