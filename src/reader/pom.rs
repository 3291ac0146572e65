use std::collections::HashMap;
use std::sync::LazyLock;

use quick_xml::events::Event;
use quick_xml::Reader;
use regex::{Captures, Regex};

use crate::content_id::ContentId;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("static regex"));

/// Read the direct dependencies of a `pom.xml`.
///
/// Only `project/dependencies/dependency` entries count; managed and plugin
/// dependencies are not content of the project. `${...}` references are
/// resolved from `<properties>` and the project's own coordinates. Versions
/// that stay unresolved (or are inherited from a parent) become
/// [`ContentId::Invalid`].
pub fn content_ids(input: &str) -> Vec<ContentId> {
    if input.trim().is_empty() {
        return Vec::new();
    }

    match scan(input) {
        Ok(pom) => pom
            .dependencies
            .iter()
            .map(|dep| dep.content_id(&pom.properties))
            .collect(),
        Err(e) => {
            tracing::warn!(error = %e, "pom.xml is not well-formed");
            vec![ContentId::invalid(format!("pom.xml: {e}"))]
        }
    }
}

#[derive(Debug, Default)]
struct Pom {
    properties: HashMap<String, String>,
    dependencies: Vec<PomDependency>,
}

#[derive(Debug, Default)]
struct PomDependency {
    group_id: String,
    artifact_id: String,
    version: String,
}

impl PomDependency {
    fn content_id(&self, properties: &HashMap<String, String>) -> ContentId {
        let raw = format!("{}:{}:{}", self.group_id, self.artifact_id, self.version);
        let (Some(group), Some(artifact), Some(version)) = (
            resolve(&self.group_id, properties),
            resolve(&self.artifact_id, properties),
            resolve(&self.version, properties),
        ) else {
            tracing::debug!(coordinate = %raw, "unresolved property in pom.xml");
            return ContentId::invalid(raw);
        };

        ContentId::new(
            "maven",
            "mavencentral",
            &group,
            &artifact,
            Some(version.as_str()).filter(|v| !v.is_empty()),
        )
    }
}

/// Substitute `${name}` references; `None` if any is unknown.
fn resolve(value: &str, properties: &HashMap<String, String>) -> Option<String> {
    let mut unresolved = false;
    let resolved = PLACEHOLDER.replace_all(value, |caps: &Captures| {
        match properties.get(&caps[1]) {
            Some(v) => v.clone(),
            None => {
                unresolved = true;
                String::new()
            }
        }
    });
    (!unresolved).then(|| resolved.into_owned())
}

fn scan(input: &str) -> Result<Pom, quick_xml::Error> {
    let mut reader = Reader::from_str(input);
    reader.config_mut().trim_text(true);

    let mut pom = Pom::default();
    let mut buf = Vec::new();
    let mut path: Vec<String> = Vec::new();
    let mut current: Option<PomDependency> = None;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => {
                path.push(String::from_utf8_lossy(e.name().local_name().as_ref()).into_owned());
                if is_direct_dependency(&path) {
                    current = Some(PomDependency::default());
                }
            }
            Event::End(_) => {
                if is_direct_dependency(&path) {
                    if let Some(dep) = current.take() {
                        if !dep.artifact_id.is_empty() {
                            pom.dependencies.push(dep);
                        }
                    }
                }
                path.pop();
            }
            Event::Text(ref e) => {
                let text = e.unescape().unwrap_or_default().into_owned();
                let segments: Vec<&str> = path.iter().map(String::as_str).collect();
                match segments.as_slice() {
                    ["project", "properties", key] => {
                        pom.properties.insert(key.to_string(), text);
                    }
                    ["project", field @ ("groupId" | "artifactId" | "version")] => {
                        pom.properties.insert(format!("project.{field}"), text);
                    }
                    ["project", "parent", field @ ("groupId" | "version")] => {
                        pom.properties.insert(format!("project.parent.{field}"), text.clone());
                        pom.properties.entry(format!("project.{field}")).or_insert(text);
                    }
                    ["project", "dependencies", "dependency", field] => {
                        if let Some(dep) = current.as_mut() {
                            match *field {
                                "groupId" => dep.group_id = text,
                                "artifactId" => dep.artifact_id = text,
                                "version" => dep.version = text,
                                _ => {}
                            }
                        }
                    }
                    _ => {}
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(pom)
}

fn is_direct_dependency(path: &[String]) -> bool {
    matches!(path, [a, b, c] if a == "project" && b == "dependencies" && c == "dependency")
}
