//! Resolution of `$ref` references.
//!
//! Local references (`#/definitions/Error`) must point at an existing node of
//! the document. Relative file references (`common.yaml#/Error`) are loaded
//! relative to the file that contains them, each file at most once per check,
//! and the references inside those files are checked as well. Remote
//! references are never fetched.

use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::path::{Component, Path, PathBuf};
use url::Url;

use crate::document::SpecDocument;
use crate::report::Violation;
use crate::version::SpecVersion;
use crate::walk;

/// What to do with references to `http(s)://` and other remote locations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RemoteRefPolicy {
    /// Leave them unchecked, logging a warning
    #[default]
    Skip,
    /// Report each one as a violation
    Reject,
}

impl fmt::Display for RemoteRefPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteRefPolicy::Skip => write!(f, "skip"),
            RemoteRefPolicy::Reject => write!(f, "reject"),
        }
    }
}

/// Where a reference points, once its location part is classified.
#[derive(Debug, PartialEq, Eq)]
enum Target<'r> {
    Local,
    File(PathBuf),
    Remote(&'r str),
}

/// The node a reference leads to.
#[derive(Debug)]
pub enum Resolved<'a> {
    /// A node of the root document (`origin` is `None`) or of a loaded file
    Node {
        value: &'a Value,
        origin: Option<&'a Path>,
    },
    /// A remote location, which is never fetched
    Remote,
}

/// A document together with every local file its references reach.
pub struct LinkedDocument<'d> {
    document: &'d SpecDocument,
    version: SpecVersion,
    root_path: Option<PathBuf>,
    files: HashMap<PathBuf, Result<Value, String>>,
}

impl<'d> LinkedDocument<'d> {
    /// Load every file reachable through relative references, following
    /// references inside loaded files too. Failures are kept and reported
    /// by whichever reference needs the file.
    pub fn load(document: &'d SpecDocument, version: SpecVersion) -> Self {
        let mut linked = Self {
            document,
            version,
            root_path: document.source().map(normalize),
            files: HashMap::new(),
        };

        let mut pending = file_targets(document.root(), document.base_dir(), version);
        while let Some(path) = pending.pop() {
            if linked.files.contains_key(&path) || linked.root_path.as_ref() == Some(&path) {
                continue;
            }
            log::debug!("Loading referenced file {}", path.display());
            let loaded = SpecDocument::read_from_filename(&path)
                .map(SpecDocument::into_value)
                .map_err(|e| e.to_string());
            if let Ok(tree) = &loaded {
                pending.extend(file_targets(tree, path.parent(), version));
            }
            linked.files.insert(path, loaded);
        }
        linked
    }

    pub fn document(&self) -> &'d SpecDocument {
        self.document
    }

    pub fn version(&self) -> SpecVersion {
        self.version
    }

    /// Loaded files that parsed, sorted by path.
    pub fn files(&self) -> Vec<(&Path, &Value)> {
        let mut files: Vec<_> = self
            .files
            .iter()
            .filter_map(|(path, tree)| tree.as_ref().ok().map(|tree| (path.as_path(), tree)))
            .collect();
        files.sort_by(|a, b| a.0.cmp(b.0));
        files
    }

    /// Resolve `reference` as written in the tree named by `origin`.
    pub fn lookup(
        &self,
        origin: Option<&Path>,
        reference: &str,
    ) -> Result<Resolved<'_>, String> {
        let (location, fragment) = match reference.split_once('#') {
            Some((location, fragment)) => (location, fragment),
            None => (reference, ""),
        };
        let fragment = percent_decode_str(fragment)
            .decode_utf8()
            .map_err(|_| format!("`#{}` is not valid UTF-8 once decoded", fragment))?;

        let (tree, origin) = match classify(location)? {
            Target::Local => self.tree(origin)?,
            Target::Remote(_) => return Ok(Resolved::Remote),
            Target::File(relative) => {
                let base = match origin {
                    Some(file) => file.parent(),
                    None => self.document.base_dir(),
                }
                .ok_or_else(|| {
                    "relative references need a document read from a file".to_string()
                })?;
                self.tree(Some(&normalize(&base.join(relative))))?
            }
        };

        let value = resolve_fragment(tree, &fragment, self.version)?;
        Ok(Resolved::Node { value, origin })
    }

    fn tree(&self, origin: Option<&Path>) -> Result<(&Value, Option<&Path>), String> {
        let Some(path) = origin else {
            return Ok((self.document.root(), None));
        };
        if self.root_path.as_deref() == Some(path) {
            return Ok((self.document.root(), None));
        }
        match self.files.get_key_value(path) {
            Some((key, Ok(tree))) => Ok((tree, Some(key.as_path()))),
            Some((_, Err(reason))) => Err(reason.clone()),
            None => Err(format!("{} was never loaded", path.display())),
        }
    }

    /// How a loaded file is named in violation pointers.
    fn label(&self, path: &Path) -> String {
        let root_dir = self.document.base_dir().map(normalize);
        root_dir
            .as_deref()
            .and_then(|dir| path.strip_prefix(dir).ok())
            .unwrap_or(path)
            .display()
            .to_string()
    }
}

/// Check every `$ref` in the document and in the files it references,
/// returning one violation per reference that cannot be resolved.
pub fn check_references(
    document: &SpecDocument,
    version: SpecVersion,
    policy: RemoteRefPolicy,
) -> Vec<Violation> {
    check_linked(&LinkedDocument::load(document, version), policy)
}

/// Like [`check_references`], for a document whose files are already loaded.
pub fn check_linked(linked: &LinkedDocument<'_>, policy: RemoteRefPolicy) -> Vec<Violation> {
    let mut violations = check_tree(linked, linked.document.root(), None, policy);
    for (path, tree) in linked.files() {
        violations.extend(check_tree(linked, tree, Some(path), policy));
    }
    violations
}

fn check_tree(
    linked: &LinkedDocument<'_>,
    tree: &Value,
    origin: Option<&Path>,
    policy: RemoteRefPolicy,
) -> Vec<Violation> {
    let prefix = origin.map(|path| format!("{}#", linked.label(path)));

    let mut references = Vec::new();
    walk::visit_objects(tree, "", linked.version, &mut |pointer, object| {
        if let Some(Value::String(reference)) = object.get("$ref") {
            references.push((walk::child_pointer(pointer, "$ref"), reference.as_str()));
        }
    });

    references
        .into_iter()
        .filter_map(|(pointer, reference)| {
            let reason = match linked.lookup(origin, reference) {
                Ok(Resolved::Node { .. }) => return None,
                Ok(Resolved::Remote) => match policy {
                    RemoteRefPolicy::Skip => {
                        log::warn!("Skipping remote reference {}", reference);
                        return None;
                    }
                    RemoteRefPolicy::Reject => "remote references are not allowed".to_string(),
                },
                Err(reason) => reason,
            };
            let pointer = match &prefix {
                Some(prefix) => format!("{}{}", prefix, pointer),
                None => pointer,
            };
            Some(Violation::reference(
                pointer,
                format!("unresolvable reference `{}`: {}", reference, reason),
            ))
        })
        .collect()
}

/// Relative file references in `tree`, joined to `base` and normalized.
fn file_targets(tree: &Value, base: Option<&Path>, version: SpecVersion) -> Vec<PathBuf> {
    let Some(base) = base else {
        return Vec::new();
    };

    let mut targets = Vec::new();
    walk::visit_objects(tree, "", version, &mut |_, object| {
        if let Some(Value::String(reference)) = object.get("$ref") {
            let location = reference
                .split_once('#')
                .map_or(reference.as_str(), |(location, _)| location);
            if let Ok(Target::File(relative)) = classify(location) {
                targets.push(normalize(&base.join(relative)));
            }
        }
    });
    targets
}

/// Lexically remove `.` and `..` components, so one file has one key.
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                _ => normalized.push(".."),
            },
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

fn classify(location: &str) -> Result<Target<'_>, String> {
    if location.is_empty() {
        return Ok(Target::Local);
    }

    match Url::parse(location) {
        Ok(url) if url.scheme() == "file" => url
            .to_file_path()
            .map(Target::File)
            .map_err(|_| format!("`{}` is not a usable file URL", location)),
        // Single-letter schemes are Windows drive letters, not URLs.
        Ok(url) if url.scheme().len() > 1 => Ok(Target::Remote(location)),
        _ => Ok(Target::File(PathBuf::from(location))),
    }
}

fn resolve_fragment<'a>(
    root: &'a Value,
    fragment: &str,
    version: SpecVersion,
) -> Result<&'a Value, String> {
    if fragment.is_empty() {
        return Ok(root);
    }

    if fragment.starts_with('/') {
        return root
            .pointer(fragment)
            .ok_or_else(|| format!("`#{}` does not point to an existing node", fragment));
    }

    // JSON Schema 2020-12 allows plain-name fragments naming an `$anchor`.
    if version == SpecVersion::OpenApi31 {
        let mut found = None;
        walk::visit_objects(root, "", version, &mut |pointer, object| {
            if found.is_none() && object.get("$anchor").and_then(Value::as_str) == Some(fragment) {
                found = Some(pointer.to_string());
            }
        });
        return found
            .and_then(|pointer| root.pointer(&pointer))
            .ok_or_else(|| format!("no `$anchor` named `{}`", fragment));
    }

    Err(format!("`#{}` is not a JSON pointer", fragment))
}
