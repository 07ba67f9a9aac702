//! Loading specification documents from YAML or JSON.
//!
//! A [`SpecDocument`] is the deserialized tree of one specification file. It
//! is always held as a `serde_json::Value` so the same tree can be fed to the
//! JSON Schema validator; YAML mapping keys that are not strings (response
//! codes such as `200:` are the common case) are converted to their string form.

use serde_json::{Map, Number, Value};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{CheckError, SourceLocation};

/// Source syntax of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Yaml,
    Json,
}

impl SourceFormat {
    /// Pick the parser from the file extension. Anything other than `.json`
    /// is read as YAML, which also accepts JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => SourceFormat::Json,
            _ => SourceFormat::Yaml,
        }
    }
}

/// In-memory specification document.
#[derive(Debug, Clone)]
pub struct SpecDocument {
    root: Value,
    source: Option<PathBuf>,
}

impl SpecDocument {
    /// Wrap an already-deserialized tree.
    pub fn from_value(root: Value) -> Self {
        Self { root, source: None }
    }

    /// Parse YAML (or JSON) text that has no file behind it.
    pub fn parse(content: &str) -> Result<Self, CheckError> {
        let root = parse_content(content, SourceFormat::Yaml, None)?;
        Ok(Self { root, source: None })
    }

    /// Read and parse a specification file.
    ///
    /// Fails with [`CheckError::Io`] before any parsing when the file cannot
    /// be read, and with [`CheckError::Parse`] when it is not well-formed.
    pub fn read_from_filename(path: impl AsRef<Path>) -> Result<Self, CheckError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| CheckError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let root = parse_content(&content, SourceFormat::from_path(path), Some(path))?;
        log::debug!("Loaded specification document from {}", path.display());

        Ok(Self {
            root,
            source: Some(path.to_path_buf()),
        })
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    /// File the document was read from.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Directory against which relative `$ref`s resolve.
    pub fn base_dir(&self) -> Option<&Path> {
        self.source.as_deref().map(|p| match p.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        })
    }

    pub fn into_value(self) -> Value {
        self.root
    }
}

fn parse_content(
    content: &str,
    format: SourceFormat,
    path: Option<&Path>,
) -> Result<Value, CheckError> {
    let parse_error = |message: String, location: Option<SourceLocation>| CheckError::Parse {
        path: path.map(Path::to_path_buf),
        message,
        location,
    };

    match format {
        SourceFormat::Json => serde_json::from_str::<Value>(content).map_err(|e| {
            let location = (e.line() > 0).then(|| SourceLocation {
                line: e.line(),
                column: e.column(),
            });
            parse_error(e.to_string(), location)
        }),
        SourceFormat::Yaml => {
            let yaml: serde_yaml::Value = serde_yaml::from_str(content).map_err(|e| {
                let location = e.location().map(|l| SourceLocation {
                    line: l.line(),
                    column: l.column(),
                });
                parse_error(e.to_string(), location)
            })?;
            yaml_to_json(yaml).map_err(|message| parse_error(message, None))
        }
    }
}

fn yaml_to_json(value: serde_yaml::Value) -> Result<Value, String> {
    Ok(match value {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(b),
        serde_yaml::Value::Number(n) => yaml_number(&n)?,
        serde_yaml::Value::String(s) => Value::String(s),
        serde_yaml::Value::Sequence(items) => Value::Array(
            items
                .into_iter()
                .map(yaml_to_json)
                .collect::<Result<Vec<_>, _>>()?,
        ),
        serde_yaml::Value::Mapping(mapping) => {
            let mut object = Map::with_capacity(mapping.len());
            for (key, value) in mapping {
                object.insert(yaml_key(key)?, yaml_to_json(value)?);
            }
            Value::Object(object)
        }
        // Custom tags carry no meaning for OpenAPI; keep the tagged value.
        serde_yaml::Value::Tagged(tagged) => yaml_to_json(tagged.value)?,
    })
}

fn yaml_number(n: &serde_yaml::Number) -> Result<Value, String> {
    if let Some(i) = n.as_i64() {
        Ok(Value::from(i))
    } else if let Some(u) = n.as_u64() {
        Ok(Value::from(u))
    } else {
        n.as_f64()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| format!("number `{}` cannot be represented in JSON", n))
    }
}

fn yaml_key(key: serde_yaml::Value) -> Result<String, String> {
    match key {
        serde_yaml::Value::String(s) => Ok(s),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        serde_yaml::Value::Null => Ok("null".to_string()),
        serde_yaml::Value::Tagged(tagged) => yaml_key(tagged.value),
        serde_yaml::Value::Sequence(_) | serde_yaml::Value::Mapping(_) => {
            Err("mapping keys must be scalars".to_string())
        }
    }
}
