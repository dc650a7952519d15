use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{NameError, Result};
use crate::value::Value;
use crate::{DEFAULT_EXTENSION, DEFAULT_SEPARATOR};

/// Parameter name -> parameter value, kept sorted by key
pub type ParameterMap = BTreeMap<String, String>;

/// Outcome of decoding one file name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedName {
    pub base_name: String,
    pub parameters: ParameterMap,
}

/// Split `name` (without directory or extension) into base name and parameters.
///
/// The first token is the base name only when it holds no `=`. Empty tokens,
/// such as the one left by a trailing separator, are skipped. A base name
/// that itself contains `=` is read as a parameter token; callers must not
/// put `=` in base names. An empty name decodes to an empty base name.
pub fn decode(name: &str, separator: &str) -> Result<DecodedName> {
    let mut decoded = DecodedName::default();
    for (position, token) in name.split(separator).enumerate() {
        if position == 0 && !token.contains('=') {
            decoded.base_name = token.to_string();
            continue;
        }
        if token.is_empty() {
            continue;
        }

        let mut parts = token.split('=');
        let (Some(key), Some(value), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(NameError::malformed(name, token));
        };
        if decoded
            .parameters
            .insert(key.to_string(), value.to_string())
            .is_some()
        {
            return Err(NameError::DuplicateKey {
                name: name.to_string(),
                key: key.to_string(),
            });
        }
    }

    Ok(decoded)
}

/// Render `base_name` followed by `separator key=value` for every parameter.
#[must_use]
pub fn encode(base_name: &str, parameters: &BTreeMap<String, Value>, separator: &str) -> String {
    let mut name = base_name.to_string();
    for (key, value) in parameters {
        name.push_str(separator);
        name.push_str(key);
        name.push('=');
        name.push_str(&value.to_string());
    }
    name
}

/// [`encode`] for maps whose values are already rendered.
#[must_use]
pub fn encode_strings(base_name: &str, parameters: &ParameterMap, separator: &str) -> String {
    let mut name = base_name.to_string();
    for (key, value) in parameters {
        name.push_str(separator);
        name.push_str(key);
        name.push('=');
        name.push_str(value);
    }
    name
}

/// Codec bound to one separator and one file extension
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameCodec {
    separator: String,
    extension: String,
}

impl Default for NameCodec {
    fn default() -> Self {
        Self::new(DEFAULT_SEPARATOR, DEFAULT_EXTENSION)
    }
}

impl NameCodec {
    pub fn new(separator: impl Into<String>, extension: impl Into<String>) -> Self {
        let extension: String = extension.into();
        Self {
            separator: separator.into(),
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    #[must_use]
    pub fn separator(&self) -> &str {
        &self.separator
    }

    #[must_use]
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Decode a bare file name, stripping the configured extension if present.
    pub fn decode(&self, file_name: &str) -> Result<DecodedName> {
        decode(self.stem(file_name), &self.separator)
    }

    /// Decode the file-name component of `path`.
    pub fn decode_path(&self, path: &Path) -> Result<DecodedName> {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy())
            .ok_or(NameError::Empty)?;
        self.decode(&file_name)
    }

    /// Full file name (with extension) for string-valued parameters.
    #[must_use]
    pub fn file_name(&self, base_name: &str, parameters: &ParameterMap) -> String {
        self.with_extension(encode_strings(base_name, parameters, &self.separator))
    }

    /// Full file name (with extension) for tagged parameters.
    #[must_use]
    pub fn file_name_typed(&self, base_name: &str, parameters: &BTreeMap<String, Value>) -> String {
        self.with_extension(encode(base_name, parameters, &self.separator))
    }

    fn with_extension(&self, mut name: String) -> String {
        if !self.extension.is_empty() {
            name.push('.');
            name.push_str(&self.extension);
        }
        name
    }

    fn stem<'a>(&self, file_name: &'a str) -> &'a str {
        if self.extension.is_empty() {
            return file_name;
        }
        match file_name.rsplit_once('.') {
            Some((stem, ext)) if ext.eq_ignore_ascii_case(&self.extension) => stem,
            _ => file_name,
        }
    }
}
