// SPDX-FileCopyrightText: Copyright (c) 2025 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Declarative JSON mapping
//!
//! Every read command projects a vendor Redfish document into its own
//! output document. The projection is described by a static table of
//! [`Rule`]s and executed by a [`Mapper`]:
//!
//! - A *plain* rule copies the node at `source` (a JSON pointer, `""` for
//!   the document itself) to `target`. A missing node becomes an explicit
//!   `null`; the key is never omitted unless a [`Transform::Custom`]
//!   discards it or a filter rejects the document.
//! - A *nested* rule walks the array at `source` and applies its nested
//!   table to every element, appending one object per element to the
//!   array at `target`.
//! - `${Oem}` in a source path is replaced with the discovered OEM vendor
//!   name before lookup.
//!
//! The source is read by reference; emitted values are clones, so the
//! same document can be mapped any number of times.
//!
//! ```rust
//! use serde_json::json;
//! use utool_core::mapping::{Mapper, Rule};
//!
//! const RULES: &[Rule] = &[
//!     Rule::new("/Status/Health", "Health"),
//!     Rule::new("/Oem/${Oem}/BoardId", "BoardId"),
//! ];
//!
//! let source = json!({ "Status": { "Health": "OK" }, "Oem": { "Huawei": { "BoardId": "0x00ad" } } });
//! let output = Mapper::new("Huawei").map(&source, RULES).unwrap();
//! assert_eq!(serde_json::Value::Object(output), json!({ "Health": "OK", "BoardId": "0x00ad" }));
//! ```

/// Stock value converters.
pub mod convert;

use crate::OEM_PLACEHOLDER;
use serde_json::Map;
use serde_json::Value as JsonValue;
use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;

/// Output object built by the mapper.
pub type JsonObject = Map<String, JsonValue>;

/// Predicate deciding whether a rule applies to a document (plain rules)
/// or to an array element (nested rules).
pub type Filter = fn(&JsonValue) -> bool;

/// Value transformation applied by a plain rule.
#[derive(Debug, Clone, Copy)]
pub enum Transform {
    /// Copy the node unchanged.
    Identity,
    /// Relabel string values; unknown values pass through unchanged.
    Rename(&'static [(&'static str, &'static str)]),
    /// Convert a present value; `null` is left as is.
    Convert(fn(JsonValue) -> Result<JsonValue, MappingError>),
    /// Compute the output from the located node (or the whole document for
    /// [`Rule::root`] rules). `None` leaves the key out of the output.
    Custom(fn(&JsonValue) -> Result<Option<JsonValue>, MappingError>),
}

/// One entry of a mapping table.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    source: &'static str,
    target: &'static str,
    nested: Option<&'static [Rule]>,
    filter: Option<Filter>,
    transform: Transform,
    use_root: bool,
}

impl Rule {
    /// Copy `source` to `target`.
    #[must_use]
    pub const fn new(source: &'static str, target: &'static str) -> Self {
        Self {
            source,
            target,
            nested: None,
            filter: None,
            transform: Transform::Identity,
            use_root: false,
        }
    }

    /// Map every element of the array at `source` with `rules`.
    #[must_use]
    pub const fn nested(self, rules: &'static [Rule]) -> Self {
        Self {
            nested: Some(rules),
            ..self
        }
    }

    /// Apply the rule only when `filter` accepts the document (or, for a
    /// nested rule, only to the elements it accepts).
    #[must_use]
    pub const fn filter(self, filter: Filter) -> Self {
        Self {
            filter: Some(filter),
            ..self
        }
    }

    /// Transform the copied value.
    #[must_use]
    pub const fn transform(self, transform: Transform) -> Self {
        Self { transform, ..self }
    }

    /// Hand the whole document to the transform instead of the node at
    /// `source`, for outputs derived from several sibling fields.
    #[must_use]
    pub const fn root(self) -> Self {
        Self {
            use_root: true,
            ..self
        }
    }

    /// Source path as written in the table.
    #[must_use]
    pub const fn source(&self) -> &'static str {
        self.source
    }

    /// Output key.
    #[must_use]
    pub const fn target(&self) -> &'static str {
        self.target
    }
}

/// Mapping errors. Any error aborts the whole mapping; the partially
/// built target must be discarded.
#[derive(Debug, Clone, PartialEq)]
pub enum MappingError {
    /// Nested rule source is present but is not an array.
    NotAnArray { path: String },
    /// Nested rule target key already holds a non-array value.
    TargetNotArray { key: String },
    /// Converter received a value of unexpected type.
    UnexpectedValue {
        expected: &'static str,
        value: JsonValue,
    },
    /// Error raised by a custom transform.
    Custom(String),
    /// Error while producing a particular output key.
    Field {
        target: &'static str,
        error: Box<MappingError>,
    },
}

impl MappingError {
    fn at(self, target: &'static str) -> Self {
        match self {
            err @ Self::Field { .. } => err,
            err => Self::Field {
                target,
                error: Box::new(err),
            },
        }
    }
}

impl Display for MappingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::NotAnArray { path } => write!(f, "{path} is not an array"),
            Self::TargetNotArray { key } => write!(f, "output key {key} is not an array"),
            Self::UnexpectedValue { expected, value } => {
                write!(f, "expected {expected}, found {value}")
            }
            Self::Custom(reason) => reason.fmt(f),
            Self::Field { target, error } => write!(f, "{target}: {error}"),
        }
    }
}

impl StdError for MappingError {}

/// Interpreter of mapping tables.
#[derive(Debug, Clone, Copy)]
pub struct Mapper<'a> {
    oem_name: &'a str,
}

impl<'a> Mapper<'a> {
    /// Mapper substituting `${Oem}` with `oem_name`.
    #[must_use]
    pub const fn new(oem_name: &'a str) -> Self {
        Self { oem_name }
    }

    /// Map `source` into a fresh object.
    ///
    /// # Errors
    ///
    /// Returns the first rule failure.
    pub fn map(&self, source: &JsonValue, rules: &[Rule]) -> Result<JsonObject, MappingError> {
        let mut target = JsonObject::new();
        self.map_into(source, &mut target, rules)?;
        Ok(target)
    }

    /// Map `source` into `target`, applying rules in table order.
    ///
    /// # Errors
    ///
    /// Returns the first rule failure; `target` is left partially filled.
    pub fn map_into(
        &self,
        source: &JsonValue,
        target: &mut JsonObject,
        rules: &[Rule],
    ) -> Result<(), MappingError> {
        rules.iter().try_for_each(|rule| match rule.nested {
            None => self.apply_plain(source, target, rule),
            Some(nested) => self.apply_nested(source, target, rule, nested),
        })
    }

    /// Effective source path of `rule`.
    #[must_use]
    pub fn source_path(&self, rule: &Rule) -> Cow<'static, str> {
        if rule.source.contains(OEM_PLACEHOLDER) {
            Cow::Owned(rule.source.replace(OEM_PLACEHOLDER, self.oem_name))
        } else {
            Cow::Borrowed(rule.source)
        }
    }

    fn locate<'v>(&self, source: &'v JsonValue, rule: &Rule) -> Option<&'v JsonValue> {
        if rule.use_root {
            return Some(source);
        }
        let path = self.source_path(rule);
        if path.is_empty() {
            Some(source)
        } else {
            source.pointer(&path)
        }
    }

    fn apply_plain(
        &self,
        source: &JsonValue,
        target: &mut JsonObject,
        rule: &Rule,
    ) -> Result<(), MappingError> {
        if rule.filter.is_some_and(|accepts| !accepts(source)) {
            return Ok(());
        }
        let node = self.locate(source, rule).cloned().unwrap_or(JsonValue::Null);
        let value = match rule.transform {
            Transform::Identity => Some(node),
            Transform::Rename(table) => Some(rename(node, table)),
            Transform::Convert(_) if node.is_null() => Some(node),
            Transform::Convert(convert) => Some(convert(node).map_err(|e| e.at(rule.target))?),
            Transform::Custom(custom) => custom(&node).map_err(|e| e.at(rule.target))?,
        };
        if let Some(value) = value {
            target.insert(rule.target.to_string(), value);
        }
        Ok(())
    }

    fn apply_nested(
        &self,
        source: &JsonValue,
        target: &mut JsonObject,
        rule: &Rule,
        nested: &[Rule],
    ) -> Result<(), MappingError> {
        let elements = match self.locate(source, rule) {
            None | Some(JsonValue::Null) => &[][..],
            Some(JsonValue::Array(items)) => items.as_slice(),
            Some(_) => {
                return Err(MappingError::NotAnArray {
                    path: self.source_path(rule).into_owned(),
                })
            }
        };
        let slot = target
            .entry(rule.target)
            .or_insert_with(|| JsonValue::Array(Vec::new()));
        let JsonValue::Array(output) = slot else {
            return Err(MappingError::TargetNotArray {
                key: rule.target.to_string(),
            });
        };
        for element in elements {
            if rule.filter.is_some_and(|accepts| !accepts(element)) {
                continue;
            }
            output.push(JsonValue::Object(self.map(element, nested)?));
        }
        Ok(())
    }
}

fn rename(node: JsonValue, table: &[(&str, &str)]) -> JsonValue {
    match node.as_str() {
        Some(value) => table
            .iter()
            .find(|(from, _)| *from == value)
            .map_or(node.clone(), |(_, to)| JsonValue::String((*to).to_string())),
        None => node,
    }
}
