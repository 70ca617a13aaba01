use indexmap::IndexMap;
use itertools::Itertools;

use super::operation::{OperationSpec, Policy};
use super::transport::Request;
use crate::core::{Result, XbrlError};

pub const LIST_DELIMITER: &str = ", ";

/// A parameter value as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Scalar(String),
    List(Vec<String>),
}

impl ParamValue {
    /// Splits `a,b,c` into a list; input without commas stays a scalar.
    pub fn parse(raw: &str) -> Self {
        if raw.contains(',') {
            ParamValue::List(raw.split(',').map(|v| v.trim().to_string()).collect())
        } else {
            ParamValue::Scalar(raw.trim().to_string())
        }
    }

    fn into_items(self) -> Vec<String> {
        match self {
            ParamValue::Scalar(s) => vec![s],
            ParamValue::List(items) => items,
        }
    }

    /// Non-blank values, trimmed, in input order.
    pub fn values(&self) -> Vec<&str> {
        let values: Vec<&str> = match self {
            ParamValue::Scalar(s) => vec![s.as_str()],
            ParamValue::List(items) => items.iter().map(String::as_str).collect(),
        };
        values
            .into_iter()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .collect()
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Scalar(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Scalar(value)
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        ParamValue::Scalar(value.to_string())
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Scalar(value.to_string())
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(values: Vec<String>) -> Self {
        ParamValue::List(values)
    }
}

impl From<Vec<&str>> for ParamValue {
    fn from(values: Vec<&str>) -> Self {
        ParamValue::List(values.into_iter().map(String::from).collect())
    }
}

impl<const N: usize> From<[&str; N]> for ParamValue {
    fn from(values: [&str; N]) -> Self {
        ParamValue::List(values.iter().map(|v| v.to_string()).collect())
    }
}

/// Caller-supplied parameters of one operation call, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(IndexMap<String, ParamValue>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        self.0.insert(name.into(), value.into());
    }

    /// Adds values to a parameter, extending any list already held under the
    /// same name (compared case-insensitively). Unlike `insert`, nothing is lost.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        let name = name.into();
        let value = value.into();
        let existing = self.0.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(&name));
        match existing {
            Some((_, current)) => {
                let mut items = current.clone().into_items();
                items.extend(value.into_items());
                *current = ParamValue::List(items);
            }
            None => {
                self.0.insert(name, value);
            }
        }
    }

    /// Inserts the value only when present.
    pub fn insert_opt<V: Into<ParamValue>>(&mut self, name: &str, value: Option<V>) {
        if let Some(value) = value {
            self.insert(name, value);
        }
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Params(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Turns caller parameters into the requests needed to answer one operation call.
///
/// `Join` parameters contribute a single `", "` separated value to every
/// request. Each value of a `FanOut` parameter gets its own request; values of
/// several fan-out parameters are issued one after another, in declaration
/// order then value order. Absent or empty parameters are left out of the request.
/// Parameter names are matched case-insensitively against the declaration.
pub fn expand(spec: &OperationSpec, params: &Params) -> Result<Vec<Request>> {
    for (name, _) in params.iter() {
        if spec.param(name).is_none() {
            return Err(XbrlError::validation(format!(
                "{} does not accept parameter {}; expected one of: {}",
                spec.operation,
                name,
                spec.params.iter().map(|p| p.name).join(", ")
            )));
        }
    }

    // (declaration index, name, value)
    let mut joined: Vec<(usize, &'static str, String)> = Vec::new();
    let mut fanned: Vec<(usize, &'static str, String)> = Vec::new();
    for (index, declared) in spec.params.iter().enumerate() {
        let values: Vec<&str> = params
            .iter()
            .filter(|(name, _)| name.eq_ignore_ascii_case(declared.name))
            .flat_map(|(_, value)| value.values())
            .collect();

        if values.is_empty() {
            continue;
        }

        match declared.policy {
            Policy::Join => joined.push((index, declared.name, values.join(LIST_DELIMITER))),
            Policy::FanOut => {
                fanned.extend(values.into_iter().map(|v| (index, declared.name, v.to_string())))
            }
        }
    }

    let combinations: Vec<Vec<(usize, &'static str, String)>> = if fanned.is_empty() {
        vec![joined]
    } else {
        fanned
            .into_iter()
            .map(|single| {
                let mut pairs = joined.clone();
                pairs.push(single);
                pairs.sort_by_key(|(index, _, _)| *index);
                pairs
            })
            .collect()
    };

    let requests: Vec<Request> = combinations
        .into_iter()
        .map(|pairs| Request {
            task: spec.task,
            params: pairs
                .into_iter()
                .map(|(_, name, value)| (name.to_string(), value))
                .collect(),
            requires_credential: spec.requires_credential,
        })
        .collect();

    log::debug!("{} expands to {} request(s)", spec.operation, requests.len());
    Ok(requests)
}
