//! Values handed to the embedded scripting bridge.

use std::collections::BTreeMap;

pub const COPYRIGHT: &str = "Copyright (c) 2020 Andre Leiradella";
pub const LICENSE: &str = "MIT";
pub const VERSION: &str = "1.0.0";
pub const NAME: &str = "hc";
pub const URL: &str = "https://github.com/leiradel/hackable-console";
pub const DESCRIPTION: &str = "Hackable Console bindings";

#[derive(Debug, Clone, PartialEq)]
pub enum ScriptValue {
    Nil,
    Boolean(bool),
    Integer(i64),
    String(String),
    Table(BTreeMap<String, ScriptValue>),
}

impl ScriptValue {
    pub fn table() -> ScriptValue {
        ScriptValue::Table(BTreeMap::new())
    }

    pub fn get(&self, key: &str) -> Option<&ScriptValue> {
        match *self {
            ScriptValue::Table(ref fields) => fields.get(key),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match *self {
            ScriptValue::String(ref value) => Some(value),
            _ => None,
        }
    }

    /// Sets `key` when `self` is a table; other values are left alone.
    pub fn set(&mut self, key: &str, value: ScriptValue) {
        if let ScriptValue::Table(ref mut fields) = *self {
            fields.insert(key.to_string(), value);
        }
    }
}

impl From<&str> for ScriptValue {
    fn from(value: &str) -> ScriptValue {
        ScriptValue::String(value.to_string())
    }
}

impl From<String> for ScriptValue {
    fn from(value: String) -> ScriptValue {
        ScriptValue::String(value)
    }
}

impl From<i64> for ScriptValue {
    fn from(value: i64) -> ScriptValue {
        ScriptValue::Integer(value)
    }
}

impl From<bool> for ScriptValue {
    fn from(value: bool) -> ScriptValue {
        ScriptValue::Boolean(value)
    }
}

/// Adds the descriptive constants every bindings table carries.
pub fn add_constants(table: &mut ScriptValue) {
    let constants = [
        ("_COPYRIGHT", COPYRIGHT),
        ("_LICENSE", LICENSE),
        ("_VERSION", VERSION),
        ("_NAME", NAME),
        ("_URL", URL),
        ("_DESCRIPTION", DESCRIPTION),
        ("soExtension", std::env::consts::DLL_EXTENSION),
    ];

    for (name, value) in constants.iter() {
        table.set(name, (*value).into());
    }
}
