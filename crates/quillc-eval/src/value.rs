//! Runtime values (§4.4). The original evaluator's `Value` is a
//! four-variant `std::variant<monostate, bool, double, string>`
//! (`Helpers.hpp`); `new` expressions need a representable runtime
//! value this language never had, so `Object` is an addition with no
//! counterpart in the source this was modeled on.

use std::collections::HashMap;
use std::fmt;

use quillc_par::SymbolId;

#[derive(Debug, Clone)]
pub struct ObjectValue {
    pub type_id: SymbolId,
    pub type_name: String,
    pub fields: HashMap<SymbolId, Value>,
}

#[derive(Debug, Clone)]
pub enum Value {
    Void,
    Bool(bool),
    Number(f64),
    String(String),
    Object(ObjectValue),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Void => "void",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Object(_) => "object",
        }
    }

    /// Differing concrete variants are never equal (§4.4: comparison
    /// across differing concrete types is `false` for `==`).
    pub fn runtime_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Void, Value::Void) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            _ => false,
        }
    }

    /// CLI argument marshalling (§6.2): a value that parses as a
    /// number becomes one, an exact lowercase `true`/`false` becomes a
    /// bool, anything else is passed through as a string.
    pub fn from_cli_arg(raw: &str) -> Value {
        if let Ok(n) = raw.parse::<f64>() {
            return Value::Number(n);
        }
        match raw {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => Value::String(raw.to_string()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Void => write!(f, "Void"),
            Value::Bool(true) => write!(f, "True"),
            Value::Bool(false) => write!(f, "False"),
            Value::Number(n) => write!(f, "{n}"),
            Value::String(s) => write!(f, "{s}"),
            Value::Object(obj) => write!(f, "<object {}>", obj.type_name),
        }
    }
}
