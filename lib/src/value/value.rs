use std::fmt;
use std::sync::Arc;
use std::collections::BTreeMap;

use serde::{Serialize, Deserialize};

use crate::error::{ConfigError, Result};

pub type Dict<K = Arc<str>, V = Value> = BTreeMap<K, V>;

/// Represents any valid option value.
#[derive(Debug, Serialize, Hash, Deserialize, Clone, PartialEq, Eq, PartialOrd, Ord)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Num(Num),
    String(Arc<str>),
    Array(Arc<Vec<Value>>),
    Dict(Arc<Dict>),
}

impl Value {
    pub fn to_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None
        }
    }

    pub fn to_num(&self) -> Option<Num> {
        match self {
            Value::Num(n) => Some(*n),
            _ => None
        }
    }

    pub fn into_str(self) -> Result<Arc<str>, Value> {
        match self {
            Value::String(s) => Ok(s),
            _ => Err(self),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(&**s),
            _ => None
        }
    }

    pub fn as_slice(&self) -> Option<&[Value]> {
        match self {
            Value::Array(v) => Some(v.as_slice()),
            _ => None
        }
    }

    pub fn as_dict(&self) -> Option<&Dict> {
        match self {
            Value::Dict(v) => Some(&**v),
            _ => None
        }
    }

    pub fn into_dict(self) -> Result<Arc<Dict>, Value> {
        match self {
            Value::Dict(v) => Ok(v),
            _ => Err(self)
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Num(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Dict(_) => "dict",
        }
    }

    /// Converts a TOML value into a `Value`. `option` names the value in
    /// errors. Floats have no `Value` representation and are rejected.
    pub fn from_toml(option: &str, value: toml::Value) -> Result<Value> {
        Ok(match value {
            toml::Value::String(s) => Value::from(s),
            toml::Value::Integer(i) => Value::from(i),
            toml::Value::Boolean(b) => Value::from(b),
            toml::Value::Datetime(d) => Value::from(d.to_string()),
            toml::Value::Float(f) => {
                return Err(ConfigError::invalid(option, f, "floating point values are not supported").into());
            }
            toml::Value::Array(array) => array.into_iter()
                .map(|v| Value::from_toml(option, v))
                .collect::<Result<Value>>()?,
            toml::Value::Table(table) => {
                let mut dict = Dict::new();
                for (k, v) in table {
                    let value = Value::from_toml(&format!("{option}.{k}"), v)?;
                    dict.insert(k.into(), value);
                }

                Value::Dict(Arc::new(dict))
            }
        })
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => fmt::Display::fmt(b, f),
            Value::Num(n) => fmt::Display::fmt(n, f),
            Value::String(s) => f.write_str(s),
            Value::Array(_) | Value::Dict(_) => match serde_json::to_string(self) {
                Ok(json) => f.write_str(&json),
                Err(_) => Err(fmt::Error),
            }
        }
    }
}

macro_rules! impl_from_primitive {
    ($($T:ty),+ => $E:ident::$kind:ident) => {
        $(
            impl From<$T> for $E {
                fn from(value: $T) -> Self {
                    $E::$kind(value.into())
                }
            }
        )+
    };
}

impl_from_primitive!(bool => Value::Bool);
impl_from_primitive!(&str => Value::String);
impl_from_primitive!(String => Value::String);
impl_from_primitive!(Arc<str> => Value::String);
impl_from_primitive!(Arc<Vec<Value>> => Value::Array);
impl_from_primitive!(Arc<Dict> => Value::Dict);
impl_from_primitive!(u8, u16, u32, u64 => Value::Num);
impl_from_primitive!(i8, i16, i32, i64 => Value::Num);

impl From<()> for Value  {
    fn from(_: ()) -> Self {
        Value::Null
    }
}

impl<T> From<Option<T>> for Value where Value: From<T> {
    fn from(value: Option<T>) -> Self {
        value.map(Value::from).unwrap_or(Value::Null)
    }
}

impl<T> From<Vec<T>> for Value where Value: From<T> {
    fn from(value: Vec<T>) -> Self {
        value.into_iter()
            .map(Value::from)
            .collect()
    }
}

impl<K, V> From<Dict<K, V>> for Value where Arc<str>: From<K>, Value: From<V> {
    fn from(value: Dict<K, V>) -> Self {
        let dict = value.into_iter()
            .map(|(k, v)| (<Arc::<str>>::from(k), Value::from(v)))
            .collect::<Dict>();

        Value::Dict(Arc::new(dict))
    }
}

impl FromIterator<Value> for Value {
    fn from_iter<T: IntoIterator<Item = Value>>(iter: T) -> Self {
        let vec = iter.into_iter().collect::<Vec<Value>>();
        Value::Array(Arc::from(vec))
    }
}

/// A signed or unsigned integer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Num {
    /// An unsigned integer.
    UInt(u64),
    /// A signed integer.
    Int(i64),
}

impl Num {
    /// Returns the value as a `u64` if it is non-negative, otherwise returns
    /// the negative value as `Err`.
    pub fn to_u64(self) -> Result<u64, i64> {
        match self {
            Num::UInt(v) => Ok(v),
            Num::Int(v) if v >= 0 => Ok(v as u64),
            Num::Int(v) => Err(v),
        }
    }
}

impl fmt::Display for Num {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Num::UInt(v) => fmt::Display::fmt(v, f),
            Num::Int(v) => fmt::Display::fmt(v, f),
        }
    }
}

impl PartialEq for Num {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == std::cmp::Ordering::Equal
    }
}

impl Eq for Num { }

impl std::hash::Hash for Num {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        match self.to_u64() {
            Ok(v) => std::hash::Hash::hash(&v, state),
            Err(v) => std::hash::Hash::hash(&v, state),
        }
    }
}

impl PartialOrd for Num {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Num {
    /// ```rust
    /// use siteconf::value::Num;
    ///
    /// assert!(Num::from(-1i8) < Num::from(0u8));
    /// assert!(Num::from(-0i8) == Num::from(0u8));
    /// assert!(Num::from(10i32) == Num::from(10u64));
    /// assert!(Num::from(-2i8) > Num::from(-3i8));
    /// assert!(Num::from(5u32) > Num::from(-1i64));
    /// ```
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use std::cmp::Ordering;

        match (self.to_u64(), other.to_u64()) {
            (Ok(a), Ok(b)) => a.cmp(&b),
            (Ok(_), Err(_)) => Ordering::Greater,
            (Err(_), Ok(_)) => Ordering::Less,
            (Err(a), Err(b)) => a.cmp(&b),
        }
    }
}

macro_rules! impl_from_for_num_value {
    ($($T:ty: $V:ident),* $(,)?) => ($(
        impl From<$T> for Num {
            fn from(value: $T) -> Num {
                Num::$V(value.into())
            }
        }
    )*)
}

impl_from_for_num_value! {
    u8: UInt, u16: UInt, u32: UInt, u64: UInt,
    i8: Int, i16: Int, i32: Int, i64: Int,
}

macro_rules! impl_try_from_value {
    ($($T:ty),+ => | $v:ident | $e:expr) => {
        $(
            impl TryFrom<$crate::value::Value> for $T {
                type Error = Value;

                fn try_from($v: $crate::value::Value) -> Result<Self, Self::Error> {
                    (|| $e)()
                }
            }
        )+
    };
}

impl_try_from_value!(bool => |v| v.to_bool().ok_or(v));
impl_try_from_value!(Arc<str> => |v| v.into_str());
impl_try_from_value!(Arc<Dict> => |v| v.into_dict());
impl_try_from_value!(Num => |v| v.to_num().ok_or(v));
impl_try_from_value!(u16, u32, u64 =>
    |v| v.to_num().and_then(|n| n.to_u64().ok()?.try_into().ok()).ok_or(v));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_values_convert() {
        let table: toml::Table = toml::from_str(r#"
            name = "skinny"
            port = 22
            on = true
            list = ["a", 1]
            [nested]
            deep = { x = -3 }
        "#).unwrap();

        let value = Value::from_toml("root", toml::Value::Table(table)).unwrap();
        let dict = value.as_dict().unwrap();
        assert_eq!(dict["name"], Value::from("skinny"));
        assert_eq!(dict["port"], Value::from(22u8));
        assert_eq!(dict["on"], Value::from(true));
        assert_eq!(dict["list"], Value::from(vec![Value::from("a"), Value::from(1)]));

        let nested = dict["nested"].as_dict().unwrap();
        let deep = nested["deep"].as_dict().unwrap();
        assert_eq!(deep["x"], Value::from(-3));
    }

    #[test]
    fn toml_floats_are_rejected() {
        let err = Value::from_toml("ratio", toml::Value::Float(0.5)).unwrap_err();
        let config = err.config_error().unwrap();
        assert_eq!(config.subject(), "ratio");
        assert!(matches!(config, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn display_is_plain_for_scalars() {
        assert_eq!(Value::from("2.12.6").to_string(), "2.12.6");
        assert_eq!(Value::from(false).to_string(), "false");
        assert_eq!(Value::from(-7).to_string(), "-7");
        assert_eq!(Value::from(vec!["a", "b"]).to_string(), r#"["a","b"]"#);
    }

    #[test]
    fn narrow_integer_conversions() {
        assert_eq!(u16::try_from(Value::from(22)), Ok(22));
        assert!(u16::try_from(Value::from(70000u32)).is_err());
        assert!(u16::try_from(Value::from(-1)).is_err());
        assert!(u16::try_from(Value::from("22")).is_err());
    }
}
