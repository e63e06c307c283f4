//! Property values. Scripting hands these in and out; the core only needs
//! enough variants to round-trip what the object model stores.

use crate::StoreHandle;

#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    #[default]
    Nil,
    Int(i64),
    Bool(bool),
    Str(String),
    Store(StoreHandle),
}

impl Value {
    #[inline]
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// Integer view; non-integers read as 0, matching script semantics.
    #[inline]
    pub fn as_int(&self) -> i64 {
        match self {
            Value::Int(i) => *i,
            Value::Bool(b) => i64::from(*b),
            _ => 0,
        }
    }

    #[inline]
    pub fn as_bool(&self) -> bool {
        match self {
            Value::Bool(b) => *b,
            Value::Int(i) => *i != 0,
            Value::Nil => false,
            _ => true,
        }
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    pub fn as_store(&self) -> Option<StoreHandle> {
        match self {
            Value::Store(h) => Some(*h),
            _ => None,
        }
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<StoreHandle> for Value {
    fn from(h: StoreHandle) -> Self {
        Value::Store(h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_views() {
        assert_eq!(Value::from(7).as_int(), 7);
        assert_eq!(Value::Nil.as_int(), 0);
        assert_eq!(Value::from("x").as_int(), 0);
        assert!(Value::from(1).as_bool());
        assert!(!Value::Nil.as_bool());
    }
}
