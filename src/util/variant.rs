use std::fmt;

// Actorの引数の値
#[derive(Debug, Clone, PartialEq)]
pub enum Variant {
    Int(i64),
    Bool(bool),
    String(String),
}

impl Variant {
    pub fn as_int(&self) -> i64 {
        match self {
            Self::Int(v) => *v,
            Self::Bool(v) => *v as i64,
            Self::String(_) => 0,
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{}", v),
            Self::Bool(v) => write!(f, "{}", v),
            Self::String(v) => write!(f, "{}", v),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Arg {
    pub name: String,
    pub value: Variant,
}

impl Arg {
    pub fn int(name: &str, value: i64) -> Self {
        Self {
            name: name.to_string(),
            value: Variant::Int(value),
        }
    }
}
