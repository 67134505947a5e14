use std::fmt::Display;

/// Concrete ("basic") types. Structural equality: two basic types are equal
/// iff they have identical width and signedness, which the derived
/// `PartialEq` gives us over this closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BasicKind {
    Int16,
    Int32,
    Int64,
    Bool,
}

impl BasicKind {
    pub fn is_arithmetic(self) -> bool {
        !matches!(self, BasicKind::Bool)
    }

    /// Whether a constant value fits the representable range of this type.
    pub fn fits(self, value: i64) -> bool {
        match self {
            BasicKind::Int16 => (i16::MIN as i64..=i16::MAX as i64).contains(&value),
            BasicKind::Int32 => (i32::MIN as i64..=i32::MAX as i64).contains(&value),
            BasicKind::Int64 => true,
            BasicKind::Bool => false,
        }
    }

    /// The zero value a declared-but-uninitialized variable materializes.
    pub fn zero(self) -> Value {
        match self {
            BasicKind::Int16 => Value::Int16(0),
            BasicKind::Int32 => Value::Int32(0),
            BasicKind::Int64 => Value::Int64(0),
            BasicKind::Bool => Value::Bool(false),
        }
    }
}

impl Display for BasicKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BasicKind::Int16 => write!(f, "int16"),
            BasicKind::Int32 => write!(f, "int32"),
            BasicKind::Int64 => write!(f, "int64"),
            BasicKind::Bool => write!(f, "bool"),
        }
    }
}

/// Untyped-constant pseudo-types: literal and fold results whose concrete
/// representation is not committed yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstKind {
    Integer,
    Bool,
}

/// The type of an expression. Constant types never equal basic types; a
/// constant-typed expression must be committed to a concrete type (by a
/// declaration target or a sibling operand) before evaluation needs it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ty {
    Basic(BasicKind),
    Constant(ConstKind),
}

impl Ty {
    pub fn is_constant(self) -> bool {
        matches!(self, Ty::Constant(_))
    }

    pub fn is_bool(self) -> bool {
        matches!(self, Ty::Basic(BasicKind::Bool) | Ty::Constant(ConstKind::Bool))
    }
}

impl Display for Ty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Ty::Basic(kind) => write!(f, "{}", kind),
            Ty::Constant(ConstKind::Integer) => write!(f, "untyped int"),
            Ty::Constant(ConstKind::Bool) => write!(f, "untyped bool"),
        }
    }
}

/// A runtime value: a closed sum over the concrete representations. Untyped
/// integer constants are carried as `Int64` until a context commits them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Bool(bool),
}

impl Value {
    pub fn as_i64(self) -> Option<i64> {
        match self {
            Value::Int16(v) => Some(v as i64),
            Value::Int32(v) => Some(v as i64),
            Value::Int64(v) => Some(v),
            Value::Bool(_) => None,
        }
    }

    pub fn as_bool(self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(v),
            _ => None,
        }
    }

    /// Re-represents an integer value at the target width, truncating.
    /// Range acceptability was already established by the checker; booleans
    /// pass through untouched.
    pub fn convert(self, target: BasicKind) -> Value {
        let wide = match self.as_i64() {
            Some(v) => v,
            None => return self,
        };

        match target {
            BasicKind::Int16 => Value::Int16(wide as i16),
            BasicKind::Int32 => Value::Int32(wide as i32),
            BasicKind::Int64 => Value::Int64(wide),
            BasicKind::Bool => self,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Int16(v) => write!(f, "{}", v),
            Value::Int32(v) => write!(f, "{}", v),
            Value::Int64(v) => write!(f, "{}", v),
            Value::Bool(v) => write!(f, "{}", v),
        }
    }
}
