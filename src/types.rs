use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock};

/// Nominal category of a [`Type`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeName {
    Integer,
    Float,
    Boolean,
    Str,
    List,
    Map,
    Optional,
    Function,
    Named(String),
}

#[derive(Debug)]
struct TypeData {
    name: TypeName,
    params: Vec<Type>,
    nullable: bool,
}

/// An interned nominal type with optional generic parameters and a
/// nullability flag. Base types are shared singletons, so cloning is a
/// reference-count bump and pointer equality short-circuits comparison.
#[derive(Debug, Clone)]
pub struct Type(Arc<TypeData>);

macro_rules! base_type {
    ($fn_name:ident, $variant:ident) => {
        pub fn $fn_name() -> Type {
            static CELL: OnceLock<Type> = OnceLock::new();
            CELL.get_or_init(|| Type::new(TypeName::$variant, vec![], false))
                .clone()
        }
    };
}

impl Type {
    fn new(name: TypeName, params: Vec<Type>, nullable: bool) -> Type {
        Type(Arc::new(TypeData {
            name,
            params,
            nullable,
        }))
    }

    base_type!(integer, Integer);
    base_type!(float, Float);
    base_type!(boolean, Boolean);
    base_type!(string, Str);

    pub fn list(element: Type) -> Type {
        Type::new(TypeName::List, vec![element], false)
    }

    pub fn map(key: Type, value: Type) -> Type {
        Type::new(TypeName::Map, vec![key, value], false)
    }

    pub fn optional(inner: Type) -> Type {
        Type::new(TypeName::Optional, vec![inner], false)
    }

    /// A function type; the first parameter is the return type, the rest
    /// are argument types.
    pub fn function(ret: Type, args: Vec<Type>) -> Type {
        let mut params = vec![ret];
        params.extend(args);
        Type::new(TypeName::Function, params, false)
    }

    pub fn named(name: impl Into<String>) -> Type {
        Type::new(TypeName::Named(name.into()), vec![], false)
    }

    pub fn name(&self) -> &TypeName {
        &self.0.name
    }

    pub fn params(&self) -> &[Type] {
        &self.0.params
    }

    pub fn is_nullable(&self) -> bool {
        self.0.nullable
    }

    pub fn with_nullable(&self, nullable: bool) -> Type {
        if self.0.nullable == nullable {
            return self.clone();
        }
        Type::new(self.0.name.clone(), self.0.params.to_vec(), nullable)
    }

    /// Whether a value of `self` may be used where `required` is expected:
    /// the types match structurally, or only differ in that `required`
    /// additionally admits null.
    pub fn satisfies(&self, required: &Type) -> bool {
        if self == required {
            return true;
        }
        required.0.nullable
            && self.0.name == required.0.name
            && self.0.params == required.0.params
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
            || (self.0.name == other.0.name
                && self.0.nullable == other.0.nullable
                && self.0.params == other.0.params)
    }
}

impl Eq for Type {}

impl Hash for Type {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.name.hash(state);
        self.0.nullable.hash(state);
        for p in &self.0.params {
            p.hash(state);
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0.name {
            TypeName::Integer => write!(f, "integer")?,
            TypeName::Float => write!(f, "float")?,
            TypeName::Boolean => write!(f, "boolean")?,
            TypeName::Str => write!(f, "string")?,
            TypeName::List => write!(f, "list<{}>", self.0.params[0])?,
            TypeName::Map => write!(f, "map<{}, {}>", self.0.params[0], self.0.params[1])?,
            TypeName::Optional => write!(f, "optional<{}>", self.0.params[0])?,
            TypeName::Function => {
                write!(f, "fn(")?;
                for (i, p) in self.0.params[1..].iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", p)?;
                }
                write!(f, ") -> {}", self.0.params[0])?;
            }
            TypeName::Named(n) => write!(f, "{}", n)?,
        }
        if self.0.nullable {
            write!(f, "?")?;
        }
        Ok(())
    }
}

/// A function's `(return type, argument types...)` tuple. Functions with
/// equal signatures are safe drop-in replacements for each other.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    ret: Type,
    args: Vec<Type>,
}

impl Signature {
    pub fn new(ret: Type, args: Vec<Type>) -> Self {
        Self { ret, args }
    }

    pub fn ret(&self) -> &Type {
        &self.ret
    }

    pub fn args(&self) -> &[Type] {
        &self.args
    }

    pub fn arity(&self) -> usize {
        self.args.len()
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, a) in self.args.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", a)?;
        }
        write!(f, ") -> {}", self.ret)
    }
}

/// Dynamically-typed runtime value: the payload of constant nodes and the
/// result of tree evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Integer(i64),
    Float(f64),
    Bool(bool),
    Str(String),
    List(Vec<Value>),
}

impl Value {
    pub fn type_of(&self) -> Type {
        match self {
            Value::Integer(_) => Type::integer(),
            Value::Float(_) => Type::float(),
            Value::Bool(_) => Type::boolean(),
            Value::Str(_) => Type::string(),
            Value::List(items) => Type::list(
                items
                    .first()
                    .map(Value::type_of)
                    .unwrap_or_else(Type::integer),
            ),
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{:?}", x),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Str(s) => write!(f, "{:?}", s),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
        }
    }
}
