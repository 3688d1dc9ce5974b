use crate::scope::ScopeId;
use common::symbol::Symbol;
use indexmap::IndexMap;
use std::cell::RefCell;
use std::fmt::{self, Debug};
use std::rc::Rc;
use types::{builtin, TypeId};

/// A runtime value. The variant set is closed; every value reports the
/// interned descriptor for its family through `type_of`.
///
/// Records and functions are reference counted, so cloning a value never
/// copies a property map and two handles to the same record stay in
/// sync.
#[derive(Clone)]
pub enum Value {
    Boolean(bool),
    Number(f64),
    String(String),
    Record(Rc<RefCell<Record>>),
    Function(Rc<Function>),
}

impl Value {
    pub fn record(record: Record) -> Value {
        Value::Record(Rc::new(RefCell::new(record)))
    }

    pub fn function(function: Function) -> Value {
        Value::Function(Rc::new(function))
    }

    pub fn type_of(&self) -> TypeId {
        match self {
            Value::Boolean(_) => TypeId::intern(builtin::BOOLEAN),
            Value::Number(_) => TypeId::intern(builtin::NUMBER),
            Value::String(_) => TypeId::intern(builtin::STRING),
            Value::Record(_) => TypeId::intern(builtin::RECORD),
            Value::Function(_) => TypeId::intern(builtin::FUNCTION),
        }
    }
}

/// Primitives compare by content; records and functions compare by
/// identity.
impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Boolean(left), Value::Boolean(right)) => left == right,
            (Value::Number(left), Value::Number(right)) => left == right,
            (Value::String(left), Value::String(right)) => left == right,
            (Value::Record(left), Value::Record(right)) => Rc::ptr_eq(left, right),
            (Value::Function(left), Value::Function(right)) => Rc::ptr_eq(left, right),
            _ => false,
        }
    }
}

impl Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Boolean(value) => write!(f, "{}", value),
            Value::Number(value) => write!(f, "{}", value),
            Value::String(value) => write!(f, "\"{}\"", value),
            // Property values may reach back into this record, so only
            // the property names are printed.
            Value::Record(record) => match record.try_borrow() {
                Ok(record) => {
                    let names = record
                        .props()
                        .map(|(name, _)| name.to_string())
                        .collect::<Vec<String>>()
                        .join(", ");
                    write!(f, "Record {{{}}}", names)
                }
                Err(_) => write!(f, "Record {{..}}"),
            },
            Value::Function(function) => match function.name {
                Some(name) => write!(f, "fn {}", name),
                None => write!(f, "fn <anonymous>"),
            },
        }
    }
}

/// A dynamically keyed set of named fields. Keys are unique; insertion
/// order is preserved for display.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    props: IndexMap<Symbol, Value>,
}

impl Record {
    pub fn new() -> Record {
        Record::default()
    }

    pub fn get(&self, name: Symbol) -> Option<Value> {
        self.props.get(&name).cloned()
    }

    /// Inserts or overwrites a property. Overwriting keeps the
    /// property's original position.
    pub fn set(&mut self, name: Symbol, value: Value) {
        self.props.insert(name, value);
    }

    pub fn remove(&mut self, name: Symbol) -> Option<Value> {
        self.props.shift_remove(&name)
    }

    pub fn len(&self) -> usize {
        self.props.len()
    }

    pub fn is_empty(&self) -> bool {
        self.props.is_empty()
    }

    /// Properties in insertion order.
    pub fn props(&self) -> impl Iterator<Item = (Symbol, &Value)> {
        self.props.iter().map(|(name, value)| (*name, value))
    }
}

/// A callable value: the name it was declared with, if any, and the
/// scope it closes over.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: Option<Symbol>,
    pub scope: ScopeId,
}
