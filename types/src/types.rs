use common::symbol::Symbol;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Mutex;

thread_local! {
    pub static TYPE_REGISTRY : Mutex<TypeRegistry> = Mutex::new(TypeRegistry::default())
}

/// Names of the built-in type families.
pub mod builtin {
    pub const BOOLEAN: &str = "Boolean";
    pub const NUMBER: &str = "Number";
    pub const STRING: &str = "String";
    pub const RECORD: &str = "Record";
    pub const FUNCTION: &str = "Function";
}

/// Handle to an interned type descriptor. All values of the same family
/// share one id, so type identity is an integer comparison.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeId(u32);

impl TypeId {
    /// Interns `name`, returning the canonical id for that type. The
    /// descriptor lives for the rest of the program.
    pub fn intern(name: &str) -> TypeId {
        let name = Symbol::intern(name);
        TYPE_REGISTRY.with(|registry| {
            let mut guard = registry.lock().unwrap();
            guard.intern(name)
        })
    }

    pub fn name(self) -> Symbol {
        TYPE_REGISTRY.with(|registry| {
            let guard = registry.lock().unwrap();
            guard.lookup(self).name()
        })
    }
}

impl Debug for TypeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A nominal type descriptor. One canonical instance exists per name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Type {
    name: Symbol,
}

impl Type {
    pub fn name(&self) -> Symbol {
        self.name
    }
}

/// The process-wide interning table for type descriptors. Read-mostly
/// after startup; new entries are only added the first time a name is
/// seen.
#[derive(Default)]
pub struct TypeRegistry {
    map: HashMap<Symbol, TypeId>,
    types: Vec<Type>,
}

impl TypeRegistry {
    pub fn intern(&mut self, name: Symbol) -> TypeId {
        if let Some(&id) = self.map.get(&name) {
            return id;
        }
        let id = TypeId(self.types.len() as u32);
        self.map.insert(name, id);
        self.types.push(Type { name });
        id
    }

    pub fn lookup(&self, id: TypeId) -> &Type {
        &self.types[id.0 as usize]
    }
}

#[test]
fn types_are_interned_by_name() {
    let number = TypeId::intern(builtin::NUMBER);
    let number_again = TypeId::intern(builtin::NUMBER);
    let record = TypeId::intern(builtin::RECORD);
    assert_eq!(number, number_again);
    assert_ne!(number, record);
    assert_eq!(number.name(), Symbol::intern("Number"));
}
