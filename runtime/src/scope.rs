use crate::value::Value;
use common::symbol::Symbol;
use id_arena::{Arena, Id};
use log::trace;

pub type ScopeId = Id<Scope>;

/// A lexical environment: an optional bound receiver, the ordered local
/// slots, and a non-owning link to the enclosing scope.
#[derive(Debug, Clone)]
pub struct Scope {
    name: Option<Symbol>,
    receiver: Option<Value>,
    locals: Vec<(Symbol, Value)>,
    parent: Option<ScopeId>,
}

impl Scope {
    pub fn new(parent: Option<ScopeId>) -> Scope {
        Scope {
            name: None,
            receiver: None,
            locals: Vec::new(),
            parent,
        }
    }

    /// A scope labelled with the name of the function body it belongs
    /// to. The label shows up as the frame description in traces.
    pub fn named(name: Symbol, parent: Option<ScopeId>) -> Scope {
        Scope {
            name: Some(name),
            ..Scope::new(parent)
        }
    }

    pub fn with_receiver(mut self, receiver: Value) -> Scope {
        self.receiver = Some(receiver);
        self
    }

    pub fn name(&self) -> Option<Symbol> {
        self.name
    }

    pub fn parent(&self) -> Option<ScopeId> {
        self.parent
    }

    pub fn receiver(&self) -> Option<&Value> {
        self.receiver.as_ref()
    }

    pub fn local_count(&self) -> usize {
        self.locals.len()
    }

    /// Appends a local slot. A later definition of the same name shadows
    /// the earlier one within this scope.
    pub fn define(&mut self, name: Symbol, value: Value) {
        self.locals.push((name, value));
    }

    /// Looks `name` up among this scope's own slots only.
    pub fn lookup_local(&self, name: Symbol) -> Option<Value> {
        self.locals
            .iter()
            .rev()
            .find(|(local, _)| *local == name)
            .map(|(_, value)| value.clone())
    }
}

/// Owns every scope for one interpreter instance. Parent links are arena
/// ids: a parent must already exist when a child is allocated and links
/// are never rewritten, so chains are acyclic and finite.
#[derive(Default)]
pub struct ScopeArena {
    scopes: Arena<Scope>,
}

impl ScopeArena {
    pub fn new() -> ScopeArena {
        ScopeArena::default()
    }

    pub fn alloc(&mut self, scope: Scope) -> ScopeId {
        let id = self.scopes.alloc(scope);
        trace!("alloc scope {:?}", id);
        id
    }

    pub fn get(&self, id: ScopeId) -> &Scope {
        &self.scopes[id]
    }

    pub fn get_mut(&mut self, id: ScopeId) -> &mut Scope {
        &mut self.scopes[id]
    }

    pub fn define(&mut self, id: ScopeId, name: Symbol, value: Value) {
        self.scopes[id].define(name, value)
    }

    /// Resolves `name` against `id`'s own slots first, then outward
    /// through the parent chain. Locals shadow outer bindings. `None`
    /// means no binding exists anywhere in the chain.
    pub fn resolve(&self, id: ScopeId, name: Symbol) -> Option<Value> {
        let mut next = Some(id);
        while let Some(scope_id) = next {
            let scope = &self.scopes[scope_id];
            if let Some(value) = scope.lookup_local(name) {
                return Some(value);
            }
            next = scope.parent();
        }
        None
    }

    /// The nearest bound receiver walking outward from `id`.
    pub fn receiver(&self, id: ScopeId) -> Option<Value> {
        let mut next = Some(id);
        while let Some(scope_id) = next {
            let scope = &self.scopes[scope_id];
            if let Some(receiver) = scope.receiver() {
                return Some(receiver.clone());
            }
            next = scope.parent();
        }
        None
    }

    /// Number of scopes from `id` to the root of its chain, inclusive.
    pub fn chain_depth(&self, id: ScopeId) -> usize {
        let mut depth = 1;
        let mut scope = &self.scopes[id];
        while let Some(parent) = scope.parent() {
            depth += 1;
            scope = &self.scopes[parent];
        }
        depth
    }
}

#[test]
fn locals_shadow_outer_bindings() {
    let mut scopes = ScopeArena::new();
    let x = Symbol::intern("x");
    let root = scopes.alloc(Scope::new(None));
    scopes.define(root, x, Value::Number(1.0));
    let inner = scopes.alloc(Scope::new(Some(root)));
    scopes.define(inner, x, Value::Number(2.0));
    assert_eq!(scopes.resolve(inner, x), Some(Value::Number(2.0)));
    assert_eq!(scopes.resolve(root, x), Some(Value::Number(1.0)));
}

#[test]
fn redefinition_shadows_within_a_scope() {
    let mut scopes = ScopeArena::new();
    let x = Symbol::intern("x");
    let root = scopes.alloc(Scope::new(None));
    scopes.define(root, x, Value::Number(1.0));
    scopes.define(root, x, Value::Number(2.0));
    assert_eq!(scopes.resolve(root, x), Some(Value::Number(2.0)));
    assert_eq!(scopes.get(root).local_count(), 2);
}

#[test]
fn resolution_walks_the_parent_chain() {
    let mut scopes = ScopeArena::new();
    let x = Symbol::intern("x");
    let y = Symbol::intern("y");
    let root = scopes.alloc(Scope::new(None));
    scopes.define(root, x, Value::String("outermost".into()));
    let mut innermost = root;
    for _ in 0..3 {
        innermost = scopes.alloc(Scope::new(Some(innermost)));
    }
    assert_eq!(scopes.chain_depth(innermost), 4);
    assert_eq!(
        scopes.resolve(innermost, x),
        Some(Value::String("outermost".into()))
    );
    assert_eq!(scopes.resolve(innermost, y), None);
}

#[test]
fn receivers_are_visible_through_nested_scopes() {
    let mut scopes = ScopeArena::new();
    let receiver = Value::record(crate::value::Record::new());
    let root = scopes.alloc(Scope::new(None).with_receiver(receiver.clone()));
    let block = scopes.alloc(Scope::new(Some(root)));
    assert_eq!(scopes.receiver(block), Some(receiver));
    let detached = scopes.alloc(Scope::new(None));
    assert_eq!(scopes.receiver(detached), None);
}
