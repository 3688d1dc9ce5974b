use std::collections::HashMap;
use std::fmt::{Debug, Display};
use std::sync::Mutex;

thread_local! {
    pub static SYMBOL_INTERNER : Mutex<SymbolInterner> = Mutex::new(SymbolInterner::default())
}

/// An interned string. Variable names, record property names, and type
/// names all go through the same interner, so equality is an integer
/// comparison.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(u32);

impl Symbol {
    pub fn intern(name: &str) -> Symbol {
        SYMBOL_INTERNER.with(|interner| {
            let mut guard = interner.lock().unwrap();
            guard.intern(name)
        })
    }
}

impl Debug for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        SYMBOL_INTERNER.with(|interner| {
            let interner = interner.lock().unwrap();
            let string = interner.lookup(*self);
            write!(f, "{}", string)
        })
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        SYMBOL_INTERNER.with(|interner| {
            let interner = interner.lock().unwrap();
            let string = interner.lookup(*self);
            write!(f, "{}", string)
        })
    }
}

/// Maps names to `Symbol`s and back. Interned names live for the
/// lifetime of the program.
#[derive(Default)]
pub struct SymbolInterner {
    map: HashMap<&'static str, Symbol>,
    names: Vec<&'static str>,
}

impl SymbolInterner {
    pub fn intern(&mut self, name: &str) -> Symbol {
        if let Some(&id) = self.map.get(name) {
            return id;
        }
        let name: &'static str = Box::leak(name.to_owned().into_boxed_str());
        let id = Symbol(self.names.len() as u32);
        self.map.insert(name, id);
        self.names.push(name);

        debug_assert!(self.lookup(id) == name);

        id
    }

    pub fn lookup(&self, id: Symbol) -> &str {
        self.names[id.0 as usize]
    }
}

#[test]
fn interning_is_idempotent() {
    let a = Symbol::intern("count");
    let b = Symbol::intern("count");
    let c = Symbol::intern("total");
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(format!("{}", a), "count");
}
