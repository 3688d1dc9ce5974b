use common::symbol::Symbol;
use diagnostics::error::{runtime_diagnostic, Error};
use runtime::{CallSite, CallStack, Record, Scope, ScopeArena, Value};
use source::{FileId, SourceLocation, SourceMap};

struct Fixture {
    sources: SourceMap,
    scopes: ScopeArena,
    stack: CallStack,
    main_src: FileId,
    lib_src: FileId,
}

/// Frames for call sites A (main.src:10) -> B (main.src:22) ->
/// C (lib.src:5), innermost last.
fn demo_stack() -> Fixture {
    let mut sources = SourceMap::new();
    let main_src = sources.add("main.src");
    let lib_src = sources.add("lib.src");

    let mut scopes = ScopeArena::new();
    let globals = scopes.alloc(Scope::new(None));
    let main = scopes.alloc(Scope::named(Symbol::intern("main"), Some(globals)));
    let fetch = scopes.alloc(Scope::named(Symbol::intern("fetch"), Some(main)));
    let parse = scopes.alloc(Scope::named(Symbol::intern("parse"), Some(fetch)));

    let mut stack = CallStack::new();
    stack
        .push(main, SourceLocation::new(main_src, 10, 4))
        .unwrap();
    stack
        .push(fetch, SourceLocation::new(main_src, 22, 8))
        .unwrap();
    stack.push(parse, SourceLocation::new(lib_src, 5, 2)).unwrap();

    Fixture {
        sources,
        scopes,
        stack,
        main_src,
        lib_src,
    }
}

#[test]
fn depth_matches_the_number_of_pushes() {
    let mut scopes = ScopeArena::new();
    let mut sources = SourceMap::new();
    let file = sources.add("main.src");
    let scope = scopes.alloc(Scope::new(None));
    let mut stack = CallStack::new();
    assert!(stack.is_empty());
    for line in 1..=10 {
        stack.push(scope, SourceLocation::new(file, line, 0)).unwrap();
        assert_eq!(stack.depth(), line as usize);
    }
}

#[test]
fn push_then_pop_is_an_inverse_pair() {
    let mut fixture = demo_stack();
    let scope = fixture.scopes.alloc(Scope::new(None));
    let location = SourceLocation::new(fixture.main_src, 40, 1);
    let depth_before = fixture.stack.depth();

    let pushed = fixture.stack.push(scope, location).unwrap();
    assert_eq!(pushed, CallSite { scope, location });
    let popped = fixture.stack.pop().unwrap();
    assert_eq!(popped, pushed);
    assert_eq!(fixture.stack.depth(), depth_before);
}

#[test]
fn snapshot_lists_frames_outermost_first() {
    let fixture = demo_stack();
    let trace = fixture.stack.snapshot(&fixture.scopes);
    let descriptions: Vec<String> = trace
        .frames()
        .iter()
        .map(|frame| frame.description())
        .collect();
    assert_eq!(descriptions, vec!["main", "fetch", "parse"]);
    assert_eq!(
        trace.frames()[2].location,
        SourceLocation::new(fixture.lib_src, 5, 2)
    );
}

#[test]
fn current_and_pop_agree_on_the_innermost_frame() {
    let mut fixture = demo_stack();
    let innermost = *fixture.stack.current().unwrap();
    assert_eq!(innermost.location, SourceLocation::new(fixture.lib_src, 5, 2));

    let popped = fixture.stack.pop().unwrap();
    assert_eq!(popped, innermost);
    let next = fixture.stack.current().unwrap();
    assert_eq!(next.location, SourceLocation::new(fixture.main_src, 22, 8));
}

#[test]
fn traces_render_one_line_per_frame() {
    let fixture = demo_stack();
    let trace = fixture.stack.snapshot(&fixture.scopes);
    insta::assert_display_snapshot!(trace.display(&fixture.sources), @r###"
    main.src:10:4 in main
    main.src:22:8 in fetch
    lib.src:5:2 in parse
    "###);
}

#[test]
fn unnamed_scopes_render_as_anonymous() {
    let mut sources = SourceMap::new();
    let file = sources.add("main.src");
    let mut scopes = ScopeArena::new();
    let scope = scopes.alloc(Scope::new(None));
    let mut stack = CallStack::new();
    stack.push(scope, SourceLocation::new(file, 3, 1)).unwrap();
    let rendered = stack.snapshot(&scopes).render(&sources);
    assert_eq!(rendered, vec!["main.src:3:1 in <anonymous>".to_string()]);
}

#[test]
fn snapshots_are_stable_across_read_only_operations() {
    let fixture = demo_stack();
    let before = fixture.stack.snapshot(&fixture.scopes);
    let _ = fixture.stack.current();
    let _ = fixture
        .stack
        .resolve(&fixture.scopes, Symbol::intern("anything"));
    let after = fixture.stack.snapshot(&fixture.scopes);
    assert_eq!(before, after);
}

#[test]
fn snapshots_do_not_track_later_mutation() {
    let mut fixture = demo_stack();
    let trace = fixture.stack.snapshot(&fixture.scopes);
    let innermost = *fixture.stack.current().unwrap();
    fixture
        .scopes
        .define(innermost.scope, Symbol::intern("tmp"), Value::Number(1.0));
    fixture.stack.pop().unwrap();
    assert_eq!(trace.len(), 3);
    assert_eq!(trace.frames()[2].locals, 0);
}

#[test]
fn pushing_past_the_maximum_depth_fails_without_mutating() {
    let mut sources = SourceMap::new();
    let file = sources.add("main.src");
    let mut scopes = ScopeArena::new();
    let scope = scopes.alloc(Scope::named(Symbol::intern("recurse"), None));
    let mut stack = CallStack::with_max_depth(3);
    for line in 1..=3 {
        stack.push(scope, SourceLocation::new(file, line, 0)).unwrap();
    }
    let error = stack
        .push(scope, SourceLocation::new(file, 4, 0))
        .unwrap_err();
    assert_eq!(error, Error::StackOverflow { max_depth: 3 });
    assert_eq!(stack.depth(), 3);

    // The stack contents survive for the diagnostic report.
    let trace = stack.snapshot(&scopes).render(&sources);
    let diagnostic = runtime_diagnostic(&error, &trace);
    assert_eq!(
        diagnostic.message(),
        "Stack Overflow: exceeded the maximum call depth of 3"
    );
    assert_eq!(diagnostic.notes().len(), 3);
    assert_eq!(diagnostic.notes()[0], "main.src:1:0 in recurse");
}

#[test]
fn popping_an_empty_stack_is_a_loud_error() {
    let mut stack = CallStack::new();
    assert_eq!(stack.pop().unwrap_err(), Error::EmptyStack);
    assert!(stack.current().is_none());
}

#[test]
fn resolve_searches_the_current_frame_then_outward() {
    let mut fixture = demo_stack();
    let url = Symbol::intern("url");
    let retries = Symbol::intern("retries");

    // Bind `url` at the root of the chain and `retries` on the innermost
    // frame's scope; both must be visible from the innermost frame.
    let innermost = fixture.stack.current().unwrap().scope;
    let globals = {
        let mut chain = innermost;
        while let Some(parent) = fixture.scopes.get(chain).parent() {
            chain = parent;
        }
        chain
    };
    let url_binding = Value::String("https://example.test".into());
    fixture.scopes.define(globals, url, url_binding.clone());
    fixture.scopes.define(innermost, retries, Value::Number(3.0));

    assert_eq!(
        fixture.stack.resolve(&fixture.scopes, url),
        Some(url_binding)
    );
    assert_eq!(
        fixture.stack.resolve(&fixture.scopes, retries),
        Some(Value::Number(3.0))
    );
    assert_eq!(
        fixture.stack.resolve(&fixture.scopes, Symbol::intern("missing")),
        None
    );
}

#[test]
fn resolve_on_an_empty_stack_finds_nothing() {
    let scopes = ScopeArena::new();
    let stack = CallStack::new();
    assert_eq!(stack.resolve(&scopes, Symbol::intern("x")), None);
}

#[test]
fn receivers_follow_the_current_frame() {
    let mut sources = SourceMap::new();
    let file = sources.add("main.src");
    let mut scopes = ScopeArena::new();
    let receiver = Value::record(Record::new());
    let method = scopes.alloc(
        Scope::named(Symbol::intern("method"), None).with_receiver(receiver.clone()),
    );
    let free = scopes.alloc(Scope::named(Symbol::intern("free"), None));

    let mut stack = CallStack::new();
    stack.push(method, SourceLocation::new(file, 1, 0)).unwrap();
    assert_eq!(stack.receiver(&scopes), Some(receiver));
    stack.push(free, SourceLocation::new(file, 2, 0)).unwrap();
    assert_eq!(stack.receiver(&scopes), None);
}
