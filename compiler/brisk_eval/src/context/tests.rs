use super::*;

fn root() -> ScopeRef {
    ScopeRef::new(EvalContext::root(ScopeFlags::empty()))
}

fn declare(scope: &ScopeRef, name: &str, value: i64) {
    scope
        .borrow_mut()
        .declare(Name::new(name), Value::Int(value), false);
}

fn owner_of(scope: &ScopeRef, name: &str) -> Option<ScopeRef> {
    match scope.lookup(name) {
        Resolution::Binding(owner) => Some(owner),
        _ => None,
    }
}

#[test]
fn test_nearest_binding_wins() {
    let root = root();
    let outer = root.child(ScopeFlags::empty());
    let middle = outer.child(ScopeFlags::empty());
    let inner = middle.child(ScopeFlags::empty());

    declare(&root, "x", 0);
    declare(&outer, "x", 1);
    declare(&middle, "y", 2);

    assert_eq!(inner.get("x"), Some(Value::Int(1)));
    assert_eq!(inner.get("y"), Some(Value::Int(2)));
    assert!(owner_of(&inner, "x").is_some_and(|s| s.ptr_eq(&outer)));
    assert!(owner_of(&inner, "y").is_some_and(|s| s.ptr_eq(&middle)));
}

#[test]
fn test_shadowing_hides_outer_binding() {
    let root = root();
    declare(&root, "v", 10);
    let inner = root.child(ScopeFlags::empty());
    declare(&inner, "v", 20);

    assert_eq!(inner.get("v"), Some(Value::Int(20)));
    assert_eq!(root.get("v"), Some(Value::Int(10)));
}

#[test]
fn test_unknown_name_is_unresolved() {
    let inner = root().child(ScopeFlags::empty());
    assert!(matches!(inner.lookup("nope"), Resolution::Unresolved));
}

#[test]
fn test_builtins_anchor_the_chain() {
    let scope = root().child(ScopeFlags::empty());
    assert!(matches!(scope.lookup("len"), Resolution::Builtin(b) if b.name == "len"));
    assert!(matches!(scope.lookup("print"), Resolution::Builtin(b) if b.name == "print"));
}

#[test]
fn test_const_context_hides_impure_builtins() {
    let root = root();
    let sealed = root.child(ScopeFlags::CONST);
    let inner = sealed.child(ScopeFlags::FUNC);

    assert!(matches!(inner.lookup("print"), Resolution::Unresolved));
    assert!(matches!(inner.lookup("len"), Resolution::Builtin(_)));
}

#[test]
fn test_declare_replaces_in_same_scope() {
    let scope = root();
    declare(&scope, "a", 1);
    declare(&scope, "a", 2);
    assert_eq!(scope.get("a"), Some(Value::Int(2)));
    assert_eq!(scope.borrow().len(), 1);
}

#[test]
fn test_assign_updates_owning_scope() {
    let root = root();
    declare(&root, "n", 1);
    let inner = root.child(ScopeFlags::empty());

    assert_eq!(inner.assign("n", Value::Int(5)), Ok(()));
    assert_eq!(root.get("n"), Some(Value::Int(5)));
}

#[test]
fn test_assign_const_binding_fails_and_read_succeeds() {
    let root = root();
    root.borrow_mut()
        .declare(Name::new("k"), Value::Int(7), true);

    assert_eq!(root.assign("k", Value::Int(8)), Err(AssignError::Const));
    assert_eq!(root.get("k"), Some(Value::Int(7)));
}

#[test]
fn test_assign_across_const_context_fails() {
    let root = root();
    declare(&root, "outer", 1);
    let sealed = root.child(ScopeFlags::CONST);
    let inner = sealed.child(ScopeFlags::FUNC);

    assert!(inner.crosses_const_scope(&root));
    assert_eq!(inner.assign("outer", Value::Int(2)), Err(AssignError::Const));

    declare(&inner, "local", 1);
    assert!(!inner.crosses_const_scope(&inner));
    assert_eq!(inner.assign("local", Value::Int(2)), Ok(()));
}

#[test]
fn test_assign_builtin_and_undefined() {
    let scope = root();
    assert_eq!(scope.assign("len", Value::Int(1)), Err(AssignError::Builtin));
    assert_eq!(scope.assign("ghost", Value::Int(1)), Err(AssignError::Undefined));
}

#[test]
fn test_block_child_inherits_constness_only() {
    let root = root();
    let const_scope = root.child(ScopeFlags::CONST | ScopeFlags::FUNC);
    let block = const_scope.block_child();
    assert_eq!(block.borrow().flags(), ScopeFlags::CONST);
    assert_eq!(root.block_child().borrow().flags(), ScopeFlags::empty());
}

#[test]
fn test_within_function() {
    let root = root();
    assert!(!root.within_function());
    let call = root.child(ScopeFlags::FUNC);
    assert!(call.block_child().within_function());
}

#[test]
fn test_parent_link_is_weak() {
    let child = {
        let parent = root();
        declare(&parent, "gone", 1);
        parent.child(ScopeFlags::empty())
    };
    assert!(child.borrow().parent().is_none());
    assert!(matches!(child.lookup("gone"), Resolution::Unresolved));
}

#[test]
fn test_remove_binding() {
    let scope = root();
    declare(&scope, "t", 1);
    assert!(scope.borrow_mut().remove("t"));
    assert!(!scope.borrow_mut().remove("t"));
}
