use super::*;
use pretty_assertions::assert_eq;

#[test]
fn impure_table_holds_only_side_effecting_builtins() {
    assert_eq!(builtins().names(), vec!["print", "undef"]);
}

#[test]
fn const_table_holds_the_rest() {
    let table = const_builtins();
    for name in [
        "len", "str", "int", "find", "insert", "erase", "keys", "values", "kvpairs", "split",
        "join",
    ] {
        assert!(table.contains(name), "missing {name}");
    }
    assert!(!table.contains("print"));
    assert!(!table.contains("undef"));
}

#[test]
fn tables_do_not_overlap() {
    for name in builtins().names() {
        assert!(!const_builtins().contains(name), "{name} is in both tables");
    }
}

#[test]
fn table_entries_carry_their_name() {
    let len = const_builtins().get("len");
    assert_eq!(len.map(|b| b.name), Some("len"));
    assert!(const_builtins().get("nope").is_none());
}

#[test]
fn resolve_index_counts_negatives_from_the_end() {
    assert_eq!(resolve_index(0, 3, false), Some(0));
    assert_eq!(resolve_index(-1, 3, false), Some(2));
    assert_eq!(resolve_index(-3, 3, false), Some(0));
    assert_eq!(resolve_index(-4, 3, false), None);
    assert_eq!(resolve_index(3, 3, false), None);
}

#[test]
fn resolve_index_allows_end_when_asked() {
    assert_eq!(resolve_index(3, 3, true), Some(3));
    assert_eq!(resolve_index(4, 3, true), None);
    assert_eq!(resolve_index(0, 0, true), Some(0));
    assert_eq!(resolve_index(0, 0, false), None);
}
