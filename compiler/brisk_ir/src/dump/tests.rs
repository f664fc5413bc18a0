use super::*;
use crate::build::*;
use crate::BinaryOp;
use pretty_assertions::assert_eq;

#[test]
fn test_dump_leaf() {
    assert_eq!(int(7).dump(), "Int(7)\n");
    assert_eq!(ident("x").dump(), "Id(\"x\")\n");
    assert_eq!(none().dump(), "None\n");
}

#[test]
fn test_dump_string_is_reescaped() {
    assert_eq!(string(r"a\nb").dump(), "Str(\"a\\nb\")\n");
}

#[test]
fn test_dump_binary_chain() {
    let chain = binary(int(1), vec![(BinaryOp::Add, ident("x"))]);
    let expected = "\
MultiOp(
  Int(1)
  Op '+'
  Id(\"x\")
)
";
    assert_eq!(chain.dump(), expected);
}

#[test]
fn test_dump_nested_indentation() {
    let program = block(vec![var("a", array(vec![int(1), int(2)]))]);
    let expected = "\
Block(
  Assign(
    Decl Var
    Op '='
    Id(\"a\")
    Array(
      Int(1)
      Int(2)
    )
  )
)
";
    assert_eq!(program.dump(), expected);
}

#[test]
fn test_dump_call_and_try() {
    let tree = try_catch(
        block(vec![call("f", vec![int(1)])]),
        vec![catch_as(&["TypeError"], "e", block(vec![]))],
        None,
    );
    let expected = "\
TryCatch(
  Block(
    Call(
      Id(\"f\")
      Args(
        Int(1)
      )
    )
  )
  Catch(
    Filter(\"TypeError\")
    As(\"e\")
    Block(
    )
  )
)
";
    assert_eq!(tree.dump(), expected);
}
