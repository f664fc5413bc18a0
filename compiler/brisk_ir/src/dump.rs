//! Indented tree dump of a [`Construct`].
//!
//! Each node prints its kind on one line; children follow one level deeper
//! (two spaces per level) and are closed by `)` at the parent's level. Leaves
//! print inline, e.g. `Int(1)`, `Id("x")`, `Str("a\n")`.

use std::fmt::{self, Write};

use crate::ast::{CatchClause, Construct, ConstructKind};
use crate::{escape, Name};

const INDENT: &str = "  ";

fn pad(out: &mut dyn Write, level: usize) -> fmt::Result {
    for _ in 0..level {
        out.write_str(INDENT)?;
    }
    Ok(())
}

fn line(out: &mut dyn Write, level: usize, text: &str) -> fmt::Result {
    pad(out, level)?;
    out.write_str(text)?;
    out.write_char('\n')
}

fn name_list(names: &[Name]) -> String {
    names
        .iter()
        .map(|n| format!("{n:?}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Print `header(`, the children, and the closing `)`.
fn node(
    out: &mut dyn Write,
    level: usize,
    header: &str,
    body: impl FnOnce(&mut dyn Write, usize) -> fmt::Result,
) -> fmt::Result {
    pad(out, level)?;
    out.write_str(header)?;
    out.write_str("(\n")?;
    body(&mut *out, level + 1)?;
    line(out, level, ")")
}

fn optional(out: &mut dyn Write, level: usize, child: Option<&Construct>) -> fmt::Result {
    match child {
        Some(c) => c.serialize(out, level),
        None => line(out, level, "None"),
    }
}

fn catch_clause(out: &mut dyn Write, level: usize, clause: &CatchClause) -> fmt::Result {
    node(out, level, "Catch", |out, level| {
        if !clause.filter.is_empty() {
            line(out, level, &format!("Filter({})", name_list(&clause.filter)))?;
        }
        if let Some(binding) = &clause.binding {
            line(out, level, &format!("As({binding:?})"))?;
        }
        clause.body.serialize(out, level)
    })
}

impl Construct {
    /// Write this node and its children at indentation `level`.
    pub fn serialize(&self, out: &mut dyn Write, level: usize) -> fmt::Result {
        match &self.kind {
            ConstructKind::Int(v) => line(out, level, &format!("Int({v})")),
            ConstructKind::Float(v) => line(out, level, &format!("Float({v:?})")),
            ConstructKind::Str(s) => line(out, level, &format!("Str(\"{}\")", escape(s))),
            ConstructKind::None => line(out, level, "None"),
            ConstructKind::Identifier(name) => line(out, level, &format!("Id({name:?})")),
            ConstructKind::Break | ConstructKind::Continue | ConstructKind::Rethrow => {
                line(out, level, self.kind_name())
            }

            ConstructKind::Array(items) | ConstructKind::Block(items) => {
                node(out, level, self.kind_name(), |out, level| {
                    items.iter().try_for_each(|c| c.serialize(out, level))
                })
            }
            ConstructKind::Dict(pairs) => node(out, level, "Dict", |out, level| {
                pairs.iter().try_for_each(|(k, v)| {
                    node(out, level, "Pair", |out, level| {
                        k.serialize(out, level)?;
                        v.serialize(out, level)
                    })
                })
            }),
            ConstructKind::Member { target, member } => node(out, level, "Member", |out, level| {
                target.serialize(out, level)?;
                line(out, level, &format!("Field({member:?})"))
            }),
            ConstructKind::Subscript { target, index } => {
                node(out, level, "Subscript", |out, level| {
                    target.serialize(out, level)?;
                    index.serialize(out, level)
                })
            }
            ConstructKind::Slice { target, start, end } => node(out, level, "Slice", |out, level| {
                target.serialize(out, level)?;
                optional(out, level, start.as_deref())?;
                optional(out, level, end.as_deref())
            }),
            ConstructKind::Call { callee, args } => node(out, level, "Call", |out, level| {
                callee.serialize(out, level)?;
                node(out, level, "Args", |out, level| {
                    args.items.iter().try_for_each(|c| c.serialize(out, level))
                })
            }),
            ConstructKind::Unary { op, operand } => node(out, level, "Unary", |out, level| {
                line(out, level, &format!("Op '{}'", op.as_symbol()))?;
                operand.serialize(out, level)
            }),
            ConstructKind::BinaryChain { first, rest } => {
                node(out, level, "MultiOp", |out, level| {
                    first.serialize(out, level)?;
                    rest.iter().try_for_each(|(op, operand)| {
                        line(out, level, &format!("Op '{op}'"))?;
                        operand.serialize(out, level)
                    })
                })
            }
            ConstructKind::Assign(assign) => node(out, level, "Assign", |out, level| {
                if let Some(decl) = assign.decl {
                    line(out, level, &format!("Decl {decl:?}"))?;
                }
                line(out, level, &format!("Op '{}'", assign.op.as_symbol()))?;
                assign.targets.iter().try_for_each(|t| t.serialize(out, level))?;
                assign.value.serialize(out, level)
            }),
            ConstructKind::If {
                cond,
                then_branch,
                else_branch,
            } => node(out, level, "If", |out, level| {
                cond.serialize(out, level)?;
                then_branch.serialize(out, level)?;
                match else_branch {
                    Some(e) => e.serialize(out, level),
                    None => Ok(()),
                }
            }),
            ConstructKind::While { cond, body } => node(out, level, "While", |out, level| {
                cond.serialize(out, level)?;
                body.serialize(out, level)
            }),
            ConstructKind::Foreach(each) => node(out, level, "Foreach", |out, level| {
                if each.decl {
                    line(out, level, "Decl Var")?;
                }
                if each.indexed {
                    line(out, level, "Indexed")?;
                }
                line(out, level, &format!("Ids({})", name_list(&each.ids)))?;
                each.container.serialize(out, level)?;
                each.body.serialize(out, level)
            }),
            ConstructKind::Return(None) => line(out, level, "Return"),
            ConstructKind::Return(Some(value)) => node(out, level, "Return", |out, level| {
                value.serialize(out, level)
            }),
            ConstructKind::Throw(value) => {
                node(out, level, "Throw", |out, level| value.serialize(out, level))
            }
            ConstructKind::TryCatch(tc) => node(out, level, "TryCatch", |out, level| {
                tc.body.serialize(out, level)?;
                tc.catches
                    .iter()
                    .try_for_each(|clause| catch_clause(out, level, clause))?;
                match &tc.finally {
                    Some(f) => node(out, level, "Finally", |out, level| f.serialize(out, level)),
                    None => Ok(()),
                }
            }),
            ConstructKind::FuncDecl(func) => node(out, level, "FuncDecl", |out, level| {
                if let Some(name) = &func.name {
                    line(out, level, &format!("Name({name:?})"))?;
                }
                if func.is_pure {
                    line(out, level, "Pure")?;
                }
                if let Some(captures) = &func.captures {
                    line(out, level, &format!("Captures({})", name_list(captures)))?;
                }
                line(out, level, &format!("Params({})", name_list(&func.params)))?;
                func.body.serialize(out, level)
            }),
        }
    }

    /// The whole tree as a string.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.serialize(&mut out, 0);
        out
    }
}

#[cfg(test)]
mod tests;
