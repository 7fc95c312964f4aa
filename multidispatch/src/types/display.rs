//! Canonical annotation text for types.

use std::fmt;

use multidispatch_runtime::NativeKind;

use super::node::{LiteralValue, Type, TypeNode};

fn write_list(f: &mut fmt::Formatter<'_>, items: &[Type]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiteralValue::None => write!(f, "None"),
            LiteralValue::Bool(true) => write!(f, "True"),
            LiteralValue::Bool(false) => write!(f, "False"),
            LiteralValue::Int(n) => write!(f, "{}", n),
            LiteralValue::Str(s) => write!(f, "{:?}", s),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.node() {
            TypeNode::Top => write!(f, "Any"),
            TypeNode::Wildcard => write!(f, "?"),
            TypeNode::Atomic(kind) => write!(f, "{}", kind),
            TypeNode::Generic { base, item, .. } => {
                if item.is_unconstrained_item() && !item.is_wildcard() {
                    return write!(f, "{}", base);
                }
                let kind = base.native_kind();
                match (kind, item.node()) {
                    (Some(NativeKind::Dict | NativeKind::Mapping), TypeNode::Product(kv))
                        if kv.len() == 2 =>
                    {
                        write!(f, "{}[{}, {}]", base, kv[0], kv[1])
                    }
                    (Some(NativeKind::Tuple), _) => write!(f, "{}[{}, ...]", base, item),
                    _ => write!(f, "{}[{}]", base, item),
                }
            }
            TypeNode::Product(items) if items.is_empty() => write!(f, "Tuple[()]"),
            TypeNode::Product(items) => {
                write!(f, "Tuple[")?;
                write_list(f, items)?;
                write!(f, "]")
            }
            TypeNode::Sum(alts) if alts.is_empty() => write!(f, "Never"),
            TypeNode::Sum(alts) => {
                for (i, alt) in alts.iter().enumerate() {
                    if i > 0 {
                        write!(f, " | ")?;
                    }
                    write!(f, "{}", alt)?;
                }
                Ok(())
            }
            TypeNode::Phantom { marker, item } if item.is_top() => write!(f, "{}", marker),
            TypeNode::Phantom { marker, item } => write!(f, "{}[{}]", marker, item),
            TypeNode::Constraint { base, predicates } => {
                write!(f, "{}(", base)?;
                for (i, predicate) in predicates.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", predicate.label())?;
                }
                write!(f, ")")
            }
            TypeNode::Literal(values) => {
                write!(f, "Literal[")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", value)?;
                }
                write!(f, "]")
            }
        }
    }
}
