//! Canonicalization of annotations into shared type nodes.
//!
//! The registry resolves surface names (`int`, `Optional`, user classes)
//! and memoizes resolved annotations by their text, so each distinct
//! annotation produces one shared node.

use std::cell::RefCell;
use std::collections::HashMap;

use multidispatch_runtime::ClassRef;
use multidispatch_syntax::{LiteralExpr, Span, TypeExpr, TypeExprKind};
use tracing::trace;

use super::builtins;
use super::error::{TypeError, TypeResult};
use super::node::{LiteralValue, Type};

/// Builtin name table; several spellings map to one node
fn builtin(name: &str) -> Option<Type> {
    let ty = match name {
        "Any" | "object" | "Object" => &builtins::ANY,
        "None" | "NoneType" => &builtins::NONE,
        "bool" | "Bool" => &builtins::BOOL,
        "int" | "Int" => &builtins::INT,
        "float" | "Float" => &builtins::FLOAT,
        "Number" | "number" => &builtins::NUMBER,
        "str" | "Str" | "String" => &builtins::STR,
        "bytes" | "Bytes" => &builtins::BYTES,
        "Callable" | "callable" => &builtins::CALLABLE,
        "list" | "List" => &builtins::LIST,
        "tuple" | "Tuple" => &builtins::TUPLE,
        "set" | "Set" => &builtins::SET,
        "frozenset" | "FrozenSet" => &builtins::FROZENSET,
        "dict" | "Dict" => &builtins::DICT,
        "Sequence" => &builtins::SEQUENCE,
        "Iterable" => &builtins::ITERABLE,
        "Mapping" => &builtins::MAPPING,
        "Never" => &builtins::NEVER,
        _ => return None,
    };
    Some(Type::clone(ty))
}

fn expect_arity(name: &str, args: &[TypeExpr], expected: usize) -> TypeResult<()> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(TypeError::WrongArity {
            name: name.to_string(),
            expected: expected.to_string(),
            found: args.len(),
        })
    }
}

/// Resolves annotations to canonical types
#[derive(Debug, Default)]
pub struct TypeRegistry {
    names: HashMap<String, Type>,
    classes: HashMap<String, ClassRef>,
    cache: RefCell<HashMap<String, Type>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a class whose bases are already registered classes
    pub fn define_class(&mut self, name: &str, bases: &[&str]) -> TypeResult<ClassRef> {
        let bases = bases
            .iter()
            .map(|base| {
                self.classes
                    .get(*base)
                    .cloned()
                    .ok_or_else(|| TypeError::UnknownName {
                        name: base.to_string(),
                        span: Span::default(),
                    })
            })
            .collect::<TypeResult<Vec<_>>>()?;
        let class = ClassRef::new(name, bases);
        self.register_class(class.clone());
        Ok(class)
    }

    /// Make an existing class resolvable by its name
    pub fn register_class(&mut self, class: ClassRef) {
        self.define_name(class.name(), Type::class(&class));
        self.classes.insert(class.name().to_string(), class);
    }

    /// Bind a name to a type (aliases, phantom roots)
    pub fn define_name(&mut self, name: &str, ty: Type) {
        self.names.insert(name.to_string(), ty);
        // Cached annotations may mention the rebound name
        self.cache.borrow_mut().clear();
    }

    /// Declare a phantom marker; `Marker[T]` then wraps `T`
    pub fn define_phantom(&mut self, marker: &str) -> Type {
        let root = Type::phantom_root(marker);
        self.define_name(marker, root.clone());
        root
    }

    pub fn class(&self, name: &str) -> Option<&ClassRef> {
        self.classes.get(name)
    }

    /// Resolve annotation text, memoized by the text
    pub fn resolve(&self, annotation: &str) -> TypeResult<Type> {
        if let Some(ty) = self.cache.borrow().get(annotation) {
            return Ok(ty.clone());
        }
        let expr = multidispatch_syntax::parse(annotation)?;
        let ty = self.canonicalize(&expr)?;
        trace!(annotation, canonical = %ty, "resolved annotation");
        self.cache
            .borrow_mut()
            .insert(annotation.to_string(), ty.clone());
        Ok(ty)
    }

    /// Number of memoized annotations
    pub fn cached_len(&self) -> usize {
        self.cache.borrow().len()
    }

    fn lookup(&self, name: &str, span: Span) -> TypeResult<Type> {
        if let Some(ty) = self.names.get(name) {
            return Ok(ty.clone());
        }
        builtin(name).ok_or_else(|| TypeError::UnknownName {
            name: name.to_string(),
            span,
        })
    }

    /// Convert a parsed annotation into a canonical type
    pub fn canonicalize(&self, expr: &TypeExpr) -> TypeResult<Type> {
        match &expr.kind {
            TypeExprKind::Name(name) => self.lookup(name, expr.span),
            TypeExprKind::Wildcard => Ok(Type::wildcard()),
            TypeExprKind::Union(members) => Ok(Type::union(self.canonicalize_all(members)?)),
            TypeExprKind::Apply { base, args } => self.apply(base, args, expr.span),
            TypeExprKind::Ellipsis => Err(TypeError::MisplacedEllipsis { span: expr.span }),
            TypeExprKind::Literal(lit) => Err(TypeError::InvalidLiteral {
                found: lit.to_string(),
                span: expr.span,
            }),
        }
    }

    fn canonicalize_all(&self, exprs: &[TypeExpr]) -> TypeResult<Vec<Type>> {
        exprs.iter().map(|e| self.canonicalize(e)).collect()
    }

    fn apply(&self, base: &str, args: &[TypeExpr], span: Span) -> TypeResult<Type> {
        match base {
            "Optional" => {
                expect_arity(base, args, 1)?;
                Ok(Type::optional(self.canonicalize(&args[0])?))
            }
            "Union" => Ok(Type::union(self.canonicalize_all(args)?)),
            "Literal" => args
                .iter()
                .map(literal_value)
                .collect::<TypeResult<Vec<_>>>()
                .map(Type::literal),
            "Tuple" | "tuple" => self.tuple(args),
            "Dict" | "dict" | "Mapping" => {
                expect_arity(base, args, 2)?;
                let key_value = Type::product(self.canonicalize_all(args)?);
                self.lookup(base, span)?.parameterize(key_value)
            }
            _ => {
                let generic = self.lookup(base, span)?;
                expect_arity(base, args, 1)?;
                generic.parameterize(self.canonicalize(&args[0])?)
            }
        }
    }

    /// `Tuple[A, B]` is a product, `Tuple[T, ...]` a homogeneous tuple
    fn tuple(&self, args: &[TypeExpr]) -> TypeResult<Type> {
        if let [item, ellipsis] = args {
            if ellipsis.is_ellipsis() {
                return builtins::TUPLE.parameterize(self.canonicalize(item)?);
            }
        }
        if let Some(misplaced) = args.iter().find(|a| a.is_ellipsis()) {
            return Err(TypeError::MisplacedEllipsis {
                span: misplaced.span,
            });
        }
        Ok(Type::product(self.canonicalize_all(args)?))
    }
}

fn literal_value(arg: &TypeExpr) -> TypeResult<LiteralValue> {
    match &arg.kind {
        TypeExprKind::Literal(LiteralExpr::Int(n)) => Ok(LiteralValue::Int(*n)),
        TypeExprKind::Literal(LiteralExpr::Str(s)) => Ok(LiteralValue::Str(s.clone())),
        TypeExprKind::Name(name) if name == "True" => Ok(LiteralValue::Bool(true)),
        TypeExprKind::Name(name) if name == "False" => Ok(LiteralValue::Bool(false)),
        TypeExprKind::Name(name) if name == "None" => Ok(LiteralValue::None),
        _ => Err(TypeError::InvalidLiteral {
            found: arg.to_string(),
            span: arg.span,
        }),
    }
}
