//! Dispatch groups: named operations over dynamic values.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use multidispatch_runtime::{ClassRef, RuntimeResult, Value};
use serde_json::json;

use super::error::DispatchError;
use super::signature::{arity_family, Param, Signature};
use super::tree::{DispatchStats, DispatchTree};
use crate::config::DispatchConfig;
use crate::error::Result;
use crate::types::{Type, TypeRegistry, TypeResult};

/// A registered implementation
pub type Method = Rc<dyn Fn(&[Value]) -> RuntimeResult<Value>>;

type SharedTree = Rc<RefCell<DispatchTree<Method>>>;

/// Wrap an implementation so omitted trailing arguments get their defaults
fn with_defaults(method: &Method, defaults: Vec<Value>) -> Method {
    if defaults.is_empty() {
        return Rc::clone(method);
    }
    let method = Rc::clone(method);
    Rc::new(move |args: &[Value]| {
        let mut full = Vec::with_capacity(args.len() + defaults.len());
        full.extend_from_slice(args);
        full.extend(defaults.iter().cloned());
        method(&full)
    })
}

/// A group of multiple-dispatch operations sharing one type registry
///
/// # Examples
/// ```
/// use multidispatch::dispatch::{Dispatcher, Param};
/// use multidispatch_runtime::Value;
///
/// let mut group = Dispatcher::new();
/// group
///     .register("describe", &[Param::annotated("x", "int")], |_| Ok(Value::str("int")), 0)
///     .unwrap();
/// let describe = group
///     .register("describe", &[Param::new("x")], |_| Ok(Value::str("other")), 0)
///     .unwrap();
/// assert_eq!(describe.call(&[Value::Int(1)]).unwrap(), Value::str("int"));
/// assert_eq!(describe.call(&[Value::None]).unwrap(), Value::str("other"));
/// ```
pub struct Dispatcher {
    registry: TypeRegistry,
    operations: BTreeMap<String, SharedTree>,
    config: DispatchConfig,
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("operations", &self.operations.keys().collect::<Vec<_>>())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::with_config(DispatchConfig::default())
    }

    pub fn with_config(config: DispatchConfig) -> Self {
        Self {
            registry: TypeRegistry::new(),
            operations: BTreeMap::new(),
            config,
        }
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut TypeRegistry {
        &mut self.registry
    }

    /// Declare a class usable in annotations of this group
    pub fn define_class(&mut self, name: &str, bases: &[&str]) -> TypeResult<ClassRef> {
        self.registry.define_class(name, bases)
    }

    /// Canonicalize annotation text with this group's registry
    pub fn resolve_type(&self, annotation: &str) -> TypeResult<Type> {
        self.registry.resolve(annotation)
    }

    /// Register an implementation of `name` for the declared parameters
    ///
    /// Parameters with defaults also register the shorter signatures of
    /// their arity family. Either every signature of the family is added
    /// or, on a conflict, none is.
    pub fn register<F>(
        &mut self,
        name: &str,
        params: &[Param],
        implementation: F,
        priority: i32,
    ) -> Result<MultiMethod>
    where
        F: Fn(&[Value]) -> RuntimeResult<Value> + 'static,
    {
        let types = params
            .iter()
            .map(|p| p.annotation.resolve(&self.registry))
            .collect::<TypeResult<Vec<_>>>()?;
        let family = arity_family(name, params, &types)?;

        let method: Method = Rc::new(implementation);
        let entries = family
            .into_iter()
            .map(|member| {
                (
                    member.signature,
                    with_defaults(&method, member.defaults),
                    priority,
                )
            })
            .collect();

        let tree = Rc::clone(self.operations.entry(name.to_string()).or_insert_with(|| {
            Rc::new(RefCell::new(DispatchTree::with_config(name, &self.config)))
        }));
        tree.borrow_mut().insert_all(entries)?;
        Ok(MultiMethod {
            name: Rc::from(name),
            tree,
        })
    }

    /// Handle for an already registered operation
    pub fn get(&self, name: &str) -> Option<MultiMethod> {
        self.operations.get(name).map(|tree| MultiMethod {
            name: Rc::from(name),
            tree: Rc::clone(tree),
        })
    }

    /// Dispatch a call to the operation registered under `name`
    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value> {
        let method = self.get(name).ok_or_else(|| DispatchError::UnknownOperation {
            name: name.to_string(),
        })?;
        method.call(args)
    }

    /// Names of the registered operations, sorted
    pub fn operations(&self) -> Vec<&str> {
        self.operations.keys().map(String::as_str).collect()
    }

    /// JSON summary of every operation's signatures and priorities
    pub fn describe(&self) -> serde_json::Value {
        let operations: serde_json::Map<String, serde_json::Value> = self
            .operations
            .iter()
            .map(|(name, tree)| {
                let signatures: Vec<_> = tree
                    .borrow()
                    .signatures()
                    .into_iter()
                    .map(|(signature, priority)| {
                        json!({ "signature": signature, "priority": priority })
                    })
                    .collect();
                (name.clone(), json!(signatures))
            })
            .collect();
        serde_json::Value::Object(operations)
    }
}

/// Callable handle for one operation of a dispatch group
///
/// Handles are cheap to clone and stay valid while the group gains more
/// registrations for the same name.
#[derive(Clone)]
pub struct MultiMethod {
    name: Rc<str>,
    tree: SharedTree,
}

impl fmt::Debug for MultiMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultiMethod")
            .field("name", &self.name)
            .field("signatures", &self.tree.borrow().signatures())
            .finish()
    }
}

impl MultiMethod {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The implementation a call with these arguments would run
    pub fn implementation(&self, args: &[Value]) -> Result<Method> {
        let tree = self.tree.borrow();
        Ok(Rc::clone(&tree.resolve(args)?.implementation))
    }

    /// Signature and priority of the leaf chosen for these arguments
    pub fn resolve(&self, args: &[Value]) -> Result<(Signature, i32)> {
        let tree = self.tree.borrow();
        let leaf = tree.resolve(args)?;
        Ok((leaf.signature.clone(), leaf.priority))
    }

    /// Dispatch and invoke
    ///
    /// The tree is not borrowed while the implementation runs, so
    /// implementations may call back into the same operation.
    pub fn call(&self, args: &[Value]) -> Result<Value> {
        let method = self.implementation(args)?;
        Ok(method(args)?)
    }

    pub fn signatures(&self) -> Vec<(Signature, i32)> {
        self.tree.borrow().signatures()
    }

    pub fn stats(&self) -> DispatchStats {
        self.tree.borrow().stats()
    }

    /// Whether resolutions of this operation are memoized
    pub fn uses_cache(&self) -> bool {
        self.tree.borrow().uses_cache()
    }
}
