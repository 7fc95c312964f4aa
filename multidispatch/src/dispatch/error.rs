//! Error types for multiple dispatch.

use multidispatch_runtime::ValueKind;

use super::signature::Signature;

fn kinds_list(kinds: &[ValueKind]) -> String {
    kinds
        .iter()
        .map(|k| format!("::{}", k))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Error types for registration and dispatch.
#[derive(Debug, Clone)]
pub enum DispatchError {
    /// A signature with exactly these parameter types is already registered.
    RegistrationConflict { name: String, signature: Signature },
    /// No registered signature accepts the call arguments.
    NoMatchingSignature {
        name: String,
        arg_types: Vec<ValueKind>,
    },
    /// Several signatures match and neither specificity nor priority
    /// picks one. Candidates are ordered by descending priority.
    AmbiguousDispatch {
        name: String,
        arg_types: Vec<ValueKind>,
        candidates: Vec<(Signature, i32)>,
    },
    /// A parameter without a default follows one with a default.
    NonTrailingDefault { name: String, param: String },
    /// No operation is registered under this name.
    UnknownOperation { name: String },
}

impl DispatchError {
    /// Operation name the error refers to
    pub fn name(&self) -> &str {
        match self {
            DispatchError::RegistrationConflict { name, .. }
            | DispatchError::NoMatchingSignature { name, .. }
            | DispatchError::AmbiguousDispatch { name, .. }
            | DispatchError::NonTrailingDefault { name, .. }
            | DispatchError::UnknownOperation { name } => name,
        }
    }
}

impl std::fmt::Display for DispatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DispatchError::RegistrationConflict { name, signature } => {
                write!(
                    f,
                    "RegistrationConflict: {}{} is already registered",
                    name,
                    signature.call_form()
                )
            }
            DispatchError::NoMatchingSignature { name, arg_types } => {
                write!(
                    f,
                    "NoMatchingSignature: no signature matching {}({})",
                    name,
                    kinds_list(arg_types)
                )
            }
            DispatchError::AmbiguousDispatch {
                name,
                arg_types,
                candidates,
            } => {
                let mut msg = format!(
                    "AmbiguousDispatch: {}({}) is ambiguous. Candidates:\n",
                    name,
                    kinds_list(arg_types)
                );
                for (signature, priority) in candidates {
                    msg.push_str(&format!(
                        "  {}{} [priority {}]\n",
                        name,
                        signature.call_form(),
                        priority
                    ));
                }
                write!(f, "{}", msg.trim_end())
            }
            DispatchError::NonTrailingDefault { name, param } => {
                write!(
                    f,
                    "parameter '{}' of {} has no default but follows a parameter with one",
                    param, name
                )
            }
            DispatchError::UnknownOperation { name } => {
                write!(f, "no operation named '{}' is registered", name)
            }
        }
    }
}

impl std::error::Error for DispatchError {}
