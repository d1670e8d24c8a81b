//! Type policy resolution.
//!
//! A registry maps lower-case type names to [`TypePolicy`] implementations.
//! Registered policies take precedence over the built-in table; types with
//! neither resolve to a pass-through policy.
//!
//! Registrations are only accepted until the first resolution. At that point
//! the registry seals itself and the set of policies is fixed for its lifetime,
//! so concurrent readers never observe a policy change mid-flight.

use std::collections::HashMap;
use std::fmt;
use std::ops::Deref;
use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::codec::to_lower_ascii;
use crate::error::RegistryError;
use crate::policy::{BuiltinPolicy, PASS_THROUGH, TypePolicy, builtin};
use crate::validate::validate_type;

type PolicyMap = HashMap<String, Arc<dyn TypePolicy>>;

#[derive(Default)]
struct Pending {
    policies: PolicyMap,
    sealed: bool,
}

/// A set of externally supplied type policies layered over the built-ins.
///
/// Most callers use the process-wide instance through [`register`] and
/// [`PackageUrl::parse`](crate::PackageUrl::parse). Independent instances are
/// useful for isolating tests or embedding several policy sets in one process.
///
/// # Examples
///
/// ```
/// use pkg_url::{PolicyRegistry, RegistryError, TypePolicy};
///
/// struct Passthrough;
/// impl TypePolicy for Passthrough {}
///
/// let registry = PolicyRegistry::new();
/// registry.register("vendor", Passthrough).unwrap();
/// assert!(registry.resolve("vendor").is_registered());
///
/// // The first resolution sealed the registry.
/// assert!(matches!(
///     registry.register("other", Passthrough),
///     Err(RegistryError::Sealed { .. })
/// ));
/// ```
#[derive(Default)]
pub struct PolicyRegistry {
    pending: Mutex<Pending>,
    sealed: OnceLock<PolicyMap>,
}

impl PolicyRegistry {
    /// Creates an empty, unsealed registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a policy for a package type.
    ///
    /// The type name is folded to lower case.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError` if the type name is invalid, a policy is
    /// already registered for it, or the registry has been sealed.
    pub fn register<P>(&self, package_type: &str, policy: P) -> Result<(), RegistryError>
    where
        P: TypePolicy + 'static,
    {
        if package_type.is_empty() {
            return Err(RegistryError::EmptyType);
        }
        validate_type(package_type).map_err(RegistryError::InvalidType)?;
        let package_type = to_lower_ascii(package_type).into_owned();

        let mut pending = self.pending.lock();
        if pending.sealed {
            return Err(RegistryError::Sealed { package_type });
        }
        if pending.policies.contains_key(&package_type) {
            return Err(RegistryError::AlreadyRegistered { package_type });
        }

        debug!(
            package_type = %package_type,
            overrides_builtin = builtin(&package_type).is_some(),
            "registered type policy"
        );
        pending.policies.insert(package_type, Arc::new(policy));
        Ok(())
    }

    /// Resolves the policy for a lower-case package type, sealing the registry.
    #[must_use]
    pub fn resolve(&self, package_type: &str) -> ResolvedPolicy {
        if let Some(policy) = self.policies().get(package_type) {
            return ResolvedPolicy::Registered(Arc::clone(policy));
        }
        match builtin(package_type) {
            Some(policy) => ResolvedPolicy::Builtin(policy),
            None => {
                trace!(package_type, "no policy for type, passing through");
                ResolvedPolicy::Builtin(&PASS_THROUGH)
            }
        }
    }

    /// Returns true once the registry stopped accepting registrations.
    #[must_use]
    pub fn is_sealed(&self) -> bool {
        self.sealed.get().is_some()
    }

    fn policies(&self) -> &PolicyMap {
        self.sealed.get_or_init(|| {
            let mut pending = self.pending.lock();
            pending.sealed = true;
            let policies = std::mem::take(&mut pending.policies);
            debug!(registered = policies.len(), "sealed type policy registry");
            policies
        })
    }
}

impl fmt::Debug for PolicyRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut types: Vec<String> = match self.sealed.get() {
            Some(policies) => policies.keys().cloned().collect(),
            None => self.pending.lock().policies.keys().cloned().collect(),
        };
        types.sort();
        f.debug_struct("PolicyRegistry")
            .field("registered", &types)
            .field("sealed", &self.is_sealed())
            .finish()
    }
}

/// The policy selected for a type.
#[derive(Clone)]
pub enum ResolvedPolicy {
    /// A policy supplied through [`PolicyRegistry::register`]
    Registered(Arc<dyn TypePolicy>),
    /// A built-in table entry, or the pass-through default
    Builtin(&'static BuiltinPolicy),
}

impl ResolvedPolicy {
    /// Returns true if the policy came from a registration.
    #[must_use]
    pub fn is_registered(&self) -> bool {
        matches!(self, Self::Registered(_))
    }
}

impl Deref for ResolvedPolicy {
    type Target = dyn TypePolicy;

    fn deref(&self) -> &Self::Target {
        match self {
            Self::Registered(policy) => policy.as_ref(),
            Self::Builtin(policy) => *policy,
        }
    }
}

impl fmt::Debug for ResolvedPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Registered(_) => f.write_str("Registered(..)"),
            Self::Builtin(policy) => f.debug_tuple("Builtin").field(policy).finish(),
        }
    }
}

/// Returns the process-wide registry used by [`PackageUrl::parse`](crate::PackageUrl::parse)
/// and [`PackageUrl::from_components`](crate::PackageUrl::from_components).
#[must_use]
pub fn global() -> &'static PolicyRegistry {
    static GLOBAL: OnceLock<PolicyRegistry> = OnceLock::new();
    GLOBAL.get_or_init(PolicyRegistry::new)
}

/// Registers a policy in the process-wide registry.
///
/// Call this during startup, before the first purl is parsed or constructed.
///
/// # Errors
///
/// Returns `RegistryError` under the same conditions as
/// [`PolicyRegistry::register`].
pub fn register<P>(package_type: &str, policy: P) -> Result<(), RegistryError>
where
    P: TypePolicy + 'static,
{
    global().register(package_type, policy)
}
