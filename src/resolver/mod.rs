//! Deterministic seed derivation and per-invocation instance sharing.
//!
//! A host test framework drives this module through a narrow contract: for
//! each generator-typed parameter it cannot otherwise satisfy, it asks
//! [`SeedResolver::supports`] whether the declared type is resolvable, then
//! calls [`SeedResolver::resolve`] with the parameter's 0-based slot index,
//! the invocation's display name, and the invocation-scoped
//! [`InvocationCache`] it owns.
//!
//! The seed for a slot is `((slot + 1) << 32) + stable_hash(display_name)`:
//! the slot index lands in the high word so adjacent parameter positions get
//! sequences that diverge by large magnitude, while the name hash in the low
//! word separates repetitions and parameterized cases. Within one invocation,
//! the first request for a slot constructs the generator and every later
//! request for that slot returns the identical instance, so a setup phase and
//! the test body observe one shared sequence.
//!
//! The resolver holds no per-invocation state of its own; everything scoped
//! to an invocation lives in the cache the host created for it.

use rustc_hash::{FxHashMap, FxHasher};
use std::any::{self, Any, TypeId};
use std::cell::RefCell;
use std::hash::{Hash, Hasher};
use std::rc::Rc;
use tracing::{debug, instrument, trace};

use crate::random::SeededRandom;

pub mod errors;
#[cfg(test)]
mod tests;

pub use errors::{ConstructionError, ResolveError};

/// The single-seed constructor capability.
///
/// Any type implementing `FromSeed` can be registered with a
/// [`SeedResolver`] and constructed on demand for a parameter slot. Domain
/// extensions should compose a [`SeededRandom`] and build their derived
/// operations on top of its draws rather than reimplementing the generator.
///
/// # Examples
///
/// ```
/// use seedweave::random::SeededRandom;
/// use seedweave::resolver::{ConstructionError, FromSeed};
///
/// struct DiceRolls {
///     draws: SeededRandom,
/// }
///
/// impl FromSeed for DiceRolls {
///     fn from_seed(seed: i64) -> Result<Self, ConstructionError> {
///         Ok(Self { draws: SeededRandom::new(seed) })
///     }
/// }
/// ```
pub trait FromSeed: Sized + 'static {
    /// Construct an instance from a 64-bit seed.
    ///
    /// # Errors
    ///
    /// [`ConstructionError`] when the implementor's setup cannot complete;
    /// the resolver wraps it with the attempted type and seed.
    fn from_seed(seed: i64) -> Result<Self, ConstructionError>;
}

impl FromSeed for SeededRandom {
    fn from_seed(seed: i64) -> Result<Self, ConstructionError> {
        Ok(Self::new(seed))
    }
}

/// Deterministic hash of a display name, stable for the whole process run.
///
/// The 64-bit hash is folded to its sign-extended low 32 bits so that the
/// slot index occupies the seed's high word untouched. `FxHasher` carries no
/// per-process random state, so the hash is in fact stable across runs as
/// well, which keeps replay instructions simple.
#[must_use]
pub fn stable_hash(display_name: &str) -> i64 {
    let mut hasher = FxHasher::default();
    display_name.hash(&mut hasher);
    i64::from(hasher.finish() as u32 as i32)
}

/// The seed for a parameter slot of an invocation.
///
/// `slot_index` is 0-based, as supplied by host frameworks; internally the
/// formula uses the 1-based position. Signed wraparound is permitted and
/// expected for extreme inputs.
#[must_use]
pub fn seed_for(display_name: &str, slot_index: usize) -> i64 {
    let index = slot_index as i64 + 1;
    index.wrapping_shl(32).wrapping_add(stable_hash(display_name))
}

fn slot_key(index: usize) -> String {
    format!("p{index}")
}

/// Invocation-scoped store of resolved generator instances.
///
/// The host framework creates one cache per concrete invocation, shares it
/// across all of that invocation's callback phases, and discards it
/// afterwards. The resolver only ever reads and inserts entries; it never
/// keeps a reference beyond the call. Entries are keyed by slot (`p1`, `p2`,
/// ...) and hold shared single-threaded handles, matching the contract that
/// one invocation's callbacks run sequentially.
#[derive(Default)]
pub struct InvocationCache {
    entries: FxHashMap<String, Rc<dyn Any>>,
}

impl InvocationCache {
    /// Create an empty cache for one invocation.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of slots resolved so far in this invocation.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no slot has been resolved yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for InvocationCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut keys: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        keys.sort_unstable();
        f.debug_struct("InvocationCache").field("slots", &keys).finish()
    }
}

struct Registration {
    type_name: &'static str,
    build: Box<dyn Fn(i64) -> Result<Rc<dyn Any>, ConstructionError>>,
}

/// Type-based eligibility checks plus deterministic, cached generator
/// production.
///
/// Dynamic construction is a registered factory map: each [`FromSeed`] type
/// registered with the resolver gets a factory keyed by its `TypeId`, which
/// is what lets a host framework resolve parameters it only knows by
/// declared type. [`SeededRandom`] is pre-registered.
///
/// The resolver is stateless across invocations and can be shared freely;
/// all invocation-scoped state lives in the [`InvocationCache`].
pub struct SeedResolver {
    factories: FxHashMap<TypeId, Registration>,
}

impl Default for SeedResolver {
    fn default() -> Self {
        let mut resolver = Self {
            factories: FxHashMap::default(),
        };
        resolver.register::<SeededRandom>();
        resolver
    }
}

impl SeedResolver {
    /// Create a resolver with [`SeededRandom`] pre-registered.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a [`FromSeed`] type so the resolver can construct it.
    ///
    /// Re-registering a type replaces its factory.
    pub fn register<T: FromSeed>(&mut self) {
        trace!(type_name = any::type_name::<T>(), "registering seeded type");
        self.factories.insert(
            TypeId::of::<T>(),
            Registration {
                type_name: any::type_name::<T>(),
                build: Box::new(|seed| {
                    let instance = T::from_seed(seed)?;
                    Ok(Rc::new(RefCell::new(instance)) as Rc<dyn Any>)
                }),
            },
        );
    }

    /// Does this resolver handle parameters of type `T`?
    #[must_use]
    pub fn supports<T: 'static>(&self) -> bool {
        self.supports_id(TypeId::of::<T>())
    }

    /// Does this resolver handle parameters of the given declared type?
    #[must_use]
    pub fn supports_id(&self, declared: TypeId) -> bool {
        self.factories.contains_key(&declared)
    }

    /// Resolve the generator for a parameter slot, constructing it on the
    /// first request and returning the cached instance on every later one.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::UnsupportedType`] if `T` was never registered
    /// - [`ResolveError::Construction`] if the factory failed, identifying
    ///   the type and the seed that was attempted
    /// - [`ResolveError::CacheTypeMismatch`] if the cached entry for this
    ///   slot was resolved as a different type, which indicates a host
    ///   contract violation
    pub fn resolve<T: FromSeed>(
        &self,
        slot_index: usize,
        display_name: &str,
        cache: &mut InvocationCache,
    ) -> Result<Rc<RefCell<T>>, ResolveError> {
        if !self.supports::<T>() {
            return Err(ResolveError::UnsupportedType {
                type_name: any::type_name::<T>().to_string(),
            });
        }
        let handle = self.resolve_dyn(TypeId::of::<T>(), slot_index, display_name, cache)?;
        handle
            .downcast::<RefCell<T>>()
            .map_err(|_| ResolveError::CacheTypeMismatch {
                key: slot_key(slot_index + 1),
                type_name: any::type_name::<T>(),
            })
    }

    /// Type-erased variant of [`resolve`](SeedResolver::resolve) for host
    /// frameworks that only carry a `TypeId` for the declared parameter type.
    ///
    /// The returned handle is an `Rc<RefCell<T>>` behind `Rc<dyn Any>`, where
    /// `T` is the registered type for `declared`.
    ///
    /// # Errors
    ///
    /// As [`resolve`](SeedResolver::resolve), minus the downcast check.
    #[instrument(level = "debug", skip(self, cache))]
    pub fn resolve_dyn(
        &self,
        declared: TypeId,
        slot_index: usize,
        display_name: &str,
        cache: &mut InvocationCache,
    ) -> Result<Rc<dyn Any>, ResolveError> {
        let index = slot_index + 1;
        let key = slot_key(index);
        if let Some(existing) = cache.entries.get(&key) {
            trace!(%key, "invocation cache hit");
            return Ok(Rc::clone(existing));
        }

        let registration =
            self.factories
                .get(&declared)
                .ok_or_else(|| ResolveError::UnsupportedType {
                    type_name: format!("{declared:?}"),
                })?;
        let seed = seed_for(display_name, slot_index);
        debug!(
            %key,
            seed,
            type_name = registration.type_name,
            "constructing seeded instance"
        );
        let instance = (registration.build)(seed).map_err(|source| {
            ResolveError::Construction {
                type_name: registration.type_name,
                seed,
                source,
            }
        })?;
        cache.entries.insert(key, Rc::clone(&instance));
        Ok(instance)
    }
}

impl std::fmt::Debug for SeedResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&str> = self.factories.values().map(|r| r.type_name).collect();
        names.sort_unstable();
        f.debug_struct("SeedResolver").field("registered", &names).finish()
    }
}
