//! # Seedweave: reproducible randomness for tests
//!
//! Seedweave gives test code "randomness" that is fully determined by a seed
//! derived from the test's identity. Failures become replayable, flaky
//! non-determinism disappears, and repeated runs still exercise varied inputs
//! because every repetition receives its own seed.
//!
//! ## Core Concepts
//!
//! - **SeededRandom**: a generator seeded once at construction whose output
//!   sequence is bit-reproducible across runs
//! - **SeedResolver**: derives a seed from an invocation's display name and a
//!   parameter slot, and shares one generator instance across all callback
//!   phases of the same invocation
//! - **InvocationCache**: the per-invocation key-value store a host test
//!   framework owns and threads through the resolver
//!
//! ## Quick Start
//!
//! ### Drawing reproducible values
//!
//! ```
//! use seedweave::random::SeededRandom;
//!
//! let mut random = SeededRandom::new(413);
//!
//! // Identical seeds always replay the identical sequence.
//! assert_eq!(
//!     random.next_uuid().to_string(),
//!     "c400b47f-b749-fe68-a079-92c1952e98d2",
//! );
//!
//! let color = random.pick(["red", "green", "blue"]).unwrap();
//! let order = random.shuffle(["alpha", "beta", "gamma"]);
//! assert_eq!(order.len(), 3);
//! assert!(["red", "green", "blue"].contains(&color));
//! ```
//!
//! ### Resolving generators per test invocation
//!
//! A host framework supplies three things: the 0-based index of the parameter
//! slot it is filling, the invocation's display name (unique per repetition or
//! parameterized case), and a cache it created fresh for this invocation. The
//! resolver turns those into a shared generator handle:
//!
//! ```
//! use seedweave::random::SeededRandom;
//! use seedweave::resolver::{InvocationCache, SeedResolver};
//! use std::rc::Rc;
//!
//! let resolver = SeedResolver::new();
//! let mut cache = InvocationCache::new();
//!
//! // A setup phase and the test body ask for the same slot...
//! let from_setup = resolver
//!     .resolve::<SeededRandom>(0, "test_something [1]", &mut cache)
//!     .unwrap();
//! let from_body = resolver
//!     .resolve::<SeededRandom>(0, "test_something [1]", &mut cache)
//!     .unwrap();
//!
//! // ...and receive the very same instance, not merely an equal seed.
//! assert!(Rc::ptr_eq(&from_setup, &from_body));
//!
//! // A different slot in the same invocation gets its own generator.
//! let second_slot = resolver
//!     .resolve::<SeededRandom>(1, "test_something [1]", &mut cache)
//!     .unwrap();
//! assert!(!Rc::ptr_eq(&from_setup, &second_slot));
//! ```
//!
//! ### Replaying a failure
//!
//! The seed is a pure function of invocation metadata, so it can be recomputed
//! by hand when a failure report includes the display name:
//!
//! ```
//! use seedweave::random::SeededRandom;
//! use seedweave::resolver::seed_for;
//!
//! let seed = seed_for("test_something [3]", 0);
//! let mut replay = SeededRandom::new(seed);
//! let _ = replay.next_int();
//! ```
//!
//! ## Error Handling
//!
//! Failures are synchronous, local, and never consume entropy: an invalid
//! bound or an empty candidate collection fails before any draw, so a caller
//! that recovers still replays the same downstream sequence. Resolver errors
//! carry the type and seed that were attempted, for failure-report
//! correlation.
//!
//! ## Module Guide
//!
//! - [`random`] - The seeded generator and its derived operations
//! - [`resolver`] - Seed derivation, type registration, and instance sharing
//! - [`testing`] - Shared fixtures for exercising resolver extension points

pub mod random;
pub mod resolver;
pub mod testing;
