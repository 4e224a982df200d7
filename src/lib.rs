//! rc-runtime: reference-counted runtime containers for a small compiled
//! language. Lists with inline small storage, open-addressing mappings and
//! UTF-8 strings over shared growable buffers, all owned through
//! single-threaded counted pointers.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: keep each layer's contract small enough to check on its own.
//! - Layers:
//!   - `Shared<T>`: intrusive counted pointer. Clone acquires, drop
//!     releases, the value is destroyed exactly once when the count
//!     reaches zero. Each handle holds a linear `Claim` on the count, so
//!     every acquire is paired with exactly one release.
//!   - `List<T>`: growable sequence, first 8 items stored inline.
//!   - `ProbeTable<P>`: linear-probing slot table without deletion
//!     markers. It repairs probe chains on removal and includes a
//!     debug-only reentrancy guard.
//!   - `Mapping<K, V>`: entries in an append-ordered backing `List`, with a
//!     `ProbeTable<usize>` index into it. `FlatMapping<K, V>` stores the
//!     entries in the slots instead.
//!   - `Str`: immutable UTF-8 view into a shared buffer. Concatenation
//!     appends in place when the view ends at the buffer's tail.
//!   - `Runtime`: process-scoped exit hooks and the fail-fast boundary.
//!
//! Constraints
//! - Single-threaded: `Shared` and everything holding it is `!Send`/`!Sync`.
//! - Contract violations surface as `RuntimeError` before any mutation.
//!   `Runtime::fail` turns one into a diagnostic and exit status 1.
//! - Allocation failure aborts.
//!
//! Reentrancy policy
//! - The probe table only calls user code (`PartialEq` on keys) while
//!   probing. Growth and chain repair move entries by their stored hash.
//! - Removed keys and values are dropped after the mapping is consistent
//!   again, so their `Drop` may reenter the mapping.
//!
//! Hash invariants
//! - Each entry stores its `EntryHash` (nonzero; a 0 hash is remapped to
//!   `ZERO_HASH_SENTINEL`). `KeyHash` is never invoked after insertion.
//!
//! Notes and non-goals
//! - No thread safety, no cycle collection, no bignums.
//! - Mapping iteration follows the backing list today, but callers must
//!   not rely on an order.

pub mod error;
pub mod flat_mapping;
pub mod hash;
pub mod list;
pub mod mapping;
mod mapping_proptest;
pub mod numbers;
pub mod probe_table;
pub mod process;
mod reentrancy;
pub mod shared;
pub mod string;
pub mod utf8;

// Public surface
pub use error::{Result, RuntimeError};
pub use flat_mapping::FlatMapping;
pub use hash::{EntryHash, KeyHash};
pub use list::List;
pub use mapping::{Mapping, MappingItem};
pub use numbers::{float_mod, float_to_str, int_mod, int_to_str};
pub use process::{ExitHookKey, ExitRegistry, Runtime};
pub use shared::{acquire, release, Shared};
pub use string::Str;
