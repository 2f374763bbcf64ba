/// Scope classification module
///
/// OAuth scope strings of the form `family` or `family:child` are parsed
/// once at the boundary into [`Scope`] values, collected into a [`ScopeSet`],
/// and queried for family membership and bulk/manage grants. The
/// [`ScopeCompatibility`] table rejects scope combinations declared mutually
/// exclusive.
///
/// # Examples
///
/// ```
/// use xivauth_authz::scope::{Scope, ScopeSet};
/// use std::str::FromStr;
///
/// let scopes = ScopeSet::from_str("character:jwt character:manage").unwrap();
///
/// assert!(scopes.has(&Scope::from_str("character:jwt").unwrap()));
/// assert!(scopes.has_bulk("character"));
/// ```

mod compat;
mod set;
mod types;


pub use compat::{ScopeCompatibility, ScopeConflict};
pub use set::ScopeSet;
pub use types::{Scope, ScopeError, ScopeResult, ALL_CHILD, MANAGE_CHILD};
