//! Domain entities for the printing patch.
//!
//! Pure data: the compiled-in replacement table and the install layout of
//! the Qlik Sense Printing component. Nothing in here touches the disk.

/// Where the printing component lives and what gets patched.
pub mod install;

/// The binding-redirect replacement table.
///
/// See [`rules::BINDING_REDIRECT_RULES`] for the table itself.
pub mod rules;
