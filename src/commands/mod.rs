// Reconcile and apply
pub mod sync;

// Read-only commands
pub mod diff;
pub mod validate;
