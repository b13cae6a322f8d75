/// Business operations
///
/// - [`tasks`]: task CRUD with ownership checks and cache coherence
/// - [`accounts`]: registration, login and profile management
///
/// Services receive their store and cache handles at construction and hold
/// no other state, so they are cheap to clone into request handlers.

pub mod accounts;
pub mod tasks;
