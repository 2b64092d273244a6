//! Intent domain module
//!
//! Pure building blocks of the tiered resolver. The orchestration (which tier
//! runs when, model escalation) lives in the application layer's
//! `ResolveIntentUseCase`; everything here is synchronous and I/O free.
//!
//! | Tier | Module | Cost |
//! |------|--------|------|
//! | 1. deterministic patterns | [`rules`] | regex only |
//! | 2. fuzzy entity match | [`fuzzy`] + [`similarity`] | string similarity |
//! | 3. model generation | [`payload`] + [`url_restore`] (post-processing) | model call(s) |

pub mod entities;
pub mod fuzzy;
pub mod payload;
pub mod rules;
pub mod similarity;
pub mod url_restore;

pub use entities::{DEFAULT_CONFIDENCE, EntityRegistry, Intent, IntentType};
pub use payload::{DecodedIntents, decode_intents};
pub use rules::match_rules;
pub use url_restore::restore_url_case;
