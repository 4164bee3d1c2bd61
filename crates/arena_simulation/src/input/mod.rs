//! Player input module
//!
//! # Архитектура
//!
//! ```text
//! Host (keyboard/pointer)
//!     ↓
//! HostInputEvent (ECS event) - events.rs
//!     ↓
//! sample_input (ArenaSet::Input) - sampler.rs
//!     ↓
//! FrameInput (snapshot) + OrbitDrag (per pointer move)
//! ```

pub mod events;
pub mod host;
pub mod keys;
pub mod sampler;

pub use events::*;
pub use host::HostInputPlugin;
pub use keys::{key_identifier, MoveKey};
pub use sampler::*;
