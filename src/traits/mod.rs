pub mod keys;
pub mod runtime;
pub mod state;

pub use keys::KeyExt;
pub use runtime::PlatformExt;
pub use state::InputStateExt;
