pub mod diagnostics;
pub mod draft;
pub mod error;
pub mod events;
pub mod health;
pub mod lock;
pub mod presence;
pub mod ready;
pub mod room;

pub use diagnostics::*;
pub use draft::*;
pub use error::*;
pub use events::*;
pub use health::*;
pub use lock::*;
pub use presence::*;
pub use ready::*;
pub use room::*;
