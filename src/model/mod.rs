//! Plain data carried between the controller and the supervisor.
//!
//! Nothing in here talks to the supervisor or takes a lock. These are the values that
//! cross the boundary: the lifecycle [`ServiceState`], the incoming [`ControlSignal`],
//! the outgoing [`StatusRecord`], the [`ServiceIdentity`] and the installer's
//! [`StartType`].

pub mod identity;
pub mod start_type;
pub mod state;
pub mod status;

pub use identity::*;
pub use start_type::*;
pub use state::*;
pub use status::*;
