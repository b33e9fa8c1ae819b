//! Falling-fragment arena: spawning, descent, piling, drag placement, validation, loss.
//!
//! The arena is single-threaded. [`Arena`] owns every container and both tick
//! sources; all mutation happens synchronously inside a tick, gesture or submit call.
//! Containers hold fragment ids into one store, never record copies.

mod controller;
mod descent;
mod fragment;
mod loss;
mod pile;
mod placement;
mod slots;
mod spawner;
mod validator;

pub use controller::{Arena, ArenaConfig, ArenaSnapshot, Phase, Signal};
pub use fragment::{Fragment, FragmentState, Geometry, Point};
pub use spawner::SourceGroup;
pub use validator::Verdict;
