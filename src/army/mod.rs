//! Army supervision state machine
//!
//! One supervisor per army group. The active state decides unit intents
//! every frame and may hand control to another state; states share an
//! [`ArmyContext`] instead of referencing each other. Safety pre-empts
//! tactics: a stuck or detected army aborts to the terminal state no
//! matter what it was doing.

pub mod approach;
pub mod context;
pub mod defend;
pub mod engage;
pub mod hunt;
pub mod intent;
pub mod states;
pub mod stuck;
pub mod supervisor;
pub mod terminal;

pub use context::{ArmyContext, DetectionView, NoDetection, TacticalInputs};
pub use intent::UnitIntent;
pub use states::TacticState;
pub use stuck::StuckDetector;
pub use supervisor::ArmySupervisor;
