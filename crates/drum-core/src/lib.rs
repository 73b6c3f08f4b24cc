pub mod chart;
pub mod constants;
pub mod error;
pub mod feedback;
pub mod input;
pub mod judge;
pub mod lane;
pub mod link;
pub mod note;
pub mod report;
pub mod scheduler;
pub mod score;
pub mod session;

pub use chart::*;
pub use constants::*;
pub use error::*;
pub use feedback::*;
pub use input::*;
pub use judge::*;
pub use lane::*;
pub use link::*;
pub use note::*;
pub use report::*;
pub use scheduler::*;
pub use score::*;
pub use session::*;
