//! Built-in agents: trivial in-process players and the subprocess transport

mod first_legal;
mod human;
mod random;
mod subprocess;

pub use first_legal::FirstLegalAgent;
pub use human::HumanAgent;
pub use random::RandomAgent;
pub use subprocess::SubprocessAgent;
