pub mod breakdown;

pub use breakdown::{BreakdownResponse, SubTask, TaskInput};
