pub mod countdown;
pub mod machine;
pub mod runtime;

pub use machine::MachineSnapshot;
pub use runtime::TimerRuntime;
