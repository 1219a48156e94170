pub mod generator;
pub mod scheduler;
pub mod slots;

pub use generator::SlotGeneratorService;
pub use scheduler::SlotGeneratorJob;
pub use slots::SlotQueryService;
