pub mod snapshot;
pub mod target;

pub use snapshot::ContentSnapshot;
pub use target::WatchTarget;
