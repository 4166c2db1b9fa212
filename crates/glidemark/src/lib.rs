pub mod config;
pub mod coordinator;
pub mod error;
pub mod page;
pub mod resolve;
pub mod scroll;

pub use config::{GlideConfig, GlideOptions, OffsetSpec, OffsetUnit};
pub use coordinator::{HistoryEntry, ScrollCoordinator, ScrollRequest};
pub use error::{Error, Result};
pub use page::{History, MemoryHistory, MemoryPage, Viewport};
pub use resolve::{JumpTarget, resolve_hash, target_offset};
pub use scroll::{EasingType, ScrollAnimator};
