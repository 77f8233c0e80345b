//! Browser-side behavior of the generated site.
//!
//! Each component is an explicit instance built from injected collaborators
//! ([`Storage`](storage::Storage), an index source, a preference service, a
//! theme target, a link opener) so the logic runs the same against fakes in
//! tests and real backends from the CLI. `static/site.js` is the thin
//! in-browser wiring of the same rules.

pub mod download;
pub mod search;
pub mod storage;
pub mod theme;

pub use download::{DownloadResolver, LinkOpener, PlatformIndexService};
pub use search::{SearchClient, SearchState};
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use theme::{Theme, ThemeManager};
