pub mod adapter;
pub mod catalog;
pub mod deep_link;
pub mod layout;
mod options;
pub mod policy;
pub mod resolver;
pub mod template;
mod types;
pub mod widget;
pub mod window;

pub use adapter::{
    FlipEventAdapter, HistorySink, NavigationTrigger, NoHistory, RecordingHistory, Reconciliation,
};
pub use catalog::{CatalogConfig, ExistenceCheck, PageCatalog, discover};
pub use deep_link::{format_hash, parse_hash, split_location};
pub use layout::{PageDimensions, aspect_ratio, fit_page, fit_spread};
pub use options::*;
pub use policy::{ResidentSet, WindowPolicy, WindowStrategy};
pub use resolver::{AnyResolver, AssetResolver, FsResolver, HeadCheck};
#[cfg(feature = "http")]
pub use resolver::HttpResolver;
pub use template::PageTemplate;
pub use types::*;
pub use widget::{FlipWidget, WidgetCapabilities, Zoom};
pub use window::{PageWindow, SlotChange, SlotStore};
