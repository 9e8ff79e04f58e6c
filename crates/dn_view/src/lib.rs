pub mod config;
pub mod controller;
pub mod format;
pub mod index;
pub mod pagination;
pub mod poller;
pub mod state;

pub use config::ViewConfig;
pub use controller::{BulkOutcome, CheckOutcome, LoadOutcome, ViewController};
pub use format::format_date;
pub use index::SummaryIndex;
pub use pagination::{page_window, PageItem, Pagination};
pub use poller::spawn_stats_poller;
pub use state::{
    ActionControl, ActionKind, BannerKind, ClickTarget, RowView, StatsView, StatusBanner,
    SummaryOverlay, ViewState,
};

pub mod prelude {
    pub use super::{ClickTarget, LoadOutcome, ViewConfig, ViewController, ViewState};
    pub use dn_core::{Error, Result};
}
