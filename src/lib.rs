pub mod analytics;
pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod logger;
pub mod model;
pub mod seo;
pub mod store;
pub mod time;

pub mod prelude {
    pub use derive_new::new;
    pub use serde::{Deserialize, Serialize};
    pub use snafu::{Location, OptionExt as _, ResultExt as _, Snafu};

    pub use crate::logger::Logger;
    pub use crate::time::{now, Day, Timestamp};
}
