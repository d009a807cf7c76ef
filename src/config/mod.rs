mod settings;

pub use settings::{
    ApiConfig, Config, LayoutConfig, ReconcilePolicy, ScrollConfig, SyncConfig, API_URL_ENV,
    EXAMPLE_CONFIG,
};
