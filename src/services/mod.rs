pub mod auth_service;
pub use auth_service::{AuthError, AuthService};

pub mod auth_service_impl;
pub use auth_service_impl::SeaOrmAuthService;

pub mod ledger_service;
pub use ledger_service::{LedgerError, LedgerService};

pub mod ledger_service_impl;
pub use ledger_service_impl::SeaOrmLedgerService;

pub mod proxy_detection;
pub use proxy_detection::{FlagPolicy, flag_suspicious};
