//! `shopkit_web`:
//! Shared service plumbing for the shop platform.
//!
//! Modules:
//! - `config`     : environment configuration
//! - `logging`    : tracing subscriber setup
//! - `auth`       : bearer token validation and extractor
//! - `problem`    : problem-details body
//! - `middleware` : exception rewrite, panic handling, gateway guard
//! - `response`   : typed envelope and workbook download
//! - `service`    : generic CRUD contract
//! - `error`      : handler error type
//! - `shared`     : service container and middleware wiring
pub mod auth;
pub mod config;
pub mod error;
pub mod logging;
pub mod middleware;
pub mod problem;
pub mod response;
pub mod service;
pub mod shared;

pub use auth::{AuthError, AuthenticatedUser, Claims, JwtAuthenticator};
pub use config::{ConfigError, GatewayConfig, JwtSettings, LoggingConfig, SharedConfig};
pub use error::AppError;
pub use logging::init_logging;
pub use problem::ProblemDetails;
pub use response::{BaseResponse, XlsxDownload};
pub use service::{GenericService, ServiceError};
pub use shared::{SharedServices, apply_shared_middlewares};
