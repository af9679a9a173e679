//! # punto-client: REST Client for the Punto Back Office
//!
//! Typed access to the back-office REST service: configuration, login,
//! per-entity repositories and cart checkout.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          punto-client                                   │
//! │                                                                         │
//! │   ClientConfig ──► Backend ──► login(email, password) ──► Session       │
//! │                       │                                      │          │
//! │                       │  products(&session), taxes(&session), ...       │
//! │                       ▼                                      │          │
//! │              RestRepository<R> ◄─────────────────────────────┘          │
//! │                       │                                                 │
//! │                       ▼                                                 │
//! │              HttpTransport ──► reqwest ──► REST service                 │
//! │                                                                         │
//! │   CheckoutService<S, D>: Cart + Catalog ──► Sale + SaleDetail × n      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`config`] - `[api]` and `[display]` settings from TOML and env
//! - [`session`] - Bearer token and decoded claims
//! - [`transport`] - HTTP verbs, status mapping, GET retry
//! - [`auth`] - `POST /auth/login`
//! - [`repository`] - `Repository<R>` per entity, inventory endpoints
//! - [`checkout`] - Cart submission
//! - [`backend`] - Entry point tying the above together
//! - [`error`] - `ClientError`

pub mod auth;
pub mod backend;
pub mod checkout;
pub mod config;
pub mod error;
pub mod repository;
pub mod session;
pub mod transport;

pub use backend::Backend;
pub use checkout::{CheckoutService, Receipt};
pub use config::{ApiSettings, ClientConfig, DisplaySettings};
pub use error::{ClientError, ClientResult};
pub use repository::{InventoryRepository, Repository, Resource, RestRepository};
pub use session::{Claims, Session};
pub use transport::{HttpTransport, RetryPolicy};
