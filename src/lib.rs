// src/lib.rs
//! Host primitives for Proxy Auto-Configuration scripts.
//!
//! A PAC script decides how a request is routed by calling a fixed set of
//! Netscape-era helper functions (`isInNet`, `shExpMatch`, `dateRange`, ...).
//! This crate implements those helpers with their historical semantics,
//! quirks included, and can bind them into a `boa_engine` context to run
//! `FindProxyForURL`.
//!
//! The primitives read the clock, DNS, the environment and the interface
//! table only through a [`PacContext`], so every decision can be reproduced
//! with fixed inputs.
//!
//! # Examples
//!
//! ```no_run
//! use pac_utils::{PacContext, PacFunctions, PacScript};
//!
//! let script = r#"
//!     function FindProxyForURL(url, host) {
//!         if (isPlainHostName(host) || dnsDomainIs(host, ".corp"))
//!             return "DIRECT";
//!         return "PROXY proxy.corp:3128; DIRECT";
//!     }
//! "#;
//! let pac = PacScript::new(script, PacFunctions::new(PacContext::system()));
//! let answer = pac.find_proxy("https://www.example.com/")?;
//! assert_eq!(answer, "PROXY proxy.corp:3128; DIRECT");
//! # Ok::<(), pac_utils::PacError>(())
//! ```
pub mod context;
pub mod error;
pub mod interface;
pub mod pac;

pub use context::{PacContext, MY_IP_ADDRESS_ENV};
pub use error::{PacError, Result};
pub use pac::engine::normalize_pac_result;
pub use pac::{find_proxy_for_url, PacFunctions, PacScript, TemporalArg};
