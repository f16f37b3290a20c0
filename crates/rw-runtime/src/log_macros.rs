//! Logging macros that tag every event with a `domain` field.
//!
//! Domains: `sys` (lifecycle), `feed` (generation and aggregation ticks),
//! `map` (marker reconciliation), `res` (subscribers and other resources),
//! `conf` (configuration). The domain is a bare identifier, not a string:
//!
//! ```ignore
//! rw_info!(feed, seq = 3, active = 52, "snapshot published");
//! rw_warn!(res, subscriber = name, error = %e, "subscriber failed");
//! ```

#[doc(hidden)]
macro_rules! rw_log {
    ($level:ident, $domain:ident, $($field:tt)*) => {
        tracing::$level!(domain = stringify!($domain), $($field)*)
    };
}

macro_rules! rw_error {
    ($domain:ident, $($rest:tt)*) => {
        rw_log!(error, $domain, $($rest)*)
    };
}

macro_rules! rw_warn {
    ($domain:ident, $($rest:tt)*) => {
        rw_log!(warn, $domain, $($rest)*)
    };
}

macro_rules! rw_info {
    ($domain:ident, $($rest:tt)*) => {
        rw_log!(info, $domain, $($rest)*)
    };
}

macro_rules! rw_debug {
    ($domain:ident, $($rest:tt)*) => {
        rw_log!(debug, $domain, $($rest)*)
    };
}

#[allow(unused_macros)]
macro_rules! rw_trace {
    ($domain:ident, $($rest:tt)*) => {
        rw_log!(trace, $domain, $($rest)*)
    };
}
