//! State collection
//!
//! - `desired` - records derived from NetBox inventory
//! - `actual` - tagged records currently in PowerDNS

pub mod actual;
pub mod desired;
