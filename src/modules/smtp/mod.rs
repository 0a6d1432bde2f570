// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

pub mod client;
pub mod executor;
pub mod manager;
pub mod pool;
#[cfg(test)]
mod tests;
pub mod transport;
pub mod util;
