//! Payment processor integration for Botique.
//!
//! Two direct passthroughs, no independent logic: creating a hosted checkout
//! session, and verifying + decoding the processor's webhook events that
//! drive the subscription write path.

pub mod signature;
pub mod stripe;

pub use signature::{verify_webhook_signature, SignatureError};
pub use stripe::{CheckoutClient, WebhookEvent};
