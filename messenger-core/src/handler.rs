//! Closure adapter: lets a plain function or a closure over fixed parameters act as a [`Handler`].

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{DispatchOutcome, Handler, InboundEvent};

/// Wraps `Fn(&InboundEvent) -> DispatchOutcome`.
///
/// ```
/// use messenger_core::{DispatchOutcome, FnHandler};
///
/// let usd = FnHandler::new(|_event| DispatchOutcome::reply("USD/RUB"));
/// let eur = FnHandler::new(|_event| DispatchOutcome::reply("EUR/RUB"));
/// # let _ = (usd, eur);
/// ```
pub struct FnHandler<F> {
    f: F,
}

impl<F> FnHandler<F>
where
    F: Fn(&InboundEvent) -> DispatchOutcome + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait]
impl<F> Handler for FnHandler<F>
where
    F: Fn(&InboundEvent) -> DispatchOutcome + Send + Sync,
{
    async fn handle(&self, event: &InboundEvent) -> Result<DispatchOutcome> {
        Ok((self.f)(event))
    }
}
