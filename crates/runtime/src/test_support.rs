#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use async_trait::async_trait;
use waypoint_core::{AutomationHandle, ProviderError, ScrollDirection};

pub(crate) struct NoopHandle;

#[async_trait]
impl AutomationHandle for NoopHandle {
    async fn navigate(&self, _url: &str) -> Result<(), ProviderError> {
        Ok(())
    }
    async fn click(&self, _index: u32) -> Result<(), ProviderError> {
        Ok(())
    }
    async fn input_text(&self, _index: u32, _text: &str) -> Result<(), ProviderError> {
        Ok(())
    }
    async fn select_option(&self, _index: u32, _text: &str) -> Result<(), ProviderError> {
        Ok(())
    }
    async fn scroll(&self, _d: ScrollDirection, _i: Option<u32>) -> Result<(), ProviderError> {
        Ok(())
    }
    async fn key_press(&self, _key: &str) -> Result<(), ProviderError> {
        Ok(())
    }
    async fn go_back(&self) -> Result<(), ProviderError> {
        Ok(())
    }
    async fn go_forward(&self) -> Result<(), ProviderError> {
        Ok(())
    }
    async fn refresh(&self) -> Result<(), ProviderError> {
        Ok(())
    }
}
