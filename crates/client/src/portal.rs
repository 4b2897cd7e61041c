//! Composition root: one store, one REST client, one push socket.

use tokio::task::JoinHandle;

use crate::api::ApiResponse;
use crate::api_client::ApiClient;
use crate::config::PortalConfig;
use crate::context::ActionContext;
use crate::resources::{self, hydrate};
use crate::store::Store;
use crate::ws::{MessageHandler, WsConnection};

pub struct Portal {
    config: PortalConfig,
    ctx: ActionContext,
    handler: MessageHandler,
}

impl Portal {
    /// Build the store with every resource registered, and the message
    /// handler with every resource's subscriber.
    pub fn new(config: PortalConfig) -> Self {
        let store = resources::build_store();
        let api = ApiClient::new()
            .with_base_url(config.base_url.clone())
            .with_token(config.token.clone());
        let ctx = ActionContext::new(store, api).with_notification_ttl(config.notification_ttl);
        let handler = MessageHandler::new(resources::subscribers());
        Self {
            config,
            ctx,
            handler,
        }
    }

    pub fn config(&self) -> &PortalConfig {
        &self.config
    }

    pub fn context(&self) -> &ActionContext {
        &self.ctx
    }

    pub fn store(&self) -> &Store {
        self.ctx.store()
    }

    pub fn handler(&self) -> &MessageHandler {
        &self.handler
    }

    pub fn hydrate(&self) -> Vec<JoinHandle<ApiResponse>> {
        hydrate::hydrate(&self.ctx)
    }

    /// Open the push socket. Must be called from within a tokio runtime.
    pub fn connect(&self) -> WsConnection {
        WsConnection::spawn(
            self.config.ws_url.clone(),
            self.config.token.clone(),
            self.ctx.clone(),
            self.handler.clone(),
            self.config.reconnect.clone(),
        )
    }
}
