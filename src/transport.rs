//! Addressing and dispatch of commands to a bridge.
//!
//! [`Light`](crate::Light) never talks to the network itself. It hands every
//! command to a [`Transport`], which is expected to return immediately:
//!
//! - [`SpawnTransport`] sends each command through an [`HttpClient`] on a
//!   detached task of the active runtime.
//! - [`ChannelTransport`] queues each command on a channel so the caller
//!   decides when and how to deliver it.

use std::fmt;
use std::sync::Arc;

use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::Error;
use crate::runtime::{self, BoxFuture};

type Result<T> = std::result::Result<T, Error>;

/// The bridge and user a light is reached through.
///
/// # Example
///
/// ```
/// use hue_lights_rs::ConnectionContext;
///
/// let ctx: ConnectionContext =
///     serde_json::from_str(r#"{"bridge": "192.168.1.2", "user": "abc"}"#).unwrap();
/// assert_eq!(ctx.bridge(), "192.168.1.2");
/// ```
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ConnectionContext {
    bridge: String,
    user: String,
}

impl ConnectionContext {
    pub fn new(bridge: &str, user: &str) -> Self {
        ConnectionContext {
            bridge: bridge.to_string(),
            user: user.to_string(),
        }
    }

    pub fn bridge(&self) -> &str {
        &self.bridge
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    /// Root of the authenticated API, e.g. `http://10.0.0.2/api/<user>`.
    pub fn api_url(&self) -> String {
        format!("http://{}/api/{}", self.bridge, self.user)
    }
}

/// The endpoint of a light a command is sent to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    /// `/lights/<index>/state`, for state changes.
    LightState(String),
    /// `/lights/<index>`, for attributes such as the name.
    LightAttributes(String),
}

/// A fully addressed command destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTarget {
    context: ConnectionContext,
    resource: Resource,
}

impl CommandTarget {
    pub fn new(context: ConnectionContext, resource: Resource) -> Self {
        CommandTarget { context, resource }
    }

    pub fn context(&self) -> &ConnectionContext {
        &self.context
    }

    pub fn resource(&self) -> &Resource {
        &self.resource
    }

    /// Path on the bridge, without scheme and host.
    ///
    /// # Examples
    ///
    /// ```
    /// use hue_lights_rs::{CommandTarget, ConnectionContext, Resource};
    ///
    /// let ctx = ConnectionContext::new("10.0.0.2", "abc");
    /// let target = CommandTarget::new(ctx.clone(), Resource::LightState("3".into()));
    /// assert_eq!(target.path(), "/api/abc/lights/3/state");
    ///
    /// let target = CommandTarget::new(ctx, Resource::LightAttributes("3".into()));
    /// assert_eq!(target.url(), "http://10.0.0.2/api/abc/lights/3");
    /// ```
    pub fn path(&self) -> String {
        match &self.resource {
            Resource::LightState(index) => {
                format!("/api/{}/lights/{}/state", self.context.user, index)
            }
            Resource::LightAttributes(index) => {
                format!("/api/{}/lights/{}", self.context.user, index)
            }
        }
    }

    pub fn url(&self) -> String {
        format!("http://{}{}", self.context.bridge, self.path())
    }
}

impl fmt::Display for CommandTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PUT {}", self.url())
    }
}

/// Fire-and-forget command dispatch.
///
/// Implementations must not block: the caller neither waits for nor inspects
/// the outcome of a command.
pub trait Transport: Send + Sync {
    fn issue(&self, target: &CommandTarget, body: Value);
}

/// HTTP methods used against the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Put,
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Method::Get => "GET",
            Method::Put => "PUT",
            Method::Post => "POST",
        };
        f.write_str(name)
    }
}

/// A JSON-over-HTTP client.
///
/// This is the seam to whatever HTTP stack the application already uses. The
/// returned future must not borrow the client.
pub trait HttpClient: Send + Sync + 'static {
    fn request(
        &self,
        method: Method,
        url: String,
        body: Option<Value>,
    ) -> BoxFuture<'static, Result<Value>>;
}

impl<C: HttpClient + ?Sized> HttpClient for Arc<C> {
    fn request(
        &self,
        method: Method,
        url: String,
        body: Option<Value>,
    ) -> BoxFuture<'static, Result<Value>> {
        (**self).request(method, url, body)
    }
}

/// Sends every command as a `PUT` on a detached task.
///
/// Commands issued in quick succession run concurrently, so the bridge may
/// see them in any order.
pub struct SpawnTransport<C> {
    client: C,
}

impl<C: HttpClient> SpawnTransport<C> {
    pub fn new(client: C) -> Self {
        SpawnTransport { client }
    }
}

impl<C: HttpClient> Transport for SpawnTransport<C> {
    fn issue(&self, target: &CommandTarget, body: Value) {
        let url = target.url();
        let request = self.client.request(Method::Put, url.clone(), Some(body));
        runtime::spawn_detached(async move {
            if let Err(e) = request.await {
                warn!("command to {} failed: {}", url, e);
            }
        });
    }
}

/// A command captured by [`ChannelTransport`].
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub target: CommandTarget,
    pub body: Value,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.target, self.body)
    }
}

/// Queues commands on an unbounded channel, in issue order.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use futures::StreamExt;
/// use hue_lights_rs::{ChannelTransport, ConnectionContext, Light, LightIdentity, LightState};
///
/// let (transport, commands) = ChannelTransport::new();
/// let mut light = Light::new(
///     LightIdentity::new("1", "Desk"),
///     LightState::new(false),
///     ConnectionContext::new("10.0.0.2", "abc"),
///     Arc::new(transport),
/// );
/// light.turn_on().unwrap();
/// drop(light);
///
/// let sent: Vec<_> = futures::executor::block_on(commands.collect());
/// assert_eq!(sent[0].body, serde_json::json!({"on": true}));
/// ```
pub struct ChannelTransport {
    sender: UnboundedSender<Command>,
}

impl ChannelTransport {
    pub fn new() -> (Self, UnboundedReceiver<Command>) {
        let (sender, receiver) = mpsc::unbounded();
        (ChannelTransport { sender }, receiver)
    }
}

impl Transport for ChannelTransport {
    fn issue(&self, target: &CommandTarget, body: Value) {
        let command = Command {
            target: target.clone(),
            body,
        };
        if let Err(e) = self.sender.unbounded_send(command) {
            warn!("dropping command, receiver is gone: {}", e.into_inner());
        } else {
            debug!("queued command for {}", target.url());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use serde_json::json;
    use std::sync::Mutex;

    fn target(index: &str) -> CommandTarget {
        CommandTarget::new(
            ConnectionContext::new("10.0.0.2", "user"),
            Resource::LightState(index.into()),
        )
    }

    #[test]
    fn test_channel_preserves_order() {
        let (transport, receiver) = ChannelTransport::new();
        transport.issue(&target("1"), json!({"on": true}));
        transport.issue(&target("1"), json!({"bri": 10}));
        drop(transport);

        let sent: Vec<Command> = futures::executor::block_on(receiver.collect());
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].body, json!({"on": true}));
        assert_eq!(sent[1].body, json!({"bri": 10}));
        assert_eq!(
            sent[1].to_string(),
            r#"PUT http://10.0.0.2/api/user/lights/1/state {"bri":10}"#
        );
    }

    #[test]
    fn test_channel_without_receiver_does_not_panic() {
        let (transport, receiver) = ChannelTransport::new();
        drop(receiver);
        transport.issue(&target("1"), json!({"on": false}));
    }

    #[derive(Default)]
    struct FailingClient {
        requests: Mutex<Vec<(Method, String, Option<Value>)>>,
    }

    impl HttpClient for FailingClient {
        fn request(
            &self,
            method: Method,
            url: String,
            body: Option<Value>,
        ) -> BoxFuture<'static, Result<Value>> {
            self.requests
                .lock()
                .unwrap()
                .push((method, url.clone(), body));
            Box::pin(async move { Err::<Value, _>(Error::http(&url, "connection refused")) })
        }
    }

    #[tokio::test]
    async fn test_spawn_transport_does_not_wait_for_outcome() {
        let client = Arc::new(FailingClient::default());
        let transport = SpawnTransport::new(client.clone());

        transport.issue(&target("7"), json!({"alert": "select"}));

        let requests = client.requests.lock().unwrap().clone();
        assert_eq!(
            requests,
            vec![(
                Method::Put,
                "http://10.0.0.2/api/user/lights/7/state".to_string(),
                Some(json!({"alert": "select"}))
            )]
        );
    }

    #[cfg(feature = "runtime-tokio")]
    #[test]
    fn test_spawn_transport_outside_runtime_does_not_panic() {
        let client = Arc::new(FailingClient::default());
        let transport: Arc<dyn Transport> = Arc::new(SpawnTransport::new(client.clone()));
        let mut light = crate::Light::new(
            crate::LightIdentity::new("7", "Desk"),
            crate::LightState::new(false),
            ConnectionContext::new("10.0.0.2", "user"),
            transport,
        );

        light.turn_on().unwrap();

        assert!(light.is_on());
        assert_eq!(client.requests.lock().unwrap().len(), 1);
    }
}
