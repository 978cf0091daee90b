//! Bridge selection and light enumeration.

use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::sync::Arc;

use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::errors::Error;
use crate::light::{Light, LightIdentity};
use crate::status::LightState;
use crate::transport::{ConnectionContext, HttpClient, Method, SpawnTransport, Transport};

type Result<T> = std::result::Result<T, Error>;

/// Where bridges on the local network register themselves.
pub const DISCOVERY_URL: &str = "https://discovery.meethue.com/";

/// Bridge error type returned when the link button was not pressed.
const LINK_BUTTON_NOT_PRESSED: u64 = 101;

/// A bridge found through the discovery service.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct DiscoveredBridge {
    pub id: String,
    #[serde(rename = "internalipaddress")]
    pub internal_ip_address: String,
    #[serde(default)]
    pub port: Option<u16>,
}

/// How [`Bridge::get_lights_by_name`] matches light names.
#[derive(Debug, Clone)]
pub enum NameQuery {
    /// The name must be equal.
    Exact(String),
    /// The regular expression must match somewhere in the name.
    Pattern(Regex),
}

impl NameQuery {
    pub fn matches(&self, name: &str) -> bool {
        match self {
            NameQuery::Exact(expected) => expected == name,
            NameQuery::Pattern(re) => re.is_match(name),
        }
    }
}

impl From<&str> for NameQuery {
    fn from(name: &str) -> Self {
        NameQuery::Exact(name.to_string())
    }
}

impl From<String> for NameQuery {
    fn from(name: String) -> Self {
        NameQuery::Exact(name)
    }
}

impl From<Regex> for NameQuery {
    fn from(re: Regex) -> Self {
        NameQuery::Pattern(re)
    }
}

#[derive(Debug, Deserialize)]
struct LightResource {
    name: String,
    state: LightState,
}

#[derive(Debug, Deserialize)]
struct GroupResource {
    name: String,
    #[serde(default)]
    lights: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct BridgeError {
    #[serde(rename = "type")]
    kind: u64,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum BridgeReply {
    Success(Value),
    Error(BridgeError),
}

/// Entry point to a Hue bridge.
///
/// Select a bridge and a user, then enumerate the lights behind it. Every
/// [`Light`] built here issues its commands through a [`SpawnTransport`] over
/// the same client.
///
/// # Example
///
/// ```ignore
/// let mut bridge = Bridge::new(client);
/// bridge.set_bridge("192.168.1.2")?.set_user("username");
///
/// for mut light in bridge.get_lights_by_name(Regex::new("Kitchen.")?).await? {
///     light.turn_on()?.set_color_rgb(100, 123, 255)?.set_brightness(100)?;
/// }
/// ```
pub struct Bridge<C> {
    client: Arc<C>,
    transport: Arc<dyn Transport>,
    address: Option<String>,
    user: Option<String>,
}

impl<C: HttpClient> Bridge<C> {
    pub fn new(client: C) -> Self {
        let client = Arc::new(client);
        Bridge {
            transport: Arc::new(SpawnTransport::new(client.clone())),
            client,
            address: None,
            user: None,
        }
    }

    /// Use `transport` instead of a [`SpawnTransport`] for the lights built
    /// by this bridge.
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = transport;
        self
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    /// Select the bridge to talk to by its IPv4 address.
    pub fn set_bridge(&mut self, address: &str) -> Result<&mut Self> {
        if address.parse::<Ipv4Addr>().is_err() {
            return Err(Error::InvalidAddress(address.to_string()));
        }
        self.address = Some(address.to_string());
        Ok(self)
    }

    /// Select the API username to authenticate with.
    pub fn set_user(&mut self, user: &str) -> &mut Self {
        self.user = Some(user.to_string());
        self
    }

    /// The selected bridge and user.
    ///
    /// Fails with [`Error::NotConfigured`] unless both are set.
    pub fn context(&self) -> Result<ConnectionContext> {
        match (&self.address, &self.user) {
            (Some(address), Some(user)) => Ok(ConnectionContext::new(address, user)),
            _ => Err(Error::NotConfigured),
        }
    }

    /// List the bridges registered with the discovery service.
    pub async fn find_bridges(&self) -> Result<Vec<DiscoveredBridge>> {
        let resp = self.request(Method::Get, DISCOVERY_URL, None).await?;
        serde_json::from_value(resp).map_err(Error::JsonLoad)
    }

    /// Register a new user on the selected bridge and return its username.
    ///
    /// The bridge's link button must have been pressed shortly before.
    pub async fn create_user(&self, device_type: &str) -> Result<String> {
        let Some(address) = &self.address else {
            return Err(Error::NoBridge);
        };
        if device_type.is_empty() {
            return Err(Error::EmptyDeviceType);
        }

        let url = format!("http://{address}/api");
        let resp = self
            .request(Method::Post, &url, Some(json!({ "devicetype": device_type })))
            .await?;

        let mut replies: Vec<BridgeReply> =
            serde_json::from_value(resp).map_err(Error::JsonLoad)?;
        if replies.is_empty() {
            return Err(Error::UnexpectedResponse("empty reply".into()));
        }

        match replies.swap_remove(0) {
            BridgeReply::Error(err) if err.kind == LINK_BUTTON_NOT_PRESSED => {
                Err(Error::LinkButtonNotPressed)
            }
            BridgeReply::Error(err) => Err(Error::Bridge {
                kind: err.kind,
                description: err.description,
            }),
            BridgeReply::Success(success) => success
                .get("username")
                .and_then(|u| u.as_str())
                .map(String::from)
                .ok_or_else(|| Error::UnexpectedResponse(success.to_string())),
        }
    }

    /// All lights as returned by the bridge, without any processing.
    ///
    /// Useful to inspect properties [`Light`] does not expose.
    pub async fn get_all_lights_raw(&self) -> Result<Value> {
        let ctx = self.context()?;
        self.request(Method::Get, &format!("{}/lights", ctx.api_url()), None)
            .await
    }

    /// All lights, ordered by index.
    pub async fn get_all_lights(&self) -> Result<Vec<Light>> {
        let ctx = self.context()?;
        let raw = self.get_all_lights_raw().await?;
        let resources: HashMap<String, LightResource> =
            serde_json::from_value(raw).map_err(Error::JsonLoad)?;

        let mut entries: Vec<_> = resources.into_iter().collect();
        entries.sort_by(|(a, _), (b, _)| index_order(a, b));

        Ok(entries
            .into_iter()
            .map(|(index, resource)| {
                Light::new(
                    LightIdentity::new(&index, &resource.name),
                    resource.state,
                    ctx.clone(),
                    self.transport.clone(),
                )
            })
            .collect())
    }

    /// Lights whose name matches `query`, either exactly or by regex.
    pub async fn get_lights_by_name(&self, query: impl Into<NameQuery>) -> Result<Vec<Light>> {
        let query = query.into();
        let lights = self.get_all_lights().await?;
        Ok(lights
            .into_iter()
            .filter(|light| query.matches(light.name()))
            .collect())
    }

    /// Lights belonging to the first group named `group_name`.
    ///
    /// Returns an empty list when no group has that name.
    pub async fn get_lights_by_group_name(&self, group_name: &str) -> Result<Vec<Light>> {
        let ctx = self.context()?;
        let raw = self
            .request(Method::Get, &format!("{}/groups", ctx.api_url()), None)
            .await?;
        let groups: HashMap<String, GroupResource> =
            serde_json::from_value(raw).map_err(Error::JsonLoad)?;

        let mut groups: Vec<_> = groups.into_iter().collect();
        groups.sort_by(|(a, _), (b, _)| index_order(a, b));

        let Some((_, group)) = groups.into_iter().find(|(_, g)| g.name == group_name) else {
            debug!("no group named {group_name:?}");
            return Ok(Vec::new());
        };

        let lights = self.get_all_lights().await?;
        Ok(lights
            .into_iter()
            .filter(|light| group.lights.iter().any(|index| index == light.index()))
            .collect())
    }

    async fn request(&self, method: Method, url: &str, body: Option<Value>) -> Result<Value> {
        debug!("{method} {url}");
        self.client.request(method, url.to_string(), body).await
    }
}

/// Numeric indices in numeric order, anything else after them.
fn index_order(a: &str, b: &str) -> std::cmp::Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(a), Ok(b)) => a.cmp(&b),
        (Ok(_), Err(_)) => std::cmp::Ordering::Less,
        (Err(_), Ok(_)) => std::cmp::Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::BoxFuture;
    use crate::transport::ChannelTransport;
    use futures::StreamExt;
    use std::sync::Mutex;

    #[derive(Default)]
    struct CannedClient {
        replies: HashMap<String, Value>,
        requests: Mutex<Vec<(Method, String, Option<Value>)>>,
    }

    impl CannedClient {
        fn reply(mut self, url: &str, body: Value) -> Self {
            self.replies.insert(url.to_string(), body);
            self
        }
    }

    impl HttpClient for CannedClient {
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
            let reply = self
                .replies
                .get(&url)
                .cloned()
                .ok_or_else(|| Error::http(&url, "not found"));
            Box::pin(async move { reply })
        }
    }

    const API: &str = "http://192.168.1.2/api/user";

    fn lights_json() -> Value {
        json!({
            "1": {"name": "Kitchen1", "state": {"on": true, "bri": 254, "reachable": true}},
            "2": {"name": "Kitchen2", "state": {"on": false}},
            "10": {"name": "Hallway", "state": {"on": false, "xy": [0.3, 0.3]}},
            "3": {"name": "Kitchen3", "state": {"on": true}}
        })
    }

    fn groups_json() -> Value {
        json!({
            "1": {"name": "Kitchen", "lights": ["1", "3"], "type": "Room"},
            "2": {"name": "Hallway", "lights": ["10"], "type": "Room"}
        })
    }

    fn configured(client: CannedClient) -> Bridge<CannedClient> {
        let mut bridge = Bridge::new(client);
        bridge.set_bridge("192.168.1.2").unwrap().set_user("user");
        bridge
    }

    fn names(lights: &[Light]) -> Vec<&str> {
        lights.iter().map(|l| l.name()).collect()
    }

    #[test]
    fn test_set_bridge_validates_address() {
        let mut bridge = Bridge::new(CannedClient::default());
        assert!(matches!(
            bridge.set_bridge("not an ip"),
            Err(Error::InvalidAddress(_))
        ));
        assert!(matches!(
            bridge.set_bridge("256.1.1.1"),
            Err(Error::InvalidAddress(_))
        ));
        assert!(bridge.address().is_none());

        bridge.set_bridge("10.0.0.2").unwrap();
        assert_eq!(bridge.address(), Some("10.0.0.2"));
    }

    #[test]
    fn test_context_requires_bridge_and_user() {
        let mut bridge = Bridge::new(CannedClient::default());
        assert!(matches!(bridge.context(), Err(Error::NotConfigured)));

        bridge.set_user("user");
        assert!(matches!(bridge.context(), Err(Error::NotConfigured)));

        bridge.set_bridge("10.0.0.2").unwrap();
        assert_eq!(
            bridge.context().unwrap(),
            ConnectionContext::new("10.0.0.2", "user")
        );
    }

    #[tokio::test]
    async fn test_unconfigured_bridge_sends_nothing() {
        let bridge = Bridge::new(CannedClient::default());
        assert!(matches!(
            bridge.get_all_lights().await,
            Err(Error::NotConfigured)
        ));
        assert!(bridge.client.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_all_lights_ordered_by_index() {
        let client = CannedClient::default().reply(&format!("{API}/lights"), lights_json());
        let bridge = configured(client);

        let lights = bridge.get_all_lights().await.unwrap();
        assert_eq!(
            names(&lights),
            vec!["Kitchen1", "Kitchen2", "Kitchen3", "Hallway"]
        );
        assert_eq!(lights[3].index(), "10");
        assert!(lights[0].is_on());
        assert_eq!(lights[0].state().brightness(), Some(254));
        assert!(!lights[1].is_on());
        assert_eq!(lights[0].context().user(), "user");
    }

    #[tokio::test]
    async fn test_get_all_lights_raw() {
        let client = CannedClient::default().reply(&format!("{API}/lights"), lights_json());
        let bridge = configured(client);
        assert_eq!(bridge.get_all_lights_raw().await.unwrap(), lights_json());
    }

    #[tokio::test]
    async fn test_get_lights_by_name() {
        let client = CannedClient::default().reply(&format!("{API}/lights"), lights_json());
        let bridge = configured(client);

        let exact = bridge.get_lights_by_name("Kitchen1").await.unwrap();
        assert_eq!(names(&exact), vec!["Kitchen1"]);

        let pattern = bridge
            .get_lights_by_name(Regex::new("Kitchen.").unwrap())
            .await
            .unwrap();
        assert_eq!(names(&pattern), vec!["Kitchen1", "Kitchen2", "Kitchen3"]);

        let none = bridge.get_lights_by_name("Attic").await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_get_lights_by_group_name() {
        let client = CannedClient::default()
            .reply(&format!("{API}/lights"), lights_json())
            .reply(&format!("{API}/groups"), groups_json());
        let bridge = configured(client);

        let kitchen = bridge.get_lights_by_group_name("Kitchen").await.unwrap();
        assert_eq!(names(&kitchen), vec!["Kitchen1", "Kitchen3"]);

        let missing = bridge.get_lights_by_group_name("Attic").await.unwrap();
        assert!(missing.is_empty());
    }

    #[tokio::test]
    async fn test_enumerated_lights_issue_through_transport() {
        let client = CannedClient::default().reply(&format!("{API}/lights"), lights_json());
        let (transport, commands) = ChannelTransport::new();
        let bridge = configured(client).with_transport(Arc::new(transport));

        let mut lights = bridge.get_lights_by_name("Kitchen2").await.unwrap();
        lights[0].turn_on().unwrap().set_brightness(100).unwrap();
        drop(lights);
        drop(bridge);

        let sent: Vec<_> = commands.collect().await;
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].target.url(), format!("{API}/lights/2/state"));
        assert_eq!(sent[0].body, json!({"on": true}));
        assert_eq!(sent[1].body, json!({"bri": 100}));
    }

    #[tokio::test]
    async fn test_create_user() {
        let client = CannedClient::default().reply(
            "http://192.168.1.2/api",
            json!([{"success": {"username": "83b7780291a6ceffbe0bd049104df"}}]),
        );
        let bridge = configured(client);

        let user = bridge.create_user("my_app#desk").await.unwrap();
        assert_eq!(user, "83b7780291a6ceffbe0bd049104df");

        let requests = bridge.client.requests.lock().unwrap().clone();
        assert_eq!(
            requests,
            vec![(
                Method::Post,
                "http://192.168.1.2/api".to_string(),
                Some(json!({"devicetype": "my_app#desk"}))
            )]
        );
    }

    #[tokio::test]
    async fn test_create_user_link_button() {
        let client = CannedClient::default().reply(
            "http://192.168.1.2/api",
            json!([{"error": {"type": 101, "address": "", "description": "link button not pressed"}}]),
        );
        let bridge = configured(client);
        assert!(matches!(
            bridge.create_user("my_app").await,
            Err(Error::LinkButtonNotPressed)
        ));
    }

    #[tokio::test]
    async fn test_create_user_other_bridge_error() {
        let client = CannedClient::default().reply(
            "http://192.168.1.2/api",
            json!([{"error": {"type": 7, "address": "/devicetype", "description": "invalid value"}}]),
        );
        let bridge = configured(client);
        match bridge.create_user("my_app").await {
            Err(Error::Bridge { kind, description }) => {
                assert_eq!(kind, 7);
                assert_eq!(description, "invalid value");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_user_requires_bridge_and_name() {
        let bridge = Bridge::new(CannedClient::default());
        assert!(matches!(
            bridge.create_user("my_app").await,
            Err(Error::NoBridge)
        ));

        let bridge = configured(CannedClient::default());
        assert!(matches!(
            bridge.create_user("").await,
            Err(Error::EmptyDeviceType)
        ));
        assert!(bridge.client.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_find_bridges() {
        let client = CannedClient::default().reply(
            DISCOVERY_URL,
            json!([{"id": "001788fffe100491", "internalipaddress": "192.168.2.23", "port": 443}]),
        );
        let bridge = Bridge::new(client);

        let found = bridge.find_bridges().await.unwrap();
        assert_eq!(
            found,
            vec![DiscoveredBridge {
                id: "001788fffe100491".into(),
                internal_ip_address: "192.168.2.23".into(),
                port: Some(443),
            }]
        );
    }

    #[tokio::test]
    async fn test_client_errors_propagate() {
        let bridge = configured(CannedClient::default());
        assert!(matches!(
            bridge.get_all_lights().await,
            Err(Error::Http { .. })
        ));
    }

    #[test]
    fn test_index_order() {
        let mut indices = vec!["10", "2", "abc", "1"];
        indices.sort_by(|a, b| index_order(a, b));
        assert_eq!(indices, vec!["1", "2", "10", "abc"]);
    }
}
