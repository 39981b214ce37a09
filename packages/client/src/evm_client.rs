pub mod signing;

use std::{str::FromStr, sync::Arc, time::Duration};

use alloy_network::EthereumWallet;
use alloy_primitives::Address;
use alloy_provider::{DynProvider, Provider, ProviderBuilder, WsConnect};
use alloy_signer_local::PrivateKeySigner;
use signing::make_signer;
use taiko_bindings::ContractDescriptor;
use url::Url;

use crate::{
    binding::{BindingSettings, ContractBinding},
    contracts::{
        ForcedInclusionStoreClient, ForkRouterClient, PreconfRouterClient, PreconfWhitelistClient,
    },
    credential::Credential,
    error::EvmClientError,
};

/// Log watches over http poll a filter at this interval unless told otherwise
pub const DEFAULT_HTTP_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// An L1 RPC endpoint, only websocket endpoints can subscribe to logs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvmEndpoint {
    WebSocket(Url),
    Http(Url),
}

impl FromStr for EvmEndpoint {
    type Err = EvmClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let url = Url::parse(s).map_err(|e| EvmClientError::ParseEndpoint(format!("{s}: {e}")))?;
        match url.scheme() {
            "ws" | "wss" => Ok(Self::WebSocket(url)),
            "http" | "https" => Ok(Self::Http(url)),
            scheme => Err(EvmClientError::ParseEndpoint(format!(
                "{s}: expected ws, wss, http or https, got {scheme}"
            ))),
        }
    }
}

impl EvmEndpoint {
    pub fn url(&self) -> &Url {
        match self {
            Self::WebSocket(url) | Self::Http(url) => url,
        }
    }

    pub fn is_websocket(&self) -> bool {
        matches!(self, Self::WebSocket(_))
    }

    /// The interval log watches should poll at, `None` to subscribe instead.
    ///
    /// An explicit interval always wins. Http endpoints have no `eth_subscribe` and fall back
    /// to [`DEFAULT_HTTP_POLL_INTERVAL`].
    pub fn log_poll_interval(&self, configured: Option<Duration>) -> Option<Duration> {
        configured.or(match self {
            Self::WebSocket(_) => None,
            Self::Http(_) => Some(DEFAULT_HTTP_POLL_INTERVAL),
        })
    }

    pub async fn to_provider(&self) -> Result<DynProvider, EvmClientError> {
        Ok(match self {
            EvmEndpoint::WebSocket(url) => {
                let ws = WsConnect::new(url.clone());
                DynProvider::new(
                    ProviderBuilder::new()
                        .connect_ws(ws)
                        .await
                        .map_err(|e| EvmClientError::WebSocketProvider(e.into()))?,
                )
            }
            EvmEndpoint::Http(url) => {
                DynProvider::new(ProviderBuilder::new().connect_http(url.clone()))
            }
        })
    }
}

/// Read-only access to a chain, enough for calls and event filters
#[derive(Clone)]
pub struct EvmQueryClient {
    pub endpoint: EvmEndpoint,
    pub provider: DynProvider,
    pub settings: BindingSettings,
}

impl EvmQueryClient {
    pub async fn new(endpoint: EvmEndpoint) -> Result<Self, EvmClientError> {
        Ok(EvmQueryClient {
            provider: endpoint.to_provider().await?,
            endpoint,
            settings: BindingSettings::default(),
        })
    }

    pub fn with_settings(mut self, settings: BindingSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn binding<D: ContractDescriptor>(&self, address: Address) -> ContractBinding<D> {
        ContractBinding::new(address, self.provider.clone()).with_settings(self.settings.clone())
    }

    pub fn preconf_whitelist(&self, address: Address) -> PreconfWhitelistClient {
        PreconfWhitelistClient::from_binding(self.binding(address))
    }

    pub fn preconf_router(&self, address: Address) -> PreconfRouterClient {
        PreconfRouterClient::from_binding(self.binding(address))
    }

    pub fn forced_inclusion_store(&self, address: Address) -> ForcedInclusionStoreClient {
        ForcedInclusionStoreClient::from_binding(self.binding(address))
    }

    pub fn fork_router(&self, address: Address) -> ForkRouterClient {
        ForkRouterClient::from_binding(self.binding(address))
    }
}

impl std::fmt::Debug for EvmQueryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvmQueryClient")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct EvmSigningClientConfig {
    pub endpoint: EvmEndpoint,
    pub credential: Credential,
    pub hd_index: Option<u32>,
    /// Transactions without an explicit gas limit are estimated, then padded by this multiplier.
    /// If unset, it will be 1.25
    pub gas_estimate_multiplier: Option<f32>,
    /// The interval at which to poll the provider for receipts and filters
    /// if unset, will use the default of the provider
    pub poll_interval: Option<Duration>,
}

impl EvmSigningClientConfig {
    pub fn new(endpoint: EvmEndpoint, credential: Credential) -> Self {
        Self {
            endpoint,
            credential,
            hd_index: None,
            gas_estimate_multiplier: None,
            poll_interval: None,
        }
    }

    pub fn with_hd_index(mut self, hd_index: u32) -> Self {
        self.hd_index = Some(hd_index);
        self
    }

    pub fn with_gas_estimate_multiplier(mut self, gas_estimate_multiplier: f32) -> Self {
        self.gas_estimate_multiplier = Some(gas_estimate_multiplier);
        self
    }
}

/// A client whose provider signs and sends transactions with a local key
#[derive(Clone)]
pub struct EvmSigningClient {
    pub config: EvmSigningClientConfig,
    pub provider: DynProvider,
    pub signer: Arc<PrivateKeySigner>,
    pub settings: BindingSettings,
}

impl EvmSigningClient {
    pub async fn new(config: EvmSigningClientConfig) -> Result<Self, EvmClientError> {
        let signer = make_signer(&config.credential, config.hd_index)?;
        let wallet: EthereumWallet = signer.clone().into();

        let builder = ProviderBuilder::new().wallet(wallet);

        let provider = match &config.endpoint {
            EvmEndpoint::WebSocket(url) => {
                let ws = WsConnect::new(url.clone());
                DynProvider::new(
                    builder
                        .connect_ws(ws)
                        .await
                        .map_err(|e| EvmClientError::WebSocketProvider(e.into()))?,
                )
            }
            EvmEndpoint::Http(url) => DynProvider::new(builder.connect_http(url.clone())),
        };

        if let Some(poll_interval) = config.poll_interval {
            provider.client().set_poll_interval(poll_interval);
        }

        let mut settings = BindingSettings::default();
        if let Some(multiplier) = config.gas_estimate_multiplier {
            settings.gas_estimate_multiplier = multiplier;
        }

        Ok(Self {
            config,
            provider,
            signer: Arc::new(signer),
            settings,
        })
    }

    pub fn address(&self) -> Address {
        self.signer.address()
    }

    pub fn binding<D: ContractDescriptor>(&self, address: Address) -> ContractBinding<D> {
        ContractBinding::new(address, self.provider.clone()).with_settings(self.settings.clone())
    }

    pub fn forced_inclusion_store(&self, address: Address) -> ForcedInclusionStoreClient {
        ForcedInclusionStoreClient::from_binding(self.binding(address))
    }
}

impl std::fmt::Debug for EvmSigningClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvmSigningClient")
            .field("endpoint", &self.config.endpoint)
            .field("address", &self.address())
            .finish()
    }
}
