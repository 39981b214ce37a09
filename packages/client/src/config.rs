//! Layered configuration: defaults, then a TOML file, then env vars, then command line args.
//!
//! The TOML file may carry global keys plus one section per binary (e.g. `[cli]`), the
//! section overrides the globals. Env vars are prefixed, e.g. `TAIKO_BINDINGS_L1_ENDPOINT`.

use std::{marker::PhantomData, path::PathBuf, str::FromStr, time::Duration};

use alloy_primitives::Address;
use anyhow::{bail, Context, Result};
use figment::{providers::Format, Figment};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::{
    binding::BindingSettings,
    credential::Credential,
    error::EvmClientError,
    events::DEFAULT_CHUNK_SIZE,
    evm_client::{EvmEndpoint, EvmQueryClient, EvmSigningClient, EvmSigningClientConfig},
};

pub const DOTENV_ENV_VAR: &str = "TAIKO_BINDINGS_DOTENV";
pub const HOME_ENV_VAR: &str = "TAIKO_BINDINGS_HOME";

/// The builder we use to build Config
#[derive(Debug)]
pub struct ConfigBuilder<CONFIG, ARG> {
    pub cli_env_args: ARG,
    _config: PhantomData<CONFIG>,
}

pub trait CliEnvExt: Serialize + DeserializeOwned + Default + std::fmt::Debug {
    // e.g. "TAIKO_BINDINGS"
    const ENV_VAR_PREFIX: &'static str;

    // The section identifier in the TOML file, e.g. "cli"
    const TOML_IDENTIFIER: &'static str;

    const PRINT_DEBUG_MSGS: bool = false;

    // if not supplied, config will try a series of fallbacks
    fn home_dir(&self) -> Option<PathBuf>;

    fn dotenv_path(&self) -> Option<PathBuf>;

    fn merge_cli_env_args(&self) -> Result<Self> {
        let env_prefix = format!("{}_", Self::ENV_VAR_PREFIX);

        let merged = Figment::new()
            .merge(figment::providers::Env::prefixed(&env_prefix))
            .merge(figment::providers::Serialized::defaults(self))
            .extract()?;

        Ok(merged)
    }

    fn env_var(name: &str) -> Option<String> {
        std::env::var(format!("{}_{name}", Self::ENV_VAR_PREFIX)).ok()
    }
}

pub trait ConfigExt: Serialize + DeserializeOwned + Default + std::fmt::Debug {
    const FILENAME: &'static str = "taiko-bindings.toml";

    fn log_levels(&self) -> impl Iterator<Item = &str>;

    fn tracing_env_filter(&self) -> Result<tracing_subscriber::EnvFilter> {
        let mut filter = tracing_subscriber::EnvFilter::from_default_env();
        for directive in self.log_levels() {
            match directive.parse() {
                Ok(directive) => filter = filter.add_directive(directive),
                Err(err) => bail!("{}: {}", err, directive),
            }
        }

        Ok(filter)
    }
}

impl<CONFIG: ConfigExt, ARG: CliEnvExt> ConfigBuilder<CONFIG, ARG> {
    pub fn new(cli_env_args: ARG) -> Self {
        Self {
            cli_env_args,
            _config: PhantomData,
        }
    }

    pub fn build(self) -> Result<CONFIG> {
        // dotenv goes first, it may set the env vars that locate the config file
        let mut dotenv_paths = Vec::new();

        if let Some(dotenv_path) = self.cli_env_args.dotenv_path() {
            dotenv_paths.push(dotenv_path);
        }

        if let Ok(dotenv_path) = std::env::var(DOTENV_ENV_VAR) {
            dotenv_paths.push(PathBuf::from(dotenv_path));
        }

        dotenv_paths.push(std::env::current_dir()?.join(".env"));

        for dotenv_path in dotenv_paths {
            if ARG::PRINT_DEBUG_MSGS {
                eprintln!("Loading env vars from {}", dotenv_path.display());
            }
            if dotenv_path.exists() {
                if let Err(e) = dotenvy::from_path(&dotenv_path) {
                    bail!("Error loading dotenv file {}: {}", dotenv_path.display(), e);
                }
            }
        }

        let cli_env_args = self.cli_env_args.merge_cli_env_args()?;

        let mut figment =
            Figment::new().merge(figment::providers::Serialized::defaults(CONFIG::default()));

        // no config file anywhere is fine, defaults and args may be enough
        match ConfigFilePath::new(CONFIG::FILENAME, cli_env_args.home_dir()).into_path() {
            Some(filepath) => {
                if ARG::PRINT_DEBUG_MSGS {
                    eprintln!("Loading config from {}", filepath.display());
                }

                figment = figment
                    .merge(Figment::from(
                        figment::providers::Toml::file(&filepath).nested(),
                    ))
                    .merge(
                        Figment::from(figment::providers::Toml::file(&filepath).nested())
                            .select(ARG::TOML_IDENTIFIER),
                    );
            }
            None => {
                if ARG::PRINT_DEBUG_MSGS {
                    eprintln!("No {} found, using defaults", CONFIG::FILENAME);
                }
            }
        }

        let config = figment
            .merge(figment::providers::Serialized::defaults(cli_env_args))
            .extract()
            .context("Error extracting config")?;

        Ok(config)
    }
}

// a helper to try a series of fallback paths, looking for a config file
#[derive(Clone, Debug)]
pub struct ConfigFilePath {
    // the filename to look for in each directory, e.g. "taiko-bindings.toml"
    pub filename: String,
    // the optional directory set via direct args or env
    pub arg_env_dir: Option<PathBuf>,
}

impl ConfigFilePath {
    pub fn new(filename: impl ToString, arg_env_dir: Option<PathBuf>) -> Self {
        Self {
            filename: filename.to_string(),
            arg_env_dir,
        }
    }

    pub fn into_path(self) -> Option<PathBuf> {
        self.into_possible().into_iter().find(|path| path.exists())
    }

    // the candidates, in the order they are tried
    pub fn into_possible(self) -> Vec<PathBuf> {
        let Self {
            filename,
            arg_env_dir,
        } = self;

        const DIRNAME: &str = "taiko-bindings";

        let mut dirs = Vec::new();

        // explicit, e.g. --home /foo or TAIKO_BINDINGS_HOME=/foo
        if let Some(dir) = arg_env_dir {
            dirs.push(expand_tilde(dir));
        }

        if let Ok(dir) = std::env::var(HOME_ENV_VAR) {
            dirs.push(expand_tilde(dir.into()));
        }

        if let Ok(dir) = std::env::current_dir() {
            dirs.push(dir);
        }

        // ~/.taiko-bindings/taiko-bindings.toml
        if let Some(dir) = dirs::home_dir().map(|dir| dir.join(format!(".{DIRNAME}"))) {
            dirs.push(dir);
        }

        // Linux: ~/.config/taiko-bindings
        // macOS: ~/Library/Application Support/taiko-bindings
        // Windows: C:\Users\MyUserName\AppData\Roaming\taiko-bindings
        if let Some(dir) = dirs::config_dir().map(|dir| dir.join(DIRNAME)) {
            dirs.push(dir);
        }

        if let Some(dir) = std::env::var("XDG_CONFIG_HOME")
            .ok()
            .map(PathBuf::from)
            .map(|dir| dir.join(DIRNAME))
        {
            dirs.push(dir);
        }

        if let Some(dir) = dirs::home_dir().map(|dir| dir.join(".config").join(DIRNAME)) {
            dirs.push(dir);
        }

        dirs.push(PathBuf::from("/etc").join(DIRNAME));

        let mut all_files: Vec<PathBuf> = dirs.into_iter().map(|dir| dir.join(&filename)).collect();

        all_files.dedup();

        all_files
    }
}

fn expand_tilde(dir: PathBuf) -> PathBuf {
    shellexpand::tilde(&dir.to_string_lossy())
        .to_string()
        .into()
}

/// How to reach L1 and how bindings built on it behave
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChainConfig {
    /// `ws://`, `wss://`, `http://` or `https://`
    pub l1_endpoint: String,
    /// Poll for logs and receipts at this interval, mostly useful over http
    pub poll_interval_ms: Option<u64>,
    pub event_buffer: usize,
    pub backfill_chunk_size: u64,
    pub gas_estimate_multiplier: f32,
    pub hd_index: Option<u32>,
}

impl Default for ChainConfig {
    fn default() -> Self {
        let settings = BindingSettings::default();

        Self {
            l1_endpoint: "ws://localhost:8546".to_string(),
            poll_interval_ms: None,
            event_buffer: settings.event_buffer,
            backfill_chunk_size: DEFAULT_CHUNK_SIZE,
            gas_estimate_multiplier: settings.gas_estimate_multiplier,
            hd_index: None,
        }
    }
}

impl ChainConfig {
    pub fn endpoint(&self) -> Result<EvmEndpoint, EvmClientError> {
        EvmEndpoint::from_str(&self.l1_endpoint)
    }

    /// Interval for log watches and receipt polling, see [`EvmEndpoint::log_poll_interval`]
    pub fn poll_interval(&self) -> Option<Duration> {
        let configured = self.poll_interval_ms.map(Duration::from_millis);
        match self.endpoint() {
            Ok(endpoint) => endpoint.log_poll_interval(configured),
            Err(_) => configured,
        }
    }

    pub fn binding_settings(&self) -> BindingSettings {
        BindingSettings {
            event_buffer: self.event_buffer,
            backfill_chunk_size: self.backfill_chunk_size,
            gas_estimate_multiplier: self.gas_estimate_multiplier,
        }
    }

    pub async fn query_client(&self) -> Result<EvmQueryClient, EvmClientError> {
        let client = EvmQueryClient::new(self.endpoint()?).await?;

        Ok(client.with_settings(self.binding_settings()))
    }

    pub fn signing_client_config(
        &self,
        credential: Option<&Credential>,
    ) -> Result<EvmSigningClientConfig, EvmClientError> {
        let credential = credential.ok_or(EvmClientError::MissingCredential)?;

        let mut config = EvmSigningClientConfig::new(self.endpoint()?, credential.clone())
            .with_gas_estimate_multiplier(self.gas_estimate_multiplier);
        config.hd_index = self.hd_index;
        config.poll_interval = self.poll_interval();

        Ok(config)
    }

    pub async fn signing_client(
        &self,
        credential: Option<&Credential>,
    ) -> Result<EvmSigningClient, EvmClientError> {
        let mut client = EvmSigningClient::new(self.signing_client_config(credential)?).await?;
        client.settings = self.binding_settings();

        Ok(client)
    }
}

/// Deployed addresses of the contracts the clients know how to talk to
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ContractAddresses {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preconf_whitelist: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preconf_router: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forced_inclusion_store: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fork_router: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub taiko_inbox: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub taiko_wrapper: Option<Address>,
}

impl ContractAddresses {
    /// Looks up an address by contract name, e.g. `PreconfWhitelist` or `preconf_whitelist`
    pub fn get(&self, contract: &str) -> Option<Address> {
        let key: String = contract
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();

        match key.as_str() {
            "preconfwhitelist" => self.preconf_whitelist,
            "preconfrouter" => self.preconf_router,
            "forcedinclusionstore" => self.forced_inclusion_store,
            "forkrouter" => self.fork_router,
            "taikoinbox" => self.taiko_inbox,
            "taikowrapper" => self.taiko_wrapper,
            _ => None,
        }
    }

    pub fn require(&self, contract: &'static str) -> Result<Address, EvmClientError> {
        self.get(contract)
            .ok_or(EvmClientError::MissingContract(contract))
    }
}

#[cfg(test)]
mod test {
    use std::{path::PathBuf, sync::LazyLock};

    use alloy_primitives::address;
    use serde::{Deserialize, Serialize};

    use super::*;
    use crate::{evm_client::DEFAULT_HTTP_POLL_INTERVAL, serde::deserialize_vec_string};

    #[derive(Debug, Clone, Serialize, Deserialize)]
    #[serde(default)]
    struct TestConfig {
        pub log_level: Vec<String>,
        pub chain: ChainConfig,
        pub contracts: ContractAddresses,
        pub name: String,
    }

    impl Default for TestConfig {
        fn default() -> Self {
            Self {
                log_level: vec!["info".to_string()],
                chain: ChainConfig::default(),
                contracts: ContractAddresses::default(),
                name: "default".to_string(),
            }
        }
    }

    impl ConfigExt for TestConfig {
        fn log_levels(&self) -> impl Iterator<Item = &str> {
            self.log_level.iter().map(|s| s.as_str())
        }
    }

    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    #[serde(default)]
    struct TestCliEnv {
        #[serde(skip_serializing_if = "Option::is_none")]
        pub home: Option<PathBuf>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub dotenv: Option<PathBuf>,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        #[serde(deserialize_with = "deserialize_vec_string")]
        pub log_level: Vec<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub name: Option<String>,
    }

    impl TestCliEnv {
        fn new(home: &tempfile::TempDir) -> Self {
            Self {
                home: Some(home.path().to_path_buf()),
                // purposefully missing, so no real .env gets loaded
                dotenv: Some(home.path().join("does-not-exist")),
                log_level: Vec::new(),
                name: None,
            }
        }
    }

    impl CliEnvExt for TestCliEnv {
        const ENV_VAR_PREFIX: &'static str = "TAIKO_BINDINGS_TEST";
        const TOML_IDENTIFIER: &'static str = "test";

        fn home_dir(&self) -> Option<PathBuf> {
            self.home.clone()
        }

        fn dotenv_path(&self) -> Option<PathBuf> {
            self.dotenv.clone()
        }
    }

    fn write_config(dir: &tempfile::TempDir, contents: &str) {
        std::fs::write(dir.path().join(TestConfig::FILENAME), contents).unwrap();
    }

    fn build(cli: TestCliEnv) -> TestConfig {
        ConfigBuilder::new(cli).build().unwrap()
    }

    // only the first few candidates are stable across platforms, so only those are checked
    #[test]
    fn config_filepath() {
        fn filepaths(home: Option<PathBuf>) -> Vec<PathBuf> {
            ConfigFilePath::new(TestConfig::FILENAME, home).into_possible()
        }

        temp_env::with_vars([(HOME_ENV_VAR, None::<&str>)], || {
            let default_dirs = filepaths(None);
            for i in 1..=3 {
                assert!(!default_dirs
                    .contains(&PathBuf::from(format!("/tmp{i}")).join(TestConfig::FILENAME)));
            }

            assert_eq!(
                filepaths(Some("/tmp1".into())).first().unwrap(),
                &PathBuf::from("/tmp1").join(TestConfig::FILENAME)
            );
        });

        // an explicit directory beats the env var
        temp_env::with_vars([(HOME_ENV_VAR, Some("/tmp2"))], || {
            let paths = filepaths(Some("/tmp3".into()));
            assert_eq!(paths[0], PathBuf::from("/tmp3").join(TestConfig::FILENAME));
            assert_eq!(paths[1], PathBuf::from("/tmp2").join(TestConfig::FILENAME));

            assert_eq!(
                filepaths(None).first().unwrap(),
                &PathBuf::from("/tmp2").join(TestConfig::FILENAME),
            );
        });
    }

    #[test]
    fn config_filepath_expands_tilde() {
        let Some(home) = dirs::home_dir() else {
            return;
        };

        let paths =
            ConfigFilePath::new(TestConfig::FILENAME, Some("~/taiko".into())).into_possible();
        assert_eq!(paths[0], home.join("taiko").join(TestConfig::FILENAME));
    }

    #[test]
    fn config_defaults_without_file() {
        let home = tempfile::tempdir().unwrap();
        let config = build(TestCliEnv::new(&home));

        assert_eq!(config.name, "default");
        assert_eq!(config.chain, ChainConfig::default());
        assert_eq!(config.contracts, ContractAddresses::default());
    }

    #[test]
    fn config_section_overrides_globals() {
        let home = tempfile::tempdir().unwrap();
        write_config(
            &home,
            r#"
            [default]
            name = "global"
            log_level = ["warn"]

            [default.chain]
            l1_endpoint = "http://localhost:8545"
            backfill_chunk_size = 500

            [default.contracts]
            preconf_whitelist = "0x00000000000000000000000000000000000000aa"

            [test]
            name = "section"
            "#,
        );

        let config = build(TestCliEnv::new(&home));

        assert_eq!(config.name, "section");
        assert_eq!(config.log_level, ["warn"]);
        assert_eq!(config.chain.l1_endpoint, "http://localhost:8545");
        assert_eq!(config.chain.backfill_chunk_size, 500);
        // untouched keys keep their defaults
        assert_eq!(config.chain.event_buffer, ChainConfig::default().event_buffer);
        assert_eq!(
            config.contracts.preconf_whitelist,
            Some(address!("0x00000000000000000000000000000000000000aa"))
        );
    }

    #[test]
    fn config_cli_overrides_file() {
        let home = tempfile::tempdir().unwrap();
        write_config(
            &home,
            r#"
            [default]
            name = "global"
            "#,
        );

        let mut cli = TestCliEnv::new(&home);
        cli.name = Some("cli".to_string());

        assert_eq!(build(cli).name, "cli");
    }

    // tests that we can configure array-strings, and it overrides as expected
    #[tokio::test]
    async fn config_array_string() {
        static TRACING_ENV_FILTER_ENV: LazyLock<tracing_subscriber::EnvFilter> =
            LazyLock::new(|| {
                tracing_subscriber::EnvFilter::from_default_env()
                    .add_directive("debug".parse().unwrap())
                    .add_directive("foo=trace".parse().unwrap())
            });
        static TRACING_ENV_FILTER_CLI: LazyLock<tracing_subscriber::EnvFilter> =
            LazyLock::new(|| {
                tracing_subscriber::EnvFilter::from_default_env()
                    .add_directive("trace".parse().unwrap())
                    .add_directive("bar=debug".parse().unwrap())
            });

        let home = tempfile::tempdir().unwrap();

        let config = temp_env::with_vars(
            [(
                format!("{}_{}", TestCliEnv::ENV_VAR_PREFIX, "LOG_LEVEL"),
                Some("info, taiko_bindings=debug"),
            )],
            || build(TestCliEnv::new(&home)),
        );

        assert_eq!(config.log_level, ["info", "taiko_bindings=debug"]);

        // env replacement needs to be in an async function
        temp_env::async_with_vars(
            [(
                format!("{}_{}", TestCliEnv::ENV_VAR_PREFIX, "LOG_LEVEL"),
                Some("debug, foo=trace"),
            )],
            check(&home),
        )
        .await;

        async fn check(home: &tempfile::TempDir) {
            // without a cli value, the env var wins
            let config = build(TestCliEnv::new(home));
            assert_eq!(
                config.tracing_env_filter().unwrap().to_string(),
                TRACING_ENV_FILTER_ENV.to_string()
            );

            // with one, the cli value wins
            let mut cli_args = TestCliEnv::new(home);
            cli_args.log_level = TRACING_ENV_FILTER_CLI
                .to_string()
                .split(",")
                .map(|s| s.to_string())
                .collect();

            let config = build(cli_args);
            assert_eq!(
                config.tracing_env_filter().unwrap().to_string(),
                TRACING_ENV_FILTER_CLI.to_string()
            );
        }
    }

    #[test]
    fn config_rejects_bad_log_directive() {
        let config = TestConfig {
            log_level: vec!["not a [directive".to_string()],
            ..Default::default()
        };

        assert!(config.tracing_env_filter().is_err());
    }

    #[test]
    fn config_dotenv() {
        let home = tempfile::tempdir().unwrap();
        let dotenv = home.path().join(".env.test");
        std::fs::write(
            &dotenv,
            format!(
                "{}_RANDOM_TEST_VALUE=\"hello world\"\n",
                TestCliEnv::ENV_VAR_PREFIX
            ),
        )
        .unwrap();

        let mut cli = TestCliEnv::new(&home);
        cli.dotenv = Some(dotenv);
        build(cli);

        // a dummy value, real ones could clash with other tests or the user's environment
        assert_eq!(
            TestCliEnv::env_var("RANDOM_TEST_VALUE").unwrap(),
            "hello world"
        );

        std::env::remove_var(format!("{}_RANDOM_TEST_VALUE", TestCliEnv::ENV_VAR_PREFIX))
    }

    #[test]
    fn chain_config_clients() {
        let chain = ChainConfig {
            l1_endpoint: "http://localhost:8545".to_string(),
            poll_interval_ms: Some(250),
            gas_estimate_multiplier: 1.5,
            hd_index: Some(2),
            ..Default::default()
        };

        assert!(!chain.endpoint().unwrap().is_websocket());
        assert_eq!(chain.binding_settings().gas_estimate_multiplier, 1.5);

        let err = chain.signing_client_config(None).unwrap_err();
        assert!(matches!(err, EvmClientError::MissingCredential));

        let credential = Credential::new("0x01".to_string());
        let signing = chain.signing_client_config(Some(&credential)).unwrap();
        assert_eq!(signing.hd_index, Some(2));
        assert_eq!(signing.poll_interval, Some(Duration::from_millis(250)));
        assert_eq!(signing.gas_estimate_multiplier, Some(1.5));
    }

    #[test]
    fn http_chain_polls_without_interval() {
        let mut chain = ChainConfig {
            l1_endpoint: "http://127.0.0.1:1".to_string(),
            ..Default::default()
        };
        assert_eq!(chain.poll_interval(), Some(DEFAULT_HTTP_POLL_INTERVAL));

        chain.poll_interval_ms = Some(100);
        assert_eq!(chain.poll_interval(), Some(Duration::from_millis(100)));

        // websocket endpoints subscribe
        assert_eq!(ChainConfig::default().poll_interval(), None);
    }

    #[test]
    fn contract_addresses_lookup() {
        let contracts = ContractAddresses {
            fork_router: Some(address!("0x00000000000000000000000000000000000000f0")),
            ..Default::default()
        };

        assert_eq!(contracts.get("ForkRouter"), contracts.fork_router);
        assert_eq!(contracts.get("fork_router"), contracts.fork_router);
        assert_eq!(contracts.get("fork-router"), contracts.fork_router);
        assert_eq!(contracts.get("TaikoAnchor"), None);

        let err = contracts.require("PreconfWhitelist").unwrap_err();
        assert!(matches!(err, EvmClientError::MissingContract("PreconfWhitelist")));
    }
}
