use alloy_signer::k256::SecretKey;
use alloy_signer_local::{coins_bip39::English, MnemonicBuilder, PrivateKeySigner};

use crate::error::EvmClientError;

/// Builds a local signer from either a BIP-39 mnemonic or a `0x` private key.
pub fn make_signer(
    credentials: &str,
    hd_index: Option<u32>,
) -> Result<PrivateKeySigner, EvmClientError> {
    let hd_index = hd_index.unwrap_or_default();

    match credentials.strip_prefix("0x") {
        Some(stripped) => {
            // a raw private key can't derive additional keys
            if hd_index > 0 {
                return Err(EvmClientError::DerivationWithPrivateKey);
            }
            let private_key =
                const_hex::decode(stripped).map_err(|e| EvmClientError::PrivateKey(e.into()))?;
            let secret_key = SecretKey::from_slice(&private_key)
                .map_err(|e| EvmClientError::PrivateKey(anyhow::anyhow!("{e}")))?;
            Ok(PrivateKeySigner::from_signing_key(secret_key.into()))
        }
        None => MnemonicBuilder::<English>::default()
            .phrase(credentials)
            .index(hd_index)
            .and_then(|builder| builder.build())
            .map_err(|e| EvmClientError::Mnemonic(e.into())),
    }
}
