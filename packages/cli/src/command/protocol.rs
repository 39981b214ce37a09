use alloy_primitives::{keccak256, Address, Selector, U256};
use anyhow::{bail, Result};
use serde::Serialize;
use taiko_bindings::pacaya::ForcedInclusion;
use taiko_contracts_client::{
    binding::FilterOpts,
    contracts::{
        EpochSelector, ForcedInclusionStoreClient, ForkRoute, ForkRouterClient, OperatorInfo,
        PreconfWhitelistClient, QueueBounds, WhitelistSequencers,
    },
};

use super::parse_hex;

#[derive(Debug, Clone, Serialize)]
pub struct EpochOperator {
    pub proposer: Address,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<OperatorInfo>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WhitelistStatus {
    pub address: Address,
    pub operator_count: u8,
    pub current: EpochOperator,
    pub next: EpochOperator,
    pub current_candidates: Vec<Address>,
    pub next_candidates: Vec<Address>,
    /// Unset when an epoch has no sequencer registered
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequencers: Option<WhitelistSequencers>,
}

pub async fn whitelist(client: &PreconfWhitelistClient) -> Result<WhitelistStatus> {
    let (operator_count, current, next, current_candidates, next_candidates) = tokio::try_join!(
        client.operator_count(),
        client.operator_for_current_epoch(),
        client.operator_for_next_epoch(),
        client.operator_candidates(EpochSelector::Current),
        client.operator_candidates(EpochSelector::Next),
    )?;

    let current = epoch_operator(client, current).await?;
    let next = epoch_operator(client, next).await?;

    let sequencers = match client.sequencers(None).await {
        Ok(sequencers) => Some(sequencers),
        Err(err) => {
            tracing::warn!("No sequencers: {}", err);
            None
        }
    };

    Ok(WhitelistStatus {
        address: client.binding().address(),
        operator_count,
        current,
        next,
        current_candidates,
        next_candidates,
        sequencers,
    })
}

async fn epoch_operator(
    client: &PreconfWhitelistClient,
    proposer: Address,
) -> Result<EpochOperator> {
    let info = match proposer == Address::ZERO {
        true => None,
        false => Some(client.operator_info(proposer).await?),
    };

    Ok(EpochOperator { proposer, info })
}

#[derive(Debug, Clone, Serialize)]
pub struct StoredInclusion {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
    pub blob_hash: String,
    pub fee_in_gwei: u64,
    pub created_at_batch_id: u64,
    pub blob_byte_offset: u32,
    pub blob_byte_size: u32,
}

impl StoredInclusion {
    pub fn new(block_number: Option<u64>, inclusion: &ForcedInclusion) -> Self {
        Self {
            block_number,
            blob_hash: inclusion.blobHash.to_string(),
            fee_in_gwei: inclusion.feeInGwei,
            created_at_batch_id: inclusion.createdAtBatchId,
            blob_byte_offset: inclusion.blobByteOffset,
            blob_byte_size: inclusion.blobByteSize,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ForcedInclusionStatus {
    pub address: Address,
    pub queue: QueueBounds,
    pub fee_wei: U256,
    pub inclusion_delay: u8,
    pub oldest_due: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oldest: Option<StoredInclusion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oldest_deadline: Option<U256>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub history: Vec<StoredInclusion>,
}

pub async fn forced_inclusions(
    client: &ForcedInclusionStoreClient,
    history_from: Option<u64>,
) -> Result<ForcedInclusionStatus> {
    let (queue, fee_wei, inclusion_delay, oldest_due, oldest) = tokio::try_join!(
        client.queue_bounds(),
        client.fee_wei(),
        client.inclusion_delay(),
        client.is_oldest_due(),
        client.oldest_forced_inclusion(),
    )?;

    // the deadline is only meaningful while something is queued
    let oldest_deadline = match oldest.is_some() {
        true => Some(client.oldest_deadline().await?),
        false => None,
    };

    let history = match history_from {
        Some(start) => client
            .stored_inclusions(FilterOpts::from_block(start))
            .collect()
            .await?
            .iter()
            .map(|stored| {
                StoredInclusion::new(stored.block_number(), &stored.event.forcedInclusion)
            })
            .collect(),
        None => Vec::new(),
    };

    Ok(ForcedInclusionStatus {
        address: client.binding().address(),
        queue,
        fee_wei,
        inclusion_delay,
        oldest_due,
        oldest: oldest.as_ref().map(|inclusion| StoredInclusion::new(None, inclusion)),
        oldest_deadline,
        history,
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct ForkRouteOutput {
    pub selector: Selector,
    pub route: ForkRoute,
}

pub async fn fork_route(client: &ForkRouterClient, selector: &str) -> Result<ForkRouteOutput> {
    let selector = parse_selector(selector)?;
    let route = client.route_for(selector).await?;

    Ok(ForkRouteOutput { selector, route })
}

/// A four byte hex selector, or the selector of a function signature
pub fn parse_selector(input: &str) -> Result<Selector> {
    let input = input.trim();

    if input.contains('(') {
        let signature: String = input.chars().filter(|c| !c.is_whitespace()).collect();
        return Ok(Selector::from_slice(&keccak256(signature.as_bytes())[..4]));
    }

    let bytes = parse_hex(input)?;
    if bytes.len() != 4 {
        bail!("a selector is 4 bytes, got {}", bytes.len());
    }

    Ok(Selector::from_slice(&bytes))
}
