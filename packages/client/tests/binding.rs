use std::time::Duration;

use alloy_json_rpc::ErrorPayload;
use alloy_primitives::{address, hex, Address, Bytes, LogData, B256, U256, U64};
use alloy_provider::{DynProvider, Provider, ProviderBuilder};
use alloy_rpc_types_eth::Log;
use alloy_sol_types::{SolCall, SolError, SolEvent};
use alloy_transport::mock::Asserter;
use taiko_bindings::pacaya::{
    ForcedInclusion, ForcedInclusionStore, ForcedInclusionStoreContract, PreconfWhitelist,
    PreconfWhitelistContract,
};
use futures::StreamExt;
use taiko_contracts_client::{
    binding::{CallOpts, ContractBinding, FilterOpts, TopicFilter, TransactOpts, WatchOpts},
    error::BindingError,
    events::live_logs,
    init_tracing_tests,
};

const STORE: Address = address!("0x00000000000000000000000000000000000000f1");
const WHITELIST: Address = address!("0x00000000000000000000000000000000000000f2");

fn mocked() -> (Asserter, DynProvider) {
    let asserter = Asserter::new();
    let provider = ProviderBuilder::new()
        .disable_recommended_fillers()
        .connect_mocked_client(asserter.clone());

    (asserter, DynProvider::new(provider))
}

fn push_return<C: SolCall>(asserter: &Asserter, ret: &C::Return) {
    asserter.push_success(&Bytes::from(C::abi_encode_returns(ret)));
}

fn push_revert(asserter: &Asserter, data: &[u8]) {
    let payload: ErrorPayload = serde_json::from_value(serde_json::json!({
        "code": 3,
        "message": "execution reverted",
        "data": hex::encode_prefixed(data),
    }))
    .unwrap();

    asserter.push_failure(payload);
}

fn inclusion(fee_in_gwei: u64) -> ForcedInclusion {
    ForcedInclusion {
        blobHash: [0x11; 32].into(),
        feeInGwei: fee_in_gwei,
        createdAtBatchId: 7,
        blobByteOffset: 0,
        blobByteSize: 1024,
        blobCreatedIn: 100,
    }
}

fn stored_log(block: u64, fee_in_gwei: u64) -> Log {
    let event = ForcedInclusionStore::ForcedInclusionStored {
        forcedInclusion: inclusion(fee_in_gwei),
    };

    Log {
        inner: alloy_primitives::Log {
            address: STORE,
            data: event.encode_log_data(),
        },
        block_number: Some(block),
        ..Default::default()
    }
}

#[tokio::test]
async fn call_decodes_typed_return() {
    init_tracing_tests();

    let (asserter, provider) = mocked();
    let binding = ContractBinding::<PreconfWhitelistContract>::new(WHITELIST, provider);

    push_return::<PreconfWhitelist::operatorCountCall>(&asserter, &3u8);

    let count = binding
        .caller()
        .call(&PreconfWhitelist::operatorCountCall {})
        .await
        .unwrap();

    assert_eq!(count, 3);
}

#[tokio::test]
async fn call_reports_undecodable_return() {
    let (asserter, provider) = mocked();
    let binding = ContractBinding::<PreconfWhitelistContract>::new(WHITELIST, provider);

    // an address is expected, empty output means no code at the address
    asserter.push_success(&Bytes::new());

    let err = binding
        .caller()
        .call(&PreconfWhitelist::getOperatorForCurrentEpochCall {})
        .await
        .unwrap_err();

    assert!(matches!(err, BindingError::DecodeReturn { .. }));
}

#[tokio::test]
async fn call_raw_at_block() {
    let (asserter, provider) = mocked();
    let binding = ContractBinding::<ForcedInclusionStoreContract>::new(STORE, provider);

    push_return::<ForcedInclusionStore::headCall>(&asserter, &9u64);

    let calldata = ForcedInclusionStore::headCall {}.abi_encode();
    let output = binding
        .caller()
        .call_raw(calldata.into(), CallOpts::at_block(42u64))
        .await
        .unwrap();

    assert_eq!(
        ForcedInclusionStore::headCall::abi_decode_returns(&output).unwrap(),
        9
    );
}

#[tokio::test]
async fn revert_decodes_to_contract_error() {
    let (asserter, provider) = mocked();
    let binding = ContractBinding::<ForcedInclusionStoreContract>::new(STORE, provider);

    push_revert(&asserter, &ForcedInclusionStore::IncorrectFee::SELECTOR);

    let err = binding
        .caller()
        .call(&ForcedInclusionStore::feeInGweiCall {})
        .await
        .unwrap_err();

    assert!(matches!(err, BindingError::Call(_)));
    assert_eq!(
        err.revert_data().unwrap().as_ref(),
        ForcedInclusionStore::IncorrectFee::SELECTOR.as_slice()
    );

    let decoded = ContractBinding::<ForcedInclusionStoreContract>::decode_error(&err);
    assert!(matches!(
        decoded,
        Some(ForcedInclusionStore::ForcedInclusionStoreErrors::IncorrectFee(_))
    ));

    // the same data means nothing to a contract that doesn't declare it
    assert!(ContractBinding::<PreconfWhitelistContract>::decode_error(&err).is_none());
}

#[tokio::test]
async fn transport_failure_has_no_revert_data() {
    let (asserter, provider) = mocked();
    let binding = ContractBinding::<ForcedInclusionStoreContract>::new(STORE, provider);

    asserter.push_failure_msg("connection reset");

    let err = binding
        .caller()
        .call(&ForcedInclusionStore::tailCall {})
        .await
        .unwrap_err();

    assert!(err.revert_data().is_none());
    assert!(ContractBinding::<ForcedInclusionStoreContract>::decode_error(&err).is_none());
}

#[tokio::test]
async fn filter_logs_yields_typed_events() {
    init_tracing_tests();

    let (asserter, provider) = mocked();
    let binding = ContractBinding::<ForcedInclusionStoreContract>::new(STORE, provider);

    asserter.push_success(&vec![stored_log(3, 10), stored_log(8, 20)]);

    let events = binding
        .filterer()
        .filter_logs::<ForcedInclusionStore::ForcedInclusionStored>(
            FilterOpts::range(0, 9),
            &TopicFilter::new(),
        )
        .collect()
        .await
        .unwrap();

    assert_eq!(events.len(), 2);
    assert_eq!(events[0].block_number(), Some(3));
    assert_eq!(events[0].event.forcedInclusion, inclusion(10));
    assert_eq!(events[1].event.forcedInclusion.feeInGwei, 20);
}

#[tokio::test]
async fn filter_logs_surfaces_decode_failure() {
    let (asserter, provider) = mocked();
    let binding = ContractBinding::<ForcedInclusionStoreContract>::new(STORE, provider);

    let garbage = Log {
        inner: alloy_primitives::Log {
            address: STORE,
            data: LogData::new_unchecked(
                vec![ForcedInclusionStore::ForcedInclusionStored::SIGNATURE_HASH],
                Bytes::from(vec![0u8; 3]),
            ),
        },
        block_number: Some(1),
        ..Default::default()
    };
    asserter.push_success(&vec![stored_log(0, 1), garbage]);

    let mut events = binding
        .filterer()
        .filter_logs::<ForcedInclusionStore::ForcedInclusionStored>(
            FilterOpts::range(0, 1),
            &TopicFilter::new(),
        );

    assert!(events.next().await.is_some());
    assert!(events.next().await.is_none());
    assert!(matches!(
        events.into_error(),
        Some(BindingError::DecodeLog { .. })
    ));
}

#[tokio::test]
async fn filter_logs_with_open_end() {
    let (asserter, provider) = mocked();
    let binding = ContractBinding::<ForcedInclusionStoreContract>::new(STORE, provider.clone());

    asserter.push_success(&U64::from(12));
    asserter.push_success(&vec![stored_log(12, 5)]);

    let events = binding
        .filterer()
        .filter_logs::<ForcedInclusionStore::ForcedInclusionStored>(
            FilterOpts::from_block(10),
            &TopicFilter::new(),
        )
        .collect()
        .await
        .unwrap();

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].block_number(), Some(12));
}

#[test]
fn event_filter_matches_contract_and_topics() {
    let (_asserter, provider) = mocked();
    let binding = ContractBinding::<PreconfWhitelistContract>::new(WHITELIST, provider);

    let proposer = address!("0x00000000000000000000000000000000000000aa");
    let filter = binding
        .filterer()
        .event_filter::<PreconfWhitelist::OperatorAdded>(
            &TopicFilter::new().topic1([proposer.into_word()]),
        );

    assert!(filter.address.matches(&WHITELIST));
    assert!(filter.topics[0].matches(&PreconfWhitelist::OperatorAdded::SIGNATURE_HASH));
    assert!(filter.topics[1].matches(&proposer.into_word()));
    assert!(filter.topics[2].is_empty());
}

#[tokio::test]
async fn provider_is_shared() {
    let (asserter, provider) = mocked();
    let binding = ContractBinding::<PreconfWhitelistContract>::new(WHITELIST, provider);

    asserter.push_success(&U64::from(77));

    assert_eq!(binding.provider().get_block_number().await.unwrap(), 77);
    assert_eq!(binding.address(), WHITELIST);
    assert_eq!(binding.abi().name(), "PreconfWhitelist");
    assert!(binding.settings().event_buffer > 0);
}

#[tokio::test]
async fn transact_estimates_gas_then_sends() {
    let (asserter, provider) = mocked();
    let binding = ContractBinding::<ForcedInclusionStoreContract>::new(STORE, provider);
    let hash = B256::repeat_byte(0x5a);

    asserter.push_success(&U64::from(100_000));
    asserter.push_success(&hash);

    let pending = binding
        .transactor()
        .transact(
            &ForcedInclusionStore::storeForcedInclusionCall {
                blobIndex: 0,
                blobByteOffset: 0,
                blobByteSize: 1024,
            },
            TransactOpts::with_value(U256::from(1)),
        )
        .await
        .unwrap();

    assert_eq!(*pending.tx_hash(), hash);
    assert!(asserter.read_q().is_empty());
}

#[tokio::test]
async fn explicit_gas_limit_skips_estimate() {
    let (asserter, provider) = mocked();
    let binding = ContractBinding::<ForcedInclusionStoreContract>::new(STORE, provider);
    let hash = B256::repeat_byte(0x5b);

    // a single answer, an estimate request would try to read the hash as a quantity
    asserter.push_success(&hash);

    let opts = TransactOpts {
        gas_limit: Some(50_000),
        ..Default::default()
    };
    let pending = binding.transactor().transfer(opts).await.unwrap();

    assert_eq!(*pending.tx_hash(), hash);
}

#[tokio::test]
async fn estimate_revert_decodes_to_contract_error() {
    let (asserter, provider) = mocked();
    let binding = ContractBinding::<ForcedInclusionStoreContract>::new(STORE, provider);

    push_revert(&asserter, &ForcedInclusionStore::IncorrectFee::SELECTOR);

    let err = binding
        .transactor()
        .transfer(TransactOpts::with_value(U256::from(7)))
        .await
        .unwrap_err();

    assert!(matches!(err, BindingError::EstimateGas(_)));
    assert!(matches!(
        ContractBinding::<ForcedInclusionStoreContract>::decode_error(&err),
        Some(ForcedInclusionStore::ForcedInclusionStoreErrors::IncorrectFee(_))
    ));
}

#[tokio::test]
async fn send_failure_is_reported() {
    let (asserter, provider) = mocked();
    let binding = ContractBinding::<ForcedInclusionStoreContract>::new(STORE, provider);

    asserter.push_success(&U64::from(21_000));
    asserter.push_failure_msg("nonce too low");

    let err = binding
        .transactor()
        .transfer(TransactOpts::default())
        .await
        .unwrap_err();

    assert!(matches!(err, BindingError::SendTransaction(_)));
}

#[tokio::test]
async fn live_logs_replay_then_poll_without_gaps() {
    init_tracing_tests();

    let (asserter, provider) = mocked();
    let binding = ContractBinding::<ForcedInclusionStoreContract>::new(STORE, provider.clone());
    let filter = binding
        .filterer()
        .event_filter::<ForcedInclusionStore::ForcedInclusionStored>(&TopicFilter::new());

    // answered in request order: the live filter is installed before the head is read
    asserter.push_success(&U256::from(0xfeed));
    asserter.push_success(&U64::from(9));
    asserter.push_success(&vec![stored_log(6, 1), stored_log(9, 2)]);
    // the first poll overlaps the replayed range
    asserter.push_success(&vec![stored_log(9, 2), stored_log(10, 3)]);

    let opts = WatchOpts {
        start: Some(5),
        poll_interval: Some(Duration::from_millis(10)),
    };
    let logs = tokio::time::timeout(
        Duration::from_secs(5),
        live_logs(provider, filter, opts, 100).take(3).collect::<Vec<_>>(),
    )
    .await
    .unwrap();

    let blocks: Vec<_> = logs
        .into_iter()
        .map(|log| log.unwrap().block_number.unwrap())
        .collect();
    assert_eq!(blocks, [6, 9, 10]);
}

#[tokio::test]
async fn live_logs_without_start_only_poll() {
    let (asserter, provider) = mocked();
    let binding = ContractBinding::<ForcedInclusionStoreContract>::new(STORE, provider.clone());
    let filter = binding
        .filterer()
        .event_filter::<ForcedInclusionStore::ForcedInclusionStored>(&TopicFilter::new());

    asserter.push_success(&U256::from(1));
    asserter.push_success(&vec![stored_log(3, 1)]);

    let opts = WatchOpts {
        start: None,
        poll_interval: Some(Duration::from_millis(10)),
    };
    let first = tokio::time::timeout(
        Duration::from_secs(5),
        Box::pin(live_logs(provider, filter, opts, 100)).next(),
    )
    .await
    .unwrap();

    assert_eq!(first.unwrap().unwrap().block_number, Some(3));
}
