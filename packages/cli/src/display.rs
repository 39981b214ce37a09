use anyhow::Result;
use serde::Serialize;
use taiko_bindings::{
    dynamic::DecodedArg,
    registry::{DecodedCall, DecodedError},
};
use taiko_contracts_client::contracts::ForkRoute;

use crate::command::{
    abi::{AbiEntry, AbiSummary, ContractSummary},
    call::CallOutput,
    protocol::{EpochOperator, ForcedInclusionStatus, ForkRouteOutput, WhitelistStatus},
    watch::WatchedEvent,
};

/// Prints `value` as pretty JSON, or through `text` otherwise
pub fn show<T: Serialize>(json: bool, value: &T, text: fn(&T)) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        text(value);
    }

    Ok(())
}

/// One event per line in JSON mode, so the output can be piped while the watch runs
pub fn show_event(json: bool, event: &WatchedEvent) {
    if json {
        match serde_json::to_string(event) {
            Ok(line) => println!("{line}"),
            Err(err) => tracing::error!("Unable to serialize event: {}", err),
        }
        return;
    }

    let block = event
        .block_number
        .map(|n| n.to_string())
        .unwrap_or_else(|| "pending".to_string());
    let removed = if event.removed { " (removed)" } else { "" };

    println!(
        "[{block}] {}{removed}{}",
        event.log.name,
        format_args_list(&event.log.args)
    );
}

#[allow(clippy::ptr_arg)]
pub fn display_contracts(contracts: &Vec<ContractSummary>) {
    println!("\n--- CONTRACTS ---");
    for contract in contracts {
        println!("{:<24} {}", contract.name, contract.fork);
    }
}

pub fn display_abi(summary: &AbiSummary) {
    fn section(title: &str, entries: &[AbiEntry]) {
        println!("\n--- {title} ---");
        for entry in entries {
            println!("{:<68} {}", entry.selector, entry.signature);
        }
    }

    println!("{} ({})", summary.contract, summary.fork);
    section("FUNCTIONS", &summary.functions);
    section("EVENTS", &summary.events);
    section("ERRORS", &summary.errors);
}

pub fn display_decoded_error(decoded: &DecodedError) {
    println!("{}", format_error(decoded));
}

pub fn display_decoded_call(decoded: &DecodedCall) {
    println!(
        "{}.{}{}",
        decoded.contract,
        decoded.name,
        format_args_list(&decoded.args)
    );
    println!("fork: {}", decoded.fork);
}

pub fn display_call_output(output: &CallOutput) {
    match output.block {
        Some(block) => println!("{} at block {}", output.signature, block),
        None => println!("{}", output.signature),
    }
    for arg in &output.outputs {
        println!("  {} {}: {}", arg.kind, arg.name, arg.value);
    }
}

pub fn display_whitelist(status: &WhitelistStatus) {
    fn operator(label: &str, operator: &EpochOperator) {
        match &operator.info {
            Some(info) => println!(
                "{label}: {} (sequencer {}, index {}, active since {})",
                operator.proposer, info.sequencer, info.index, info.active_since
            ),
            None => println!("{label}: none"),
        }
    }

    println!("\n--- PRECONF WHITELIST {} ---", status.address);
    println!("operators: {}", status.operator_count);
    operator("current epoch", &status.current);
    operator("next epoch", &status.next);
    println!("current candidates: {:?}", status.current_candidates);
    println!("next candidates: {:?}", status.next_candidates);
    if let Some(sequencers) = &status.sequencers {
        println!(
            "sequencers: current {}, next {}",
            sequencers.current, sequencers.next
        );
    }
}

pub fn display_forced_inclusions(status: &ForcedInclusionStatus) {
    println!("\n--- FORCED INCLUSION STORE {} ---", status.address);
    println!(
        "queue: head {}, tail {} ({} pending)",
        status.queue.head,
        status.queue.tail,
        status.queue.len()
    );
    println!("fee: {} wei", status.fee_wei);
    println!("inclusion delay: {} batches", status.inclusion_delay);

    match &status.oldest {
        Some(oldest) => {
            println!(
                "oldest: blob {} bytes {}..{}, created at batch {}",
                oldest.blob_hash,
                oldest.blob_byte_offset,
                u64::from(oldest.blob_byte_offset) + u64::from(oldest.blob_byte_size),
                oldest.created_at_batch_id
            );
            if let Some(deadline) = status.oldest_deadline {
                println!(
                    "deadline: {} ({})",
                    deadline,
                    if status.oldest_due { "due" } else { "not due" }
                );
            }
        }
        None => println!("oldest: none"),
    }

    if !status.history.is_empty() {
        println!("\n--- STORED ---");
        for stored in &status.history {
            println!(
                "[{}] blob {} size {} fee {} gwei",
                stored
                    .block_number
                    .map(|n| n.to_string())
                    .unwrap_or_default(),
                stored.blob_hash,
                stored.blob_byte_size,
                stored.fee_in_gwei
            );
        }
    }
}

pub fn display_fork_route(output: &ForkRouteOutput) {
    let (fork, address) = match output.route {
        ForkRoute::Old(address) => ("old", address),
        ForkRoute::New(address) => ("new", address),
    };

    println!("{} -> {fork} fork at {address}", output.selector);
}

/// `Contract.Name(arg=value, ...)`, the contract omitted for builtin errors
pub fn format_error(decoded: &DecodedError) -> String {
    let args = format_args_list(&decoded.args);
    match &decoded.contract {
        Some(contract) => format!("{contract}.{}{args}", decoded.name),
        None => format!("{}{args}", decoded.name),
    }
}

fn format_args_list(args: &[DecodedArg]) -> String {
    let args: Vec<String> = args
        .iter()
        .map(|arg| format!("{}={}", arg.name, arg.value))
        .collect();

    format!("({})", args.join(", "))
}

#[cfg(test)]
mod test {
    use super::*;

    fn arg(name: &str, value: &str) -> DecodedArg {
        DecodedArg {
            name: name.to_string(),
            kind: "uint256".to_string(),
            value: value.to_string(),
            indexed: false,
        }
    }

    #[test]
    fn formats_contract_and_builtin_errors() {
        let custom = DecodedError {
            contract: Some("ForcedInclusionStore".to_string()),
            fork: None,
            name: "IncorrectFee".to_string(),
            signature: "IncorrectFee()".to_string(),
            args: Vec::new(),
        };
        assert_eq!(format_error(&custom), "ForcedInclusionStore.IncorrectFee()");

        let panic = DecodedError {
            contract: None,
            fork: None,
            name: "Panic".to_string(),
            signature: "Panic(uint256)".to_string(),
            args: vec![arg("code", "17")],
        };
        assert_eq!(format_error(&panic), "Panic(code=17)");
    }
}
