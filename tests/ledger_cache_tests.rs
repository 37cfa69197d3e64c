// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Tests for result memoization in LedgerClient
//!
//! Successes are served from the cache without a second remote call; failures
//! at any phase leave nothing behind, so the next identical call goes back to
//! the remote surface.

mod helpers;

use std::sync::Arc;

use alloy_primitives::address;
use assetledger::call::prefix;
use assetledger::remote::methods;
use assetledger::{AssetSummary, LedgerCall, LedgerClient, LedgerError, LedgerResponse, RemoteError};
use helpers::{details_for, MockLedger, CONFIRM, OWNER, VALID_ADDRESS};

fn client_for(mock: &Arc<MockLedger>) -> LedgerClient<MockLedger> {
    LedgerClient::new(Arc::clone(mock))
}

#[tokio::test]
async fn test_get_details_twice_calls_remote_once() {
    let mock = Arc::new(MockLedger::new());
    let client = client_for(&mock);

    let first = client.get_details("42").await.unwrap();
    assert_eq!(first, details_for(42));
    assert_eq!(first.owner, OWNER);
    assert_eq!(mock.calls(methods::ASSET_DETAILS), 1);

    let second = client.get_details("42").await.unwrap();
    assert_eq!(second, first, "Cached result should be identical");
    assert_eq!(
        mock.calls(methods::ASSET_DETAILS),
        1,
        "Second call should be served from cache"
    );

    let stats = client.cache_stats();
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.entries, 1);
}

#[tokio::test]
async fn test_invoke_with_explicit_prefix() {
    let mock = Arc::new(MockLedger::new());
    let client = client_for(&mock);
    let call = LedgerCall::AssetDetails {
        asset_id: "42".into(),
    };

    let first = client.invoke("getDetails", call.clone()).await.unwrap();
    let second = client.invoke("getDetails", call).await.unwrap();

    assert_eq!(first, LedgerResponse::Details(details_for(42)));
    assert_eq!(first, second);
    assert_eq!(mock.total_calls(), 1);
}

#[tokio::test]
async fn test_create_network_error_is_not_cached() {
    let mock = Arc::new(MockLedger::new());
    mock.fail_next(methods::CREATE_ASSET, 1);
    let client = client_for(&mock);

    let err = client.create_asset("Gold", "desc").await.unwrap_err();
    let LedgerError::Remote(remote) = &err else {
        panic!("Expected a remote call error, got {err}");
    };
    assert_eq!(remote.prefix(), prefix::CREATE);
    assert!(!remote.is_timeout());
    assert!(matches!(
        remote.remote_error(),
        Some(RemoteError::Transport { method, .. }) if *method == methods::CREATE_ASSET
    ));
    assert!(err.to_string().contains("network error"), "Cause should be kept: {err}");
    assert_eq!(mock.calls(methods::CREATE_ASSET), 1);
    assert_eq!(mock.calls(CONFIRM), 0, "Nothing to confirm after a failed submit");

    let confirmation = client.create_asset("Gold", "desc").await.unwrap();
    assert_eq!(confirmation.block_number, Some(100));
    assert_eq!(
        mock.calls(methods::CREATE_ASSET),
        2,
        "Retry must reach the remote surface again"
    );
    assert_eq!(client.cache_stats().failures, 1);
}

#[tokio::test]
async fn test_confirmation_failure_is_not_cached() {
    let mock = Arc::new(MockLedger::new());
    mock.fail_next(CONFIRM, 1);
    let client = client_for(&mock);

    let err = client.complete_transfer("5").await.unwrap_err();
    assert_eq!(err.prefix(), prefix::COMPLETE_TRANSFER);
    assert_eq!(mock.calls(methods::APPROVE_TRANSFER), 1);
    assert_eq!(mock.calls(CONFIRM), 1);

    client.complete_transfer("5").await.unwrap();
    assert_eq!(
        mock.calls(methods::APPROVE_TRANSFER),
        2,
        "Both phases run again after a failed confirmation"
    );
    assert_eq!(mock.calls(CONFIRM), 2);
}

#[tokio::test]
async fn test_reverted_transaction_is_a_failure() {
    let mock = Arc::new(MockLedger::new());
    mock.revert_next(1);
    let client = client_for(&mock);

    let err = client
        .initiate_transfer("7", VALID_ADDRESS)
        .await
        .unwrap_err();
    let remote = err.as_remote().expect("should be a remote failure");
    assert!(matches!(
        remote.remote_error(),
        Some(RemoteError::Reverted { method, .. }) if *method == methods::INITIATE_TRANSFER
    ));

    client.initiate_transfer("7", VALID_ADDRESS).await.unwrap();
    assert_eq!(mock.calls(methods::INITIATE_TRANSFER), 2);
}

#[tokio::test]
async fn test_confirmed_write_is_remembered() {
    let mock = Arc::new(MockLedger::new());
    let client = client_for(&mock);

    let first = client.create_asset("Gold", "desc").await.unwrap();
    let second = client.create_asset("Gold", "desc").await.unwrap();

    assert_eq!(first, second);
    assert_eq!(mock.calls(methods::CREATE_ASSET), 1);
    assert_eq!(mock.calls(CONFIRM), 1);

    client.create_asset("Silver", "desc").await.unwrap();
    assert_eq!(
        mock.calls(methods::CREATE_ASSET),
        2,
        "Different arguments are a different call"
    );
}

#[tokio::test]
async fn test_prefix_and_method_separate_entries() {
    let mock = Arc::new(MockLedger::new());
    let client = client_for(&mock);
    let call = || LedgerCall::AssetDetails {
        asset_id: "1".into(),
    };

    client.invoke("first", call()).await.unwrap();
    client.invoke("second", call()).await.unwrap();
    assert_eq!(mock.calls(methods::ASSET_DETAILS), 2);

    client.get_history("1").await.unwrap();
    assert_eq!(mock.calls(methods::ASSET_HISTORY), 1);
}

#[tokio::test]
async fn test_equivalent_inputs_share_an_entry() {
    let owner = address!("5aaeb6053f3e94c9b9a09f33669435e7ef1beaed");
    let mock = Arc::new(MockLedger::new().with_owned(owner, &[3, 9]));
    let client = client_for(&mock);

    let checksummed = client.list_owned_by(VALID_ADDRESS).await.unwrap();
    let lowercase = client
        .list_owned_by(VALID_ADDRESS.to_lowercase())
        .await
        .unwrap();
    assert_eq!(checksummed, lowercase);
    assert_eq!(checksummed.iter().map(|id| id.get()).collect::<Vec<_>>(), [3u32, 9]);
    assert_eq!(mock.calls(methods::ASSETS_OWNED), 1);

    client.get_details("7").await.unwrap();
    client.get_details(" 7 ").await.unwrap();
    assert_eq!(mock.calls(methods::ASSET_DETAILS), 1);
}

#[tokio::test]
async fn test_all_summaries() {
    let summaries = vec![AssetSummary {
        id: 1,
        owner: OWNER,
        name: "Gold".into(),
    }];
    let mock = Arc::new(MockLedger::new().with_summaries(summaries.clone()));
    let client = client_for(&mock);

    assert_eq!(client.get_all_summaries().await.unwrap(), summaries);
    assert_eq!(client.get_all_summaries().await.unwrap(), summaries);
    assert_eq!(mock.calls(methods::ALL_ASSETS), 1);
}

#[tokio::test]
async fn test_bounded_cache_evicts_and_refetches() {
    let mock = Arc::new(MockLedger::new());
    let client = client_for(&mock).with_max_entries(2);

    for id in ["1", "2", "3"] {
        client.get_details(id).await.unwrap();
    }
    let stats = client.cache_stats();
    assert_eq!(stats.entries, 2);
    assert_eq!(stats.evictions, 1);

    // "1" was least recently used and is gone; "3" is still cached
    client.get_details("3").await.unwrap();
    assert_eq!(mock.calls(methods::ASSET_DETAILS), 3);
    client.get_details("1").await.unwrap();
    assert_eq!(mock.calls(methods::ASSET_DETAILS), 4);
}
