//! # Veriflow Scenario Tests
//!
//! End-to-end flows through the node façade: registration, review,
//! measurement ingestion, approval and mint preparation.
//!
//! ## Flow
//!
//! 1. Farmer registers a project and submits it
//! 2. Farmer (or admin) moves it under review
//! 3. The measurement service delivers a result
//! 4. Admin approves; the node publishes metadata and assembles the payload

use std::sync::Arc;

use serde_json::{json, Value};
use shared_types::{Actor, ErrorKind, OwnerRef, Project, ProjectStatus, Role};
use tempfile::TempDir;
use veriflow_node::{NodeConfig, VeriflowNode};
use vf_01_project_lifecycle::{
    InMemoryProjectStore, NewProject, ProjectLifecycleApi, TransitionRequest,
};
use vf_03_tokenization::{
    ContentId, ContentStore, FsContentStore, InMemoryContentStore, TokenizationApi,
};

const OWNER_ADDRESS: &str = "0x1111111111111111111111111111111111111111";

fn farmer() -> Actor {
    Actor::new("farmer-1", Role::Farmer)
}

fn admin() -> Actor {
    Actor::new("admin-1", Role::Admin)
}

fn measurement(carbon_kg: f64) -> Value {
    json!({
        "status": "success",
        "job_id": "job-42",
        "processing_time_seconds": 12.3,
        "final_results": {
            "agb_Mg_per_ha": 85.2,
            "carbon_sequestration_kg": carbon_kg,
            "study_area_ha": 2.5
        },
        "component_results": {
            "satellite": { "agb_Mg_per_ha": 80.0, "height_m": 14.2, "confidence": 0.82 },
            "drone": { "agb_mg_ha": 90.1, "area_m2": 25000.0, "confidence": 0.91 }
        }
    })
}

/// Register, submit, move under review and attach a measurement.
async fn project_under_review<S: ContentStore>(
    node: &VeriflowNode<InMemoryProjectStore, S>,
    carbon_kg: f64,
) -> Project {
    let lifecycle = node.lifecycle();
    let mut owner = OwnerRef::new("farmer-1");
    owner.name = Some("Asha Rao".to_string());

    let project = lifecycle
        .submit_project(owner, NewProject::titled("Teak plot"))
        .await
        .unwrap();
    lifecycle
        .transition_status(
            &farmer(),
            &project.id,
            ProjectStatus::Submitted,
            TransitionRequest::default(),
        )
        .await
        .unwrap();
    lifecycle
        .transition_status(
            &farmer(),
            &project.id,
            ProjectStatus::UnderReview,
            TransitionRequest::default(),
        )
        .await
        .unwrap();
    lifecycle
        .ingest_ml_result(&project.id, &measurement(carbon_kg))
        .await
        .unwrap()
}

#[tokio::test]
async fn test_approve_and_mint_scenario() {
    let node = VeriflowNode::in_memory(&NodeConfig::default()).unwrap();
    let project = project_under_review(&node, 1250.5).await;

    let minted = node
        .approve_and_prepare_mint(
            &admin(),
            &project.id,
            "satellite and drone estimates agree",
            OWNER_ADDRESS,
            Some(b"plot.jpg bytes"),
        )
        .await
        .unwrap();

    assert_eq!(minted.project.status, ProjectStatus::Verified);
    assert!(minted.project.verification.verified);
    assert_eq!(
        minted.project.verification.verified_by.as_ref().map(|u| u.as_str()),
        Some("admin-1")
    );

    let payload = minted.payload;
    assert_eq!(payload.price_in_currency, 0.025);
    assert_eq!(payload.carbon_amount_fixed_point, "1250500000000000000000");
    assert_eq!(payload.owner_address, OWNER_ADDRESS);
    assert_eq!(
        payload.metadata_uri,
        format!("https://gateway.pinata.cloud/ipfs/{}", payload.metadata_cid)
    );
    assert_eq!(
        payload.image_cid,
        Some(ContentId::for_bytes(b"plot.jpg bytes"))
    );

    // Published metadata reflects the approval event.
    let bytes = node.tokenization().fetch(&payload.metadata_cid).await.unwrap();
    let metadata: Value = serde_json::from_slice(&bytes).unwrap();
    let verified_at = minted.project.verification.verified_at.unwrap();
    assert_eq!(
        metadata["verification"]["verificationDate"],
        verified_at.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
    );
    assert_eq!(metadata["projectDetails"]["owner"]["name"], "Asha Rao");

    // The payload carries the same document it points at.
    assert_eq!(serde_json::to_value(&payload.metadata).unwrap(), metadata);
    assert!((payload.carbon_tons - 1.2505).abs() < 1e-12);
}

#[tokio::test]
async fn test_prepare_mint_rerun_after_approval_is_stable() {
    let node = VeriflowNode::in_memory(&NodeConfig::default()).unwrap();
    let project = project_under_review(&node, 10.0).await;

    let first = node
        .approve_and_prepare_mint(&admin(), &project.id, "ok", OWNER_ADDRESS, None)
        .await
        .unwrap();
    let again = node
        .tokenization()
        .prepare_mint(&project.id, OWNER_ADDRESS, None)
        .await
        .unwrap();

    assert_eq!(first.payload, again);

    // Approval is not repeatable.
    let err = node
        .approve_and_prepare_mint(&admin(), &project.id, "ok", OWNER_ADDRESS, None)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidTransition);
}

#[tokio::test]
async fn test_bad_owner_address_does_not_approve() {
    let node = VeriflowNode::in_memory(&NodeConfig::default()).unwrap();
    let project = project_under_review(&node, 10.0).await;

    let err = node
        .approve_and_prepare_mint(&admin(), &project.id, "ok", "0xnothex", None)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    let stored = node.lifecycle().get_project(&project.id).await.unwrap();
    assert_eq!(stored.status, ProjectStatus::UnderReview);
}

#[tokio::test]
async fn test_farmer_cannot_approve() {
    let node = VeriflowNode::in_memory(&NodeConfig::default()).unwrap();
    let project = project_under_review(&node, 10.0).await;

    let err = node
        .approve_and_prepare_mint(&farmer(), &project.id, "ok", OWNER_ADDRESS, None)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);
}

#[tokio::test]
async fn test_rejected_project_cannot_be_minted() {
    let node = VeriflowNode::in_memory(&NodeConfig::default()).unwrap();
    let project = project_under_review(&node, 10.0).await;

    node.lifecycle()
        .transition_status(
            &admin(),
            &project.id,
            ProjectStatus::Rejected,
            TransitionRequest::with_notes("canopy estimate inconsistent"),
        )
        .await
        .unwrap();

    let err = node
        .tokenization()
        .prepare_mint(&project.id, OWNER_ADDRESS, None)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);
}

#[tokio::test]
async fn test_upload_failure_leaves_project_verified() {
    let store = Arc::new(InMemoryContentStore::new());
    let node = VeriflowNode::new(
        &NodeConfig::default(),
        Arc::new(InMemoryProjectStore::new()),
        store.clone(),
    )
    .unwrap();
    let project = project_under_review(&node, 1250.5).await;

    store.fail_uploads(true);
    let err = node
        .approve_and_prepare_mint(&admin(), &project.id, "ok", OWNER_ADDRESS, None)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UploadFailed);
    assert!(err.kind().is_retryable());

    let stored = node.lifecycle().get_project(&project.id).await.unwrap();
    assert_eq!(stored.status, ProjectStatus::Verified);

    store.fail_uploads(false);
    let payload = node
        .tokenization()
        .prepare_mint(&project.id, OWNER_ADDRESS, None)
        .await
        .unwrap();
    assert_eq!(payload.price_in_currency, 0.025);
}

#[tokio::test]
async fn test_seller_portfolio_counts_verified_only() {
    let node = VeriflowNode::in_memory(&NodeConfig::default()).unwrap();
    let approved = project_under_review(&node, 2000.0).await;
    let _pending = project_under_review(&node, 5000.0).await;

    node.approve_and_prepare_mint(&admin(), &approved.id, "ok", OWNER_ADDRESS, None)
        .await
        .unwrap();

    let portfolio = node.seller_portfolio().await.unwrap();
    assert_eq!(portfolio.sellers.len(), 1);
    let seller = &portfolio.sellers[0];
    assert_eq!(seller.project_count, 1);
    assert_eq!(seller.total_carbon_kg, 2000.0);
    assert_eq!(seller.total_tons, 2.0);
    assert!((seller.total_value - 0.04).abs() < 1e-12);
}

#[tokio::test]
async fn test_filesystem_store_round_trip() {
    let temp = TempDir::new().unwrap();
    let config = NodeConfig {
        storage: veriflow_node::StorageConfig {
            data_dir: temp.path().join("content"),
            ..Default::default()
        },
        ..Default::default()
    };
    let node = VeriflowNode::with_fs_store(&config).await.unwrap();
    let project = project_under_review(&node, 1250.5).await;

    let minted = node
        .approve_and_prepare_mint(&admin(), &project.id, "ok", OWNER_ADDRESS, None)
        .await
        .unwrap();

    let cid = minted.payload.metadata_cid;
    assert!(temp.path().join("content").join(cid.to_string()).exists());

    // A fresh store over the same directory serves the same bytes.
    let reopened = FsContentStore::open(temp.path().join("content")).await.unwrap();
    let bytes = reopened.get(&cid).await.unwrap().unwrap();
    assert!(cid.matches(&bytes));
}
