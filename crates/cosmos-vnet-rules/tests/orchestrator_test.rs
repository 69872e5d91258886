use assert_matches::assert_matches;
use cosmos_vnet_rules::arm::{
    ArmError, Call, CallKind, LocalResourceManager, RecordingResourceManager,
};
use cosmos_vnet_rules::config::{Credentials, SampleSettings, SubnetSettings};
use cosmos_vnet_rules::model::{ApiKind, Region, ResourceId};
use cosmos_vnet_rules::orchestrator::Step;
use cosmos_vnet_rules::{CleanupOutcome, Orchestrator, SampleError};
use resource_actors::ActorClient;
use std::future::pending;
use std::time::Duration;

const SUBSCRIPTION: &str = "6b0a3e2c-64f5-4c0e-9d0b-2f1b6e9f1a11";

type Manager = RecordingResourceManager<LocalResourceManager>;

fn credentials() -> Credentials {
    Credentials {
        client_id: "0f3c2a55-2b8e-4e0a-9a57-2c1d9a0e7b21".to_string(),
        client_secret: "s3cret".to_string(),
        tenant_id: "c7d3b8e4-5a61-4f2e-8b0c-4d6a1e9f3b31".to_string(),
        subscription_id: SUBSCRIPTION.to_string(),
    }
}

/// RG1 / VNet1 with 10.10.1.0/24 and 10.10.2.0/24 / db1 at bounded staleness (100000, 300).
fn settings() -> SampleSettings {
    SampleSettings {
        resource_group_name: Some("RG1".to_string()),
        network_name: Some("VNet1".to_string()),
        database_name: Some("db1".to_string()),
        address_space: "10.10.0.0/16".to_string(),
        subnets: vec![
            SubnetSettings {
                name: "subnet1".to_string(),
                address_prefix: "10.10.1.0/24".to_string(),
            },
            SubnetSettings {
                name: "subnet2".to_string(),
                address_prefix: "10.10.2.0/24".to_string(),
            },
        ],
        max_staleness_prefix: 100_000,
        max_interval_in_seconds: 300,
        ..SampleSettings::default()
    }
}

fn orchestrator(
    settings: SampleSettings,
    script: impl FnOnce(Manager) -> Manager,
) -> Orchestrator<Manager> {
    let local = LocalResourceManager::connect(&credentials(), &settings);
    Orchestrator::new(script(RecordingResourceManager::new(local)), settings)
}

fn rg1() -> ResourceId {
    ResourceId::subscription(SUBSCRIPTION).resource_group("RG1")
}

fn vnet1() -> ResourceId {
    rg1().provider("Microsoft.Network", "virtualNetworks", "VNet1")
}

fn db1() -> ResourceId {
    rg1().provider("Microsoft.DocumentDB", "databaseAccounts", "db1")
}

fn call(kind: CallKind, target: ResourceId) -> Call {
    Call {
        kind,
        target: Some(target),
    }
}

async fn assert_control_plane_empty(orchestrator: &Orchestrator<Manager>) {
    let plane = orchestrator.manager().inner().control_plane();
    assert!(plane.resource_groups.list().await.unwrap().is_empty());
    assert!(plane.networks.list().await.unwrap().is_empty());
    assert!(plane.accounts.list().await.unwrap().is_empty());
}

async fn shutdown(orchestrator: Orchestrator<Manager>) {
    orchestrator.into_manager().into_inner().shutdown().await.unwrap();
}

#[tokio::test]
async fn test_end_to_end_without_rule_removal() {
    let settings = SampleSettings {
        clear_rules_before_delete: false,
        ..settings()
    };
    let orchestrator = orchestrator(settings, |m| m);

    let outcome = orchestrator.run(pending()).await;
    let report = outcome.result.expect("run should succeed");

    let subnet1 = vnet1().child("subnets", "subnet1");
    let subnet2 = vnet1().child("subnets", "subnet2");
    assert_eq!(report.resource_group, rg1());
    assert_eq!(report.database_account, db1());
    assert_eq!(report.database_kind, ApiKind::Table);
    assert_eq!(report.write_locations, vec![Region::EastUs]);
    assert_eq!(report.rules_after_create.len(), 1);
    assert_eq!(report.rules_after_create[0].subnet_id, subnet1);
    let mut updated: Vec<_> = report.rules_after_update.iter().map(|r| r.subnet_id.clone()).collect();
    updated.sort();
    assert_eq!(updated, vec![subnet1, subnet2]);
    assert_eq!(report.rules_after_clear, None);

    assert_eq!(outcome.cleanup, CleanupOutcome::Deleted(rg1()));
    assert_eq!(
        orchestrator.manager().deletions(),
        vec![
            call(CallKind::DeleteDatabaseAccount, db1()),
            call(CallKind::DeleteResourceGroup, rg1()),
        ]
    );
    assert_control_plane_empty(&orchestrator).await;
    shutdown(orchestrator).await;
}

#[tokio::test]
async fn test_removing_all_rules_leaves_none() {
    let orchestrator = orchestrator(settings(), |m| m);

    let outcome = orchestrator.run(pending()).await;
    let report = outcome.result.expect("run should succeed");

    assert_eq!(report.rules_after_clear, Some(vec![]));
    assert_eq!(
        orchestrator.manager().deletions(),
        vec![
            call(CallKind::DeleteVirtualNetwork, vnet1()),
            call(CallKind::DeleteDatabaseAccount, db1()),
            call(CallKind::DeleteResourceGroup, rg1()),
        ]
    );
    assert_eq!(orchestrator.manager().count(CallKind::UpdateDatabaseAccount), 2);
    shutdown(orchestrator).await;
}

#[tokio::test]
async fn test_too_few_subnets_fail_before_any_call() {
    let mut settings = settings();
    settings.subnets.truncate(1);
    let orchestrator = orchestrator(settings, |m| m);

    let outcome = orchestrator.run(pending()).await;

    assert_matches!(outcome.result, Err(SampleError::Config(_)));
    assert_eq!(outcome.cleanup, CleanupOutcome::NothingToClean);
    assert!(orchestrator.manager().calls().is_empty());
    shutdown(orchestrator).await;
}

#[tokio::test]
async fn test_provision_reports_a_missing_second_subnet() {
    let mut settings = settings();
    settings.subnets.truncate(1);
    let orchestrator = orchestrator(settings, |m| m);

    let scope = orchestrator.acquire_scope().await.unwrap();
    let provisioned = orchestrator.provision(&scope).await;
    assert_matches!(provisioned, Err(SampleError::Config(_)));

    assert_eq!(
        orchestrator.cleanup(Some(&scope.resource_group)).await,
        CleanupOutcome::Deleted(rg1())
    );
    assert_control_plane_empty(&orchestrator).await;
    shutdown(orchestrator).await;
}

#[tokio::test]
async fn test_scope_failure_skips_cleanup() {
    let orchestrator = orchestrator(settings(), |m| {
        m.fail_on(
            CallKind::CreateResourceGroup,
            1,
            ArmError::Conflict("quota exceeded".to_string()),
        )
    });

    let outcome = orchestrator.run(pending()).await;

    assert_matches!(
        outcome.result,
        Err(SampleError::Provisioning {
            step: Step::CreateResourceGroup,
            source: ArmError::Conflict(_)
        })
    );
    assert_eq!(outcome.cleanup, CleanupOutcome::NothingToClean);
    assert!(orchestrator.manager().deletions().is_empty());
    shutdown(orchestrator).await;
}

#[tokio::test]
async fn test_database_failure_still_deletes_scope_once() {
    let orchestrator = orchestrator(settings(), |m| {
        m.fail_on(
            CallKind::CreateDatabaseAccount,
            1,
            ArmError::InvalidRequest("name not available".to_string()),
        )
    });

    let outcome = orchestrator.run(pending()).await;

    assert_matches!(
        outcome.result,
        Err(SampleError::Provisioning {
            step: Step::CreateDatabaseAccount,
            ..
        })
    );
    assert_eq!(outcome.cleanup, CleanupOutcome::Deleted(rg1()));
    assert_eq!(
        orchestrator.manager().deletions(),
        vec![call(CallKind::DeleteResourceGroup, rg1())]
    );
    assert_control_plane_empty(&orchestrator).await;
    shutdown(orchestrator).await;
}

#[tokio::test]
async fn test_cleanup_failure_does_not_mask_primary_error() {
    let orchestrator = orchestrator(settings(), |m| {
        m.fail_on(
            CallKind::ListVirtualNetworkRules,
            1,
            ArmError::Transport("connection reset".to_string()),
        )
        .fail_on(
            CallKind::DeleteResourceGroup,
            1,
            ArmError::OperationFailed("provider timeout".to_string()),
        )
    });

    let outcome = orchestrator.run(pending()).await;

    assert_matches!(
        outcome.result,
        Err(SampleError::Provisioning {
            step: Step::ListRulesAfterCreate,
            source: ArmError::Transport(_)
        })
    );
    assert_matches!(
        outcome.cleanup,
        CleanupOutcome::Failed { ref id, error: ArmError::OperationFailed(_) } if *id == rg1()
    );
    shutdown(orchestrator).await;
}

#[tokio::test]
async fn test_cleanup_failure_after_success_is_reported_not_raised() {
    let orchestrator = orchestrator(settings(), |m| {
        m.fail_on(
            CallKind::DeleteResourceGroup,
            1,
            ArmError::Transport("connection reset".to_string()),
        )
    });

    let outcome = orchestrator.run(pending()).await;

    assert!(outcome.result.is_ok());
    assert_matches!(outcome.cleanup, CleanupOutcome::Failed { .. });
    shutdown(orchestrator).await;
}

#[tokio::test]
async fn test_rejected_credentials_create_nothing() {
    let settings = settings();
    let mut creds = credentials();
    creds.client_secret = "   ".to_string();
    let local = LocalResourceManager::connect(&creds, &settings);
    let orchestrator = Orchestrator::new(RecordingResourceManager::new(local), settings);

    let outcome = orchestrator.run(pending()).await;

    assert_matches!(outcome.result, Err(SampleError::Authentication(_)));
    assert_eq!(outcome.cleanup, CleanupOutcome::NothingToClean);
    assert_eq!(
        orchestrator.manager().calls(),
        vec![Call {
            kind: CallKind::DefaultSubscription,
            target: None
        }]
    );
    shutdown(orchestrator).await;
}

#[tokio::test]
async fn test_cancellation_still_cleans_up() {
    let settings = SampleSettings {
        provisioning_delay_ms: 100,
        ..settings()
    };
    let orchestrator = orchestrator(settings, |m| m);

    let outcome = orchestrator
        .run(tokio::time::sleep(Duration::from_millis(20)))
        .await;

    assert_matches!(outcome.result, Err(SampleError::Cancelled));
    assert_eq!(outcome.cleanup, CleanupOutcome::Deleted(rg1()));
    assert_eq!(orchestrator.manager().count(CallKind::CreateDatabaseAccount), 0);
    assert_eq!(
        orchestrator.manager().deletions(),
        vec![call(CallKind::DeleteResourceGroup, rg1())]
    );
    assert_control_plane_empty(&orchestrator).await;
    shutdown(orchestrator).await;
}
