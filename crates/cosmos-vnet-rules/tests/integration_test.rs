use cosmos_vnet_rules::database_account_actor::DatabaseAccountError;
use cosmos_vnet_rules::lifecycle::ControlPlane;
use cosmos_vnet_rules::model::{
    ApiKind, ConsistencyPolicy, DatabaseAccountCreate, DatabaseAccountUpdate, Region,
    ResourceGroupCreate, ResourceId, ServiceEndpoint, SubnetSpec, VirtualNetworkCreate,
    VirtualNetworkRule,
};
use cosmos_vnet_rules::resource_group_actor::ResourceGroupError;
use resource_actors::ActorClient;

fn network(group: &ResourceId) -> VirtualNetworkCreate {
    VirtualNetworkCreate {
        resource_group: group.clone(),
        name: "vnet1".to_string(),
        location: Region::EastUs,
        address_space: "192.168.0.0/16".to_string(),
        subnets: vec![
            SubnetSpec::new("subnet1", "192.168.1.0/24").with_access_from(ServiceEndpoint::CosmosDb),
            SubnetSpec::new("subnet2", "192.168.2.0/24").with_access_from(ServiceEndpoint::CosmosDb),
        ],
    }
}

fn account(group: &ResourceId, rules: Vec<VirtualNetworkRule>) -> DatabaseAccountCreate {
    DatabaseAccountCreate {
        resource_group: group.clone(),
        name: "db1".to_string(),
        location: Region::WestUs,
        kind: ApiKind::Sql,
        consistency: ConsistencyPolicy::bounded_staleness(100_000, 300),
        write_locations: vec![],
        virtual_network_rules: rules,
    }
}

#[tokio::test]
async fn test_group_delete_cascades_to_contents() {
    let plane = ControlPlane::new();

    let rg1 = plane
        .resource_groups
        .create_group(ResourceGroupCreate::new("sub", "rg1", Region::EastUs))
        .await
        .unwrap();
    let rg2 = plane
        .resource_groups
        .create_group(ResourceGroupCreate::new("sub", "rg2", Region::EastUs))
        .await
        .unwrap();

    let vnet = plane.networks.create_network(network(&rg1)).await.unwrap();
    let subnet1 = vnet.child("subnets", "subnet1");
    plane
        .accounts
        .create_account(account(&rg1, vec![VirtualNetworkRule::new(subnet1)]))
        .await
        .unwrap();
    plane.networks.create_network(network(&rg2)).await.unwrap();

    let mut contents = plane.resource_groups.resources(rg1.clone()).await.unwrap();
    contents.sort();
    assert_eq!(contents.len(), 2);
    assert_eq!(contents[0].name(), "db1");

    plane.resource_groups.delete(rg1.clone()).await.unwrap();

    assert!(plane.accounts.list().await.unwrap().is_empty());
    let networks = plane.networks.list().await.unwrap();
    assert_eq!(networks.len(), 1);
    assert!(networks[0].id.is_within(&rg2));
    assert!(plane.resource_groups.get(rg1).await.unwrap().is_none());

    plane.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_duplicate_group_is_a_conflict() {
    let plane = ControlPlane::new();
    let params = ResourceGroupCreate::new("sub", "rg1", Region::EastUs);

    plane.resource_groups.create_group(params.clone()).await.unwrap();
    let again = plane.resource_groups.create_group(params).await;

    assert!(matches!(again, Err(ResourceGroupError::AlreadyExists(_))));
    plane.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_group_names_differing_only_in_case_are_one_group() {
    let plane = ControlPlane::new();
    let upper = plane
        .resource_groups
        .create_group(ResourceGroupCreate::new("sub", "RG1", Region::EastUs))
        .await
        .unwrap();
    plane.networks.create_network(network(&upper)).await.unwrap();

    let lower = plane
        .resource_groups
        .create_group(ResourceGroupCreate::new("sub", "rg1", Region::EastUs))
        .await;
    assert!(matches!(lower, Err(ResourceGroupError::AlreadyExists(_))));

    // Deleting by the other spelling removes the group together with its contents.
    let lower_id = ResourceId::subscription("sub").resource_group("rg1");
    assert_eq!(lower_id, upper);
    plane.resource_groups.delete(lower_id).await.unwrap();

    assert!(plane.resource_groups.list().await.unwrap().is_empty());
    assert!(plane.networks.list().await.unwrap().is_empty());
    plane.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_rule_update_is_validated_and_replaces_the_list() {
    let plane = ControlPlane::new();
    let rg = plane
        .resource_groups
        .create_group(ResourceGroupCreate::new("sub", "rg1", Region::EastUs))
        .await
        .unwrap();
    let vnet = plane.networks.create_network(network(&rg)).await.unwrap();
    let subnet1 = vnet.child("subnets", "subnet1");
    let subnet2 = vnet.child("subnets", "subnet2");
    let db = plane
        .accounts
        .create_account(account(&rg, vec![VirtualNetworkRule::new(subnet1.clone())]))
        .await
        .unwrap();

    // Unknown subnet: rejected, stored rules untouched.
    let bogus = vnet.child("subnets", "subnet9");
    let rejected = plane
        .accounts
        .update_account(
            db.clone(),
            DatabaseAccountUpdate {
                virtual_network_rules: Some(vec![VirtualNetworkRule::new(bogus)]),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(rejected, Err(DatabaseAccountError::InvalidRule { .. })));
    let rules = plane.accounts.virtual_network_rules(db.clone()).await.unwrap();
    assert_eq!(rules, vec![VirtualNetworkRule::new(subnet1.clone())]);

    // Sending only the new rule drops the old one.
    let updated = plane
        .accounts
        .update_account(
            db.clone(),
            DatabaseAccountUpdate {
                virtual_network_rules: Some(vec![VirtualNetworkRule::new(subnet2.clone())]),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.virtual_network_rules, vec![VirtualNetworkRule::new(subnet2)]);

    plane.shutdown().await.unwrap();
}
