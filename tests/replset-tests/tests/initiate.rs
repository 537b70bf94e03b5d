use anyhow::Result;
use replset::Error;
use replset_tests::*;
use serde_json::json;
use test_log::test;

#[test(tokio::test(start_paused = true))]
async fn initiate_fresh_node() -> Result<()> {
    let cluster = Cluster::fresh();

    let outcome = cluster.apply(json!({ "state": "initiated" })).await?;
    assert!(outcome.changed);
    let config = outcome.config.unwrap();
    assert_eq!(config.name, "rs0");
    assert_eq!(config.members.len(), 1);
    assert_eq!(config.members[0].id, 0);
    assert_eq!(cluster.mock().history(), vec![Command::Initiate(None)]);
    Ok(())
}

#[test(tokio::test(start_paused = true))]
async fn initiate_is_idempotent() -> Result<()> {
    let cluster = Cluster::fresh();
    cluster.apply(json!({ "state": "initiated" })).await?;

    let outcome = cluster.apply(json!({ "state": "initiated" })).await?;
    assert!(!outcome.changed);
    assert_eq!(outcome.config, cluster.mock().config());
    assert_eq!(cluster.mock().history().len(), 1);
    Ok(())
}

#[test(tokio::test(start_paused = true))]
async fn initiate_with_member() -> Result<()> {
    let cluster = Cluster::fresh();

    let outcome = cluster
        .apply(json!({
            "state": "initiated",
            "member": "localhost",
            "replica_set": "rs0",
            "priority": 2,
        }))
        .await?;
    assert!(outcome.changed);
    assert_eq!(cluster.hosts(), vec![LOCAL_HOST.to_string()]);

    let history = cluster.mock().history();
    let Command::Initiate(Some(sent)) = &history[0] else {
        panic!("unexpected history {history:?}");
    };
    assert_eq!(sent.version, 1);
    assert_eq!(sent.members[0].id, 0);
    assert_eq!(sent.members[0].priority, Some(2.0));
    assert_eq!(sent.members[0].votes, None);
    Ok(())
}

#[test(tokio::test(start_paused = true))]
async fn initiate_member_needs_replica_set() -> Result<()> {
    let cluster = Cluster::fresh();

    let e = cluster
        .apply(json!({ "state": "initiated", "member": "localhost" }))
        .await
        .unwrap_err();
    assert!(matches!(
        e.downcast_ref::<Error>(),
        Some(Error::InvalidParameter(_))
    ));
    // Rejected before talking to the server.
    assert_eq!(cluster.mock().calls(), 0);
    Ok(())
}

#[test(tokio::test(start_paused = true))]
async fn initiated_node_is_left_alone() -> Result<()> {
    let cluster = Cluster::single();

    let outcome = cluster
        .apply(json!({ "state": "initiated", "member": "db1", "replica_set": "rs0" }))
        .await?;
    assert!(!outcome.changed);
    assert_eq!(cluster.hosts(), vec![LOCAL_HOST.to_string()]);
    assert!(cluster.mock().history().is_empty());
    Ok(())
}

#[test(tokio::test(start_paused = true))]
async fn server_rejects_initiate() -> Result<()> {
    let cluster = Cluster::fresh();

    // The node is not part of the config it is asked to initiate.
    let report = cluster
        .report(json!({ "state": "initiated", "member": "db1", "replica_set": "rs0" }))
        .await;
    assert!(report.failed);
    assert!(!report.changed);
    assert!(report.msg.unwrap().contains("code=74"));
    assert_eq!(cluster.version(), None);
    Ok(())
}

#[test(tokio::test(start_paused = true))]
async fn primary_elected_late() -> Result<()> {
    let cluster = Cluster::fresh();
    cluster.mock().set_election_polls(3);

    let start = tokio::time::Instant::now();
    let outcome = cluster.apply(json!({ "state": "initiated" })).await?;
    assert!(outcome.changed);
    assert_eq!(start.elapsed().as_secs(), 3);
    Ok(())
}

#[test(tokio::test(start_paused = true))]
async fn primary_never_elected() -> Result<()> {
    let cluster = Cluster::fresh();
    cluster.mock().set_election_polls(3);

    let e = cluster
        .apply(json!({ "state": "initiated", "timeout": 2 }))
        .await
        .unwrap_err();
    assert_eq!(
        e.to_string(),
        "reached timeout while waiting for rs.status() to become ok=1"
    );
    // The command itself went through.
    assert_eq!(cluster.version(), Some(1));
    Ok(())
}
