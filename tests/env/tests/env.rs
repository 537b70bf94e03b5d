use anyhow::Result;
use env::{Command, MockCluster, LOCAL_HOST};
use replset::admin::ReplicaSetAdmin;
use replset::member::MemberHost;
use replset::status::MemberState;
use replset::Error;
use test_log::test;

fn code_of(e: &anyhow::Error) -> Option<i32> {
    match e.downcast_ref::<Error>() {
        Some(Error::OperationFailure { code, .. }) => Some(*code),
        _ => None,
    }
}

#[test(tokio::test)]
async fn fresh_node_has_no_config() -> Result<()> {
    let cluster = MockCluster::new("rs0");
    assert_eq!(cluster.set_name().await?, None);
    assert_eq!(cluster.get_config().await?, None);
    assert!(!cluster.status().await?.is_ok());
    assert_eq!(cluster.calls(), 3);
    Ok(())
}

#[test(tokio::test)]
async fn initiate_once() -> Result<()> {
    let cluster = MockCluster::new("rs0");
    cluster.initiate(None).await?;

    let config = cluster.config().unwrap();
    assert_eq!(config.name, "rs0");
    assert_eq!(config.members.len(), 1);
    assert_eq!(config.members[0].host, LOCAL_HOST);

    let e = cluster.initiate(None).await.unwrap_err();
    assert_eq!(code_of(&e), Some(23));
    assert_eq!(cluster.history(), vec![Command::Initiate(None)]);
    Ok(())
}

#[test(tokio::test)]
async fn initiate_with_wrong_name() -> Result<()> {
    let cluster = MockCluster::new("rs0");
    let config = MockCluster::initiated("other").config().unwrap();

    let e = cluster.initiate(Some(&config)).await.unwrap_err();
    assert_eq!(code_of(&e), Some(93));
    assert!(cluster.config().is_none());
    Ok(())
}

#[test(tokio::test)]
async fn reconfig_needs_next_version() -> Result<()> {
    let cluster = MockCluster::initiated("rs0");
    let mut config = cluster.config().unwrap();

    let e = cluster.reconfigure(&config).await.unwrap_err();
    assert_eq!(code_of(&e), Some(103));

    config.version += 1;
    cluster.reconfigure(&config).await?;
    assert_eq!(cluster.config().unwrap().version, 2);
    Ok(())
}

#[test(tokio::test)]
async fn rejected_and_dropped_reconfigs() -> Result<()> {
    let cluster = MockCluster::initiated("rs0");
    cluster.reject_reconfigs(1);
    cluster.drop_next_reconfig();

    let mut config = cluster.config().unwrap();
    config.version += 1;

    let e = cluster.reconfigure(&config).await.unwrap_err();
    assert_eq!(code_of(&e), Some(10107));
    assert_eq!(cluster.config().unwrap().version, 1);

    let e = cluster.reconfigure(&config).await.unwrap_err();
    assert!(Error::is_connection_lost(&e));
    // Applied all the same.
    assert_eq!(cluster.config().unwrap().version, 2);
    Ok(())
}

#[test(tokio::test)]
async fn member_states() -> Result<()> {
    let cluster = MockCluster::initiated("rs0");
    cluster.set_catch_up_polls(1);
    cluster.unreachable_for("db2:27017", 1);

    let db1 = MemberHost::parse("db1")?;
    let db2 = MemberHost::parse("db2")?;
    let mut config = cluster.config().unwrap();
    config.add_member(replset::config::MemberConfig::new(1, db1.as_str()));
    // One reconfiguration, one version bump.
    config.members.push(replset::config::MemberConfig::new(2, db2.as_str()));
    cluster.reconfigure(&config).await?;

    let status = cluster.status().await?;
    assert_eq!(status.my_state, Some(MemberState::Primary));
    assert_eq!(status.member(&db1).unwrap().state, MemberState::Startup2);
    assert_eq!(status.member(&db2).unwrap().state, MemberState::Down);

    assert!(cluster.probe(&db2).await.is_err());
    cluster.probe(&db2).await?;

    let status = cluster.status().await?;
    assert!(status.is_member_ready(&db1));
    assert_eq!(status.member(&db2).unwrap().state, MemberState::Startup2);
    Ok(())
}

#[test(tokio::test)]
async fn election_delay() -> Result<()> {
    let cluster = MockCluster::new("rs0");
    cluster.set_election_polls(2);
    cluster.initiate(None).await?;

    assert!(!cluster.status().await?.is_primary_ready());
    assert!(!cluster.status().await?.is_primary_ready());
    assert!(cluster.status().await?.is_primary_ready());
    Ok(())
}
