use std::io::Write as _;

use serde_json::json;
use statusd_service::services::node_manager::NodeManager as _;
use statusd_types::{
    RpcMethod, RpcRequest,
    api::{AccountArgs, AccountReply, ConfigArgs, NoArgs, NoReply, StringsReply},
};

use crate::setup::{TestNode, node_config};


#[tokio::test]
async fn test_health_route() -> eyre::Result<()> {
    let node = TestNode::start().await?;
    assert!(node.started_services.all_started());
    let result = node.server.get("/health").await;
    result.assert_status_ok();
    result.assert_text("healthy");
    result.assert_header("cache-control", "no-cache");
    Ok(())
}

#[tokio::test]
async fn test_health_route_not_ready() -> eyre::Result<()> {
    let node = TestNode::start().await?;
    let _not_started_service = node.started_services.new_service();
    let result = node.server.get("/health").expect_failure().await;
    result.assert_status_service_unavailable();
    result.assert_text("starting");
    Ok(())
}

#[tokio::test]
async fn test_version() -> eyre::Result<()> {
    let node = TestNode::start().await?;
    let result = node.server.get("/version").await;
    result.assert_status_ok();
    result.assert_text(nodes_common::version_info!());
    Ok(())
}

#[tokio::test]
async fn test_get_addresses() -> eyre::Result<()> {
    let node = TestNode::start().await?;
    let reply = node
        .call::<_, StringsReply>(RpcMethod::GetAddresses, &NoArgs {})
        .await
        .expect("can list interfaces");
    assert!(!reply.strings.is_empty());
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_account_flow() -> eyre::Result<()> {
    let node = TestNode::start().await?;
    node.call::<_, NoReply>(
        RpcMethod::StartNode,
        &ConfigArgs {
            config: node_config(1),
        },
    )
    .await
    .expect("can start node");
    assert!(node.node_manager.is_running());

    let created = node
        .call::<_, AccountReply>(
            RpcMethod::CreateAccount,
            &AccountArgs {
                password: "pw123".to_owned(),
                ..Default::default()
            },
        )
        .await
        .expect("can create account");
    assert!(!created.address.is_empty());
    assert!(!created.public_key.is_empty());
    assert_eq!(created.mnemonic.split_whitespace().count(), 12);

    node.call::<_, NoReply>(
        RpcMethod::SelectAccount,
        &AccountArgs {
            address: created.address.clone(),
            password: "pw123".to_owned(),
        },
    )
    .await
    .expect("can select account");
    let messaging = node.backend.provider().messaging()?;
    assert!(messaging.has_identity(&created.public_key));

    node.call::<_, NoReply>(RpcMethod::Logout, &NoArgs {})
        .await
        .expect("can logout");
    assert!(messaging.identities().is_empty());

    node.call::<_, NoReply>(RpcMethod::StopNode, &NoArgs {})
        .await
        .expect("can stop node");
    assert!(!node.node_manager.is_running());
    Ok(())
}

#[tokio::test]
async fn test_invalid_configuration() -> eyre::Result<()> {
    let node = TestNode::start().await?;
    let err = node
        .call::<_, NoReply>(
            RpcMethod::StartNode,
            &ConfigArgs {
                config: r#"{"NetworkId": 1}"#.to_owned(),
            },
        )
        .await
        .expect_err("config is invalid");
    assert!(err.contains("invalid configuration"), "{err}");
    assert!(!node.node_manager.is_running());

    let err = node
        .call::<_, NoReply>(
            RpcMethod::StartNode,
            &ConfigArgs {
                config: "invalid json".to_owned(),
            },
        )
        .await
        .expect_err("config is not json");
    assert!(err.starts_with("invalid configuration: "), "{err}");
    assert!(!node.node_manager.is_running());
    Ok(())
}

#[tokio::test]
async fn test_start_twice() -> eyre::Result<()> {
    let node = TestNode::start().await?;
    let args = ConfigArgs {
        config: node_config(1),
    };
    node.call::<_, NoReply>(RpcMethod::StartNode, &args)
        .await
        .expect("can start node");
    let err = node
        .call::<_, NoReply>(RpcMethod::StartNode, &args)
        .await
        .expect_err("node is running");
    assert_eq!(err, "node is already running");
    Ok(())
}

#[tokio::test]
async fn test_stop_never_started() -> eyre::Result<()> {
    let node = TestNode::start().await?;
    let err = node
        .call::<_, NoReply>(RpcMethod::StopNode, &NoArgs {})
        .await
        .expect_err("node never started");
    assert_eq!(err, "node is not running");
    Ok(())
}

#[tokio::test]
async fn test_select_account_errors() -> eyre::Result<()> {
    let node = TestNode::start().await?;
    node.call::<_, NoReply>(
        RpcMethod::StartNode,
        &ConfigArgs {
            config: node_config(1),
        },
    )
    .await
    .expect("can start node");
    let created = node
        .call::<_, AccountReply>(
            RpcMethod::CreateAccount,
            &AccountArgs {
                password: "pw123".to_owned(),
                ..Default::default()
            },
        )
        .await
        .expect("can create account");

    let err = node
        .call::<_, NoReply>(
            RpcMethod::SelectAccount,
            &AccountArgs {
                address: created.address,
                password: "wrong".to_owned(),
            },
        )
        .await
        .expect_err("wrong password");
    assert_eq!(err, "invalid credentials");

    let unknown = "0x0000000000000000000000000000000000000042";
    let err = node
        .call::<_, NoReply>(
            RpcMethod::SelectAccount,
            &AccountArgs {
                address: unknown.to_owned(),
                password: "pw123".to_owned(),
            },
        )
        .await
        .expect_err("unknown address");
    assert_eq!(err, format!("unknown address: {unknown}"));
    Ok(())
}

#[tokio::test]
async fn test_create_account_without_node() -> eyre::Result<()> {
    let node = TestNode::start().await?;
    let err = node
        .call::<_, AccountReply>(
            RpcMethod::CreateAccount,
            &AccountArgs {
                password: "pw".to_owned(),
                ..Default::default()
            },
        )
        .await
        .expect_err("no node is running");
    assert!(err.starts_with("could not create account"), "{err}");
    Ok(())
}

#[tokio::test]
async fn test_unknown_method() -> eyre::Result<()> {
    let node = TestNode::start().await?;
    let response = node
        .call_raw(&RpcRequest {
            method: "Status.Reboot".to_owned(),
            params: vec![],
            id: json!("abc"),
        })
        .await;
    assert_eq!(
        response.error.as_deref(),
        Some("rpc: can't find method Status.Reboot")
    );
    assert!(response.result.is_null());
    Ok(())
}

#[tokio::test]
async fn test_invalid_params() -> eyre::Result<()> {
    let node = TestNode::start().await?;
    let response = node
        .call_raw(&RpcRequest {
            method: RpcMethod::SelectAccount.as_str().to_owned(),
            params: vec![json!("not an object")],
            id: json!(2),
        })
        .await;
    let err = response.error.expect("params are invalid");
    assert!(err.starts_with("invalid params"), "{err}");
    Ok(())
}

#[tokio::test]
async fn test_autostart_from_node_config() -> eyre::Result<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    file.write_all(node_config(7).as_bytes())?;
    let node = TestNode::start_with_node_config(Some(file.path().to_path_buf())).await?;
    assert_eq!(node.backend.provider().node()?.config().network_id, 7);
    assert!(node.started_services.all_started());

    let err = node
        .call::<_, NoReply>(
            RpcMethod::StartNode,
            &ConfigArgs {
                config: node_config(7),
            },
        )
        .await
        .expect_err("node is running");
    assert_eq!(err, "node is already running");
    Ok(())
}

#[tokio::test]
async fn test_autostart_with_invalid_node_config() -> eyre::Result<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    file.write_all(b"{}")?;
    let result = TestNode::start_with_node_config(Some(file.path().to_path_buf())).await;
    let err = result.err().expect("config is invalid");
    assert!(format!("{err:?}").contains("while parsing node config"));
    Ok(())
}
