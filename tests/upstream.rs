//! End-to-end tests: real listener, upstream-backed route groups.

use std::net::SocketAddr;
use std::sync::atomic::Ordering;
use std::time::Duration;

use chatbot_gateway::config::{parse_config, GatewayConfig};
use chatbot_gateway::lifecycle::startup::assemble;
use chatbot_gateway::{GatewayServer, LiveGateway, Shutdown};

mod common;

fn config_for(chat: SocketAddr, dashboard: SocketAddr) -> GatewayConfig {
    parse_config(&format!(
        r#"
        [[groups]]
        name = "chat"
        upstream = "http://{chat}"
        routes = [
            {{ method = "POST", path = "/send" }},
            {{ method = "GET", path = "/sessions" }},
        ]

        [[groups]]
        name = "dashboard"
        upstream = "http://{dashboard}"
        routes = [
            {{ method = "GET", path = "/dashboard/stats" }},
            {{ method = "GET", path = "/dashboard/user/{{user_id}}" }},
        ]
        "#
    ))
    .unwrap()
}

async fn start_gateway(config: &GatewayConfig, shutdown: &Shutdown) -> SocketAddr {
    let live = LiveGateway::new(assemble(config).unwrap());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = GatewayServer::new(live).run(listener, server_shutdown).await;
    });
    tokio::time::sleep(Duration::from_millis(100)).await;
    addr
}

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_declared_routes_reach_their_upstream() {
    let (chat_addr, chat_served) = common::start_echo_upstream().await;
    let (dash_addr, dash_served) = common::start_echo_upstream().await;
    let shutdown = Shutdown::new();
    let gateway = start_gateway(&config_for(chat_addr, dash_addr), &shutdown).await;

    let res = client()
        .post(format!("http://{gateway}/api/v1/chat/send?lang=fr"))
        .send()
        .await
        .expect("gateway unreachable");
    assert_eq!(res.status(), 200);
    assert_eq!(res.headers()["x-upstream"], "echo");
    assert_eq!(
        res.text().await.unwrap(),
        "POST /api/v1/chat/send?lang=fr HTTP/1.1"
    );

    let res = client()
        .get(format!("http://{gateway}/api/v1/chat/dashboard/user/7"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(
        res.text().await.unwrap(),
        "GET /api/v1/chat/dashboard/user/7 HTTP/1.1"
    );

    assert_eq!(chat_served.load(Ordering::SeqCst), 1);
    assert_eq!(dash_served.load(Ordering::SeqCst), 1);

    shutdown.trigger();
}

#[tokio::test]
async fn test_undeclared_routes_stay_in_gateway() {
    let (chat_addr, chat_served) = common::start_echo_upstream().await;
    let (dash_addr, dash_served) = common::start_echo_upstream().await;
    let shutdown = Shutdown::new();
    let gateway = start_gateway(&config_for(chat_addr, dash_addr), &shutdown).await;

    for path in ["/api/v1/chat/admin", "/send", "/api/v1/dashboard/stats"] {
        let res = client()
            .get(format!("http://{gateway}{path}"))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), 404, "{path}");
    }

    let res = client()
        .get(format!("http://{gateway}/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(
        res.json::<serde_json::Value>().await.unwrap(),
        serde_json::json!({ "status": "ok" })
    );

    assert_eq!(chat_served.load(Ordering::SeqCst), 0);
    assert_eq!(dash_served.load(Ordering::SeqCst), 0);

    shutdown.trigger();
}

#[tokio::test]
async fn test_unreachable_upstream_is_bad_gateway_but_health_is_ok() {
    let down = common::closed_port().await;
    let shutdown = Shutdown::new();
    let gateway = start_gateway(&config_for(down, down), &shutdown).await;

    let res = client()
        .get(format!("http://{gateway}/api/v1/chat/sessions"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 502);

    let res = client()
        .get(format!("http://{gateway}/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    shutdown.trigger();
}

#[tokio::test]
async fn test_preflight_from_dashboard_origin() {
    let (chat_addr, chat_served) = common::start_echo_upstream().await;
    let shutdown = Shutdown::new();
    let gateway = start_gateway(&config_for(chat_addr, chat_addr), &shutdown).await;

    let res = client()
        .request(
            reqwest::Method::OPTIONS,
            format!("http://{gateway}/api/v1/chat/send"),
        )
        .header("origin", "https://v0-dynamic-api-dashboard.vercel.app")
        .header("access-control-request-method", "POST")
        .send()
        .await
        .unwrap();

    assert!(res.status().is_success());
    assert_eq!(
        res.headers()["access-control-allow-origin"],
        "https://v0-dynamic-api-dashboard.vercel.app"
    );
    assert_eq!(chat_served.load(Ordering::SeqCst), 0);

    shutdown.trigger();
}
