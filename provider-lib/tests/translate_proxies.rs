use std::{collections::HashMap, sync::Arc};

use provider_lib::{
    AnyHandler, DialerOptions, DomainStrategy, Error, FeatureSet,
    OutboundProxyProtocol, ThreadSafeFeatureRegistry,
};
use serde::Deserialize;

static PROVIDER: &str = r#"
proxies:
  - name: trojan-tcp
    type: trojan
    server: t.example.com
    port: 443
    password: secret
    udp: true
  - name: trojan-ws
    type: trojan
    server: t.example.com
    port: 443
    password: secret
    sni: cdn.example.com
    network: ws
    ws-opts:
      path: /ws
    ip-version: ipv4-prefer
  - type: trojan
    server: 10.0.0.1
    port: 8443
    password: secret
    network: grpc
    grpc-opts:
      grpc-service-name: tunnel
  - name: trojan-flow
    type: trojan
    server: t.example.com
    port: 443
    password: secret
    flow: xtls-rprx-direct
  - name: trojan-ws-broken
    type: trojan
    server: t.example.com
    port: 443
    password: secret
    network: ws
  - name: trojan-utls
    type: trojan
    server: t.example.com
    port: 443
    password: secret
    client-fingerprint: chrome
  - name: ss
    type: ss
    server: s.example.com
    port: 8388
    cipher: aes-256-gcm
    password: pw
    udp: true
  - name: vmess
    type: vmess
    server: v.example.com
    port: 443
    uuid: 00000000-0000-0000-0000-000000000000
    alterId: 0
    cipher: auto
    tls: true
  - name: socks
    type: socks5
    server: 127.0.0.1
    port: 1080
"#;

#[derive(Deserialize)]
struct ProviderDoc {
    proxies: Vec<HashMap<String, serde_yaml::Value>>,
}

fn load(features: ThreadSafeFeatureRegistry) -> Vec<AnyHandler> {
    let doc: ProviderDoc = serde_yaml::from_str(PROVIDER).unwrap();
    doc.proxies
        .into_iter()
        .map(|x| {
            let proto = OutboundProxyProtocol::try_from(x).unwrap();
            let mut handler = AnyHandler::new(proto, features.clone());
            handler.bind_dialer_policy(DialerOptions {
                detour: Some("direct".to_owned()),
                ..Default::default()
            });
            handler
        })
        .collect()
}

#[test]
fn test_translate_provider() {
    let handlers = load(Arc::new(FeatureSet::new()));
    let tags: Vec<_> = handlers.iter().map(|h| h.tag()).collect();
    assert_eq!(
        tags,
        vec![
            "trojan-tcp",
            "trojan-ws",
            "10.0.0.1:8443",
            "trojan-flow",
            "trojan-ws-broken",
            "trojan-utls",
            "ss",
            "vmess",
            "socks",
        ]
    );

    let results: HashMap<_, _> = handlers
        .iter()
        .map(|h| (h.tag().to_owned(), h.generate()))
        .collect();

    assert!(matches!(
        results["trojan-flow"],
        Err(Error::UnsupportedFeature(_))
    ));
    assert!(matches!(
        results["trojan-ws-broken"],
        Err(Error::MissingSubOptions("ws-opts"))
    ));
    assert!(matches!(
        results["trojan-utls"],
        Err(Error::MissingBuildFeature { .. })
    ));

    let ws = results["trojan-ws"].as_ref().unwrap();
    assert_eq!(
        ws.dialer_options().domain_strategy,
        Some(DomainStrategy::PreferIpv4)
    );
    assert_eq!(
        serde_json::to_value(ws).unwrap(),
        serde_json::json!({
            "tag": "trojan-ws",
            "type": "trojan",
            "server": "t.example.com",
            "server_port": 443,
            "password": "secret",
            "network": "tcp",
            "tls": {"enabled": true, "server_name": "cdn.example.com"},
            "transport": {
                "type": "ws",
                "path": "/ws",
                "headers": {"Host": "cdn.example.com"},
            },
            "detour": "direct",
            "domain_strategy": "prefer_ipv4",
        })
    );

    let grpc = results["10.0.0.1:8443"].as_ref().unwrap();
    assert_eq!(
        serde_json::to_value(grpc).unwrap()["transport"],
        serde_json::json!({"type": "grpc", "service_name": "tunnel"})
    );

    let outbound_types: Vec<_> = ["trojan-tcp", "ss", "vmess", "socks"]
        .into_iter()
        .map(|tag| results[tag].as_ref().unwrap().protocol_type())
        .collect();
    assert_eq!(
        outbound_types,
        vec!["trojan", "shadowsocks", "vmess", "socks"]
    );
    for tag in ["trojan-tcp", "ss", "vmess", "socks"] {
        assert_eq!(
            results[tag].as_ref().unwrap().dialer_options().detour.as_deref(),
            Some("direct")
        );
    }
}

#[test]
fn test_translate_provider_with_utls() {
    let handlers = load(Arc::new(
        FeatureSet::new().enable("client-hello-impersonation"),
    ));
    let utls = handlers
        .iter()
        .find(|h| h.tag() == "trojan-utls")
        .unwrap()
        .generate()
        .unwrap();
    assert_eq!(
        serde_json::to_value(utls).unwrap()["tls"]["utls"],
        serde_json::json!({"enabled": true, "fingerprint": "chrome"})
    );
}

#[test]
fn test_raw_labels() {
    let handlers = load(Arc::new(FeatureSet::new()));
    let labels: Vec<_> = handlers
        .iter()
        .map(|h| (h.raw_protocol_label(), h.protocol_type()))
        .collect();
    assert!(labels.contains(&("ss", "shadowsocks")));
    assert!(labels.contains(&("socks5", "socks")));
    assert!(labels.contains(&("trojan", "trojan")));
}
