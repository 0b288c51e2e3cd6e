mod common;

use common::{challenge_body, claim_body, fast_config, MockWallet};
use miden_spammer::account::{Account, Visibility};
use miden_spammer::config::{MidenConfig, TaskKind};
use miden_spammer::wallet::WalletOperation;
use miden_spammer::Orchestrator;
use std::fs;
use std::sync::Arc;
use tempfile::tempdir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const NOTE: &str = "0x2222222222222222222222222222222222222222222222222222222222222222";

#[tokio::test]
async fn faucet_only_run_claims_once_per_account() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pow"))
        .respond_with(ResponseTemplate::new(200).set_body_json(challenge_body(1)))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/get_tokens"))
        .respond_with(ResponseTemplate::new(200).set_body_string(claim_body(NOTE)))
        .expect(2)
        .mount(&server)
        .await;

    let config = MidenConfig {
        tasks: vec![TaskKind::Faucet],
        ..fast_config(&server.uri())
    };
    let wallet = Arc::new(MockWallet::default());
    let orchestrator = Orchestrator::new(config, wallet.clone()).unwrap();

    let accounts = vec![
        Account::new("acct-1", Visibility::Private, "clients/private/client_1"),
        Account::new("acct-2", Visibility::Public, "clients/public/client_1"),
    ];
    let all_ids = vec!["acct-1".to_string(), "acct-2".to_string()];
    let summary = orchestrator.run_accounts(accounts, &all_ids).await;

    assert_eq!(summary.workers, 2);
    assert_eq!(summary.totals.success, 2);
    assert_eq!(summary.totals.total(), 2);
    assert!(summary.failed_workers.is_empty());

    for id in ["acct-1", "acct-2"] {
        let ops = wallet.ops_for(id);
        assert_eq!(ops.len(), 2, "{id}: {ops:?}");
        assert_eq!(ops[0], WalletOperation::Sync);
        assert!(matches!(ops[1], WalletOperation::Consume { .. }));
    }
    assert_eq!(wallet.count("send"), 0);
}

#[tokio::test]
async fn failed_claims_do_not_stop_the_run() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pow"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let config = MidenConfig {
        tasks: vec![TaskKind::Faucet],
        max_cycles: 2,
        ..fast_config(&server.uri())
    };
    let wallet = Arc::new(MockWallet::default());
    let orchestrator = Orchestrator::new(config, wallet.clone()).unwrap();

    let accounts = vec![Account::new("acct-1", Visibility::Private, "c1")];
    let summary = orchestrator
        .run_accounts(accounts, &["acct-1".to_string()])
        .await;

    assert_eq!(summary.totals.failed, 2);
    assert!(summary.failed_workers.is_empty());
    assert!(wallet.ops().is_empty());
}

#[tokio::test]
async fn recipient_pools_exclude_self() {
    let wallet = Arc::new(MockWallet::default());
    let orchestrator = Orchestrator::new(fast_config("http://127.0.0.1:9"), wallet).unwrap();
    let all_ids: Vec<String> = ["A", "B", "C"].iter().map(|s| s.to_string()).collect();
    let accounts = all_ids
        .iter()
        .map(|id| Account::new(id.clone(), Visibility::Public, id.as_str()))
        .collect();

    let spammers = orchestrator.build_spammers(accounts, &all_ids);

    let pools: Vec<Vec<String>> = spammers
        .iter()
        .map(|s| (*s.context().recipients).clone())
        .collect();
    assert_eq!(pools[1], vec!["A".to_string(), "C".to_string()]);
    assert_eq!(pools[0], vec!["B".to_string(), "C".to_string()]);
}

#[tokio::test]
async fn discovery_pairs_directories_with_saved_ids() {
    let dir = tempdir().unwrap();
    let clients = dir.path().join("clients");
    fs::create_dir_all(clients.join("private/client_1")).unwrap();
    fs::create_dir_all(clients.join("private/client_2")).unwrap();
    fs::create_dir_all(clients.join("public/client_1")).unwrap();
    fs::write(dir.path().join("private.txt"), "priv-1\npriv-2\n").unwrap();
    fs::write(dir.path().join("public.txt"), "pub-1\n\n").unwrap();

    let config = MidenConfig {
        clients_dir: clients.clone(),
        private_accounts_file: dir.path().join("private.txt"),
        public_accounts_file: dir.path().join("public.txt"),
        ..fast_config("http://127.0.0.1:9")
    };
    let orchestrator = Orchestrator::new(config, Arc::new(MockWallet::default())).unwrap();

    let (accounts, all_ids) = orchestrator.discover();

    let ids: Vec<&str> = accounts.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec!["priv-1", "priv-2", "pub-1"]);
    assert_eq!(accounts[1].workdir, clients.join("private").join("client_2"));
    assert_eq!(accounts[2].visibility, Visibility::Public);
    assert_eq!(all_ids, vec!["priv-1", "priv-2", "pub-1"]);
}

#[tokio::test]
async fn run_without_accounts_is_empty() {
    let dir = tempdir().unwrap();
    let config = MidenConfig {
        clients_dir: dir.path().join("clients"),
        private_accounts_file: dir.path().join("none-private.txt"),
        public_accounts_file: dir.path().join("none-public.txt"),
        ..fast_config("http://127.0.0.1:9")
    };
    let orchestrator = Orchestrator::new(config, Arc::new(MockWallet::default())).unwrap();

    let summary = orchestrator.run().await;

    assert_eq!(summary.workers, 0);
    assert_eq!(summary.totals.total(), 0);
}
