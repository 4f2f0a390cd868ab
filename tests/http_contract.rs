#![cfg(feature = "native")]

mod support;

use support::{spawn_stub_server, EMAIL, PASSWORD};
use tally::{
    AuthClient, AuthOutcome, ClientConfig, DashboardClient, DeleteOutcome, Endpoints, ExpenseId,
    ExportFormat, HeadlessBrowser, HeadlessCharts, HeadlessModal, ReportsClient,
    ReqwestTransport,
};

fn config(base_url: &str) -> ClientConfig {
    let mut config = ClientConfig::default();
    config.server.base_url = base_url.to_string();
    config.server.request_timeout_secs = Some(10);
    config
}

fn auth(
    config: &ClientConfig,
    browser: &HeadlessBrowser,
    transport: &ReqwestTransport,
) -> AuthClient<HeadlessBrowser, ReqwestTransport> {
    AuthClient::new(browser.clone(), transport.clone(), Endpoints::from_config(config))
}

#[tokio::test]
async fn sign_in_follows_server_redirect_target() {
    let config = config(&spawn_stub_server().await);
    let transport = ReqwestTransport::new(&config.server).unwrap();
    let browser = HeadlessBrowser::new();

    let outcome = auth(&config, &browser, &transport).sign_in(EMAIL, PASSWORD).await;

    assert_eq!(outcome, AuthOutcome::Navigated("/dashboard".to_string()));
    assert_eq!(browser.navigations(), vec!["/dashboard".to_string()]);
}

#[tokio::test]
async fn error_bodies_are_read_from_non_2xx_responses() {
    let config = config(&spawn_stub_server().await);
    let transport = ReqwestTransport::new(&config.server).unwrap();
    let browser = HeadlessBrowser::new();
    let client = auth(&config, &browser, &transport);

    assert_eq!(
        client.sign_in(EMAIL, "wrong").await,
        AuthOutcome::Failed("Invalid email or password".to_string())
    );
    assert_eq!(
        client.register(EMAIL, "anything").await,
        AuthOutcome::Failed("Email already registered".to_string())
    );
    assert!(browser.navigations().is_empty());
    assert_eq!(browser.alerts().len(), 2);
}

#[tokio::test]
async fn sign_out_detects_http_redirect() {
    let base_url = spawn_stub_server().await;
    let config = config(&base_url);
    let transport = ReqwestTransport::new(&config.server).unwrap();
    let browser = HeadlessBrowser::new();

    let outcome = auth(&config, &browser, &transport).sign_out().await;

    assert_eq!(outcome, AuthOutcome::Navigated(format!("{}/", base_url)));
}

#[tokio::test]
async fn password_reset_round_trip() {
    let config = config(&spawn_stub_server().await);
    let transport = ReqwestTransport::new(&config.server).unwrap();
    let browser = HeadlessBrowser::new();

    let outcome = auth(&config, &browser, &transport)
        .request_password_reset(EMAIL)
        .await;

    assert_eq!(
        outcome,
        AuthOutcome::Notified(
            "Password reset instructions have been sent to your email".to_string()
        )
    );
}

#[tokio::test]
async fn delete_uses_the_session_cookie() {
    let config = config(&spawn_stub_server().await);
    let transport = ReqwestTransport::new(&config.server).unwrap();
    let browser = HeadlessBrowser::new();
    let modal = HeadlessModal::default();
    let dashboard = DashboardClient::new(
        browser.clone(),
        transport.clone(),
        modal.clone(),
        HeadlessCharts,
        Endpoints::from_config(&config),
    );

    dashboard.on_delete_click(Some(ExpenseId::new("17")));
    assert_eq!(
        dashboard.confirm_delete().await,
        DeleteOutcome::Rejected("Error deleting expense: Not signed in".to_string())
    );
    assert!(modal.is_open());

    auth(&config, &browser, &transport).sign_in(EMAIL, PASSWORD).await;

    assert_eq!(dashboard.confirm_delete().await, DeleteOutcome::Reloaded);
    assert!(!modal.is_open());
    assert_eq!(browser.reloads(), 1);

    dashboard.on_delete_click(Some(ExpenseId::new("404")));
    assert_eq!(
        dashboard.confirm_delete().await,
        DeleteOutcome::Rejected("Error deleting expense: Expense not found".to_string())
    );
}

#[tokio::test]
async fn export_download_carries_format_and_period() {
    let config = config(&spawn_stub_server().await);
    let transport = ReqwestTransport::new(&config.server).unwrap();
    let browser = HeadlessBrowser::new();
    auth(&config, &browser, &transport).sign_in(EMAIL, PASSWORD).await;

    let reports = ReportsClient::new(
        HeadlessBrowser::new().with_query("?period=year"),
        HeadlessCharts,
        Endpoints::from_config(&config),
    );
    let url = reports.export(&ExportFormat::new("csv"));
    let body = transport.fetch_bytes(&url).await.unwrap();

    assert_eq!(String::from_utf8(body).unwrap(), "format,period\ncsv,year\n");
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let config = config("http://127.0.0.1:9");
    let transport = ReqwestTransport::new(&config.server).unwrap();
    let browser = HeadlessBrowser::new();

    match auth(&config, &browser, &transport).sign_in(EMAIL, PASSWORD).await {
        AuthOutcome::Failed(message) => assert!(message.starts_with("Login error: ")),
        other => panic!("unexpected outcome: {:?}", other),
    }
}
