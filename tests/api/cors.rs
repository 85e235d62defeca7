use crate::helpers::spawn_app;

const CORS_HEADERS: [(&str, &str); 4] = [
    ("access-control-allow-origin", "*"),
    ("access-control-allow-credentials", "true"),
    (
        "access-control-allow-methods",
        "GET,OPTIONS,PATCH,DELETE,POST,PUT",
    ),
    (
        "access-control-allow-headers",
        "X-CSRF-Token, X-Requested-With, Accept, Accept-Version, Content-Length, \
         Content-MD5, Content-Type, Date, X-Api-Version",
    ),
];

fn assert_cors_headers(response: &reqwest::Response) {
    for (name, expected) in CORS_HEADERS {
        let value = response
            .headers()
            .get(name)
            .unwrap_or_else(|| panic!("Missing header {}", name));
        assert_eq!(value.to_str().unwrap(), expected, "Wrong value for {}", name);
    }
}

#[tokio::test]
async fn preflight_returns_an_empty_200_with_cors_headers() {
    let app = spawn_app().await;

    let response = app.request_subscriptions(reqwest::Method::OPTIONS).await;

    assert_eq!(200, response.status().as_u16());
    assert_cors_headers(&response);
    assert_eq!("", response.text().await.unwrap());
}

#[tokio::test]
async fn preflight_on_the_newsletter_path_returns_an_empty_200_with_cors_headers() {
    let app = spawn_app().await;

    let response = app
        .request_path(reqwest::Method::OPTIONS, "/api/newsletter")
        .await;

    assert_eq!(200, response.status().as_u16());
    assert_cors_headers(&response);
    assert_eq!("", response.text().await.unwrap());
}

#[tokio::test]
async fn cors_headers_are_present_on_success_and_error_responses() {
    let app = spawn_app().await;

    let accepted = app.post_subscriptions(r#"{"email":"a@b.com"}"#.into()).await;
    assert_eq!(200, accepted.status().as_u16());
    assert_cors_headers(&accepted);

    let rejected = app.post_subscriptions(r#"{"email":"nope"}"#.into()).await;
    assert_eq!(400, rejected.status().as_u16());
    assert_cors_headers(&rejected);

    let not_allowed = app.request_subscriptions(reqwest::Method::GET).await;
    assert_eq!(405, not_allowed.status().as_u16());
    assert_cors_headers(&not_allowed);
}
