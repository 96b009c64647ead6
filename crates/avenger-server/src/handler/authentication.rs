//! Registration and login handlers.

use axum::Router;
use axum::extract::State;
use axum::routing::post;

use crate::extract::Json;
use crate::handler::Result;
use crate::handler::response::{Envelope, Login, User};
use crate::service::{LoginPayload, RegisterPayload, ServiceState, UserService};
use crate::utility::tracing_targets::TRACING_TARGET_AUTHENTICATION;

/// Registers a new user account.
#[tracing::instrument(skip_all)]
async fn register(
    State(users): State<UserService>,
    Json(payload): Json<RegisterPayload>,
) -> Result<Envelope<User>> {
    let user = users.register(payload).await?;

    tracing::info!(
        target: TRACING_TARGET_AUTHENTICATION,
        user_id = user.id,
        role = %user.role,
        "user registered"
    );

    Ok(Envelope::created("User registered successfully", user.into()))
}

/// Exchanges credentials for a signed token.
#[tracing::instrument(skip_all)]
async fn login(
    State(users): State<UserService>,
    Json(payload): Json<LoginPayload>,
) -> Result<Envelope<Login>> {
    let session = users.login(payload).await?;

    tracing::info!(
        target: TRACING_TARGET_AUTHENTICATION,
        user_id = session.user.id,
        "login succeeded"
    );

    Ok(Envelope::new("Login successful", session.into()))
}

/// Returns a [`Router`] with all related routes.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    use crate::handler::test::create_test_server;

    fn registration() -> Value {
        json!({
            "email": "tony@stark.io",
            "password": "ironman123",
            "full_name": "Tony Stark",
            "age": 45,
            "occupation": "Engineer",
            "role": "admin"
        })
    }

    #[tokio::test]
    async fn register_hides_password_and_rejects_repeat() -> anyhow::Result<()> {
        let server = create_test_server()?;

        let response = server.post("/register").json(&registration()).await;
        response.assert_status(StatusCode::CREATED);
        let body: Value = response.json();
        assert_eq!(body["message"], "User registered successfully");
        assert_eq!(body["data"]["email"], "tony@stark.io");
        assert_eq!(body["data"]["role"], "admin");
        assert!(body["data"].get("password").is_none());
        assert!(body["data"].get("password_hash").is_none());
        assert!(!response.text().contains("ironman123"));

        let response = server.post("/register").json(&registration()).await;
        response.assert_status(StatusCode::CONFLICT);
        let body: Value = response.json();
        assert_eq!(body["message"], "Email already registered");
        Ok(())
    }

    #[tokio::test]
    async fn register_validates_fields() -> anyhow::Result<()> {
        let server = create_test_server()?;

        let mut payload = registration();
        payload["email"] = json!("not-an-email");
        payload["age"] = json!(16);
        let response = server.post("/register").json(&payload).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["message"], "Validation failed");
        assert_eq!(body["errors"]["email"], "email must be a valid email address");
        assert_eq!(body["errors"]["age"], "age must be greater than or equal to 17");
        Ok(())
    }

    #[tokio::test]
    async fn login_issues_token() -> anyhow::Result<()> {
        let server = create_test_server()?;
        server
            .post("/register")
            .json(&registration())
            .await
            .assert_status(StatusCode::CREATED);

        let response = server
            .post("/login")
            .json(&json!({"email": "tony@stark.io", "password": "ironman123"}))
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["message"], "Login successful");
        assert!(body["data"]["token"].as_str().is_some_and(|t| !t.is_empty()));
        assert_eq!(body["data"]["user"]["email"], "tony@stark.io");
        assert_eq!(body["data"]["user"]["full_name"], "Tony Stark");
        assert_eq!(body["data"]["user"]["role"], "admin");
        assert!(body["data"]["user"].get("age").is_none());
        Ok(())
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_look_alike() -> anyhow::Result<()> {
        let server = create_test_server()?;
        server
            .post("/register")
            .json(&registration())
            .await
            .assert_status(StatusCode::CREATED);

        let wrong_password = server
            .post("/login")
            .json(&json!({"email": "tony@stark.io", "password": "wrong-password"}))
            .await;
        wrong_password.assert_status(StatusCode::UNAUTHORIZED);

        let unknown_email = server
            .post("/login")
            .json(&json!({"email": "nobody@stark.io", "password": "ironman123"}))
            .await;
        unknown_email.assert_status(StatusCode::UNAUTHORIZED);

        let a: Value = wrong_password.json();
        let b: Value = unknown_email.json();
        assert_eq!(a, b);
        assert_eq!(a["message"], "Invalid credentials");
        Ok(())
    }

    #[tokio::test]
    async fn login_requires_both_fields() -> anyhow::Result<()> {
        let server = create_test_server()?;

        let response = server
            .post("/login")
            .json(&json!({"email": "tony@stark.io"}))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["errors"]["credentials"], "Email and password are required");
        Ok(())
    }
}
