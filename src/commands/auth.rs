//! Session lifecycle commands.

use crate::commands::Out;
use crate::{App, Result};
use anyhow::Context;

/// Creates a new account. The backend sends a verification email; until the address is
/// verified, login may be refused.
pub async fn signup(app: &App, email: &str, password: &str) -> Result<Out<()>> {
    app.backend()
        .signup(email, password)
        .await
        .context("Signup failed")?;
    Ok(Out::new_message(format!(
        "Signed up {email}. Check your inbox for a verification email."
    )))
}

/// Requests a fresh verification email for an unverified account.
pub async fn resend_verification(app: &App, email: &str) -> Result<Out<()>> {
    app.backend()
        .resend_verification(email)
        .await
        .context("Could not resend the verification email")?;
    Ok(Out::new_message(format!("Verification email sent to {email}.")))
}

/// Logs in and persists the session token.
pub async fn login(app: &App, email: &str, password: &str) -> Result<Out<()>> {
    app.session()
        .login(email, password)
        .await
        .context("Login failed")?;
    Ok(Out::new_message(format!("Logged in as {email}.")))
}

/// Clears the session, whether or not one was active.
pub fn logout(app: &App) -> Result<Out<()>> {
    app.session().logout()?;
    Ok(Out::new_message("Logged out."))
}

/// Reports whether a session token is present.
pub fn whoami(app: &App) -> Result<Out<bool>> {
    let state = app.session().state();
    let message = if state.authenticated {
        "Logged in (a session token is stored)."
    } else {
        "Not logged in."
    };
    Ok(Out::new(message, state.authenticated))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::TestEnv;

    #[tokio::test]
    async fn test_login_then_whoami_then_logout() {
        let env = TestEnv::new().await;
        let app = env.app();

        assert_eq!(whoami(&app).unwrap().structure(), Some(&false));

        login(&app, "demo@example.com", "password").await.unwrap();
        assert_eq!(whoami(&app).unwrap().structure(), Some(&true));

        logout(&app).unwrap();
        assert_eq!(whoami(&app).unwrap().structure(), Some(&false));
    }

    #[tokio::test]
    async fn test_login_failure_message_carries_detail() {
        let env = TestEnv::new().await;
        let app = env.app();
        let err = login(&app, "demo@example.com", "wrong").await.unwrap_err();
        assert!(format!("{err:#}").contains("Invalid credentials"));
    }

    #[tokio::test]
    async fn test_signup_new_user_can_login() {
        let env = TestEnv::new().await;
        let app = env.app();
        signup(&app, "new@example.com", "hunter2").await.unwrap();
        login(&app, "new@example.com", "hunter2").await.unwrap();
        assert!(app.session().state().authenticated);
    }
}
