//! The display-preference command.
//!
//! The theme is a client-side preference kept in durable storage next to the session
//! token. It has no effect on the synchronization core; this command exists so the stored
//! value can be inspected and changed.

use crate::commands::Out;
use crate::storage::THEME;
use crate::{App, Result};
use std::str::FromStr;

/// The display preference.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

serde_plain::derive_display_from_serialize!(Theme);
serde_plain::derive_fromstr_from_deserialize!(Theme);

/// With a value, stores the preference; without one, reports the stored preference.
pub fn theme(app: &App, value: Option<Theme>) -> Result<Out<Theme>> {
    match value {
        Some(theme) => {
            app.storage().set(THEME, &theme.to_string())?;
            Ok(Out::new(format!("Theme set to {theme}"), theme))
        }
        None => {
            let current = app
                .storage()
                .get(THEME)
                .and_then(|s| Theme::from_str(&s).ok())
                .unwrap_or_default();
            Ok(Out::new(format!("Theme is {current}"), current))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::TestEnv;

    #[tokio::test]
    async fn test_theme_defaults_to_light() {
        let env = TestEnv::new().await;
        let app = env.app();
        assert_eq!(theme(&app, None).unwrap().structure(), Some(&Theme::Light));
    }

    #[tokio::test]
    async fn test_theme_set_and_get() {
        let env = TestEnv::new().await;
        let app = env.app();
        theme(&app, Some(Theme::Dark)).unwrap();
        assert_eq!(theme(&app, None).unwrap().structure(), Some(&Theme::Dark));
        assert_eq!(app.storage().get(THEME).as_deref(), Some("dark"));
    }
}
