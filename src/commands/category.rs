//! Category commands.

use crate::commands::Out;
use crate::model::{Category, CategoryInput};
use crate::{App, Result};
use anyhow::Context;
use uuid::Uuid;

/// Lists all categories.
pub async fn category_list(app: &App) -> Result<Out<Vec<Category>>> {
    app.store().load_categories().await;
    let categories = app.store().categories();
    let mut lines = vec![format!("{} categories", categories.len())];
    for category in &categories {
        lines.push(format!("  {} {}", render_emoji(category), category.name));
    }
    Ok(Out::new(lines.join("\n"), categories))
}

/// Creates a category, then reloads the category container.
pub async fn category_add(app: &App, name: &str, emoji: Option<String>) -> Result<Out<Category>> {
    let input = CategoryInput::new(name, emoji);
    let created = app
        .backend()
        .create_category(&input)
        .await
        .with_context(|| format!("Unable to create category '{name}'"))?;
    app.store().load_categories().await;
    Ok(Out::new(
        format!("Created category '{}' ({})", created.name, created.id),
        created,
    ))
}

/// Updates a category, then reloads the category container.
pub async fn category_update(
    app: &App,
    id: Uuid,
    name: &str,
    emoji: Option<String>,
) -> Result<Out<Category>> {
    let input = CategoryInput::new(name, emoji);
    let updated = app
        .backend()
        .update_category(id, &input)
        .await
        .with_context(|| format!("Unable to update category {id}"))?;
    app.store().load_categories().await;
    Ok(Out::new(
        format!("Updated category '{}' ({})", updated.name, updated.id),
        updated,
    ))
}

/// Deletes a category, then reloads the category container.
///
/// The backend refuses to delete a category that is still referenced by transactions; its
/// explanation is surfaced as the error message.
pub async fn category_delete(app: &App, id: Uuid) -> Result<Out<()>> {
    app.backend()
        .delete_category(id)
        .await
        .with_context(|| format!("Unable to delete category {id}"))?;
    app.store().load_categories().await;
    Ok(Out::new_message(format!("Deleted category {id}")))
}

fn render_emoji(category: &Category) -> &str {
    category.emoji.as_deref().unwrap_or("·")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::TestEnv;

    #[tokio::test]
    async fn test_add_reloads_store() {
        let env = TestEnv::new().await;
        let app = env.app();
        app.store().load_categories().await;
        let before = app.store().categories().len();

        let out = category_add(&app, "Gifts", Some("🎁".to_string()))
            .await
            .unwrap();
        assert!(out.message().contains("Gifts"));
        assert_eq!(app.store().categories().len(), before + 1);
    }

    #[tokio::test]
    async fn test_update_changes_name() {
        let env = TestEnv::new().await;
        let app = env.app();
        let created = category_add(&app, "Pets", None).await.unwrap();
        let id = created.structure().unwrap().id;

        category_update(&app, id, "Dogs", None).await.unwrap();

        let categories = app.store().categories();
        assert!(categories.iter().any(|c| c.name == "Dogs"));
        assert!(!categories.iter().any(|c| c.name == "Pets"));
    }

    #[tokio::test]
    async fn test_delete_in_use_surfaces_detail() {
        let env = TestEnv::new().await;
        let app = env.app();
        app.store().load_categories().await;
        let groceries = app
            .store()
            .categories()
            .into_iter()
            .find(|c| c.name == "Groceries")
            .unwrap();

        let err = category_delete(&app, groceries.id).await.unwrap_err();
        assert!(format!("{err:#}").contains("currently in use"));
    }

    #[tokio::test]
    async fn test_delete_unused_category() {
        let env = TestEnv::new().await;
        let app = env.app();
        let created = category_add(&app, "Short lived", None).await.unwrap();
        let id = created.structure().unwrap().id;

        category_delete(&app, id).await.unwrap();

        assert!(!app.store().categories().iter().any(|c| c.id == id));
    }
}
