//! Catalog management with role checks.

use uuid::Uuid;

use crate::domain::{Article, Role, Variant};
use crate::office::BackOffice;

use super::{ServiceError, ServiceResult};

pub struct ArticleService;

impl ArticleService {
    /// Creates an article. When it does not require size/color detail, a
    /// default variant is created alongside it; a variant failure is logged
    /// and swallowed so it never rolls back the article.
    pub fn create(office: &mut BackOffice, role: Role, article: Article) -> ServiceResult<Uuid> {
        if !role.can_manage_catalog() {
            return Err(ServiceError::PermissionDenied {
                role: role.label(),
                action: "create articles",
            });
        }
        Self::validate(&article)?;

        let requires_detail = article.requires_detail;
        let id = article.id;
        office.articles.push(article);
        office.touch();

        if !requires_detail {
            // Fire-and-forget: the article stands even if the placeholder
            // variant cannot be stored.
            if let Err(err) = Self::add_variant(office, Variant::default_for(id)) {
                tracing::warn!(article = %id, error = %err, "default variant creation failed");
            }
        }
        Ok(id)
    }

    pub fn update<F>(office: &mut BackOffice, role: Role, id: Uuid, mutator: F) -> ServiceResult<()>
    where
        F: FnOnce(&mut Article),
    {
        if !role.can_manage_catalog() {
            return Err(ServiceError::PermissionDenied {
                role: role.label(),
                action: "update articles",
            });
        }
        let article = office
            .articles
            .iter_mut()
            .find(|article| article.id == id)
            .ok_or(ServiceError::NotFound { entity: "article" })?;
        mutator(article);
        Self::validate(article)?;
        office.touch();
        Ok(())
    }

    /// Deleting is admin-only.
    pub fn delete(office: &mut BackOffice, role: Role, id: Uuid) -> ServiceResult<()> {
        if role != Role::Admin {
            return Err(ServiceError::PermissionDenied {
                role: role.label(),
                action: "delete articles",
            });
        }
        let before = office.articles.len();
        office.articles.retain(|article| article.id != id);
        if office.articles.len() == before {
            return Err(ServiceError::NotFound { entity: "article" });
        }
        office.variants.retain(|variant| variant.article_id != id);
        office.touch();
        Ok(())
    }

    pub fn get(office: &BackOffice, id: Uuid) -> Option<&Article> {
        office.article(id)
    }

    /// Articles newest first.
    pub fn list(office: &BackOffice) -> Vec<&Article> {
        let mut articles: Vec<&Article> = office.articles.iter().collect();
        articles.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        articles
    }

    pub fn add_variant(office: &mut BackOffice, variant: Variant) -> ServiceResult<Uuid> {
        if office.article(variant.article_id).is_none() {
            return Err(ServiceError::NotFound { entity: "article" });
        }
        let id = variant.id;
        office.variants.push(variant);
        office.touch();
        Ok(id)
    }

    fn validate(article: &Article) -> ServiceResult<()> {
        if article.description.trim().is_empty() {
            return Err(ServiceError::Invalid(
                "Article description is required".into(),
            ));
        }
        if article.unit_price <= 0.0 {
            return Err(ServiceError::Invalid(
                "Unit price must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}
