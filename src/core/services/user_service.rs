use uuid::Uuid;

use crate::domain::User;
use crate::office::BackOffice;

use super::{ServiceError, ServiceResult};

pub struct UserService;

impl UserService {
    pub fn create(office: &mut BackOffice, user: User) -> ServiceResult<Uuid> {
        let email = user.email.trim().to_lowercase();
        if email.is_empty() {
            return Err(ServiceError::Invalid("User email is required".into()));
        }
        if Self::by_email(office, &email).is_some() {
            return Err(ServiceError::Invalid(format!(
                "User `{email}` already exists"
            )));
        }
        Ok(office.add_user(user))
    }

    pub fn update<F>(office: &mut BackOffice, id: Uuid, mutator: F) -> ServiceResult<()>
    where
        F: FnOnce(&mut User),
    {
        let user = office
            .users
            .iter_mut()
            .find(|user| user.id == id)
            .ok_or(ServiceError::NotFound { entity: "user" })?;
        mutator(user);
        office.touch();
        Ok(())
    }

    pub fn delete(office: &mut BackOffice, id: Uuid) -> ServiceResult<()> {
        let before = office.users.len();
        office.users.retain(|user| user.id != id);
        if office.users.len() == before {
            return Err(ServiceError::NotFound { entity: "user" });
        }
        office.permissions.retain(|perm| perm.user_id != id);
        office.touch();
        Ok(())
    }

    pub fn list(office: &BackOffice) -> Vec<&User> {
        let mut users: Vec<&User> = office.users.iter().collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        users
    }

    pub fn by_email<'a>(office: &'a BackOffice, email: &str) -> Option<&'a User> {
        let needle = email.trim().to_lowercase();
        office
            .users
            .iter()
            .find(|user| user.email.to_lowercase() == needle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;

    #[test]
    fn duplicate_emails_rejected_case_insensitively() {
        let mut office = BackOffice::new("Staff");
        UserService::create(&mut office, User::new("Ana", "ana@shop.com", Role::Admin)).unwrap();
        let err = UserService::create(&mut office, User::new("Ana B", "ANA@shop.com", Role::Vendor))
            .expect_err("duplicate email");
        assert!(matches!(err, ServiceError::Invalid(_)));
    }

    #[test]
    fn delete_removes_permissions_too() {
        let mut office = BackOffice::new("Staff");
        let id =
            UserService::create(&mut office, User::new("Ana", "ana@shop.com", Role::Admin)).unwrap();
        let module = crate::domain::Module::new("dashboard", 1);
        office
            .permissions
            .push(crate::domain::ModulePermission::new(id, module.id, true));
        office.modules.push(module);

        UserService::delete(&mut office, id).unwrap();
        assert!(office.permissions.is_empty());
    }
}
