use crate::model::{AdminUser, UserCreate, UserFilters, UserUpdate};
use store_framework::StoreEntity;

/// Implementation of the [`StoreEntity`] trait for the [`AdminUser`] record.
///
/// # Endpoint
/// `/users`, full-replacement updates with `PUT`.
impl StoreEntity for AdminUser {
    type Id = String;
    type Create = UserCreate;
    type Update = UserUpdate;
    type Filters = UserFilters;

    const RESOURCE: &'static str = "/users";
    const SINGULAR: &'static str = "user";
    const PLURAL: &'static str = "users";

    fn id(&self) -> &String {
        &self.id
    }

    fn validate_create(draft: &UserCreate) -> Result<(), String> {
        draft.validate()
    }
}
