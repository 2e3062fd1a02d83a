use crate::model::{Order, OrderCreate, OrderUpdate, OrderFilters};
use store_framework::StoreEntity;

/// Implementation of the [`StoreEntity`] trait for the [`Order`] record.
///
/// Status and partner changes go through `PATCH`; see
/// [`OrderClient`](crate::clients::OrderClient).
impl StoreEntity for Order {
    type Id = String;
    type Create = OrderCreate;
    type Update = OrderUpdate;
    type Filters = OrderFilters;

    const RESOURCE: &'static str = "/orders";
    const SINGULAR: &'static str = "order";
    const PLURAL: &'static str = "orders";

    fn id(&self) -> &String {
        &self.id
    }

    fn validate_create(draft: &OrderCreate) -> Result<(), String> {
        draft.validate()
    }
}
