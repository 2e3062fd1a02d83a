use crate::model::{Service, ServiceCreate, ServiceUpdate, ServiceFilters};
use store_framework::StoreEntity;

impl StoreEntity for Service {
    type Id = String;
    type Create = ServiceCreate;
    type Update = ServiceUpdate;
    type Filters = ServiceFilters;

    const RESOURCE: &'static str = "/services";
    const SINGULAR: &'static str = "service";
    const PLURAL: &'static str = "services";

    fn id(&self) -> &String {
        &self.id
    }

    fn validate_create(draft: &ServiceCreate) -> Result<(), String> {
        draft.validate()
    }
}
