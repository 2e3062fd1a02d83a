use crate::model::{ContactFilters, ContactQuery, ContactUpdate, NoDraft};
use store_framework::StoreEntity;

// Queries come in through the public contact form; the console only triages them.
impl StoreEntity for ContactQuery {
    type Id = String;
    type Create = NoDraft;
    type Update = ContactUpdate;
    type Filters = ContactFilters;

    const RESOURCE: &'static str = "/contact-queries";
    const SINGULAR: &'static str = "query";
    const PLURAL: &'static str = "queries";

    fn id(&self) -> &String {
        &self.id
    }
}
