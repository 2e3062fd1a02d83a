use crate::model::{MediaFilters, MediaItem, MediaUpdate, NoDraft};
use store_framework::StoreEntity;

/// Implementation of the [`StoreEntity`] trait for the [`MediaItem`] record.
///
/// Items are only ever added by a multipart upload, see
/// [`MediaClient::upload`](crate::clients::MediaClient::upload).
impl StoreEntity for MediaItem {
    type Id = String;
    type Create = NoDraft;
    type Update = MediaUpdate;
    type Filters = MediaFilters;

    const RESOURCE: &'static str = "/media";
    const SINGULAR: &'static str = "media";
    const PLURAL: &'static str = "media";

    fn id(&self) -> &String {
        &self.id
    }
}
