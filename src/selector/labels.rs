use super::table::id_name_columns;
use super::{BoundSelector, LabelDefaults, SelectorOptions};
use crate::api::ListingBackend;
use crate::model::Label;
use crate::source::RemoteListing;
use std::sync::Arc;
use tokio::runtime::Handle;

pub const RESOURCE: &str = "labels";

const DEFAULTS: LabelDefaults = LabelDefaults {
    button: "Seleccionar etiquetas",
    title: "Seleccionar etiquetas",
};

pub type LabelSelector = BoundSelector<Label, RemoteListing<Label>>;

impl LabelSelector {
    pub fn new(
        options: SelectorOptions<Label>,
        backend: Arc<dyn ListingBackend>,
        runtime: Handle,
        page_size: usize,
    ) -> Self {
        let source = RemoteListing::new(backend, runtime, RESOURCE, page_size);
        BoundSelector::bind(options, &DEFAULTS, source, id_name_columns())
    }
}
