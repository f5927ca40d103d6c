use super::preview::{PreviewKind, PreviewTarget};
use super::table::Column;
use super::{BoundSelector, LabelDefaults, SelectorOptions};
use crate::api::ListingBackend;
use crate::model::Video;
use crate::source::RemoteListing;
use crate::youtube;
use std::sync::Arc;
use tokio::runtime::Handle;

pub const RESOURCE: &str = "videos";

/// Shown in the preview column when no video id can be extracted.
pub const INVALID_URL_PLACEHOLDER: &str = "URL inválida";

const DEFAULTS: LabelDefaults = LabelDefaults {
    button: "Seleccionar videos",
    title: "Seleccionar videos",
};

pub type VideoSelector = BoundSelector<Video, RemoteListing<Video>>;

impl VideoSelector {
    pub fn new(
        options: SelectorOptions<Video>,
        backend: Arc<dyn ListingBackend>,
        runtime: Handle,
        page_size: usize,
    ) -> Self {
        let source = RemoteListing::new(backend, runtime, RESOURCE, page_size);
        BoundSelector::bind(options, &DEFAULTS, source, columns()).with_preview(preview_target)
    }
}

fn columns() -> Vec<Column<Video>> {
    vec![
        Column::new("ID", "id"),
        Column::new("Nombre", "name"),
        Column::new("URL", "url"),
        Column::new("Vista previa", "url").with_renderer(|_, video: &Video| thumbnail_cell(&video.url)),
    ]
}

fn thumbnail_cell(url: &str) -> String {
    youtube::preview_url(url).unwrap_or_else(|| INVALID_URL_PLACEHOLDER.to_string())
}

/// Invalid URLs yield no target, so the preview never opens for them.
fn preview_target(video: &Video) -> Option<PreviewTarget> {
    let url = youtube::embed_url(&video.url)?;
    Some(PreviewTarget {
        kind: PreviewKind::Video,
        title: video.name.clone(),
        url,
    })
}
