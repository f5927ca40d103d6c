use super::preview::{PreviewKind, PreviewTarget};
use super::table::Column;
use super::{BoundSelector, LabelDefaults, SelectorOptions};
use crate::api::ListingBackend;
use crate::model::Image;
use crate::source::RemoteListing;
use std::sync::Arc;
use tokio::runtime::Handle;

pub const RESOURCE: &str = "images";

const DEFAULTS: LabelDefaults = LabelDefaults {
    button: "Seleccionar imágenes",
    title: "Seleccionar imágenes",
};

pub type ImageSelector = BoundSelector<Image, RemoteListing<Image>>;

impl ImageSelector {
    pub fn new(
        options: SelectorOptions<Image>,
        backend: Arc<dyn ListingBackend>,
        runtime: Handle,
        page_size: usize,
    ) -> Self {
        let source = RemoteListing::new(backend, runtime, RESOURCE, page_size);
        BoundSelector::bind(options, &DEFAULTS, source, columns()).with_preview(preview_target)
    }
}

fn columns() -> Vec<Column<Image>> {
    vec![
        Column::new("ID", "id"),
        Column::new("Nombre", "name"),
        Column::new("URL", "url"),
        Column::new("Vista previa", "url").with_renderer(|_, image: &Image| {
            if image.url.is_empty() {
                "-".to_string()
            } else {
                "[ver] (v)".to_string()
            }
        }),
    ]
}

fn preview_target(image: &Image) -> Option<PreviewTarget> {
    if image.url.trim().is_empty() {
        return None;
    }
    Some(PreviewTarget {
        kind: PreviewKind::Image,
        title: image.name.clone(),
        url: image.url.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::MemoryBackend;
    use crate::selector::test_support::recording_options;
    use crate::selector::{ModalOutcome, ResourceSelector};
    use crate::source::tests::settle;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use serde_json::json;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn backend() -> Arc<MemoryBackend> {
        Arc::new(MemoryBackend::default().with_rows(
            RESOURCE,
            vec![
                json!({"id": 1, "name": "portada", "url": "https://cdn.example.com/portada.png"}),
                json!({"id": 2, "name": "sin archivo", "url": ""}),
            ],
        ))
    }

    #[tokio::test]
    async fn preview_opens_nested_dialog_for_the_highlighted_image() {
        let (options, _) = recording_options();
        let mut selector = ImageSelector::new(options, backend(), Handle::current(), 10);
        settle(&mut selector.source).await;

        assert_eq!(selector.handle_key(key(KeyCode::Enter)), ModalOutcome::Opened);
        selector.handle_key(key(KeyCode::Char('v')));
        let target = selector.preview().target().cloned();
        assert_eq!(
            target.map(|t| t.url),
            Some("https://cdn.example.com/portada.png".to_string())
        );

        // Keys go to the preview first; closing it leaves the selection dialog open.
        selector.handle_key(key(KeyCode::Esc));
        assert!(!selector.preview().is_open());
        assert!(selector.is_open());
    }

    #[tokio::test]
    async fn images_without_url_have_no_preview() {
        let (options, _) = recording_options();
        let mut selector = ImageSelector::new(options, backend(), Handle::current(), 10);
        settle(&mut selector.source).await;

        selector.handle_key(key(KeyCode::Enter));
        selector.handle_key(key(KeyCode::Down));
        selector.handle_key(key(KeyCode::Char('v')));
        assert!(!selector.preview().is_open());
    }

    #[tokio::test]
    async fn confirm_forwards_ids_and_records() {
        let (options, confirmed) = recording_options();
        let mut selector = ImageSelector::new(
            options.mode(crate::model::SelectionMode::Single),
            backend(),
            Handle::current(),
            10,
        );
        settle(&mut selector.source).await;

        selector.handle_key(key(KeyCode::Enter));
        selector.handle_key(key(KeyCode::Char(' ')));
        assert_eq!(selector.handle_key(key(KeyCode::Enter)), ModalOutcome::Confirmed);

        let confirmed = confirmed.borrow();
        assert_eq!(confirmed.len(), 1);
        assert_eq!(confirmed[0].0, vec![1]);
        assert_eq!(confirmed[0].1[0].name, "portada");
    }
}
