use futures::FutureExt;
use futures::channel::oneshot;
use futures::future::LocalBoxFuture;
use gloo::events::EventListener;
use once_cell::unsync::OnceCell;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlCanvasElement, HtmlImageElement};

use super::canvas_surface::context_2d;
use crate::domain::benchmark::ImageSource;
use crate::domain::errors::{BenchError, BenchResult};
use crate::domain::logging::{LogComponent, get_logger};

/// Resolve once `src` has loaded into a fresh image element.
async fn load_image(src: &str) -> BenchResult<HtmlImageElement> {
    let image = HtmlImageElement::new()
        .map_err(|e| BenchError::BrowserApi(format!("new Image(): {e:?}")))?;

    let (tx, rx) = oneshot::channel::<Result<(), String>>();
    let tx = Rc::new(RefCell::new(Some(tx)));
    let on_load = {
        let tx = Rc::clone(&tx);
        EventListener::once(&image, "load", move |_| {
            if let Some(tx) = tx.borrow_mut().take() {
                let _ = tx.send(Ok(()));
            }
        })
    };
    let on_error = {
        let tx = Rc::clone(&tx);
        let src = src.chars().take(64).collect::<String>();
        EventListener::once(&image, "error", move |_| {
            if let Some(tx) = tx.borrow_mut().take() {
                let _ = tx.send(Err(format!("could not decode {src}")));
            }
        })
    };

    image.set_src(src);
    let outcome = rx
        .await
        .map_err(|_| BenchError::ImageLoadFailed("image listener dropped".to_string()))?;
    drop(on_load);
    drop(on_error);
    outcome.map_err(BenchError::ImageLoadFailed)?;
    Ok(image)
}

/// Loads the source image once and re-encodes it at the requested sizes.
pub struct BrowserImageLoader {
    document: Document,
    url: String,
    source: OnceCell<HtmlImageElement>,
}

impl BrowserImageLoader {
    pub fn new(document: Document, url: impl Into<String>) -> Self {
        Self { document, url: url.into(), source: OnceCell::new() }
    }

    async fn source_image(&self) -> BenchResult<HtmlImageElement> {
        if let Some(image) = self.source.get() {
            return Ok(image.clone());
        }
        let image = load_image(&self.url).await?;
        Ok(self.source.get_or_init(|| image).clone())
    }

    async fn resize(&self, size_px: u32) -> BenchResult<HtmlImageElement> {
        let source = self.source_image().await?;

        let canvas = self
            .document
            .create_element("canvas")
            .map_err(|e| BenchError::BrowserApi(format!("create canvas: {e:?}")))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| BenchError::BrowserApi("Failed to get canvas element".to_string()))?;
        canvas.set_width(size_px);
        canvas.set_height(size_px);

        let context = context_2d(&canvas)?;
        let side = size_px as f64;
        context
            .draw_image_with_html_image_element_and_dw_and_dh(&source, 0.0, 0.0, side, side)
            .map_err(|e| BenchError::ImageLoadFailed(format!("draw source: {e:?}")))?;
        let data_url = canvas
            .to_data_url()
            .map_err(|e| BenchError::ImageLoadFailed(format!("toDataURL: {e:?}")))?;

        let resized = load_image(&data_url).await?;
        get_logger().debug(
            LogComponent::Infrastructure("ImageLoader"),
            &format!("resized {} to {}x{}", self.url, size_px, size_px),
        );
        Ok(resized)
    }
}

impl ImageSource for BrowserImageLoader {
    type Image = HtmlImageElement;

    fn load_resized(&self, size_px: u32) -> LocalBoxFuture<'_, BenchResult<HtmlImageElement>> {
        self.resize(size_px).boxed_local()
    }
}
